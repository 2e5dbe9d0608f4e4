// SPDX-License-Identifier: Apache-2.0

use actl_config::{AgentType, ModelConfigError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("agent {0} references itself as a tool")]
    SelfReference(String),
    #[error("cycle detected in agent tool graph at {0}")]
    CycleDetected(String),
    #[error("agent tool graph exceeds maximum depth of 10 at {0}")]
    DepthExceeded(String),
    #[error("agent {0} not found")]
    AgentNotFound(String),
    #[error("model config {0} not found")]
    ModelConfigNotFound(String),
    #[error("tool server {0} not found")]
    ToolServerNotFound(String),
    #[error("agent {0} has type {1:?} but no inline spec")]
    MissingInlineSpec(String, AgentType),
    #[error("model config {0} is invalid: {1}")]
    InvalidModelConfig(String, ModelConfigError),
    #[error("tool server {0} did not resolve to a connection descriptor")]
    UnresolvedToolServer(String),
    #[error("target namespace {0} is not in the watch set")]
    UnwatchedNamespace(String),
}
