// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("agent {0} not found")]
    AgentNotFound(String),
    #[error("model config {0} not found")]
    ModelConfigNotFound(String),
    #[error("tool server {0}/{1} not found")]
    ToolServerNotFound(String, String),
    #[error("session not found for user {0}, context {1}")]
    SessionNotFound(String, String),
}
