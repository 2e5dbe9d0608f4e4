// SPDX-License-Identifier: Apache-2.0
//!
//! Collaborator seams the translator reads through but does not own: the
//! declarative resource cache the reconciler maintains, and whatever secret
//! backend resolves a `SecretRef` to a value. Neither is modelled by
//! `actl-store` — that crate only persists what the executor needs at
//! runtime (sessions, discovered tools), not the full resource graph.

use actl_config::{Agent, ModelConfig, ResourceRef, ToolServerSource};
use async_trait::async_trait;

#[async_trait]
pub trait ResourceResolver: Send + Sync {
    async fn get_agent(&self, reference: &ResourceRef) -> Option<Agent>;
    async fn get_model_config(&self, reference: &ResourceRef) -> Option<ModelConfig>;
    async fn get_tool_server(&self, reference: &ResourceRef) -> Option<ToolServerSource>;
}

#[async_trait]
pub trait SecretResolver: Send + Sync {
    async fn resolve(&self, secret_name: &str, key: &str) -> Option<String>;
}
