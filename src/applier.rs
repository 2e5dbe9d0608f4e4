// SPDX-License-Identifier: Apache-2.0
//!
//! Demo manifest applier and A2A registrar: log what would be applied
//! instead of talking to a live container orchestrator or A2A registry. No
//! live Kubernetes client is wired in; a durable backend would replace this
//! module without touching the reconciler.

use actl_config::ResourceRef;
use actl_reconciler::{A2aRegistrar, ManifestApplier};
use actl_translator::{AgentCard, ManifestObject};
use async_trait::async_trait;

pub struct LoggingApplier;

#[async_trait]
impl ManifestApplier for LoggingApplier {
    async fn apply(&self, owner: &ResourceRef, manifest: &[ManifestObject]) -> Result<(), String> {
        tracing::info!(agent = %owner, objects = manifest.len(), "would apply manifest");
        Ok(())
    }

    async fn is_deployment_ready(&self, _owner: &ResourceRef) -> bool {
        true
    }

    async fn prune_all(&self, owner: &ResourceRef) -> Result<(), String> {
        tracing::info!(agent = %owner, "would prune owned manifest objects");
        Ok(())
    }
}

pub struct LoggingRegistrar;

#[async_trait]
impl A2aRegistrar for LoggingRegistrar {
    async fn register(&self, reference: &ResourceRef, card: &AgentCard) {
        tracing::info!(agent = %reference, name = %card.name, "would register agent card");
    }

    async fn on_agent_deletion(&self, reference: &ResourceRef) {
        tracing::info!(agent = %reference, "would unregister agent card");
    }
}
