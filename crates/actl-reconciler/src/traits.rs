// SPDX-License-Identifier: Apache-2.0
//!
//! Collaborator seams the reconciler drives but does not own: applying a
//! translated manifest to the cluster, and the A2A-protocol sub-reconciler
//! that keeps agent cards registered/unregistered as Agents come and go.

use actl_config::ResourceRef;
use actl_translator::{AgentCard, ManifestObject};
use async_trait::async_trait;

#[async_trait]
pub trait ManifestApplier: Send + Sync {
    /// Apply the manifest objects owned by `owner`, pruning any previously
    /// owned objects not present in `manifest` anymore.
    async fn apply(&self, owner: &ResourceRef, manifest: &[ManifestObject]) -> Result<(), String>;

    /// Whether the Deployment for `owner` currently has available replicas
    /// equal to its desired replica count.
    async fn is_deployment_ready(&self, owner: &ResourceRef) -> bool;

    /// Remove every object owned by `owner`.
    async fn prune_all(&self, owner: &ResourceRef) -> Result<(), String>;
}

#[async_trait]
pub trait A2aRegistrar: Send + Sync {
    async fn register(&self, reference: &ResourceRef, card: &AgentCard);
    async fn on_agent_deletion(&self, reference: &ResourceRef);
}
