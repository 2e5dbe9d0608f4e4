// SPDX-License-Identifier: Apache-2.0
//!
//! Reconciler (C10): the level-triggered control loop. One method per
//! resource kind; each takes the desired state (`None` meaning the resource
//! was deleted) and drives the store and manifest toward it.

use std::sync::Arc;

use actl_config::{resolve_tool_server_spec, Agent, AgentType, ModelConfig, ResourceRef, ToolReference, ToolServerSource};
use actl_discovery::{McpTransport, ToolDiscovery};
use actl_store::{Store, ToolServerKey};
use actl_translator::{translate, ResourceResolver, SecretResolver};
use tokio::sync::Mutex;

use crate::condition::{Condition, ConditionStatus};
use crate::error::ReconcileError;
use crate::traits::{A2aRegistrar, ManifestApplier};

pub enum AgentReconcileOutcome {
    Deleted,
    Reconciled { accepted: Condition, ready: Condition },
}

pub enum ModelConfigReconcileOutcome {
    Deleted,
    Reconciled { accepted: Condition },
}

pub enum ToolServerReconcileOutcome {
    Deleted,
    Reconciled { accepted: Condition },
}

pub struct Reconciler {
    store: Arc<dyn Store>,
    resolver: Arc<dyn ResourceResolver>,
    secrets: Arc<dyn SecretResolver>,
    applier: Arc<dyn ManifestApplier>,
    registrar: Arc<dyn A2aRegistrar>,
    discovery: ToolDiscovery,
    watch_namespaces: Vec<String>,
    /// Process-wide upsert serialisation, scoped to this struct rather than
    /// a true global: two ticks for the same resource never race.
    upsert_lock: Mutex<()>,
}

impl Reconciler {
    pub fn new(
        store: Arc<dyn Store>,
        resolver: Arc<dyn ResourceResolver>,
        secrets: Arc<dyn SecretResolver>,
        applier: Arc<dyn ManifestApplier>,
        registrar: Arc<dyn A2aRegistrar>,
        transport: Arc<dyn McpTransport>,
        watch_namespaces: Vec<String>,
    ) -> Self {
        let discovery = ToolDiscovery::new(transport, store.clone());
        Self {
            store,
            resolver,
            secrets,
            applier,
            registrar,
            discovery,
            watch_namespaces,
            upsert_lock: Mutex::new(()),
        }
    }

    pub async fn reconcile_agent(&self, reference: &ResourceRef, desired: Option<Agent>) -> AgentReconcileOutcome {
        let _guard = self.upsert_lock.lock().await;

        let Some(mut agent) = desired else {
            self.registrar.on_agent_deletion(reference).await;
            if let Err(err) = self.applier.prune_all(reference).await {
                tracing::warn!(%err, agent = %reference, "failed to prune owned manifest objects on agent deletion");
            }
            if let Err(err) = self.store.delete_agent(&reference.namespace, &reference.name).await {
                tracing::warn!(%err, agent = %reference, "failed to delete agent row");
            }
            return AgentReconcileOutcome::Deleted;
        };

        agent.has_finalizer = true;

        if agent.agent_type != AgentType::Inline && agent.agent_type != AgentType::Workflow {
            if let Err(err) = self.store.upsert_agent(agent).await {
                tracing::warn!(%err, agent = %reference, "failed to upsert remote agent row");
            }
            let accepted = Condition::accepted(ConditionStatus::True, "Reconciled", "remote agent accepted");
            let ready = Condition::ready(ConditionStatus::True, "NoWorkload", "remote agents have no owned Deployment");
            return AgentReconcileOutcome::Reconciled { accepted, ready };
        }

        match translate(reference, &self.watch_namespaces, self.resolver.as_ref(), self.secrets.as_ref()).await {
            Ok(result) => {
                if let Err(err) = self.applier.apply(reference, &result.manifest).await {
                    tracing::warn!(%err, agent = %reference, "manifest apply failed");
                    if let Err(store_err) = self.store.upsert_agent(agent).await {
                        tracing::warn!(%store_err, agent = %reference, "failed to upsert agent row");
                    }
                    let accepted = Condition::accepted(ConditionStatus::False, "ApplyFailed", err);
                    let ready = Condition::ready(ConditionStatus::False, "NoDeployment", "manifest was not applied");
                    return AgentReconcileOutcome::Reconciled { accepted, ready };
                }

                self.registrar.register(reference, &result.agent_config.card).await;
                if let Err(err) = self.store.upsert_agent(agent).await {
                    tracing::warn!(%err, agent = %reference, "failed to upsert agent row");
                }

                let deployment_ready = self.applier.is_deployment_ready(reference).await;
                let accepted = Condition::accepted(ConditionStatus::True, "Reconciled", "agent translated and applied");
                let ready = if deployment_ready {
                    Condition::ready(ConditionStatus::True, "DeploymentAvailable", "available replicas match desired")
                } else {
                    Condition::ready(ConditionStatus::False, "DeploymentUnavailable", "waiting for available replicas")
                };
                AgentReconcileOutcome::Reconciled { accepted, ready }
            }
            Err(err) => {
                if let Err(store_err) = self.store.upsert_agent(agent).await {
                    tracing::warn!(%store_err, agent = %reference, "failed to upsert agent row after translate failure");
                }
                let accepted = Condition::accepted(ConditionStatus::False, "ReconcileFailed", err.to_string());
                let ready = Condition::ready(ConditionStatus::False, "NoManifest", "translate did not produce a manifest");
                AgentReconcileOutcome::Reconciled { accepted, ready }
            }
        }
    }

    pub async fn reconcile_model_config(
        &self,
        reference: &ResourceRef,
        desired: Option<ModelConfig>,
    ) -> Result<ModelConfigReconcileOutcome, ReconcileError> {
        let _guard = self.upsert_lock.lock().await;

        if desired.is_none() {
            let referring = self.agents_referencing_model_config(reference).await;
            if !referring.is_empty() {
                return Err(ReconcileError::StillReferenced(referring.join(", ")));
            }
            if let Err(err) = self.store.delete_model_config(&reference.namespace, &reference.name).await {
                tracing::warn!(%err, model_config = %reference, "failed to delete model config row");
            }
            return Ok(ModelConfigReconcileOutcome::Deleted);
        }

        let mut model_config = desired.expect("checked above");
        model_config.has_finalizer = true;

        let secret_ok = match &model_config.api_key_secret_ref {
            Some(secret_ref) => self.secrets.resolve(&secret_ref.name, &secret_ref.key).await.is_some(),
            None => true,
        };

        if let Err(err) = self.store.upsert_model_config(model_config).await {
            tracing::warn!(%err, model_config = %reference, "failed to upsert model config row");
        }

        let accepted = if secret_ok {
            Condition::accepted(ConditionStatus::True, "Reconciled", "model config accepted")
        } else {
            Condition::accepted(ConditionStatus::False, "SecretMissing", "referenced API key secret does not exist")
        };
        Ok(ModelConfigReconcileOutcome::Reconciled { accepted })
    }

    /// Reconcile one tool-server resource (`MCPServer`, `RemoteMCPServer`,
    /// or an MCP-annotated `Service`): resolve it to a connection spec,
    /// upsert the `ToolServer` row, run discovery (C9), and refresh the
    /// persisted tool list. On absence, delete the row and its tools —
    /// blocked while any Agent still references it, the same as
    /// [`Self::reconcile_model_config`].
    pub async fn reconcile_tool_server(
        &self,
        reference: &ResourceRef,
        desired: Option<ToolServerSource>,
    ) -> Result<ToolServerReconcileOutcome, ReconcileError> {
        let _guard = self.upsert_lock.lock().await;

        let Some(source) = desired else {
            let referring = self.agents_referencing_tool_server(reference).await;
            if !referring.is_empty() {
                return Err(ReconcileError::StillReferenced(referring.join(", ")));
            }
            if let Some(row) = self
                .store
                .list_tool_servers()
                .await
                .into_iter()
                .find(|row| row.key.namespace == reference.namespace && row.key.name == reference.name)
            {
                if let Err(err) = self.store.delete_tool_server(&row.key).await {
                    tracing::warn!(%err, tool_server = %reference, "failed to delete tool server row");
                }
            }
            return Ok(ToolServerReconcileOutcome::Deleted);
        };

        let Some(spec) = resolve_tool_server_spec(&source) else {
            let accepted = Condition::accepted(ConditionStatus::False, "UnresolvedSpec", "could not resolve a connection spec from this resource");
            return Ok(ToolServerReconcileOutcome::Reconciled { accepted });
        };

        let key = ToolServerKey::new(reference.namespace.clone(), reference.name.clone(), spec.kind);
        if let Err(err) = self.store.upsert_tool_server(key, spec.url.clone()).await {
            tracing::warn!(%err, tool_server = %reference, "failed to upsert tool server row");
        }

        let accepted = match self.discovery.discover(reference, spec.kind, &spec).await {
            Ok(count) => Condition::accepted(ConditionStatus::True, "Reconciled", format!("discovered {count} tool(s)")),
            Err(err) => Condition::accepted(ConditionStatus::False, "DiscoveryFailed", err.to_string()),
        };
        Ok(ToolServerReconcileOutcome::Reconciled { accepted })
    }

    async fn agents_referencing_model_config(&self, reference: &ResourceRef) -> Vec<String> {
        self.store
            .list_agents()
            .await
            .into_iter()
            .filter(|row| {
                row.agent
                    .inline
                    .as_ref()
                    .map(|inline| &inline.model_config_ref == reference)
                    .unwrap_or(false)
            })
            .map(|row| row.agent.reference.qualified())
            .collect()
    }

    /// Whether `reference` (an MCP server or remote MCP server) is still
    /// referenced by any Agent's tool list. Used to block finalizer-held
    /// deletion the same way [`Self::reconcile_model_config`] does.
    pub async fn agents_referencing_tool_server(&self, reference: &ResourceRef) -> Vec<String> {
        self.store
            .list_agents()
            .await
            .into_iter()
            .filter(|row| {
                row.agent.inline.as_ref().is_some_and(|inline| {
                    inline.tools.iter().any(|tool| matches!(tool, ToolReference::McpServerTool { target, .. } if target == reference))
                })
            })
            .map(|row| row.agent.reference.qualified())
            .collect()
    }
}
