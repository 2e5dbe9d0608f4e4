// SPDX-License-Identifier: Apache-2.0
//!
//! Agent Translator (C8): projects an `Agent` resource, recursively resolving
//! its model config and tool graph, into a runtime config and the workload
//! manifest that ships it.

use std::collections::HashMap;

use actl_config::{derive_env_vars, resolve_tool_server_spec, ResourceRef, ToolReference};
use futures::future::BoxFuture;
use sha2::{Digest, Sha256};

use crate::error::TranslateError;
use crate::resolver::{ResourceResolver, SecretResolver};
use crate::types::{
    AgentCapabilities, AgentCard, AgentConfigDoc, ConfigMapManifest, DeploymentManifest,
    ManifestObject, ResolvedMcpToolGroup, ResourceRequirements, ServiceAccountManifest,
    ServiceManifest, SubAgentTool, TranslationResult,
};

const MAX_TOOL_DEPTH: usize = 10;

/// Translate `reference` into a full workload manifest plus its runtime config.
pub async fn translate(
    reference: &ResourceRef,
    watch_namespaces: &[String],
    resolver: &dyn ResourceResolver,
    secrets: &dyn SecretResolver,
) -> Result<TranslationResult, TranslateError> {
    let mut visited = Vec::new();
    let agent_config = translate_agent(reference, watch_namespaces, resolver, secrets, &mut visited, 0).await?;

    let env = agent_config.env.clone();
    let resources = ResourceRequirements::default();
    let sa_name = format!("{}-sa", reference.name);
    let config_map_name = format!("{}-config", reference.name);

    let env_bytes = serde_json::to_vec(&env).unwrap_or_default();
    let resources_bytes = serde_json::to_vec(&resources).unwrap_or_default();
    let agent_config_bytes = serde_json::to_vec(&agent_config).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(&env_bytes);
    hasher.update(&resources_bytes);
    hasher.update(&agent_config_bytes);
    let digest = hasher.finalize();
    let config_hash = hex::encode(&digest[..8]);

    let mut data = HashMap::new();
    data.insert(
        "agent-config.json".to_string(),
        serde_json::to_string_pretty(&agent_config).unwrap_or_default(),
    );

    let manifest = vec![
        ManifestObject::ServiceAccount(ServiceAccountManifest {
            name: sa_name.clone(),
            namespace: reference.namespace.clone(),
        }),
        ManifestObject::ConfigMap(ConfigMapManifest {
            name: config_map_name.clone(),
            namespace: reference.namespace.clone(),
            data,
        }),
        ManifestObject::Deployment(DeploymentManifest {
            name: reference.name.clone(),
            namespace: reference.namespace.clone(),
            replicas: 1,
            resources,
            readiness_probe_path: "/health".to_string(),
            config_mount_path: "/config".to_string(),
            config_map_name,
            service_account: sa_name,
            pod_label_hash: config_hash.clone(),
            env,
        }),
        ManifestObject::Service(ServiceManifest {
            name: reference.name.clone(),
            namespace: reference.namespace.clone(),
            port: 8080,
        }),
    ];

    Ok(TranslationResult {
        manifest,
        agent_config,
        config_hash,
    })
}

fn check_watched(namespace: &str, watch_namespaces: &[String]) -> Result<(), TranslateError> {
    if watch_namespaces.iter().any(|ns| ns == namespace) {
        Ok(())
    } else {
        Err(TranslateError::UnwatchedNamespace(namespace.to_string()))
    }
}

fn translate_agent<'a>(
    reference: &'a ResourceRef,
    watch_namespaces: &'a [String],
    resolver: &'a dyn ResourceResolver,
    secrets: &'a dyn SecretResolver,
    visited: &'a mut Vec<String>,
    depth: usize,
) -> BoxFuture<'a, Result<AgentConfigDoc, TranslateError>> {
    Box::pin(translate_agent_inner(reference, watch_namespaces, resolver, secrets, visited, depth))
}

async fn translate_agent_inner(
    reference: &ResourceRef,
    watch_namespaces: &[String],
    resolver: &dyn ResourceResolver,
    secrets: &dyn SecretResolver,
    visited: &mut Vec<String>,
    depth: usize,
) -> Result<AgentConfigDoc, TranslateError> {
    if depth > MAX_TOOL_DEPTH {
        return Err(TranslateError::DepthExceeded(reference.qualified()));
    }
    check_watched(&reference.namespace, watch_namespaces)?;

    let agent = resolver
        .get_agent(reference)
        .await
        .ok_or_else(|| TranslateError::AgentNotFound(reference.qualified()))?;

    let inline = agent
        .inline
        .as_ref()
        .ok_or_else(|| TranslateError::MissingInlineSpec(reference.qualified(), agent.agent_type))?;

    let model_config = resolver
        .get_model_config(&inline.model_config_ref)
        .await
        .ok_or_else(|| TranslateError::ModelConfigNotFound(inline.model_config_ref.qualified()))?;
    model_config
        .validate()
        .map_err(|e| TranslateError::InvalidModelConfig(inline.model_config_ref.qualified(), e))?;

    let api_key = if let Some(secret_ref) = &model_config.api_key_secret_ref {
        secrets.resolve(&secret_ref.name, &secret_ref.key).await
    } else {
        None
    };
    let env = derive_env_vars(model_config.provider, api_key.as_deref(), model_config.provider_config.as_ref());

    visited.push(reference.qualified());

    let mut mcp_groups: HashMap<String, ResolvedMcpToolGroup> = HashMap::new();
    let mut agent_tools = Vec::new();

    for tool in &inline.tools {
        match tool {
            ToolReference::McpServerTool { target, tool_names } => {
                check_watched(&target.namespace, watch_namespaces)?;
                let source = resolver
                    .get_tool_server(target)
                    .await
                    .ok_or_else(|| TranslateError::ToolServerNotFound(target.qualified()))?;
                let spec = resolve_tool_server_spec(&source)
                    .ok_or_else(|| TranslateError::UnresolvedToolServer(target.qualified()))?;
                let entry = mcp_groups.entry(target.qualified()).or_insert_with(|| ResolvedMcpToolGroup {
                    server_name: target.qualified(),
                    protocol: spec.protocol,
                    url: spec.url.clone(),
                    headers: spec.headers.clone(),
                    timeout_secs: spec.timeout_secs,
                    tool_names: Vec::new(),
                });
                for name in tool_names {
                    if !entry.tool_names.contains(name) {
                        entry.tool_names.push(name.clone());
                    }
                }
            }
            ToolReference::AgentTool { target } => {
                if target == reference {
                    visited.pop();
                    return Err(TranslateError::SelfReference(reference.qualified()));
                }
                if visited.contains(&target.qualified()) {
                    visited.pop();
                    return Err(TranslateError::CycleDetected(target.qualified()));
                }
                let nested = translate_agent(target, watch_namespaces, resolver, secrets, visited, depth + 1).await;
                let nested = match nested {
                    Ok(n) => n,
                    Err(e) => {
                        visited.pop();
                        return Err(e);
                    }
                };
                agent_tools.push(SubAgentTool {
                    name: target.name.clone(),
                    config: nested,
                });
            }
        }
    }

    visited.pop();

    let card = AgentCard {
        name: reference.name.clone(),
        description: agent.description.clone(),
        capabilities: AgentCapabilities::default(),
        skills: inline.a2a_config.skills.clone(),
        default_input_modes: vec!["text".to_string()],
        default_output_modes: vec!["text".to_string()],
    };

    Ok(AgentConfigDoc {
        name: reference.name.clone(),
        description: agent.description.clone(),
        instruction: inline.system_message.clone(),
        model: model_config.model.clone(),
        env,
        card,
        mcp_tools: mcp_groups.into_values().collect(),
        agent_tools,
    })
}
