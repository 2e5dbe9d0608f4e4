// SPDX-License-Identifier: Apache-2.0
//!
//! Adapts the declarative [`actl_config::ResourceBundle`] loaded from the
//! config file into the collaborator traits the translator and reconciler
//! depend on. This is the in-process stand-in for a live Kubernetes API: no
//! live cluster client is wired in (see the store/resolver seam notes in
//! `actl-store` and `actl-translator`).

use std::collections::HashMap;

use actl_config::{Agent, ModelConfig, ResourceBundle, ResourceRef, ToolServerSource};
use actl_translator::{ResourceResolver, SecretResolver};
use async_trait::async_trait;

pub struct StaticResolver {
    agents: HashMap<String, Agent>,
    model_configs: HashMap<String, ModelConfig>,
    tool_servers: HashMap<String, ToolServerSource>,
}

impl StaticResolver {
    pub fn from_bundle(bundle: &ResourceBundle) -> Self {
        Self {
            agents: bundle
                .agents
                .iter()
                .map(|a| (a.reference.qualified(), a.clone()))
                .collect(),
            model_configs: bundle
                .model_configs
                .iter()
                .map(|m| (m.reference.qualified(), m.clone()))
                .collect(),
            tool_servers: bundle
                .tool_servers
                .iter()
                .map(|t| (t.reference.qualified(), t.source.clone()))
                .collect(),
        }
    }
}

#[async_trait]
impl ResourceResolver for StaticResolver {
    async fn get_agent(&self, reference: &ResourceRef) -> Option<Agent> {
        self.agents.get(&reference.qualified()).cloned()
    }

    async fn get_model_config(&self, reference: &ResourceRef) -> Option<ModelConfig> {
        self.model_configs.get(&reference.qualified()).cloned()
    }

    async fn get_tool_server(&self, reference: &ResourceRef) -> Option<ToolServerSource> {
        self.tool_servers.get(&reference.qualified()).cloned()
    }
}

/// Resolves secrets from process environment variables:
/// `{SECRET_NAME}_{KEY}`, upper-cased with `-` folded to `_`, matching the
/// `<PROVIDER>_API_KEY` convention the model drivers use for API keys.
pub struct EnvSecretResolver;

#[async_trait]
impl SecretResolver for EnvSecretResolver {
    async fn resolve(&self, secret_name: &str, key: &str) -> Option<String> {
        let var = format!("{secret_name}_{key}").to_uppercase().replace('-', "_");
        std::env::var(var).ok()
    }
}

#[cfg(test)]
mod tests {
    use actl_config::SecretRef;

    use super::*;

    fn ref_(n: &str) -> ResourceRef {
        ResourceRef::new("default", n)
    }

    #[tokio::test]
    async fn static_resolver_looks_up_by_qualified_name() {
        let mc = ModelConfig {
            reference: ref_("mc-a"),
            provider: actl_config::Provider::OpenAI,
            model: "gpt-4o".into(),
            api_key_secret_ref: Some(SecretRef {
                name: "openai-secret".into(),
                key: "api-key".into(),
            }),
            provider_config: None,
            has_finalizer: false,
        };
        let bundle = ResourceBundle {
            agents: vec![],
            model_configs: vec![mc],
            tool_servers: vec![],
        };
        let resolver = StaticResolver::from_bundle(&bundle);
        assert!(resolver.get_model_config(&ref_("mc-a")).await.is_some());
        assert!(resolver.get_model_config(&ref_("missing")).await.is_none());
    }

    #[tokio::test]
    async fn env_secret_resolver_reads_upper_cased_underscored_var() {
        std::env::set_var("OPENAI_SECRET_API_KEY", "sk-test-value");
        let resolver = EnvSecretResolver;
        let value = resolver.resolve("openai-secret", "api-key").await;
        assert_eq!(value.as_deref(), Some("sk-test-value"));
        std::env::remove_var("OPENAI_SECRET_API_KEY");
    }

    #[tokio::test]
    async fn env_secret_resolver_returns_none_when_unset() {
        let resolver = EnvSecretResolver;
        assert!(resolver.resolve("no-such-secret", "key").await.is_none());
    }
}
