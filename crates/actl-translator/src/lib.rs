// SPDX-License-Identifier: Apache-2.0

mod error;
mod resolver;
mod translator;
mod types;

pub use error::TranslateError;
pub use resolver::{ResourceResolver, SecretResolver};
pub use translator::translate;
pub use types::{
    AgentCapabilities, AgentCard, AgentConfigDoc, ConfigMapManifest, DeploymentManifest,
    ManifestObject, ResolvedMcpToolGroup, ResourceRequirements, ServiceAccountManifest,
    ServiceManifest, SubAgentTool, TranslationResult,
};

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use actl_config::{
        A2aConfig, Agent, AgentType, InlineAgentSpec, McpProtocol, McpServerResource, ModelConfig,
        Provider, ResourceRef, SecretRef, Skill, ToolReference, ToolServerSource,
    };
    use async_trait::async_trait;

    use crate::{translate, ResourceResolver, SecretResolver, TranslateError};

    struct FakeResolver {
        agents: Mutex<HashMap<String, Agent>>,
        model_configs: Mutex<HashMap<String, ModelConfig>>,
        tool_servers: Mutex<HashMap<String, ToolServerSource>>,
    }

    impl FakeResolver {
        fn new() -> Self {
            Self {
                agents: Mutex::new(HashMap::new()),
                model_configs: Mutex::new(HashMap::new()),
                tool_servers: Mutex::new(HashMap::new()),
            }
        }

        fn with_agent(self, agent: Agent) -> Self {
            self.agents.lock().unwrap().insert(agent.reference.qualified(), agent);
            self
        }

        fn with_model_config(self, mc: ModelConfig) -> Self {
            self.model_configs.lock().unwrap().insert(mc.reference.qualified(), mc);
            self
        }

        fn with_tool_server(self, reference: &ResourceRef, source: ToolServerSource) -> Self {
            self.tool_servers.lock().unwrap().insert(reference.qualified(), source);
            self
        }
    }

    #[async_trait]
    impl ResourceResolver for FakeResolver {
        async fn get_agent(&self, reference: &ResourceRef) -> Option<Agent> {
            self.agents.lock().unwrap().get(&reference.qualified()).cloned()
        }
        async fn get_model_config(&self, reference: &ResourceRef) -> Option<ModelConfig> {
            self.model_configs.lock().unwrap().get(&reference.qualified()).cloned()
        }
        async fn get_tool_server(&self, reference: &ResourceRef) -> Option<ToolServerSource> {
            self.tool_servers.lock().unwrap().get(&reference.qualified()).cloned()
        }
    }

    struct FakeSecrets;

    #[async_trait]
    impl SecretResolver for FakeSecrets {
        async fn resolve(&self, _secret_name: &str, _key: &str) -> Option<String> {
            Some("sk-test".to_string())
        }
    }

    fn model_config_ref(name: &str) -> ResourceRef {
        ResourceRef::new("default", name)
    }

    fn plain_model_config(name: &str) -> ModelConfig {
        ModelConfig {
            reference: model_config_ref(name),
            provider: Provider::OpenAI,
            model: "gpt-4o".into(),
            api_key_secret_ref: Some(SecretRef {
                name: "openai-secret".into(),
                key: "api-key".into(),
            }),
            provider_config: None,
            has_finalizer: false,
        }
    }

    fn inline_agent(name: &str, model_config_ref: ResourceRef, tools: Vec<ToolReference>) -> Agent {
        Agent {
            reference: ResourceRef::new("default", name),
            agent_type: AgentType::Inline,
            description: format!("{name} description"),
            inline: Some(InlineAgentSpec {
                model_config_ref,
                system_message: "You are helpful.".into(),
                tools,
                a2a_config: A2aConfig {
                    skills: vec![Skill {
                        id: "s1".into(),
                        name: "Skill One".into(),
                        description: "does a thing".into(),
                        tags: vec![],
                    }],
                },
            }),
            remote: None,
            annotations: HashMap::new(),
            labels: HashMap::new(),
            has_finalizer: false,
        }
    }

    #[tokio::test]
    async fn plain_inline_agent_translates_to_manifest_and_config() {
        let agent_ref = ResourceRef::new("default", "agent-a");
        let mc_ref = model_config_ref("mc-a");
        let resolver = FakeResolver::new()
            .with_agent(inline_agent("agent-a", mc_ref.clone(), vec![]))
            .with_model_config(plain_model_config("mc-a"));

        let result = translate(&agent_ref, &["default".to_string()], &resolver, &FakeSecrets)
            .await
            .unwrap();

        assert_eq!(result.agent_config.name, "agent-a");
        assert_eq!(result.agent_config.model, "gpt-4o");
        assert_eq!(result.manifest.len(), 4);
        assert!(!result.config_hash.is_empty());
    }

    #[tokio::test]
    async fn env_vars_carry_resolved_api_key() {
        let agent_ref = ResourceRef::new("default", "agent-a");
        let mc_ref = model_config_ref("mc-a");
        let resolver = FakeResolver::new()
            .with_agent(inline_agent("agent-a", mc_ref.clone(), vec![]))
            .with_model_config(plain_model_config("mc-a"));

        let result = translate(&agent_ref, &["default".to_string()], &resolver, &FakeSecrets)
            .await
            .unwrap();

        assert!(result.agent_config.env.iter().any(|e| e.name == "OPENAI_API_KEY" && e.value == "sk-test"));
    }

    #[tokio::test]
    async fn mcp_server_tools_group_by_target() {
        let agent_ref = ResourceRef::new("default", "agent-a");
        let mc_ref = model_config_ref("mc-a");
        let server_ref = ResourceRef::new("default", "srv-a");
        let tools = vec![
            ToolReference::McpServerTool {
                target: server_ref.clone(),
                tool_names: vec!["read_file".into()],
            },
            ToolReference::McpServerTool {
                target: server_ref.clone(),
                tool_names: vec!["write_file".into()],
            },
        ];
        let resolver = FakeResolver::new()
            .with_agent(inline_agent("agent-a", mc_ref, tools))
            .with_model_config(plain_model_config("mc-a"))
            .with_tool_server(
                &server_ref,
                ToolServerSource::McpServer(McpServerResource {
                    reference: server_ref.clone(),
                    protocol: McpProtocol::StreamableHttp,
                    url: "http://srv-a:8080/mcp".into(),
                    headers: HashMap::new(),
                    timeout_secs: 30,
                }),
            );

        let result = translate(&agent_ref, &["default".to_string()], &resolver, &FakeSecrets)
            .await
            .unwrap();

        assert_eq!(result.agent_config.mcp_tools.len(), 1);
        assert_eq!(result.agent_config.mcp_tools[0].tool_names.len(), 2);
    }

    #[tokio::test]
    async fn nested_agent_tool_resolves_recursively() {
        let parent_ref = ResourceRef::new("default", "parent");
        let child_ref = ResourceRef::new("default", "child");
        let mc_ref = model_config_ref("mc-a");

        let resolver = FakeResolver::new()
            .with_agent(inline_agent(
                "parent",
                mc_ref.clone(),
                vec![ToolReference::AgentTool { target: child_ref.clone() }],
            ))
            .with_agent(inline_agent("child", mc_ref.clone(), vec![]))
            .with_model_config(plain_model_config("mc-a"));

        let result = translate(&parent_ref, &["default".to_string()], &resolver, &FakeSecrets)
            .await
            .unwrap();

        assert_eq!(result.agent_config.agent_tools.len(), 1);
        assert_eq!(result.agent_config.agent_tools[0].name, "child");
    }

    #[tokio::test]
    async fn self_referencing_agent_tool_is_rejected() {
        let agent_ref = ResourceRef::new("default", "agent-a");
        let mc_ref = model_config_ref("mc-a");
        let resolver = FakeResolver::new()
            .with_agent(inline_agent(
                "agent-a",
                mc_ref.clone(),
                vec![ToolReference::AgentTool { target: agent_ref.clone() }],
            ))
            .with_model_config(plain_model_config("mc-a"));

        let err = translate(&agent_ref, &["default".to_string()], &resolver, &FakeSecrets)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::SelfReference(_)));
    }

    #[tokio::test]
    async fn three_way_cycle_is_detected() {
        let a_ref = ResourceRef::new("default", "a");
        let b_ref = ResourceRef::new("default", "b");
        let c_ref = ResourceRef::new("default", "c");
        let mc_ref = model_config_ref("mc-a");

        let resolver = FakeResolver::new()
            .with_agent(inline_agent("a", mc_ref.clone(), vec![ToolReference::AgentTool { target: b_ref.clone() }]))
            .with_agent(inline_agent("b", mc_ref.clone(), vec![ToolReference::AgentTool { target: c_ref.clone() }]))
            .with_agent(inline_agent("c", mc_ref.clone(), vec![ToolReference::AgentTool { target: a_ref.clone() }]))
            .with_model_config(plain_model_config("mc-a"));

        let err = translate(&a_ref, &["default".to_string()], &resolver, &FakeSecrets)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::CycleDetected(_)));
    }

    #[tokio::test]
    async fn deep_chain_exceeds_max_depth() {
        let mc_ref = model_config_ref("mc-a");
        let mut resolver = FakeResolver::new().with_model_config(plain_model_config("mc-a"));
        let depth = 13;
        for i in 0..depth {
            let name = format!("a{i}");
            let next = ResourceRef::new("default", format!("a{}", i + 1));
            let tools = if i < depth - 1 {
                vec![ToolReference::AgentTool { target: next }]
            } else {
                vec![]
            };
            resolver = resolver.with_agent(inline_agent(&name, mc_ref.clone(), tools));
        }

        let root = ResourceRef::new("default", "a0");
        let err = translate(&root, &["default".to_string()], &resolver, &FakeSecrets)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::DepthExceeded(_)));
    }

    #[tokio::test]
    async fn tool_server_in_unwatched_namespace_is_rejected() {
        let agent_ref = ResourceRef::new("default", "agent-a");
        let mc_ref = model_config_ref("mc-a");
        let server_ref = ResourceRef::new("other-ns", "srv-a");
        let resolver = FakeResolver::new()
            .with_agent(inline_agent(
                "agent-a",
                mc_ref,
                vec![ToolReference::McpServerTool {
                    target: server_ref.clone(),
                    tool_names: vec!["read_file".into()],
                }],
            ))
            .with_model_config(plain_model_config("mc-a"));

        let err = translate(&agent_ref, &["default".to_string()], &resolver, &FakeSecrets)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::UnwatchedNamespace(_)));
    }

    #[tokio::test]
    async fn same_config_hashes_identically_across_calls() {
        let agent_ref = ResourceRef::new("default", "agent-a");
        let mc_ref = model_config_ref("mc-a");
        let resolver = FakeResolver::new()
            .with_agent(inline_agent("agent-a", mc_ref.clone(), vec![]))
            .with_model_config(plain_model_config("mc-a"));

        let first = translate(&agent_ref, &["default".to_string()], &resolver, &FakeSecrets).await.unwrap();
        let second = translate(&agent_ref, &["default".to_string()], &resolver, &FakeSecrets).await.unwrap();
        assert_eq!(first.config_hash, second.config_hash);
    }

    #[tokio::test]
    async fn missing_model_config_is_reported() {
        let agent_ref = ResourceRef::new("default", "agent-a");
        let mc_ref = model_config_ref("missing-mc");
        let resolver = FakeResolver::new().with_agent(inline_agent("agent-a", mc_ref, vec![]));

        let err = translate(&agent_ref, &["default".to_string()], &resolver, &FakeSecrets)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::ModelConfigNotFound(_)));
    }
}
