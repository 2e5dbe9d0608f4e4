// SPDX-License-Identifier: Apache-2.0
//!
//! Model providers supported by a [`crate::ModelConfig`], and the
//! environment-variable mapping the translator (C8) emits into the workload
//! manifest for each one. Mirrors the registry-table pattern used for model
//! drivers elsewhere in this ecosystem, but intentionally closed: the A2A
//! executor never calls the provider directly (the LLM runner is an external
//! collaborator), so this crate only needs the *shape* of each provider's
//! configuration, not a client implementation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Provider {
    OpenAI,
    Anthropic,
    AzureOpenAI,
    Ollama,
    Gemini,
    GeminiVertexAI,
    AnthropicVertexAI,
}

impl Provider {
    pub const ALL: [Provider; 7] = [
        Provider::OpenAI,
        Provider::Anthropic,
        Provider::AzureOpenAI,
        Provider::Ollama,
        Provider::Gemini,
        Provider::GeminiVertexAI,
        Provider::AnthropicVertexAI,
    ];

    /// Whether this provider requires a non-null [`ProviderSubConfig`].
    pub fn requires_sub_config(&self) -> bool {
        matches!(
            self,
            Provider::AzureOpenAI | Provider::Ollama | Provider::GeminiVertexAI | Provider::AnthropicVertexAI
        )
    }

    /// Whether this provider authenticates via an API-key secret (as opposed
    /// to ambient credentials, e.g. Vertex AI application-default credentials).
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Provider::GeminiVertexAI | Provider::AnthropicVertexAI | Provider::Ollama)
    }
}

/// Provider-specific sub-configuration. Present iff [`Provider::requires_sub_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderSubConfig {
    AzureOpenAI {
        api_version: String,
        api_base: String,
        #[serde(default)]
        ad_token: Option<String>,
    },
    Ollama {
        api_base: String,
    },
    GeminiVertexAI {
        project: String,
        location: String,
    },
    AnthropicVertexAI {
        project: String,
        location: String,
    },
}

/// One environment variable to inject into the agent workload's container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

/// Derive the provider-specific environment variables for a model config.
///
/// `api_key` is the resolved secret value (already fetched by the caller);
/// this function is pure and never touches a secret store itself.
pub fn derive_env_vars(
    provider: Provider,
    api_key: Option<&str>,
    sub_config: Option<&ProviderSubConfig>,
) -> Vec<EnvVar> {
    let mut vars = Vec::new();
    let mut push = |name: &str, value: Option<&str>| {
        if let Some(v) = value {
            vars.push(EnvVar {
                name: name.to_string(),
                value: v.to_string(),
            });
        }
    };

    match (provider, sub_config) {
        (Provider::OpenAI, _) => {
            push("OPENAI_API_KEY", api_key);
        }
        (Provider::Anthropic, _) => {
            push("ANTHROPIC_API_KEY", api_key);
        }
        (Provider::AzureOpenAI, Some(ProviderSubConfig::AzureOpenAI { api_version, api_base, ad_token })) => {
            push("AZURE_API_KEY", api_key);
            push("AZURE_AD_TOKEN", ad_token.as_deref());
            push("AZURE_API_VERSION", Some(api_version.as_str()));
            push("AZURE_API_BASE", Some(api_base.as_str()));
        }
        (Provider::Ollama, Some(ProviderSubConfig::Ollama { api_base })) => {
            push("OLLAMA_API_BASE", Some(api_base.as_str()));
        }
        (Provider::Gemini, _) => {
            push("GOOGLE_API_KEY", api_key);
        }
        (Provider::GeminiVertexAI, Some(ProviderSubConfig::GeminiVertexAI { project, location }))
        | (Provider::AnthropicVertexAI, Some(ProviderSubConfig::AnthropicVertexAI { project, location })) => {
            push("GOOGLE_CLOUD_PROJECT", Some(project.as_str()));
            push("GOOGLE_CLOUD_LOCATION", Some(location.as_str()));
            push("GOOGLE_APPLICATION_CREDENTIALS", Some("/var/run/secrets/google/key.json"));
        }
        _ => {}
    }

    vars
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
