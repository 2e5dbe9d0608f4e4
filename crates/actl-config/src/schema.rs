// SPDX-License-Identifier: Apache-2.0
//!
//! Top-level ambient runtime configuration: store backend selection,
//! reconciler tick interval, executor defaults, and the namespace watch set.
//! Composed of sub-configs the way a layered config usually is, with
//! `default_fn()`-style defaults filled in when a field is absent from the
//! file on disk.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::resource::{Agent, ModelConfig, ResourceRef, ToolServerSource};

fn default_tick_interval_secs() -> u64 {
    10
}

fn default_executor_timeout_secs() -> u64 {
    300
}

fn default_store_backend() -> StoreBackend {
    StoreBackend::Memory
}

fn default_watch_namespaces() -> Vec<String> {
    vec!["default".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreBackend {
    Memory,
    File { path: PathBuf },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    #[serde(default = "default_executor_timeout_secs")]
    pub default_timeout_secs: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: default_executor_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional file path to also write tracing output to, mirroring the
    /// verbosity-suppression escape hatch used for interactive frontends.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// A tool-server resource as it appears in a declarative resource file: its
/// reference plus which of the three source kinds it resolves to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolServerEntry {
    pub reference: ResourceRef,
    #[serde(flatten)]
    pub source: ToolServerSource,
}

/// The declarative resources loaded alongside the ambient config, for the
/// in-process / file-backed mode used by tests and the demo binary (no live
/// Kubernetes API is wired in).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceBundle {
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub model_configs: Vec<ModelConfig>,
    #[serde(default)]
    pub tool_servers: Vec<ToolServerEntry>,
}

/// Runtime configuration for the control plane binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_store_backend")]
    pub store: StoreBackend,
    #[serde(default)]
    pub reconciler: ReconcilerConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default = "default_watch_namespaces")]
    pub watch_namespaces: Vec<String>,
    #[serde(default)]
    pub resources: ResourceBundle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: default_store_backend(),
            reconciler: ReconcilerConfig::default(),
            executor: ExecutorConfig::default(),
            logging: LoggingConfig::default(),
            watch_namespaces: default_watch_namespaces(),
            resources: ResourceBundle::default(),
        }
    }
}

impl Config {
    pub fn watches_namespace(&self, namespace: &str) -> bool {
        self.watch_namespaces.iter().any(|n| n == namespace)
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
