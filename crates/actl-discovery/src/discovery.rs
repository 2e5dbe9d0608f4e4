// SPDX-License-Identifier: Apache-2.0
//!
//! Tool Discovery (C9): refreshes a tool server's cached tool list from its
//! live MCP connection. A failed discovery attempt leaves the store's
//! existing tool list untouched — callers keep serving the last-known-good
//! list rather than an empty one while a server is flapping.

use std::sync::Arc;

use actl_config::{RemoteMcpSpec, ResourceRef, ToolServerKind};
use actl_store::{Store, ToolRow, ToolServerKey};

use crate::error::DiscoveryError;
use crate::transport::McpTransport;

pub struct ToolDiscovery {
    transport: Arc<dyn McpTransport>,
    store: Arc<dyn Store>,
}

impl ToolDiscovery {
    pub fn new(transport: Arc<dyn McpTransport>, store: Arc<dyn Store>) -> Self {
        Self { transport, store }
    }

    /// Discover and persist the tool list for one server. On failure the
    /// store's existing tools for this server are left exactly as they were.
    pub async fn discover(&self, reference: &ResourceRef, kind: ToolServerKind, spec: &RemoteMcpSpec) -> Result<usize, DiscoveryError> {
        let key = ToolServerKey::new(reference.namespace.clone(), reference.name.clone(), kind);

        match self.transport.list_tools(spec).await {
            Ok(tools) => {
                let count = tools.len();
                let rows: Vec<ToolRow> = tools
                    .into_iter()
                    .map(|t| ToolRow {
                        server: key.clone(),
                        name: t.name,
                        description: t.description,
                        input_schema: t.input_schema,
                    })
                    .collect();

                if let Err(err) = self.store.upsert_tool_server(key.clone(), spec.url.clone()).await {
                    tracing::warn!(%err, server = %reference, "failed to record tool server row");
                }
                if let Err(err) = self.store.refresh_tools_for_server(key, rows).await {
                    tracing::warn!(%err, server = %reference, "failed to persist discovered tools");
                }
                tracing::info!(server = %reference, tool_count = count, "discovered MCP tools");
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(server = %reference, error = %err, "MCP tool discovery failed; keeping stale tool list");
                Err(err)
            }
        }
    }

    /// Discover every server in `targets`, best-effort. Returns the count of
    /// servers that discovered successfully.
    pub async fn discover_all(&self, targets: &[(ResourceRef, ToolServerKind, RemoteMcpSpec)]) -> usize {
        let mut succeeded = 0;
        for (reference, kind, spec) in targets {
            if self.discover(reference, *kind, spec).await.is_ok() {
                succeeded += 1;
            }
        }
        succeeded
    }
}
