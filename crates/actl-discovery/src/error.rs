// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to connect to MCP server at {url}: {source}")]
    ConnectionFailed { url: String, source: String },
    #[error("failed to list tools from {url}: {source}")]
    ListToolsFailed { url: String, source: String },
    #[error("unsupported protocol for {url}")]
    UnsupportedProtocol { url: String },
}
