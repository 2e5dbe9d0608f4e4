// SPDX-License-Identifier: Apache-2.0

mod discovery;
mod error;
mod transport;

pub use discovery::ToolDiscovery;
pub use error::DiscoveryError;
pub use transport::{DiscoveredTool, McpTransport, RmcpTransport};
