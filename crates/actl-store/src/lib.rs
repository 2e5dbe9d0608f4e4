// SPDX-License-Identifier: Apache-2.0

mod error;
mod memory;
mod model;
mod traits;

pub use error::StoreError;
pub use memory::InMemoryStore;
pub use model::{
    AgentRow, Event, ListEventsOptions, ModelConfigRow, Session, SessionKey, ToolRow,
    ToolServerKey, ToolServerRow,
};
pub use traits::Store;
