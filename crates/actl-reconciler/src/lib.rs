// SPDX-License-Identifier: Apache-2.0

mod condition;
mod error;
mod reconciler;
mod traits;

pub use condition::{Condition, ConditionStatus};
pub use error::ReconcileError;
pub use reconciler::{AgentReconcileOutcome, ModelConfigReconcileOutcome, Reconciler, ToolServerReconcileOutcome};
pub use traits::{A2aRegistrar, ManifestApplier};
