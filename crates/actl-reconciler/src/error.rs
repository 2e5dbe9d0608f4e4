// SPDX-License-Identifier: Apache-2.0

use actl_translator::TranslateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("still referenced by Agents: {0}")]
    StillReferenced(String),
    #[error("translate failed: {0}")]
    Translate(#[from] TranslateError),
    #[error("apply failed: {0}")]
    ApplyFailed(String),
}
