// SPDX-License-Identifier: Apache-2.0
//!
//! The LLM runner is an external collaborator: this crate only models its
//! seam, never a concrete provider driver. The runner exposes a lazy
//! sequence of `(event | error)` items; the Executor (C7) is the sole
//! consumer and drives it to completion or cancellation.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::event_converter::RunnerEvent;
use crate::model_content::ModelContent;

/// One item from a runner's event stream: either a produced event or a raw
/// error message to be fed through the Error Classifier (C4).
pub type RunnerItem = Result<RunnerEvent, String>;

/// A bounded, pull-style event sequence, analogous to a provider's streaming
/// response channel.
pub type RunnerStream = Pin<Box<dyn Stream<Item = RunnerItem> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    pub streaming: bool,
    pub timeout_secs: u64,
}

#[async_trait]
pub trait Runner: Send + Sync {
    /// Start driving the agent for one turn of `content`, returning a stream
    /// of runner items. The returned stream's lifetime is detached from the
    /// caller's cancellation token — only the per-iteration check in the
    /// Executor observes cancellation.
    async fn run(&self, content: ModelContent, config: RunnerConfig) -> RunnerStream;
}
