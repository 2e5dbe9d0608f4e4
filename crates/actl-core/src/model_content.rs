// SPDX-License-Identifier: Apache-2.0
//!
//! The runner-side content representation (as opposed to `actl_a2a`'s wire
//! representation). The Part Converter (C1) translates between the two.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelRole {
    User,
    Model,
}

/// Raw inline-data bytes as handed to the converter. The runner's own
/// payload typing sometimes carries an already base64-encoded string in this
/// field rather than a decoded byte buffer; [`MaybeBase64`] preserves that
/// ambiguity so the converter can apply the idempotent decode-then-re-encode
/// rule instead of double-encoding.
///
/// [`MaybeBase64`]: InlineBytes::MaybeBase64
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineBytes {
    Raw(Vec<u8>),
    MaybeBase64(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelPart {
    Text(String),
    FileUri {
        uri: String,
        mime_type: Option<String>,
    },
    InlineData {
        bytes: InlineBytes,
        mime_type: Option<String>,
    },
    FunctionCall {
        name: String,
        args: Value,
        id: Option<String>,
    },
    FunctionResponse {
        name: String,
        response: Value,
        id: Option<String>,
    },
    CodeExecutionResult(Value),
    ExecutableCode(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelContent {
    pub role: ModelRole,
    pub parts: Vec<ModelPart>,
}

impl ModelContent {
    pub fn new(role: ModelRole, parts: Vec<ModelPart>) -> Self {
        Self { role, parts }
    }
}
