// SPDX-License-Identifier: Apache-2.0
//!
//! Part Converter (C1): translates between the runner's [`ModelPart`]
//! representation and the A2A wire [`Part`].

use actl_a2a::{data_part_type, FileContent, Part, Role};
use base64::Engine;
use serde_json::Value;
use thiserror::Error;

use crate::model_content::{InlineBytes, ModelContent, ModelPart, ModelRole};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PartConvertError {
    #[error("model part has no A2A representation")]
    UnsupportedPart,
}

fn decode_inline_bytes(bytes: &InlineBytes) -> Vec<u8> {
    match bytes {
        InlineBytes::Raw(raw) => raw.clone(),
        InlineBytes::MaybeBase64(s) => base64::engine::general_purpose::STANDARD
            .decode(s)
            .unwrap_or_else(|_| s.as_bytes().to_vec()),
    }
}

/// Normalise a raw function-response payload so the rendered object always
/// exposes a `result` field.
pub fn normalize_function_response(raw: Value) -> Value {
    let mut obj = match raw {
        Value::Object(m) => m,
        other => {
            let mut m = serde_json::Map::new();
            m.insert("value".to_string(), other);
            m
        }
    };
    obj.retain(|_, v| !v.is_null());

    if obj.contains_key("result") {
        return Value::Object(obj);
    }

    if let Some(err) = obj.get("error").and_then(Value::as_str) {
        if !err.is_empty() {
            let err_owned = err.to_string();
            let mut result = serde_json::Map::new();
            result.insert("error".to_string(), Value::String(err_owned));
            obj.insert("isError".to_string(), Value::Bool(true));
            obj.insert("result".to_string(), Value::Object(result));
            return Value::Object(obj);
        }
    }

    if let Some(content) = obj.get("content").cloned() {
        if let Some(s) = content.as_str() {
            let mut result = serde_json::Map::new();
            result.insert("content".to_string(), Value::String(s.to_string()));
            obj.insert("result".to_string(), Value::Object(result));
            return Value::Object(obj);
        }
        if let Some(arr) = content.as_array() {
            if !arr.is_empty() {
                let mut result = serde_json::Map::new();
                result.insert("content".to_string(), Value::Array(arr.clone()));
                obj.insert("result".to_string(), Value::Object(result));
                return Value::Object(obj);
            }
        }
    }

    let whole = Value::Object(obj.clone());
    obj.insert("result".to_string(), whole);
    Value::Object(obj)
}

pub fn to_a2a(part: &ModelPart) -> Result<Part, PartConvertError> {
    match part {
        ModelPart::Text(text) if !text.is_empty() => Ok(Part::text(text.clone())),
        ModelPart::FileUri { uri, mime_type } => Ok(Part::file_uri(uri.clone(), mime_type.clone())),
        ModelPart::InlineData { bytes, mime_type } => {
            let decoded = decode_inline_bytes(bytes);
            Ok(Part::file_bytes(&decoded, mime_type.clone()))
        }
        ModelPart::FunctionCall { name, args, id } => {
            Ok(Part::function_call(name.clone(), args.clone(), id.clone()))
        }
        ModelPart::FunctionResponse { name, response, .. } => {
            Ok(Part::function_response(name.clone(), normalize_function_response(response.clone())))
        }
        ModelPart::CodeExecutionResult(payload) => Ok(Part::code_execution_result(payload.clone())),
        ModelPart::ExecutableCode(payload) => Ok(Part::executable_code(payload.clone())),
        ModelPart::Text(_) => Err(PartConvertError::UnsupportedPart),
    }
}

fn part_from_a2a(part: &Part) -> ModelPart {
    match part {
        Part::Text { text, .. } => ModelPart::Text(text.clone()),
        Part::File { file, .. } => match file {
            FileContent::Uri { uri, mime_type } => ModelPart::FileUri {
                uri: uri.clone(),
                mime_type: mime_type.clone(),
            },
            FileContent::Bytes { bytes, mime_type } => {
                let decoded = base64::engine::general_purpose::STANDARD
                    .decode(bytes)
                    .unwrap_or_default();
                ModelPart::InlineData {
                    bytes: InlineBytes::Raw(decoded),
                    mime_type: mime_type.clone(),
                }
            }
        },
        Part::Data { data, .. } => match part.data_part_type() {
            Some(data_part_type::FUNCTION_CALL) => ModelPart::FunctionCall {
                name: data.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
                args: data.get("args").cloned().unwrap_or(Value::Null),
                id: data.get("id").and_then(Value::as_str).map(str::to_string),
            },
            Some(data_part_type::FUNCTION_RESPONSE) => ModelPart::FunctionResponse {
                name: data.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
                response: data.get("response").cloned().unwrap_or(Value::Null),
                id: data.get("id").and_then(Value::as_str).map(str::to_string),
            },
            _ => ModelPart::Text(data.to_string()),
        },
    }
}

pub fn from_a2a(message: &actl_a2a::A2aMessage) -> ModelContent {
    let role = match message.role {
        Role::Agent => ModelRole::Model,
        Role::User => ModelRole::User,
    };
    let parts = message.parts.iter().map(part_from_a2a).collect();
    ModelContent::new(role, parts)
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
