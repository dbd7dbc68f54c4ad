//! The uniform `{success, message, data}` response wrapper.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every endpoint answers with an envelope, on success and on failure.
///
/// Failed calls carry an empty array in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    pub data: Value,
}

impl Envelope {
    /// Successful envelope wrapping `data`.
    pub fn ok(data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                success: true,
                message: String::new(),
                data,
            },
            Err(e) => Self::failure(format!("Failed to serialize response: {e}")),
        }
    }

    /// Failed envelope with a human-readable message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Value::Array(Vec::new()),
        }
    }

    /// Serialize to the JSON body.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"message":"Failed to serialize response","data":[]}"#.to_string()
        })
    }
}
