//! Response envelopes
//!
//! Every response body is `{"success": bool, ...}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SAVED_MESSAGE: &str = "archive saved successfully";
pub const DELETED_MESSAGE: &str = "archive deleted successfully";

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub success: bool,
    pub archives: Vec<String>,
}

impl ListResponse {
    pub fn new(archives: Vec<String>) -> Self {
        Self {
            success: true,
            archives,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoadResponse {
    pub success: bool,
    pub data: Value,
}

impl LoadResponse {
    pub fn new(data: Value) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Body for save and delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FailureResponse {
    pub success: bool,
    pub error: String,
}

impl FailureResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
