//! Response Envelope
//!
//! Every JSON body the service returns carries a top-level `success` flag.
//! Failures always have the shape `{ "success": false, "error": "<message>" }`.

use serde::{Deserialize, Serialize};

/// Body of every failure response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureBody {
    pub success: bool,
    pub error: String,
}

impl FailureBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
