//! API DTOs (Data Transfer Objects)

use serde::Serialize;

use crate::application::submit_form::SubmitFormOutput;
use crate::domain::entities::UploadResult;

// ============================================================================
// Upload
// ============================================================================

/// One stored file as reported back to the form
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedItem {
    pub id: String,
    pub name: String,
    pub link: String,
}

impl From<UploadResult> for UploadedItem {
    fn from(result: UploadResult) -> Self {
        Self {
            id: result.id,
            name: result.name,
            link: result.link,
        }
    }
}

/// Upload response
///
/// Failures use `kernel::envelope::FailureBody` instead.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub uploaded: Vec<UploadedItem>,
}

impl From<SubmitFormOutput> for UploadResponse {
    fn from(output: SubmitFormOutput) -> Self {
        Self {
            success: true,
            uploaded: output.uploaded.into_iter().map(UploadedItem::from).collect(),
        }
    }
}
