//! Domain Services
//!
//! Pure submission rules: validation order, link resolution and the
//! layout of the spreadsheet row.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::entities::{SubmissionDraft, SubmissionRecord, UploadResult};
use crate::domain::value_objects::{ContactFields, RemoteFile, SubmissionLimits};
use crate::error::ValidationError;

/// Separator between file names / links inside one spreadsheet cell
pub const CELL_LIST_SEPARATOR: &str = " | ";

/// Check a draft against the submission rules
///
/// Checks run in a fixed order and stop at the first failure:
/// 1. at least one file
/// 2. no more than `max_files` files
/// 3. total size within `max_total_bytes`
/// 4. first name, last name and phone all present
pub fn validate_draft(
    draft: &SubmissionDraft,
    limits: &SubmissionLimits,
) -> Result<ContactFields, ValidationError> {
    if draft.file_count() == 0 {
        return Err(ValidationError::NoFiles);
    }

    if draft.file_count() > limits.max_files {
        return Err(ValidationError::TooManyFiles {
            max: limits.max_files,
        });
    }

    if draft.total_bytes() > limits.max_total_bytes {
        return Err(ValidationError::PayloadTooLarge {
            limit_mib: limits.max_total_mib(),
        });
    }

    ContactFields::parse(
        draft.first_name.as_deref(),
        draft.last_name.as_deref(),
        draft.phone.as_deref(),
    )
    .ok_or(ValidationError::MissingFields)
}

/// Direct-access URL for a Drive file, used when no view link is known
pub fn direct_access_link(file_id: &str) -> String {
    format!("https://drive.google.com/uc?id={file_id}")
}

/// Combine what storage reported about a file into its final result
///
/// `metadata` wins over `created`; the original upload name and the
/// direct-access URL are the last resort.
pub fn resolve_upload_result(
    created: RemoteFile,
    metadata: RemoteFile,
    original_name: &str,
) -> UploadResult {
    let link = metadata
        .web_view_link
        .or(created.web_view_link)
        .unwrap_or_else(|| direct_access_link(&created.id));

    let name = metadata
        .name
        .or(created.name)
        .unwrap_or_else(|| original_name.to_string());

    UploadResult {
        id: created.id,
        name,
        link,
    }
}

/// Spreadsheet timestamp: UTC, millisecond precision, `Z` suffix
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Build the summary row for a submission whose files all uploaded
pub fn build_record(
    at: DateTime<Utc>,
    contact: &ContactFields,
    results: &[UploadResult],
) -> SubmissionRecord {
    let file_names = results
        .iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(CELL_LIST_SEPARATOR);

    let file_links = results
        .iter()
        .map(|r| r.link.as_str())
        .collect::<Vec<_>>()
        .join(CELL_LIST_SEPARATOR);

    SubmissionRecord {
        timestamp: format_timestamp(at),
        first_name: contact.first_name.clone(),
        last_name: contact.last_name.clone(),
        phone: contact.phone.clone(),
        file_count: results.len(),
        file_names,
        file_links,
    }
}
