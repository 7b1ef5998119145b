//! Multipart extraction
//!
//! Reads a `multipart/form-data` body into a [`SubmissionDraft`]. File
//! parts are streamed chunk by chunk into temporary files so a submission
//! is never held in memory.

use axum::extract::Multipart;
use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::application::config::IntakeConfig;
use crate::domain::entities::{SubmissionDraft, UploadedFile};
use crate::domain::value_objects::SubmissionLimits;
use crate::error::{IntakeError, IntakeResult, ValidationError};

pub const FIRST_NAME_FIELD: &str = "firstName";
pub const LAST_NAME_FIELD: &str = "lastName";
pub const PHONE_FIELD: &str = "phone";

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Read every part of the form
///
/// On error, files buffered so far are released before returning.
pub async fn read_submission(
    mut multipart: Multipart,
    config: &IntakeConfig,
) -> IntakeResult<SubmissionDraft> {
    let mut draft = SubmissionDraft::default();
    match collect_parts(&mut multipart, config, &mut draft).await {
        Ok(()) => Ok(draft),
        Err(e) => {
            draft.discard();
            Err(e)
        }
    }
}

async fn collect_parts(
    multipart: &mut Multipart,
    config: &IntakeConfig,
    draft: &mut SubmissionDraft,
) -> IntakeResult<()> {
    let limits = &config.limits;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error(e, limits))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            files if files == config.files_field => {
                let Some(file_name) = field.file_name().and_then(display_file_name) else {
                    tracing::debug!(field = %files, "Skipping file part without a filename");
                    continue;
                };

                if draft.file_count() >= limits.max_files {
                    return Err(ValidationError::TooManyFiles {
                        max: limits.max_files,
                    }
                    .into());
                }

                let mime_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_MIME_TYPE)
                    .to_string();
                let budget = limits.max_total_bytes.saturating_sub(draft.total_bytes());
                let (temp, size) = buffer_part(&mut field, budget, limits).await?;

                tracing::debug!(file = %file_name, mime_type = %mime_type, size, "Buffered file part");
                draft.push_file(UploadedFile::new(file_name, mime_type, size, temp));
            }
            FIRST_NAME_FIELD => draft.first_name = Some(read_text(field, limits).await?),
            LAST_NAME_FIELD => draft.last_name = Some(read_text(field, limits).await?),
            PHONE_FIELD => draft.phone = Some(read_text(field, limits).await?),
            other => {
                tracing::debug!(field = %other, "Ignoring unknown form field");
            }
        }
    }

    Ok(())
}

/// Stream one file part into a new temp file
///
/// Bytes past `budget` are counted but not written; the reported size
/// lets validation reject the submission.
async fn buffer_part(
    field: &mut Field<'_>,
    budget: u64,
    limits: &SubmissionLimits,
) -> IntakeResult<(NamedTempFile, u64)> {
    let temp = NamedTempFile::new()?;
    let mut writer = tokio::fs::File::from_std(temp.reopen()?);
    let mut size: u64 = 0;

    while let Some(chunk) = field.chunk().await.map_err(|e| form_error(e, limits))? {
        size += chunk.len() as u64;
        if size <= budget {
            writer.write_all(&chunk).await?;
        }
    }

    writer.flush().await?;
    Ok((temp, size))
}

async fn read_text(field: Field<'_>, limits: &SubmissionLimits) -> IntakeResult<String> {
    field.text().await.map_err(|e| form_error(e, limits))
}

/// Final path component of a client-supplied filename
///
/// Falls back to the whole name when it ends in a separator. `None` only
/// for a blank name, which is how browsers send an empty file input.
fn display_file_name(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let last = raw.rsplit(['/', '\\']).next().map(str::trim).unwrap_or_default();
    Some(if last.is_empty() { raw } else { last }.to_string())
}

fn form_error(err: MultipartError, limits: &SubmissionLimits) -> IntakeError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::PayloadTooLarge {
            limit_mib: limits.max_total_mib(),
        }
        .into()
    } else {
        IntakeError::MalformedForm(err.body_text())
    }
}
