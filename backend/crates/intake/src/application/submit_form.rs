//! Submit Form Use Case

use crate::application::config::IntakeConfig;
use crate::domain::entities::{Submission, SubmissionDraft, UploadResult, UploadedFile};
use crate::domain::repository::{FileStorage, SubmissionLedger};
use crate::domain::services::{build_record, resolve_upload_result, validate_draft};
use crate::error::IntakeResult;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Output DTO for submit form
#[derive(Debug, Clone)]
pub struct SubmitFormOutput {
    pub submission_id: Uuid,
    pub uploaded: Vec<UploadResult>,
}

/// Submit Form Use Case
///
/// Validate, upload every file in order, then append one summary row.
/// Nothing is rolled back: when a later step fails, files already in
/// storage stay there without a row.
pub struct SubmitFormUseCase<S, L>
where
    S: FileStorage,
    L: SubmissionLedger,
{
    storage: Arc<S>,
    ledger: Arc<L>,
    config: Arc<IntakeConfig>,
}

impl<S, L> SubmitFormUseCase<S, L>
where
    S: FileStorage,
    L: SubmissionLedger,
{
    pub fn new(storage: Arc<S>, ledger: Arc<L>, config: Arc<IntakeConfig>) -> Self {
        Self {
            storage,
            ledger,
            config,
        }
    }

    pub async fn execute(&self, draft: SubmissionDraft) -> IntakeResult<SubmitFormOutput> {
        let submission_id = Uuid::new_v4();

        let contact = match validate_draft(&draft, &self.config.limits) {
            Ok(contact) => contact,
            Err(reason) => {
                tracing::info!(
                    submission_id = %submission_id,
                    files = draft.file_count(),
                    reason = %reason,
                    "Submission failed validation"
                );
                draft.discard();
                return Err(reason.into());
            }
        };

        tracing::info!(
            submission_id = %submission_id,
            files = draft.file_count(),
            total_bytes = draft.total_bytes(),
            "Processing submission"
        );

        let submission = Submission {
            contact,
            files: draft.into_files(),
        };

        let uploaded = self.upload_all(submission_id, submission.files).await?;

        let record = build_record(Utc::now(), &submission.contact, &uploaded);
        if let Err(e) = self
            .ledger
            .append_row(
                &self.config.spreadsheet_id,
                &self.config.sheet_range,
                &record.to_row(),
            )
            .await
        {
            tracing::error!(
                submission_id = %submission_id,
                uploaded = uploaded.len(),
                error = %e,
                "Spreadsheet append failed; uploaded files are kept without a row"
            );
            return Err(e);
        }

        tracing::info!(
            submission_id = %submission_id,
            files = uploaded.len(),
            "Submission recorded"
        );

        Ok(SubmitFormOutput {
            submission_id,
            uploaded,
        })
    }

    /// Upload files one at a time, stopping at the first failure
    async fn upload_all(
        &self,
        submission_id: Uuid,
        files: Vec<UploadedFile>,
    ) -> IntakeResult<Vec<UploadResult>> {
        let mut results = Vec::with_capacity(files.len());
        let mut pending = files.into_iter();

        while let Some(file) = pending.next() {
            match self.upload_one(submission_id, file).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!(
                        submission_id = %submission_id,
                        uploaded = results.len(),
                        skipped = pending.len(),
                        error = %e,
                        "Aborting submission; files already uploaded are not removed"
                    );
                    pending.for_each(UploadedFile::release);
                    return Err(e);
                }
            }
        }

        Ok(results)
    }

    async fn upload_one(
        &self,
        submission_id: Uuid,
        file: UploadedFile,
    ) -> IntakeResult<UploadResult> {
        let created = self
            .storage
            .create_file(&self.config.folder_id, &file)
            .await;
        let original_name = file.original_name().to_string();
        file.release();
        let created = created?;

        tracing::debug!(
            submission_id = %submission_id,
            file_id = %created.id,
            file = %original_name,
            "File uploaded"
        );

        if let Err(e) = self.storage.share_with_anyone(&created.id).await {
            tracing::warn!(
                submission_id = %submission_id,
                file_id = %created.id,
                error = %e,
                "Could not make file link-readable; continuing"
            );
        }

        let metadata = self.storage.file_metadata(&created.id).await?;

        Ok(resolve_upload_result(created, metadata, &original_name))
    }
}
