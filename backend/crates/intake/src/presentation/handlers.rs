//! HTTP Handlers

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use std::sync::Arc;

use crate::application::config::IntakeConfig;
use crate::application::submit_form::SubmitFormUseCase;
use crate::domain::repository::{FileStorage, SubmissionLedger};
use crate::error::{IntakeError, IntakeResult};
use crate::presentation::dto::UploadResponse;
use crate::presentation::multipart::read_submission;

pub const LIVENESS_TEXT: &str = "Form upload bridge is running";

/// Shared state for intake handlers
pub struct IntakeAppState<S, L>
where
    S: FileStorage + Sync + 'static,
    L: SubmissionLedger + Sync + 'static,
{
    pub storage: Arc<S>,
    pub ledger: Arc<L>,
    pub config: Arc<IntakeConfig>,
}

impl<S, L> Clone for IntakeAppState<S, L>
where
    S: FileStorage + Sync + 'static,
    L: SubmissionLedger + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            ledger: self.ledger.clone(),
            config: self.config.clone(),
        }
    }
}

/// GET /
pub async fn health() -> &'static str {
    LIVENESS_TEXT
}

/// POST /upload
pub async fn upload<S, L>(
    State(state): State<IntakeAppState<S, L>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> IntakeResult<Json<UploadResponse>>
where
    S: FileStorage + Sync + 'static,
    L: SubmissionLedger + Sync + 'static,
{
    let multipart = multipart.map_err(|e| IntakeError::MalformedForm(e.body_text()))?;
    let draft = read_submission(multipart, &state.config).await?;

    let use_case = SubmitFormUseCase::new(
        state.storage.clone(),
        state.ledger.clone(),
        state.config.clone(),
    );

    let output = use_case.execute(draft).await?;

    Ok(Json(output.into()))
}
