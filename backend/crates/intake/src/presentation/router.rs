//! Intake Router

use crate::application::config::IntakeConfig;
use crate::domain::repository::{FileStorage, SubmissionLedger};
use crate::presentation::handlers::{self, IntakeAppState};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;

/// Create the intake router for any storage / ledger implementation
///
/// The body limit sits just above the submission size limit so that
/// oversized forms still reach validation and get a JSON answer.
pub fn intake_router<S, L>(storage: S, ledger: L, config: IntakeConfig) -> Router
where
    S: FileStorage + Sync + 'static,
    L: SubmissionLedger + Sync + 'static,
{
    let body_limit = config.limits.body_limit();
    let state = IntakeAppState {
        storage: Arc::new(storage),
        ledger: Arc::new(ledger),
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(handlers::health))
        .route("/upload", post(handlers::upload::<S, L>))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
