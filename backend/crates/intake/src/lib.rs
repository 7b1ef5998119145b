//! Intake - form submission bridge
//!
//! Clean Architecture structure:
//! - `domain/` - Submission entities, validation rules, storage/ledger traits
//! - `application/` - The submit-form use case and its configuration
//! - `infra/` - Google Drive and Google Sheets implementations
//! - `presentation/` - Multipart extraction, HTTP handlers and router
//!
//! ## Processing Model
//! - A submission is validated completely before any external call is made
//! - Files are uploaded one at a time, in the order they were received
//! - Each temporary file is deleted as soon as its upload call returns
//! - A failed upload aborts the batch before the spreadsheet row is written;
//!   files already uploaded stay in Drive

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::IntakeConfig;
pub use error::{IntakeError, IntakeResult, ValidationError};
pub use infra::drive::DriveFileStorage;
pub use infra::sheets::SheetsLedger;
pub use presentation::router::intake_router;
