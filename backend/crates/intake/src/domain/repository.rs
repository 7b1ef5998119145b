//! Repository Traits
//!
//! Interfaces to the two external systems. Implementations are in the
//! infrastructure layer.

use crate::domain::entities::UploadedFile;
use crate::domain::value_objects::RemoteFile;
use crate::error::IntakeResult;

/// Remote file storage (a folder in Google Drive)
#[trait_variant::make(FileStorage: Send)]
pub trait LocalFileStorage {
    /// Upload the file's bytes into `folder_id` under its original name and MIME type
    async fn create_file(&self, folder_id: &str, file: &UploadedFile) -> IntakeResult<RemoteFile>;

    /// Make the file readable by anyone holding the link
    async fn share_with_anyone(&self, file_id: &str) -> IntakeResult<()>;

    /// Fetch the file's display name and view link
    async fn file_metadata(&self, file_id: &str) -> IntakeResult<RemoteFile>;
}

/// Append-only submission log (a Google Sheets range)
#[trait_variant::make(SubmissionLedger: Send)]
pub trait LocalSubmissionLedger {
    /// Append one row of cells after the last row of `range`
    async fn append_row(&self, spreadsheet_id: &str, range: &str, row: &[String])
    -> IntakeResult<()>;
}
