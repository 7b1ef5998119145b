//! Domain Entities
//!
//! Core business entities for the intake domain. Everything here lives
//! for a single request; only the derived [`SubmissionRecord`] is
//! persisted, by the spreadsheet.

use std::path::Path;

use tempfile::NamedTempFile;

use crate::domain::value_objects::ContactFields;

/// An uploaded file buffered in local temporary storage
///
/// The temp file is owned exclusively by this value. [`UploadedFile::release`]
/// deletes it and logs the outcome; dropping the value without releasing
/// still deletes it.
#[derive(Debug)]
pub struct UploadedFile {
    original_name: String,
    mime_type: String,
    size: u64,
    temp: NamedTempFile,
}

impl UploadedFile {
    pub fn new(
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
        size: u64,
        temp: NamedTempFile,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            mime_type: mime_type.into(),
            size,
            temp,
        }
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Bytes received for this part
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Location of the buffered bytes
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Delete the temporary file. Failures are logged, never returned.
    pub fn release(self) {
        let path = self.temp.path().to_path_buf();
        match self.temp.close() {
            Ok(()) => {
                tracing::debug!(path = %path.display(), file = %self.original_name, "Released temp file");
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    file = %self.original_name,
                    error = %e,
                    "Failed to delete temp file"
                );
            }
        }
    }
}

/// A submission as read off the wire, before validation
#[derive(Debug, Default)]
pub struct SubmissionDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    files: Vec<UploadedFile>,
}

impl SubmissionDraft {
    pub fn push_file(&mut self, file: UploadedFile) {
        self.files.push(file);
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(UploadedFile::size).sum()
    }

    pub fn into_files(self) -> Vec<UploadedFile> {
        self.files
    }

    /// Release every buffered file
    pub fn discard(self) {
        let count = self.files.len();
        self.files.into_iter().for_each(UploadedFile::release);
        if count > 0 {
            tracing::debug!(files = count, "Discarded submission draft");
        }
    }
}

/// A validated submission, ready for upload
#[derive(Debug)]
pub struct Submission {
    pub contact: ContactFields,
    pub files: Vec<UploadedFile>,
}

/// Outcome of storing one file remotely
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub id: String,
    pub name: String,
    pub link: String,
}

/// The spreadsheet row describing one successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub timestamp: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub file_count: usize,
    pub file_names: String,
    pub file_links: String,
}

impl SubmissionRecord {
    /// Cells in column order:
    /// timestamp, first name, last name, phone, file count, names, links
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.phone.clone(),
            self.file_count.to_string(),
            self.file_names.clone(),
            self.file_links.clone(),
        ]
    }
}
