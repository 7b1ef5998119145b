//! Domain Value Objects
//!
//! Immutable value types for the intake domain.

/// One mebibyte
pub const MIB: u64 = 1024 * 1024;

/// The three required text fields of a submission
///
/// Each must contain something besides whitespace; the value is kept as
/// submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFields {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl ContactFields {
    /// Returns `None` if any field is absent or blank
    pub fn parse(
        first_name: Option<&str>,
        last_name: Option<&str>,
        phone: Option<&str>,
    ) -> Option<Self> {
        fn non_blank(value: Option<&str>) -> Option<String> {
            value
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        }

        Some(Self {
            first_name: non_blank(first_name)?,
            last_name: non_blank(last_name)?,
            phone: non_blank(phone)?,
        })
    }
}

/// Upper bounds applied to a single submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionLimits {
    pub max_files: usize,
    pub max_total_bytes: u64,
}

impl SubmissionLimits {
    pub const DEFAULT_MAX_FILES: usize = 10;
    pub const DEFAULT_MAX_TOTAL_BYTES: u64 = 100 * MIB;

    /// Slack allowed on top of the file bytes for multipart framing
    /// and the text fields.
    const MULTIPART_OVERHEAD: u64 = MIB;

    /// Largest request body the transport should accept. Bodies between
    /// `max_total_bytes` and this value reach validation and get a
    /// proper `PayloadTooLarge` answer.
    pub fn body_limit(&self) -> usize {
        usize::try_from(self.max_total_bytes + Self::MULTIPART_OVERHEAD).unwrap_or(usize::MAX)
    }

    pub fn max_total_mib(&self) -> u64 {
        self.max_total_bytes / MIB
    }
}

impl Default for SubmissionLimits {
    fn default() -> Self {
        Self {
            max_files: Self::DEFAULT_MAX_FILES,
            max_total_bytes: Self::DEFAULT_MAX_TOTAL_BYTES,
        }
    }
}

/// A file as known to the remote storage service
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteFile {
    pub id: String,
    pub name: Option<String>,
    pub web_view_link: Option<String>,
}
