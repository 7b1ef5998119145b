//! Service-account credential loading
//!
//! The credential is resolved once at startup from exactly one source, in a
//! fixed precedence order: inline JSON first, then a key file on disk.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::config::ConfigError;

/// A Google service-account key
///
/// The named fields are what startup checks and logs; the full key JSON is
/// kept alongside for the credentials builder.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    /// PEM-encoded private key
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(skip)]
    raw: serde_json::Value,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("private_key_id", &self.private_key_id)
            .field("project_id", &self.project_id)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Parse and check a key from its JSON text
    ///
    /// A missing email or a private key that is not PEM stops the process at
    /// startup rather than on the first request.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let raw: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| ConfigError::Credentials(format!("invalid credentials JSON: {e}")))?;
        let mut key: ServiceAccountKey = serde_json::from_value(raw.clone())
            .map_err(|e| ConfigError::Credentials(format!("invalid service account key: {e}")))?;

        if key.client_email.trim().is_empty() {
            return Err(ConfigError::Credentials(
                "service account client_email is empty".to_string(),
            ));
        }

        if !is_pem_private_key(&key.private_key) {
            return Err(ConfigError::Credentials(
                "service account private key is not a PEM private key".to_string(),
            ));
        }

        key.raw = raw;
        Ok(key)
    }

    /// The key exactly as supplied
    pub fn as_json(&self) -> &serde_json::Value {
        &self.raw
    }
}

fn is_pem_private_key(pem: &str) -> bool {
    let pem = pem.trim();
    pem.starts_with("-----BEGIN") && pem.ends_with("PRIVATE KEY-----")
}

/// Where the service-account key comes from
#[derive(Clone)]
pub enum CredentialSource {
    /// Key JSON supplied directly (e.g. `GOOGLE_SERVICE_ACCOUNT`)
    Inline(String),
    /// Path to a key file
    File(PathBuf),
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Inline(_) => f.write_str("Inline([REDACTED])"),
            CredentialSource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

impl CredentialSource {
    /// Pick the credential source; inline JSON takes precedence over the file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Credentials`] when there is no inline JSON and the key
    /// file does not exist.
    pub fn resolve(inline_json: Option<String>, key_file: &Path) -> Result<Self, ConfigError> {
        if let Some(json) = inline_json {
            return Ok(CredentialSource::Inline(json));
        }

        if key_file.is_file() {
            return Ok(CredentialSource::File(key_file.to_path_buf()));
        }

        Err(ConfigError::Credentials(format!(
            "no service account credentials: set GOOGLE_SERVICE_ACCOUNT or provide '{}'",
            key_file.display()
        )))
    }

    pub async fn load(&self) -> Result<ServiceAccountKey, ConfigError> {
        let content = match self {
            CredentialSource::Inline(json) => {
                info!("loading service account credentials from inline JSON");
                json.clone()
            }
            CredentialSource::File(path) => {
                info!(path = %path.display(), "loading service account credentials from file");
                tokio::fs::read_to_string(path).await.map_err(|e| {
                    ConfigError::Credentials(format!(
                        "failed to read credentials file '{}': {e}",
                        path.display()
                    ))
                })?
            }
        };

        ServiceAccountKey::from_json(&content)
    }
}
