//! Infrastructure Layer - Google REST clients
//!
//! Both clients authenticate with a bearer token from a shared
//! [`platform::google::AccessTokenProvider`].

pub mod drive;
pub mod sheets;

use reqwest::{Response, Url};
use serde::Deserialize;

use crate::error::{IntakeError, IntakeResult};

#[derive(Deserialize)]
struct GoogleErrorBody {
    error: GoogleErrorDetail,
}

#[derive(Deserialize)]
struct GoogleErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Human-readable message from a Google API error body
fn google_error_message(body: &str) -> String {
    match serde_json::from_str::<GoogleErrorBody>(body) {
        Ok(parsed) => match parsed.error.status {
            Some(status) if !parsed.error.message.is_empty() => {
                format!("{}: {}", status, parsed.error.message)
            }
            Some(status) => status,
            None => parsed.error.message,
        },
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// Pass 2xx responses through; turn anything else into an upstream error
async fn ensure_success(response: Response, service: &'static str) -> IntakeResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(IntakeError::upstream(
        service,
        format!("HTTP {} ({})", status.as_u16(), google_error_message(&body)),
    ))
}

/// `base` with `segments` appended, each percent-encoded as a path segment
fn endpoint(base: &str, segments: &[&str], service: &'static str) -> IntakeResult<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| IntakeError::upstream(service, format!("invalid base URL '{base}': {e}")))?;
    url.path_segments_mut()
        .map_err(|_| IntakeError::upstream(service, format!("base URL '{base}' cannot hold a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
