//! OAuth2 access tokens for a service account
//!
//! Signing, the token exchange and caching are left to `google-cloud-auth`.
//! This module scopes the credential and exposes its bearer token through
//! [`AccessTokenProvider`].

use std::fmt;

use google_cloud_auth::credentials::service_account::{AccessSpecifier, Builder};
use google_cloud_auth::credentials::{CacheableResource, Credentials};
use http::header::AUTHORIZATION;
use http::{Extensions, HeaderMap};
use thiserror::Error;
use tracing::info;

use super::credentials::ServiceAccountKey;
use crate::config::ConfigError;

/// Full Drive access; needed to write into folders shared with the account
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";
/// Read/write spreadsheets
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const BEARER_PREFIX: &str = "Bearer ";

/// Access token failures
#[derive(Debug, Error)]
pub enum GoogleAuthError {
    #[error("could not obtain access token: {0}")]
    Unavailable(String),

    #[error("credentials did not produce a bearer token")]
    MissingBearer,
}

/// Anything that can hand out a bearer token for Google APIs
#[trait_variant::make(AccessTokenProvider: Send)]
pub trait LocalAccessTokenProvider {
    async fn access_token(&self) -> Result<String, GoogleAuthError>;
}

/// Token source backed by a service-account key
#[derive(Clone)]
pub struct ServiceAccountTokenSource {
    credentials: Credentials,
    scopes: Vec<String>,
}

impl fmt::Debug for ServiceAccountTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountTokenSource")
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountTokenSource {
    pub fn new(key: &ServiceAccountKey, scopes: &[&str]) -> Result<Self, ConfigError> {
        let scopes: Vec<String> = scopes.iter().map(|scope| scope.to_string()).collect();

        let credentials = Builder::new(key.as_json().clone())
            .with_access_specifier(AccessSpecifier::from_scopes(scopes.clone()))
            .build()
            .map_err(|e| {
                ConfigError::Credentials(format!(
                    "failed to build service account credentials: {e}"
                ))
            })?;

        info!(client_email = %key.client_email, "service account credentials ready");
        Ok(Self {
            credentials,
            scopes,
        })
    }
}

impl AccessTokenProvider for ServiceAccountTokenSource {
    async fn access_token(&self) -> Result<String, GoogleAuthError> {
        let headers = self
            .credentials
            .headers(Extensions::new())
            .await
            .map_err(|e| GoogleAuthError::Unavailable(e.to_string()))?;

        match headers {
            CacheableResource::New { data, .. } => bearer_from_headers(&data),
            CacheableResource::NotModified => Err(GoogleAuthError::Unavailable(
                "credentials returned no headers".to_string(),
            )),
        }
    }
}

/// Token part of an `Authorization: Bearer ...` header
fn bearer_from_headers(headers: &HeaderMap) -> Result<String, GoogleAuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(GoogleAuthError::MissingBearer)
}
