//! Google service-account access
//!
//! - `credentials` - resolve and parse the service-account key
//! - `token` - scoped OAuth2 access tokens for that key

pub mod credentials;
pub mod token;

pub use credentials::{CredentialSource, ServiceAccountKey};
pub use token::{
    AccessTokenProvider, DRIVE_SCOPE, GoogleAuthError, SPREADSHEETS_SCOPE,
    ServiceAccountTokenSource,
};
