//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Environment-driven configuration helpers
//! - Google service-account credentials and OAuth2 access tokens
//! - The outbound HTTP client used for Google APIs

pub mod config;
pub mod google;
pub mod http_client;
