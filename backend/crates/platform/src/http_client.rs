//! Outbound HTTP client for Google APIs
//!
//! Uploads can be large, so there is no whole-request deadline. Connecting
//! is bounded, and so is each individual read; a transfer that keeps making
//! progress may run as long as it needs.

use std::time::Duration;

use crate::config::{ConfigError, Env};

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpClientConfig {
    pub connect_timeout: Duration,
    /// Longest wait for any single read
    pub read_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
        }
    }
}

impl HttpClientConfig {
    /// `GOOGLE_CONNECT_TIMEOUT_SECS` and `GOOGLE_READ_TIMEOUT_SECS`, both optional
    pub fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let connect =
            env.parsed_or("GOOGLE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?;
        let read = env.parsed_or("GOOGLE_READ_TIMEOUT_SECS", DEFAULT_READ_TIMEOUT_SECS)?;
        Ok(Self {
            connect_timeout: Duration::from_secs(connect),
            read_timeout: Duration::from_secs(read),
        })
    }

    pub fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .build()
    }
}
