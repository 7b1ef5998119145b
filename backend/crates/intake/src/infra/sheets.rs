//! Google Sheets v4 submission ledger

use std::sync::Arc;

use platform::google::AccessTokenProvider;
use serde_json::json;

use super::{endpoint, ensure_success};
use crate::domain::repository::SubmissionLedger;
use crate::error::{IntakeError, IntakeResult};

pub const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

const SERVICE: &str = "Google Sheets";

/// Sheets-backed [`SubmissionLedger`]
pub struct SheetsLedger<T> {
    http: reqwest::Client,
    tokens: Arc<T>,
    base_url: String,
}

impl<T> SheetsLedger<T>
where
    T: AccessTokenProvider + Sync,
{
    pub fn new(http: reqwest::Client, tokens: Arc<T>) -> Self {
        Self {
            http,
            tokens,
            base_url: SHEETS_BASE_URL.to_string(),
        }
    }

    /// Override the API host (tests, emulators)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl<T> SubmissionLedger for SheetsLedger<T>
where
    T: AccessTokenProvider + Sync,
{
    async fn append_row(
        &self,
        spreadsheet_id: &str,
        range: &str,
        row: &[String],
    ) -> IntakeResult<()> {
        let token = self.tokens.access_token().await?;
        let append_target = format!("{range}:append");
        let url = endpoint(
            &self.base_url,
            &["v4", "spreadsheets", spreadsheet_id, "values", append_target.as_str()],
            SERVICE,
        )?;

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .map_err(|e| IntakeError::upstream(SERVICE, format!("append request failed: {e}")))?;

        ensure_success(response, SERVICE).await?;
        tracing::debug!(spreadsheet_id = %spreadsheet_id, range = %range, "Row appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use platform::google::GoogleAuthError;

    struct StaticToken;

    impl AccessTokenProvider for StaticToken {
        async fn access_token(&self) -> Result<String, GoogleAuthError> {
            Ok("test-token".to_string())
        }
    }

    struct RejectingToken;

    impl AccessTokenProvider for RejectingToken {
        async fn access_token(&self) -> Result<String, GoogleAuthError> {
            Err(GoogleAuthError::Unavailable("invalid_grant".to_string()))
        }
    }

    fn row() -> Vec<String> {
        [
            "2026-10-19T09:30:00.000Z",
            "Ali",
            "Valiyev",
            "+998901234567",
            "1",
            "a.jpg",
            "https://drive.google.com/file/d/f1/view",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[tokio::test]
    async fn test_append_row_posts_user_entered_values() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v4/spreadsheets/sheet-1/values/A:G:append")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("valueInputOption".into(), "USER_ENTERED".into()),
                Matcher::UrlEncoded("insertDataOption".into(), "INSERT_ROWS".into()),
            ]))
            .match_header("authorization", "Bearer test-token")
            .match_body(Matcher::Json(json!({ "values": [row()] })))
            .with_status(200)
            .with_body(r#"{"spreadsheetId":"sheet-1","updates":{"updatedRows":1}}"#)
            .create_async()
            .await;

        let ledger =
            SheetsLedger::new(reqwest::Client::new(), Arc::new(StaticToken)).with_base_url(server.url());
        ledger.append_row("sheet-1", "A:G", &row()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_append_row_failure_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v4/spreadsheets/sheet-1/values/A:G:append")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#)
            .create_async()
            .await;

        let ledger =
            SheetsLedger::new(reqwest::Client::new(), Arc::new(StaticToken)).with_base_url(server.url());
        let err = ledger.append_row("sheet-1", "A:G", &row()).await.unwrap_err();

        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("Google Sheets"));
        assert!(err.to_string().contains("Requested entity was not found."));
    }

    #[tokio::test]
    async fn test_token_failure_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let ledger = SheetsLedger::new(reqwest::Client::new(), Arc::new(RejectingToken))
            .with_base_url(server.url());
        let err = ledger.append_row("sheet-1", "A:G", &row()).await.unwrap_err();

        assert!(err.to_string().contains("Google authentication"));
        mock.assert_async().await;
    }
}
