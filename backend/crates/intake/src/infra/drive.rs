//! Google Drive v3 file storage

use std::sync::Arc;

use bytes::Bytes;
use futures::{StreamExt, stream};
use platform::google::AccessTokenProvider;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use super::{endpoint, ensure_success};
use crate::domain::entities::UploadedFile;
use crate::domain::repository::FileStorage;
use crate::domain::value_objects::RemoteFile;
use crate::error::{IntakeError, IntakeResult};

pub const DRIVE_BASE_URL: &str = "https://www.googleapis.com";

const SERVICE: &str = "Google Drive";
const FILE_FIELDS: &str = "id,name,webViewLink";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    web_view_link: Option<String>,
}

impl From<DriveFile> for RemoteFile {
    fn from(file: DriveFile) -> Self {
        RemoteFile {
            id: file.id,
            name: file.name,
            web_view_link: file.web_view_link,
        }
    }
}

/// Drive-backed [`FileStorage`]
pub struct DriveFileStorage<T> {
    http: reqwest::Client,
    tokens: Arc<T>,
    base_url: String,
}

impl<T> Clone for DriveFileStorage<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            tokens: self.tokens.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl<T> DriveFileStorage<T>
where
    T: AccessTokenProvider + Sync,
{
    pub fn new(http: reqwest::Client, tokens: Arc<T>) -> Self {
        Self {
            http,
            tokens,
            base_url: DRIVE_BASE_URL.to_string(),
        }
    }

    /// Override the API host (tests, emulators)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn bearer(&self) -> IntakeResult<String> {
        Ok(self.tokens.access_token().await?)
    }

    async fn parse_file(response: reqwest::Response) -> IntakeResult<RemoteFile> {
        let file: DriveFile = response
            .json()
            .await
            .map_err(|e| IntakeError::upstream(SERVICE, format!("unreadable response: {e}")))?;
        Ok(file.into())
    }
}

/// Opening and closing framing of a `multipart/related` upload body
fn multipart_related_frame(
    boundary: &str,
    metadata: &serde_json::Value,
    mime_type: &str,
) -> (String, String) {
    let head = format!(
        "--{boundary}\r\n\
         Content-Type: application/json; charset=UTF-8\r\n\r\n\
         {metadata}\r\n\
         --{boundary}\r\n\
         Content-Type: {mime_type}\r\n\r\n"
    );
    let tail = format!("\r\n--{boundary}--\r\n");
    (head, tail)
}

impl<T> FileStorage for DriveFileStorage<T>
where
    T: AccessTokenProvider + Sync,
{
    async fn create_file(&self, folder_id: &str, file: &UploadedFile) -> IntakeResult<RemoteFile> {
        let token = self.bearer().await?;
        let url = endpoint(&self.base_url, &["upload", "drive", "v3", "files"], SERVICE)?;

        let metadata = json!({
            "name": file.original_name(),
            "parents": [folder_id],
            "mimeType": file.mime_type(),
        });
        let boundary = format!("intake-{}", Uuid::new_v4().simple());
        let (head, tail) = multipart_related_frame(&boundary, &metadata, file.mime_type());

        let content = tokio::fs::File::open(file.path()).await?;
        let content_len = content.metadata().await?.len();
        let body_len = head.len() as u64 + content_len + tail.len() as u64;

        let body = stream::once(async move { Ok::<_, std::io::Error>(Bytes::from(head)) })
            .chain(ReaderStream::new(content))
            .chain(stream::once(async move { Ok(Bytes::from(tail)) }));

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .query(&[
                ("uploadType", "multipart"),
                ("fields", FILE_FIELDS),
                ("supportsAllDrives", "true"),
            ])
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={boundary}"),
            )
            .header(CONTENT_LENGTH, body_len)
            .body(reqwest::Body::wrap_stream(body))
            .send()
            .await
            .map_err(|e| IntakeError::upstream(SERVICE, format!("upload request failed: {e}")))?;

        let response = ensure_success(response, SERVICE).await?;
        Self::parse_file(response).await
    }

    async fn share_with_anyone(&self, file_id: &str) -> IntakeResult<()> {
        let token = self.bearer().await?;
        let url = endpoint(
            &self.base_url,
            &["drive", "v3", "files", file_id, "permissions"],
            SERVICE,
        )?;

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .query(&[("supportsAllDrives", "true")])
            .json(&json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await
            .map_err(|e| {
                IntakeError::upstream(SERVICE, format!("permission request failed: {e}"))
            })?;

        ensure_success(response, SERVICE).await?;
        Ok(())
    }

    async fn file_metadata(&self, file_id: &str) -> IntakeResult<RemoteFile> {
        let token = self.bearer().await?;
        let url = endpoint(&self.base_url, &["drive", "v3", "files", file_id], SERVICE)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(&[("fields", FILE_FIELDS), ("supportsAllDrives", "true")])
            .send()
            .await
            .map_err(|e| IntakeError::upstream(SERVICE, format!("metadata request failed: {e}")))?;

        let response = ensure_success(response, SERVICE).await?;
        Self::parse_file(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use platform::google::GoogleAuthError;
    use std::io::Write;

    struct StaticToken;

    impl AccessTokenProvider for StaticToken {
        async fn access_token(&self) -> Result<String, GoogleAuthError> {
            Ok("test-token".to_string())
        }
    }

    fn storage(base_url: &str) -> DriveFileStorage<StaticToken> {
        DriveFileStorage::new(reqwest::Client::new(), Arc::new(StaticToken)).with_base_url(base_url)
    }

    fn uploaded(name: &str, mime: &str, content: &[u8]) -> UploadedFile {
        let mut temp = tempfile::NamedTempFile::new().unwrap();
        temp.write_all(content).unwrap();
        UploadedFile::new(name, mime, content.len() as u64, temp)
    }

    #[test]
    fn test_multipart_related_frame() {
        let metadata = json!({ "name": "a.png" });
        let (head, tail) = multipart_related_frame("b0", &metadata, "image/png");
        assert_eq!(
            head,
            "--b0\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{\"name\":\"a.png\"}\r\n--b0\r\nContent-Type: image/png\r\n\r\n"
        );
        assert_eq!(tail, "\r\n--b0--\r\n");
    }

    #[tokio::test]
    async fn test_create_file_sends_metadata_and_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload/drive/v3/files")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("uploadType".into(), "multipart".into()),
                Matcher::UrlEncoded("fields".into(), FILE_FIELDS.into()),
            ]))
            .match_header("authorization", "Bearer test-token")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/related; boundary=intake-".into()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#""parents":\["folder-1"\]"#.into()),
                Matcher::Regex(r#""name":"photo.jpg""#.into()),
                Matcher::Regex("JPEGDATA".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"file-1","name":"photo.jpg"}"#)
            .create_async()
            .await;

        let file = uploaded("photo.jpg", "image/jpeg", b"JPEGDATA");
        let created = storage(&server.url())
            .create_file("folder-1", &file)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(created.id, "file-1");
        assert_eq!(created.name.as_deref(), Some("photo.jpg"));
        assert!(created.web_view_link.is_none());
    }

    #[tokio::test]
    async fn test_create_file_failure_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload/drive/v3/files")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"Insufficient permissions","status":"PERMISSION_DENIED"}}"#)
            .create_async()
            .await;

        let file = uploaded("photo.jpg", "image/jpeg", b"JPEGDATA");
        let err = storage(&server.url())
            .create_file("folder-1", &file)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 500);
        let message = err.to_string();
        assert!(message.contains("Google Drive"));
        assert!(message.contains("403"));
        assert!(message.contains("Insufficient permissions"));
    }

    #[tokio::test]
    async fn test_share_with_anyone_posts_reader_permission() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/drive/v3/files/file-1/permissions")
            .match_query(Matcher::Any)
            .match_body(Matcher::Json(json!({ "role": "reader", "type": "anyone" })))
            .with_status(200)
            .with_body(r#"{"id":"anyoneWithLink","type":"anyone","role":"reader"}"#)
            .create_async()
            .await;

        storage(&server.url())
            .share_with_anyone("file-1")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_file_metadata_reads_view_link() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/drive/v3/files/file-1")
            .match_query(Matcher::UrlEncoded("fields".into(), FILE_FIELDS.into()))
            .with_status(200)
            .with_body(
                r#"{"id":"file-1","name":"photo.jpg","webViewLink":"https://drive.google.com/file/d/file-1/view"}"#,
            )
            .create_async()
            .await;

        let metadata = storage(&server.url()).file_metadata("file-1").await.unwrap();
        assert_eq!(metadata.name.as_deref(), Some("photo.jpg"));
        assert_eq!(
            metadata.web_view_link.as_deref(),
            Some("https://drive.google.com/file/d/file-1/view")
        );
    }
}
