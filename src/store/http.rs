use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::error::StoreError;
use crate::store::{sanitize_path, EntryKind, ListedEntry, RemoteFileStore, StoreFuture};

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Row returned by `GET /api/files/list`.
#[derive(Debug, Deserialize)]
struct ListRow {
    name: String,
    #[serde(rename = "type")]
    kind: EntryKind,
}

/// Error body returned by the files API (`{"error": ..., "message": ...}`).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl ErrorBody {
    fn text(&self) -> String {
        match (&self.error, &self.message) {
            (Some(e), Some(m)) => format!("{}: {}", e, m),
            (Some(e), None) => e.clone(),
            (None, Some(m)) => m.clone(),
            (None, None) => String::new(),
        }
    }
}

struct Inner {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// [`RemoteFileStore`] speaking the Cloud IDE files API under
/// `{base_url}/api/files`, authenticated with a bearer token.
#[derive(Clone)]
pub struct HttpFileStore {
    inner: Arc<Inner>,
}

impl HttpFileStore {
    pub fn new(base_url: &str, token: Option<String>) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            inner: Arc::new(Inner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
                token,
            }),
        })
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}/api/files/{}", self.inner.base_url, endpoint);
        let builder = self.inner.client.request(method, url);
        match &self.inner.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Classify a transport-level failure.
fn map_transport(err: reqwest::Error) -> StoreError {
    if err.is_decode() {
        StoreError::Rejected(format!("unexpected response: {}", err))
    } else {
        StoreError::Transient(err.to_string())
    }
}

/// Classify a non-success HTTP response.
///
/// The API reports most domain failures as `400` with a message, so the
/// message text decides between `AlreadyExists`, `NotFound` and `Rejected`.
pub(crate) fn classify_status(status: StatusCode, message: &str, path: &str) -> StoreError {
    let lower = message.to_lowercase();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => StoreError::Unauthorized,
        StatusCode::NOT_FOUND => StoreError::NotFound(path.to_string()),
        StatusCode::CONFLICT => StoreError::Conflict(message.to_string()),
        StatusCode::BAD_REQUEST if lower.contains("already exists") => {
            StoreError::AlreadyExists(path.to_string())
        }
        StatusCode::BAD_REQUEST if lower.contains("does not exist") => {
            StoreError::NotFound(path.to_string())
        }
        s if s.is_server_error() || s == StatusCode::TOO_MANY_REQUESTS => {
            StoreError::Transient(format!("HTTP {}", s))
        }
        s => StoreError::Rejected(if message.is_empty() {
            format!("HTTP {}", s)
        } else {
            message.to_string()
        }),
    }
}

async fn check(response: Response, path: &str) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body: ErrorBody = response.json().await.unwrap_or_default();
    Err(classify_status(status, &body.text(), path))
}

async fn send(builder: RequestBuilder, path: &str) -> Result<Response, StoreError> {
    let response = builder.send().await.map_err(map_transport)?;
    check(response, path).await
}

impl RemoteFileStore for HttpFileStore {
    fn list_children(&self, path: String) -> StoreFuture<Vec<ListedEntry>> {
        let path = sanitize_path(&path);
        let builder = self.request(Method::GET, "list").query(&[("path", &path)]);
        Box::pin(async move {
            let rows: Vec<ListRow> = send(builder, &path)
                .await?
                .json()
                .await
                .map_err(map_transport)?;
            Ok(rows
                .into_iter()
                .map(|row| ListedEntry {
                    name: row.name,
                    kind: row.kind,
                })
                .collect())
        })
    }

    fn read_file(&self, path: String) -> StoreFuture<String> {
        let path = sanitize_path(&path);
        let builder = self.request(Method::GET, "file").query(&[("path", &path)]);
        Box::pin(async move {
            send(builder, &path)
                .await?
                .json::<String>()
                .await
                .map_err(map_transport)
        })
    }

    fn write_file(&self, path: String, content: String) -> StoreFuture<()> {
        let path = sanitize_path(&path);
        let builder = self
            .request(Method::PUT, "file")
            .json(&json!({ "path": path, "content": content }));
        Box::pin(async move { send(builder, &path).await.map(|_| ()) })
    }

    fn create_file(&self, parent: String, name: String) -> StoreFuture<()> {
        let parent = sanitize_path(&parent);
        let builder = self
            .request(Method::POST, "file")
            .json(&json!({ "path": parent, "name": name, "content": "" }));
        let display = format!("{}/{}", parent, name);
        Box::pin(async move { send(builder, &display).await.map(|_| ()) })
    }

    fn create_directory(&self, parent: String, name: String) -> StoreFuture<()> {
        let parent = sanitize_path(&parent);
        let builder = self
            .request(Method::POST, "directory")
            .json(&json!({ "path": parent, "name": name }));
        let display = format!("{}/{}", parent, name);
        Box::pin(async move { send(builder, &display).await.map(|_| ()) })
    }

    fn delete_entry(&self, path: String, kind: EntryKind) -> StoreFuture<()> {
        let path = sanitize_path(&path);
        let endpoint = match kind {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
        };
        let builder = self
            .request(Method::DELETE, endpoint)
            .query(&[("path", &path)]);
        Box::pin(async move { send(builder, &path).await.map(|_| ()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_statuses() {
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED, "", "src"),
            StoreError::Unauthorized
        );
        // flask-jwt-extended answers 422 for malformed tokens
        assert_eq!(
            classify_status(StatusCode::UNPROCESSABLE_ENTITY, "", "src"),
            StoreError::Unauthorized
        );
    }

    #[test]
    fn bad_request_messages_are_classified() {
        assert_eq!(
            classify_status(
                StatusCode::BAD_REQUEST,
                "File already exists: src/a.txt",
                "src/a.txt"
            ),
            StoreError::AlreadyExists("src/a.txt".into())
        );
        assert_eq!(
            classify_status(StatusCode::BAD_REQUEST, "Path does not exist: src", "src"),
            StoreError::NotFound("src".into())
        );
        assert_eq!(
            classify_status(
                StatusCode::BAD_REQUEST,
                "Invalid path: outside of user storage area",
                "x"
            ),
            StoreError::Rejected("Invalid path: outside of user storage area".into())
        );
    }

    #[test]
    fn server_errors_are_transient() {
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, "", "src"),
            StoreError::Transient(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, "boom", "src"),
            StoreError::Transient(_)
        ));
    }

    #[test]
    fn not_found_and_conflict() {
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND, "", "a.txt"),
            StoreError::NotFound("a.txt".into())
        );
        assert_eq!(
            classify_status(StatusCode::CONFLICT, "stale", "a.txt"),
            StoreError::Conflict("stale".into())
        );
    }

    #[test]
    fn error_body_text_joins_fields() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error": "Failed to list files", "message": "boom"}"#)
                .unwrap();
        assert_eq!(body.text(), "Failed to list files: boom");
        let body: ErrorBody = serde_json::from_str(r#"{"error": "nope"}"#).unwrap();
        assert_eq!(body.text(), "nope");
    }

    #[test]
    fn list_rows_deserialize_from_api_shape() {
        let rows: Vec<ListRow> = serde_json::from_str(
            r#"[{"name": "src", "path": "src", "type": "directory", "size": 0, "modified": 1.0},
                {"name": "a.txt", "path": "a.txt", "type": "file", "size": 3, "modified": 2.0}]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, EntryKind::Directory);
        assert_eq!(rows[1].name, "a.txt");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let store = HttpFileStore::new("http://localhost:5000/", None).unwrap();
        assert_eq!(store.inner.base_url, "http://localhost:5000");
    }
}
