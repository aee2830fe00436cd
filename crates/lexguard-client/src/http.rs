//! HTTP client for the analysis backend's ingestion and catalog endpoints.

use std::path::{Path, PathBuf};

use lexguard_core::{FeatureRecord, LawProvisionRecord, ReportEntry, ReportKind, enter_report};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("only PDF documents can be analysed, got {0}")]
    UnsupportedFile(PathBuf),
    #[error("{endpoint} reported failure")]
    Rejected { endpoint: String },
}

/// Raw result of one upload, handed to the report view as-is.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub kind: ReportKind,
    pub file_name: String,
    pub body: String,
}

impl UploadOutcome {
    /// Enter the report view with this result.
    pub fn report(&self) -> ReportEntry {
        enter_report(Some(&self.body))
    }
}

#[derive(Deserialize)]
struct CatalogEnvelope<T> {
    #[serde(default)]
    success: bool,
    response: Option<Vec<T>>,
}

/// Client for the analysis backend.
pub struct AnalysisClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    /// Create a client for the given backend base URL.
    ///
    /// `base_url` should be like `http://127.0.0.1:8080` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a document for analysis.
    ///
    /// Sends a multipart form with the file bytes under `file` and the
    /// discriminator under `type`. The response body is returned unparsed.
    pub async fn upload(
        &self,
        path: &Path,
        kind: ReportKind,
    ) -> Result<UploadOutcome, ClientError> {
        if !is_pdf(path) {
            return Err(ClientError::UnsupportedFile(path.to_path_buf()));
        }
        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part).text("type", kind.as_str());

        let url = format!("{}/api/upload", self.base_url);
        info!(url = %url, kind = %kind, file = %file_name, "uploading document");
        let resp = self.client.post(&url).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }
        let body = resp.text().await?;

        info!(bytes = body.len(), "upload analysed");
        Ok(UploadOutcome {
            kind,
            file_name,
            body,
        })
    }

    /// Fetch the stored feature catalog.
    pub async fn list_features(&self) -> Result<Vec<FeatureRecord>, ClientError> {
        self.fetch_catalog("api/feature").await
    }

    /// Fetch the stored law provision catalog.
    pub async fn list_provisions(&self) -> Result<Vec<LawProvisionRecord>, ClientError> {
        self.fetch_catalog("api/law").await
    }

    async fn fetch_catalog<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<Vec<T>, ClientError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        info!(url = %url, "fetching catalog");
        let resp = self.client.post(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }
        let body = resp.text().await?;

        let records = decode_catalog(&body, &url)?;
        info!(count = records.len(), "fetched catalog");
        Ok(records)
    }
}

fn decode_catalog<T: DeserializeOwned>(body: &str, endpoint: &str) -> Result<Vec<T>, ClientError> {
    let envelope: CatalogEnvelope<T> = serde_json::from_str(body)?;
    if !envelope.success {
        return Err(ClientError::Rejected {
            endpoint: endpoint.to_string(),
        });
    }
    Ok(envelope.response.unwrap_or_default())
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}
