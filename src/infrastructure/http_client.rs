//! HTTP transport for the validation web services
//!
//! Both W3C services take a `multipart/form-data` upload and answer with an
//! HTML page. `FormTransport` is the seam the validators depend on;
//! `HttpClient` implements it on reqwest.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::validation_error::{ValidationError, ValidationResult};

/// One file in a multipart upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl FilePart {
    pub fn new(
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            content,
        }
    }
}

/// Posts a multipart form and returns the response body
#[async_trait]
pub trait FormTransport: Send + Sync {
    async fn post(
        &self,
        url: &str,
        fields: &[(String, String)],
        files: Vec<FilePart>,
        cancel: &CancellationToken,
    ) -> ValidationResult<Vec<u8>>;
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("page-validate/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_seconds: 30,
        }
    }
}

/// `FormTransport` backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub const fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    fn build_form(
        url: &str,
        fields: &[(String, String)],
        files: Vec<FilePart>,
    ) -> ValidationResult<Form> {
        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name.clone(), value.clone());
        }
        for file in files {
            let part = Part::bytes(file.content)
                .file_name(file.file_name)
                .mime_str(&file.content_type)
                .map_err(|e| {
                    ValidationError::transport(
                        url,
                        format!("invalid content type {:?}: {e}", file.content_type),
                    )
                })?;
            form = form.part(file.field_name, part);
        }
        Ok(form)
    }
}

#[async_trait]
impl FormTransport for HttpClient {
    async fn post(
        &self,
        url: &str,
        fields: &[(String, String)],
        files: Vec<FilePart>,
        cancel: &CancellationToken,
    ) -> ValidationResult<Vec<u8>> {
        if cancel.is_cancelled() {
            return Err(ValidationError::Cancelled);
        }

        let form = Self::build_form(url, fields, files)?;
        info!("Posting form to {}", url);

        let response = tokio::select! {
            result = self.client.post(url).multipart(form).send() => {
                result.map_err(|e| ValidationError::transport(url, e))?
            },
            () = cancel.cancelled() => {
                warn!("🛑 HTTP request cancelled for URL: {}", url);
                return Err(ValidationError::Cancelled);
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(ValidationError::transport(
                url,
                format!("HTTP request failed with status {status}"),
            ));
        }

        let body = tokio::select! {
            result = response.bytes() => {
                result.map_err(|e| ValidationError::transport(url, e))?
            },
            () = cancel.cancelled() => {
                warn!("🛑 Response reading cancelled for URL: {}", url);
                return Err(ValidationError::Cancelled);
            }
        };

        debug!("Received {} bytes from {} ({})", body.len(), url, status);
        Ok(body.to_vec())
    }
}
