//! CSS validation through the W3C CSS Validation Service

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::domain::{DocumentKind, ValidationReport};
use crate::infrastructure::config::{CssParameters, EndpointConfig};
use crate::infrastructure::http_client::{FilePart, FormTransport};
use crate::infrastructure::parsing::{CssReportParser, ResultPageParser};
use crate::infrastructure::validation_error::ValidationResult;

/// Validates stylesheets, or the CSS inside HTML documents
pub struct CssValidator<T: FormTransport> {
    transport: Arc<T>,
    endpoint: String,
    parameters: CssParameters,
    parser: CssReportParser,
}

impl<T: FormTransport> CssValidator<T> {
    pub fn new(transport: Arc<T>, endpoint: impl Into<String>, parameters: CssParameters) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            parameters,
            parser: CssReportParser::new(),
        }
    }

    pub fn from_config(
        transport: Arc<T>,
        endpoints: &EndpointConfig,
        parameters: CssParameters,
    ) -> Self {
        Self::new(transport, endpoints.css_validator_url.clone(), parameters)
    }

    /// Uploads `document` declared as `kind` and parses the result page.
    ///
    /// The service happily "validates" a stylesheet declared as HTML (and
    /// the reverse) without finding anything, so `kind` must be right.
    pub async fn validate(
        &self,
        document: &[u8],
        kind: DocumentKind,
        cancel: &CancellationToken,
    ) -> ValidationResult<ValidationReport> {
        let fields = self.parameters.form_fields();
        let files = vec![FilePart::new(
            "file",
            "data",
            kind.mime_type(),
            document.to_vec(),
        )];

        let raw_response = self
            .transport
            .post(&self.endpoint, &fields, files, cancel)
            .await?;
        let report = self.parser.parse_report(raw_response);

        info!(
            "CSS validation ({}) found {} issue(s)",
            kind.mime_type(),
            report.issues.len()
        );
        Ok(report)
    }
}
