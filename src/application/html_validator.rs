//! HTML validation through the Nu Html Checker

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::domain::ValidationReport;
use crate::infrastructure::config::EndpointConfig;
use crate::infrastructure::http_client::{FilePart, FormTransport};
use crate::infrastructure::parsing::{HtmlReportParser, ResultPageParser};
use crate::infrastructure::validation_error::ValidationResult;

/// Validates HTML documents with the Nu Html Checker
pub struct HtmlValidator<T: FormTransport> {
    transport: Arc<T>,
    endpoint: String,
    parser: HtmlReportParser,
}

impl<T: FormTransport> HtmlValidator<T> {
    pub fn new(transport: Arc<T>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            parser: HtmlReportParser::new(),
        }
    }

    pub fn from_config(transport: Arc<T>, endpoints: &EndpointConfig) -> Self {
        Self::new(transport, endpoints.nu_checker_url.clone())
    }

    /// Uploads `document` and parses the checker's result page.
    ///
    /// Every issue comes back as an error; the checker's warnings aren't
    /// extracted. A result page whose success marker contradicts its issues
    /// is returned with `inconsistency` set.
    pub async fn validate(
        &self,
        document: &[u8],
        cancel: &CancellationToken,
    ) -> ValidationResult<ValidationReport> {
        let fields = vec![("action".to_string(), "check".to_string())];
        let files = vec![FilePart::new(
            "uploaded_file",
            "page.html",
            "text/html",
            document.to_vec(),
        )];

        let raw_response = self
            .transport
            .post(&self.endpoint, &fields, files, cancel)
            .await?;
        let report = self.parser.parse_report(raw_response);

        info!("HTML validation found {} issue(s)", report.issues.len());
        Ok(report)
    }
}
