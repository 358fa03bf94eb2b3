//! HTTP client for the document-understanding service.
//!
//! The service is asynchronous on the wire: submitting a document returns an
//! `Operation-Location` URL which is polled until the analysis succeeds or
//! fails. The whole exchange is bounded by a configurable ceiling (default
//! two minutes); past it the call is abandoned and reported as a timeout.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Deserialize;

use super::types::{DocumentAnalyzer, FieldValue, RawAnalysis};
use crate::outbound::{service, OutboundError};

const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Production analyzer client.
pub struct ContentClient {
    endpoint: String,
    api_key: String,
    analyzer_id: String,
    client: reqwest::blocking::Client,
    ceiling_secs: u64,
}

impl ContentClient {
    pub fn new(endpoint: &str, api_key: &str, analyzer_id: &str, ceiling_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(ceiling_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            analyzer_id: analyzer_id.to_string(),
            client,
            ceiling_secs,
        }
    }

    fn map_err(&self, e: reqwest::Error) -> OutboundError {
        OutboundError::from_reqwest(service::ANALYZER, self.ceiling_secs, e)
    }

    fn submit(&self, file_bytes: &[u8], file_name: &str) -> Result<String, OutboundError> {
        let url = format!(
            "{}/analyzers/{}:analyze?api-version=2025-05-01-preview",
            self.endpoint, self.analyzer_id
        );

        tracing::info!(document = %file_name, analyzer = %self.analyzer_id, "Submitting document for analysis");

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Content-Type", "application/octet-stream")
            .body(file_bytes.to_vec())
            .send()
            .map_err(|e| self.map_err(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(OutboundError::Call {
                service: service::ANALYZER,
                detail: format!("submit returned HTTP {}: {body}", status.as_u16()),
            });
        }

        response
            .headers()
            .get("Operation-Location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| OutboundError::Call {
                service: service::ANALYZER,
                detail: "submit response missing Operation-Location header".into(),
            })
    }

    fn poll(&self, operation_url: &str) -> Result<RawAnalysis, OutboundError> {
        let started = Instant::now();

        loop {
            if started.elapsed().as_secs() >= self.ceiling_secs {
                return Err(OutboundError::Timeout {
                    service: service::ANALYZER,
                    after_secs: self.ceiling_secs,
                });
            }

            std::thread::sleep(POLL_INTERVAL);

            let response = self
                .client
                .get(operation_url)
                .header("Ocp-Apim-Subscription-Key", &self.api_key)
                .send()
                .map_err(|e| self.map_err(e))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(OutboundError::Call {
                    service: service::ANALYZER,
                    detail: format!("poll returned HTTP {}: {body}", status.as_u16()),
                });
            }

            let envelope: OperationEnvelope = response.json().map_err(|e| OutboundError::Call {
                service: service::ANALYZER,
                detail: format!("malformed operation response: {e}"),
            })?;

            match envelope.status.to_ascii_lowercase().as_str() {
                "succeeded" => return Ok(envelope.into_raw_analysis()),
                "failed" => {
                    return Err(OutboundError::Call {
                        service: service::ANALYZER,
                        detail: "analysis operation reported failure".into(),
                    })
                }
                // "notstarted" / "running" — keep polling.
                _ => continue,
            }
        }
    }
}

impl DocumentAnalyzer for ContentClient {
    fn analyze(&self, file_bytes: &[u8], file_name: &str) -> Result<RawAnalysis, OutboundError> {
        let operation_url = self.submit(file_bytes, file_name)?;
        let raw = self.poll(&operation_url)?;
        tracing::info!(
            document = %file_name,
            fields = raw.fields.len(),
            "Document analysis completed"
        );
        Ok(raw)
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Operation status envelope: `{"status": "...", "result": {"contents": [{"fields": {...}}]}}`.
#[derive(Deserialize)]
struct OperationEnvelope {
    status: String,
    #[serde(default)]
    result: Option<OperationResult>,
}

#[derive(Deserialize)]
struct OperationResult {
    #[serde(default)]
    contents: Vec<ContentItem>,
}

#[derive(Deserialize)]
struct ContentItem {
    #[serde(default)]
    fields: HashMap<String, FieldValue>,
}

impl OperationEnvelope {
    /// Fields of the first content item; an empty map when the service
    /// returned no contents (the extractor treats that as all-unknown).
    fn into_raw_analysis(self) -> RawAnalysis {
        let fields = self
            .result
            .and_then(|r| r.contents.into_iter().next())
            .map(|c| c.fields)
            .unwrap_or_default();

        if fields.is_empty() {
            tracing::warn!("Analysis succeeded but returned no fields");
        }

        RawAnalysis { fields }
    }
}

// ---------------------------------------------------------------------------
// Mock
// ---------------------------------------------------------------------------

/// Mock analyzer for tests — returns a configured result or failure.
pub struct MockAnalyzer {
    outcome: Result<RawAnalysis, OutboundError>,
}

impl MockAnalyzer {
    pub fn returning(raw: RawAnalysis) -> Self {
        Self { outcome: Ok(raw) }
    }

    pub fn failing(err: OutboundError) -> Self {
        Self { outcome: Err(err) }
    }
}

impl DocumentAnalyzer for MockAnalyzer {
    fn analyze(&self, _file_bytes: &[u8], _file_name: &str) -> Result<RawAnalysis, OutboundError> {
        self.outcome.clone()
    }
}
