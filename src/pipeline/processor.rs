//! Attestation processing orchestrator.
//!
//! Single entry point that drives the full workflow:
//! analyze → extract → validate rules → match doctor → record fraud case →
//! compose result. Components never call each other — this is the only
//! place that sequences them and handles cross-cutting failures.
//!
//! Collaborators are trait objects so the orchestrator is fully testable
//! with mock implementations.

use chrono::Utc;

use crate::analyzer::DocumentAnalyzer;
use crate::messages::Language;
use crate::outbound::OutboundError;
use crate::pipeline::compose::{self, AttestationResult};
use crate::pipeline::types::{CaseStore, DoctorRegistry};
use crate::pipeline::{extraction, fraud, matching, validation};

/// Orchestrates the attestation workflow. Stateless between requests:
/// one call to [`AttestationProcessor::process`] is one linear pass.
pub struct AttestationProcessor {
    analyzer: Box<dyn DocumentAnalyzer + Send + Sync>,
    registry: Box<dyn DoctorRegistry + Send + Sync>,
    cases: Box<dyn CaseStore + Send + Sync>,
}

impl AttestationProcessor {
    pub fn new(
        analyzer: Box<dyn DocumentAnalyzer + Send + Sync>,
        registry: Box<dyn DoctorRegistry + Send + Sync>,
        cases: Box<dyn CaseStore + Send + Sync>,
    ) -> Self {
        Self {
            analyzer,
            registry,
            cases,
        }
    }

    /// Process one uploaded document end to end.
    ///
    /// Always returns a composed result: an outbound failure anywhere in
    /// the workflow short-circuits into a `technical` response (no fraud
    /// case, no validation outcome) instead of propagating.
    pub fn process(&self, file_bytes: &[u8], file_name: &str, lang: Language) -> AttestationResult {
        match self.run(file_bytes, file_name, lang) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(
                    document = %file_name,
                    service = e.service(),
                    error = %e,
                    "Attestation workflow aborted by outbound failure"
                );
                compose::technical_result(&e, lang)
            }
        }
    }

    fn run(
        &self,
        file_bytes: &[u8],
        file_name: &str,
        lang: Language,
    ) -> Result<AttestationResult, OutboundError> {
        tracing::info!(document = %file_name, size = file_bytes.len(), "Processing attestation");

        // Step 1: analyze the document (opaque remote call).
        let raw = self.analyzer.analyze(file_bytes, file_name)?;

        // Step 2: map raw fields onto the canonical attestation.
        let attestation = extraction::extract(&raw);

        // Step 3: business rules.
        let today = Utc::now().date_naive();
        let rules = validation::validate(&attestation, today);

        // Step 4: two-tier registry match.
        let verdict = matching::match_doctor(self.registry.as_ref(), &attestation.doctor)?;

        // Step 5: record a fraud case when warranted.
        let case_id = fraud::record_if_warranted(
            self.cases.as_ref(),
            &attestation,
            &rules,
            &verdict,
            lang,
            Utc::now(),
        )?;

        // Step 6: compose the response.
        Ok(compose::compose(
            &attestation,
            &rules,
            &verdict,
            case_id,
            file_name,
            Utc::now(),
            lang,
        ))
    }
}
