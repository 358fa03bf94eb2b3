//! Business-rule validation over the canonical attestation.
//!
//! Checks run in a fixed order and each appends at most one rule to the
//! list. A check whose required field is unknown is skipped silently —
//! missing data is never itself a rule failure, it only disables the check
//! that needs it.

use chrono::NaiveDate;

use crate::pipeline::types::ExtractedAttestation;

/// Stable identifier of a fired rule. Locale rendering lives in
/// `crate::messages`; the payloads carry the offending dates for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    MissingSignature,
    StartDateInFuture(NaiveDate),
    EndDateInFuture(NaiveDate),
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    CertificateDateInFuture(NaiveDate),
}

impl ValidationRule {
    /// Rule key, independent of payload — used in logs and tests.
    pub fn key(&self) -> &'static str {
        match self {
            ValidationRule::MissingSignature => "missing_signature",
            ValidationRule::StartDateInFuture(_) => "start_date_in_future",
            ValidationRule::EndDateInFuture(_) => "end_date_in_future",
            ValidationRule::EndBeforeStart { .. } => "end_before_start",
            ValidationRule::CertificateDateInFuture(_) => "certificate_date_in_future",
        }
    }
}

/// Evaluate all rules against the attestation as of `today`.
///
/// Deterministic and order-stable: the same attestation and date always
/// produce the identical list.
pub fn validate(attestation: &ExtractedAttestation, today: NaiveDate) -> Vec<ValidationRule> {
    let mut fired = Vec::new();

    if !attestation.has_signature {
        fired.push(ValidationRule::MissingSignature);
    }

    if let Some(start) = attestation.incapacity.start_date {
        if start > today {
            fired.push(ValidationRule::StartDateInFuture(start));
        }
    }

    if let Some(end) = attestation.incapacity.end_date {
        if end > today {
            fired.push(ValidationRule::EndDateInFuture(end));
        }
    }

    if let (Some(start), Some(end)) = (
        attestation.incapacity.start_date,
        attestation.incapacity.end_date,
    ) {
        if end < start {
            fired.push(ValidationRule::EndBeforeStart { start, end });
        }
    }

    if let Some(cert) = attestation.incapacity.certificate_date {
        if cert > today {
            fired.push(ValidationRule::CertificateDateInFuture(cert));
        }
    }

    if !fired.is_empty() {
        tracing::info!(
            rules = ?fired.iter().map(|r| r.key()).collect::<Vec<_>>(),
            "Attestation failed business rules"
        );
    }

    fired
}
