//! Result composer: merges extraction, validation, verdict and case id into
//! the response object the presentation layer consumes.
//!
//! The `details` label set and its order, together with the
//! `error_category` values, are the wire contract with the frontend — they
//! change shape only deliberately. Ordering is kept by construction: a
//! `Vec` of label/value entries rather than a map.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::messages::{self, Label, Language};
use crate::outbound::{OutboundError, OutboundKind};
use crate::pipeline::types::{DoctorVerdict, ExtractedAttestation, MatchTier};
use crate::pipeline::validation::ValidationRule;

/// One display entry of the result details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detail {
    pub label: String,
    pub value: String,
}

/// Outcome category of a processed attestation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    None,
    Validation,
    Fraud,
    Technical,
}

/// Final response for one processed document.
#[derive(Debug, Clone, Serialize)]
pub struct AttestationResult {
    pub valid: bool,
    pub message: String,
    pub details: Vec<Detail>,
    pub error_category: ErrorCategory,
    pub status_code: u16,
}

fn fmt_date(d: NaiveDate) -> String {
    d.format("%d-%m-%Y").to_string()
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Build the final result from the workflow outputs.
pub fn compose(
    attestation: &ExtractedAttestation,
    rules: &[ValidationRule],
    verdict: &DoctorVerdict,
    case_id: Option<Uuid>,
    file_name: &str,
    processed_at: DateTime<Utc>,
    lang: Language,
) -> AttestationResult {
    let valid = rules.is_empty() && verdict.doctor_found;

    let mut details = Vec::new();
    let mut push = |l: Label, value: String| {
        details.push(Detail {
            label: messages::label(l, lang).to_string(),
            value,
        })
    };

    push(Label::FileName, file_name.to_string());
    push(
        Label::ProcessedAt,
        processed_at.format("%d-%m-%Y %H:%M:%S").to_string(),
    );
    push(
        Label::Status,
        if valid {
            messages::status_approved(lang)
        } else {
            messages::status_rejected(lang)
        }
        .to_string(),
    );

    push(
        Label::Patient,
        attestation
            .patient
            .full_name
            .clone()
            .unwrap_or_else(|| messages::unknown(lang).to_string()),
    );
    push(Label::NationalId, opt(&attestation.patient.national_id));
    push(
        Label::BirthDate,
        attestation.patient.birth_date.map(fmt_date).unwrap_or_default(),
    );
    push(Label::PatientAddress, opt(&attestation.patient.address));
    push(Label::PatientPostalCity, opt(&attestation.patient.postal_city));

    push(
        Label::Doctor,
        attestation
            .doctor
            .full_name
            .clone()
            .unwrap_or_else(|| messages::unknown(lang).to_string()),
    );
    push(
        Label::RegistryNumber,
        attestation
            .doctor
            .registry_number
            .clone()
            .unwrap_or_else(|| messages::not_found(lang).to_string()),
    );
    push(Label::DoctorAddress, opt(&attestation.doctor.address));
    push(Label::DoctorPostalCity, opt(&attestation.doctor.postal_city));
    push(Label::DoctorPhone, opt(&attestation.doctor.phone));

    if let Some(id) = case_id {
        push(Label::CaseId, id.to_string());
    }

    if let Some(start) = attestation.incapacity.start_date {
        push(Label::IncapacityFrom, fmt_date(start));
    }
    if let Some(end) = attestation.incapacity.end_date {
        push(Label::IncapacityUntil, fmt_date(end));
    }
    if let Some(cert) = attestation.incapacity.certificate_date {
        push(Label::CertificateDate, fmt_date(cert));
    }
    if let Some(summary) = &attestation.summary {
        push(Label::Summary, summary.clone());
    }
    if let Some(may_leave) = attestation.incapacity.may_leave_home {
        push(
            Label::MayLeaveHome,
            if may_leave {
                messages::yes(lang)
            } else {
                messages::no(lang)
            }
            .to_string(),
        );
    }

    if valid {
        // Approved: note how the doctor was verified.
        match (&verdict.match_tier, &verdict.matched) {
            (MatchTier::Exact, Some(row)) => push(
                Label::Verification,
                messages::doctor_verified_exact(lang, &row.registry_number),
            ),
            (MatchTier::Fuzzy, Some(row)) => push(
                Label::Verification,
                messages::doctor_verified_fuzzy(lang, &row.full_name()),
            ),
            _ => {}
        }

        return AttestationResult {
            valid: true,
            message: messages::result_approved(lang).to_string(),
            details,
            error_category: ErrorCategory::None,
            status_code: 200,
        };
    }

    // Rejected: show the signature flag and the reason(s).
    push(
        Label::Signature,
        if attestation.has_signature {
            messages::yes(lang)
        } else {
            messages::no(lang)
        }
        .to_string(),
    );

    if verdict.fraud_detected {
        push(
            Label::Reason,
            messages::fraud_reason_not_found(lang).to_string(),
        );
        return AttestationResult {
            valid: false,
            message: messages::result_rejected_fraud(lang).to_string(),
            details,
            error_category: ErrorCategory::Fraud,
            status_code: 200,
        };
    }

    push(
        Label::Errors,
        rules
            .iter()
            .map(|r| messages::rule_message(r, lang))
            .collect::<Vec<_>>()
            .join("; "),
    );

    AttestationResult {
        valid: false,
        message: messages::result_rejected_invalid(lang).to_string(),
        details,
        error_category: ErrorCategory::Validation,
        status_code: 200,
    }
}

/// Build the response for a failed outbound call. No fraud case exists and
/// no validation outcome is reported — the document simply was not judged.
pub fn technical_result(error: &OutboundError, lang: Language) -> AttestationResult {
    let kind = match error.kind() {
        OutboundKind::Timeout => "Timeout",
        OutboundKind::Connection => "Connection",
        OutboundKind::Call => "Call",
    };

    let details = vec![
        Detail {
            label: messages::label(Label::Service, lang).to_string(),
            value: error.service().to_string(),
        },
        Detail {
            label: messages::label(Label::FailureKind, lang).to_string(),
            value: kind.to_string(),
        },
        Detail {
            label: messages::label(Label::Reason, lang).to_string(),
            value: error.to_string(),
        },
    ];

    AttestationResult {
        valid: false,
        message: messages::service_failed(lang, error.service()),
        details,
        error_category: ErrorCategory::Technical,
        status_code: match error.kind() {
            OutboundKind::Timeout => 504,
            OutboundKind::Connection | OutboundKind::Call => 502,
        },
    }
}
