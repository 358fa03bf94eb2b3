//! Fraud case recording: priority scoring and case creation.
//!
//! A case is warranted when the doctor could not be verified or at least
//! one business rule fired. Priority weights a missing signature at 50, an
//! unverified doctor at 30 and every further rule failure at 10; higher
//! means more urgent review. The orchestrator calls this exactly once per
//! request, so a case is never created twice.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::messages::{self, Language};
use crate::outbound::OutboundError;
use crate::pipeline::types::{CaseStore, DoctorVerdict, ExtractedAttestation, FraudCase};
use crate::pipeline::validation::ValidationRule;

const STATUS_OPEN: &str = "Open";

const WEIGHT_MISSING_SIGNATURE: i64 = 50;
const WEIGHT_DOCTOR_NOT_FOUND: i64 = 30;
const WEIGHT_PER_RULE: i64 = 10;

/// Review priority for a failed attestation.
///
/// The signature failure is charged through its dedicated 50-point weight,
/// not again through the per-rule weight.
pub fn priority(rules: &[ValidationRule], verdict: &DoctorVerdict) -> i64 {
    let missing_signature = rules
        .iter()
        .any(|r| matches!(r, ValidationRule::MissingSignature));
    let other_rules = rules
        .iter()
        .filter(|r| !matches!(r, ValidationRule::MissingSignature))
        .count() as i64;

    let mut score = 0;
    if missing_signature {
        score += WEIGHT_MISSING_SIGNATURE;
    }
    if verdict.fraud_detected {
        score += WEIGHT_DOCTOR_NOT_FOUND;
    }
    score + WEIGHT_PER_RULE * other_rules
}

/// Human-readable concatenation of the triggering conditions.
pub fn build_reason(rules: &[ValidationRule], verdict: &DoctorVerdict, lang: Language) -> String {
    let mut parts = Vec::new();
    if verdict.fraud_detected {
        parts.push(messages::fraud_reason_not_found(lang).to_string());
    }
    for rule in rules {
        parts.push(messages::rule_message(rule, lang));
    }
    parts.join("; ")
}

/// Record a fraud case when warranted; returns the new case id, if any.
pub fn record_if_warranted(
    store: &dyn CaseStore,
    attestation: &ExtractedAttestation,
    rules: &[ValidationRule],
    verdict: &DoctorVerdict,
    lang: Language,
    now: DateTime<Utc>,
) -> Result<Option<Uuid>, OutboundError> {
    if !verdict.fraud_detected && rules.is_empty() {
        return Ok(None);
    }

    let case = FraudCase {
        case_id: Uuid::new_v4(),
        created_at: now,
        patient_name: attestation.patient.full_name.clone(),
        patient_national_id: attestation.patient.national_id.clone(),
        doctor_name: attestation.doctor.full_name.clone(),
        claimed_registry_number: attestation.doctor.registry_number.clone(),
        claimed_start_date: attestation.incapacity.start_date,
        claimed_end_date: attestation.incapacity.end_date,
        reason: build_reason(rules, verdict, lang),
        priority: priority(rules, verdict),
        status: STATUS_OPEN.to_string(),
    };

    let case_id = store.insert_case(&case)?;
    tracing::info!(
        case_id = %case_id,
        priority = case.priority,
        fraud = verdict.fraud_detected,
        rules = rules.len(),
        "Fraud case recorded"
    );
    Ok(Some(case_id))
}
