//! Canonical domain types for the attestation workflow, plus the traits
//! behind which the registry database hides.
//!
//! `ExtractedAttestation` is created once per request by the extractor and
//! immutable afterwards. Every leaf is independently optional: an absent
//! analyzer field becomes `None` (or `false` for the signature flag), never
//! an error — downstream rules treat `None` as "unknown".

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::outbound::OutboundError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatientInfo {
    pub full_name: Option<String>,
    pub national_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub postal_city: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DoctorInfo {
    /// Name with title markers ("Dr.", "Arts", "Doctor") already stripped.
    pub full_name: Option<String>,
    /// Normalized to canonical `NNNNN-NN` form when present.
    pub registry_number: Option<String>,
    pub address: Option<String>,
    pub postal_city: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IncapacityPeriod {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Date the certificate itself was issued.
    pub certificate_date: Option<NaiveDate>,
    pub may_leave_home: Option<bool>,
}

/// Canonical record of one uploaded absence certificate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedAttestation {
    pub patient: PatientInfo,
    pub doctor: DoctorInfo,
    pub incapacity: IncapacityPeriod,
    pub has_signature: bool,
    /// Analyzer-produced free text, display only.
    pub summary: Option<String>,
}

// ---------------------------------------------------------------------------
// Doctor registry
// ---------------------------------------------------------------------------

/// One row of the doctor registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryDoctor {
    pub registry_number: String,
    pub first_name: Option<String>,
    pub last_name: String,
    pub city: Option<String>,
}

impl RegistryDoctor {
    pub fn full_name(&self) -> String {
        match &self.first_name {
            Some(first) => format!("{first} {}", self.last_name),
            None => self.last_name.clone(),
        }
    }
}

/// Which matching tier produced the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Exact,
    Fuzzy,
    None,
}

/// Outcome of the doctor registry check. `fraud_detected` is always the
/// negation of `doctor_found` — an unverifiable doctor is treated as fraud.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorVerdict {
    pub doctor_found: bool,
    pub fraud_detected: bool,
    pub match_tier: MatchTier,
    pub matched: Option<RegistryDoctor>,
}

impl DoctorVerdict {
    pub fn exact(row: RegistryDoctor) -> Self {
        DoctorVerdict {
            doctor_found: true,
            fraud_detected: false,
            match_tier: MatchTier::Exact,
            matched: Some(row),
        }
    }

    pub fn fuzzy(row: RegistryDoctor) -> Self {
        DoctorVerdict {
            doctor_found: true,
            fraud_detected: false,
            match_tier: MatchTier::Fuzzy,
            matched: Some(row),
        }
    }

    pub fn not_found() -> Self {
        DoctorVerdict {
            doctor_found: false,
            fraud_detected: true,
            match_tier: MatchTier::None,
            matched: None,
        }
    }
}

/// Registry lookups. Unreachability is an `OutboundError` (technical),
/// never a fraud verdict.
pub trait DoctorRegistry {
    fn find_by_registry_number(
        &self,
        number: &str,
    ) -> Result<Option<RegistryDoctor>, OutboundError>;

    fn find_by_name_and_location(
        &self,
        last_name: &str,
        city_hint: Option<&str>,
    ) -> Result<Option<RegistryDoctor>, OutboundError>;
}

// ---------------------------------------------------------------------------
// Fraud cases
// ---------------------------------------------------------------------------

/// Persisted record flagging a document for human review. Created at most
/// once per request; owned by the case store once inserted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FraudCase {
    pub case_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub patient_name: Option<String>,
    pub patient_national_id: Option<String>,
    pub doctor_name: Option<String>,
    pub claimed_registry_number: Option<String>,
    pub claimed_start_date: Option<NaiveDate>,
    pub claimed_end_date: Option<NaiveDate>,
    pub reason: String,
    pub priority: i64,
    pub status: String,
}

/// Outbound case insertion.
pub trait CaseStore {
    fn insert_case(&self, case: &FraudCase) -> Result<Uuid, OutboundError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_constructors_keep_fraud_negated() {
        let row = RegistryDoctor {
            registry_number: "12345-67".into(),
            first_name: Some("An".into()),
            last_name: "Peeters".into(),
            city: Some("Gent".into()),
        };

        let exact = DoctorVerdict::exact(row.clone());
        assert!(exact.doctor_found && !exact.fraud_detected);
        assert_eq!(exact.match_tier, MatchTier::Exact);

        let fuzzy = DoctorVerdict::fuzzy(row);
        assert!(fuzzy.doctor_found && !fuzzy.fraud_detected);
        assert_eq!(fuzzy.match_tier, MatchTier::Fuzzy);

        let none = DoctorVerdict::not_found();
        assert!(!none.doctor_found && none.fraud_detected);
        assert_eq!(none.match_tier, MatchTier::None);
        assert!(none.matched.is_none());
    }

    #[test]
    fn registry_doctor_full_name() {
        let row = RegistryDoctor {
            registry_number: "12345-67".into(),
            first_name: None,
            last_name: "Peeters".into(),
            city: None,
        };
        assert_eq!(row.full_name(), "Peeters");
    }
}
