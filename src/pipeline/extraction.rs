//! Field extractor: maps raw analyzer fields onto the canonical attestation.
//!
//! Total by construction — every lookup defaults to `None`/`false`, unknown
//! analyzer fields are ignored, unparseable dates become `None`. The only
//! logic beyond the mapping table is registry-number normalization and
//! doctor-name title stripping.

use chrono::NaiveDate;
use regex::Regex;

use crate::analyzer::RawAnalysis;
use crate::pipeline::types::{
    DoctorInfo, ExtractedAttestation, IncapacityPeriod, PatientInfo,
};

/// Build the canonical attestation from a raw analysis result.
pub fn extract(raw: &RawAnalysis) -> ExtractedAttestation {
    let patient = PatientInfo {
        full_name: raw.string_field("PatientName").map(str::to_string),
        national_id: raw.string_field("PatientNationalNumber").map(str::to_string),
        birth_date: raw.date_field("PatientBirthDate").and_then(parse_date),
        address: raw.string_field("PatientAddress").map(str::to_string),
        postal_city: raw.string_field("PatientPostalCodeCity").map(str::to_string),
    };

    let doctor_name_raw = raw.string_field("DoctorName");
    let doctor = DoctorInfo {
        full_name: doctor_name_raw.map(strip_doctor_title).filter(|s| !s.is_empty()),
        registry_number: extract_registry_number(raw, doctor_name_raw),
        address: raw.string_field("DoctorAddress").map(str::to_string),
        postal_city: raw.string_field("DoctorPostalCodeCity").map(str::to_string),
        phone: raw.string_field("DoctorPhoneNumber").map(str::to_string),
    };

    let incapacity = IncapacityPeriod {
        start_date: raw.date_field("IncapacityStartDate").and_then(parse_date),
        end_date: raw.date_field("IncapacityEndDate").and_then(parse_date),
        certificate_date: raw.date_field("CertificateDate").and_then(parse_date),
        may_leave_home: raw.bool_field("IsAllowedToLeaveHouse"),
    };

    let attestation = ExtractedAttestation {
        patient,
        doctor,
        incapacity,
        has_signature: raw.bool_field("DoctorHasSigned").unwrap_or(false),
        summary: raw.string_field("Summary").map(str::to_string),
    };

    tracing::debug!(
        patient = attestation.patient.full_name.as_deref().unwrap_or("?"),
        doctor = attestation.doctor.full_name.as_deref().unwrap_or("?"),
        registry_number = attestation.doctor.registry_number.as_deref().unwrap_or("?"),
        signature = attestation.has_signature,
        "Extracted attestation fields"
    );

    attestation
}

/// Registry number from the discrete field when present, otherwise recovered
/// by pattern scan over the doctor-name text and the summary.
fn extract_registry_number(raw: &RawAnalysis, doctor_name: Option<&str>) -> Option<String> {
    if let Some(field) = raw.string_field("DoctorRegistryNumber") {
        if let Some(n) = normalize_registry_number(field) {
            return Some(n);
        }
    }

    doctor_name
        .and_then(find_registry_number_in_text)
        .or_else(|| raw.string_field("Summary").and_then(find_registry_number_in_text))
}

/// Normalize a registry number to canonical `NNNNN-NN` form.
///
/// Accepts `NNNNN-NN`, `NNNNN/NN` and bare `NNNNNNN` digit runs; anything
/// else is not a registry number. Idempotent on its own output.
pub fn normalize_registry_number(text: &str) -> Option<String> {
    let pattern = Regex::new(r"^\s*(\d{5})\s*[-/]\s*(\d{2})\s*$").unwrap();
    if let Some(cap) = pattern.captures(text) {
        return Some(format!("{}-{}", &cap[1], &cap[2]));
    }

    let bare = Regex::new(r"^\s*(\d{5})(\d{2})\s*$").unwrap();
    bare.captures(text)
        .map(|cap| format!("{}-{}", &cap[1], &cap[2]))
}

/// Scan free text for the first registry-number shaped token.
pub fn find_registry_number_in_text(text: &str) -> Option<String> {
    let pattern = Regex::new(r"\b(\d{5})\s*[-/]\s*(\d{2})\b|\b(\d{7})\b").unwrap();
    let cap = pattern.captures(text)?;

    if let (Some(head), Some(tail)) = (cap.get(1), cap.get(2)) {
        Some(format!("{}-{}", head.as_str(), tail.as_str()))
    } else {
        let digits = cap.get(3)?.as_str();
        Some(format!("{}-{}", &digits[..5], &digits[5..]))
    }
}

/// Strip leading title markers ("Dr.", "Arts", "Doctor") from a doctor name.
pub fn strip_doctor_title(name: &str) -> String {
    let mut tokens = name.split_whitespace().peekable();
    while let Some(token) = tokens.peek() {
        let bare = token.trim_end_matches('.').to_ascii_lowercase();
        if matches!(bare.as_str(), "dr" | "dokter" | "doctor" | "arts") {
            tokens.next();
        } else {
            break;
        }
    }
    tokens.collect::<Vec<_>>().join(" ")
}

/// Analyzer dates are ISO `YYYY-MM-DD`; scanned documents occasionally yield
/// the Belgian `DD-MM-YYYY` / `DD/MM/YYYY` forms.
fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%d-%m-%Y"))
        .or_else(|_| NaiveDate::parse_from_str(text, "%d/%m/%Y"))
        .ok()
}
