//! User-facing message catalogue (Dutch / French / English).
//!
//! The decision core keys every outcome by a stable identifier
//! (`ValidationRule`, `OutboundError`, label enums); this module is the only
//! place where those identifiers are rendered to locale text. Unknown
//! language codes fall back to Dutch, the primary locale of the service.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::pipeline::validation::ValidationRule;

/// Supported UI languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Nl,
    Fr,
    En,
}

impl FromStr for Language {
    type Err = std::convert::Infallible;

    // Unsupported codes fall back to Dutch rather than erroring.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "fr" => Language::Fr,
            "en" => Language::En,
            _ => Language::Nl,
        })
    }
}

/// Display labels of the result `details` block. The label set and its
/// order are part of the wire contract with the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    FileName,
    ProcessedAt,
    Status,
    Patient,
    NationalId,
    BirthDate,
    PatientAddress,
    PatientPostalCity,
    Doctor,
    RegistryNumber,
    DoctorAddress,
    DoctorPostalCity,
    DoctorPhone,
    CaseId,
    IncapacityFrom,
    IncapacityUntil,
    CertificateDate,
    Summary,
    MayLeaveHome,
    Signature,
    Errors,
    Reason,
    Verification,
    Service,
    FailureKind,
    FileSize,
}

pub fn label(label: Label, lang: Language) -> &'static str {
    use Label::*;
    use Language::*;
    match (label, lang) {
        (FileName, Nl) => "Bestandsnaam",
        (FileName, Fr) => "Nom du fichier",
        (FileName, En) => "File name",
        (ProcessedAt, Nl) => "Verwerkt op",
        (ProcessedAt, Fr) => "Traité le",
        (ProcessedAt, En) => "Processed at",
        (Status, Nl) => "Status",
        (Status, Fr) => "Statut",
        (Status, En) => "Status",
        (Patient, Nl) => "Patiënt",
        (Patient, Fr) => "Patient",
        (Patient, En) => "Patient",
        (NationalId, Nl) => "Rijksregisternummer",
        (NationalId, Fr) => "Numéro de registre national",
        (NationalId, En) => "National register number",
        (BirthDate, Nl) => "Geboortedatum",
        (BirthDate, Fr) => "Date de naissance",
        (BirthDate, En) => "Birth date",
        (PatientAddress, Nl) => "Adres patiënt",
        (PatientAddress, Fr) => "Adresse du patient",
        (PatientAddress, En) => "Patient address",
        (PatientPostalCity, Nl) => "Postcode en gemeente patiënt",
        (PatientPostalCity, Fr) => "Code postal et commune du patient",
        (PatientPostalCity, En) => "Patient postal code and city",
        (Doctor, Nl) => "Arts",
        (Doctor, Fr) => "Médecin",
        (Doctor, En) => "Doctor",
        (RegistryNumber, Nl) => "RIZIV-nummer",
        (RegistryNumber, Fr) => "Numéro INAMI",
        (RegistryNumber, En) => "Registry number",
        (DoctorAddress, Nl) => "Adres arts",
        (DoctorAddress, Fr) => "Adresse du médecin",
        (DoctorAddress, En) => "Doctor address",
        (DoctorPostalCity, Nl) => "Postcode en gemeente arts",
        (DoctorPostalCity, Fr) => "Code postal et commune du médecin",
        (DoctorPostalCity, En) => "Doctor postal code and city",
        (DoctorPhone, Nl) => "Telefoonnummer arts",
        (DoctorPhone, Fr) => "Téléphone du médecin",
        (DoctorPhone, En) => "Doctor phone number",
        (CaseId, Nl) => "Zaak ID",
        (CaseId, Fr) => "ID du dossier",
        (CaseId, En) => "Case ID",
        (IncapacityFrom, Nl) => "Onmogelijkheid vanaf",
        (IncapacityFrom, Fr) => "Incapacité à partir du",
        (IncapacityFrom, En) => "Incapacity from",
        (IncapacityUntil, Nl) => "Onmogelijkheid tot",
        (IncapacityUntil, Fr) => "Incapacité jusqu'au",
        (IncapacityUntil, En) => "Incapacity until",
        (CertificateDate, Nl) => "Datum attest",
        (CertificateDate, Fr) => "Date de l'attestation",
        (CertificateDate, En) => "Certificate date",
        (Summary, Nl) => "Samenvatting",
        (Summary, Fr) => "Résumé",
        (Summary, En) => "Summary",
        (MayLeaveHome, Nl) => "Mag huis verlaten",
        (MayLeaveHome, Fr) => "Peut quitter le domicile",
        (MayLeaveHome, En) => "May leave home",
        (Signature, Nl) => "Handtekening",
        (Signature, Fr) => "Signature",
        (Signature, En) => "Signature",
        (Errors, Nl) => "Fouten",
        (Errors, Fr) => "Erreurs",
        (Errors, En) => "Errors",
        (Reason, Nl) => "Reden",
        (Reason, Fr) => "Raison",
        (Reason, En) => "Reason",
        (Verification, Nl) => "Verificatie",
        (Verification, Fr) => "Vérification",
        (Verification, En) => "Verification",
        (Service, Nl) => "Dienst",
        (Service, Fr) => "Service",
        (Service, En) => "Service",
        (FailureKind, Nl) => "Fouttype",
        (FailureKind, Fr) => "Type d'erreur",
        (FailureKind, En) => "Failure kind",
        (FileSize, Nl) => "Bestandsgrootte",
        (FileSize, Fr) => "Taille du fichier",
        (FileSize, En) => "File size",
    }
}

pub fn yes(lang: Language) -> &'static str {
    match lang {
        Language::Nl => "Ja",
        Language::Fr => "Oui",
        Language::En => "Yes",
    }
}

pub fn no(lang: Language) -> &'static str {
    match lang {
        Language::Nl => "Nee",
        Language::Fr => "Non",
        Language::En => "No",
    }
}

pub fn not_found(lang: Language) -> &'static str {
    match lang {
        Language::Nl => "Niet gevonden",
        Language::Fr => "Non trouvé",
        Language::En => "Not found",
    }
}

pub fn unknown(lang: Language) -> &'static str {
    match lang {
        Language::Nl => "Onbekend",
        Language::Fr => "Inconnu",
        Language::En => "Unknown",
    }
}

pub fn status_approved(lang: Language) -> &'static str {
    match lang {
        Language::Nl => "Goedgekeurd",
        Language::Fr => "Approuvé",
        Language::En => "Approved",
    }
}

pub fn status_rejected(lang: Language) -> &'static str {
    match lang {
        Language::Nl => "Afgekeurd",
        Language::Fr => "Rejeté",
        Language::En => "Rejected",
    }
}

fn fmt_date(d: NaiveDate) -> String {
    d.format("%d-%m-%Y").to_string()
}

/// Render a fired validation rule as user-facing text.
pub fn rule_message(rule: &ValidationRule, lang: Language) -> String {
    match (rule, lang) {
        (ValidationRule::MissingSignature, Language::Nl) => {
            "Er ontbreekt een handtekening van de arts op het document".to_string()
        }
        (ValidationRule::MissingSignature, Language::Fr) => {
            "La signature du médecin est manquante sur le document".to_string()
        }
        (ValidationRule::MissingSignature, Language::En) => {
            "The doctor's signature is missing on the document".to_string()
        }
        (ValidationRule::StartDateInFuture(d), Language::Nl) => {
            format!("Onmogelijkheid startdatum ligt in de toekomst: {}", fmt_date(*d))
        }
        (ValidationRule::StartDateInFuture(d), Language::Fr) => {
            format!("La date de début d'incapacité est dans le futur: {}", fmt_date(*d))
        }
        (ValidationRule::StartDateInFuture(d), Language::En) => {
            format!("Incapacity start date is in the future: {}", fmt_date(*d))
        }
        (ValidationRule::EndDateInFuture(d), Language::Nl) => {
            format!("Onmogelijkheid einddatum ligt in de toekomst: {}", fmt_date(*d))
        }
        (ValidationRule::EndDateInFuture(d), Language::Fr) => {
            format!("La date de fin d'incapacité est dans le futur: {}", fmt_date(*d))
        }
        (ValidationRule::EndDateInFuture(d), Language::En) => {
            format!("Incapacity end date is in the future: {}", fmt_date(*d))
        }
        (ValidationRule::EndBeforeStart { start, end }, Language::Nl) => format!(
            "Einddatum ({}) ligt vóór de startdatum ({})",
            fmt_date(*end),
            fmt_date(*start)
        ),
        (ValidationRule::EndBeforeStart { start, end }, Language::Fr) => format!(
            "La date de fin ({}) précède la date de début ({})",
            fmt_date(*end),
            fmt_date(*start)
        ),
        (ValidationRule::EndBeforeStart { start, end }, Language::En) => format!(
            "End date ({}) precedes start date ({})",
            fmt_date(*end),
            fmt_date(*start)
        ),
        (ValidationRule::CertificateDateInFuture(d), Language::Nl) => {
            format!("Certificaat datum ligt in de toekomst: {}", fmt_date(*d))
        }
        (ValidationRule::CertificateDateInFuture(d), Language::Fr) => {
            format!("La date du certificat est dans le futur: {}", fmt_date(*d))
        }
        (ValidationRule::CertificateDateInFuture(d), Language::En) => {
            format!("Certificate date is in the future: {}", fmt_date(*d))
        }
    }
}

/// Reason recorded on a fraud case when the doctor could not be found.
pub fn fraud_reason_not_found(lang: Language) -> &'static str {
    match lang {
        Language::Nl => "Arts niet gevonden in geregistreerde artsen database",
        Language::Fr => "Médecin non trouvé dans la base de données des médecins enregistrés",
        Language::En => "Doctor not found in registered doctors database",
    }
}

/// Verification note shown on approved results, per match tier.
pub fn doctor_verified_exact(lang: Language, registry_number: &str) -> String {
    match lang {
        Language::Nl => format!("Arts geverifieerd via RIZIV-nummer: {registry_number}"),
        Language::Fr => format!("Médecin vérifié via numéro INAMI: {registry_number}"),
        Language::En => format!("Doctor verified via registry number: {registry_number}"),
    }
}

pub fn doctor_verified_fuzzy(lang: Language, name: &str) -> String {
    match lang {
        Language::Nl => format!("Arts geverifieerd via naam en stad: {name}"),
        Language::Fr => format!("Médecin vérifié via nom et ville: {name}"),
        Language::En => format!("Doctor verified via name and city: {name}"),
    }
}

pub fn result_approved(lang: Language) -> &'static str {
    match lang {
        Language::Nl => "Uw afwezigheidsattest is geldig en goedgekeurd.",
        Language::Fr => "Votre attestation d'absence est valide et approuvée.",
        Language::En => "Your absence certificate is valid and approved.",
    }
}

/// Rejection text for fraud outcomes. Says only that the practitioner
/// could not be verified; no registry internals.
pub fn result_rejected_fraud(lang: Language) -> &'static str {
    match lang {
        Language::Nl => {
            "Het document is afgekeurd. De arts kon niet worden geverifieerd \
             als geregistreerde zorgverlener."
        }
        Language::Fr => {
            "Le document a été rejeté. Le médecin n'a pas pu être vérifié \
             comme prestataire de soins enregistré."
        }
        Language::En => {
            "The document was rejected. The doctor could not be verified \
             as a registered practitioner."
        }
    }
}

pub fn result_rejected_invalid(lang: Language) -> &'static str {
    match lang {
        Language::Nl => "Uw afwezigheidsattest kon niet worden goedgekeurd.",
        Language::Fr => "Votre attestation d'absence n'a pas pu être approuvée.",
        Language::En => "Your absence certificate could not be approved.",
    }
}

/// Message for a technical failure of the named collaborator.
pub fn service_failed(lang: Language, service: &str) -> String {
    match lang {
        Language::Nl => format!("Externe dienst niet beschikbaar: {service}"),
        Language::Fr => format!("Service externe indisponible: {service}"),
        Language::En => format!("External service unavailable: {service}"),
    }
}

pub fn no_file_uploaded(lang: Language) -> &'static str {
    match lang {
        Language::Nl => "Geen bestand geüpload",
        Language::Fr => "Aucun fichier téléchargé",
        Language::En => "No file uploaded",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_dutch() {
        assert_eq!("de".parse::<Language>().unwrap(), Language::Nl);
        assert_eq!("FR".parse::<Language>().unwrap(), Language::Fr);
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
    }

    #[test]
    fn rule_messages_exist_for_all_languages() {
        let rule = ValidationRule::StartDateInFuture(
            NaiveDate::from_ymd_opt(2030, 1, 15).unwrap(),
        );
        for lang in [Language::Nl, Language::Fr, Language::En] {
            let msg = rule_message(&rule, lang);
            assert!(msg.contains("15-01-2030"), "date missing in {msg}");
        }
    }

    #[test]
    fn fraud_rejection_does_not_mention_database() {
        for lang in [Language::Nl, Language::Fr, Language::En] {
            let msg = result_rejected_fraud(lang).to_lowercase();
            assert!(!msg.contains("database"));
            assert!(!msg.contains("sql"));
        }
    }

    #[test]
    fn labels_are_nonempty_in_every_language() {
        for lang in [Language::Nl, Language::Fr, Language::En] {
            for l in [
                Label::FileName,
                Label::Status,
                Label::Patient,
                Label::RegistryNumber,
                Label::CaseId,
                Label::Reason,
            ] {
                assert!(!label(l, lang).is_empty());
            }
        }
    }
}
