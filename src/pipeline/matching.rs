//! Two-tier doctor matching against the registry.
//!
//! Tier 1 looks up the normalized registry number; on a hit the verdict is
//! `Exact` and tier 2 is never consulted. Tier 2 falls back to a
//! case-insensitive last-name lookup refined by a city hint derived from
//! the extracted address data. No surviving match in either tier means the
//! practitioner cannot be verified — a fraud verdict. A registry that
//! cannot be reached is a technical failure, never fraud.

use crate::outbound::OutboundError;
use crate::pipeline::extraction::strip_doctor_title;
use crate::pipeline::types::{DoctorInfo, DoctorRegistry, DoctorVerdict};

/// Run the two-tier match for the extracted doctor fields.
pub fn match_doctor(
    registry: &dyn DoctorRegistry,
    doctor: &DoctorInfo,
) -> Result<DoctorVerdict, OutboundError> {
    // Tier 1: exact registry-number lookup.
    if let Some(number) = doctor.registry_number.as_deref() {
        if let Some(row) = registry.find_by_registry_number(number)? {
            tracing::info!(registry_number = %number, "Doctor verified by registry number");
            return Ok(DoctorVerdict::exact(row));
        }
        tracing::warn!(registry_number = %number, "Registry number not found, trying fuzzy match");
    }

    // Tier 2: last name + location, with whatever partial data exists.
    let Some(last_name) = last_name_of(doctor) else {
        tracing::warn!("No doctor name extracted, cannot verify");
        return Ok(DoctorVerdict::not_found());
    };

    let hint = city_hint(doctor);
    if let Some(row) = registry.find_by_name_and_location(&last_name, hint.as_deref())? {
        tracing::info!(last_name = %last_name, "Doctor verified by name and location");
        return Ok(DoctorVerdict::fuzzy(row));
    }

    tracing::warn!(
        last_name = %last_name,
        registry_number = doctor.registry_number.as_deref().unwrap_or("?"),
        "Doctor not found in registry"
    );
    Ok(DoctorVerdict::not_found())
}

/// Last name for the fuzzy lookup: final token of the title-stripped name.
fn last_name_of(doctor: &DoctorInfo) -> Option<String> {
    let name = doctor.full_name.as_deref()?;
    strip_doctor_title(name)
        .split_whitespace()
        .last()
        .map(str::to_string)
}

/// City hint for the fuzzy lookup: the postal-city field with any leading
/// postal code stripped, else the address text after its last comma.
fn city_hint(doctor: &DoctorInfo) -> Option<String> {
    if let Some(postal_city) = doctor.postal_city.as_deref() {
        let city = postal_city
            .trim_start_matches(|c: char| c.is_ascii_digit() || c.is_whitespace())
            .trim();
        if !city.is_empty() {
            return Some(city.to_string());
        }
    }

    let address = doctor.address.as_deref()?;
    let (_, tail) = address.rsplit_once(',')?;
    let tail = tail.trim();
    (!tail.is_empty()).then(|| tail.to_string())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::pipeline::types::{MatchTier, RegistryDoctor};

    fn peeters() -> RegistryDoctor {
        RegistryDoctor {
            registry_number: "12345-67".into(),
            first_name: Some("An".into()),
            last_name: "Peeters".into(),
            city: Some("Gent".into()),
        }
    }

    /// Registry stub with scripted tier responses and tier-2 call counting.
    struct ScriptedRegistry {
        exact: Option<RegistryDoctor>,
        fuzzy: Option<RegistryDoctor>,
        fuzzy_calls: Cell<u32>,
    }

    impl ScriptedRegistry {
        fn new(exact: Option<RegistryDoctor>, fuzzy: Option<RegistryDoctor>) -> Self {
            Self {
                exact,
                fuzzy,
                fuzzy_calls: Cell::new(0),
            }
        }
    }

    impl DoctorRegistry for ScriptedRegistry {
        fn find_by_registry_number(
            &self,
            _number: &str,
        ) -> Result<Option<RegistryDoctor>, OutboundError> {
            Ok(self.exact.clone())
        }

        fn find_by_name_and_location(
            &self,
            _last_name: &str,
            _city_hint: Option<&str>,
        ) -> Result<Option<RegistryDoctor>, OutboundError> {
            self.fuzzy_calls.set(self.fuzzy_calls.get() + 1);
            Ok(self.fuzzy.clone())
        }
    }

    struct UnreachableRegistry;

    impl DoctorRegistry for UnreachableRegistry {
        fn find_by_registry_number(
            &self,
            _number: &str,
        ) -> Result<Option<RegistryDoctor>, OutboundError> {
            Err(OutboundError::Connection {
                service: crate::outbound::service::REGISTRY,
                detail: "unable to open database".into(),
            })
        }

        fn find_by_name_and_location(
            &self,
            _last_name: &str,
            _city_hint: Option<&str>,
        ) -> Result<Option<RegistryDoctor>, OutboundError> {
            Err(OutboundError::Connection {
                service: crate::outbound::service::REGISTRY,
                detail: "unable to open database".into(),
            })
        }
    }

    fn doctor(name: Option<&str>, number: Option<&str>) -> DoctorInfo {
        DoctorInfo {
            full_name: name.map(str::to_string),
            registry_number: number.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn exact_hit_never_consults_tier_two() {
        // Tier 2 is scripted to return a different doctor; it must not matter.
        let other = RegistryDoctor {
            registry_number: "99999-99".into(),
            first_name: None,
            last_name: "Other".into(),
            city: None,
        };
        let registry = ScriptedRegistry::new(Some(peeters()), Some(other));

        let verdict =
            match_doctor(&registry, &doctor(Some("An Peeters"), Some("12345-67"))).unwrap();

        assert_eq!(verdict.match_tier, MatchTier::Exact);
        assert_eq!(verdict.matched.unwrap().registry_number, "12345-67");
        assert_eq!(registry.fuzzy_calls.get(), 0);
    }

    #[test]
    fn tier_two_runs_on_tier_one_miss() {
        let registry = ScriptedRegistry::new(None, Some(peeters()));
        let verdict =
            match_doctor(&registry, &doctor(Some("An Peeters"), Some("00000-00"))).unwrap();

        assert!(verdict.doctor_found);
        assert_eq!(verdict.match_tier, MatchTier::Fuzzy);
        assert_eq!(registry.fuzzy_calls.get(), 1);
    }

    #[test]
    fn tier_two_runs_without_registry_number() {
        let registry = ScriptedRegistry::new(None, Some(peeters()));
        let verdict = match_doctor(&registry, &doctor(Some("An Peeters"), None)).unwrap();
        assert_eq!(verdict.match_tier, MatchTier::Fuzzy);
    }

    #[test]
    fn no_name_at_all_is_unconditional_fraud() {
        let registry = ScriptedRegistry::new(None, Some(peeters()));
        let verdict = match_doctor(&registry, &doctor(None, None)).unwrap();

        assert!(verdict.fraud_detected);
        assert_eq!(verdict.match_tier, MatchTier::None);
        // Tier 2 must not even be attempted without a name.
        assert_eq!(registry.fuzzy_calls.get(), 0);
    }

    #[test]
    fn no_match_in_either_tier_is_fraud() {
        let registry = ScriptedRegistry::new(None, None);
        let verdict =
            match_doctor(&registry, &doctor(Some("An Peeters"), Some("12345-67"))).unwrap();
        assert!(verdict.fraud_detected);
        assert!(!verdict.doctor_found);
    }

    #[test]
    fn unreachable_registry_is_technical_not_fraud() {
        let verdict = match_doctor(
            &UnreachableRegistry,
            &doctor(Some("An Peeters"), Some("12345-67")),
        );
        let err = verdict.unwrap_err();
        assert_eq!(err.service(), crate::outbound::service::REGISTRY);
    }

    #[test]
    fn city_hint_prefers_postal_city_without_code() {
        let d = DoctorInfo {
            postal_city: Some("9000 Gent".into()),
            address: Some("Stationsplein 3, Brugge".into()),
            ..Default::default()
        };
        assert_eq!(city_hint(&d).as_deref(), Some("Gent"));
    }

    #[test]
    fn city_hint_falls_back_to_address_tail() {
        let d = DoctorInfo {
            address: Some("Stationsplein 3, Brugge".into()),
            ..Default::default()
        };
        assert_eq!(city_hint(&d).as_deref(), Some("Brugge"));
    }

    #[test]
    fn last_name_strips_title() {
        let d = doctor(Some("Dr. An Peeters"), None);
        assert_eq!(last_name_of(&d).as_deref(), Some("Peeters"));
    }
}
