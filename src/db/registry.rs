//! SQLite-backed doctor registry.
//!
//! Tier 1 is a primary-key lookup on the normalized registry number. Tier 2
//! is a case-insensitive last-name query; when a city hint is available,
//! candidates whose city overlaps the hint text are preferred, and a
//! hint that matches nothing rejects the name-only candidates (a same-name
//! doctor in another city is not a verification).

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use super::{connect_for, query_failed};
use crate::outbound::{service, OutboundError};
use crate::pipeline::types::{DoctorRegistry, RegistryDoctor};

pub struct SqliteRegistry {
    db_path: PathBuf,
}

impl SqliteRegistry {
    pub fn new(db_path: &Path) -> Self {
        Self {
            db_path: db_path.to_path_buf(),
        }
    }

    fn connect(&self) -> Result<Connection, OutboundError> {
        connect_for(service::REGISTRY, &self.db_path)
    }
}

fn row_to_doctor(row: &rusqlite::Row<'_>) -> rusqlite::Result<RegistryDoctor> {
    Ok(RegistryDoctor {
        registry_number: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        city: row.get(3)?,
    })
}

const DOCTOR_COLUMNS: &str = "registry_number, first_name, last_name, city";

impl DoctorRegistry for SqliteRegistry {
    fn find_by_registry_number(
        &self,
        number: &str,
    ) -> Result<Option<RegistryDoctor>, OutboundError> {
        let conn = self.connect()?;
        let result = conn.query_row(
            &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE registry_number = ?1"),
            params![number],
            row_to_doctor,
        );

        match result {
            Ok(doctor) => Ok(Some(doctor)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(query_failed(service::REGISTRY, e)),
        }
    }

    fn find_by_name_and_location(
        &self,
        last_name: &str,
        city_hint: Option<&str>,
    ) -> Result<Option<RegistryDoctor>, OutboundError> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {DOCTOR_COLUMNS} FROM doctors \
                 WHERE last_name = ?1 COLLATE NOCASE \
                 ORDER BY registry_number"
            ))
            .map_err(|e| query_failed(service::REGISTRY, e))?;

        let candidates: Vec<RegistryDoctor> = stmt
            .query_map(params![last_name], row_to_doctor)
            .map_err(|e| query_failed(service::REGISTRY, e))?
            .collect::<Result<_, _>>()
            .map_err(|e| query_failed(service::REGISTRY, e))?;

        if candidates.is_empty() {
            return Ok(None);
        }

        let Some(hint) = city_hint else {
            return Ok(candidates.into_iter().next());
        };

        Ok(candidates
            .into_iter()
            .find(|c| c.city.as_deref().is_some_and(|city| city_overlaps(city, hint))))
    }
}

/// Substring overlap in either direction, case-insensitive — "Gent" matches
/// the hint "9000 Gent" and "Sint-Amandsberg (Gent)" alike.
fn city_overlaps(city: &str, hint: &str) -> bool {
    let city = city.trim().to_lowercase();
    let hint = hint.trim().to_lowercase();
    if city.is_empty() || hint.is_empty() {
        return false;
    }
    city.contains(&hint) || hint.contains(&city)
}

/// Insert one registry row (seeding and tests).
pub fn insert_doctor(conn: &Connection, doctor: &RegistryDoctor) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO doctors (registry_number, first_name, last_name, city) \
         VALUES (?1, ?2, ?3, ?4)",
        params![
            doctor.registry_number,
            doctor.first_name,
            doctor.last_name,
            doctor.city,
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_database;

    fn seeded_registry() -> (tempfile::TempDir, SqliteRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.db");
        let conn = open_database(&path).unwrap();

        for (number, first, last, city) in [
            ("12345-67", Some("An"), "Peeters", Some("Gent")),
            ("23456-78", Some("Jan"), "Peeters", Some("Brugge")),
            ("34567-89", None, "De Smet", Some("Antwerpen")),
        ] {
            insert_doctor(
                &conn,
                &RegistryDoctor {
                    registry_number: number.into(),
                    first_name: first.map(str::to_string),
                    last_name: last.into(),
                    city: city.map(str::to_string),
                },
            )
            .unwrap();
        }

        (dir, SqliteRegistry::new(&path))
    }

    #[test]
    fn exact_lookup_hits_and_misses() {
        let (_dir, registry) = seeded_registry();

        let hit = registry.find_by_registry_number("12345-67").unwrap();
        assert_eq!(hit.unwrap().last_name, "Peeters");

        let miss = registry.find_by_registry_number("99999-99").unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        let (_dir, registry) = seeded_registry();
        let hit = registry
            .find_by_name_and_location("de smet", None)
            .unwrap();
        assert_eq!(hit.unwrap().registry_number, "34567-89");
    }

    #[test]
    fn city_hint_selects_among_same_name_candidates() {
        let (_dir, registry) = seeded_registry();

        let gent = registry
            .find_by_name_and_location("Peeters", Some("9000 Gent"))
            .unwrap()
            .unwrap();
        assert_eq!(gent.registry_number, "12345-67");

        let brugge = registry
            .find_by_name_and_location("Peeters", Some("Brugge"))
            .unwrap()
            .unwrap();
        assert_eq!(brugge.registry_number, "23456-78");
    }

    #[test]
    fn hint_matching_no_city_yields_none() {
        let (_dir, registry) = seeded_registry();
        let miss = registry
            .find_by_name_and_location("Peeters", Some("Hasselt"))
            .unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn no_hint_returns_first_candidate() {
        let (_dir, registry) = seeded_registry();
        let hit = registry.find_by_name_and_location("Peeters", None).unwrap();
        assert!(hit.is_some());
    }

    #[test]
    fn unknown_name_returns_none() {
        let (_dir, registry) = seeded_registry();
        let miss = registry
            .find_by_name_and_location("Nobody", Some("Gent"))
            .unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn city_overlap_is_bidirectional() {
        assert!(city_overlaps("Gent", "9000 Gent"));
        assert!(city_overlaps("Sint-Amandsberg (Gent)", "gent"));
        assert!(!city_overlaps("Gent", "Brugge"));
        assert!(!city_overlaps("", "Gent"));
    }
}
