//! SQLite-backed fraud case store.
//!
//! Insert-only from the workflow's point of view: a case is written once
//! with "Open" status and owned by reviewers afterwards.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{connect_for, query_failed};
use crate::outbound::{service, OutboundError};
use crate::pipeline::types::{CaseStore, FraudCase};

pub struct SqliteCaseStore {
    db_path: PathBuf,
}

impl SqliteCaseStore {
    pub fn new(db_path: &Path) -> Self {
        Self {
            db_path: db_path.to_path_buf(),
        }
    }

    fn connect(&self) -> Result<Connection, OutboundError> {
        connect_for(service::CASE_STORE, &self.db_path)
    }
}

impl CaseStore for SqliteCaseStore {
    fn insert_case(&self, case: &FraudCase) -> Result<Uuid, OutboundError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO fraud_cases (
                 case_id, created_at, patient_name, patient_national_id,
                 doctor_name, claimed_registry_number, claimed_start_date,
                 claimed_end_date, reason, priority, status
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                case.case_id.to_string(),
                case.created_at.to_rfc3339(),
                case.patient_name,
                case.patient_national_id,
                case.doctor_name,
                case.claimed_registry_number,
                case.claimed_start_date.map(|d| d.to_string()),
                case.claimed_end_date.map(|d| d.to_string()),
                case.reason,
                case.priority,
                case.status,
            ],
        )
        .map_err(|e| query_failed(service::CASE_STORE, e))?;

        Ok(case.case_id)
    }
}

/// Read one case back (tests and review tooling).
pub fn get_case(conn: &Connection, case_id: &Uuid) -> rusqlite::Result<Option<FraudCase>> {
    let result = conn.query_row(
        "SELECT case_id, created_at, patient_name, patient_national_id,
                doctor_name, claimed_registry_number, claimed_start_date,
                claimed_end_date, reason, priority, status
         FROM fraud_cases WHERE case_id = ?1",
        params![case_id.to_string()],
        |row| {
            Ok(FraudCase {
                case_id: row
                    .get::<_, String>(0)?
                    .parse()
                    .unwrap_or_else(|_| Uuid::nil()),
                created_at: row
                    .get::<_, String>(1)?
                    .parse::<DateTime<Utc>>()
                    .unwrap_or_default(),
                patient_name: row.get(2)?,
                patient_national_id: row.get(3)?,
                doctor_name: row.get(4)?,
                claimed_registry_number: row.get(5)?,
                claimed_start_date: row
                    .get::<_, Option<String>>(6)?
                    .and_then(|s| s.parse::<NaiveDate>().ok()),
                claimed_end_date: row
                    .get::<_, Option<String>>(7)?
                    .and_then(|s| s.parse::<NaiveDate>().ok()),
                reason: row.get(8)?,
                priority: row.get(9)?,
                status: row.get(10)?,
            })
        },
    );

    match result {
        Ok(case) => Ok(Some(case)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}
