//! Analyzer output types and the `DocumentAnalyzer` trait.
//!
//! The document-understanding service is a black box to the decision core:
//! it takes raw file bytes and returns a flat map of named fields with typed
//! values. Nothing here owns invariants — absent or oddly-typed fields are
//! simply `None` and the extractor decides what to do with them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::outbound::OutboundError;

/// Typed value of a single analyzer field. The service populates exactly one
/// of the value slots depending on the field's declared type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    #[serde(default)]
    pub value_string: Option<String>,
    #[serde(default)]
    pub value_date: Option<String>,
    #[serde(default)]
    pub value_boolean: Option<bool>,
}

impl FieldValue {
    pub fn string(s: &str) -> Self {
        FieldValue {
            value_string: Some(s.to_string()),
            ..Default::default()
        }
    }

    pub fn date(s: &str) -> Self {
        FieldValue {
            value_date: Some(s.to_string()),
            ..Default::default()
        }
    }

    pub fn boolean(b: bool) -> Self {
        FieldValue {
            value_boolean: Some(b),
            ..Default::default()
        }
    }
}

/// Raw analysis result: analyzer field name → typed value.
///
/// Produced once per request and consumed only by the field extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAnalysis {
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
}

impl RawAnalysis {
    pub fn string_field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|f| f.value_string.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn date_field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|f| f.value_date.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.fields.get(name).and_then(|f| f.value_boolean)
    }
}

/// Outbound document-analysis call.
///
/// Implemented by the HTTP client in production and by `MockAnalyzer`
/// in tests. Any transport problem surfaces as an `OutboundError`.
pub trait DocumentAnalyzer {
    fn analyze(&self, file_bytes: &[u8], file_name: &str) -> Result<RawAnalysis, OutboundError>;
}
