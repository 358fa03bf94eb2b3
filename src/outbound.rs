//! Uniform error taxonomy for outbound collaborator calls.
//!
//! Every call that leaves the process (document analyzer, doctor registry,
//! case store) returns one of three failure kinds instead of a raw
//! client/driver error. The orchestrator pattern-matches on the kind to
//! decide the response category; a technical failure is never reported as
//! fraud or as a validation error.

use serde::Serialize;
use thiserror::Error;

/// Collaborator names used in diagnostics and in the technical response.
pub mod service {
    pub const ANALYZER: &str = "document analyzer";
    pub const REGISTRY: &str = "doctor registry";
    pub const CASE_STORE: &str = "case store";
}

/// Failure of an outbound collaborator call.
#[derive(Debug, Clone, Error)]
pub enum OutboundError {
    #[error("{service}: call timed out after {after_secs}s")]
    Timeout { service: &'static str, after_secs: u64 },

    #[error("{service}: connection failed: {detail}")]
    Connection { service: &'static str, detail: String },

    #[error("{service}: call failed: {detail}")]
    Call { service: &'static str, detail: String },
}

/// Sub-kind of an outbound failure, used for status mapping and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboundKind {
    Timeout,
    Connection,
    Call,
}

impl OutboundError {
    /// Name of the collaborator that failed.
    pub fn service(&self) -> &'static str {
        match self {
            OutboundError::Timeout { service, .. }
            | OutboundError::Connection { service, .. }
            | OutboundError::Call { service, .. } => service,
        }
    }

    pub fn kind(&self) -> OutboundKind {
        match self {
            OutboundError::Timeout { .. } => OutboundKind::Timeout,
            OutboundError::Connection { .. } => OutboundKind::Connection,
            OutboundError::Call { .. } => OutboundKind::Call,
        }
    }

    /// Map a reqwest error to the taxonomy, tagging the failing service.
    pub fn from_reqwest(service: &'static str, timeout_secs: u64, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            OutboundError::Timeout {
                service,
                after_secs: timeout_secs,
            }
        } else if e.is_connect() {
            OutboundError::Connection {
                service,
                detail: e.to_string(),
            }
        } else {
            OutboundError::Call {
                service,
                detail: e.to_string(),
            }
        }
    }
}
