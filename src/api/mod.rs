//! HTTP surface for the attestation service.
//!
//! A small axum app: a health probe and a multipart upload endpoint that
//! runs the full validation workflow and returns the composed result.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod types;

pub use router::attestation_router;
pub use types::ApiContext;
