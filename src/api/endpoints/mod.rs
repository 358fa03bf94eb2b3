pub mod attestations;
pub mod health;
