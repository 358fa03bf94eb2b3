//! Shared state for the API layer.

use std::sync::Arc;

use crate::messages::Language;
use crate::pipeline::AttestationProcessor;

/// Shared context for all API routes.
///
/// The processor is synchronous; handlers run it on the blocking pool.
#[derive(Clone)]
pub struct ApiContext {
    pub processor: Arc<AttestationProcessor>,
    pub default_lang: Language,
}

impl ApiContext {
    pub fn new(processor: Arc<AttestationProcessor>, default_lang: Language) -> Self {
        Self {
            processor,
            default_lang,
        }
    }
}
