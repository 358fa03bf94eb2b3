pub mod compose;
pub mod extraction;
pub mod fraud;
pub mod matching;
pub mod processor;
pub mod types;
pub mod validation;

pub use compose::*;
pub use processor::*;
pub use types::*;
