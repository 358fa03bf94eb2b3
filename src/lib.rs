pub mod analyzer; // Document analysis client
pub mod api; // HTTP surface
pub mod config;
pub mod db; // Doctor registry + fraud case store
pub mod messages; // Localized labels and result texts
pub mod outbound;
pub mod pipeline; // Extraction → validation → matching → composition
