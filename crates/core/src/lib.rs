//! Declarative form validation.
//!
//! Rules are evaluated per field against an input [`types::Record`], failures
//! are aggregated into an [`validation::error_bag::ErrorBag`], and record-level
//! rules run as a second phase once every field has passed.

pub mod error;
pub mod types;
pub mod validation;
