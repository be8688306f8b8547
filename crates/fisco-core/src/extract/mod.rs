//! Field extraction module.

mod confidence;
mod pipeline;
pub mod rules;

pub use confidence::aggregate_confidence;
pub use pipeline::DocumentExtractor;
pub use rules::{ContextRule, CuitContextRules, ExtractedField, FieldExtractor};
