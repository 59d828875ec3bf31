//! Data models for the alumni registry.
//!
//! Serialized field names follow the persisted JSON document.

mod alumni;
mod counters;
mod document;
mod query;

pub use alumni::*;
pub use counters::*;
pub use document::*;
pub use query::*;
