//! Structured logging setup and one-off JSON records.

mod format;

pub use format::{PredictionRecord, StructuredLogger};
