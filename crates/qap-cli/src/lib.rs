//! CLI library components for QAP ingestion.

pub mod logging;
pub mod pipeline;
