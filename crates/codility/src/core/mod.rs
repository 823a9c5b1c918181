//! Core types used throughout the client and the exporter
//!
//! Errors, progress events and run metrics live here so that both the API
//! layer and the export pipeline can depend on them without depending on
//! each other.

pub mod error;
pub mod metrics;
pub mod progress;

// Re-export main types for convenience
pub use error::{CodilityError, ErrorSeverity, FileOperation, Result};
pub use metrics::{ExportMetrics, ExportMetricsSnapshot};
pub use progress::{
    ConsoleExportReporter, ExportEvent, ExportReporter, IntoProgressCallback, ProgressCallback,
};
