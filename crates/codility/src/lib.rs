//! Codility API client
//!
//! This library wraps the Codility REST API and provides a batch exporter
//! that writes a test's completed sessions, together with their similarity
//! check results, to a flat CSV file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use codility::{CodilityAPI, ExportConfig, ExportOutcome, FixedTestName, SessionExporter};
//!
//! # async fn example() -> codility::Result<()> {
//! // Reads CODILITY_API_KEY (and optionally CODILITY_API_URL) from the environment
//! let api = CodilityAPI::from_env()?;
//!
//! // Raw API access: every call returns the response body untouched
//! let credits = api.get_available_credits().await?;
//! println!("Credits: {}", credits);
//!
//! // Export completed sessions of one test
//! let exporter = SessionExporter::new(&api, ExportConfig::default());
//! match exporter.run(&mut FixedTestName("Backend Role".to_string())).await? {
//!     ExportOutcome::Exported { path, rows, .. } => {
//!         println!("Wrote {} rows to {}", rows, path.display());
//!     }
//!     other => println!("{}", other.message()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Behaviour
//!
//! - **One call, one request**: no retries, backoff, rate limiting or caching
//! - **Loud failures**: any non-2xx status is a [`CodilityError::HttpStatus`]
//! - **Completion filter**: only sessions with a non-empty `end_time` are exported
//! - **Flat rows**: nested values are written as JSON text
//! - **Bounded fan-out**: session fetches are sequential unless
//!   [`ExportConfig::max_concurrent_sessions`] is raised

pub mod api;
pub mod config;
pub mod core;
pub mod export;

// Re-export commonly used types for convenience
pub use api::{CandidateInvite, CodilityAPI, SessionDetail, SessionRef, TestSummary};
pub use config::{ClientConfig, ColumnPolicy, ExportConfig, NameMatchPolicy};
pub use crate::core::{
    CodilityError, ConsoleExportReporter, ErrorSeverity, ExportEvent, ExportMetrics,
    ExportMetricsSnapshot, ExportReporter, IntoProgressCallback, ProgressCallback, Result,
};
pub use export::{ExportOutcome, FixedTestName, PromptSelector, SessionExporter, TestSelector};
