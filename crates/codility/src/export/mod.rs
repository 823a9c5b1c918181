//! Export of completed sessions to CSV

pub mod flatten;
pub mod pipeline;
pub mod select;
pub mod writer;

pub use flatten::{FlatRow, flatten_data, flatten_session};
pub use pipeline::{ExportOutcome, SessionExporter};
pub use select::{FixedTestName, PromptSelector, TestSelector, resolve_test};
