//! Progress tracking and reporting for export runs

use std::path::Path;
use std::sync::Arc;

/// Progress callback for export operations
pub type ProgressCallback = Arc<dyn Fn(ExportEvent) + Send + Sync>;

/// Events emitted while an export runs
#[derive(Debug, Clone)]
pub enum ExportEvent {
    TestsListed {
        count: usize,
    },
    TestResolved {
        test_id: String,
        name: String,
    },
    SessionsListed {
        test_id: String,
        count: usize,
    },
    SessionSkipped {
        session_id: String,
    },
    SessionCollected {
        session_id: String,
    },
    FileWritten {
        path: String,
        rows: usize,
    },
    Warning {
        message: String,
    },
}

/// Trait for progress reporting with per-event hooks
pub trait ExportReporter: Send + Sync {
    fn on_tests_listed(&self, _count: usize) {}
    fn on_test_resolved(&self, _test_id: &str, _name: &str) {}
    fn on_sessions_listed(&self, _test_id: &str, _count: usize) {}
    fn on_session_skipped(&self, _session_id: &str) {}
    fn on_session_collected(&self, _session_id: &str) {}
    fn on_file_written(&self, _path: &str, _rows: usize) {}
    fn on_warning(&self, _message: &str) {}
}

/// Extension trait to convert ExportReporter to ProgressCallback
pub trait IntoProgressCallback {
    fn into_callback(self) -> ProgressCallback;
}

impl<T: ExportReporter + 'static> IntoProgressCallback for T {
    fn into_callback(self) -> ProgressCallback {
        Arc::new(move |event| match event {
            ExportEvent::TestsListed { count } => self.on_tests_listed(count),
            ExportEvent::TestResolved { test_id, name } => self.on_test_resolved(&test_id, &name),
            ExportEvent::SessionsListed { test_id, count } => {
                self.on_sessions_listed(&test_id, count);
            }
            ExportEvent::SessionSkipped { session_id } => self.on_session_skipped(&session_id),
            ExportEvent::SessionCollected { session_id } => self.on_session_collected(&session_id),
            ExportEvent::FileWritten { path, rows } => self.on_file_written(&path, rows),
            ExportEvent::Warning { message } => self.on_warning(&message),
        })
    }
}

/// Simple console progress reporter implementation
#[derive(Debug, Default)]
pub struct ConsoleExportReporter {
    pub verbose: bool,
}

impl ConsoleExportReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ExportReporter for ConsoleExportReporter {
    fn on_test_resolved(&self, test_id: &str, name: &str) {
        if self.verbose {
            println!("Selected test {} ({})", name, test_id);
        }
    }

    fn on_sessions_listed(&self, _test_id: &str, count: usize) {
        if self.verbose {
            println!("Found {} sessions, fetching details...", count);
        }
    }

    fn on_session_skipped(&self, session_id: &str) {
        if self.verbose {
            println!("  skipped {} (not completed)", session_id);
        }
    }

    fn on_session_collected(&self, session_id: &str) {
        if self.verbose {
            println!("  collected {}", session_id);
        }
    }

    fn on_warning(&self, message: &str) {
        eprintln!("Warning: {}", message);
    }
}

/// Emit an event if a callback is registered
pub(crate) fn emit(callback: Option<&ProgressCallback>, event: ExportEvent) {
    if let Some(callback) = callback {
        callback(event);
    }
}

pub(crate) fn file_written(callback: Option<&ProgressCallback>, path: &Path, rows: usize) {
    emit(callback, ExportEvent::FileWritten { path: path.display().to_string(), rows });
}
