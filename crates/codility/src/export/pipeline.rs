//! Completed-session export
//!
//! The run goes: list tests, pick one by name, list its sessions, fetch each
//! session's detail, keep the completed ones, fetch their similarity results,
//! flatten, write one CSV. Any failed call aborts the run before anything is
//! written.

use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::api::CodilityAPI;
use crate::api::models::{SessionDetail, SessionList, SessionRef, TestList, TestSummary, decode};
use crate::config::{ColumnPolicy, ExportConfig};
use crate::core::progress::{emit, file_written};
use crate::core::{CodilityError, ExportEvent, ExportMetrics, FileOperation, ProgressCallback, Result};
use crate::export::flatten::{FlatRow, flatten_session};
use crate::export::select::{TestSelector, resolve_test};
use crate::export::writer::{dropped_columns, select_columns, write_csv};

/// How a run ended when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The account has no tests
    NoTests,
    /// The test exists but none of its sessions are completed
    NoCompletedSessions { test_id: String },
    Exported {
        test_id: String,
        path: PathBuf,
        rows: usize,
    },
}

impl ExportOutcome {
    pub fn rows(&self) -> usize {
        match self {
            ExportOutcome::Exported { rows, .. } => *rows,
            _ => 0,
        }
    }

    /// Operator-facing summary line
    pub fn message(&self) -> String {
        match self {
            ExportOutcome::NoTests => "No tests found in your account.".to_string(),
            ExportOutcome::NoCompletedSessions { .. } => "No completed sessions found for this test.".to_string(),
            ExportOutcome::Exported { path, rows, .. } => {
                format!("Exported {} records to '{}'", rows, path.display())
            }
        }
    }
}

/// Drives one export run against a [`CodilityAPI`]
pub struct SessionExporter<'a> {
    api: &'a CodilityAPI,
    config: ExportConfig,
    metrics: ExportMetrics,
    progress: Option<ProgressCallback>,
}

impl<'a> SessionExporter<'a> {
    pub fn new(api: &'a CodilityAPI, config: ExportConfig) -> Self {
        Self {
            api,
            config,
            metrics: ExportMetrics::default(),
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Counters for the calls and sessions seen so far
    pub fn metrics(&self) -> &ExportMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Run the whole export, asking `selector` which test to export
    pub async fn run<S: TestSelector + ?Sized>(&self, selector: &mut S) -> Result<ExportOutcome> {
        let tests = self.list_tests().await?;
        if tests.is_empty() {
            info!("No tests found, nothing to export");
            return Ok(ExportOutcome::NoTests);
        }

        let chosen = selector.choose_test(&tests)?;
        let name = chosen.trim();
        let test = resolve_test(&tests, name, self.config.name_match)?;
        info!("Exporting test '{}' ({})", name, test.id);
        emit(self.progress.as_ref(), ExportEvent::TestResolved {
            test_id: test.id.clone(),
            name: name.to_string(),
        });

        let sessions = self.list_sessions(&test.id).await?;
        let rows = self.collect_rows(&sessions).await?;
        if rows.is_empty() {
            info!("No completed sessions for test {}", test.id);
            return Ok(ExportOutcome::NoCompletedSessions { test_id: test.id.clone() });
        }

        let path = self.config.output_path(name);
        let count = rows.len();
        self.write_rows(path.clone(), rows).await?;

        let snapshot = self.metrics.snapshot();
        info!(
            "Exported {} of {} sessions ({:.0}% completed) to {} using {} API calls",
            snapshot.sessions_exported,
            snapshot.sessions_listed,
            snapshot.completion_rate() * 100.0,
            path.display(),
            snapshot.requests_issued
        );

        Ok(ExportOutcome::Exported { test_id: test.id.clone(), path, rows: count })
    }

    /// All tests visible to the account
    pub async fn list_tests(&self) -> Result<Vec<TestSummary>> {
        self.metrics.record_request();
        let body = self.api.list_tests().await?;
        let tests = decode::<TestList>(body, &self.api.endpoint("/tests"))?.into_tests();

        debug!("Listed {} tests", tests.len());
        emit(self.progress.as_ref(), ExportEvent::TestsListed { count: tests.len() });
        Ok(tests)
    }

    /// Sessions belonging to one test
    pub async fn list_sessions(&self, test_id: &str) -> Result<Vec<SessionRef>> {
        self.metrics.record_request();
        let body = self.api.list_test_sessions(test_id).await?;
        let url = self.api.endpoint(&format!("/tests/{}/sessions", test_id));
        let sessions = decode::<SessionList>(body, &url)?.into_sessions();

        self.metrics.record_sessions_listed(sessions.len());
        emit(self.progress.as_ref(), ExportEvent::SessionsListed {
            test_id: test_id.to_string(),
            count: sessions.len(),
        });
        Ok(sessions)
    }

    /// Rows for the completed sessions, in listing order
    ///
    /// At most `max_concurrent_sessions` sessions are in flight at once. The
    /// first failure aborts the whole batch.
    pub async fn collect_rows(&self, sessions: &[SessionRef]) -> Result<Vec<FlatRow>> {
        let rows: Vec<Option<FlatRow>> = stream::iter(sessions)
            .map(|session| self.fetch_row(&session.id))
            .buffered(self.config.max_concurrent_sessions.max(1))
            .try_collect()
            .await?;

        Ok(rows.into_iter().flatten().collect())
    }

    /// Detail and, for completed sessions, similarity for one session
    async fn fetch_row(&self, session_id: &str) -> Result<Option<FlatRow>> {
        self.metrics.record_request();
        let body = self.api.get_session_data(session_id).await?;
        let detail = SessionDetail::from_value(body, &self.api.endpoint(&format!("/sessions/{}", session_id)))?;

        if !detail.is_completed() {
            debug!("Skipping session {}: not completed", session_id);
            self.metrics.record_skipped();
            emit(self.progress.as_ref(), ExportEvent::SessionSkipped { session_id: session_id.to_string() });
            return Ok(None);
        }

        self.metrics.record_request();
        let body = self.api.get_similarity_results(session_id).await?;
        let url = self.api.endpoint(&format!("/sessions/{}/similarity", session_id));
        let similarity: Map<String, Value> = decode(body, &url)?;

        self.metrics.record_exported();
        emit(self.progress.as_ref(), ExportEvent::SessionCollected { session_id: session_id.to_string() });
        Ok(Some(flatten_session(&detail, &similarity)))
    }

    /// Pick the columns and write the CSV off the async runtime
    async fn write_rows(&self, path: PathBuf, rows: Vec<FlatRow>) -> Result<()> {
        let columns = select_columns(&rows, self.config.columns);

        if self.config.columns == ColumnPolicy::FirstRow {
            let dropped = dropped_columns(&rows, &columns);
            if !dropped.is_empty() {
                let message = format!(
                    "{} columns missing from the first row were dropped: {}",
                    dropped.len(),
                    dropped.into_iter().collect::<Vec<_>>().join(", ")
                );
                warn!("{}", message);
                emit(self.progress.as_ref(), ExportEvent::Warning { message });
            }
        }

        let count = rows.len();
        let target = path.clone();
        tokio::task::spawn_blocking(move || write_csv(&target, &columns, &rows))
            .await
            .map_err(|e| CodilityError::FileSystem {
                path: path.clone(),
                operation: FileOperation::Write,
                source: std::io::Error::other(e),
            })??;

        file_written(self.progress.as_ref(), &path, count);
        Ok(())
    }
}
