//! Configuration types for the API client and the exporter

use std::path::PathBuf;
use std::time::Duration;

use crate::core::{CodilityError, Result};

/// Default API root used when `CODILITY_API_URL` is not set
pub const DEFAULT_BASE_URL: &str = "https://codility.com/api";

/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "CODILITY_API_KEY";

/// Environment variable overriding the API root
pub const BASE_URL_ENV: &str = "CODILITY_API_URL";

/// Connection settings for [`crate::CodilityAPI`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    /// Whole-request timeout; `None` leaves requests unbounded
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            user_agent: format!("codility-export/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Build a config from the process environment, loading `.env` first
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Ignore error if .env not present

        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CodilityError::Configuration {
                message: format!("{} environment variable not set", API_KEY_ENV),
                field: Some(API_KEY_ENV.to_string()),
                suggestion: Some(format!(
                    "Set {} in your environment or .env file with your Codility API key",
                    API_KEY_ENV
                )),
            })?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                config.base_url = base_url;
            }
        }
        Ok(config)
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// How a test name that matches several tests is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatchPolicy {
    /// Fail with [`CodilityError::AmbiguousTestName`]
    #[default]
    Strict,
    /// Take the first match in listing order and log the others
    First,
}

/// How the CSV column set is derived from the flattened rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnPolicy {
    /// Sorted union of the keys of every row
    #[default]
    Union,
    /// Sorted keys of the first row only; other keys are dropped
    FirstRow,
}

/// Settings for [`crate::SessionExporter`]
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory the CSV file is written into
    pub output_dir: PathBuf,
    /// Appended to the sanitized test name to form the file name
    pub file_suffix: String,
    pub name_match: NameMatchPolicy,
    pub columns: ColumnPolicy,
    /// Sessions fetched at once; 1 keeps the run strictly sequential
    pub max_concurrent_sessions: usize,
}

impl ExportConfig {
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, output_dir: P) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_name_match(mut self, policy: NameMatchPolicy) -> Self {
        self.name_match = policy;
        self
    }

    pub fn with_columns(mut self, policy: ColumnPolicy) -> Self {
        self.columns = policy;
        self
    }

    pub fn with_max_concurrent_sessions(mut self, max: usize) -> Self {
        self.max_concurrent_sessions = max.max(1);
        self
    }

    /// Output path for a test name: spaces become underscores, suffix appended
    pub fn output_path(&self, test_name: &str) -> PathBuf {
        let safe_name = test_name.replace(' ', "_");
        self.output_dir.join(format!("{}{}", safe_name, self.file_suffix))
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            file_suffix: "_completed_sessions.csv".to_string(),
            name_match: NameMatchPolicy::default(),
            columns: ColumnPolicy::default(),
            max_concurrent_sessions: 1,
        }
    }
}
