//! Error types for the API client and the export pipeline

use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;

/// Every failure the client or the exporter can surface
#[derive(Error, Debug)]
pub enum CodilityError {
    /// Missing or unusable configuration, raised before any network call
    #[error("Invalid configuration: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
        suggestion: Option<String>,
    },

    /// Base URL that does not parse as an absolute URL
    #[error("Invalid URL '{url}': {suggestion}")]
    InvalidUrl {
        url: String,
        suggestion: String,
        #[source]
        source: url::ParseError,
    },

    /// The remote API answered with a non-success status
    #[error("{method} '{url}' returned HTTP {status}: {body}")]
    HttpStatus {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// Transport failure before a status was received
    #[error("HTTP request to '{url}' failed")]
    HttpRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to '{url}' timed out after {duration_secs}s")]
    NetworkTimeout {
        url: String,
        duration_secs: u64,
    },

    /// A success body that is not the JSON shape we expected
    #[error("Failed to decode response from '{url}'")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// No test carries the operator-supplied name
    #[error("No test found with name '{name}'")]
    TestNotFound { name: String },

    /// More than one test carries the operator-supplied name
    #[error("Test name '{name}' is ambiguous: matches tests {}", .ids.join(", "))]
    AmbiguousTestName { name: String, ids: Vec<String> },

    /// Operator input could not be read
    #[error("Failed to read operator input")]
    Prompt {
        #[source]
        source: std::io::Error,
    },

    #[error("File operation failed on '{path}'")]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV to '{path}'")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Types of file operations for error context
#[derive(Debug, Clone, PartialEq)]
pub enum FileOperation {
    Create,
    Write,
    Persist,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Create => write!(f, "creating"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Persist => write!(f, "persisting"),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodilityError>;

impl CodilityError {
    /// Build an [`CodilityError::InvalidUrl`] for `url` with a hint for the parse failure
    pub fn invalid_url<S: Into<String>>(url: S, source: url::ParseError) -> Self {
        let suggestion = match source {
            url::ParseError::EmptyHost => "URL must have a valid hostname",
            url::ParseError::InvalidPort => "Port number must be between 1 and 65535",
            url::ParseError::RelativeUrlWithoutBase => "URL must be absolute (include http:// or https://)",
            _ => "Check URL format and try again",
        }
        .to_string();

        CodilityError::InvalidUrl { url: url.into(), suggestion, source }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            CodilityError::Configuration { .. } => "configuration",
            CodilityError::InvalidUrl { .. } => "invalid_url",
            CodilityError::HttpStatus { .. } => "http_status",
            CodilityError::HttpRequest { .. } => "http_request",
            CodilityError::NetworkTimeout { .. } => "network_timeout",
            CodilityError::Decode { .. } => "decode",
            CodilityError::TestNotFound { .. } => "test_not_found",
            CodilityError::AmbiguousTestName { .. } => "ambiguous_test_name",
            CodilityError::Prompt { .. } => "prompt",
            CodilityError::FileSystem { .. } => "file_system",
            CodilityError::Csv { .. } => "csv",
        }
    }

    /// Get severity level for error prioritization
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CodilityError::Configuration { .. } => ErrorSeverity::High,
            CodilityError::InvalidUrl { .. } => ErrorSeverity::High,
            CodilityError::HttpStatus { status, .. } if *status >= 500 => ErrorSeverity::High,
            CodilityError::HttpStatus { .. } => ErrorSeverity::Medium,
            CodilityError::HttpRequest { .. } => ErrorSeverity::Medium,
            CodilityError::NetworkTimeout { .. } => ErrorSeverity::Medium,
            CodilityError::Decode { .. } => ErrorSeverity::Medium,
            CodilityError::TestNotFound { .. } => ErrorSeverity::Low,
            CodilityError::AmbiguousTestName { .. } => ErrorSeverity::Low,
            CodilityError::Prompt { .. } => ErrorSeverity::Low,
            CodilityError::FileSystem { .. } => ErrorSeverity::Critical,
            CodilityError::Csv { .. } => ErrorSeverity::High,
        }
    }

    /// Whether the failure happened while talking to the remote API
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CodilityError::HttpStatus { .. }
                | CodilityError::HttpRequest { .. }
                | CodilityError::NetworkTimeout { .. }
                | CodilityError::Decode { .. }
        )
    }

    /// HTTP status carried by the failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            CodilityError::HttpStatus { status, .. } => Some(*status),
            CodilityError::HttpRequest { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Get user-friendly suggestion for resolving the error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            CodilityError::Configuration { suggestion, .. } => suggestion.as_deref(),
            CodilityError::InvalidUrl { suggestion, .. } => Some(suggestion),
            CodilityError::HttpStatus { status: 401 | 403, .. } => {
                Some("Check that CODILITY_API_KEY is valid and has access to this resource")
            }
            CodilityError::NetworkTimeout { .. } => {
                Some("Check your internet connection or try increasing the timeout value")
            }
            CodilityError::TestNotFound { .. } => {
                Some("Enter the test title exactly as shown in the listing")
            }
            CodilityError::AmbiguousTestName { .. } => {
                Some("Rename one of the tests, or pass --first-match to take the first listed")
            }
            _ => None,
        }
    }

    /// Create a detailed error report for debugging
    pub fn detailed_report(&self) -> String {
        let mut report = format!("Error: {}\n", self);
        report.push_str(&format!("Category: {}\n", self.category()));
        report.push_str(&format!("Severity: {:?}\n", self.severity()));

        if let Some(suggestion) = self.suggestion() {
            report.push_str(&format!("Suggestion: {}\n", suggestion));
        }

        if let Some(source) = self.source() {
            report.push_str(&format!("Root cause: {}\n", source));
        }

        report
    }
}

/// Error severity levels for prioritization
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_is_transport_and_keeps_status() {
        let err = CodilityError::HttpStatus {
            method: "GET".to_string(),
            url: "https://codility.com/api/tests".to_string(),
            status: 503,
            body: "unavailable".to_string(),
        };

        assert!(err.is_transport());
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.category(), "http_status");
        assert!(err.to_string().contains("HTTP 503"));
        assert!(err.to_string().contains("unavailable"));
    }

    #[test]
    fn unauthorized_suggests_checking_key() {
        let err = CodilityError::HttpStatus {
            method: "GET".to_string(),
            url: "https://codility.com/api/account/user".to_string(),
            status: 401,
            body: String::new(),
        };
        assert!(err.suggestion().unwrap().contains("CODILITY_API_KEY"));
    }

    #[test]
    fn resolution_errors_are_not_transport() {
        let missing = CodilityError::TestNotFound { name: "Backend".to_string() };
        let ambiguous = CodilityError::AmbiguousTestName {
            name: "Backend".to_string(),
            ids: vec!["t1".to_string(), "t2".to_string()],
        };

        assert!(!missing.is_transport());
        assert!(!ambiguous.is_transport());
        assert_eq!(ambiguous.to_string(), "Test name 'Backend' is ambiguous: matches tests t1, t2");
    }

    #[test]
    fn detailed_report_includes_root_cause() {
        let err = CodilityError::invalid_url("not a url", url::Url::parse("not a url").unwrap_err());
        let report = err.detailed_report();

        assert!(report.contains("Category: invalid_url"));
        assert!(report.contains("Suggestion: URL must be absolute"));
        assert!(report.contains("Root cause:"));
    }
}
