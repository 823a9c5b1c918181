//! Request payloads and typed views over Codility responses
//!
//! The client hands responses back as raw [`Value`]s. The views here read
//! only the fields the exporter depends on (ids, test titles, the completion
//! marker and the candidate block) and keep the rest of the record intact.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

use crate::core::{CodilityError, Result};

/// Placeholder shown for a test with neither a title nor a name
pub const UNNAMED_TEST: &str = "<unnamed>";

/// Decode a response body into a typed view, tagging failures with the URL
pub fn decode<T: DeserializeOwned>(value: Value, url: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|source| CodilityError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Remote ids come back as strings or numbers; both are kept as opaque text
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(D::Error::custom(format!("expected a string or numeric id, got {}", other))),
    }
}

/// Null, false, zero and empty strings or containers count as unset
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

// =============================================================================
// Tests
// =============================================================================

/// `GET /tests`
#[derive(Debug, Clone, Deserialize)]
pub struct TestList {
    #[serde(default)]
    tests: Option<Vec<TestSummary>>,
}

impl TestList {
    pub fn into_tests(self) -> Vec<TestSummary> {
        self.tests.unwrap_or_default()
    }
}

/// A test entry in a listing
///
/// Labels are kept as raw values: only strings take part in name matching,
/// anything else is still listed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
}

impl TestSummary {
    pub fn title(&self) -> Option<&str> {
        self.title.as_ref().and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().and_then(Value::as_str)
    }

    /// First set label of title then name, falling back to a placeholder
    pub fn display_name(&self) -> Cow<'_, str> {
        match [&self.title, &self.name].into_iter().flatten().find(|label| is_truthy(label)) {
            Some(Value::String(label)) => Cow::Borrowed(label.as_str()),
            Some(label) => Cow::Owned(label.to_string()),
            None => Cow::Borrowed(UNNAMED_TEST),
        }
    }

    /// Exact match against either string label
    pub fn matches_name(&self, name: &str) -> bool {
        self.title() == Some(name) || self.name() == Some(name)
    }
}

// =============================================================================
// Sessions
// =============================================================================

/// `GET /tests/{id}/sessions`
#[derive(Debug, Clone, Deserialize)]
pub struct SessionList {
    #[serde(default)]
    sessions: Option<Vec<SessionRef>>,
}

impl SessionList {
    pub fn into_sessions(self) -> Vec<SessionRef> {
        self.sessions.unwrap_or_default()
    }
}

/// A session entry in a listing; only the id is read
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionRef {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
}

/// Candidate block embedded in a session record
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Candidate {
    #[serde(rename = "firstName", default)]
    pub first_name: Option<Value>,
    #[serde(rename = "lastName", default)]
    pub last_name: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
}

/// `GET /sessions/{id}`, kept as the full field map
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDetail {
    pub fields: Map<String, Value>,
}

impl SessionDetail {
    pub const COMPLETION_FIELD: &'static str = "end_time";
    pub const CANDIDATE_FIELD: &'static str = "candidate";

    pub fn from_value(value: Value, url: &str) -> Result<Self> {
        Ok(Self { fields: decode(value, url)? })
    }

    pub fn end_time(&self) -> Option<&Value> {
        self.fields.get(Self::COMPLETION_FIELD)
    }

    /// A session counts as completed only when `end_time` is present and non-empty
    pub fn is_completed(&self) -> bool {
        self.end_time().is_some_and(is_truthy)
    }

    /// Candidate block; missing or malformed blocks read as empty
    pub fn candidate(&self) -> Candidate {
        self.fields
            .get(Self::CANDIDATE_FIELD)
            .filter(|value| value.is_object())
            .and_then(|value| Candidate::deserialize(value).ok())
            .unwrap_or_default()
    }
}

// =============================================================================
// Request payloads
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct WhiteboardRequest<'a> {
    pub session_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailTemplateRequest<'a> {
    pub name: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailCandidatesRequest<'a> {
    pub template_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddCandidatesRequest<'a, C: Serialize> {
    pub candidates: &'a [C],
}

/// Candidate entry for [`crate::CodilityAPI::add_candidates`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateInvite {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CandidateInvite {
    pub fn new<S: Into<String>>(email: S) -> Self {
        Self { email: email.into(), name: None }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }
}
