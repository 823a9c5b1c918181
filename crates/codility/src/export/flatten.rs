//! Flattening of session and similarity records into single-level rows

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io;

use crate::api::models::SessionDetail;

/// One output row: column name to scalar value
pub type FlatRow = BTreeMap<String, Value>;

pub const SESSION_PREFIX: &str = "session_";
pub const SIMILARITY_PREFIX: &str = "similarity_";

/// Promoted candidate columns
pub const FIRST_NAME_COLUMN: &str = "first_name";
pub const LAST_NAME_COLUMN: &str = "last_name";
pub const EMAIL_COLUMN: &str = "email";

/// Writes JSON with `", "` and `": "` separators, e.g. `{"a": 1, "b": [1, 2]}`
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

/// JSON text of a value in the spaced layout
pub fn encode_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    match value.serialize(&mut serializer) {
        Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| value.to_string()),
        Err(_) => value.to_string(),
    }
}

/// Scalars pass through; arrays and objects become their JSON text
pub fn scalarize(value: &Value) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) => Value::String(encode_json(value)),
        scalar => scalar.clone(),
    }
}

/// Merge session and similarity fields under disjoint prefixes
///
/// The session's `candidate` block is left out; [`flatten_session`] promotes
/// its fields instead.
pub fn flatten_data(session: &Map<String, Value>, similarity: &Map<String, Value>) -> FlatRow {
    let session_fields = session
        .iter()
        .filter(|(key, _)| key.as_str() != SessionDetail::CANDIDATE_FIELD)
        .map(|(key, value)| (format!("{}{}", SESSION_PREFIX, key), scalarize(value)));

    let similarity_fields = similarity
        .iter()
        .map(|(key, value)| (format!("{}{}", SIMILARITY_PREFIX, key), scalarize(value)));

    session_fields.chain(similarity_fields).collect()
}

/// Full export row: flattened fields plus the promoted candidate columns
///
/// Missing candidate fields become empty strings.
pub fn flatten_session(detail: &SessionDetail, similarity: &Map<String, Value>) -> FlatRow {
    let mut row = flatten_data(&detail.fields, similarity);
    let candidate = detail.candidate();

    for (column, value) in [
        (FIRST_NAME_COLUMN, candidate.first_name),
        (LAST_NAME_COLUMN, candidate.last_name),
        (EMAIL_COLUMN, candidate.email),
    ] {
        let value = value.map(|v| scalarize(&v)).unwrap_or_else(|| Value::String(String::new()));
        row.insert(column.to_string(), value);
    }

    row
}

/// CSV cell text for a row value
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => encode_json(nested),
    }
}
