//! Error types for HL7 message parsing and serialization
//!
//! Two layers: [`Error`] classifies what went wrong, while [`ParseError`]
//! and [`ParseErrors`] attach message offsets and field breadcrumbs so a
//! failure can be traced back to the exact field that produced it.
//!
//! `BadValue` deliberately carries no payload: primitive values regularly
//! contain patient-identifying data that must not leak into diagnostics.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Result type alias for typed7 operations
pub type Result<T> = std::result::Result<T, Error>;

static SEGMENT_TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Za-z0-9]{3}$").expect("segment type regex"));
static MESSAGE_TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Za-z0-9]{3}_[A-Za-z0-9]{3}$").expect("message type regex"));

/// Returns true if `name` has the shape of an HL7 segment type, eg `PID`.
pub fn is_segment_type_name(name: &str) -> bool {
    SEGMENT_TYPE_RE.is_match(name)
}

/// Returns true if `name` has the shape of an HL7 message type, eg `ADT_A01`.
pub fn is_message_type_name(name: &str) -> bool {
    MESSAGE_TYPE_RE.is_match(name)
}

fn bad_message_type_display(name: &str) -> String {
    // Only echo the name when it is shaped like a type name; anything else
    // could be message content.
    if is_segment_type_name(name) || is_message_type_name(name) {
        format!("bad message type: {}", name)
    } else {
        "bad message type".to_string()
    }
}

/// Main error type for the typed7 codec
#[derive(Error, Debug)]
pub enum Error {
    /// A primitive HL7 value could not be parsed. The offending bytes are
    /// not echoed because they may contain patient-identifiable data.
    #[error("bad value for primitive HL7 type")]
    BadValue,

    /// A segment type name that is not present in the registry.
    #[error("bad segment {name:?}")]
    BadSegment { name: String },

    /// A message type name that is unknown or malformed.
    #[error("{}", bad_message_type_display(.name))]
    BadMessageType { name: String },

    /// The input does not start with a valid MSH header.
    #[error("bad HL7 MSH header")]
    BadHeader,

    /// MSH-18 declared a character set this codec does not know.
    #[error("bad character set: {name:?}")]
    BadCharacterSet { name: String },

    /// A timezone name that the tz database does not know.
    #[error("invalid timezone: {name:?}")]
    InvalidTimezone { name: String },

    /// A resource output was created with an empty path.
    #[error("output path is empty")]
    EmptyOutputPath,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseErrors),
}

/// A parse failure at a specific location within a message.
///
/// `location` is a path-style breadcrumb built from segment/type names,
/// field numbers and field descriptions, eg
/// `PID-3-Patient ID/CX-1-ID`.
#[derive(Error, Debug)]
#[error("error in {location}: {cause}")]
pub struct ParseError {
    pub offset: usize,
    pub location: String,
    pub cause: Error,
}

/// A collection of [`ParseError`]s gathered over a whole segment or message.
///
/// Parsing does not short-circuit: every field of every segment is
/// attempted, and the failures are aggregated in discovery order
/// (depth-first, left to right).
#[derive(Error, Debug, Default)]
#[error("errors ({}): {}", .0.len(), join_errors(.0))]
pub struct ParseErrors(pub Vec<ParseError>);

fn join_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ParseErrors {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        ParseErrors(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn push(&mut self, error: ParseError) {
        self.0.push(error);
    }

    /// Append every error from `other`, preserving discovery order.
    pub fn extend(&mut self, other: ParseErrors) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.0.iter()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> std::result::Result<(), ParseErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<ParseError> for ParseErrors {
    fn from(error: ParseError) -> Self {
        ParseErrors(vec![error])
    }
}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_value_has_no_payload() {
        assert_eq!(Error::BadValue.to_string(), "bad value for primitive HL7 type");
    }

    #[test]
    fn test_bad_segment_display() {
        let err = Error::BadSegment { name: "XYZ".to_string() };
        assert_eq!(err.to_string(), "bad segment \"XYZ\"");
    }

    #[test]
    fn test_bad_message_type_echoes_wellformed_names_only() {
        let err = Error::BadMessageType { name: "ADT_A01".to_string() };
        assert_eq!(err.to_string(), "bad message type: ADT_A01");

        let err = Error::BadMessageType { name: "ACK".to_string() };
        assert_eq!(err.to_string(), "bad message type: ACK");

        let err = Error::BadMessageType { name: "DOE^JOHN|12345".to_string() };
        assert_eq!(err.to_string(), "bad message type");
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError {
            offset: 42,
            location: "PID-3-Patient ID/CX-1-ID".to_string(),
            cause: Error::BadValue,
        };
        assert_eq!(
            err.to_string(),
            "error in PID-3-Patient ID/CX-1-ID: bad value for primitive HL7 type"
        );
    }

    #[test]
    fn test_parse_errors_display() {
        let errs = ParseErrors(vec![
            ParseError { offset: 0, location: "PID-1".to_string(), cause: Error::BadValue },
            ParseError { offset: 9, location: "PID-2".to_string(), cause: Error::BadValue },
        ]);
        assert_eq!(
            errs.to_string(),
            "errors (2): error in PID-1: bad value for primitive HL7 type, \
             error in PID-2: bad value for primitive HL7 type"
        );
    }

    #[test]
    fn test_into_result() {
        assert!(ParseErrors::new().into_result().is_ok());
        let errs: ParseErrors =
            ParseError { offset: 0, location: "OBX-5".to_string(), cause: Error::BadValue }.into();
        assert!(errs.into_result().is_err());
    }

    #[test]
    fn test_name_shapes() {
        assert!(is_segment_type_name("PID"));
        assert!(is_segment_type_name("Z01"));
        assert!(!is_segment_type_name("PIDX"));
        assert!(!is_segment_type_name("PI"));
        assert!(is_message_type_name("ADT_A01"));
        assert!(!is_message_type_name("ADT"));
        assert!(!is_message_type_name("ADT^A01"));
    }
}
