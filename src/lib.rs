//! # typed7 - a typed HL7 v2.3 codec for Rust
//!
//! A bidirectional translator between the delimiter-structured HL7 v2.3
//! wire format and strongly typed in-memory segment records.
//!
//! ## Features
//!
//! - **Per-message delimiters**: the MSH header's delimiter field drives
//!   every split and escape for that message
//! - **Typed primitives**: ST, ID, IS, SI, NM, SNM, DT, TM, TS, DTM, FT,
//!   TX, TN, CM, HD, NUL with native semantics (explicit HL7 null,
//!   timestamp precision, escape sequences)
//! - **Schema-driven parsing**: one recursive engine interprets static
//!   layout tables; no per-segment parsing code
//! - **Error aggregation**: failures carry byte offsets and field
//!   breadcrumbs, and partial results remain available
//! - **Character sets**: MSH-18 selects the decoder (ISO 8859 family,
//!   pass-through for ASCII/UNICODE)
//!
//! ## Quick Start
//!
//! ```rust
//! use typed7::{parse_message, Value};
//!
//! let raw = b"MSH|^~\\&|SendApp|SendFac|RecApp|RecFac|20240315143000||ADT^A01|12345|P|2.3\r\
//! PID|1||12345^^^MRN^MR||DOE^JOHN^A||19800101|M";
//!
//! let message = parse_message(raw).unwrap();
//! assert_eq!(message.message_type().unwrap(), "ADT_A01");
//!
//! let pid = message.segment("PID").unwrap().unwrap();
//! let names = pid.field(5).and_then(Value::as_repeated).unwrap();
//! let name = names[0].as_composite().unwrap();
//! assert_eq!(name.field(1).and_then(Value::as_st).map(|st| st.value()), Some("DOE"));
//! ```

pub use typed7_core as core;
pub use typed7_parser as parser;

// Re-export commonly used types
pub use typed7_core::{
    Any, Charset, Cm, Context, Delimiters, DirectoryOutput, Dt, Dtm, Error, Ft, HL7_NULL, Hd, Id,
    Is, Nesting, Nm, Nul, ParseError, ParseErrors, Primitive, ResourceOutput, Result, Si, Snm, St,
    StdOutput, TextMode, Tm, Tn, Token, Ts, TsPrecision, Tx, default_timezone,
    set_timezone_and_location,
};
pub use typed7_parser::{
    CompositeSchema, CompositeValue, DefaultRegistry, FieldKind, FieldSchema, Message,
    ParseOptions, ParsedSegment, PrimitiveKind, SegmentRegistry, SegmentSchema, SegmentValue,
    Value, ZSegment, marshal_message, marshal_segment, parse_message, parse_message_with_options,
};
