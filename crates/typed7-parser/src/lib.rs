//! Schema-driven parser and marshaller for HL7 v2.3 messages
//!
//! One recursive routine interprets static layout tables in both
//! directions, so any segment the registry knows parses without bespoke
//! per-segment code. See [`parse_message`] for the entry point.
//!
//! ```rust
//! use typed7_parser::{parse_message, Value};
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

pub mod catalog;
pub mod message;
pub mod parse;
pub mod schema;
pub mod value;

pub use catalog::DefaultRegistry;
pub use message::{
    Message, ParseOptions, ParsedSegment, SEGMENT_TERMINATOR, ZSegment, parse_message,
    parse_message_with_options,
};
pub use parse::{marshal_message, marshal_segment, parse_segment};
pub use schema::{
    CompositeSchema, FieldKind, FieldSchema, PrimitiveKind, SegmentRegistry, SegmentSchema,
};
pub use value::{CompositeValue, SegmentValue, Value};
