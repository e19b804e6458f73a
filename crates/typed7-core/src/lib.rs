//! Core data types for the typed7 HL7 v2.3 codec
//!
//! This crate provides the foundational pieces the parser builds on:
//! - Delimiters and offset-preserving message tokens
//! - The per-parse context (delimiters, nesting, charset, timezone)
//! - The escape sequence codec for textual fields
//! - Primitive HL7 types (ST, ID, IS, SI, NM, SNM, DT, TM, TS, DTM, FT,
//!   TX, TN, CM, HD, NUL) with their marshal/unmarshal contracts
//! - Error types with message offsets and field breadcrumbs
//! - The process-wide timezone bootstrap and resource output sinks

pub mod charset;
pub mod context;
pub mod delimiters;
pub mod error;
pub mod escape;
pub mod output;
pub mod timestamp;
pub mod timezone;
pub mod token;
pub mod types;

pub use charset::Charset;
pub use context::{Context, Nesting};
pub use delimiters::Delimiters;
pub use error::{Error, ParseError, ParseErrors, Result};
pub use escape::TextMode;
pub use output::{DirectoryOutput, ResourceOutput, StdOutput};
pub use timestamp::{Dtm, Ts, TsPrecision};
pub use timezone::{default_timezone, default_timezone_name, set_timezone_and_location};
pub use token::Token;
pub use types::{Any, Cm, Dt, Ft, HL7_NULL, Hd, Id, Is, Nm, Nul, Primitive, Si, Snm, St, Tm, Tn, Tx};
