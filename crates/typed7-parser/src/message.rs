//! The message facade
//!
//! [`parse_message`] validates the MSH header, discovers the message's
//! delimiters and character set, and splits the input into segment
//! tokens. Segments are parsed on demand through a [`SegmentRegistry`];
//! the enumerating accessors return every successfully parsed segment
//! together with the error list, so callers decide what a partial parse
//! is worth.

use chrono_tz::Tz;

use typed7_core::error::{is_message_type_name, is_segment_type_name};
use typed7_core::{Charset, Context, Delimiters, Error, ParseError, ParseErrors, Result, Token};

use crate::catalog::{DefaultRegistry, MSH, MSH_CHARACTER_SET_INDEX, MSH_MESSAGE_TYPE_INDEX};
use crate::parse::parse_segment;
use crate::schema::SegmentRegistry;
use crate::value::{SegmentValue, Value};

/// The default segment terminator, defined in section 2.7 of the HL7 2.3
/// specification.
pub const SEGMENT_TERMINATOR: u8 = b'\r';

/// Optional parameters for [`parse_message_with_options`].
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Timezone for timestamps that carry no explicit offset. Defaults to
    /// the process-wide timezone set at startup.
    pub timezone_location: Option<Tz>,
    /// Segment terminator. The spec allows only `\r`, but real systems
    /// emit `\n` or `\r\n` often enough that it is overridable.
    pub segment_terminator: Vec<u8>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { timezone_location: None, segment_terminator: vec![SEGMENT_TERMINATOR] }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timezone_location(mut self, timezone: Tz) -> Self {
        self.timezone_location = Some(timezone);
        self
    }

    pub fn segment_terminator(mut self, terminator: impl Into<Vec<u8>>) -> Self {
        self.segment_terminator = terminator.into();
        self
    }
}

/// A locally defined `Z...` segment, passed through opaquely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZSegment {
    pub name: String,
    /// Byte offset of the segment within the message.
    pub offset: usize,
    /// The raw segment bytes, delimiters and all.
    pub raw: Vec<u8>,
}

/// One entry of a full segment enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedSegment {
    Segment(SegmentValue),
    Z(ZSegment),
}

/// A parsed HL7 message: a validated header plus segment tokens that
/// parse on demand.
#[derive(Debug)]
pub struct Message<'m> {
    context: Context,
    segments: Vec<Token<'m>>,
    msh: SegmentValue,
}

/// Parse a message with default options.
pub fn parse_message(input: &[u8]) -> Result<Message<'_>> {
    parse_message_with_options(input, &ParseOptions::default())
}

/// Parse a message, ensuring it has a correct header.
///
/// The field delimiter is byte 4 of the header; the remaining delimiters
/// are fixed when the MSH delimiter field is unmarshalled. An unknown
/// character set in MSH-18 fails the whole parse before any other segment
/// is looked at.
pub fn parse_message_with_options<'m>(
    input: &'m [u8],
    options: &ParseOptions,
) -> Result<Message<'m>> {
    // Messages start with the MSH name and 5 delimiter characters.
    if input.len() < 8 || !input.starts_with(b"MSH") {
        return Err(Error::BadHeader);
    }
    let mut context = Context::new();
    context.set_delimiters(Delimiters { field: input[3], ..Delimiters::default() });
    if let Some(timezone) = options.timezone_location {
        context.timezone = timezone;
    }

    let segments = Token::new(input, 0).split_on(&options.segment_terminator);
    let (msh, errors) = parse_segment(&segments[0], &context, &MSH);
    errors.into_result().map_err(Error::Parse)?;

    if let Some(declared) = charset_name(&msh) {
        context.charset = Charset::for_name(&declared)
            .ok_or_else(|| Error::BadCharacterSet { name: declared })?;
    }

    Ok(Message { context, segments, msh })
}

/// The declared character set, if MSH-18's first repetition is non-empty.
fn charset_name(msh: &SegmentValue) -> Option<String> {
    let field = msh.fields.get(MSH_CHARACTER_SET_INDEX)?.as_ref()?;
    let first = field.as_repeated()?.first()?.as_id()?;
    let name = first.value().trim();
    if name.is_empty() { None } else { Some(name.to_string()) }
}

impl<'m> Message<'m> {
    /// The parse context derived from the header.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// The parsed header segment.
    pub fn msh(&self) -> &SegmentValue {
        &self.msh
    }

    /// The `TYPE_TRIGGER` message type name from MSH-9, eg `ADT_A01`.
    ///
    /// Fails with [`Error::BadMessageType`] when the field is missing or
    /// not of that shape; the offending name is only echoed when it looks
    /// like a type name.
    pub fn message_type(&self) -> Result<String> {
        let field = self.msh.fields.get(MSH_MESSAGE_TYPE_INDEX).and_then(Option::as_ref);
        let name = match field.and_then(Value::as_composite) {
            Some(composite) => {
                let message_type = composite.field(1).and_then(Value::as_id);
                let trigger = composite.field(2).and_then(Value::as_id);
                match (message_type, trigger) {
                    (Some(t), Some(e)) => format!("{}_{}", t.value(), e.value()),
                    (Some(t), None) => t.value().to_string(),
                    _ => String::new(),
                }
            }
            None => String::new(),
        };
        if is_message_type_name(&name) {
            Ok(name)
        } else {
            Err(Error::BadMessageType { name })
        }
    }

    /// The first occurrence of the named segment, parsed against the
    /// built-in catalog. `Ok(None)` when the message has no such segment.
    pub fn segment(&self, name: &str) -> Result<Option<SegmentValue>> {
        self.segment_with(name, &DefaultRegistry)
    }

    /// As [`Message::segment`], resolving the layout from `registry`.
    pub fn segment_with(
        &self,
        name: &str,
        registry: &dyn SegmentRegistry,
    ) -> Result<Option<SegmentValue>> {
        let schema = registry
            .lookup(name)
            .ok_or_else(|| Error::BadSegment { name: name.to_string() })?;
        let delimiters = self.context.delimiters();
        for token in &self.segments {
            if !is_named(token, &delimiters, name) {
                continue;
            }
            let (value, errors) = parse_segment(token, &self.context, schema);
            errors.into_result().map_err(Error::Parse)?;
            return Ok(Some(value));
        }
        Ok(None)
    }

    /// Every occurrence of the named segment, in input order.
    ///
    /// Segments that parsed partially are still returned; the
    /// accompanying error list holds whatever went wrong. The only hard
    /// failure is a name the registry does not know.
    pub fn segment_all(&self, name: &str) -> Result<(Vec<SegmentValue>, ParseErrors)> {
        self.segment_all_with(name, &DefaultRegistry)
    }

    /// As [`Message::segment_all`], resolving the layout from `registry`.
    pub fn segment_all_with(
        &self,
        name: &str,
        registry: &dyn SegmentRegistry,
    ) -> Result<(Vec<SegmentValue>, ParseErrors)> {
        let schema = registry
            .lookup(name)
            .ok_or_else(|| Error::BadSegment { name: name.to_string() })?;
        let delimiters = self.context.delimiters();
        let mut values = Vec::new();
        let mut errors = ParseErrors::new();
        for token in &self.segments {
            if !is_named(token, &delimiters, name) {
                continue;
            }
            let (value, segment_errors) = parse_segment(token, &self.context, schema);
            errors.extend(segment_errors);
            values.push(value);
        }
        Ok((values, errors))
    }

    /// Every segment of the message, in input order.
    ///
    /// `Z...` segments come back as opaque [`ZSegment`]s rather than
    /// errors; any other unknown name is recorded as a
    /// [`Error::BadSegment`] at that segment's offset and skipped.
    pub fn segments(&self) -> (Vec<ParsedSegment>, ParseErrors) {
        self.segments_with(&DefaultRegistry)
    }

    /// As [`Message::segments`], resolving layouts from `registry`.
    pub fn segments_with(&self, registry: &dyn SegmentRegistry) -> (Vec<ParsedSegment>, ParseErrors) {
        let delimiters = self.context.delimiters();
        let mut values = Vec::with_capacity(self.segments.len());
        let mut errors = ParseErrors::new();
        for token in &self.segments {
            if token.value.is_empty() {
                continue;
            }
            let name = match segment_name(token, &delimiters) {
                Ok(name) => name,
                Err(error) => {
                    errors.push(*error);
                    continue;
                }
            };
            if name.starts_with('Z') {
                values.push(ParsedSegment::Z(ZSegment {
                    name,
                    offset: token.offset,
                    raw: token.value.to_vec(),
                }));
                continue;
            }
            let Some(schema) = registry.lookup(&name) else {
                errors.push(token.error(Error::BadSegment { name }));
                continue;
            };
            let (value, segment_errors) = parse_segment(token, &self.context, schema);
            errors.extend(segment_errors);
            values.push(ParsedSegment::Segment(value));
        }
        (values, errors)
    }
}

fn is_named(token: &Token<'_>, delimiters: &Delimiters, name: &str) -> bool {
    segment_name(token, delimiters).map(|n| n == name).unwrap_or(false)
}

/// The name of a segment token.
///
/// Names are 3 characters followed by the field delimiter; a bare
/// 3-character segment is accepted as well.
fn segment_name(
    token: &Token<'_>,
    delimiters: &Delimiters,
) -> std::result::Result<String, Box<ParseError>> {
    let value = token.value;
    if value.len() < 4 || value[3] != delimiters.field {
        if value.len() == 3 && is_segment_type_name(&String::from_utf8_lossy(value)) {
            return Ok(String::from_utf8_lossy(value).into_owned());
        }
        let end = value.len().min(3);
        let name = String::from_utf8_lossy(&value[..end]).into_owned();
        return Err(Box::new(token.error(Error::BadSegment { name })));
    }
    Ok(String::from_utf8_lossy(&value[..3]).into_owned())
}
