//! The recursive parser and marshaller
//!
//! One pair of routines interprets every layout table. Parsing walks a
//! segment token field by field: primitives unmarshal their bytes,
//! composites split on the component delimiter of the current nesting
//! level and recurse one level deeper, repetitions split on the
//! repetition delimiter. Marshalling is the inverse traversal.
//!
//! Errors never short-circuit a segment: each failing leaf contributes a
//! `ParseError` with its offset and breadcrumb, and the caller receives
//! the partially parsed record alongside the collected errors.

use typed7_core::token::append_location;
use typed7_core::{Context, ParseErrors, Result, Token};

use crate::schema::{CompositeSchema, FieldKind, FieldSchema, SegmentSchema};
use crate::value::{CompositeValue, SegmentValue, Value};

/// Parse one segment token against its layout.
///
/// Returns the record together with every error found; the record holds
/// whatever did parse. Wire fields beyond the layout are silently
/// discarded, and missing trailing fields stay absent.
pub fn parse_segment(
    input: &Token<'_>,
    ctx: &Context,
    schema: &'static SegmentSchema,
) -> (SegmentValue, ParseErrors) {
    let fields = ctx.delimiters().split_fields(input);
    let mut segment =
        SegmentValue { name: schema.name, fields: vec![None; schema.fields.len()] };
    let mut errors = ParseErrors::new();
    for (i, field_schema) in schema.fields.iter().enumerate() {
        // Field 0 is the segment name; schema slot i maps to wire field i+1.
        if i + 1 >= fields.len() {
            break;
        }
        let mut field = fields[i + 1].clone();
        field.location = field_location(schema.name, i, field_schema.tag);
        let (value, field_errors) = parse_value(&field, ctx, field_schema);
        segment.fields[i] = value;
        errors.extend(field_errors);
    }
    (segment, errors)
}

fn parse_value(
    input: &Token<'_>,
    ctx: &Context,
    schema: &FieldSchema,
) -> (Option<Value>, ParseErrors) {
    if input.value.is_empty() {
        return (None, ParseErrors::new());
    }
    if !schema.repeated {
        return parse_element(input, ctx, &schema.kind);
    }
    let mut errors = ParseErrors::new();
    let elements = ctx.delimiters().split_repeats(input);
    let mut values = Vec::with_capacity(elements.len());
    for element in &elements {
        let (value, element_errors) = parse_element(element, ctx, &schema.kind);
        errors.extend(element_errors);
        // Empty elements keep their position so repetition counts survive.
        values.push(value.unwrap_or_else(|| Value::default_for(&schema.kind)));
    }
    (Some(Value::Repeated(values)), errors)
}

fn parse_element(
    input: &Token<'_>,
    ctx: &Context,
    kind: &FieldKind,
) -> (Option<Value>, ParseErrors) {
    if input.value.is_empty() {
        return (None, ParseErrors::new());
    }
    match kind {
        FieldKind::Primitive(kind) => match Value::unmarshal_primitive(*kind, input.value, ctx) {
            Ok(value) => (Some(value), ParseErrors::new()),
            Err(cause) => (None, input.errors(cause)),
        },
        FieldKind::Composite(schema) => {
            let (value, errors) = parse_composite(input, ctx, schema);
            (Some(Value::Composite(value)), errors)
        }
    }
}

fn parse_composite(
    input: &Token<'_>,
    ctx: &Context,
    schema: &'static CompositeSchema,
) -> (CompositeValue, ParseErrors) {
    let components = ctx.delimiters().split_components(input, ctx.nesting);
    let mut composite =
        CompositeValue { name: schema.name, fields: vec![None; schema.fields.len()] };
    let mut errors = ParseErrors::new();
    let nested = ctx.nested();
    for (i, field_schema) in schema.fields.iter().enumerate() {
        if i >= components.len() {
            break;
        }
        let mut component = components[i].clone();
        component.location = append_location(
            &component.location,
            &field_location(schema.name, i, field_schema.tag),
        );
        let (value, component_errors) = parse_value(&component, &nested, field_schema);
        composite.fields[i] = value;
        errors.extend(component_errors);
    }
    (composite, errors)
}

/// The breadcrumb fragment for slot `index` of type `name`, eg
/// `PID-3-Patient ID`.
fn field_location(name: &str, index: usize, tag: &str) -> String {
    if tag.is_empty() {
        format!("{}-{}", name, index + 1)
    } else {
        format!("{}-{}-{}", name, index + 1, tag)
    }
}

/// Render a segment record back to wire bytes.
///
/// Trailing absent fields are trimmed; interior absent fields emit empty
/// strings between delimiters. The MSH delimiter field renders itself, so
/// no header special case is needed here.
pub fn marshal_segment(segment: &SegmentValue, ctx: &Context) -> Result<Vec<u8>> {
    let delimiters = ctx.delimiters();
    let mut out = segment.name.as_bytes().to_vec();
    let end = segment.fields.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
    for field in &segment.fields[..end] {
        out.push(delimiters.field);
        if let Some(value) = field {
            out.extend(marshal_value(value, ctx)?);
        }
    }
    Ok(out)
}

fn marshal_value(value: &Value, ctx: &Context) -> Result<Vec<u8>> {
    if let Some(primitive) = value.as_primitive() {
        return primitive.marshal(ctx);
    }
    match value {
        Value::Composite(composite) => {
            let end = composite.fields.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
            let nested = ctx.nested();
            let mut components = Vec::with_capacity(end);
            for field in &composite.fields[..end] {
                components.push(match field {
                    Some(value) => marshal_value(value, &nested)?,
                    None => Vec::new(),
                });
            }
            Ok(ctx.delimiters().join_components(components, ctx.nesting))
        }
        Value::Repeated(elements) => {
            let mut repetitions = Vec::with_capacity(elements.len());
            for element in elements {
                repetitions.push(marshal_value(element, ctx)?);
            }
            Ok(ctx.delimiters().join_repeats(repetitions))
        }
        // as_primitive covered every other variant.
        _ => unreachable!("non-primitive, non-container value"),
    }
}

/// Render segment records as a whole message, joined by `terminator`.
pub fn marshal_message(
    segments: &[SegmentValue],
    ctx: &Context,
    terminator: &[u8],
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.extend_from_slice(terminator);
        }
        out.extend(marshal_segment(segment, ctx)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use typed7_core::{Hd, Is, St};

    fn parse(input: &[u8], schema: &'static SegmentSchema) -> (SegmentValue, ParseErrors) {
        let ctx = Context::new();
        parse_segment(&Token::new(input, 0), &ctx, schema)
    }

    #[test]
    fn test_parse_simple_segment() {
        let (nte, errors) = parse(b"NTE|1|L|first comment", &catalog::NTE);
        assert!(errors.is_empty());
        assert_eq!(nte.field(1).and_then(Value::as_si).map(|si| si.value), Some(1));
        assert_eq!(nte.field(2).and_then(Value::as_id), Some(&"L".into()));
        let comments = nte.field(3).and_then(Value::as_repeated).unwrap();
        assert_eq!(comments[0].as_ft().map(|ft| ft.value()), Some("first comment"));
    }

    #[test]
    fn test_trailing_empty_fields_match_omitted_fields() {
        let (with_trailing, errors) = parse(b"NTE|1|L|comment|||", &catalog::NTE);
        assert!(errors.is_empty());
        let (without, _) = parse(b"NTE|1|L|comment", &catalog::NTE);
        assert_eq!(with_trailing, without);
    }

    #[test]
    fn test_extra_fields_beyond_schema_are_discarded() {
        let (nte, errors) = parse(b"NTE|1|L|comment|surplus|more", &catalog::NTE);
        assert!(errors.is_empty());
        assert_eq!(nte.fields.len(), catalog::NTE.fields.len());
    }

    #[test]
    fn test_interior_empty_fields_are_absent() {
        let (nte, _) = parse(b"NTE|1||comment", &catalog::NTE);
        assert!(nte.field(1).is_some());
        assert!(nte.field(2).is_none());
        assert!(nte.field(3).is_some());
    }

    #[test]
    fn test_composite_and_subcomponent_levels() {
        let (pid, errors) =
            parse(b"PID|1||12345^^^SENDER&1.2.3&ISO^MR||DOE^JOHN", &catalog::PID);
        assert!(errors.is_empty());

        let ids = pid.field(3).and_then(Value::as_repeated).unwrap();
        let cx = ids[0].as_composite().unwrap();
        assert_eq!(cx.name, "CX");
        assert_eq!(cx.field(1).and_then(Value::as_st), Some(&St::new("12345")));
        let authority = cx.field(4).and_then(Value::as_hd).unwrap();
        assert_eq!(
            authority,
            &Hd {
                namespace_id: Some(Is::new("SENDER")),
                universal_id: Some(St::new("1.2.3")),
                universal_id_type: Some("ISO".into()),
            }
        );
        assert_eq!(cx.field(5).and_then(Value::as_is), Some(&Is::new("MR")));

        let names = pid.field(5).and_then(Value::as_repeated).unwrap();
        let xpn = names[0].as_composite().unwrap();
        assert_eq!(xpn.field(1).and_then(Value::as_st), Some(&St::new("DOE")));
        assert_eq!(xpn.field(2).and_then(Value::as_st), Some(&St::new("JOHN")));
    }

    #[test]
    fn test_repetitions_preserve_positions() {
        let (pid, _) = parse(b"PID|1||A~~C", &catalog::PID);
        let ids = pid.field(3).and_then(Value::as_repeated).unwrap();
        assert_eq!(ids.len(), 3);
        // The empty middle repetition keeps its slot as a default value.
        let middle = ids[1].as_composite().unwrap();
        assert!(middle.fields.iter().all(Option::is_none));
    }

    #[test]
    fn test_errors_carry_breadcrumbs_and_offsets() {
        let input = b"PID|x||||||not-a-date";
        let (pid, errors) = parse(input, &catalog::PID);
        assert_eq!(errors.len(), 2);

        let first = &errors.0[0];
        assert_eq!(first.location, "PID-1-Set ID");
        assert_eq!(first.offset, 4);
        let second = &errors.0[1];
        assert_eq!(second.location, "PID-7-Date/Time of Birth");
        assert_eq!(second.offset, 11);

        // The rest of the segment still parsed.
        assert!(pid.field(1).is_none());
        assert!(pid.field(7).is_none());
    }

    #[test]
    fn test_nested_breadcrumbs_use_slash() {
        // CX-1 inside PID-3 holds an ST, which rejects \H\.
        let input = br"PID|||bad\H\value^^^AUTH";
        let (_, errors) = parse(input, &catalog::PID);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.0[0].location, "PID-3-Patient ID/CX-1-ID");
    }

    #[test]
    fn test_marshal_round_trip() {
        let input: &[u8] = b"PID|1||12345^^^SENDER&1.2.3&ISO^MR~67890^^^OTHER||DOE^JOHN^A";
        let ctx = Context::new();
        let (pid, errors) = parse_segment(&Token::new(input, 0), &ctx, &catalog::PID);
        assert!(errors.is_empty());
        assert_eq!(marshal_segment(&pid, &ctx).unwrap(), input);
    }

    #[test]
    fn test_marshal_trims_trailing_absent_fields() {
        let (pid, _) = parse(b"PID|1|||||||||||||||", &catalog::PID);
        let ctx = Context::new();
        assert_eq!(marshal_segment(&pid, &ctx).unwrap(), b"PID|1");
    }

    #[test]
    fn test_marshal_keeps_interior_absent_fields() {
        let (nte, _) = parse(b"NTE|1||comment", &catalog::NTE);
        let ctx = Context::new();
        assert_eq!(marshal_segment(&nte, &ctx).unwrap(), b"NTE|1||comment");
    }

    #[test]
    fn test_marshal_message_joins_with_terminator() {
        let ctx = Context::new();
        let (msh, _) =
            parse_segment(&Token::new(b"MSH|^~\\&|App", 0), &ctx, &catalog::MSH);
        let (nte, _) = parse_segment(&Token::new(b"NTE|1", 0), &ctx, &catalog::NTE);
        let out = marshal_message(&[msh, nte], &ctx, b"\r").unwrap();
        assert_eq!(out, b"MSH|^~\\&|App\rNTE|1");
    }
}
