//! HL7 primitive data types
//!
//! Every leaf type implements [`Primitive`]: `marshal` renders the value
//! to wire bytes and `unmarshal` replaces the value from wire bytes, both
//! under a [`Context`] that supplies delimiters, charset and timezone.
//!
//! Textual primitives distinguish three states: absent (the empty string,
//! never written on marshal), explicit HL7 null (the literal two-byte
//! token `""`, preserved byte-for-byte) and valued. The numeric types
//! carry a validity flag instead, with the explicit null parsing to an
//! invalid value.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::Context;
use crate::delimiters::Delimiters;
use crate::error::{Error, Result};
use crate::escape::{self, TextMode};

/// The explicit HL7 null: two double quotes with nothing between them.
pub const HL7_NULL: &[u8] = b"\"\"";

/// A primitive HL7 type, eg ST or ID.
pub trait Primitive {
    /// Render the value to wire bytes. Absent values render to nothing.
    fn marshal(&self, ctx: &Context) -> Result<Vec<u8>>;
    /// Replace the value from wire bytes.
    fn unmarshal(&mut self, field: &[u8], ctx: &Context) -> Result<()>;
}

fn is_hl7_null(field: &[u8]) -> bool {
    field == HL7_NULL
}

macro_rules! textual {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                $name(value.into())
            }

            /// The raw stored value; an explicit null is the literal `""`.
            pub fn value(&self) -> &str {
                &self.0
            }

            /// The value with the explicit null collapsed to an empty
            /// string, safe to hand to code that does not know about HL7
            /// nulls.
            pub fn sanitized(&self) -> &str {
                if self.is_null() { "" } else { &self.0 }
            }

            /// True if this value is the explicit HL7 null.
            pub fn is_null(&self) -> bool {
                self.0.as_bytes() == HL7_NULL
            }

            /// True for both the zero value and the explicit null.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty() || self.is_null()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name::new(value)
            }
        }
    };
}

macro_rules! verbatim_codec {
    ($name:ident) => {
        impl Primitive for $name {
            fn marshal(&self, _ctx: &Context) -> Result<Vec<u8>> {
                Ok(self.0.as_bytes().to_vec())
            }

            fn unmarshal(&mut self, field: &[u8], ctx: &Context) -> Result<()> {
                if is_hl7_null(field) {
                    self.0 = String::from_utf8_lossy(HL7_NULL).into_owned();
                    return Ok(());
                }
                self.0 = ctx.decode_text(field)?;
                Ok(())
            }
        }
    };
}

macro_rules! escaped_codec {
    ($name:ident, $mode:expr) => {
        impl Primitive for $name {
            fn marshal(&self, ctx: &Context) -> Result<Vec<u8>> {
                Ok(escape::encode(self.0.as_bytes(), &ctx.delimiters()))
            }

            fn unmarshal(&mut self, field: &[u8], ctx: &Context) -> Result<()> {
                if is_hl7_null(field) {
                    self.0 = String::from_utf8_lossy(HL7_NULL).into_owned();
                    return Ok(());
                }
                let text = ctx.decode_text(field)?;
                let unescaped = escape::decode(text.as_bytes(), &ctx.delimiters(), $mode)?;
                self.0 = String::from_utf8_lossy(&unescaped).into_owned();
                Ok(())
            }
        }
    };
}

textual! {
    /// ST - string data, with the restricted escape alphabet.
    St
}
escaped_codec!(St, TextMode::St);

textual! {
    /// TX - text data; like ST but line breaks are meaningful.
    Tx
}
escaped_codec!(Tx, TextMode::Tx);

textual! {
    /// FT - formatted text, with the full escape alphabet including
    /// highlighting, hexadecimal and spacing directives.
    Ft
}
escaped_codec!(Ft, TextMode::Ft);

textual! {
    /// ID - a value from an HL7-defined table. No escape processing.
    Id
}
verbatim_codec!(Id);

textual! {
    /// IS - a value from a user-defined table. No escape processing.
    Is
}
verbatim_codec!(Is);

textual! {
    /// DT - a date, kept as its textual form `YYYY[MM[DD]]`.
    Dt
}
verbatim_codec!(Dt);

textual! {
    /// TM - a time, kept as its textual form `HH[MM[SS[.S{1,4}]]]`.
    Tm
}
verbatim_codec!(Tm);

textual! {
    /// TN - a telephone number in North American format.
    Tn
}
verbatim_codec!(Tn);

/// SI - a sequence identifier: a non-negative integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Si {
    pub value: u64,
    pub valid: bool,
}

impl Si {
    pub fn new(value: u64) -> Self {
        Si { value, valid: true }
    }
}

impl Primitive for Si {
    fn marshal(&self, _ctx: &Context) -> Result<Vec<u8>> {
        if !self.valid {
            return Ok(HL7_NULL.to_vec());
        }
        Ok(self.value.to_string().into_bytes())
    }

    fn unmarshal(&mut self, field: &[u8], _ctx: &Context) -> Result<()> {
        if is_hl7_null(field) {
            *self = Si::default();
            return Ok(());
        }
        if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
            return Err(Error::BadValue);
        }
        let digits = std::str::from_utf8(field).map_err(|_| Error::BadValue)?;
        let value = digits.parse().map_err(|_| Error::BadValue)?;
        *self = Si::new(value);
        Ok(())
    }
}

/// NM - a numeric value: an optionally signed decimal number.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nm {
    pub value: f64,
    pub valid: bool,
}

impl Nm {
    pub fn new(value: f64) -> Self {
        Nm { value, valid: true }
    }
}

fn is_decimal_number(field: &[u8]) -> bool {
    let digits = match field {
        [b'+' | b'-', rest @ ..] => rest,
        rest => rest,
    };
    !digits.is_empty()
        && digits.iter().any(u8::is_ascii_digit)
        && digits.iter().all(|&b| b.is_ascii_digit() || b == b'.')
        && digits.iter().filter(|&&b| b == b'.').count() <= 1
}

impl Primitive for Nm {
    fn marshal(&self, _ctx: &Context) -> Result<Vec<u8>> {
        if !self.valid {
            return Ok(HL7_NULL.to_vec());
        }
        Ok(self.value.to_string().into_bytes())
    }

    fn unmarshal(&mut self, field: &[u8], _ctx: &Context) -> Result<()> {
        if is_hl7_null(field) {
            *self = Nm::default();
            return Ok(());
        }
        if !is_decimal_number(field) {
            return Err(Error::BadValue);
        }
        let text = std::str::from_utf8(field).map_err(|_| Error::BadValue)?;
        let value = text.parse().map_err(|_| Error::BadValue)?;
        *self = Nm::new(value);
        Ok(())
    }
}

static SNM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?\d[0-9 ]*$").expect("SNM regex"));

/// SNM - a "string numeric": a telephone-style digit string that may
/// carry one leading `+` and interior spaces. Surrounding whitespace is
/// trimmed, the interior is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snm {
    pub value: String,
    pub valid: bool,
}

impl Snm {
    pub fn new(value: impl Into<String>) -> Self {
        Snm { value: value.into(), valid: true }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl Primitive for Snm {
    fn marshal(&self, _ctx: &Context) -> Result<Vec<u8>> {
        if !self.valid {
            return Ok(HL7_NULL.to_vec());
        }
        Ok(self.value.as_bytes().to_vec())
    }

    fn unmarshal(&mut self, field: &[u8], _ctx: &Context) -> Result<()> {
        if is_hl7_null(field) {
            *self = Snm::default();
            return Ok(());
        }
        let text = std::str::from_utf8(field).map_err(|_| Error::BadValue)?;
        let trimmed = text.trim();
        if !SNM_RE.is_match(trimmed) {
            return Err(Error::BadValue);
        }
        *self = Snm::new(trimmed);
        Ok(())
    }
}

/// CM - a composite left opaque by the schema; raw bytes pass through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cm(Vec<u8>);

/// A field whose type varies at runtime, eg OBX-5; raw bytes pass through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Any(Vec<u8>);

macro_rules! opaque_bytes {
    ($name:ident) => {
        impl $name {
            pub fn new(value: impl Into<Vec<u8>>) -> Self {
                $name(value.into())
            }

            pub fn value(&self) -> &[u8] {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl Primitive for $name {
            fn marshal(&self, _ctx: &Context) -> Result<Vec<u8>> {
                Ok(self.0.clone())
            }

            fn unmarshal(&mut self, field: &[u8], _ctx: &Context) -> Result<()> {
                self.0 = field.to_vec();
                Ok(())
            }
        }
    };
}

opaque_bytes!(Cm);
opaque_bytes!(Any);

textual! {
    /// NUL - a field that carries no information; kept only so that its
    /// position round-trips.
    Nul
}
verbatim_codec!(Nul);

/// HD - a hierarchic designator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hd {
    pub namespace_id: Option<Is>,
    pub universal_id: Option<St>,
    pub universal_id_type: Option<Id>,
}

impl Hd {
    /// The `^`-joined string form with trailing absent components trimmed.
    /// Explicit nulls stay visible as `""`.
    pub fn sanitized_string(&self) -> String {
        self.to_string()
    }

    fn parts(&self) -> [Option<&str>; 3] {
        [
            self.namespace_id.as_ref().map(Is::value),
            self.universal_id.as_ref().map(St::value),
            self.universal_id_type.as_ref().map(Id::value),
        ]
    }
}

impl std::fmt::Display for Hd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts = self.parts();
        let end = parts.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
        for (i, part) in parts.iter().take(end).enumerate() {
            if i > 0 {
                f.write_str("^")?;
            }
            f.write_str(part.unwrap_or(""))?;
        }
        Ok(())
    }
}

impl Primitive for Hd {
    fn marshal(&self, ctx: &Context) -> Result<Vec<u8>> {
        let nested = ctx.nested();
        let marshalled = [
            match &self.namespace_id {
                Some(v) => Some(v.marshal(&nested)?),
                None => None,
            },
            match &self.universal_id {
                Some(v) => Some(v.marshal(&nested)?),
                None => None,
            },
            match &self.universal_id_type {
                Some(v) => Some(v.marshal(&nested)?),
                None => None,
            },
        ];
        let end = marshalled.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
        let components = marshalled
            .into_iter()
            .take(end)
            .map(Option::unwrap_or_default)
            .collect();
        Ok(ctx.delimiters().join_components(components, ctx.nesting))
    }

    fn unmarshal(&mut self, field: &[u8], ctx: &Context) -> Result<()> {
        let components: Vec<&[u8]> = match ctx.delimiters().component_byte(ctx.nesting) {
            Some(byte) => field.split(|&b| b == byte).collect(),
            None => vec![field],
        };
        let nested = ctx.nested();
        *self = Hd::default();
        for (i, component) in components.iter().take(3).enumerate() {
            if component.is_empty() {
                continue;
            }
            match i {
                0 => {
                    let mut value = Is::default();
                    value.unmarshal(component, &nested)?;
                    self.namespace_id = Some(value);
                }
                1 => {
                    let mut value = St::default();
                    value.unmarshal(component, &nested)?;
                    self.universal_id = Some(value);
                }
                _ => {
                    let mut value = Id::default();
                    value.unmarshal(component, &nested)?;
                    self.universal_id_type = Some(value);
                }
            }
        }
        Ok(())
    }
}

impl Primitive for Delimiters {
    fn marshal(&self, _ctx: &Context) -> Result<Vec<u8>> {
        Ok(self.encoding_characters().to_vec())
    }

    /// Unmarshalling delimiters replaces the active set on the
    /// surrounding context: everything after MSH-1 in the same message is
    /// split and unescaped with the new bytes.
    fn unmarshal(&mut self, field: &[u8], ctx: &Context) -> Result<()> {
        if field.len() < 4 {
            return Err(Error::BadValue);
        }
        *self = Delimiters {
            // The field delimiter was already fixed by byte 4 of the
            // message and is carried in the context.
            field: ctx.delimiters().field,
            component: field[0],
            repetition: field[1],
            escape: field[2],
            subcomponent: field[3],
        };
        ctx.set_delimiters(*self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Context {
        Context::new()
    }

    #[test]
    fn test_textual_three_states() {
        let absent = St::default();
        assert!(absent.is_empty());
        assert!(!absent.is_null());

        let null = St::new("\"\"");
        assert!(null.is_empty());
        assert!(null.is_null());
        assert_eq!(null.value(), "\"\"");
        assert_eq!(null.sanitized(), "");

        let valued = St::new("value");
        assert!(!valued.is_empty());
        assert_eq!(valued.sanitized(), "value");
    }

    #[test]
    fn test_textual_round_trips() {
        let ctx = ctx();
        macro_rules! round_trip {
            ($type:ident) => {
                let original = $type::new("value");
                let bytes = original.marshal(&ctx).unwrap();
                let mut decoded = $type::default();
                decoded.unmarshal(&bytes, &ctx).unwrap();
                assert_eq!(decoded, original);
            };
        }
        round_trip!(St);
        round_trip!(Id);
        round_trip!(Is);
        round_trip!(Dt);
        round_trip!(Tm);
        round_trip!(Tn);
        round_trip!(Tx);
        round_trip!(Ft);
        round_trip!(Nul);
    }

    #[test]
    fn test_explicit_null_round_trips_byte_for_byte() {
        let ctx = ctx();
        let mut st = St::default();
        st.unmarshal(b"\"\"", &ctx).unwrap();
        assert!(st.is_null());
        assert_eq!(st.marshal(&ctx).unwrap(), HL7_NULL);
    }

    #[test]
    fn test_st_unescapes_and_reescapes() {
        let ctx = ctx();
        let mut st = St::default();
        st.unmarshal(br"One\F\Escape", &ctx).unwrap();
        assert_eq!(st.value(), "One|Escape");
        assert_eq!(st.marshal(&ctx).unwrap(), br"One\F\Escape");
    }

    #[test]
    fn test_st_rejects_full_alphabet_sequences() {
        let ctx = ctx();
        let mut st = St::default();
        assert!(st.unmarshal(br"Highlighting \H\escape", &ctx).is_err());
        assert!(st.unmarshal(br"Hexadecimal \X9\value", &ctx).is_err());
    }

    #[test]
    fn test_ft_hexadecimal_and_line_breaks() {
        let ctx = ctx();
        let mut ft = Ft::default();
        ft.unmarshal(br"Hexadecimal \X000a\with X000a", &ctx).unwrap();
        assert_eq!(ft.value(), "Hexadecimal \nwith X000a");

        let ft = Ft::new("line break 1\nline break 2\n");
        assert_eq!(ft.marshal(&ctx).unwrap(), br"line break 1\.br\line break 2\.br\");
    }

    #[test]
    fn test_id_keeps_escape_sequences_verbatim() {
        let ctx = ctx();
        let mut id = Id::default();
        id.unmarshal(br"One\F\NotAnEscape", &ctx).unwrap();
        assert_eq!(id.value(), r"One\F\NotAnEscape");
        assert_eq!(id.marshal(&ctx).unwrap(), br"One\F\NotAnEscape");
    }

    #[test]
    fn test_si_accepts_non_negative_integers() {
        let ctx = ctx();
        let cases: [(&[u8], Si); 5] = [
            (b"0", Si::new(0)),
            (b"1", Si::new(1)),
            (b"2", Si::new(2)),
            (b"112233445566", Si::new(112233445566)),
            (b"\"\"", Si::default()),
        ];
        for (input, want) in cases {
            let mut si = Si::default();
            si.unmarshal(input, &ctx).unwrap();
            assert_eq!(si, want, "input {:?}", input);
        }
    }

    #[test]
    fn test_si_rejections() {
        let ctx = ctx();
        for input in [&b""[..], b"-", b" ", b"-1", b"1.2", b"2-1", b"+1"] {
            let mut si = Si::default();
            assert!(si.unmarshal(input, &ctx).is_err(), "input {:?}", input);
        }
    }

    #[test]
    fn test_nm_accepts_signed_decimals() {
        let ctx = ctx();
        let cases: [(&[u8], f64); 9] = [
            (b"0", 0.0),
            (b"-0", 0.0),
            (b"0.0", 0.0),
            (b"0011.2200", 11.22),
            (b"-0011.2200", -11.22),
            (b"112233445566", 112233445566.0),
            (b"-112233445566", -112233445566.0),
            (b"112233445566.77", 112233445566.77),
            (b"-112233445566.77", -112233445566.77),
        ];
        for (input, want) in cases {
            let mut nm = Nm::default();
            nm.unmarshal(input, &ctx).unwrap();
            assert!(nm.valid);
            assert_eq!(nm.value, want, "input {:?}", input);
        }

        let mut nm = Nm::new(1.0);
        nm.unmarshal(b"\"\"", &ctx).unwrap();
        assert!(!nm.valid);
    }

    #[test]
    fn test_nm_rejections() {
        let ctx = ctx();
        for input in [&b""[..], b"-", b" ", b"2-1", b"1e5", b"--1", b"1.2.3"] {
            let mut nm = Nm::default();
            assert!(nm.unmarshal(input, &ctx).is_err(), "input {:?}", input);
        }
    }

    #[test]
    fn test_nm_round_trip() {
        let ctx = ctx();
        let bytes = Nm::new(44.0).marshal(&ctx).unwrap();
        assert_eq!(bytes, b"44");
        let mut nm = Nm::default();
        nm.unmarshal(&bytes, &ctx).unwrap();
        assert_eq!(nm, Nm::new(44.0));
    }

    #[test]
    fn test_snm_accepts_digit_strings() {
        let ctx = ctx();
        let cases: [(&[u8], &str); 7] = [
            (b"1234", "1234"),
            (b"00012345", "00012345"),
            (b"+0012345", "+0012345"),
            (b"123 456", "123 456"),
            (b"+1 123 456", "+1 123 456"),
            (b"  +1 123 456  ", "+1 123 456"),
            (b"+00 123 456", "+00 123 456"),
        ];
        for (input, want) in cases {
            let mut snm = Snm::default();
            snm.unmarshal(input, &ctx).unwrap();
            assert_eq!(snm, Snm::new(want), "input {:?}", input);
        }

        let mut snm = Snm::new("1");
        snm.unmarshal(b"\"\"", &ctx).unwrap();
        assert!(!snm.valid);
    }

    #[test]
    fn test_snm_rejections() {
        let ctx = ctx();
        let cases: [&[u8]; 7] =
            [b"a string", b"-", b"-0", b"1.5", b"+44+32789", b"+44 +32 789", b"+  123 456"];
        for input in cases {
            let mut snm = Snm::default();
            assert!(snm.unmarshal(input, &ctx).is_err(), "input {:?}", input);
        }
    }

    #[test]
    fn test_opaque_carriers_round_trip() {
        let ctx = ctx();
        let cm = Cm::new(&b"raw^bytes&kept|verbatim"[..]);
        let bytes = cm.marshal(&ctx).unwrap();
        let mut decoded = Cm::default();
        decoded.unmarshal(&bytes, &ctx).unwrap();
        assert_eq!(decoded, cm);

        let any = Any::new(&b"value"[..]);
        assert_eq!(any.marshal(&ctx).unwrap(), b"value");
    }

    #[test]
    fn test_hd_string_forms() {
        let hd = Hd {
            namespace_id: Some(Is::new("namespace")),
            universal_id: Some(St::new("ID")),
            universal_id_type: Some(Id::new("IDType")),
        };
        assert_eq!(hd.to_string(), "namespace^ID^IDType");

        let hd = Hd { namespace_id: Some(Is::new("namespace")), ..Hd::default() };
        assert_eq!(hd.to_string(), "namespace");

        let hd = Hd { universal_id: Some(St::new("UID")), ..Hd::default() };
        assert_eq!(hd.to_string(), "^UID");

        let hd = Hd {
            namespace_id: Some(Is::new("namespace")),
            universal_id: None,
            universal_id_type: Some(Id::new("IDType")),
        };
        assert_eq!(hd.to_string(), "namespace^^IDType");

        assert_eq!(Hd::default().to_string(), "");

        let all_null = Hd {
            namespace_id: Some(Is::new("\"\"")),
            universal_id: Some(St::new("\"\"")),
            universal_id_type: Some(Id::new("\"\"")),
        };
        assert_eq!(all_null.sanitized_string(), "\"\"^\"\"^\"\"");
    }

    #[test]
    fn test_hd_unmarshal_at_top_level() {
        let ctx = ctx();
        let mut hd = Hd::default();
        hd.unmarshal(b"SENDER^1.2.3^ISO", &ctx).unwrap();
        assert_eq!(hd.namespace_id, Some(Is::new("SENDER")));
        assert_eq!(hd.universal_id, Some(St::new("1.2.3")));
        assert_eq!(hd.universal_id_type, Some(Id::new("ISO")));
        assert_eq!(hd.marshal(&ctx).unwrap(), b"SENDER^1.2.3^ISO");
    }

    #[test]
    fn test_hd_unmarshal_nested_uses_subcomponents() {
        let ctx = ctx().nested();
        let mut hd = Hd::default();
        hd.unmarshal(b"SENDER&1.2.3&ISO", &ctx).unwrap();
        assert_eq!(hd.namespace_id, Some(Is::new("SENDER")));
        assert_eq!(hd.universal_id, Some(St::new("1.2.3")));
        assert_eq!(hd.marshal(&ctx).unwrap(), b"SENDER&1.2.3&ISO");
    }

    #[test]
    fn test_hd_trims_trailing_absent_components() {
        let ctx = ctx();
        let mut hd = Hd::default();
        hd.unmarshal(b"SENDER", &ctx).unwrap();
        assert_eq!(hd.universal_id, None);
        assert_eq!(hd.marshal(&ctx).unwrap(), b"SENDER");
    }

    #[test]
    fn test_delimiters_unmarshal_updates_context() {
        let ctx = ctx();
        let mut delimiters = Delimiters::default();
        delimiters.unmarshal(b"@!?%", &ctx).unwrap();
        assert_eq!(delimiters.component, b'@');
        assert_eq!(delimiters.repetition, b'!');
        assert_eq!(delimiters.escape, b'?');
        assert_eq!(delimiters.subcomponent, b'%');
        assert_eq!(delimiters.field, b'|');
        assert_eq!(ctx.delimiters(), delimiters);
    }

    #[test]
    fn test_delimiters_unmarshal_requires_four_bytes() {
        let ctx = ctx();
        let mut delimiters = Delimiters::default();
        assert!(delimiters.unmarshal(b"@!?", &ctx).is_err());
    }

    #[test]
    fn test_delimiters_marshal_is_msh1_body() {
        let ctx = ctx();
        assert_eq!(Delimiters::default().marshal(&ctx).unwrap(), b"^~\\&");
    }
}
