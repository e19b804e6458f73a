//! HL7 delimiter handling
//!
//! Five single-byte delimiters structure every message. The defaults are
//! `|^&~\`, but each message may redefine them in its MSH header, so the
//! set is carried in the parse [`Context`](crate::context::Context) and is
//! only final once MSH-1 has been read.

use crate::context::Nesting;
use crate::token::Token;

/// Default HL7 delimiters as defined in section 2.7 of the standard
pub const DEFAULT_FIELD_DELIMITER: u8 = b'|';
pub const DEFAULT_COMPONENT_DELIMITER: u8 = b'^';
pub const DEFAULT_SUBCOMPONENT_DELIMITER: u8 = b'&';
pub const DEFAULT_REPETITION_DELIMITER: u8 = b'~';
pub const DEFAULT_ESCAPE_CHARACTER: u8 = b'\\';

/// The delimiter characters used within a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delimiters {
    pub field: u8,
    pub component: u8,
    pub subcomponent: u8,
    pub repetition: u8,
    pub escape: u8,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            field: DEFAULT_FIELD_DELIMITER,
            component: DEFAULT_COMPONENT_DELIMITER,
            subcomponent: DEFAULT_SUBCOMPONENT_DELIMITER,
            repetition: DEFAULT_REPETITION_DELIMITER,
            escape: DEFAULT_ESCAPE_CHARACTER,
        }
    }
}

impl Delimiters {
    /// The four encoding characters as they appear in MSH-1, in wire order:
    /// component, repetition, escape, subcomponent.
    pub fn encoding_characters(&self) -> [u8; 4] {
        [self.component, self.repetition, self.escape, self.subcomponent]
    }

    /// Split a segment token into field tokens.
    pub fn split_fields<'m>(&self, segment: &Token<'m>) -> Vec<Token<'m>> {
        segment.split(self.field)
    }

    /// The delimiter that separates components at the given nesting level,
    /// or `None` once the two levels HL7 permits are exhausted.
    pub fn component_byte(&self, nesting: Nesting) -> Option<u8> {
        match nesting {
            Nesting::Top => Some(self.component),
            Nesting::Component => Some(self.subcomponent),
            Nesting::Subcomponent => None,
        }
    }

    /// Split a field token into component tokens at the given nesting level.
    ///
    /// Past the subcomponent level no further splitting occurs and the
    /// whole token is returned; a handful of poorly defined HL7 types rely
    /// on this.
    pub fn split_components<'m>(&self, field: &Token<'m>, nesting: Nesting) -> Vec<Token<'m>> {
        match self.component_byte(nesting) {
            Some(byte) => field.split(byte),
            None => vec![field.clone()],
        }
    }

    /// Join component values at the given nesting level.
    ///
    /// A single component passes through unchanged, which also covers
    /// types that bottomed out of nesting levels during parsing. Joining
    /// two or more components below the subcomponent level is a schema bug.
    pub fn join_components(&self, components: Vec<Vec<u8>>, nesting: Nesting) -> Vec<u8> {
        if components.len() <= 1 {
            return components.into_iter().next().unwrap_or_default();
        }
        match self.component_byte(nesting) {
            Some(byte) => join(components, byte),
            None => panic!("joining {} components past the subcomponent level", components.len()),
        }
    }

    /// Split a field token into repetition tokens.
    pub fn split_repeats<'m>(&self, field: &Token<'m>) -> Vec<Token<'m>> {
        field.split(self.repetition)
    }

    /// Join repetition values with the repetition delimiter.
    pub fn join_repeats(&self, repetitions: Vec<Vec<u8>>) -> Vec<u8> {
        join(repetitions, self.repetition)
    }
}

fn join(parts: Vec<Vec<u8>>, delimiter: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(parts.iter().map(|p| p.len() + 1).sum());
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            out.push(delimiter);
        }
        out.extend(part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delimiters() {
        let d = Delimiters::default();
        assert_eq!(d.field, b'|');
        assert_eq!(d.component, b'^');
        assert_eq!(d.subcomponent, b'&');
        assert_eq!(d.repetition, b'~');
        assert_eq!(d.escape, b'\\');
    }

    #[test]
    fn test_encoding_characters_wire_order() {
        assert_eq!(Delimiters::default().encoding_characters(), *b"^~\\&");
    }

    #[test]
    fn test_split_components_by_nesting() {
        let d = Delimiters::default();
        let token = Token::new(b"a^b&c", 0);

        let top = d.split_components(&token, Nesting::Top);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].value, b"a");
        assert_eq!(top[1].value, b"b&c");

        let nested = d.split_components(&token, Nesting::Component);
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].value, b"a^b");
        assert_eq!(nested[1].value, b"c");
    }

    #[test]
    fn test_split_components_bottoms_out() {
        let d = Delimiters::default();
        let token = Token::new(b"a^b&c", 0);
        let parts = d.split_components(&token, Nesting::Subcomponent);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].value, b"a^b&c");
    }

    #[test]
    fn test_join_components() {
        let d = Delimiters::default();
        let joined = d.join_components(vec![b"a".to_vec(), b"b".to_vec()], Nesting::Top);
        assert_eq!(joined, b"a^b");
        let joined = d.join_components(vec![b"a".to_vec(), b"b".to_vec()], Nesting::Component);
        assert_eq!(joined, b"a&b");
    }

    #[test]
    fn test_join_single_component_at_any_level() {
        let d = Delimiters::default();
        let joined = d.join_components(vec![b"a^b&c".to_vec()], Nesting::Subcomponent);
        assert_eq!(joined, b"a^b&c");
    }

    #[test]
    fn test_join_repeats() {
        let d = Delimiters::default();
        assert_eq!(d.join_repeats(vec![b"x".to_vec(), b"y".to_vec()]), b"x~y");
        assert_eq!(d.join_repeats(Vec::new()), b"");
    }
}
