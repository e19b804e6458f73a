//! Character set selection for MSH-18
//!
//! HL7 2.3 lets the header declare the character set of the whole message.
//! The names this codec recognizes are mapped to `encoding_rs` decoders;
//! `ASCII` and the `UNICODE` variants are passed through untouched, on the
//! assumption that ASCII means UTF-8 in practice. Everything else the spec
//! lists (JIS, Big-5, ...) is treated as unknown.

use encoding_rs::Encoding;

use crate::error::{Error, Result};

/// A byte-to-string decoder selected from the declared character set.
///
/// The default is pass-through, which is also what an absent or empty
/// MSH-18 means.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Charset {
    encoding: Option<&'static Encoding>,
}

impl Default for Charset {
    fn default() -> Self {
        Self::passthrough()
    }
}

impl Charset {
    /// The pass-through charset: bytes are assumed to be UTF-8 compatible.
    pub fn passthrough() -> Self {
        Charset { encoding: None }
    }

    /// Resolve an HL7 character set name, eg `8859/1`.
    ///
    /// Returns `None` for names this codec does not handle. Note that
    /// encoding_rs follows the WHATWG Encoding Standard, so `8859/1` and
    /// `8859/9` resolve to windows-1252/-1254, supersets of the ISO charts.
    pub fn for_name(name: &str) -> Option<Charset> {
        let encoding = match name {
            "ASCII" | "UNICODE" | "UNICODE UTF-8" => return Some(Charset::passthrough()),
            "8859/1" => encoding_rs::WINDOWS_1252,
            "8859/2" => encoding_rs::ISO_8859_2,
            "8859/3" => encoding_rs::ISO_8859_3,
            "8859/4" => encoding_rs::ISO_8859_4,
            "8859/5" => encoding_rs::ISO_8859_5,
            "8859/6" => encoding_rs::ISO_8859_6,
            "8859/7" => encoding_rs::ISO_8859_7,
            "8859/8" => encoding_rs::ISO_8859_8,
            "8859/9" => encoding_rs::WINDOWS_1254,
            "8859/15" => encoding_rs::ISO_8859_15,
            _ => return None,
        };
        Some(Charset { encoding: Some(encoding) })
    }

    /// Decode raw field bytes to a string.
    ///
    /// Pass-through replaces invalid UTF-8 sequences rather than failing,
    /// so upstream encoding problems remain visible instead of killing the
    /// parse. A mapped charset that cannot decode its input is a data error.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self.encoding {
            None => Ok(String::from_utf8_lossy(bytes).into_owned()),
            Some(encoding) => encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|cow| cow.into_owned())
                .ok_or(Error::BadValue),
        }
    }
}
