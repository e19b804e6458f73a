//! HL7 escape sequence encoding and decoding
//!
//! Escape sequences are `\...\` frames whose delimiter byte is the
//! message's escape character. The alphabet a field accepts depends on its
//! type: ST and TX take the restricted set (`\F\ \S\ \T\ \R\ \E\`, plus
//! `\.br\` as a newline in TX), while FT adds highlighting, custom and
//! hexadecimal sequences and the `\.sp\` spacing directive.
//!
//! Two technically invalid shapes are accepted for interoperability: a
//! lone escape byte with no closing frame decodes as a single space (the
//! following text is kept), and the empty frame `\\` also decodes as a
//! single space.
//!
//! Encoding is canonical only: the five delimiter bytes and the newline.
//! Decoding a lenient variant and re-encoding therefore does not reproduce
//! the original bytes; round-trips are exact on canonical input.

use crate::delimiters::Delimiters;
use crate::error::{Error, Result};

/// Which escape alphabet a textual field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// Restricted: delimiter escapes only; formatting frames collapse to a
    /// space.
    St,
    /// Restricted plus `\.br\` as a newline.
    Tx,
    /// The full alphabet including `\H\`, `\N\`, `\Z...\`, `\X...\` and
    /// `\.sp\`.
    Ft,
}

/// Decode escape sequences in `input`, returning raw bytes.
///
/// Unknown letter sequences fail with [`Error::BadValue`]; see the module
/// docs for the lenient shapes that do not.
pub fn decode(input: &[u8], delimiters: &Delimiters, mode: TextMode) -> Result<Vec<u8>> {
    let escape = delimiters.escape;
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] != escape {
            out.push(input[i]);
            i += 1;
            continue;
        }
        match input[i + 1..].iter().position(|&b| b == escape) {
            // No closing escape byte: the lone escape decodes as a space
            // and the rest is ordinary text.
            None => {
                out.push(b' ');
                i += 1;
            }
            // The empty frame `\\` also decodes as a space.
            Some(0) => {
                out.push(b' ');
                i += 2;
            }
            Some(len) => {
                let sequence = &input[i + 1..i + 1 + len];
                decode_sequence(sequence, delimiters, mode, &mut out)?;
                i += len + 2;
            }
        }
    }
    Ok(out)
}

fn decode_sequence(
    sequence: &[u8],
    delimiters: &Delimiters,
    mode: TextMode,
    out: &mut Vec<u8>,
) -> Result<()> {
    match sequence {
        b"F" => out.push(delimiters.field),
        b"S" => out.push(delimiters.component),
        b"T" => out.push(delimiters.subcomponent),
        b"R" => out.push(delimiters.repetition),
        b"E" => out.push(delimiters.escape),
        _ if sequence[0] == b'.' => decode_format_command(sequence, mode, out)?,
        _ => match mode {
            TextMode::St | TextMode::Tx => return Err(Error::BadValue),
            TextMode::Ft => match sequence {
                // Highlighting carries no text of its own.
                b"H" | b"N" => {}
                [b'Z', rest @ ..] if !rest.is_empty() => {}
                [b'X', digits @ ..] => decode_hex(digits, out)?,
                _ => return Err(Error::BadValue),
            },
        },
    }
    Ok(())
}

/// Formatting commands (`\.br\`, `\.sp\`, ...).
///
/// ST fields have no notion of formatting, so any such frame collapses to
/// a single space there; TX knows only the line break.
fn decode_format_command(sequence: &[u8], mode: TextMode, out: &mut Vec<u8>) -> Result<()> {
    match mode {
        TextMode::St => out.push(b' '),
        TextMode::Tx => {
            if sequence == b".br" {
                out.push(b'\n');
            } else {
                out.push(b' ');
            }
        }
        TextMode::Ft => match sequence {
            b".br" => out.push(b'\n'),
            [b'.', b's', b'p', count @ ..] => {
                let count = match count {
                    [] => 1,
                    [b'+', digits @ ..] => parse_count(digits)?,
                    digits => parse_count(digits)?,
                };
                out.extend(std::iter::repeat_n(b'\n', count));
            }
            _ => return Err(Error::BadValue),
        },
    }
    Ok(())
}

fn parse_count(digits: &[u8]) -> Result<usize> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(Error::BadValue);
    }
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(Error::BadValue)
}

/// Decode a `\Xhh..\` body: an even, non-zero number of hex digits naming
/// raw bytes. Leading zero bytes are dropped, so `\X000a\` is a newline.
fn decode_hex(digits: &[u8], out: &mut Vec<u8>) -> Result<()> {
    if digits.is_empty() || digits.len() % 2 != 0 {
        return Err(Error::BadValue);
    }
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks(2) {
        let high = hex_value(pair[0])?;
        let low = hex_value(pair[1])?;
        bytes.push(high << 4 | low);
    }
    out.extend(bytes.into_iter().skip_while(|&b| b == 0));
    Ok(())
}

fn hex_value(digit: u8) -> Result<u8> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(Error::BadValue),
    }
}

/// Escape raw bytes for emission: the five active delimiter bytes become
/// their `\F\ \S\ \T\ \R\ \E\` frames and a newline becomes `\.br\`.
pub fn encode(input: &[u8], delimiters: &Delimiters) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    for &b in input {
        if b == delimiters.field {
            frame(b'F', delimiters, &mut out);
        } else if b == delimiters.component {
            frame(b'S', delimiters, &mut out);
        } else if b == delimiters.subcomponent {
            frame(b'T', delimiters, &mut out);
        } else if b == delimiters.repetition {
            frame(b'R', delimiters, &mut out);
        } else if b == delimiters.escape {
            frame(b'E', delimiters, &mut out);
        } else if b == b'\n' {
            out.push(delimiters.escape);
            out.extend_from_slice(b".br");
            out.push(delimiters.escape);
        } else {
            out.push(b);
        }
    }
    out
}

fn frame(letter: u8, delimiters: &Delimiters, out: &mut Vec<u8>) {
    out.push(delimiters.escape);
    out.push(letter);
    out.push(delimiters.escape);
}
