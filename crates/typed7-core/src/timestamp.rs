//! TS and DTM: timestamps with precision
//!
//! The wire grammar is `YYYY[MM[DD[HH[MM[SS[.F{1..4}]]]]]]` optionally
//! followed by a `+HHMM`/`-HHMM` offset. The precision travels with the
//! value: implicitly as the number of digits present, or (TS only) as an
//! explicit trailing component `^Y|L|D|H|M|S` that overrides it.
//!
//! Values without an offset are interpreted in the context timezone, and
//! rendering always emits local time in that timezone without an offset;
//! the receiving side supplies the zone from its own context.

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::types::{HL7_NULL, Primitive};

/// The coarsest unit for which a timestamp carries meaningful digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TsPrecision {
    #[default]
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Tenth,
    Hundredth,
    Thousandth,
    TenThousandth,
}

/// TS - a timestamp with precision and an optional explicit precision
/// override component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ts {
    pub time: Option<DateTime<Utc>>,
    pub precision: TsPrecision,
    pub is_null: bool,
}

impl Ts {
    pub fn new(time: DateTime<Utc>, precision: TsPrecision) -> Self {
        Ts { time: Some(time), precision, is_null: false }
    }

    /// The explicit HL7 null value.
    pub fn null() -> Self {
        Ts { time: None, precision: TsPrecision::default(), is_null: true }
    }
}

impl Primitive for Ts {
    fn marshal(&self, ctx: &Context) -> Result<Vec<u8>> {
        marshal_timestamp(self.time, self.precision, self.is_null, ctx.timezone)
    }

    fn unmarshal(&mut self, field: &[u8], ctx: &Context) -> Result<()> {
        if is_null(field) {
            *self = Ts::null();
            return Ok(());
        }
        let component = ctx.delimiters().component;
        let mut parts = field.split(|&b| b == component);
        let main = parts.next().unwrap_or_default();
        let suffix = parts.next();
        if parts.next().is_some() {
            return Err(Error::BadValue);
        }
        let (time, mut precision) = parse_instant(main, ctx.timezone)?;
        if let Some(suffix) = suffix {
            let explicit = explicit_precision(suffix)?;
            // Fractional digits cannot be squared with a coarser-than-
            // second precision claim.
            if precision > TsPrecision::Second && explicit < TsPrecision::Second {
                return Err(Error::BadValue);
            }
            precision = explicit;
        }
        *self = Ts::new(time, precision);
        Ok(())
    }
}

/// DTM - as TS, but the explicit precision component is not part of the
/// grammar and is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dtm {
    pub time: Option<DateTime<Utc>>,
    pub precision: TsPrecision,
    pub is_null: bool,
}

impl Dtm {
    pub fn new(time: DateTime<Utc>, precision: TsPrecision) -> Self {
        Dtm { time: Some(time), precision, is_null: false }
    }

    /// The explicit HL7 null value.
    pub fn null() -> Self {
        Dtm { time: None, precision: TsPrecision::default(), is_null: true }
    }
}

impl Primitive for Dtm {
    fn marshal(&self, ctx: &Context) -> Result<Vec<u8>> {
        marshal_timestamp(self.time, self.precision, self.is_null, ctx.timezone)
    }

    fn unmarshal(&mut self, field: &[u8], ctx: &Context) -> Result<()> {
        if is_null(field) {
            *self = Dtm::null();
            return Ok(());
        }
        let (time, precision) = parse_instant(field, ctx.timezone)?;
        *self = Dtm::new(time, precision);
        Ok(())
    }
}

fn is_null(field: &[u8]) -> bool {
    field == HL7_NULL
}

fn explicit_precision(suffix: &[u8]) -> Result<TsPrecision> {
    match suffix {
        b"Y" => Ok(TsPrecision::Year),
        b"L" => Ok(TsPrecision::Month),
        b"D" => Ok(TsPrecision::Day),
        b"H" => Ok(TsPrecision::Hour),
        b"M" => Ok(TsPrecision::Minute),
        b"S" => Ok(TsPrecision::Second),
        _ => Err(Error::BadValue),
    }
}

fn parse_instant(field: &[u8], timezone: Tz) -> Result<(DateTime<Utc>, TsPrecision)> {
    let (main, offset) = match field.iter().position(|&b| b == b'+' || b == b'-') {
        Some(at) => (&field[..at], Some(parse_offset(&field[at..])?)),
        None => (field, None),
    };
    let (digits, fraction) = match main.iter().position(|&b| b == b'.') {
        Some(at) => (&main[..at], Some(&main[at + 1..])),
        None => (main, None),
    };
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(Error::BadValue);
    }
    let mut precision = match digits.len() {
        4 => TsPrecision::Year,
        6 => TsPrecision::Month,
        8 => TsPrecision::Day,
        10 => TsPrecision::Hour,
        12 => TsPrecision::Minute,
        14 => TsPrecision::Second,
        _ => return Err(Error::BadValue),
    };
    let mut nanos = 0;
    if let Some(fraction) = fraction {
        // Fractional seconds require the seconds to be present.
        if digits.len() != 14
            || fraction.is_empty()
            || fraction.len() > 4
            || !fraction.iter().all(u8::is_ascii_digit)
        {
            return Err(Error::BadValue);
        }
        precision = match fraction.len() {
            1 => TsPrecision::Tenth,
            2 => TsPrecision::Hundredth,
            3 => TsPrecision::Thousandth,
            _ => TsPrecision::TenThousandth,
        };
        nanos = number(fraction) * 10u32.pow(9 - fraction.len() as u32);
    }

    let year = number(&digits[..4]) as i32;
    let month = if digits.len() >= 6 { number(&digits[4..6]) } else { 1 };
    let day = if digits.len() >= 8 { number(&digits[6..8]) } else { 1 };
    let hour = if digits.len() >= 10 { number(&digits[8..10]) } else { 0 };
    let minute = if digits.len() >= 12 { number(&digits[10..12]) } else { 0 };
    let second = if digits.len() >= 14 { number(&digits[12..14]) } else { 0 };

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_nano_opt(hour, minute, second, nanos))
        .ok_or(Error::BadValue)?;

    let instant = match offset {
        Some(offset) => offset
            .from_local_datetime(&naive)
            .single()
            .ok_or(Error::BadValue)?
            .with_timezone(&Utc),
        // Date-only values are calendar dates; they do not shift with the
        // wall clock of the parsing context.
        None if digits.len() <= 8 => Utc.from_utc_datetime(&naive),
        None => match timezone.from_local_datetime(&naive) {
            LocalResult::Single(t) => t.with_timezone(&Utc),
            // A repeated local time during a DST fold: take the earlier.
            LocalResult::Ambiguous(t, _) => t.with_timezone(&Utc),
            // A local time skipped by a DST gap does not exist.
            LocalResult::None => return Err(Error::BadValue),
        },
    };
    Ok((instant, precision))
}

// Only called on slices already validated as ASCII digits.
fn number(digits: &[u8]) -> u32 {
    digits.iter().fold(0, |acc, &b| acc * 10 + u32::from(b - b'0'))
}

fn parse_offset(field: &[u8]) -> Result<FixedOffset> {
    if field.len() != 5 || !field[1..].iter().all(u8::is_ascii_digit) {
        return Err(Error::BadValue);
    }
    let seconds = (number(&field[1..3]) * 3600 + number(&field[3..5]) * 60) as i32;
    let east = if field[0] == b'-' { -seconds } else { seconds };
    FixedOffset::east_opt(east).ok_or(Error::BadValue)
}

fn marshal_timestamp(
    time: Option<DateTime<Utc>>,
    precision: TsPrecision,
    is_null: bool,
    timezone: Tz,
) -> Result<Vec<u8>> {
    if is_null {
        return Ok(HL7_NULL.to_vec());
    }
    let Some(time) = time else {
        return Ok(Vec::new());
    };
    let local = time.with_timezone(&timezone);
    let rendered = match precision {
        TsPrecision::Year => local.format("%Y").to_string(),
        TsPrecision::Month => local.format("%Y%m").to_string(),
        TsPrecision::Day => local.format("%Y%m%d").to_string(),
        TsPrecision::Hour => local.format("%Y%m%d%H").to_string(),
        TsPrecision::Minute => local.format("%Y%m%d%H%M").to_string(),
        TsPrecision::Second => local.format("%Y%m%d%H%M%S").to_string(),
        TsPrecision::Tenth => {
            format!("{}.{}", local.format("%Y%m%d%H%M%S"), local.nanosecond() / 100_000_000)
        }
        TsPrecision::Hundredth => {
            format!("{}.{:02}", local.format("%Y%m%d%H%M%S"), local.nanosecond() / 10_000_000)
        }
        TsPrecision::Thousandth => {
            format!("{}.{:03}", local.format("%Y%m%d%H%M%S"), local.nanosecond() / 1_000_000)
        }
        TsPrecision::TenThousandth => {
            format!("{}.{:04}", local.format("%Y%m%d%H%M%S"), local.nanosecond() / 100_000)
        }
    };
    Ok(rendered.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    // Offset-less values in these vectors assume a UK wall clock.
    fn london_ctx() -> Context {
        let mut ctx = Context::new();
        ctx.timezone = chrono_tz::Europe::London;
        ctx
    }

    // Pinned to UTC so the tests are independent of the process default.
    fn utc_ctx() -> Context {
        let mut ctx = Context::new();
        ctx.timezone = chrono_tz::Tz::UTC;
        ctx
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn london(s: &str) -> DateTime<Utc> {
        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").unwrap();
        chrono_tz::Europe::London.from_local_datetime(&naive).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_parse_ts() {
        let cases = [
            ("20141128001635", "2014-11-28T00:16:35Z", TsPrecision::Second),
            // The explicit second component overrides the implicit
            // precision of the first.
            ("20141128001635^M", "2014-11-28T00:16:35Z", TsPrecision::Minute),
            ("20141128001635.1", "2014-11-28T00:16:35.1Z", TsPrecision::Tenth),
            ("20141128001635.12", "2014-11-28T00:16:35.12Z", TsPrecision::Hundredth),
            ("20141128001635.123", "2014-11-28T00:16:35.123Z", TsPrecision::Thousandth),
            ("20141128001635.1234", "2014-11-28T00:16:35.1234Z", TsPrecision::TenThousandth),
            // From the HL7 specification.
            ("19760704010159-0600", "1976-07-04T01:01:59-06:00", TsPrecision::Second),
            ("19760704010159-0500", "1976-07-04T01:01:59-05:00", TsPrecision::Second),
            ("198807050000", "1988-07-04T23:00:00Z", TsPrecision::Minute),
            ("19880705", "1988-07-05T00:00:00Z", TsPrecision::Day),
        ];
        let ctx = london_ctx();
        for (input, time, precision) in cases {
            let mut ts = Ts::default();
            ts.unmarshal(input.as_bytes(), &ctx).unwrap();
            assert_eq!(ts.time, Some(utc(time)), "input {:?}", input);
            assert_eq!(ts.precision, precision, "input {:?}", input);
            assert!(!ts.is_null);
        }
    }

    #[test]
    fn test_parse_ts_errors() {
        let cases = [
            "",
            // A two digit year.
            "20",
            // Fractions of a second without seconds.
            "201411280016.12",
            // More fractional digits than ten-thousandths.
            "20141128001635.12345",
            // An unknown precision letter.
            "20141128001635^T",
            // An offset with the wrong number of digits.
            "201411280016+010",
            // A fraction under a coarser-than-second precision claim.
            "20141128001635.12^M",
            "2014-11-28",
        ];
        let ctx = london_ctx();
        for input in cases {
            let mut ts = Ts::default();
            assert!(ts.unmarshal(input.as_bytes(), &ctx).is_err(), "input {:?}", input);
        }
    }

    #[test]
    fn test_parse_dtm() {
        let cases = [
            ("20141128001635", "2014-11-28T00:16:35Z", TsPrecision::Second),
            ("20141128001635.1234", "2014-11-28T00:16:35.1234Z", TsPrecision::TenThousandth),
            ("19760704010159-0600", "1976-07-04T01:01:59-06:00", TsPrecision::Second),
            ("198807050000", "1988-07-04T23:00:00Z", TsPrecision::Minute),
            ("19880705", "1988-07-05T00:00:00Z", TsPrecision::Day),
        ];
        let ctx = london_ctx();
        for (input, time, precision) in cases {
            let mut dtm = Dtm::default();
            dtm.unmarshal(input.as_bytes(), &ctx).unwrap();
            assert_eq!(dtm.time, Some(utc(time)), "input {:?}", input);
            assert_eq!(dtm.precision, precision, "input {:?}", input);
        }
    }

    #[test]
    fn test_parse_dtm_rejects_explicit_precision() {
        // Valid for TS but not part of the DTM grammar.
        let mut dtm = Dtm::default();
        assert!(dtm.unmarshal(b"20141128001635^M", &london_ctx()).is_err());
    }

    #[test]
    fn test_marshal_ts_emits_exactly_the_precision_digits() {
        let ctx = london_ctx();
        let plain = london("2020-02-24 12:55:30");
        let fractional = london("2020-02-24 12:55:35.123456789");
        let cases = [
            (plain, TsPrecision::Year, "2020"),
            (plain, TsPrecision::Month, "202002"),
            (plain, TsPrecision::Day, "20200224"),
            (plain, TsPrecision::Hour, "2020022412"),
            (plain, TsPrecision::Minute, "202002241255"),
            (plain, TsPrecision::Second, "20200224125530"),
            (fractional, TsPrecision::Second, "20200224125535"),
            (fractional, TsPrecision::Tenth, "20200224125535.1"),
            (fractional, TsPrecision::Hundredth, "20200224125535.12"),
            (fractional, TsPrecision::Thousandth, "20200224125535.123"),
            (fractional, TsPrecision::TenThousandth, "20200224125535.1234"),
        ];
        for (time, precision, want) in cases {
            let ts = Ts::new(time, precision);
            assert_eq!(ts.marshal(&ctx).unwrap(), want.as_bytes(), "precision {:?}", precision);
            let dtm = Dtm::new(time, precision);
            assert_eq!(dtm.marshal(&ctx).unwrap(), want.as_bytes(), "precision {:?}", precision);
        }
    }

    #[test]
    fn test_unmarshal_marshal_truncates_to_precision() {
        let ctx = utc_ctx();
        let full = utc("2020-02-24T12:55:30Z");
        let cases = [
            (TsPrecision::Year, "2020-01-01T00:00:00Z"),
            (TsPrecision::Month, "2020-02-01T00:00:00Z"),
            (TsPrecision::Day, "2020-02-24T00:00:00Z"),
            (TsPrecision::Hour, "2020-02-24T12:00:00Z"),
            (TsPrecision::Minute, "2020-02-24T12:55:00Z"),
            (TsPrecision::Second, "2020-02-24T12:55:30Z"),
        ];
        for (precision, want) in cases {
            let bytes = Ts::new(full, precision).marshal(&ctx).unwrap();
            let mut decoded = Ts::default();
            decoded.unmarshal(&bytes, &ctx).unwrap();
            assert_eq!(decoded, Ts::new(utc(want), precision), "precision {:?}", precision);
        }
    }

    #[test]
    fn test_fractional_digits_truncate_not_round() {
        let ctx = utc_ctx();
        let time = utc("2020-02-24T12:55:35.123456789Z");
        let bytes = Ts::new(time, TsPrecision::TenThousandth).marshal(&ctx).unwrap();
        assert_eq!(bytes, b"20200224125535.1234");
        let mut decoded = Ts::default();
        decoded.unmarshal(&bytes, &ctx).unwrap();
        assert_eq!(decoded.time, Some(utc("2020-02-24T12:55:35.1234Z")));
    }

    #[test]
    fn test_clear_field() {
        let ctx = utc_ctx();
        let mut ts = Ts::default();
        ts.unmarshal(b"\"\"", &ctx).unwrap();
        assert!(ts.is_null);
        assert_eq!(ts.time, None);
        assert_eq!(ts.marshal(&ctx).unwrap(), b"\"\"");

        let mut dtm = Dtm::default();
        dtm.unmarshal(b"\"\"", &ctx).unwrap();
        assert!(dtm.is_null);
        assert_eq!(dtm.time, None);
    }

    #[test]
    fn test_absent_timestamp_marshals_to_nothing() {
        let ctx = utc_ctx();
        assert_eq!(Ts::default().marshal(&ctx).unwrap(), b"");
        assert_eq!(Dtm::default().marshal(&ctx).unwrap(), b"");
    }
}
