//! Process-wide default timezone
//!
//! Offset-less TS/DTM values are interpreted in the timezone of their
//! context. The context in turn defaults to the pair stored here, which a
//! process sets once at startup via [`set_timezone_and_location`]. Reads
//! vastly outnumber the single write, hence the `RwLock`.

use std::sync::RwLock;

use chrono_tz::Tz;
use once_cell::sync::Lazy;

use crate::error::{Error, Result};

static DEFAULT: Lazy<RwLock<(String, Tz)>> =
    Lazy::new(|| RwLock::new(("UTC".to_string(), Tz::UTC)));

/// Set the process-wide default timezone from a tz database name, eg
/// `Europe/London`.
///
/// Returns an error naming the input if the timezone cannot be loaded.
pub fn set_timezone_and_location(tz: &str) -> Result<()> {
    let location: Tz = tz.parse().map_err(|_| Error::InvalidTimezone { name: tz.to_string() })?;
    let mut current = DEFAULT.write().expect("timezone lock poisoned");
    *current = (tz.to_string(), location);
    Ok(())
}

/// The current default timezone location. `UTC` until
/// [`set_timezone_and_location`] is called.
pub fn default_timezone() -> Tz {
    DEFAULT.read().expect("timezone lock poisoned").1
}

/// The name the current default timezone was loaded from.
pub fn default_timezone_name() -> String {
    DEFAULT.read().expect("timezone lock poisoned").0.clone()
}
