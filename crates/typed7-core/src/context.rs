//! Parse and emit state
//!
//! A [`Context`] carries everything a primitive needs to interpret its
//! bytes: the active delimiter set, the nesting level, the character set
//! decoder and the timezone for offset-less timestamps. Contexts are never
//! shared between concurrent parses; within one parse, [`Context::nested`]
//! hands each level of recursion its own shallow copy.

use std::cell::Cell;

use chrono_tz::Tz;

use crate::charset::Charset;
use crate::delimiters::Delimiters;
use crate::error::Result;
use crate::timezone::default_timezone;

/// How deep in the HL7 structure the current value sits.
///
/// HL7 2.3 allows exactly two levels of splitting below a field
/// (components, then subcomponents). Modelling the level as an enum makes
/// the bound structural: [`Nesting::deeper`] saturates instead of counting
/// on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nesting {
    /// Field level: composites split on the component delimiter.
    #[default]
    Top,
    /// Component level: composites split on the subcomponent delimiter.
    Component,
    /// Subcomponent level: no further splitting happens.
    Subcomponent,
}

impl Nesting {
    /// The next nesting level down, saturating at `Subcomponent`.
    pub fn deeper(self) -> Nesting {
        match self {
            Nesting::Top => Nesting::Component,
            Nesting::Component | Nesting::Subcomponent => Nesting::Subcomponent,
        }
    }
}

/// Per-parse state derived from the message header.
#[derive(Debug, Clone)]
pub struct Context {
    // In a Cell because the MSH delimiter field replaces the active set
    // mid-parse; everything after it in the same context sees the update.
    delimiters: Cell<Delimiters>,
    /// Current nesting level.
    pub nesting: Nesting,
    /// Decoder for the character set declared in MSH-18.
    pub charset: Charset,
    /// Timezone in which offset-less TS/DTM values are interpreted.
    pub timezone: Tz,
}

impl Context {
    /// A context with default delimiters, pass-through charset and the
    /// process-wide default timezone.
    pub fn new() -> Self {
        Context {
            delimiters: Cell::new(Delimiters::default()),
            nesting: Nesting::Top,
            charset: Charset::passthrough(),
            timezone: default_timezone(),
        }
    }

    /// The active delimiter set.
    pub fn delimiters(&self) -> Delimiters {
        self.delimiters.get()
    }

    /// Replace the active delimiter set.
    ///
    /// This happens exactly once per message, when the MSH delimiter field
    /// is unmarshalled, and is ordered before any non-header segment parse.
    pub fn set_delimiters(&self, delimiters: Delimiters) {
        self.delimiters.set(delimiters);
    }

    /// A copy of this context one nesting level deeper.
    pub fn nested(&self) -> Context {
        let mut nested = self.clone();
        nested.nesting = self.nesting.deeper();
        nested
    }

    /// Decode field bytes through the message's character set.
    pub fn decode_text(&self, bytes: &[u8]) -> Result<String> {
        self.charset.decode(bytes)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
