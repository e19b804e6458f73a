//! Segment layout tables
//!
//! Instead of runtime type inspection, segments are described by static
//! layout tables: an ordered list of slots, each a primitive, a composite
//! (itself a table) or a repetition of either. A single recursive routine
//! in [`crate::parse`] interprets the tables in both directions.
//!
//! The catalog of concrete HL7 2.3 layouts lives in [`crate::catalog`];
//! environments with local extensions provide their own
//! [`SegmentRegistry`].

/// The closed set of leaf types a schema slot can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    St,
    Id,
    Is,
    Si,
    Nm,
    Snm,
    Dt,
    Tm,
    Tn,
    Ts,
    Dtm,
    Ft,
    Tx,
    Cm,
    Nul,
    Any,
    Hd,
    /// The MSH-1 delimiter field; unmarshalling it swaps the active
    /// delimiter set.
    Delimiters,
}

/// What a schema slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Primitive(PrimitiveKind),
    Composite(&'static CompositeSchema),
}

/// One slot of a segment or composite layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    /// Human-readable field name used in error breadcrumbs, eg
    /// `Patient ID`. May be empty.
    pub tag: &'static str,
    pub kind: FieldKind,
    /// True if the field may repeat on the repetition delimiter.
    pub repeated: bool,
}

/// The layout of a composite type, eg CX or XPN.
#[derive(Debug, PartialEq, Eq)]
pub struct CompositeSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSchema],
}

/// The layout of a segment type, eg PID. Slot `i` describes wire field
/// `i + 1` (field 0 is the segment name itself).
#[derive(Debug, PartialEq, Eq)]
pub struct SegmentSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSchema],
}

/// Resolves segment type names to layouts.
///
/// The built-in [`crate::catalog::DefaultRegistry`] covers the common
/// HL7 2.3 segments; environments can substitute their own catalog.
pub trait SegmentRegistry {
    fn lookup(&self, name: &str) -> Option<&'static SegmentSchema>;
}

/// A non-repeated slot.
pub const fn field(tag: &'static str, kind: FieldKind) -> FieldSchema {
    FieldSchema { tag, kind, repeated: false }
}

/// A slot that may repeat on the repetition delimiter.
pub const fn repeated(tag: &'static str, kind: FieldKind) -> FieldSchema {
    FieldSchema { tag, kind, repeated: true }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_builders() {
        let f = field("Set ID", FieldKind::Primitive(PrimitiveKind::Si));
        assert!(!f.repeated);
        assert_eq!(f.tag, "Set ID");

        let r = repeated("Patient Name", FieldKind::Primitive(PrimitiveKind::St));
        assert!(r.repeated);
    }
}
