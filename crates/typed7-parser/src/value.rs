//! Parsed values
//!
//! The result of parsing a segment is a [`SegmentValue`]: a named record
//! whose slots hold [`Value`]s. `Value` is a closed union over the
//! primitive types plus composites and repetitions; `Option` at the slot
//! level distinguishes a field that was absent from one that parsed to a
//! default.

use typed7_core::{
    Any, Cm, Context, Delimiters, Dt, Dtm, Ft, Hd, Id, Is, Nm, Nul, Primitive, Result, Si, Snm,
    St, Tm, Tn, Ts, Tx,
};

use crate::schema::{FieldKind, PrimitiveKind};

/// A single parsed HL7 value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    St(St),
    Id(Id),
    Is(Is),
    Si(Si),
    Nm(Nm),
    Snm(Snm),
    Dt(Dt),
    Tm(Tm),
    Tn(Tn),
    Ts(Ts),
    Dtm(Dtm),
    Ft(Ft),
    Tx(Tx),
    Cm(Cm),
    Nul(Nul),
    Any(Any),
    Hd(Hd),
    Delimiters(Delimiters),
    Composite(CompositeValue),
    Repeated(Vec<Value>),
}

/// A parsed composite, eg one CX or XPN occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeValue {
    /// The composite type name from the schema, eg `CX`.
    pub name: &'static str,
    /// One slot per schema field; `None` marks an absent component.
    pub fields: Vec<Option<Value>>,
}

impl CompositeValue {
    /// Component by HL7 number (1-based); 0 and out-of-range yield `None`.
    pub fn field(&self, number: usize) -> Option<&Value> {
        if number == 0 { None } else { self.fields.get(number - 1)?.as_ref() }
    }
}

/// A parsed segment: a named record of typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentValue {
    /// The segment type name, eg `PID`.
    pub name: &'static str,
    /// One slot per schema field; `None` marks an absent field.
    pub fields: Vec<Option<Value>>,
}

impl SegmentValue {
    /// Field by HL7 number (1-based); 0 and out-of-range yield `None`.
    pub fn field(&self, number: usize) -> Option<&Value> {
        if number == 0 { None } else { self.fields.get(number - 1)?.as_ref() }
    }
}

macro_rules! accessors {
    ($($method:ident -> $variant:ident($type:ty);)*) => {
        $(
            pub fn $method(&self) -> Option<&$type> {
                match self {
                    Value::$variant(value) => Some(value),
                    _ => None,
                }
            }
        )*
    };
}

impl Value {
    accessors! {
        as_st -> St(St);
        as_id -> Id(Id);
        as_is -> Is(Is);
        as_si -> Si(Si);
        as_nm -> Nm(Nm);
        as_snm -> Snm(Snm);
        as_dt -> Dt(Dt);
        as_tm -> Tm(Tm);
        as_tn -> Tn(Tn);
        as_ts -> Ts(Ts);
        as_dtm -> Dtm(Dtm);
        as_ft -> Ft(Ft);
        as_tx -> Tx(Tx);
        as_cm -> Cm(Cm);
        as_nul -> Nul(Nul);
        as_any -> Any(Any);
        as_hd -> Hd(Hd);
        as_delimiters -> Delimiters(Delimiters);
        as_composite -> Composite(CompositeValue);
    }

    pub fn as_repeated(&self) -> Option<&[Value]> {
        match self {
            Value::Repeated(values) => Some(values),
            _ => None,
        }
    }

    /// The value as a dynamically typed primitive, if it is one.
    pub(crate) fn as_primitive(&self) -> Option<&dyn Primitive> {
        match self {
            Value::St(v) => Some(v),
            Value::Id(v) => Some(v),
            Value::Is(v) => Some(v),
            Value::Si(v) => Some(v),
            Value::Nm(v) => Some(v),
            Value::Snm(v) => Some(v),
            Value::Dt(v) => Some(v),
            Value::Tm(v) => Some(v),
            Value::Tn(v) => Some(v),
            Value::Ts(v) => Some(v),
            Value::Dtm(v) => Some(v),
            Value::Ft(v) => Some(v),
            Value::Tx(v) => Some(v),
            Value::Cm(v) => Some(v),
            Value::Nul(v) => Some(v),
            Value::Any(v) => Some(v),
            Value::Hd(v) => Some(v),
            Value::Delimiters(v) => Some(v),
            Value::Composite(_) | Value::Repeated(_) => None,
        }
    }

    /// Unmarshal `field` as the given primitive kind.
    pub(crate) fn unmarshal_primitive(
        kind: PrimitiveKind,
        field: &[u8],
        ctx: &Context,
    ) -> Result<Value> {
        macro_rules! unmarshal {
            ($variant:ident, $type:ty) => {{
                let mut value = <$type>::default();
                value.unmarshal(field, ctx)?;
                Ok(Value::$variant(value))
            }};
        }
        match kind {
            PrimitiveKind::St => unmarshal!(St, St),
            PrimitiveKind::Id => unmarshal!(Id, Id),
            PrimitiveKind::Is => unmarshal!(Is, Is),
            PrimitiveKind::Si => unmarshal!(Si, Si),
            PrimitiveKind::Nm => unmarshal!(Nm, Nm),
            PrimitiveKind::Snm => unmarshal!(Snm, Snm),
            PrimitiveKind::Dt => unmarshal!(Dt, Dt),
            PrimitiveKind::Tm => unmarshal!(Tm, Tm),
            PrimitiveKind::Tn => unmarshal!(Tn, Tn),
            PrimitiveKind::Ts => unmarshal!(Ts, Ts),
            PrimitiveKind::Dtm => unmarshal!(Dtm, Dtm),
            PrimitiveKind::Ft => unmarshal!(Ft, Ft),
            PrimitiveKind::Tx => unmarshal!(Tx, Tx),
            PrimitiveKind::Cm => unmarshal!(Cm, Cm),
            PrimitiveKind::Nul => unmarshal!(Nul, Nul),
            PrimitiveKind::Any => unmarshal!(Any, Any),
            PrimitiveKind::Hd => unmarshal!(Hd, Hd),
            PrimitiveKind::Delimiters => unmarshal!(Delimiters, Delimiters),
        }
    }

    /// The default (absent) value for a schema slot, used to keep
    /// repetition counts intact when an element is empty.
    pub(crate) fn default_for(kind: &FieldKind) -> Value {
        match kind {
            FieldKind::Primitive(kind) => match kind {
                PrimitiveKind::St => Value::St(St::default()),
                PrimitiveKind::Id => Value::Id(Id::default()),
                PrimitiveKind::Is => Value::Is(Is::default()),
                PrimitiveKind::Si => Value::Si(Si::default()),
                PrimitiveKind::Nm => Value::Nm(Nm::default()),
                PrimitiveKind::Snm => Value::Snm(Snm::default()),
                PrimitiveKind::Dt => Value::Dt(Dt::default()),
                PrimitiveKind::Tm => Value::Tm(Tm::default()),
                PrimitiveKind::Tn => Value::Tn(Tn::default()),
                PrimitiveKind::Ts => Value::Ts(Ts::default()),
                PrimitiveKind::Dtm => Value::Dtm(Dtm::default()),
                PrimitiveKind::Ft => Value::Ft(Ft::default()),
                PrimitiveKind::Tx => Value::Tx(Tx::default()),
                PrimitiveKind::Cm => Value::Cm(Cm::default()),
                PrimitiveKind::Nul => Value::Nul(Nul::default()),
                PrimitiveKind::Any => Value::Any(Any::default()),
                PrimitiveKind::Hd => Value::Hd(Hd::default()),
                PrimitiveKind::Delimiters => Value::Delimiters(Delimiters::default()),
            },
            FieldKind::Composite(schema) => Value::Composite(CompositeValue {
                name: schema.name,
                fields: vec![None; schema.fields.len()],
            }),
        }
    }
}
