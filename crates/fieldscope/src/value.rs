//! Runtime values read out of introspected fields

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::model::Introspect;

/// Declared kind of a field's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    String,
    Object,
    Sequence,
}

impl ValueKind {
    /// Only numeric and boolean fields can carry a range constraint
    pub fn is_constraint_eligible(self) -> bool {
        matches!(self, Self::Bool | Self::Int | Self::Float)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Object => "object",
            Self::Sequence => "sequence",
        };
        f.pad(name)
    }
}

/// An object reachable from a field: borrowed from its owner, or shared
/// through an `Rc` (the only way to build self-referencing graphs).
#[derive(Clone)]
pub enum ObjectRef<'a> {
    Borrowed(&'a dyn Introspect),
    Shared(Rc<dyn Introspect>),
}

impl<'a> Deref for ObjectRef<'a> {
    type Target = dyn Introspect + 'a;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Borrowed(object) => *object,
            Self::Shared(object) => &**object,
        }
    }
}

impl fmt::Debug for ObjectRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self {
            Self::Borrowed(_) => "Borrowed",
            Self::Shared(_) => "Shared",
        };
        write!(f, "{}(<{}>)", mode, self.declaration().name)
    }
}

/// Current value of one field
#[derive(Debug, Clone)]
pub enum FieldValue<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Cow<'a, str>),
    Object(ObjectRef<'a>),
    Sequence(Vec<FieldValue<'a>>),
}

impl<'a> FieldValue<'a> {
    /// Kind of the value held, `None` for null
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(ValueKind::Bool),
            Self::Int(_) => Some(ValueKind::Int),
            Self::Float(_) => Some(ValueKind::Float),
            Self::Str(_) => Some(ValueKind::String),
            Self::Object(_) => Some(ValueKind::Object),
            Self::Sequence(_) => Some(ValueKind::Sequence),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view used by range checks
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Self::Bool(b) => Some(Scalar::Bool(*b)),
            Self::Int(i) => Some(Scalar::Int(*i)),
            Self::Float(x) => Some(Scalar::Float(*x)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef<'a>> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }
}

/// A constraint-eligible value, detached from the object it was read from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl Scalar {
    /// Booleans compare as 0 and 1
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Bool(b) => f64::from(u8::from(b)),
            Self::Int(i) => i as f64,
            Self::Float(x) => x,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => f.write_str(&format_float(*x)),
        }
    }
}

/// Shortest round-trip text of a float; always shows a decimal point or
/// an exponent so it never reads back as an integer.
pub(crate) fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

/// Conversion from a Rust field type into a [`FieldValue`].
///
/// `KIND` is what the declaration macro records as the field's kind.
pub trait AsFieldValue {
    const KIND: ValueKind;

    fn as_field_value(&self) -> FieldValue<'_>;
}

macro_rules! int_field_value {
    ($($t:ty),*) => {
        $(
            impl AsFieldValue for $t {
                const KIND: ValueKind = ValueKind::Int;

                fn as_field_value(&self) -> FieldValue<'_> {
                    FieldValue::Int(i64::from(*self))
                }
            }
        )*
    };
}

int_field_value!(i8, i16, i32, i64, u8, u16, u32);

// Wide integers that do not fit in i64 degrade to floats.
macro_rules! wide_int_field_value {
    ($($t:ty),*) => {
        $(
            impl AsFieldValue for $t {
                const KIND: ValueKind = ValueKind::Int;

                #[allow(clippy::cast_precision_loss)]
                fn as_field_value(&self) -> FieldValue<'_> {
                    match i64::try_from(*self) {
                        Ok(v) => FieldValue::Int(v),
                        Err(_) => FieldValue::Float(*self as f64),
                    }
                }
            }
        )*
    };
}

wide_int_field_value!(isize, usize, u64, i128, u128);

impl AsFieldValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Bool(*self)
    }
}

impl AsFieldValue for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Float(f64::from(*self))
    }
}

impl AsFieldValue for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Float(*self)
    }
}

impl AsFieldValue for char {
    const KIND: ValueKind = ValueKind::String;

    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(Cow::Owned(self.to_string()))
    }
}

impl AsFieldValue for str {
    const KIND: ValueKind = ValueKind::String;

    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(Cow::Borrowed(self))
    }
}

impl AsFieldValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(Cow::Borrowed(self.as_str()))
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for &T {
    const KIND: ValueKind = T::KIND;

    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for Box<T> {
    const KIND: ValueKind = T::KIND;

    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }
}

impl<T: AsFieldValue> AsFieldValue for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn as_field_value(&self) -> FieldValue<'_> {
        match self {
            Some(value) => value.as_field_value(),
            None => FieldValue::Null,
        }
    }
}

impl<T: AsFieldValue> AsFieldValue for [T] {
    const KIND: ValueKind = ValueKind::Sequence;

    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Sequence(self.iter().map(AsFieldValue::as_field_value).collect())
    }
}

impl<T: AsFieldValue, const N: usize> AsFieldValue for [T; N] {
    const KIND: ValueKind = ValueKind::Sequence;

    fn as_field_value(&self) -> FieldValue<'_> {
        self.as_slice().as_field_value()
    }
}

impl<T: AsFieldValue> AsFieldValue for Vec<T> {
    const KIND: ValueKind = ValueKind::Sequence;

    fn as_field_value(&self) -> FieldValue<'_> {
        self.as_slice().as_field_value()
    }
}

impl<T: Introspect + 'static> AsFieldValue for Rc<T> {
    const KIND: ValueKind = ValueKind::Object;

    fn as_field_value(&self) -> FieldValue<'_> {
        let shared: Rc<dyn Introspect> = Rc::clone(self) as Rc<dyn Introspect>;
        FieldValue::Object(ObjectRef::Shared(shared))
    }
}
