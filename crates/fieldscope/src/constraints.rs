//! Numeric range constraints attached to fields

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Scalar;

/// Inclusive range a field's value must fall in. A missing bound leaves
/// that side open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Constraint {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl Constraint {
    #[must_use]
    pub fn new(minimum: Option<f64>, maximum: Option<f64>) -> Self {
        Self { minimum, maximum }
    }

    /// Whether neither side is bounded
    pub fn is_unbounded(&self) -> bool {
        self.minimum.is_none() && self.maximum.is_none()
    }

    /// Check a value against both bounds. NaN never satisfies a bound.
    pub fn admits(&self, value: Scalar) -> bool {
        let above_min = self
            .minimum
            .map_or(true, |min| matches!(compare(value, min), Some(Ordering::Greater | Ordering::Equal)));
        let below_max = self
            .maximum
            .map_or(true, |max| matches!(compare(value, max), Some(Ordering::Less | Ordering::Equal)));
        above_min && below_max
    }
}

// Integers are compared exactly against integral bounds so that large
// values are not rounded through f64.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn compare(value: Scalar, bound: f64) -> Option<Ordering> {
    match value {
        Scalar::Int(i)
            if bound.fract() == 0.0 && bound >= i64::MIN as f64 && bound < i64::MAX as f64 =>
        {
            Some(i.cmp(&(bound as i64)))
        }
        other => other.as_f64().partial_cmp(&bound),
    }
}

// Integral bounds print without a trailing ".0"
impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.minimum {
            Some(min) => write!(f, "[{}", min)?,
            None => f.write_str("(-inf")?,
        }
        f.write_str(", ")?;
        match self.maximum {
            Some(max) => write!(f, "{}]", max),
            None => f.write_str("+inf)"),
        }
    }
}

/// One `(field, minimum?, maximum?)` triple supplied at registration time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSpec {
    pub field: String,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
}

impl ConstraintSpec {
    pub fn new(field: impl Into<String>, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        Self {
            field: field.into(),
            minimum,
            maximum,
        }
    }

    /// The constraint to attach, `None` when both bounds are absent
    pub fn constraint(&self) -> Option<Constraint> {
        let constraint = Constraint::new(self.minimum, self.maximum);
        (!constraint.is_unbounded()).then_some(constraint)
    }
}

/// Common constraint builders
pub fn min(value: f64) -> Constraint {
    Constraint::new(Some(value), None)
}

pub fn max(value: f64) -> Constraint {
    Constraint::new(None, Some(value))
}

pub fn range(minimum: f64, maximum: f64) -> Constraint {
    Constraint::new(Some(minimum), Some(maximum))
}
