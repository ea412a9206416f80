use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single flat record produced by a perform routine.
pub type Record = AHashMap<String, Scalar>;

/// Scalar values carried by records and by a bundle's input data.
///
/// JSON integers that fit an `i64` stay exact in `Integer` and serialize back
/// without a fraction; every other JSON number lands in `Number`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    Null,
}

// `Integer(1)` and `Number(1.0)` are distinct values. Floats compare so that
// `NaN` equals itself and `-0.0` equals `0.0`, matching `Hash` below.
impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Integer(a), Scalar::Integer(b)) => a == b,
            (Scalar::Number(a), Scalar::Number(b)) => float_key(*a) == float_key(*b),
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            (Scalar::Null, Scalar::Null) => true,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Scalar::Bool(b) => b.hash(state),
            Scalar::Integer(i) => i.hash(state),
            Scalar::Number(n) => float_key(*n).hash(state),
            Scalar::Text(s) => s.hash(state),
            Scalar::Null => {}
        }
    }
}

/// Bit pattern with `-0.0` folded into `0.0` and every `NaN` into one.
fn float_key(n: f64) -> u64 {
    if n == 0.0 {
        0.0f64.to_bits()
    } else if n.is_nan() {
        f64::NAN.to_bits()
    } else {
        n.to_bits()
    }
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Parses a command-line style literal: integers, numbers and booleans are
    /// recognised, everything else is kept as text.
    pub fn parse_literal(raw: &str) -> Self {
        if raw == "null" {
            Scalar::Null
        } else if let Ok(b) = raw.parse::<bool>() {
            Scalar::Bool(b)
        } else if let Ok(i) = raw.parse::<i64>() {
            Scalar::Integer(i)
        } else if let Ok(n) = raw.parse::<f64>() {
            Scalar::Number(n)
        } else {
            Scalar::Text(raw.to_string())
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Integer(i) => write!(f, "{}", i),
            // f64's Display never uses exponents and drops a zero fraction.
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Null => write!(f, "null"),
        }
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Integer(n)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Integer(n.into())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}
