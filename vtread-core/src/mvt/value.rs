//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::pbf::{FieldReader, FormatError};
use std::cmp::Ordering;
use std::fmt;

/// Layer dictionary value
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    String(String),
    Float(f32),
    Double(f64),
    Int(i64),
    UInt(u64),
    Bool(bool),
}

impl Value {
    /// Decode a `Tile.Value` message.
    /// https://github.com/mapbox/vector-tile-spec/tree/master/2.1#41-layers
    pub fn decode(mut msg: FieldReader<'_>) -> Result<Value, FormatError> {
        let mut value = Value::String(String::new());
        while msg.next()? {
            value = match msg.tag() {
                1 => Value::String(msg.string()?.to_string()),
                2 => Value::Float(msg.float()?),
                3 => Value::Double(msg.double()?),
                4 => Value::Int(msg.int64()?),
                5 => Value::UInt(msg.varint64()?),
                6 => Value::Int(msg.svarint()?),
                7 => Value::Bool(msg.bool()?),
                _ => {
                    msg.skip()?;
                    continue;
                }
            };
        }
        Ok(value)
    }

    fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(v) => Some(f64::from(v)),
            Value::Double(v) => Some(v),
            Value::Int(v) => Some(v as f64),
            Value::UInt(v) => Some(v as f64),
            _ => None,
        }
    }

    /// Compare values the way filters do: numbers with numbers, strings with
    /// strings, booleans with booleans. Other combinations are not comparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::UInt(a), Value::UInt(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::UInt(b)) => Some(cmp_int_uint(*a, *b)),
            (Value::UInt(a), Value::Int(b)) => Some(cmp_int_uint(*b, *a).reverse()),
            (a, b) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        }
    }

    /// Numeric values compare by value, all others structurally
    pub fn loose_eq(&self, other: &Value) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

fn cmp_int_uint(a: i64, b: u64) -> Ordering {
    if a < 0 {
        Ordering::Less
    } else {
        (a as u64).cmp(&b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::String(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Value {
        Value::String(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::Double(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Value {
        Value::UInt(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Value {
        Value::Bool(v)
    }
}

#[test]
fn test_compare() {
    assert_eq!(Value::Int(-1).compare(&Value::UInt(0)), Some(Ordering::Less));
    assert_eq!(Value::UInt(3).compare(&Value::Int(2)), Some(Ordering::Greater));
    assert_eq!(Value::Float(1.5).compare(&Value::Double(1.5)), Some(Ordering::Equal));
    assert_eq!(Value::Int(2).compare(&Value::Double(2.5)), Some(Ordering::Less));
    assert_eq!(Value::from("a").compare(&Value::from("b")), Some(Ordering::Less));
    assert_eq!(Value::from("1").compare(&Value::Int(1)), None);
    assert_eq!(Value::Bool(true).compare(&Value::Int(1)), None);
    assert!(Value::UInt(1).loose_eq(&Value::Int(1)));
    assert!(Value::UInt(1) != Value::Int(1));
}
