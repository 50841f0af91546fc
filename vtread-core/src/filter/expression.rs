//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Legacy Mapbox GL style filters
//! https://docs.mapbox.com/mapbox-gl-js/style-spec/other/#other-filter

use crate::filter::Filter;
use crate::mvt::extractor::{AttributeSource, TYPE_KEY};
use crate::mvt::feature::FeatureType;
use crate::mvt::value::Value;
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Clone, PartialEq, Debug)]
pub enum FilterExpression {
    All(Vec<FilterExpression>),
    Any(Vec<FilterExpression>),
    NoneOf(Vec<FilterExpression>),
    Has(String),
    NotHas(String),
    In(String, Vec<Value>),
    NotIn(String, Vec<Value>),
    Compare(String, CompareOp, Value),
}

impl FilterExpression {
    /// Parse filter from its JSON representation, e.g. `["==", "class", "road"]`
    pub fn from_json(json: &JsonValue) -> Result<FilterExpression, String> {
        let arr = json
            .as_array()
            .ok_or_else(|| format!("Filter must be an array: {}", json))?;
        let op = arr
            .first()
            .and_then(|op| op.as_str())
            .ok_or_else(|| format!("Missing filter operator: {}", json))?;
        let args = &arr[1..];
        let expr = match op {
            "all" => FilterExpression::All(Self::sub_filters(args)?),
            "any" => FilterExpression::Any(Self::sub_filters(args)?),
            "none" => FilterExpression::NoneOf(Self::sub_filters(args)?),
            "has" | "!has" => {
                if args.len() != 1 {
                    return Err(format!("`{}` expects a single key", op));
                }
                let key = Self::key_arg(op, args)?;
                if op == "has" {
                    FilterExpression::Has(key)
                } else {
                    FilterExpression::NotHas(key)
                }
            }
            "in" | "!in" => {
                let key = Self::key_arg(op, args)?;
                let values = args[1..]
                    .iter()
                    .map(|v| json_to_value(&key, v))
                    .collect::<Result<Vec<_>, _>>()?;
                if op == "in" {
                    FilterExpression::In(key, values)
                } else {
                    FilterExpression::NotIn(key, values)
                }
            }
            _ => {
                let cmp = match op {
                    "==" => CompareOp::Eq,
                    "!=" => CompareOp::Ne,
                    "<" => CompareOp::Lt,
                    "<=" => CompareOp::Le,
                    ">" => CompareOp::Gt,
                    ">=" => CompareOp::Ge,
                    _ => return Err(format!("Unknown filter operator `{}`", op)),
                };
                let key = Self::key_arg(op, args)?;
                if args.len() != 2 {
                    return Err(format!("`{}` expects a key and a value", op));
                }
                let value = json_to_value(&key, &args[1])?;
                FilterExpression::Compare(key, cmp, value)
            }
        };
        Ok(expr)
    }

    fn sub_filters(args: &[JsonValue]) -> Result<Vec<FilterExpression>, String> {
        args.iter().map(FilterExpression::from_json).collect()
    }

    fn key_arg(op: &str, args: &[JsonValue]) -> Result<String, String> {
        args.first()
            .ok_or_else(|| format!("`{}` expects a key argument", op))?
            .as_str()
            .map(|key| key.to_string())
            .ok_or_else(|| format!("`{}` key must be a string", op))
    }

    fn matches(&self, attrs: &dyn AttributeSource) -> bool {
        match self {
            FilterExpression::All(filters) => filters.iter().all(|f| f.matches(attrs)),
            FilterExpression::Any(filters) => filters.iter().any(|f| f.matches(attrs)),
            FilterExpression::NoneOf(filters) => !filters.iter().any(|f| f.matches(attrs)),
            FilterExpression::Has(key) => attrs.get_value(key).is_some(),
            FilterExpression::NotHas(key) => attrs.get_value(key).is_none(),
            FilterExpression::In(key, values) => match attrs.get_value(key) {
                Some(ref value) => values.iter().any(|v| value.loose_eq(v)),
                None => false,
            },
            FilterExpression::NotIn(key, values) => match attrs.get_value(key) {
                Some(ref value) => !values.iter().any(|v| value.loose_eq(v)),
                None => true,
            },
            FilterExpression::Compare(key, op, expected) => {
                let ordering = attrs
                    .get_value(key)
                    .and_then(|value| value.compare(expected));
                match op {
                    CompareOp::Eq => ordering == Some(Ordering::Equal),
                    CompareOp::Ne => ordering != Some(Ordering::Equal),
                    CompareOp::Lt => ordering == Some(Ordering::Less),
                    CompareOp::Le => ordering.map_or(false, |o| o != Ordering::Greater),
                    CompareOp::Gt => ordering == Some(Ordering::Greater),
                    CompareOp::Ge => ordering.map_or(false, |o| o != Ordering::Less),
                }
            }
        }
    }
}

impl Filter for FilterExpression {
    fn evaluate(&self, attrs: &dyn AttributeSource) -> bool {
        self.matches(attrs)
    }
}

impl FromStr for FilterExpression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let json: JsonValue =
            serde_json::from_str(s).map_err(|e| format!("Invalid filter JSON: {}", e))?;
        FilterExpression::from_json(&json)
    }
}

/// Convert a JSON literal. Geometry type names are accepted for `$type`.
fn json_to_value(key: &str, json: &JsonValue) -> Result<Value, String> {
    match json {
        JsonValue::String(s) if key == TYPE_KEY => {
            let geom_type = match s.as_str() {
                "Unknown" => FeatureType::Unknown,
                "Point" => FeatureType::Point,
                "LineString" => FeatureType::LineString,
                "Polygon" => FeatureType::Polygon,
                _ => return Err(format!("Unknown geometry type `{}`", s)),
            };
            Ok(Value::UInt(geom_type.raw()))
        }
        JsonValue::String(s) => Ok(Value::String(s.clone())),
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::Number(n) => {
            if let Some(v) = n.as_u64() {
                Ok(Value::UInt(v))
            } else if let Some(v) = n.as_i64() {
                Ok(Value::Int(v))
            } else {
                n.as_f64()
                    .map(Value::Double)
                    .ok_or_else(|| format!("Invalid number {}", n))
            }
        }
        _ => Err(format!("Unsupported filter value {}", json)),
    }
}
