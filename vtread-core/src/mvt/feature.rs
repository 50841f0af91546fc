//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::mvt::extractor::{AttributeSource, TYPE_KEY};
use crate::mvt::layer::Layer;
use crate::mvt::value::Value;
use crate::pbf::{FieldReader, FormatError};
use std::collections::BTreeMap;
use std::fmt;

/// MVT geometry type
/// https://github.com/mapbox/vector-tile-spec/tree/master/2.1#434-geometry-types
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FeatureType {
    Unknown,
    Point,
    LineString,
    Polygon,
    /// Wire value outside of the specified range, kept unchanged
    Invalid(u64),
}

impl FeatureType {
    pub fn from_raw(value: u64) -> FeatureType {
        match value {
            0 => FeatureType::Unknown,
            1 => FeatureType::Point,
            2 => FeatureType::LineString,
            3 => FeatureType::Polygon,
            v => FeatureType::Invalid(v),
        }
    }

    pub fn raw(&self) -> u64 {
        match *self {
            FeatureType::Unknown => 0,
            FeatureType::Point => 1,
            FeatureType::LineString => 2,
            FeatureType::Polygon => 3,
            FeatureType::Invalid(v) => v,
        }
    }
}

impl Default for FeatureType {
    fn default() -> Self {
        FeatureType::Unknown
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FeatureType::Unknown => write!(f, "Unknown"),
            FeatureType::Point => write!(f, "Point"),
            FeatureType::LineString => write!(f, "LineString"),
            FeatureType::Polygon => write!(f, "Polygon"),
            FeatureType::Invalid(_) => write!(f, "Invalid"),
        }
    }
}

/// Fully decoded feature
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Feature<'a> {
    pub id: u64,
    pub geom_type: FeatureType,
    pub properties: BTreeMap<String, Value>,
    /// Packed geometry commands, not decoded
    pub geometry: &'a [u8],
}

impl<'a> Feature<'a> {
    /// Decode a `Tile.Feature` message, resolving its tags against the layer dictionaries.
    pub fn decode(mut msg: FieldReader<'a>, layer: &Layer<'_>) -> Result<Feature<'a>, FormatError> {
        let mut feature = Feature::default();
        while msg.next()? {
            match msg.tag() {
                1 => feature.id = msg.varint64()?,
                2 => {
                    // tags are packed varints. They should have an even length.
                    let mut tags = msg.packed_varints()?;
                    while let Some(key_idx) = tags.next() {
                        let key_idx = key_idx?;
                        let key = layer
                            .keys
                            .get(key_idx as usize)
                            .ok_or(FormatError::OutOfRangeKey(key_idx))?;
                        let val_idx = tags.next().ok_or(FormatError::UnevenTags)??;
                        let value = layer
                            .values
                            .get(val_idx as usize)
                            .ok_or(FormatError::OutOfRangeValue(val_idx))?;
                        feature
                            .properties
                            .entry(key.clone())
                            .or_insert_with(|| value.clone());
                    }
                }
                3 => feature.geom_type = FeatureType::from_raw(msg.varint64()?),
                4 => feature.geometry = msg.bytes()?,
                _ => msg.skip()?,
            }
        }
        Ok(feature)
    }
}

impl AttributeSource for Feature<'_> {
    fn get_value(&self, key: &str) -> Option<Value> {
        if key == TYPE_KEY {
            return Some(Value::UInt(self.geom_type.raw()));
        }
        self.properties.get(key).cloned()
    }
}

impl fmt::Display for Feature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Feature({}): {}", self.id, self.geom_type)?;
        for (key, value) in &self.properties {
            writeln!(f, "  - {}: {}", key, value)?;
        }
        Ok(())
    }
}
