//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::filter::Filter;
use crate::mvt::feature::Feature;
use crate::mvt::filter_iter::FilterIterator;
use crate::mvt::value::Value;
use crate::pbf::{FieldReader, FormatError};
use std::collections::HashMap;

pub const DEFAULT_EXTENT: u32 = 4096;
pub const DEFAULT_VERSION: u32 = 1;

/// Decoded layer header with key/value dictionaries.
///
/// Features are not decoded up front. `data` keeps the layer message so that
/// features can be read eagerly with `features()` or lazily with `filter()`.
#[derive(Clone, Debug)]
pub struct Layer<'a> {
    pub name: String,
    pub keys: Vec<String>,
    pub values: Vec<Value>,
    pub extent: u32,
    pub version: u32,
    key_index: HashMap<String, usize>,
    data: FieldReader<'a>,
}

impl<'a> Layer<'a> {
    /// Decode a `Tile.Layer` message.
    pub fn decode(msg: FieldReader<'a>) -> Result<Layer<'a>, FormatError> {
        let mut layer = Layer {
            name: String::new(),
            keys: Vec::new(),
            values: Vec::new(),
            extent: DEFAULT_EXTENT,
            version: DEFAULT_VERSION,
            key_index: HashMap::new(),
            data: msg,
        };
        let mut reader = msg;
        while reader.next()? {
            match reader.tag() {
                1 => layer.name = reader.string()?.to_string(),
                3 => {
                    let key = reader.string()?.to_string();
                    // first occurrence of a duplicate key is used for lookups
                    let idx = layer.keys.len();
                    layer.key_index.entry(key.clone()).or_insert(idx);
                    layer.keys.push(key);
                }
                4 => layer.values.push(Value::decode(reader.message()?)?),
                5 => layer.extent = reader.varint()?,
                15 => layer.version = reader.varint()?,
                _ => reader.skip()?,
            }
        }
        debug!(
            "Layer '{}': {} keys, {} values, extent {}",
            layer.name,
            layer.keys.len(),
            layer.values.len(),
            layer.extent
        );
        Ok(layer)
    }

    /// Dictionary position of a key
    pub fn key_index(&self, key: &str) -> Option<usize> {
        self.key_index.get(key).copied()
    }

    /// Raw layer message
    pub fn data(&self) -> FieldReader<'a> {
        self.data
    }

    /// Eagerly decode all features in layer order
    pub fn features<'l>(&'l self) -> Features<'l, 'a> {
        Features {
            layer: self,
            data: self.data,
        }
    }

    /// Number of features, failing on the first malformed one
    pub fn feature_count(&self) -> Result<usize, FormatError> {
        self.features().try_fold(0, |count, feature| feature.map(|_| count + 1))
    }

    /// Decode all features, failing on the first malformed one
    pub fn decode_features(&self) -> Result<Vec<Feature<'a>>, FormatError> {
        self.features().collect()
    }

    /// Lazily iterate the features matching `filter`
    pub fn filter<'l, F: Filter + ?Sized>(&'l self, filter: &'l F) -> FilterIterator<'l, 'a, F> {
        FilterIterator::new(self, filter)
    }
}

/// Iterator over the eagerly decoded features of a layer.
///
/// Iteration stops after the first error.
pub struct Features<'l, 'a> {
    layer: &'l Layer<'a>,
    data: FieldReader<'a>,
}

impl<'l, 'a> Iterator for Features<'l, 'a> {
    type Item = Result<Feature<'a>, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self
            .data
            .next_tag(2)
            .and_then(|found| {
                if found {
                    let msg = self.data.message()?;
                    Feature::decode(msg, self.layer).map(Some)
                } else {
                    Ok(None)
                }
            })
            .transpose();
        if let Some(Err(_)) = result {
            self.data = FieldReader::default();
        }
        result
    }
}
