//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::mvt::feature::FeatureType;
use crate::mvt::layer::Layer;
use crate::mvt::value::Value;
use crate::pbf::PackedVarints;

/// Pseudo attribute returning the geometry type
pub const TYPE_KEY: &str = "$type";

/// Attribute lookup used by filter evaluation
pub trait AttributeSource {
    fn get_value(&self, key: &str) -> Option<Value>;
}

/// Attribute access on the packed tags of a single feature, without decoding it.
///
/// Malformed tags are reported as warnings and end the lookup.
pub struct TagExtractor<'l, 'a> {
    layer: &'l Layer<'a>,
    tags: &'a [u8],
    geom_type: FeatureType,
}

impl<'l, 'a> TagExtractor<'l, 'a> {
    pub fn new(layer: &'l Layer<'a>) -> TagExtractor<'l, 'a> {
        TagExtractor {
            layer,
            tags: &[],
            geom_type: FeatureType::Unknown,
        }
    }

    /// Packed tag payload of the feature (without field header)
    pub fn set_tags(&mut self, tags: &'a [u8]) {
        self.tags = tags;
    }

    pub fn set_type(&mut self, geom_type: FeatureType) {
        self.geom_type = geom_type;
    }

    pub fn geom_type(&self) -> FeatureType {
        self.geom_type
    }
}

impl AttributeSource for TagExtractor<'_, '_> {
    fn get_value(&self, key: &str) -> Option<Value> {
        if key == TYPE_KEY {
            return Some(Value::UInt(self.geom_type.raw()));
        }

        if self.layer.key_index(key).is_none() {
            return None;
        }

        // keys may repeat in the dictionary, so tag keys are compared by name
        let mut tags = PackedVarints::new(self.tags);
        while let Some(tag_key) = tags.next() {
            // Both elements of a pair are read, even if the key does not match
            let tag_val = match (tag_key, tags.next()) {
                (Ok(tag_key), Some(Ok(tag_val))) => {
                    if self.layer.keys.get(tag_key as usize).map(String::as_str) != Some(key) {
                        continue;
                    }
                    tag_val
                }
                (Ok(_), None) => {
                    warn!("uneven number of feature tag ids in layer '{}'", self.layer.name);
                    return None;
                }
                (Err(e), _) | (_, Some(Err(e))) => {
                    warn!("invalid feature tags in layer '{}': {}", self.layer.name, e);
                    return None;
                }
            };
            match self.layer.values.get(tag_val as usize) {
                Some(value) => return Some(value.clone()),
                None => {
                    warn!(
                        "feature references out of range value {} in layer '{}'",
                        tag_val, self.layer.name
                    );
                    return None;
                }
            }
        }
        None
    }
}
