//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Reference encoder for building test tiles

use crate::mvt::value::Value;
use flate2::{write::GzEncoder, Compression};
use protobuf::{CodedOutputStream, ProtobufResult};
use std::io::Write;

fn encode<F>(write: F) -> Vec<u8>
where
    F: FnOnce(&mut CodedOutputStream) -> ProtobufResult<()>,
{
    let mut buf = Vec::new();
    {
        let mut os = CodedOutputStream::vec(&mut buf);
        write(&mut os).unwrap();
        os.flush().unwrap();
    }
    buf
}

fn encode_packed(values: &[u32]) -> Vec<u8> {
    encode(|os| {
        for v in values {
            os.write_raw_varint32(*v)?;
        }
        Ok(())
    })
}

pub fn encode_value(value: &Value) -> Vec<u8> {
    encode(|os| match value {
        Value::String(v) => os.write_string(1, v),
        Value::Float(v) => os.write_float(2, *v),
        Value::Double(v) => os.write_double(3, *v),
        Value::Int(v) => os.write_int64(4, *v),
        Value::UInt(v) => os.write_uint64(5, *v),
        Value::Bool(v) => os.write_bool(7, *v),
    })
}

pub fn encode_sint_value(value: i64) -> Vec<u8> {
    encode(|os| os.write_sint64(6, value))
}

#[derive(Default)]
pub struct FeatureBuilder {
    pub id: Option<u64>,
    pub tags: Vec<u32>,
    pub geom_type: Option<u64>,
    pub geometry: Vec<u32>,
    /// Extra field written after the known ones
    pub unknown_field: Option<(u32, u64)>,
}

impl FeatureBuilder {
    pub fn new(id: u64, geom_type: u64) -> FeatureBuilder {
        FeatureBuilder {
            id: Some(id),
            geom_type: Some(geom_type),
            geometry: vec![9, 490, 6262],
            ..Default::default()
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        encode(|os| {
            if let Some(id) = self.id {
                os.write_uint64(1, id)?;
            }
            if !self.tags.is_empty() {
                os.write_bytes(2, &encode_packed(&self.tags))?;
            }
            if let Some(geom_type) = self.geom_type {
                os.write_uint64(3, geom_type)?;
            }
            if !self.geometry.is_empty() {
                os.write_bytes(4, &encode_packed(&self.geometry))?;
            }
            if let Some((field, value)) = self.unknown_field {
                os.write_uint64(field, value)?;
            }
            Ok(())
        })
    }
}

pub struct LayerBuilder {
    pub name: String,
    pub keys: Vec<String>,
    values: Vec<Value>,
    encoded_values: Vec<Vec<u8>>,
    pub extent: Option<u32>,
    pub version: Option<u32>,
    fields: Vec<Vec<u8>>,
}

impl LayerBuilder {
    pub fn new(name: &str) -> LayerBuilder {
        LayerBuilder {
            name: name.to_string(),
            keys: Vec::new(),
            values: Vec::new(),
            encoded_values: Vec::new(),
            extent: Some(4096),
            version: Some(2),
            fields: Vec::new(),
        }
    }

    /// Add an attribute, reusing existing dictionary entries
    pub fn add_feature_attribute(&mut self, feature: &mut FeatureBuilder, key: &str, value: Value) {
        let keyidx = match self.keys.iter().position(|k| k == key) {
            None => {
                self.keys.push(key.to_string());
                self.keys.len() - 1
            }
            Some(idx) => idx,
        };
        feature.tags.push(keyidx as u32);

        let validx = match self.values.iter().position(|v| *v == value) {
            None => self.push_value(value),
            Some(idx) => idx,
        };
        feature.tags.push(validx as u32);
    }

    pub fn push_value(&mut self, value: Value) -> usize {
        self.encoded_values.push(encode_value(&value));
        self.values.push(value);
        self.values.len() - 1
    }

    /// Append an encoded value message which is not used for deduplication
    pub fn push_raw_value(&mut self, msg: Vec<u8>) -> usize {
        self.encoded_values.push(msg);
        self.values.push(Value::String("\u{0}raw".to_string()));
        self.values.len() - 1
    }

    pub fn add_feature(&mut self, feature: &FeatureBuilder) {
        let msg = feature.encode();
        self.fields.push(encode(|os| os.write_bytes(2, &msg)));
    }

    /// Append encoded bytes between the features
    pub fn add_raw_field(&mut self, field: Vec<u8>) {
        self.fields.push(field);
    }

    pub fn encode(&self) -> Vec<u8> {
        encode(|os| {
            os.write_string(1, &self.name)?;
            for field in &self.fields {
                os.write_raw_bytes(field)?;
            }
            for key in &self.keys {
                os.write_string(3, key)?;
            }
            for value in &self.encoded_values {
                os.write_bytes(4, value)?;
            }
            if let Some(extent) = self.extent {
                os.write_uint32(5, extent)?;
            }
            if let Some(version) = self.version {
                os.write_uint32(15, version)?;
            }
            Ok(())
        })
    }
}

#[derive(Default)]
pub struct TileBuilder {
    layers: Vec<Vec<u8>>,
}

impl TileBuilder {
    pub fn new() -> TileBuilder {
        TileBuilder::default()
    }

    pub fn add_layer(&mut self, layer: &LayerBuilder) {
        self.layers.push(layer.encode());
    }

    pub fn encode(&self) -> Vec<u8> {
        encode(|os| {
            for layer in &self.layers {
                os.write_bytes(3, layer)?;
            }
            Ok(())
        })
    }

    pub fn encode_gz(&self) -> Vec<u8> {
        let mut gz = GzEncoder::new(Vec::new(), Compression::default());
        gz.write_all(&self.encode()).unwrap();
        gz.finish().unwrap()
    }
}

/// Example tile from https://github.com/mapbox/vector-tile-spec/tree/master/2.1#45-example
pub fn example_tile() -> Vec<u8> {
    let mut layer = LayerBuilder::new("points");

    let mut feature = FeatureBuilder::new(1, 1);
    layer.add_feature_attribute(&mut feature, "hello", Value::from("world"));
    layer.add_feature_attribute(&mut feature, "h", Value::from("world"));
    layer.add_feature_attribute(&mut feature, "count", Value::Double(1.23));
    layer.add_feature(&feature);

    let mut feature = FeatureBuilder::new(2, 1);
    layer.add_feature_attribute(&mut feature, "hello", Value::from("again"));
    layer.add_feature_attribute(&mut feature, "count", Value::Int(2));
    layer.add_feature(&feature);

    let mut tile = TileBuilder::new();
    tile.add_layer(&layer);
    tile.encode()
}
