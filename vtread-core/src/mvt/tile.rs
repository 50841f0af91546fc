//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::mvt::layer::Layer;
use crate::pbf::{FieldReader, FormatError};
use flate2::read::GzDecoder;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::{self, Read};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decoded vector tile.
///
/// Layers borrow the input buffer, which has to outlive the tile.
#[derive(Clone, Debug, Default)]
pub struct Tile<'a> {
    layers: HashMap<String, Layer<'a>>,
}

impl<'a> Tile<'a> {
    /// Decode a `Tile` message
    pub fn decode(data: &'a [u8]) -> Result<Tile<'a>, FormatError> {
        let mut tile = Tile::default();
        let mut reader = FieldReader::new(data);
        while reader.next()? {
            if reader.tag() == 3 {
                let layer = Layer::decode(reader.message()?)?;
                if tile.layers.contains_key(&layer.name) {
                    debug!("Duplicate layer '{}' replaces previous one", layer.name);
                }
                tile.layers.insert(layer.name.clone(), layer);
            } else {
                reader.skip()?;
            }
        }
        Ok(tile)
    }

    pub fn layer(&self, name: &str) -> Option<&Layer<'a>> {
        self.layers.get(name)
    }

    pub fn layers(&self) -> impl Iterator<Item = &Layer<'a>> {
        self.layers.values()
    }

    /// Layer names in alphabetical order
    pub fn layer_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.layers.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn is_gzipped(data: &[u8]) -> bool {
        data.starts_with(&GZIP_MAGIC)
    }

    /// Uncompressed tile content. Gzip compressed input is detected by its magic bytes.
    pub fn decompress(data: &[u8]) -> io::Result<Cow<'_, [u8]>> {
        if Self::is_gzipped(data) {
            Self::gunzip(data).map(Cow::Owned)
        } else {
            Ok(Cow::Borrowed(data))
        }
    }

    pub fn gunzip(data: &[u8]) -> io::Result<Vec<u8>> {
        let mut gz = GzDecoder::new(data);
        let mut unc_tile = Vec::with_capacity(data.len() * 2);
        gz.read_to_end(&mut unc_tile)?;
        Ok(unc_tile)
    }
}
