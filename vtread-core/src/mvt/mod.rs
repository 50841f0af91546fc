//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Mapbox vector tile decoding
//! https://github.com/mapbox/vector-tile-spec/tree/master/2.1

pub mod extractor;
pub mod feature;
pub mod filter_iter;
pub mod layer;
#[cfg(test)]
pub(crate) mod test_tile;
pub mod tile;
pub mod value;

pub use self::extractor::{AttributeSource, TagExtractor, TYPE_KEY};
pub use self::feature::{Feature, FeatureType};
pub use self::filter_iter::{FilterIterator, RawFeature};
pub use self::layer::Layer;
pub use self::tile::Tile;
pub use self::value::Value;
