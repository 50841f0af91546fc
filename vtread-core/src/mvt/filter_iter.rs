//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::filter::Filter;
use crate::mvt::extractor::TagExtractor;
use crate::mvt::feature::{Feature, FeatureType};
use crate::mvt::layer::Layer;
use crate::pbf::{FieldReader, FormatError};

/// Undecoded feature message of a layer
#[derive(Clone, Copy, Debug)]
pub struct RawFeature<'l, 'a> {
    layer: &'l Layer<'a>,
    msg: FieldReader<'a>,
}

impl<'l, 'a> RawFeature<'l, 'a> {
    /// Encoded feature message
    pub fn bytes(&self) -> &'a [u8] {
        self.msg.remaining()
    }

    pub fn layer(&self) -> &'l Layer<'a> {
        self.layer
    }

    /// Decode the full feature
    pub fn decode(&self) -> Result<Feature<'a>, FormatError> {
        Feature::decode(self.msg, self.layer)
    }
}

/// Lazy iterator over the features of a layer matching a filter.
///
/// Each candidate feature is scanned for its tags and geometry type only.
/// Features rejected by the filter are never decoded.
pub struct FilterIterator<'l, 'a, F: Filter + ?Sized> {
    layer: &'l Layer<'a>,
    filter: &'l F,
    /// Unconsumed part of the layer message
    data: FieldReader<'a>,
    /// Current match, `None` when exhausted
    feature: Option<FieldReader<'a>>,
}

impl<'l, 'a, F: Filter + ?Sized> FilterIterator<'l, 'a, F> {
    /// Create an iterator positioned on the first match
    pub fn new(layer: &'l Layer<'a>, filter: &'l F) -> FilterIterator<'l, 'a, F> {
        let mut iter = FilterIterator {
            layer,
            filter,
            data: layer.data(),
            feature: None,
        };
        iter.advance();
        iter
    }

    /// Move to the next matching feature or to the exhausted state.
    pub fn advance(&mut self) {
        self.feature = None;
        loop {
            let msg = match self.next_candidate() {
                Ok(Some(msg)) => msg,
                Ok(None) => return,
                Err(e) => {
                    warn!("invalid feature data in layer '{}': {}", self.layer.name, e);
                    self.exhaust();
                    return;
                }
            };
            let mut extractor = TagExtractor::new(self.layer);
            if let Err(e) = Self::scan_candidate(msg, &mut extractor) {
                warn!("skipping invalid feature in layer '{}': {}", self.layer.name, e);
                continue;
            }
            if self.filter.evaluate(&extractor) {
                self.feature = Some(msg);
                return;
            }
        }
    }

    /// Matched feature, `None` when exhausted
    pub fn current(&self) -> Option<RawFeature<'l, 'a>> {
        self.feature.map(|msg| RawFeature {
            layer: self.layer,
            msg,
        })
    }

    pub fn is_exhausted(&self) -> bool {
        self.feature.is_none() && !self.data.has_more()
    }

    fn next_candidate(&mut self) -> Result<Option<FieldReader<'a>>, FormatError> {
        if self.data.next_tag(2)? {
            Ok(Some(self.data.message()?))
        } else {
            Ok(None)
        }
    }

    /// Read the fields needed for filtering: tags (2) and type (3)
    fn scan_candidate(
        mut msg: FieldReader<'a>,
        extractor: &mut TagExtractor<'l, 'a>,
    ) -> Result<(), FormatError> {
        while msg.next()? {
            match msg.tag() {
                2 => extractor.set_tags(msg.bytes()?),
                3 => extractor.set_type(FeatureType::from_raw(msg.varint64()?)),
                _ => msg.skip()?,
            }
        }
        Ok(())
    }

    fn exhaust(&mut self) {
        self.feature = None;
        self.data = FieldReader::default();
    }
}

impl<'l, 'a, F: Filter + ?Sized> Iterator for FilterIterator<'l, 'a, F> {
    type Item = RawFeature<'l, 'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current()?;
        self.advance();
        Some(current)
    }
}

impl<F: Filter + ?Sized> PartialEq for FilterIterator<'_, '_, F> {
    fn eq(&self, other: &Self) -> bool {
        if self.is_exhausted() && other.is_exhausted() {
            return true;
        }
        self.data.same_buffer(&other.data)
            && self.data.position() == other.data.position()
            && self.data.end() == other.data.end()
            && self.feature.is_some() == other.feature.is_some()
    }
}
