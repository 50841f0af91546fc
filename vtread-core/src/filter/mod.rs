//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod expression;

pub use self::expression::{CompareOp, FilterExpression};

use crate::mvt::extractor::AttributeSource;

/// Feature predicate evaluated against the attributes of a feature
pub trait Filter {
    fn evaluate(&self, attrs: &dyn AttributeSource) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&dyn AttributeSource) -> bool,
{
    fn evaluate(&self, attrs: &dyn AttributeSource) -> bool {
        self(attrs)
    }
}
