//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use std::error::Error;
use std::fmt;

/// Structural decoding error
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FormatError {
    /// Read past the end of the current message
    UnexpectedEof,
    /// Varint longer than 10 bytes
    MalformedVarint,
    /// Field number 0
    InvalidTag,
    /// Groups (wire types 3 and 4) or unassigned wire types
    UnsupportedWireType(u8),
    /// Field payload read with a different wire type than encoded
    WireTypeMismatch { tag: u32, wire_type: u8 },
    InvalidUtf8,
    OutOfRangeKey(u64),
    OutOfRangeValue(u64),
    UnevenTags,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormatError::UnexpectedEof => write!(f, "unexpected end of buffer"),
            FormatError::MalformedVarint => write!(f, "malformed varint"),
            FormatError::InvalidTag => write!(f, "invalid field tag 0"),
            FormatError::UnsupportedWireType(wt) => write!(f, "unsupported wire type {}", wt),
            FormatError::WireTypeMismatch { tag, wire_type } => write!(
                f,
                "unexpected wire type {} for field {}",
                wire_type, tag
            ),
            FormatError::InvalidUtf8 => write!(f, "string is not valid UTF-8"),
            FormatError::OutOfRangeKey(idx) => {
                write!(f, "feature referenced out of range key {}", idx)
            }
            FormatError::OutOfRangeValue(idx) => {
                write!(f, "feature referenced out of range value {}", idx)
            }
            FormatError::UnevenTags => write!(f, "uneven number of feature tag ids"),
        }
    }
}

impl Error for FormatError {}

pub type Result<T> = std::result::Result<T, FormatError>;
