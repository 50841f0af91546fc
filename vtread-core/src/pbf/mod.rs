//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Minimal protobuf wire format reader
//! https://developers.google.com/protocol-buffers/docs/encoding

pub mod error;
pub mod reader;
#[cfg(test)]
mod reader_test;

pub use self::error::FormatError;
pub use self::reader::{FieldReader, PackedVarints, WireType};
