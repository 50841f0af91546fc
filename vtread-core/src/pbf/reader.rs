//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::pbf::error::{FormatError, Result};
use std::convert::TryInto;
use std::ptr;
use std::str;

/// Maximum encoded length of a 64 bit varint
const MAX_VARINT_LEN: usize = 10;

/// Protobuf wire types
/// https://developers.google.com/protocol-buffers/docs/encoding#structure
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

impl WireType {
    fn from_key(key: u64) -> Result<WireType> {
        match key & 0x7 {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            5 => Ok(WireType::Fixed32),
            wt => Err(FormatError::UnsupportedWireType(wt as u8)),
        }
    }
}

/// Streaming field reader over the byte range `[pos, end)` of a tile buffer.
///
/// The reader never owns bytes. Sub-messages returned by `message()` are
/// readers over the same buffer with a narrower end bound, so every view
/// derived from a tile borrows the tile's input buffer.
#[derive(Clone, Copy, Debug)]
pub struct FieldReader<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
    tag: u32,
    wire_type: WireType,
}

impl<'a> FieldReader<'a> {
    pub fn new(data: &'a [u8]) -> FieldReader<'a> {
        FieldReader {
            data,
            pos: 0,
            end: data.len(),
            tag: 0,
            wire_type: WireType::Varint,
        }
    }

    pub fn has_more(&self) -> bool {
        self.pos < self.end
    }

    /// Cursor offset into the underlying buffer
    pub fn position(&self) -> usize {
        self.pos
    }

    /// End offset into the underlying buffer
    pub fn end(&self) -> usize {
        self.end
    }

    /// Unconsumed bytes of this view
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..self.end]
    }

    /// Tag of the field read by the last call to `next`
    pub fn tag(&self) -> u32 {
        self.tag
    }

    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    /// True if both readers are views into the same buffer
    pub fn same_buffer(&self, other: &FieldReader<'_>) -> bool {
        ptr::eq(self.data.as_ptr(), other.data.as_ptr()) && self.data.len() == other.data.len()
    }

    /// Advance to the next field header. Returns `false` at the end of the view.
    pub fn next(&mut self) -> Result<bool> {
        if !self.has_more() {
            return Ok(false);
        }
        let key = self.read_varint()?;
        let tag = key >> 3;
        if tag == 0 || tag > u64::from(u32::MAX >> 3) {
            return Err(FormatError::InvalidTag);
        }
        self.wire_type = WireType::from_key(key)?;
        self.tag = tag as u32;
        Ok(true)
    }

    /// Advance to the next field with the given tag, skipping all others.
    pub fn next_tag(&mut self, tag: u32) -> Result<bool> {
        while self.next()? {
            if self.tag == tag {
                return Ok(true);
            }
            self.skip()?;
        }
        Ok(false)
    }

    /// Consume the payload of the current field without interpreting it.
    pub fn skip(&mut self) -> Result<()> {
        match self.wire_type {
            WireType::Varint => {
                self.read_varint()?;
            }
            WireType::Fixed64 => {
                self.take(8)?;
            }
            WireType::Fixed32 => {
                self.take(4)?;
            }
            WireType::LengthDelimited => {
                let len = self.read_len()?;
                self.take(len)?;
            }
        }
        Ok(())
    }

    pub fn varint64(&mut self) -> Result<u64> {
        self.expect(WireType::Varint)?;
        self.read_varint()
    }

    /// Varint truncated to 32 bits, like protobuf `uint32` fields
    pub fn varint(&mut self) -> Result<u32> {
        Ok(self.varint64()? as u32)
    }

    pub fn int64(&mut self) -> Result<i64> {
        Ok(self.varint64()? as i64)
    }

    /// Zig-zag encoded varint (`sint64`)
    pub fn svarint(&mut self) -> Result<i64> {
        let v = self.varint64()?;
        Ok(((v >> 1) as i64) ^ -((v & 1) as i64))
    }

    pub fn bool(&mut self) -> Result<bool> {
        Ok(self.varint64()? != 0)
    }

    pub fn fixed32(&mut self) -> Result<u32> {
        self.expect(WireType::Fixed32)?;
        let start = self.take(4)?;
        let bytes: [u8; 4] = self.data[start..start + 4]
            .try_into()
            .map_err(|_| FormatError::UnexpectedEof)?;
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn fixed64(&mut self) -> Result<u64> {
        self.expect(WireType::Fixed64)?;
        let start = self.take(8)?;
        let bytes: [u8; 8] = self.data[start..start + 8]
            .try_into()
            .map_err(|_| FormatError::UnexpectedEof)?;
        Ok(u64::from_le_bytes(bytes))
    }

    pub fn float(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.fixed32()?))
    }

    pub fn double(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.fixed64()?))
    }

    /// Length-delimited sub-message as a bounded reader
    pub fn message(&mut self) -> Result<FieldReader<'a>> {
        let len = self.read_len()?;
        let start = self.take(len)?;
        Ok(FieldReader {
            data: self.data,
            pos: start,
            end: start + len,
            tag: 0,
            wire_type: WireType::Varint,
        })
    }

    pub fn bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_len()?;
        let start = self.take(len)?;
        Ok(&self.data[start..start + len])
    }

    pub fn string(&mut self) -> Result<&'a str> {
        str::from_utf8(self.bytes()?).map_err(|_| FormatError::InvalidUtf8)
    }

    /// Packed repeated varint field
    pub fn packed_varints(&mut self) -> Result<PackedVarints<'a>> {
        Ok(PackedVarints {
            reader: self.message()?,
        })
    }

    fn expect(&self, wire_type: WireType) -> Result<()> {
        if self.wire_type == wire_type {
            Ok(())
        } else {
            Err(FormatError::WireTypeMismatch {
                tag: self.tag,
                wire_type: self.wire_type as u8,
            })
        }
    }

    fn read_varint(&mut self) -> Result<u64> {
        let mut result: u64 = 0;
        for i in 0..MAX_VARINT_LEN {
            if self.pos >= self.end {
                return Err(FormatError::UnexpectedEof);
            }
            let byte = self.data[self.pos];
            self.pos += 1;
            result |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(FormatError::MalformedVarint)
    }

    fn read_len(&mut self) -> Result<usize> {
        self.expect(WireType::LengthDelimited)?;
        let len = self.read_varint()?;
        if len > (self.end - self.pos) as u64 {
            return Err(FormatError::UnexpectedEof);
        }
        Ok(len as usize)
    }

    /// Reserve `len` bytes and return their start offset
    fn take(&mut self, len: usize) -> Result<usize> {
        if len > self.end - self.pos {
            return Err(FormatError::UnexpectedEof);
        }
        let start = self.pos;
        self.pos += len;
        Ok(start)
    }
}

impl Default for FieldReader<'_> {
    fn default() -> Self {
        FieldReader::new(&[])
    }
}

/// Iterator over the elements of a packed varint field
#[derive(Clone, Copy, Debug)]
pub struct PackedVarints<'a> {
    reader: FieldReader<'a>,
}

impl<'a> PackedVarints<'a> {
    pub fn new(data: &'a [u8]) -> PackedVarints<'a> {
        PackedVarints {
            reader: FieldReader::new(data),
        }
    }

    pub fn has_more(&self) -> bool {
        self.reader.has_more()
    }

    /// Raw packed bytes not consumed yet
    pub fn remaining(&self) -> &'a [u8] {
        self.reader.remaining()
    }
}

impl Iterator for PackedVarints<'_> {
    type Item = Result<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.reader.has_more() {
            Some(self.reader.read_varint())
        } else {
            None
        }
    }
}
