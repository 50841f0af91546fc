//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::pbf::{FieldReader, FormatError, WireType};

#[test]
fn test_read_fields() {
    // 1: varint 150, 2: "testing", 3: fixed32 1.5f32
    let mut buf = vec![0x08, 0x96, 0x01, 0x12, 0x07];
    buf.extend_from_slice(b"testing");
    buf.push(0x1d);
    buf.extend_from_slice(&1.5f32.to_le_bytes());

    let mut reader = FieldReader::new(&buf);
    assert!(reader.next().unwrap());
    assert_eq!(reader.tag(), 1);
    assert_eq!(reader.wire_type(), WireType::Varint);
    assert_eq!(reader.varint().unwrap(), 150);

    assert!(reader.next().unwrap());
    assert_eq!(reader.tag(), 2);
    assert_eq!(reader.string().unwrap(), "testing");

    assert!(reader.next().unwrap());
    assert_eq!(reader.tag(), 3);
    assert_eq!(reader.float().unwrap(), 1.5);

    assert!(!reader.has_more());
    assert!(!reader.next().unwrap());
}

#[test]
fn test_skip_and_next_tag() {
    // 1: fixed64, 5: fixed32, 4: bytes, 2: varint 7
    let mut buf = vec![0x09];
    buf.extend_from_slice(&2.5f64.to_le_bytes());
    buf.push(0x2d);
    buf.extend_from_slice(&[1, 2, 3, 4]);
    buf.extend_from_slice(&[0x22, 0x02, 0xaa, 0xbb]);
    buf.extend_from_slice(&[0x10, 0x07]);

    let mut reader = FieldReader::new(&buf);
    assert!(reader.next_tag(2).unwrap());
    assert_eq!(reader.varint().unwrap(), 7);
    assert!(!reader.next_tag(2).unwrap());

    let mut reader = FieldReader::new(&buf);
    assert!(reader.next().unwrap());
    assert_eq!(reader.double().unwrap(), 2.5);
    assert!(reader.next_tag(4).unwrap());
    assert_eq!(reader.bytes().unwrap(), &[0xaa, 0xbb]);
}

#[test]
fn test_sub_message_bounds() {
    // 3: message { 1: varint 1 }, 1: varint 2
    let buf = [0x1a, 0x02, 0x08, 0x01, 0x08, 0x02];
    let mut reader = FieldReader::new(&buf);
    assert!(reader.next().unwrap());
    let mut msg = reader.message().unwrap();
    assert_eq!(msg.position(), 2);
    assert_eq!(msg.end(), 4);
    assert!(msg.next().unwrap());
    assert_eq!(msg.varint().unwrap(), 1);
    assert!(!msg.next().unwrap());
    assert!(msg.same_buffer(&reader));

    assert!(reader.next().unwrap());
    assert_eq!(reader.varint().unwrap(), 2);
}

#[test]
fn test_signed_varints() {
    // zig-zag: 0 -> 0, 1 -> -1, 2 -> 1, 3 -> -2
    let buf = [0x08, 0x03, 0x08, 0x02, 0x08, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
    let mut reader = FieldReader::new(&buf);
    reader.next().unwrap();
    assert_eq!(reader.svarint().unwrap(), -2);
    reader.next().unwrap();
    assert_eq!(reader.svarint().unwrap(), 1);
    reader.next().unwrap();
    assert_eq!(reader.int64().unwrap(), -1);
}

#[test]
fn test_packed_varints() {
    let buf = [0x12, 0x04, 0x00, 0x01, 0xac, 0x02];
    let mut reader = FieldReader::new(&buf);
    reader.next().unwrap();
    let packed = reader.packed_varints().unwrap();
    let values: Vec<u64> = packed.map(|v| v.unwrap()).collect();
    assert_eq!(values, vec![0, 1, 300]);
}

#[test]
fn test_truncated_input() {
    // varint continuation bit set on last byte
    let mut reader = FieldReader::new(&[0x08, 0x96]);
    reader.next().unwrap();
    assert_eq!(reader.varint(), Err(FormatError::UnexpectedEof));

    // declared length exceeds buffer
    let mut reader = FieldReader::new(&[0x12, 0x05, 0x61, 0x62]);
    reader.next().unwrap();
    assert_eq!(reader.string(), Err(FormatError::UnexpectedEof));

    // sub-message bound is respected by nested reads
    let buf = [0x1a, 0x02, 0x12, 0x05, 0x61, 0x62, 0x63, 0x64, 0x65];
    let mut reader = FieldReader::new(&buf);
    reader.next().unwrap();
    let mut msg = reader.message().unwrap();
    msg.next().unwrap();
    assert_eq!(msg.bytes(), Err(FormatError::UnexpectedEof));

    let mut reader = FieldReader::new(&[0x0d, 0x01, 0x02]);
    reader.next().unwrap();
    assert_eq!(reader.skip(), Err(FormatError::UnexpectedEof));
}

#[test]
fn test_malformed_input() {
    let buf = [0x08, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
    let mut reader = FieldReader::new(&buf);
    reader.next().unwrap();
    assert_eq!(reader.varint64(), Err(FormatError::MalformedVarint));

    let mut reader = FieldReader::new(&[0x00, 0x01]);
    assert_eq!(reader.next(), Err(FormatError::InvalidTag));

    // start group
    let mut reader = FieldReader::new(&[0x0b]);
    assert_eq!(reader.next(), Err(FormatError::UnsupportedWireType(3)));

    let mut reader = FieldReader::new(&[0x0a, 0x00]);
    reader.next().unwrap();
    assert_eq!(
        reader.varint(),
        Err(FormatError::WireTypeMismatch {
            tag: 1,
            wire_type: 2
        })
    );

    let mut reader = FieldReader::new(&[0x0a, 0x02, 0xc3, 0x28]);
    reader.next().unwrap();
    assert_eq!(reader.string(), Err(FormatError::InvalidUtf8));
}
