//! Codec Tests
//!
//! Byte-level checks of the request frame layout: field offsets, network
//! byte order for length and routing fields, native byte order for the
//! correlation fields, and the decode error paths.

use hivecache::protocol::{
    decode_request, encode_request, StoreExtras, StoreOperation, StoreRequest, HEADER_SIZE,
    MAX_BODY_SIZE,
};
use hivecache::HiveError;

// =============================================================================
// Helper Functions
// =============================================================================

fn set_request<'a>(key: &'a [u8], value: &'a [u8]) -> StoreRequest<'a> {
    StoreRequest {
        operation: StoreOperation::Set,
        key,
        value,
        flags: 0,
        expiry: 0,
        cas: 0,
    }
}

// =============================================================================
// Wire Format Tests
// =============================================================================

#[test]
fn test_wire_format_set() {
    let frame = encode_request(&set_request(b"foo", b"bar"), 0, 0).unwrap();

    // 24-byte header, 8-byte extras, 3-byte key, 3-byte value
    assert_eq!(frame.len(), 38);
    assert_eq!(frame[0], 0x80); // request magic
    assert_eq!(frame[1], 0x01); // SET opcode
    assert_eq!(&frame[2..4], &[0x00, 0x03]); // key length
    assert_eq!(frame[4], 0x08); // extras length
    assert_eq!(frame[5], 0x00); // data type: raw bytes
    assert_eq!(&frame[6..8], &[0x00, 0x00]); // vbucket
    assert_eq!(&frame[8..12], &[0x00, 0x00, 0x00, 0x0e]); // body = 8 + 3 + 3
    assert_eq!(&frame[12..16], &[0x00; 4]); // opaque
    assert_eq!(&frame[16..24], &[0x00; 8]); // cas
    assert_eq!(&frame[24..28], &[0x00; 4]); // flags
    assert_eq!(&frame[28..32], &[0x00; 4]); // expiry
    assert_eq!(&frame[32..35], b"foo");
    assert_eq!(&frame[35..38], b"bar");
}

#[test]
fn test_wire_format_append() {
    let request = StoreRequest {
        operation: StoreOperation::Append,
        key: b"k",
        value: b"v",
        flags: 0xdead_beef, // not on the wire without extras
        expiry: 900,
        cas: 0,
    };
    let frame = encode_request(&request, 12, 0).unwrap();

    // 24-byte header, no extras, 1-byte key, 1-byte value
    assert_eq!(frame.len(), 26);
    assert_eq!(frame[1], 0x0e); // APPEND opcode
    assert_eq!(frame[4], 0x00); // extras length
    assert_eq!(&frame[6..8], &[0x00, 0x0c]); // vbucket 12
    assert_eq!(&frame[8..12], &[0x00, 0x00, 0x00, 0x02]); // body = 1 + 1
    assert_eq!(frame[24], b'k');
    assert_eq!(frame[25], b'v');
}

#[test]
fn test_wire_format_prepend() {
    let request = StoreRequest {
        operation: StoreOperation::Prepend,
        key: b"log",
        value: b">> ",
        flags: 0,
        expiry: 0,
        cas: 0,
    };
    let frame = encode_request(&request, 0, 0).unwrap();

    assert_eq!(frame[1], 0x0f); // PREPEND opcode
    assert_eq!(frame[4], 0x00); // extras length
    assert_eq!(frame.len(), HEADER_SIZE + 6);
}

#[test]
fn test_body_length_counts_extras() {
    for operation in [
        StoreOperation::Set,
        StoreOperation::Add,
        StoreOperation::Replace,
    ] {
        let request = StoreRequest {
            operation,
            key: b"counter",
            value: b"12345",
            flags: 1,
            expiry: 0,
            cas: 0,
        };
        let frame = encode_request(&request, 0, 0).unwrap();
        let body = u32::from_be_bytes(frame[8..12].try_into().unwrap());
        assert_eq!(body, 7 + 5 + 8, "body length for {:?}", operation);
    }

    for operation in [StoreOperation::Append, StoreOperation::Prepend] {
        let request = StoreRequest {
            operation,
            key: b"counter",
            value: b"12345",
            flags: 1,
            expiry: 0,
            cas: 0,
        };
        let frame = encode_request(&request, 0, 0).unwrap();
        let body = u32::from_be_bytes(frame[8..12].try_into().unwrap());
        assert_eq!(body, 7 + 5, "body length for {:?}", operation);
    }
}

#[test]
fn test_network_order_fields() {
    let request = StoreRequest {
        operation: StoreOperation::Set,
        key: b"foo",
        value: b"bar",
        flags: 0xdead_beef,
        expiry: 0x0000_0e10,
        cas: 0,
    };
    let frame = encode_request(&request, 0x1234, 0).unwrap();

    assert_eq!(&frame[2..4], &3u16.to_be_bytes());
    assert_eq!(&frame[6..8], &0x1234u16.to_be_bytes());
    assert_eq!(&frame[8..12], &14u32.to_be_bytes());
    assert_eq!(&frame[24..28], &0xdead_beefu32.to_be_bytes());
    assert_eq!(&frame[28..32], &0x0000_0e10u32.to_be_bytes());
}

#[test]
fn test_native_order_opaque_and_cas() {
    let opaque = 0xa1b2_c3d4u32;
    let cas = 0x1122_3344_5566_7788u64;
    let request = StoreRequest {
        operation: StoreOperation::Set,
        key: b"foo",
        value: b"bar",
        flags: 0,
        expiry: 0,
        cas,
    };
    let frame = encode_request(&request, 0, opaque).unwrap();

    // Correlation fields skip byte-order conversion; the server echoes them
    // back without interpreting them.
    assert_eq!(&frame[12..16], &opaque.to_ne_bytes());
    assert_eq!(&frame[16..24], &cas.to_ne_bytes());
}

#[test]
fn test_encode_empty_value() {
    let frame = encode_request(&set_request(b"flag", b""), 0, 0).unwrap();

    let body = u32::from_be_bytes(frame[8..12].try_into().unwrap());
    assert_eq!(body, 4 + 8);
    assert_eq!(frame.len(), HEADER_SIZE + 12);
    assert_eq!(&frame[32..36], b"flag");
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_round_trip_set() {
    let request = StoreRequest {
        operation: StoreOperation::Set,
        key: b"session:41",
        value: b"{\"user\":7}",
        flags: 0x0000_0001,
        expiry: 3600,
        cas: 99,
    };
    let frame = encode_request(&request, 511, 42).unwrap();
    let decoded = decode_request(&frame).unwrap();

    assert_eq!(decoded.operation, StoreOperation::Set);
    assert_eq!(decoded.vbucket, 511);
    assert_eq!(decoded.opaque, 42);
    assert_eq!(decoded.cas, 99);
    assert_eq!(
        decoded.extras,
        Some(StoreExtras {
            flags: 0x0000_0001,
            expiry: 3600
        })
    );
    assert_eq!(decoded.key, b"session:41");
    assert_eq!(decoded.value, b"{\"user\":7}");
}

#[test]
fn test_round_trip_append() {
    let request = StoreRequest {
        operation: StoreOperation::Append,
        key: b"journal",
        value: b"entry\n",
        flags: 0,
        expiry: 0,
        cas: 7,
    };
    let frame = encode_request(&request, 3, 9).unwrap();
    let decoded = decode_request(&frame).unwrap();

    assert_eq!(decoded.operation, StoreOperation::Append);
    assert_eq!(decoded.extras, None);
    assert_eq!(decoded.cas, 7);
    assert_eq!(decoded.key, b"journal");
    assert_eq!(decoded.value, b"entry\n");
}

#[test]
fn test_round_trip_binary_data() {
    // Binary key and value with null bytes and high bytes
    let binary_key: Vec<u8> = vec![0x00, 0x01, 0xff, 0xfe, 0x80];
    let binary_value: Vec<u8> = (0..=255).collect();

    let request = set_request(&binary_key, &binary_value);
    let frame = encode_request(&request, 0, 0).unwrap();
    let decoded = decode_request(&frame).unwrap();

    assert_eq!(decoded.key, binary_key);
    assert_eq!(decoded.value, binary_value);
}

#[test]
fn test_decode_leaves_trailing_bytes() {
    let first = encode_request(&set_request(b"one", b"1"), 0, 1).unwrap();
    let second = encode_request(&set_request(b"two", b"2"), 0, 2).unwrap();

    let mut buffer = first.clone();
    buffer.extend_from_slice(&second);

    let decoded = decode_request(&buffer).unwrap();
    assert_eq!(decoded.key, b"one");
    assert_eq!(decoded.opaque, 1);

    let decoded = decode_request(&buffer[first.len()..]).unwrap();
    assert_eq!(decoded.key, b"two");
    assert_eq!(decoded.opaque, 2);
}

// =============================================================================
// Size Limit Tests
// =============================================================================

#[test]
fn test_encode_key_at_limit() {
    let key = vec![b'k'; 65_535];
    let request = StoreRequest {
        operation: StoreOperation::Append,
        key: &key,
        value: b"",
        flags: 0,
        expiry: 0,
        cas: 0,
    };
    let frame = encode_request(&request, 0, 0).unwrap();
    assert_eq!(frame.len(), HEADER_SIZE + 65_535);
    assert_eq!(&frame[2..4], &[0xff, 0xff]);
}

#[test]
fn test_encode_key_too_long() {
    let key = vec![b'k'; 65_536];
    let request = StoreRequest {
        operation: StoreOperation::Append,
        key: &key,
        value: b"",
        flags: 0,
        expiry: 0,
        cas: 0,
    };
    let result = encode_request(&request, 0, 0);
    assert!(matches!(
        result,
        Err(HiveError::KeyTooLong {
            len: 65_536,
            max: 65_535
        })
    ));
}

#[test]
fn test_encode_body_too_large() {
    // Key plus extras pushes the body one byte past the limit
    let value = vec![0u8; MAX_BODY_SIZE as usize - 8];
    let request = set_request(b"k", &value);
    let result = encode_request(&request, 0, 0);
    assert!(matches!(result, Err(HiveError::BodyTooLarge { .. })));
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_decode_incomplete_header() {
    let bytes = [0x80, 0x01, 0x00];
    let result = decode_request(&bytes);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("incomplete header"));
}

#[test]
fn test_decode_bad_magic() {
    let mut frame = encode_request(&set_request(b"foo", b"bar"), 0, 0).unwrap();
    frame[0] = 0x81; // response magic
    let result = decode_request(&frame);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("bad magic"));
}

#[test]
fn test_decode_unknown_opcode() {
    let mut frame = encode_request(&set_request(b"foo", b"bar"), 0, 0).unwrap();
    frame[1] = 0x1c; // not a store opcode
    let result = decode_request(&frame);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("unknown opcode"));
}

#[test]
fn test_decode_unsupported_datatype() {
    let mut frame = encode_request(&set_request(b"foo", b"bar"), 0, 0).unwrap();
    frame[5] = 0x01;
    let result = decode_request(&frame);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("unsupported data type"));
}

#[test]
fn test_decode_extras_length_mismatch() {
    // SET must carry 8 bytes of extras
    let mut frame = encode_request(&set_request(b"foo", b"bar"), 0, 0).unwrap();
    frame[4] = 0x00;
    let result = decode_request(&frame);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("does not match"));
}

#[test]
fn test_decode_body_shorter_than_parts() {
    // Declared body length cannot hold the extras and key it also declares
    let mut frame = encode_request(&set_request(b"foo", b"bar"), 0, 0).unwrap();
    frame[8..12].copy_from_slice(&5u32.to_be_bytes());
    let result = decode_request(&frame);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("shorter than"));
}

#[test]
fn test_decode_body_over_limit() {
    // A header may declare up to u32::MAX body bytes; anything above the
    // cap is rejected before the frame is sized against the input
    let mut frame = encode_request(&set_request(b"foo", b"bar"), 0, 0).unwrap();
    frame[8..12].copy_from_slice(&(MAX_BODY_SIZE + 1).to_be_bytes());
    let result = decode_request(&frame);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("exceeds maximum"));
}

#[test]
fn test_decode_incomplete_body() {
    let frame = encode_request(&set_request(b"foo", b"bar"), 0, 0).unwrap();
    let result = decode_request(&frame[..frame.len() - 1]);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("incomplete body"));
}

// =============================================================================
// Operation Mapping Tests
// =============================================================================

#[test]
fn test_operation_opcodes() {
    assert_eq!(StoreOperation::Set.opcode(), 0x01);
    assert_eq!(StoreOperation::Add.opcode(), 0x02);
    assert_eq!(StoreOperation::Replace.opcode(), 0x03);
    assert_eq!(StoreOperation::Append.opcode(), 0x0e);
    assert_eq!(StoreOperation::Prepend.opcode(), 0x0f);
}

#[test]
fn test_operation_from_opcode() {
    for operation in [
        StoreOperation::Set,
        StoreOperation::Add,
        StoreOperation::Replace,
        StoreOperation::Append,
        StoreOperation::Prepend,
    ] {
        assert_eq!(StoreOperation::from_opcode(operation.opcode()), Some(operation));
    }

    assert_eq!(StoreOperation::from_opcode(0x00), None);
    assert_eq!(StoreOperation::from_opcode(0x04), None); // DELETE is not a store
    assert_eq!(StoreOperation::from_opcode(0xff), None);
}

#[test]
fn test_operation_extras_len() {
    assert_eq!(StoreOperation::Set.extras_len(), 8);
    assert_eq!(StoreOperation::Add.extras_len(), 8);
    assert_eq!(StoreOperation::Replace.extras_len(), 8);
    assert_eq!(StoreOperation::Append.extras_len(), 0);
    assert_eq!(StoreOperation::Prepend.extras_len(), 0);
}
