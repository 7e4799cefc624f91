//! Protocol codec
//!
//! Encoding and decoding functions for the request frame.
//!
//! Encoding is a pure transform: request in, contiguous byte frame out. The
//! body length embedded in the header is always computed here from the key,
//! value and extras sizes, never taken from the caller.

use bytes::{Buf, BufMut};

use crate::error::{HiveError, Result};

use super::{StoreExtras, StoreFrame, StoreOperation, StoreRequest};

/// Request magic, first byte of every frame
pub const MAGIC_REQUEST: u8 = 0x80;

/// Data type tag: raw bytes (the only type this client produces)
pub const DATATYPE_RAW_BYTES: u8 = 0x00;

/// Fixed header size, excluding extras: magic(1) + opcode(1) + keylen(2) +
/// extlen(1) + datatype(1) + vbucket(2) + bodylen(4) + opaque(4) + cas(8)
pub const HEADER_SIZE: usize = 24;

/// Maximum request body (extras + key + value) this client will encode (16 MB)
pub const MAX_BODY_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a store request into a wire frame.
///
/// `vbucket` is the routed partition and `opaque` the correlation token; both
/// are resolved by the dispatcher, not the caller, so they are arguments here
/// rather than fields of [`StoreRequest`].
///
/// KeyLen, VBucket, BodyLen and both extras words are written in network
/// order; Opaque and CAS are written without byte-order conversion (the
/// server treats them as opaque and echoes them back as-is).
pub fn encode_request(request: &StoreRequest<'_>, vbucket: u16, opaque: u32) -> Result<Vec<u8>> {
    let key_len = request.key.len();
    if key_len > usize::from(u16::MAX) {
        return Err(HiveError::KeyTooLong {
            len: key_len,
            max: usize::from(u16::MAX),
        });
    }

    let extras_len = request.operation.extras_len();
    let body_len = key_len as u64 + request.value.len() as u64 + extras_len as u64;
    if body_len > u64::from(MAX_BODY_SIZE) {
        return Err(HiveError::BodyTooLarge {
            len: body_len,
            max: MAX_BODY_SIZE,
        });
    }

    let mut frame = Vec::with_capacity(HEADER_SIZE + body_len as usize);
    frame.put_u8(MAGIC_REQUEST);
    frame.put_u8(request.operation.opcode());
    frame.put_u16(key_len as u16);
    frame.put_u8(extras_len as u8);
    frame.put_u8(DATATYPE_RAW_BYTES);
    frame.put_u16(vbucket);
    frame.put_u32(body_len as u32);
    frame.put_u32_ne(opaque);
    frame.put_u64_ne(request.cas);

    if extras_len != 0 {
        frame.put_u32(request.flags);
        frame.put_u32(request.expiry);
    }

    frame.extend_from_slice(request.key);
    frame.extend_from_slice(request.value);

    Ok(frame)
}

// =============================================================================
// Request Decoding
// =============================================================================

/// Decode the request frame at the start of `bytes`.
///
/// The inverse of [`encode_request`]. Bytes past the frame's declared body
/// length are left untouched, so consecutive frames can be decoded from one
/// buffer.
pub fn decode_request(bytes: &[u8]) -> Result<StoreFrame> {
    if bytes.len() < HEADER_SIZE {
        return Err(HiveError::Frame(format!(
            "incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut buf = bytes;
    let magic = buf.get_u8();
    if magic != MAGIC_REQUEST {
        return Err(HiveError::Frame(format!(
            "bad magic: expected 0x{:02x}, got 0x{:02x}",
            MAGIC_REQUEST, magic
        )));
    }

    let opcode = buf.get_u8();
    let operation = StoreOperation::from_opcode(opcode)
        .ok_or_else(|| HiveError::Frame(format!("unknown opcode: 0x{:02x}", opcode)))?;

    let key_len = usize::from(buf.get_u16());
    let ext_len = usize::from(buf.get_u8());
    let datatype = buf.get_u8();
    let vbucket = buf.get_u16();
    let body_len = buf.get_u32() as usize;
    let opaque = buf.get_u32_ne();
    let cas = buf.get_u64_ne();

    if datatype != DATATYPE_RAW_BYTES {
        return Err(HiveError::Frame(format!(
            "unsupported data type: 0x{:02x}",
            datatype
        )));
    }
    if ext_len != operation.extras_len() {
        return Err(HiveError::Frame(format!(
            "extras length {} does not match opcode 0x{:02x} (expected {})",
            ext_len,
            opcode,
            operation.extras_len()
        )));
    }
    if body_len < key_len + ext_len {
        return Err(HiveError::Frame(format!(
            "body length {} shorter than extras {} + key {}",
            body_len, ext_len, key_len
        )));
    }
    if body_len > MAX_BODY_SIZE as usize {
        return Err(HiveError::Frame(format!(
            "body length {} exceeds maximum {}",
            body_len, MAX_BODY_SIZE
        )));
    }
    if bytes.len() < HEADER_SIZE + body_len {
        return Err(HiveError::Frame(format!(
            "incomplete body: expected {} bytes, got {}",
            HEADER_SIZE + body_len,
            bytes.len()
        )));
    }

    let extras = if ext_len != 0 {
        Some(StoreExtras {
            flags: buf.get_u32(),
            expiry: buf.get_u32(),
        })
    } else {
        None
    };

    let mut key = vec![0u8; key_len];
    buf.copy_to_slice(&mut key);

    let value_len = body_len - key_len - ext_len;
    let mut value = vec![0u8; value_len];
    buf.copy_to_slice(&mut value);

    Ok(StoreFrame {
        operation,
        vbucket,
        opaque,
        cas,
        extras,
        key,
        value,
    })
}
