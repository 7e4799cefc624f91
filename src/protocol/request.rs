//! Request definitions
//!
//! Represents store requests before and after wire encoding.

/// Store operation kinds, carrying their wire opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StoreOperation {
    Set = 0x01,
    Add = 0x02,
    Replace = 0x03,
    Append = 0x0e,
    Prepend = 0x0f,
}

impl StoreOperation {
    /// Wire opcode for this operation
    pub fn opcode(self) -> u8 {
        self as u8
    }

    /// Size of the extras block this operation carries.
    ///
    /// SET/ADD/REPLACE carry flags and expiry (8 bytes); APPEND/PREPEND
    /// modify an existing value in place and carry none.
    pub fn extras_len(self) -> usize {
        match self {
            StoreOperation::Set | StoreOperation::Add | StoreOperation::Replace => 8,
            StoreOperation::Append | StoreOperation::Prepend => 0,
        }
    }

    /// Map a wire opcode back to an operation.
    ///
    /// Returns `None` for opcodes outside the store set; decode callers
    /// report that as a malformed frame.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            0x01 => Some(StoreOperation::Set),
            0x02 => Some(StoreOperation::Add),
            0x03 => Some(StoreOperation::Replace),
            0x0e => Some(StoreOperation::Append),
            0x0f => Some(StoreOperation::Prepend),
            _ => None,
        }
    }
}

/// A store request as handed to the encoder.
///
/// Borrows key and value; the encoder copies them into the frame, nothing
/// here outlives the call.
#[derive(Debug, Clone, Copy)]
pub struct StoreRequest<'a> {
    /// Which mutation to perform
    pub operation: StoreOperation,

    /// Key bytes (must fit the 16-bit key-length field)
    pub key: &'a [u8],

    /// Value bytes
    pub value: &'a [u8],

    /// Opaque application flags stored alongside the value.
    /// Ignored on the wire for APPEND/PREPEND.
    pub flags: u32,

    /// Expiration, transmitted verbatim. The server reads values up to
    /// 2,592,000 (30 days) as relative seconds and larger values as an
    /// absolute unix timestamp. Ignored on the wire for APPEND/PREPEND.
    pub expiry: u32,

    /// Compare-and-swap token for optimistic concurrency; passed through,
    /// never interpreted here. Zero means unconditional.
    pub cas: u64,
}

/// Extras block of a decoded frame (SET/ADD/REPLACE only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreExtras {
    pub flags: u32,
    pub expiry: u32,
}

/// A fully decoded request frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFrame {
    /// Which mutation the frame requests
    pub operation: StoreOperation,

    /// Target vbucket
    pub vbucket: u16,

    /// Correlation token the response will echo
    pub opaque: u32,

    /// Compare-and-swap token
    pub cas: u64,

    /// Flags and expiry; `None` for the operations that carry no extras
    pub extras: Option<StoreExtras>,

    /// Key bytes
    pub key: Vec<u8>,

    /// Value bytes
    pub value: Vec<u8>,
}
