//! Protocol Module
//!
//! Defines the binary request frame sent to cache servers.
//!
//! ## Frame Format
//!
//! ```text
//! ┌─────────┬─────────┬──────────┬─────────┬──────────┬───────────┐
//! │Magic (1)│Opcode(1)│KeyLen (2)│ExtLen(1)│Dtype (1) │VBucket (2)│
//! ├─────────┴─────────┴──────────┼─────────┴──────────┴───────────┤
//! │         BodyLen (4)          │          Opaque (4)            │
//! ├──────────────────────────────┴────────────────────────────────┤
//! │                            CAS (8)                            │
//! ├───────────────────────────────────────────────────────────────┤
//! │        Extras: Flags (4) + Expiry (4), SET/ADD/REPLACE only   │
//! ├───────────────────────────────────────────────────────────────┤
//! │                     Key bytes, then Value bytes               │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Opcodes
//! - 0x01: SET      - extras present (8 bytes)
//! - 0x02: ADD      - extras present (8 bytes)
//! - 0x03: REPLACE  - extras present (8 bytes)
//! - 0x0e: APPEND   - no extras
//! - 0x0f: PREPEND  - no extras
//!
//! ### Byte Order
//! KeyLen, VBucket, BodyLen, Flags and Expiry cross the wire in network
//! order. Opaque and CAS are carried without byte-order conversion: the
//! server echoes them back verbatim, so they are identifiers, not numbers,
//! on the wire.

mod codec;
mod request;

pub use codec::{
    decode_request, encode_request, DATATYPE_RAW_BYTES, HEADER_SIZE, MAGIC_REQUEST, MAX_BODY_SIZE,
};
pub use request::{StoreExtras, StoreFrame, StoreOperation, StoreRequest};
