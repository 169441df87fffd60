// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # cdr-codec
//!
//! A buffer-backed binary codec implementing Common Data Representation
//! (CDR) as used by OMG DDS / RTPS wire formats.
//!
//! The core is [`Codec`], a single stateful encoder/decoder over a
//! [`Buffer`]. It handles:
//!
//! - CDR alignment, computed relative to an alignment anchor rather than an
//!   absolute offset, so nested encapsulations align correctly.
//! - Byte-order negotiation, including a per-call endianness override that
//!   never leaks into the codec's persistent state.
//! - The encapsulation header (representation identifier, DDS options, PL
//!   flag) and the alignment reset it triggers.
//! - Transactional error semantics: any operation that cannot complete
//!   leaves the cursor exactly where it started.
//!
//! ## Example
//!
//! ```
//! use cdr_codec::{Buffer, ByteOrder, CdrFlavor, Codec};
//!
//! let mut buffer = Buffer::new();
//! {
//!     let mut writer = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
//!     writer.serialize(42i32).unwrap();
//!     writer.serialize_string(Some("hello")).unwrap();
//! }
//!
//! let mut reader = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
//! let value: i32 = reader.deserialize().unwrap();
//! let text = reader.deserialize_string().unwrap().unwrap();
//! assert_eq!(value, 42);
//! assert_eq!(&text.bytes[..text.length], b"hello");
//! ```

pub mod buffer;
pub mod codec;
pub mod error;

pub use buffer::Buffer;
pub use codec::{ByteOrder, CdrFlavor, CdrPrimitive, Codec, CodecState, LongDouble, PlFlag, WChar};
pub use error::{CodecError, Result};
