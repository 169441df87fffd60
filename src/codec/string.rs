// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDR strings: a 32-bit length prefix (including the null terminator)
//! followed by the raw bytes (spec §4.5).

use super::Codec;
use crate::error::{CodecError, Result};

/// A string read back from a CDR stream: the raw bytes exactly as they
/// appeared (possibly null-terminated, possibly not, per spec Design
/// Notes open question 2, the codec returns them opaquely) and the logical
/// character count, which excludes a trailing null terminator if present.
///
/// Owns its bytes rather than borrowing from the buffer: `Codec<'a>` already
/// holds the buffer's only mutable borrow for its own lifetime, so a second
/// borrow tied to the same buffer would either need `unsafe` or pin the
/// codec unusable until the string was dropped. An owned copy sidesteps
/// that without changing any observable behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedString {
    /// Raw bytes, including the length-prefixed region as stored on the
    /// wire (terminator included when present).
    pub bytes: Vec<u8>,
    /// Logical character count: `bytes.len() - 1` if the last byte is a
    /// null terminator, else `bytes.len()`.
    pub length: usize,
}

impl<'a> Codec<'a> {
    /// Serialize a string. `None` writes a zero length and stops, matching
    /// the null-pointer case in spec §4.5.
    pub fn serialize_string(&mut self, value: Option<&str>) -> Result<()> {
        let Some(s) = value else {
            self.serialize(0u32)?;
            self.last_data_size = 1;
            return Ok(());
        };
        let snapshot = self.get_state();
        let bytes = s.as_bytes();
        let length = bytes.len() as u32 + 1;
        if let Err(e) = self.serialize(length) {
            self.set_state(snapshot);
            return Err(e);
        }
        if let Err(e) = self.write_string_payload(bytes, true) {
            self.set_state(snapshot);
            return Err(e);
        }
        Ok(())
    }

    /// Serialize a string whose payload (including its terminator) is
    /// supplied by the caller; `explicit_count` is the byte count not
    /// including the terminator, so `length = explicit_count + 1` is
    /// written as the length prefix.
    pub fn serialize_string_explicit(&mut self, payload: &[u8], explicit_count: usize) -> Result<()> {
        let snapshot = self.get_state();
        let length = explicit_count as u32 + 1;
        if let Err(e) = self.serialize(length) {
            self.set_state(snapshot);
            return Err(e);
        }
        if let Err(e) = self.write_string_payload(payload, false) {
            self.set_state(snapshot);
            return Err(e);
        }
        Ok(())
    }

    fn write_string_payload(&mut self, bytes: &[u8], append_terminator: bool) -> Result<()> {
        let total = bytes.len() + if append_terminator { 1 } else { 0 };
        if !self.ensure_writable(total) {
            return Err(CodecError::insufficient_space(
                total,
                self.buffer.capacity().saturating_sub(self.data_cursor),
                self.data_cursor,
            ));
        }
        let start = self.data_cursor;
        self.buffer.as_mut_slice()[start..start + bytes.len()].copy_from_slice(bytes);
        if append_terminator {
            self.buffer.as_mut_slice()[start + bytes.len()] = 0;
        }
        self.data_cursor += total;
        self.last_data_size = 1;
        Ok(())
    }

    /// Deserialize a string: reads the 32-bit length prefix, then exposes
    /// `length` bytes opaquely. Returns `None` for a zero-length string.
    pub fn deserialize_string(&mut self) -> Result<Option<DecodedString>> {
        let snapshot = self.get_state();
        let length: u32 = match self.deserialize() {
            Ok(v) => v,
            Err(e) => {
                self.set_state(snapshot);
                return Err(e);
            }
        };
        if length == 0 {
            self.last_data_size = 1;
            return Ok(None);
        }

        let length = length as usize;
        if let Err(e) = self.ensure_readable(length) {
            self.set_state(snapshot);
            return Err(e);
        }

        let start = self.data_cursor;
        let bytes = self.buffer.as_slice()[start..start + length].to_vec();
        self.data_cursor += length;
        self.last_data_size = 1;

        let logical_length = if bytes.last() == Some(&0) {
            length - 1
        } else {
            length
        };
        Ok(Some(DecodedString {
            bytes,
            length: logical_length,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::codec::{ByteOrder, CdrFlavor};

    #[test]
    fn s4_round_trip_string_hi() {
        let mut buffer = Buffer::new();
        {
            let mut writer = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
            writer.serialize_string(Some("hi")).unwrap();
        }
        assert_eq!(
            buffer.as_slice(),
            &[0x03, 0x00, 0x00, 0x00, 0x68, 0x69, 0x00]
        );

        let mut reader = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
        let decoded = reader.deserialize_string().unwrap().unwrap();
        assert_eq!(decoded.bytes, vec![0x68, 0x69, 0x00]);
        assert_eq!(decoded.length, 2);
    }

    #[test]
    fn null_string_serializes_as_zero_length() {
        let mut buffer = Buffer::new();
        let mut codec = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
        codec.serialize_string(None).unwrap();
        assert_eq!(codec.buffer_contents(), &[0, 0, 0, 0]);
        assert_eq!(codec.last_data_size(), 1);
    }

    #[test]
    fn explicit_length_variant_writes_count_plus_terminator() {
        let mut buffer = Buffer::new();
        {
            let mut writer = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
            writer.serialize_string_explicit(b"hi\0", 2).unwrap();
        }
        assert_eq!(
            buffer.as_slice(),
            &[0x03, 0x00, 0x00, 0x00, 0x68, 0x69, 0x00]
        );

        let mut reader = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
        let decoded = reader.deserialize_string().unwrap().unwrap();
        assert_eq!(decoded.bytes, vec![0x68, 0x69, 0x00]);
        assert_eq!(decoded.length, 2);
    }

    #[test]
    fn deserialize_zero_length_string_returns_none() {
        let mut buffer = Buffer::from_bytes(vec![0, 0, 0, 0]);
        let mut codec = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
        assert!(codec.deserialize_string().unwrap().is_none());
        assert_eq!(codec.last_data_size(), 1);
    }

    #[test]
    fn deserialize_string_rolls_back_on_truncated_payload() {
        // length = 10, but only 2 payload bytes follow
        let mut buffer = Buffer::from_bytes(vec![10, 0, 0, 0, b'h', b'i']);
        let mut codec = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
        let before = codec.get_state();
        let err = codec.deserialize_string().unwrap_err();
        assert!(matches!(err, crate::error::CodecError::InsufficientSpace { .. }));
        assert_eq!(codec.get_state(), before);
    }
}
