// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Fixed-size array serialize/deserialize (spec §4.7).
//!
//! Alignment is computed once, before the first element; elements are then
//! packed contiguously with no inter-element padding. Byte/char arrays,
//! long-double arrays, and wide-character arrays are not special-cased here:
//! they fall out of `serialize_array::<u8>`, `serialize_array::<LongDouble>`,
//! and `serialize_array::<WChar>` respectively, since `CdrPrimitive` already
//! carries the right width and alignment for each.

use super::{ByteOrder, CdrPrimitive, Codec};
use crate::error::{CodecError, Result};

impl<'a> Codec<'a> {
    /// Serialize `values` using the codec's current byte order. A no-op for
    /// an empty slice: no padding is emitted and the cursor does not move
    /// (spec invariant 6).
    pub fn serialize_array<T: CdrPrimitive>(&mut self, values: &[T]) -> Result<()> {
        let swap = self.swap;
        self.serialize_array_swapped(values, swap)
    }

    /// Serialize `values` using an explicit byte order for this call only.
    pub fn serialize_array_with_order<T: CdrPrimitive>(
        &mut self,
        values: &[T],
        byte_order: ByteOrder,
    ) -> Result<()> {
        let swap = byte_order.swap_against_host();
        self.serialize_array_swapped(values, swap)
    }

    fn serialize_array_swapped<T: CdrPrimitive>(&mut self, values: &[T], swap: bool) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }

        let align = T::ALIGN;
        let width = T::WIDTH;
        let needed = self.padding_needed(align);
        let payload = width * values.len();
        if !self.ensure_writable(needed + payload) {
            return Err(CodecError::insufficient_space(
                needed + payload,
                self.buffer.capacity().saturating_sub(self.data_cursor),
                self.data_cursor,
            ));
        }

        for b in &mut self.buffer.as_mut_slice()[self.data_cursor..self.data_cursor + needed] {
            *b = 0;
        }
        self.data_cursor += needed;
        self.last_data_size = width;

        for &value in values {
            let mut bytes = value.to_ne_bytes();
            if swap {
                bytes.as_mut().reverse();
            }
            let start = self.data_cursor;
            self.buffer.as_mut_slice()[start..start + width].copy_from_slice(bytes.as_ref());
            self.data_cursor += width;
        }
        Ok(())
    }

    /// Deserialize into `out`, using its length as the element count. A
    /// no-op for an empty slice.
    pub fn deserialize_array<T: CdrPrimitive>(&mut self, out: &mut [T]) -> Result<()> {
        let swap = self.swap;
        self.deserialize_array_swapped(out, swap)
    }

    /// Deserialize into `out` using an explicit byte order for this call
    /// only.
    pub fn deserialize_array_with_order<T: CdrPrimitive>(
        &mut self,
        out: &mut [T],
        byte_order: ByteOrder,
    ) -> Result<()> {
        let swap = byte_order.swap_against_host();
        self.deserialize_array_swapped(out, swap)
    }

    fn deserialize_array_swapped<T: CdrPrimitive>(
        &mut self,
        out: &mut [T],
        swap: bool,
    ) -> Result<()> {
        if out.is_empty() {
            return Ok(());
        }

        let align = T::ALIGN;
        let width = T::WIDTH;
        let needed = self.padding_needed(align);
        let payload = width * out.len();
        self.ensure_readable(needed + payload)?;
        self.data_cursor += needed;
        self.last_data_size = width;

        for slot in out.iter_mut() {
            let start = self.data_cursor;
            let mut bytes = T::Bytes::default();
            bytes
                .as_mut()
                .copy_from_slice(&self.buffer.as_slice()[start..start + width]);
            if swap {
                bytes.as_mut().reverse();
            }
            self.data_cursor += width;
            *slot = T::from_ne_bytes(bytes);
        }
        Ok(())
    }

    /// Serialize a boolean array: one byte per element, no padding between
    /// elements, no alignment (align = 1). A no-op for an empty slice.
    pub fn serialize_bool_array(&mut self, values: &[bool]) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }
        if !self.ensure_writable(values.len()) {
            return Err(CodecError::insufficient_space(
                values.len(),
                self.buffer.capacity().saturating_sub(self.data_cursor),
                self.data_cursor,
            ));
        }
        self.last_data_size = 1;
        for &value in values {
            let start = self.data_cursor;
            self.buffer.as_mut_slice()[start] = value as u8;
            self.data_cursor += 1;
        }
        Ok(())
    }

    /// Deserialize a boolean array into `out`. Any element byte outside
    /// `{0, 1}` is a bad-parameter error; the whole call rolls back to its
    /// pre-call state on failure, matching [`Codec::deserialize_bool`]'s
    /// all-or-nothing behavior for a single element.
    pub fn deserialize_bool_array(&mut self, out: &mut [bool]) -> Result<()> {
        if out.is_empty() {
            return Ok(());
        }
        let snapshot = self.get_state();
        self.ensure_readable(out.len())?;
        self.last_data_size = 1;
        for (i, slot) in out.iter_mut().enumerate() {
            let byte = self.buffer.as_slice()[self.data_cursor];
            match byte {
                0 => *slot = false,
                1 => *slot = true,
                other => {
                    self.set_state(snapshot);
                    return Err(CodecError::bad_parameter(
                        "bool_array",
                        format!("element {i} has byte value {other}, not 0 or 1"),
                    ));
                }
            }
            self.data_cursor += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::codec::{CdrFlavor, LongDouble, WChar};

    #[test]
    fn empty_array_is_a_strict_no_op() {
        let mut buffer = Buffer::new();
        let mut codec = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
        let before = codec.get_state();
        codec.serialize_array::<i32>(&[]).unwrap();
        assert_eq!(codec.get_state(), before);

        let mut out: [i32; 0] = [];
        codec.deserialize_array(&mut out).unwrap();
        assert_eq!(codec.get_state(), before);
    }

    #[test]
    fn u32_array_round_trips() {
        let mut buffer = Buffer::new();
        let values = [1u32, 2, 3, 4];
        {
            let mut writer = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
            writer.serialize_array(&values).unwrap();
        }
        let mut reader = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
        let mut out = [0u32; 4];
        reader.deserialize_array(&mut out).unwrap();
        assert_eq!(out, values);
    }

    #[test]
    fn byte_array_is_bulk_copy_with_no_alignment() {
        let mut buffer = Buffer::new();
        let mut codec = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
        codec.serialize(1u8).unwrap();
        codec.serialize_array::<u8>(&[0xAA, 0xBB, 0xCC]).unwrap();
        assert_eq!(codec.buffer_contents(), &[1, 0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn wchar_array_delegates_to_u32_layout() {
        let mut buffer = Buffer::new();
        let mut codec = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
        codec
            .serialize_array(&[WChar(0x41), WChar(0x1F600)])
            .unwrap();
        let mut expected = Vec::new();
        expected.extend_from_slice(&0x41u32.to_le_bytes());
        expected.extend_from_slice(&0x1F600u32.to_le_bytes());
        assert_eq!(codec.buffer_contents(), expected.as_slice());
    }

    #[test]
    fn long_double_array_uses_eight_byte_alignment() {
        let mut buffer = Buffer::new();
        let mut codec = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
        codec.serialize(1u8).unwrap(); // offset = 1
        codec
            .serialize_array(&[LongDouble([7u8; 16])])
            .unwrap();
        // 7 bytes padding to reach 8-byte alignment, then 16-byte payload.
        assert_eq!(codec.current_position(), 1 + 7 + 16);
    }

    #[test]
    fn bool_array_rejects_bad_element_and_rolls_back() {
        let mut buffer = Buffer::from_bytes(vec![0, 1, 2, 0]);
        let mut codec = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
        let before = codec.get_state();
        let mut out = [false; 4];
        let err = codec.deserialize_bool_array(&mut out).unwrap_err();
        assert!(matches!(err, CodecError::BadParameter { .. }));
        assert_eq!(codec.get_state(), before);
    }
}
