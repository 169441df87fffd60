// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The CDR codec: a single stateful encoder/decoder over a [`Buffer`].
//!
//! Based on the TypeScript implementation at:
//! https://github.com/emulated-devices/rtps-cdr/blob/main/src/CdrWriter.ts

pub mod array;
pub mod encapsulation;
pub mod primitive;
pub mod sequence;
pub mod state;
pub mod string;

pub use primitive::{CdrPrimitive, LongDouble, WChar};
pub use state::{ByteOrder, CdrFlavor, CodecState, PlFlag};

use crate::buffer::Buffer;
use crate::error::{CodecError, Result};

/// Stateful CDR encoder/decoder over a borrowed [`Buffer`].
///
/// Owns two cursors (`data_cursor`, `align_anchor`), a byte-order state, and
/// an encapsulation state machine (`flavor`, `pl_flag`, `options`), per spec
/// §3. The buffer outlives the codec; the codec never frees it.
pub struct Codec<'a> {
    buffer: &'a mut Buffer,
    flavor: CdrFlavor,
    byte_order: ByteOrder,
    swap: bool,
    pl_flag: PlFlag,
    options: u16,
    data_cursor: usize,
    align_anchor: usize,
    last_data_size: usize,
}

impl<'a> Codec<'a> {
    /// Construct a codec over `buffer` starting at offset 0, with the given
    /// initial byte order and CDR flavor.
    pub fn new(buffer: &'a mut Buffer, byte_order: ByteOrder, flavor: CdrFlavor) -> Self {
        let swap = byte_order.swap_against_host();
        Self {
            buffer,
            flavor,
            byte_order,
            swap,
            pl_flag: PlFlag::WithoutPl,
            options: 0,
            data_cursor: 0,
            align_anchor: 0,
            last_data_size: 0,
        }
    }

    /// The CDR flavor this codec was constructed for. Immutable.
    pub fn flavor(&self) -> CdrFlavor {
        self.flavor
    }

    /// The codec's current declared byte order.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Whether primitive payloads are currently being byte-swapped.
    pub fn swap(&self) -> bool {
        self.swap
    }

    /// Width in bytes of the most recently serialized/deserialized
    /// primitive. Public per spec §9 ("part of the public contract").
    pub fn last_data_size(&self) -> usize {
        self.last_data_size
    }

    /// Current DDS parameter-list flag.
    pub fn pl_flag(&self) -> PlFlag {
        self.pl_flag
    }

    /// Set the DDS parameter-list flag directly. Only meaningful for
    /// [`CdrFlavor::Dds`]; harmless no-op otherwise since plain CDR never
    /// reads it.
    pub fn set_pl_flag(&mut self, pl_flag: PlFlag) {
        self.pl_flag = pl_flag;
    }

    /// Current DDS options field. Only meaningful for [`CdrFlavor::Dds`].
    pub fn options(&self) -> u16 {
        self.options
    }

    /// Set the DDS options field.
    pub fn set_options(&mut self, options: u16) {
        self.options = options;
    }

    /// Current read/write position, as an offset from the buffer start.
    pub fn current_position(&self) -> usize {
        self.data_cursor
    }

    /// The written region of the buffer, from offset 0 to the data cursor.
    pub fn buffer_contents(&self) -> &[u8] {
        &self.buffer.as_slice()[..self.data_cursor]
    }

    /// Snapshot the four-field transactional state for later restoration.
    pub fn get_state(&self) -> CodecState {
        CodecState {
            data_cursor: self.data_cursor,
            align_anchor: self.align_anchor,
            swap: self.swap,
            last_data_size: self.last_data_size,
        }
    }

    /// Restore a previously captured state snapshot.
    pub fn set_state(&mut self, state: CodecState) {
        self.data_cursor = state.data_cursor;
        self.align_anchor = state.align_anchor;
        self.swap = state.swap;
        self.last_data_size = state.last_data_size;
    }

    /// Reset cursors to the buffer start; `swap` is recomputed from
    /// `byte_order`.
    pub fn reset(&mut self) {
        self.data_cursor = 0;
        self.align_anchor = 0;
        self.swap = self.byte_order.swap_against_host();
        self.last_data_size = 0;
    }

    /// Reset the alignment anchor to the current data cursor. Implicitly
    /// invoked by the encapsulation operations; idempotent when called
    /// twice in a row.
    pub fn reset_alignment(&mut self) {
        self.align_anchor = self.data_cursor;
    }

    /// Advance the data cursor by `n` bytes, growing the buffer if needed.
    /// Returns `false` if growth was refused.
    pub fn jump(&mut self, n: usize) -> bool {
        if !self.ensure_writable(n) {
            return false;
        }
        self.data_cursor += n;
        true
    }

    /// Advance the alignment anchor by `n` bytes, growing the buffer if
    /// needed. Used by callers emitting PL sub-streams who need to account
    /// for bytes written outside the codec (e.g. a parameter header).
    pub fn move_alignment_forward(&mut self, n: usize) -> bool {
        if !self.ensure_writable(n) {
            return false;
        }
        self.align_anchor += n;
        true
    }

    /// If different from `byte_order`, flips `byte_order` and toggles
    /// `swap`.
    pub fn change_byte_order(&mut self, byte_order: ByteOrder) {
        if byte_order != self.byte_order {
            self.swap = !self.swap;
            self.byte_order = byte_order;
        }
    }

    /// Padding needed to align the next write/read to `align` bytes,
    /// relative to `align_anchor` (spec §4.1).
    fn padding_needed(&self, align: usize) -> usize {
        debug_assert!(align >= 1);
        let distance = self.data_cursor - self.align_anchor;
        let remainder = distance % align;
        if remainder == 0 {
            0
        } else {
            align - remainder
        }
    }

    fn ensure_writable(&mut self, extra: usize) -> bool {
        if self.data_cursor + extra <= self.buffer.capacity() {
            return true;
        }
        self.buffer.grow(extra)
    }

    fn ensure_readable(&self, extra: usize) -> Result<()> {
        let available = self.buffer.capacity().saturating_sub(self.data_cursor);
        if extra > available {
            return Err(CodecError::insufficient_space(
                extra,
                available,
                self.data_cursor,
            ));
        }
        Ok(())
    }

    /// Read one byte with no alignment, used for header parsing.
    fn read_raw_u8(&mut self) -> Result<u8> {
        self.ensure_readable(1)?;
        let value = self.buffer.as_slice()[self.data_cursor];
        self.data_cursor += 1;
        Ok(value)
    }

    /// Read `n` bytes with no alignment, used for header parsing.
    fn read_raw_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        self.ensure_readable(n)?;
        let start = self.data_cursor;
        let bytes = self.buffer.as_slice()[start..start + n].to_vec();
        self.data_cursor += n;
        Ok(bytes)
    }

    /// Write one byte with no alignment, used for header serialization.
    fn write_raw_u8(&mut self, value: u8) -> Result<()> {
        if !self.ensure_writable(1) {
            return Err(CodecError::insufficient_space(
                1,
                self.buffer.capacity().saturating_sub(self.data_cursor),
                self.data_cursor,
            ));
        }
        self.buffer.as_mut_slice()[self.data_cursor] = value;
        self.data_cursor += 1;
        Ok(())
    }

    /// Write raw bytes with no alignment, used for header serialization.
    fn write_raw_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if !self.ensure_writable(bytes.len()) {
            return Err(CodecError::insufficient_space(
                bytes.len(),
                self.buffer.capacity().saturating_sub(self.data_cursor),
                self.data_cursor,
            ));
        }
        let start = self.data_cursor;
        self.buffer.as_mut_slice()[start..start + bytes.len()].copy_from_slice(bytes);
        self.data_cursor += bytes.len();
        Ok(())
    }

    /// Serialize a primitive value using the codec's current byte order.
    pub fn serialize<T: CdrPrimitive>(&mut self, value: T) -> Result<()> {
        let swap = self.swap;
        self.serialize_swapped(value, swap)
    }

    /// Serialize a primitive value using an explicit byte order for this
    /// call only. Computes the swap flag fresh from `byte_order` (spec
    /// Design Notes, open question 3) and never touches `self.swap` or
    /// `self.byte_order`, so there is nothing to restore on any exit path,
    /// which is how this crate satisfies spec invariant 5 (byte-order
    /// override purity) unconditionally.
    pub fn serialize_with_order<T: CdrPrimitive>(
        &mut self,
        value: T,
        byte_order: ByteOrder,
    ) -> Result<()> {
        let swap = byte_order.swap_against_host();
        self.serialize_swapped(value, swap)
    }

    fn serialize_swapped<T: CdrPrimitive>(&mut self, value: T, swap: bool) -> Result<()> {
        let align = T::ALIGN;
        let width = T::WIDTH;
        let needed = self.padding_needed(align);
        if !self.ensure_writable(needed + width) {
            return Err(CodecError::insufficient_space(
                needed + width,
                self.buffer.capacity().saturating_sub(self.data_cursor),
                self.data_cursor,
            ));
        }
        for b in &mut self.buffer.as_mut_slice()[self.data_cursor..self.data_cursor + needed] {
            *b = 0;
        }
        self.data_cursor += needed;
        self.last_data_size = width;

        let mut bytes = value.to_ne_bytes();
        if swap {
            bytes.as_mut().reverse();
        }
        let start = self.data_cursor;
        self.buffer.as_mut_slice()[start..start + width].copy_from_slice(bytes.as_ref());
        self.data_cursor += width;
        Ok(())
    }

    /// Deserialize a primitive value using the codec's current byte order.
    pub fn deserialize<T: CdrPrimitive>(&mut self) -> Result<T> {
        let swap = self.swap;
        self.deserialize_swapped(swap)
    }

    /// Deserialize a primitive value using an explicit byte order for this
    /// call only. See [`Codec::serialize_with_order`] for why no restore is
    /// needed.
    pub fn deserialize_with_order<T: CdrPrimitive>(&mut self, byte_order: ByteOrder) -> Result<T> {
        let swap = byte_order.swap_against_host();
        self.deserialize_swapped(swap)
    }

    fn deserialize_swapped<T: CdrPrimitive>(&mut self, swap: bool) -> Result<T> {
        let align = T::ALIGN;
        let width = T::WIDTH;
        let needed = self.padding_needed(align);
        self.ensure_readable(needed + width)?;
        self.data_cursor += needed;
        self.last_data_size = width;

        let start = self.data_cursor;
        let mut bytes = T::Bytes::default();
        bytes
            .as_mut()
            .copy_from_slice(&self.buffer.as_slice()[start..start + width]);
        if swap {
            bytes.as_mut().reverse();
        }
        self.data_cursor += width;
        Ok(T::from_ne_bytes(bytes))
    }

    /// Serialize a boolean as a single byte (`0` or `1`), no alignment.
    pub fn serialize_bool(&mut self, value: bool) -> Result<()> {
        self.write_raw_u8(value as u8)?;
        self.last_data_size = 1;
        Ok(())
    }

    /// Deserialize a boolean from a single byte. Any byte outside `{0, 1}`
    /// is a [`CodecError::BadParameter`]; the check happens before the
    /// cursor advances, so the cursor is unchanged on error (spec scenario
    /// S5).
    pub fn deserialize_bool(&mut self) -> Result<bool> {
        self.ensure_readable(1)?;
        let byte = self.buffer.as_slice()[self.data_cursor];
        match byte {
            0 => {
                self.data_cursor += 1;
                self.last_data_size = 1;
                Ok(false)
            }
            1 => {
                self.data_cursor += 1;
                self.last_data_size = 1;
                Ok(true)
            }
            other => Err(CodecError::bad_parameter(
                "bool",
                format!("byte value {other} is not 0 or 1"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_plain_cdr_little_endian_int32() {
        let mut buffer = Buffer::new();
        let mut codec = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
        codec.serialize(0x0A0B0C0Di32).unwrap();
        assert_eq!(codec.buffer_contents(), &[0x0D, 0x0C, 0x0B, 0x0A]);
        assert_eq!(codec.current_position(), 4);
        assert_eq!(codec.last_data_size(), 4);
    }

    #[test]
    fn s2_plain_cdr_big_endian_mixed_width_alignment() {
        let mut buffer = Buffer::new();
        let mut codec = Codec::new(&mut buffer, ByteOrder::Big, CdrFlavor::Plain);
        codec.serialize(0x11i8).unwrap();
        codec.serialize(0x22334455i32).unwrap();
        assert_eq!(
            codec.buffer_contents(),
            &[0x11, 0x00, 0x00, 0x00, 0x22, 0x33, 0x44, 0x55]
        );
    }

    #[test]
    fn s5_bool_deserialize_rejects_non_canonical_byte() {
        let mut buffer = Buffer::from_bytes(vec![0x02]);
        let mut codec = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
        let before = codec.get_state();
        let err = codec.deserialize_bool().unwrap_err();
        assert!(matches!(err, CodecError::BadParameter { .. }));
        assert_eq!(codec.get_state(), before);
    }

    #[test]
    fn s6_insufficient_space_leaves_state_untouched() {
        let mut buffer = Buffer::bounded(4);
        let mut codec = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
        codec.jump(4);
        let before = codec.get_state();
        let err = codec.serialize(0x1122334455667788u64).unwrap_err();
        assert!(matches!(err, CodecError::InsufficientSpace { .. }));
        assert_eq!(codec.get_state(), before);
    }

    #[test]
    fn s7_byte_order_override_purity() {
        let mut buffer = Buffer::new();
        let mut codec = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
        let order_before = codec.byte_order();
        let swap_before = codec.swap();

        codec
            .serialize_with_order(0x1234i16, ByteOrder::Big)
            .unwrap();
        assert_eq!(codec.buffer_contents(), &[0x12, 0x34]);
        assert_eq!(codec.byte_order(), order_before);
        assert_eq!(codec.swap(), swap_before);
    }

    #[test]
    fn round_trip_preserves_nan_bit_pattern() {
        let mut buffer = Buffer::new();
        let nan = f64::from_bits(0x7ff8_0000_0000_0001);
        {
            let mut codec = Codec::new(&mut buffer, ByteOrder::Big, CdrFlavor::Plain);
            codec.serialize(nan).unwrap();
        }
        let mut codec = Codec::new(&mut buffer, ByteOrder::Big, CdrFlavor::Plain);
        let round_tripped: f64 = codec.deserialize().unwrap();
        assert_eq!(round_tripped.to_bits(), nan.to_bits());
    }

    #[test]
    fn reset_alignment_is_idempotent() {
        let mut buffer = Buffer::new();
        let mut codec = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
        codec.jump(3);
        codec.reset_alignment();
        let anchor_once = codec.align_anchor;
        codec.reset_alignment();
        assert_eq!(codec.align_anchor, anchor_once);
    }

    #[test]
    fn alignment_invariant_holds_after_every_serialize() {
        let mut buffer = Buffer::new();
        let mut codec = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Plain);
        codec.serialize(1u8).unwrap();
        codec.serialize(2i64).unwrap();
        let distance = codec.current_position() - codec.align_anchor;
        assert_eq!(distance % codec.last_data_size(), 0);
    }
}
