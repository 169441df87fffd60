// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The CDR encapsulation header: a small state machine that negotiates
//! representation identifier, PL flag, and DDS options, then resets the
//! alignment anchor (spec §4.3).

use super::{ByteOrder, Codec, PlFlag};
use crate::codec::state::CdrFlavor;
use crate::error::{CodecError, Result};

/// Bit 1 of `encapsulation_kind`: the DDS parameter-list flag.
const PL_BIT: u8 = 0b10;
/// Bit 0 of `encapsulation_kind`: the endianness flag (1 = little).
const ENDIAN_BIT: u8 = 0b01;

struct EncapsulationUpdate {
    byte_order: ByteOrder,
    swap: bool,
    pl_flag: PlFlag,
    options: u16,
}

impl<'a> Codec<'a> {
    /// Write the encapsulation header: a single `encapsulation_kind` byte
    /// for plain CDR, or four bytes (reserved, kind, 16-bit options) for
    /// DDS-CDR. Resets the alignment anchor to the position right after the
    /// header on success. Rolls back the full state snapshot on failure.
    pub fn serialize_encapsulation(&mut self) -> Result<()> {
        let snapshot = self.get_state();
        match self.serialize_encapsulation_inner() {
            Ok(()) => {
                self.reset_alignment();
                tracing::trace!(
                    flavor = ?self.flavor,
                    byte_order = ?self.byte_order,
                    pl_flag = ?self.pl_flag,
                    "wrote encapsulation header"
                );
                Ok(())
            }
            Err(e) => {
                self.set_state(snapshot);
                Err(e)
            }
        }
    }

    fn serialize_encapsulation_inner(&mut self) -> Result<()> {
        if self.flavor == CdrFlavor::Dds {
            self.write_raw_u8(0x00)?;
        }

        let endian_bit = if self.byte_order.is_little() {
            ENDIAN_BIT
        } else {
            0
        };
        let pl_bit = if self.flavor == CdrFlavor::Dds && self.pl_flag == PlFlag::WithPl {
            PL_BIT
        } else {
            0
        };
        self.write_raw_u8(pl_bit | endian_bit)?;

        if self.flavor == CdrFlavor::Dds {
            let options_bytes = if self.byte_order.is_little() {
                self.options.to_le_bytes()
            } else {
                self.options.to_be_bytes()
            };
            self.write_raw_bytes(&options_bytes)?;
        }
        Ok(())
    }

    /// Read the encapsulation header and adopt the byte order, PL flag, and
    /// options it declares, then reset the alignment anchor.
    ///
    /// Resolves spec Design Notes open question 4 by computing the fully
    /// validated new state into a local value first and only writing it
    /// into `self` once the bad-parameter check (PL bit on a plain-CDR
    /// stream) has passed. Nothing observable is mutated on the failure
    /// path, so there is no ordering hazard between validation and mutation
    /// to get wrong.
    pub fn read_encapsulation(&mut self) -> Result<()> {
        let snapshot = self.get_state();
        match self.read_encapsulation_inner() {
            Ok(update) => {
                self.byte_order = update.byte_order;
                self.swap = update.swap;
                self.pl_flag = update.pl_flag;
                if self.flavor == CdrFlavor::Dds {
                    self.options = update.options;
                }
                self.reset_alignment();
                tracing::trace!(
                    flavor = ?self.flavor,
                    byte_order = ?self.byte_order,
                    pl_flag = ?self.pl_flag,
                    "adopted encapsulation header"
                );
                Ok(())
            }
            Err(e) => {
                self.set_state(snapshot);
                Err(e)
            }
        }
    }

    fn read_encapsulation_inner(&mut self) -> Result<EncapsulationUpdate> {
        if self.flavor == CdrFlavor::Dds {
            self.read_raw_u8()?; // reserved byte, always 0x00
        }

        let kind = self.read_raw_u8()?;
        let stream_little = kind & ENDIAN_BIT != 0;
        let pl_bit_set = kind & PL_BIT != 0;

        if pl_bit_set && self.flavor != CdrFlavor::Dds {
            return Err(CodecError::bad_parameter(
                "encapsulation",
                "PL bit set in a plain CDR stream",
            ));
        }

        let stream_order = if stream_little {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        };
        let (byte_order, swap) = if stream_order != self.byte_order {
            (stream_order, !self.swap)
        } else {
            (self.byte_order, self.swap)
        };

        let options = if self.flavor == CdrFlavor::Dds {
            let raw = self.read_raw_bytes(2)?;
            let bytes = [raw[0], raw[1]];
            if byte_order.is_little() {
                u16::from_le_bytes(bytes)
            } else {
                u16::from_be_bytes(bytes)
            }
        } else {
            self.options
        };

        let pl_flag = if pl_bit_set {
            PlFlag::WithPl
        } else {
            self.pl_flag
        };

        Ok(EncapsulationUpdate {
            byte_order,
            swap,
            pl_flag,
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;

    #[test]
    fn s3_dds_cdr_little_endian_with_pl_header() {
        let mut buffer = Buffer::new();
        let mut codec = Codec::new(&mut buffer, ByteOrder::Little, CdrFlavor::Dds);
        codec.set_pl_flag(PlFlag::WithPl);
        codec.set_options(0xBEEF);
        codec.serialize_encapsulation().unwrap();
        codec.serialize(0x1234i16).unwrap();

        assert_eq!(
            codec.buffer_contents(),
            &[0x00, 0x03, 0xEF, 0xBE, 0x34, 0x12]
        );
    }

    #[test]
    fn encapsulation_commutativity_round_trips_across_codecs() {
        let mut buffer = Buffer::new();
        {
            let mut writer = Codec::new(&mut buffer, ByteOrder::Big, CdrFlavor::Dds);
            writer.set_options(0x1234);
            writer.serialize_encapsulation().unwrap();
            writer.serialize(42i32).unwrap();
            writer.serialize(7i64).unwrap();
        }

        let mut reader = Codec::new(&mut buffer, ByteOrder::Big, CdrFlavor::Dds);
        reader.read_encapsulation().unwrap();
        let a: i32 = reader.deserialize().unwrap();
        let b: i64 = reader.deserialize().unwrap();
        assert_eq!(a, 42);
        assert_eq!(b, 7);
    }

    #[test]
    fn read_encapsulation_rejects_pl_bit_on_plain_cdr() {
        // kind byte = 0b11 (PL bit + little-endian bit) on a plain-CDR codec
        let mut buffer = Buffer::from_bytes(vec![0b11]);
        let mut codec = Codec::new(&mut buffer, ByteOrder::Big, CdrFlavor::Plain);
        let before = codec.get_state();
        let before_order = codec.byte_order();
        let err = codec.read_encapsulation().unwrap_err();
        assert!(matches!(err, CodecError::BadParameter { .. }));
        assert_eq!(codec.get_state(), before);
        assert_eq!(codec.byte_order(), before_order);
    }

    #[test]
    fn read_encapsulation_toggles_byte_order_on_mismatch() {
        let mut buffer = Buffer::from_bytes(vec![0x01]); // little-endian bit set
        let mut codec = Codec::new(&mut buffer, ByteOrder::Big, CdrFlavor::Plain);
        codec.read_encapsulation().unwrap();
        assert_eq!(codec.byte_order(), ByteOrder::Little);
    }
}
