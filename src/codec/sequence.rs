// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Sequences: a 32-bit length prefix followed by `length` elements using the
//! array rules (spec §4.8).

use super::Codec;
use crate::codec::string::DecodedString;
use crate::error::Result;

impl<'a> Codec<'a> {
    /// Serialize a boolean sequence: length prefix, then the elements.
    /// Snapshots before the length write and rolls back on failure.
    pub fn serialize_bool_sequence(&mut self, values: &[bool]) -> Result<()> {
        let snapshot = self.get_state();
        if let Err(e) = self.serialize(values.len() as u32) {
            self.set_state(snapshot);
            return Err(e);
        }
        if let Err(e) = self.serialize_bool_array(values) {
            self.set_state(snapshot);
            return Err(e);
        }
        Ok(())
    }

    /// Deserialize a boolean sequence: reads the length, then that many
    /// elements.
    pub fn deserialize_bool_sequence(&mut self) -> Result<Vec<bool>> {
        let snapshot = self.get_state();
        let len: u32 = match self.deserialize() {
            Ok(v) => v,
            Err(e) => {
                self.set_state(snapshot);
                return Err(e);
            }
        };
        let mut out = vec![false; len as usize];
        if let Err(e) = self.deserialize_bool_array(&mut out) {
            self.set_state(snapshot);
            return Err(e);
        }
        Ok(out)
    }

    /// Deserialize a string sequence: reads the length, then that many
    /// strings. Slots built before a failing element are simply dropped
    /// when the local `Vec` goes out of scope on the error path. Rust's
    /// ownership model makes the spec's "dispose of partially-built slots"
    /// step automatic rather than something this code has to do by hand.
    pub fn deserialize_string_sequence(&mut self) -> Result<Vec<Option<DecodedString>>> {
        let snapshot = self.get_state();
        let len: u32 = match self.deserialize() {
            Ok(v) => v,
            Err(e) => {
                self.set_state(snapshot);
                return Err(e);
            }
        };
        let mut out = Vec::with_capacity(len as usize);
        for _ in 0..len {
            match self.deserialize_string() {
                Ok(s) => out.push(s),
                Err(e) => {
                    self.set_state(snapshot);
                    return Err(e);
                }
            }
        }
        Ok(out)
    }
}
