// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Growable byte buffer backing the CDR codec.
//!
//! Based on the TypeScript implementation at:
//! https://github.com/emulated-devices/rtps-cdr/blob/main/src/CdrWriter.ts

/// A growable byte region the codec reads from and writes into.
///
/// `Buffer` owns a contiguous, zero-initialized byte region. Growth always
/// succeeds unless a `max_capacity` ceiling was set with [`Buffer::bounded`],
/// in which case `grow` returns `false` once that ceiling would be
/// exceeded; this is how the codec's insufficient-space path is exercised
/// deterministically in tests.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    data: Vec<u8>,
    max_capacity: Option<usize>,
}

impl Buffer {
    /// Create an empty, unbounded buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            max_capacity: None,
        }
    }

    /// Create a zero-filled, unbounded buffer with the given initial size.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity],
            max_capacity: None,
        }
    }

    /// Create a zero-filled buffer that refuses to grow past `capacity`.
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity],
            max_capacity: Some(capacity),
        }
    }

    /// Wrap existing bytes as a bounded buffer (used to read encoded data).
    #[must_use]
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let len = data.len();
        Self {
            data,
            max_capacity: Some(len),
        }
    }

    /// Current usable length of the region.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Attempt to grow the buffer by at least `min_extra_bytes`, measured
    /// from the current end of the region. Returns `false` if a bound was
    /// set and would be exceeded.
    pub fn grow(&mut self, min_extra_bytes: usize) -> bool {
        let target = self.data.len() + min_extra_bytes;
        if let Some(max) = self.max_capacity {
            if target > max {
                tracing::warn!(
                    requested = target,
                    limit = max,
                    "buffer refused to grow past its bound"
                );
                return false;
            }
        }
        self.data.resize(target, 0);
        true
    }

    /// Borrow the full backing region immutably.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Borrow the full backing region mutably.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer, returning its backing storage.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
