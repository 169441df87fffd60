// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The `CdrPrimitive` trait unifies serialize/deserialize over every scalar
//! CDR type, so the codec needs one generic `serialize`/`deserialize` pair
//! instead of ten near-identical hand-written functions per type.

/// A scalar type the CDR codec can serialize or deserialize directly.
///
/// `WIDTH` is the on-wire payload size; `ALIGN` is the alignment boundary,
/// which differs from `WIDTH` only for [`LongDouble`] (16-byte payload,
/// 8-byte alignment, per spec §4.4).
pub trait CdrPrimitive: Copy + Sized {
    /// Fixed-size byte array matching `WIDTH`.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

    /// On-wire payload width in bytes.
    const WIDTH: usize;
    /// Alignment boundary in bytes.
    const ALIGN: usize;

    /// Native-endian byte representation of `self`.
    fn to_ne_bytes(self) -> Self::Bytes;
    /// Reconstruct a value from its native-endian byte representation.
    fn from_ne_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_cdr_primitive {
    ($t:ty, $width:expr, $align:expr) => {
        impl CdrPrimitive for $t {
            type Bytes = [u8; $width];

            const WIDTH: usize = $width;
            const ALIGN: usize = $align;

            fn to_ne_bytes(self) -> Self::Bytes {
                <$t>::to_ne_bytes(self)
            }

            fn from_ne_bytes(bytes: Self::Bytes) -> Self {
                <$t>::from_ne_bytes(bytes)
            }
        }
    };
}

impl_cdr_primitive!(i8, 1, 1);
impl_cdr_primitive!(u8, 1, 1);
impl_cdr_primitive!(i16, 2, 2);
impl_cdr_primitive!(u16, 2, 2);
impl_cdr_primitive!(i32, 4, 4);
impl_cdr_primitive!(u32, 4, 4);
impl_cdr_primitive!(i64, 8, 8);
impl_cdr_primitive!(u64, 8, 8);
impl_cdr_primitive!(f32, 4, 4);
impl_cdr_primitive!(f64, 8, 8);

/// CDR's IDL `long double`: a 16-byte payload aligned to 8 bytes.
///
/// Rust has no native type matching the platform-dependent extended
/// precision float IDL describes, so the payload is carried as opaque
/// bytes; a byte-order swap reverses the 16 bytes as a whole rather than
/// reinterpreting them as any particular float layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LongDouble(pub [u8; 16]);

impl CdrPrimitive for LongDouble {
    type Bytes = [u8; 16];

    const WIDTH: usize = 16;
    const ALIGN: usize = 8;

    fn to_ne_bytes(self) -> Self::Bytes {
        self.0
    }

    fn from_ne_bytes(bytes: Self::Bytes) -> Self {
        LongDouble(bytes)
    }
}

/// A wide character, encoded per WCDR as a 32-bit code unit.
///
/// Defined purely so `serialize_array`/`deserialize_array` can be reused for
/// wide-character arrays, per spec §4.7 ("element-by-element delegation to
/// the 32-bit primitive").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WChar(pub u32);

impl CdrPrimitive for WChar {
    type Bytes = [u8; 4];

    const WIDTH: usize = 4;
    const ALIGN: usize = 4;

    fn to_ne_bytes(self) -> Self::Bytes {
        self.0.to_ne_bytes()
    }

    fn from_ne_bytes(bytes: Self::Bytes) -> Self {
        WChar(u32::from_ne_bytes(bytes))
    }
}
