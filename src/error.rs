// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Error types for the CDR codec.
//!
//! The spec this codec implements recognizes exactly two error kinds:
//! insufficient space (a write couldn't grow the buffer, or a read ran past
//! the populated region) and a bad parameter (a byte violated a contract,
//! such as a boolean encoded as neither 0 nor 1).

use std::fmt;

/// Errors that can occur during CDR encoding or decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A write could not grow the buffer to fit, or a read would exceed the
    /// populated region. The CDR literature calls this "not enough memory"
    /// even for reads; the name is historical, it means "input exhausted".
    InsufficientSpace {
        /// Bytes the operation needed.
        requested: usize,
        /// Bytes actually available from the cursor position.
        available: usize,
        /// Cursor position when the error occurred.
        cursor: usize,
    },

    /// A byte value violated a contract: a boolean outside `{0, 1}`, a PL
    /// bit set on a plain-CDR stream, or an unexpected header byte.
    BadParameter {
        /// What was being validated.
        context: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl CodecError {
    /// Create an insufficient-space error.
    pub fn insufficient_space(requested: usize, available: usize, cursor: usize) -> Self {
        CodecError::InsufficientSpace {
            requested,
            available,
            cursor,
        }
    }

    /// Create a bad-parameter error.
    pub fn bad_parameter(context: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::BadParameter {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Structured fields for logging, mirroring the teacher's `log_fields`.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CodecError::InsufficientSpace {
                requested,
                available,
                cursor,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("cursor", cursor.to_string()),
            ],
            CodecError::BadParameter { context, reason } => {
                vec![("context", context.clone()), ("reason", reason.clone())]
            }
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::InsufficientSpace {
                requested,
                available,
                cursor,
            } => write!(
                f,
                "insufficient space: requested {requested} bytes at position {cursor}, but only {available} bytes available"
            ),
            CodecError::BadParameter { context, reason } => {
                write!(f, "bad parameter in {context}: {reason}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// Result type for CDR codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
