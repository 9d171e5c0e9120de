//! Error types for program construction and decoding.

use thiserror::Error;

use crate::field::FieldKind;

/// Errors produced while appending fields to a [crate::program::ProgramBuilder].
///
/// A failed append leaves every previously appended field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// Reorder ranges are malformed or do not tile the field window exactly.
    #[error("invalid reorder spec: {0}")]
    InvalidReorderSpec(String),
    /// Width is zero or beyond what the kind can hold.
    #[error("invalid width {width} for {kind} field")]
    InvalidFieldWidth { kind: FieldKind, width: usize },
    /// Value-producing fields need a non-empty name.
    #[error("field name must not be empty")]
    InvalidFieldName,
    /// A program definition could not be parsed.
    #[error("malformed program definition: {0}")]
    InvalidDefinition(String),
}

/// Errors produced by [crate::program::Program::decode] and the bit cursor.
///
/// Any of these aborts the whole decode call; no partial record is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Decode was invoked on a program with no fields.
    #[error("program is empty")]
    EmptyProgram,
    /// Input could not be read as a byte buffer.
    #[error("input is not a byte buffer")]
    NotABuffer,
    /// The requested bit window runs past the end of the buffer.
    #[error("out of range: {width} bits at position {position}, buffer has {total_bits} bits")]
    OutOfRange {
        position: usize,
        width: usize,
        total_bits: usize,
    },
    /// A `back` step would move the cursor before bit 0.
    #[error("cursor underflow: cannot move back {width} bits from position {position}")]
    CursorUnderflow { position: usize, width: usize },
    /// More than 64 bits were requested in a single read.
    #[error("cannot read more than 64 bits at once")]
    TooManyBitsRead,
}
