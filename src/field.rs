//! Field descriptors: the instructions a [crate::program::Program] is made of.

use std::fmt;

use crate::reorder::Reorder;

/// One instruction in a decode program.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// What the field decodes to, or which way it moves the cursor.
    pub kind: FieldKind,
    /// Key in the output record. `None` for [FieldKind::Skip] and [FieldKind::Back].
    pub name: Option<String>,
    /// Number of bits the field covers.
    pub width_bits: usize,
    /// Bit permutation applied to the window before decoding. Only set on [FieldKind::Bits].
    pub reorder: Option<Reorder>,
}

impl Field {
    pub(crate) fn value(kind: FieldKind, name: String, width_bits: usize) -> Self {
        Field {
            kind,
            name: Some(name),
            width_bits,
            reorder: None,
        }
    }

    pub(crate) fn cursor(kind: FieldKind, width_bits: usize) -> Self {
        Field {
            kind,
            name: None,
            width_bits,
            reorder: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Raw unsigned bit run of explicit width (1..=64).
    Bits,
    Int8,
    Int16,
    Int32,
    UInt8,
    UInt16,
    UInt32,
    /// 32 bits reinterpreted as IEEE 754 binary32.
    Float32,
    /// Fixed number of 8-bit characters.
    Ascii,
    /// Fixed number of bytes decoded as UTF-8.
    Utf8,
    /// Moves the cursor forward without producing a value.
    Skip,
    /// Moves the cursor backward without producing a value.
    Back,
}

impl FieldKind {
    /// Width implied by the kind itself, if it has one.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            FieldKind::Int8 | FieldKind::UInt8 => Some(8),
            FieldKind::Int16 | FieldKind::UInt16 => Some(16),
            FieldKind::Int32 | FieldKind::UInt32 | FieldKind::Float32 => Some(32),
            _ => None,
        }
    }

    /// Whether decoding this kind inserts an entry in the record.
    pub fn produces_value(self) -> bool {
        !matches!(self, FieldKind::Skip | FieldKind::Back)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Bits => "bits",
            FieldKind::Int8 => "int8",
            FieldKind::Int16 => "int16",
            FieldKind::Int32 => "int32",
            FieldKind::UInt8 => "uint8",
            FieldKind::UInt16 => "uint16",
            FieldKind::UInt32 => "uint32",
            FieldKind::Float32 => "float32",
            FieldKind::Ascii => "ascii",
            FieldKind::Utf8 => "utf8",
            FieldKind::Skip => "skip",
            FieldKind::Back => "back",
        };

        f.write_str(name)
    }
}
