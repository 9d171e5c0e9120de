//! Per-kind decoders turning a bit window into a [Value].

use crate::{
    bits::BitCursor,
    errors::DecodeError,
    field::{Field, FieldKind},
    value::Value,
};

/// Decodes `field` from the window starting at the cursor position.
///
/// Returns `Ok(None)` for cursor-control kinds, which read nothing. The caller
/// is responsible for moving the cursor afterwards.
pub fn decode_field(cursor: &BitCursor<'_>, field: &Field) -> Result<Option<Value>, DecodeError> {
    let start = cursor.position();

    let value = match field.kind {
        FieldKind::Skip | FieldKind::Back => return Ok(None),

        FieldKind::Ascii | FieldKind::Utf8 => {
            let bytes = cursor.read_bytes_at(start, field.width_bits / 8)?;
            decode_text(field.kind, bytes)
        }

        FieldKind::Bits => {
            let mut raw = cursor.read_bits_at(start, field.width_bits)?;
            if let Some(reorder) = &field.reorder {
                raw = reorder.apply(raw);
            }

            Value::UInt {
                value: raw,
                width: field.width_bits as u32,
            }
        }

        kind @ (FieldKind::Int8
        | FieldKind::Int16
        | FieldKind::Int32
        | FieldKind::UInt8
        | FieldKind::UInt16
        | FieldKind::UInt32
        | FieldKind::Float32) => {
            let raw = cursor.read_bits_at(start, field.width_bits)?;
            reinterpret(kind, raw as u32)
        }
    };

    Ok(Some(value))
}

/// Interprets a 32-bit accumulator according to a fixed-width numeric kind.
///
/// Signed kinds narrow to their width and sign-extend; `Float32` is a bit-cast.
/// Only called by [decode_field] with one of the integer or float kinds.
pub(crate) fn reinterpret(kind: FieldKind, acc: u32) -> Value {
    match kind {
        FieldKind::Int8 => Value::Int {
            value: acc as u8 as i8 as i64,
            width: 8,
        },
        FieldKind::Int16 => Value::Int {
            value: acc as u16 as i16 as i64,
            width: 16,
        },
        FieldKind::Int32 => Value::Int {
            value: acc as i32 as i64,
            width: 32,
        },
        FieldKind::UInt8 => Value::UInt {
            value: (acc as u8).into(),
            width: 8,
        },
        FieldKind::UInt16 => Value::UInt {
            value: (acc as u16).into(),
            width: 16,
        },
        FieldKind::UInt32 => Value::UInt {
            value: acc.into(),
            width: 32,
        },
        FieldKind::Float32 => Value::Float32(f32::from_bits(acc)),
        FieldKind::Bits
        | FieldKind::Ascii
        | FieldKind::Utf8
        | FieldKind::Skip
        | FieldKind::Back => unreachable!("{kind} is not a fixed-width numeric kind"),
    }
}

/// Builds text from bytes taken in window order, stopping at the first NUL.
///
/// `Ascii` maps each byte to the character with the same code point, so it
/// never fails. `Utf8` substitutes U+FFFD for invalid sequences.
pub fn decode_text(kind: FieldKind, mut bytes: Vec<u8>) -> Value {
    if let Some(end) = bytes.iter().position(|b| *b == 0) {
        bytes.truncate(end);
    }

    let text = match kind {
        FieldKind::Utf8 => String::from_utf8_lossy(&bytes).into_owned(),
        _ => bytes.into_iter().map(char::from).collect(),
    };

    Value::Text(text)
}
