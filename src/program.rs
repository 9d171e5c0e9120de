//! Program: ordered list of [Field]s applied to a byte buffer.
//!
//! Build one with [ProgramBuilder], then call [Program::decode] as many times
//! as needed. A built program never changes, so it can be shared freely
//! between threads.

use crate::{
    engine,
    errors::{DecodeError, ProgramError},
    field::{Field, FieldKind},
    reorder::{Reorder, ReorderRange},
    value::Record,
};

/// Immutable decode program. Use [Program::builder] to create one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    fields: Vec<Field>,
}

impl Program {
    pub fn builder() -> ProgramBuilder {
        ProgramBuilder::default()
    }

    /// Fields in execution order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Decodes `data` into a [Record]. Fails on the first field that does not fit.
    pub fn decode(&self, data: &[u8]) -> Result<Record, DecodeError> {
        engine::decode(self, data)
    }

    /// Decodes a hex string such as `"0f a1"`. Whitespace between digits is ignored.
    ///
    /// Fails with [DecodeError::NotABuffer] if the string is not whole bytes of hex.
    pub fn decode_hex(&self, hex: &str) -> Result<Record, DecodeError> {
        let data = parse_hex(hex)?;
        self.decode(&data)
    }
}

fn parse_hex(text: &str) -> Result<Vec<u8>, DecodeError> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(digits).map_err(|_| DecodeError::NotABuffer)
}

/// Append-only builder for a [Program].
///
/// Cursor moves (`skip`, `back`) return `&mut Self`. Every append that
/// produces a value validates its name and width and returns
/// `Result<&mut Self, ProgramError>`, leaving the builder unchanged on error.
///
/// ```
/// use bitdecode::program::Program;
///
/// let mut builder = Program::builder();
/// builder.bits("flags", 4)?.skip(4).uint16("length")?;
/// let program = builder.build();
///
/// let record = program.decode(&[0xA0, 0x01, 0x02])?;
/// assert_eq!(record["flags"].as_u64(), Some(0xA));
/// assert_eq!(record["length"].as_u64(), Some(0x0102));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProgramBuilder {
    fields: Vec<Field>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unsigned run of `width` bits (1..=64).
    pub fn bits(&mut self, name: &str, width: usize) -> Result<&mut Self, ProgramError> {
        check_name(name)?;
        check_bits_width(width)?;

        self.fields
            .push(Field::value(FieldKind::Bits, name.to_string(), width));
        Ok(self)
    }

    /// Like [ProgramBuilder::bits], permuting the window with `ranges` before decoding.
    ///
    /// An empty `ranges` slice appends a plain bits field.
    pub fn bits_reordered(
        &mut self,
        name: &str,
        width: usize,
        ranges: &[ReorderRange],
    ) -> Result<&mut Self, ProgramError> {
        check_name(name)?;
        check_bits_width(width)?;

        let reorder = if ranges.is_empty() {
            None
        } else {
            Some(Reorder::new(width, ranges)?)
        };

        let mut field = Field::value(FieldKind::Bits, name.to_string(), width);
        field.reorder = reorder;
        self.fields.push(field);
        Ok(self)
    }

    /// Signed 32-bit integer; same as [ProgramBuilder::int32].
    pub fn int(&mut self, name: &str) -> Result<&mut Self, ProgramError> {
        self.int32(name)
    }

    pub fn int8(&mut self, name: &str) -> Result<&mut Self, ProgramError> {
        self.fixed(FieldKind::Int8, name)
    }

    pub fn int16(&mut self, name: &str) -> Result<&mut Self, ProgramError> {
        self.fixed(FieldKind::Int16, name)
    }

    pub fn int32(&mut self, name: &str) -> Result<&mut Self, ProgramError> {
        self.fixed(FieldKind::Int32, name)
    }

    /// Unsigned 32-bit integer; same as [ProgramBuilder::uint32].
    pub fn uint(&mut self, name: &str) -> Result<&mut Self, ProgramError> {
        self.uint32(name)
    }

    pub fn uint8(&mut self, name: &str) -> Result<&mut Self, ProgramError> {
        self.fixed(FieldKind::UInt8, name)
    }

    pub fn uint16(&mut self, name: &str) -> Result<&mut Self, ProgramError> {
        self.fixed(FieldKind::UInt16, name)
    }

    pub fn uint32(&mut self, name: &str) -> Result<&mut Self, ProgramError> {
        self.fixed(FieldKind::UInt32, name)
    }

    /// 32 bits reinterpreted as an IEEE 754 single.
    ///
    /// The window is accumulated MSB-first before the bit-cast, so bytes
    /// `3F 80 00 00` decode to `1.0` while `00 00 80 3F` decode to the
    /// subnormal with bit pattern `0x0000803F`. No byte swapping is done.
    pub fn float32(&mut self, name: &str) -> Result<&mut Self, ProgramError> {
        self.fixed(FieldKind::Float32, name)
    }

    /// `char_count` 8-bit characters.
    pub fn ascii(&mut self, name: &str, char_count: usize) -> Result<&mut Self, ProgramError> {
        self.text(FieldKind::Ascii, name, char_count)
    }

    /// `byte_count` bytes of UTF-8.
    pub fn utf8(&mut self, name: &str, byte_count: usize) -> Result<&mut Self, ProgramError> {
        self.text(FieldKind::Utf8, name, byte_count)
    }

    pub fn skip(&mut self, width: usize) -> &mut Self {
        self.fields.push(Field::cursor(FieldKind::Skip, width));
        self
    }

    pub fn back(&mut self, width: usize) -> &mut Self {
        self.fields.push(Field::cursor(FieldKind::Back, width));
        self
    }

    /// Appends an already constructed field, validating it like the typed appends do.
    pub fn push(&mut self, field: Field) -> Result<&mut Self, ProgramError> {
        if field.kind.produces_value() {
            check_name(field.name.as_deref().unwrap_or(""))?;
        }

        match field.kind {
            FieldKind::Bits => check_bits_width(field.width_bits)?,
            FieldKind::Ascii | FieldKind::Utf8 => {
                if field.width_bits == 0 || field.width_bits % 8 != 0 {
                    return Err(ProgramError::InvalidFieldWidth {
                        kind: field.kind,
                        width: field.width_bits,
                    });
                }
            }
            FieldKind::Skip | FieldKind::Back => {}
            kind => {
                if kind.fixed_width() != Some(field.width_bits) {
                    return Err(ProgramError::InvalidFieldWidth {
                        kind,
                        width: field.width_bits,
                    });
                }
            }
        }

        if let Some(reorder) = &field.reorder {
            if field.kind != FieldKind::Bits || reorder.width() != field.width_bits {
                return Err(ProgramError::InvalidReorderSpec(format!(
                    "reorder over {} bits does not fit {} field of {} bits",
                    reorder.width(),
                    field.kind,
                    field.width_bits
                )));
            }
        }

        self.fields.push(field);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Snapshot of the fields appended so far. The builder stays usable.
    pub fn build(&self) -> Program {
        Program {
            fields: self.fields.clone(),
        }
    }

    fn fixed(&mut self, kind: FieldKind, name: &str) -> Result<&mut Self, ProgramError> {
        check_name(name)?;

        let width = kind.fixed_width().unwrap_or(32);
        self.fields.push(Field::value(kind, name.to_string(), width));
        Ok(self)
    }

    fn text(
        &mut self,
        kind: FieldKind,
        name: &str,
        count: usize,
    ) -> Result<&mut Self, ProgramError> {
        check_name(name)?;

        let width = match count.checked_mul(8) {
            Some(width) if width > 0 => width,
            _ => {
                return Err(ProgramError::InvalidFieldWidth {
                    kind,
                    width: count,
                });
            }
        };

        self.fields.push(Field::value(kind, name.to_string(), width));
        Ok(self)
    }
}

fn check_name(name: &str) -> Result<(), ProgramError> {
    if name.is_empty() {
        return Err(ProgramError::InvalidFieldName);
    }

    Ok(())
}

fn check_bits_width(width: usize) -> Result<(), ProgramError> {
    if width == 0 || width > 64 {
        return Err(ProgramError::InvalidFieldWidth {
            kind: FieldKind::Bits,
            width,
        });
    }

    Ok(())
}
