//! JSON-deserializable program description.
//!
//! These types describe a decode program as data, for example a definition
//! file shipped alongside an application, and convert into a [Program].
//!
//! ```json
//! {
//!   "fields": [
//!     { "type": "bits", "name": "kind", "width": 4,
//!       "reorder": [{ "sourceStart": 2, "count": 2, "destStart": 0 },
//!                   { "sourceStart": 0, "count": 2, "destStart": 2 }] },
//!     { "type": "skip", "width": 4 },
//!     { "type": "uint16", "name": "length" },
//!     { "type": "ascii", "name": "tag", "length": 3 }
//!   ]
//! }
//! ```
//!
//! `reorder` is kept as raw JSON and checked entry by entry, so a bad range
//! reports which part was wrong instead of a generic parse failure.

use serde::{Deserialize, Serialize};

use crate::{
    errors::ProgramError,
    program::{Program, ProgramBuilder},
    reorder::ReorderRange,
    value::Value,
};

/// Top-level program definition: fields in execution order.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProgramDef {
    pub fields: Vec<FieldDef>,
}

/// One field of a [ProgramDef], tagged by `type`.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldDef {
    Bits {
        name: String,
        width: usize,
        /// Array of `{ sourceStart, count, destStart }` objects.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reorder: Option<serde_json::Value>,
    },
    /// Alias of `int32`.
    Int { name: String },
    Int8 { name: String },
    Int16 { name: String },
    Int32 { name: String },
    /// Alias of `uint32`.
    UInt { name: String },
    UInt8 { name: String },
    UInt16 { name: String },
    UInt32 { name: String },
    Float32 { name: String },
    /// `length` is a character count.
    Ascii { name: String, length: usize },
    /// `length` is a byte count.
    Utf8 { name: String, length: usize },
    Skip { width: usize },
    Back { width: usize },
}

impl TryFrom<ProgramDef> for Program {
    type Error = ProgramError;

    fn try_from(value: ProgramDef) -> Result<Self, Self::Error> {
        let mut builder = ProgramBuilder::new();

        for field in value.fields {
            append(&mut builder, field)?;
        }

        Ok(builder.build())
    }
}

impl Program {
    /// Parses a JSON [ProgramDef] and builds the program it describes.
    pub fn from_json(json: &str) -> Result<Self, ProgramError> {
        let def: ProgramDef = serde_json::from_str(json)
            .map_err(|err| ProgramError::InvalidDefinition(err.to_string()))?;
        Program::try_from(def)
    }
}

fn append(builder: &mut ProgramBuilder, field: FieldDef) -> Result<(), ProgramError> {
    match field {
        FieldDef::Bits {
            name,
            width,
            reorder,
        } => {
            let ranges = match reorder {
                Some(raw) => parse_reorder(&raw)?,
                None => Vec::new(),
            };
            builder.bits_reordered(&name, width, &ranges)?;
        }
        FieldDef::Int { name } => {
            builder.int(&name)?;
        }
        FieldDef::Int8 { name } => {
            builder.int8(&name)?;
        }
        FieldDef::Int16 { name } => {
            builder.int16(&name)?;
        }
        FieldDef::Int32 { name } => {
            builder.int32(&name)?;
        }
        FieldDef::UInt { name } => {
            builder.uint(&name)?;
        }
        FieldDef::UInt8 { name } => {
            builder.uint8(&name)?;
        }
        FieldDef::UInt16 { name } => {
            builder.uint16(&name)?;
        }
        FieldDef::UInt32 { name } => {
            builder.uint32(&name)?;
        }
        FieldDef::Float32 { name } => {
            builder.float32(&name)?;
        }
        FieldDef::Ascii { name, length } => {
            builder.ascii(&name, length)?;
        }
        FieldDef::Utf8 { name, length } => {
            builder.utf8(&name, length)?;
        }
        FieldDef::Skip { width } => {
            builder.skip(width);
        }
        FieldDef::Back { width } => {
            builder.back(width);
        }
    }

    Ok(())
}

/// Converts a raw JSON `reorder` value into typed ranges.
pub fn parse_reorder(raw: &serde_json::Value) -> Result<Vec<ReorderRange>, ProgramError> {
    let items = raw.as_array().ok_or_else(|| {
        ProgramError::InvalidReorderSpec("reorder must be an array".to_string())
    })?;

    items
        .iter()
        .map(|item| -> Result<ReorderRange, ProgramError> {
            let object = item.as_object().ok_or_else(|| {
                ProgramError::InvalidReorderSpec("reorder item must be an object".to_string())
            })?;

            let number = |key: &str| {
                object
                    .get(key)
                    .and_then(serde_json::Value::as_u64)
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| {
                        ProgramError::InvalidReorderSpec(format!(
                            "{key} must be a non-negative integer"
                        ))
                    })
            };

            Ok(ReorderRange::new(
                number("sourceStart")?,
                number("count")?,
                number("destStart")?,
            ))
        })
        .collect()
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::UInt { value, .. } => serializer.serialize_u64(*value),
            Value::Int { value, .. } => serializer.serialize_i64(*value),
            Value::Float32(v) => serializer.serialize_f32(*v),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}
