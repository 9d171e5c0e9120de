//! Execution loop: runs a [Program] over a byte buffer.

use tracing::{debug, trace};

use crate::{
    bits::BitCursor,
    decoders,
    errors::DecodeError,
    field::FieldKind,
    program::Program,
    value::Record,
};

/// Runs every field of `program` against `data` in order.
///
/// The cursor starts at bit 0. Each field is bounds-checked before it is read;
/// the first failure aborts the call and discards everything decoded so far.
pub fn decode(program: &Program, data: &[u8]) -> Result<Record, DecodeError> {
    if program.is_empty() {
        return Err(DecodeError::EmptyProgram);
    }

    let mut cursor = BitCursor::new(data);
    let mut record = Record::with_capacity(program.len());

    debug!(
        fields = program.len(),
        total_bits = cursor.total_bits(),
        "decoding buffer"
    );

    for field in program.fields() {
        let step = match field.kind {
            FieldKind::Back => cursor.rewind(field.width_bits).map(|()| None),
            _ => cursor
                .check_window(cursor.position(), field.width_bits)
                .and_then(|()| decoders::decode_field(&cursor, field)),
        };

        let value = step.map_err(|err| {
            debug!(
                kind = %field.kind,
                name = field.name.as_deref().unwrap_or(""),
                position = cursor.position(),
                error = %err,
                "decode aborted"
            );
            err
        })?;

        trace!(
            kind = %field.kind,
            position = cursor.position(),
            width = field.width_bits,
            "field"
        );

        if field.kind != FieldKind::Back {
            cursor.advance(field.width_bits);
        }

        if let (Some(name), Some(value)) = (&field.name, value) {
            record.insert(name.clone(), value);
        }
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{reorder::ReorderRange, value::Value};

    #[test]
    fn test_empty_program() {
        let program = Program::builder().build();
        assert_eq!(decode(&program, &[1, 2, 3]), Err(DecodeError::EmptyProgram));
        assert_eq!(decode(&program, &[]), Err(DecodeError::EmptyProgram));
    }

    #[test]
    fn test_nibbles() {
        let mut builder = Program::builder();
        builder.bits("testFirst", 4).unwrap().bits("testLast", 4).unwrap();
        let program = builder.build();

        let record = decode(&program, &[0x0f]).unwrap();
        assert_eq!(record["testFirst"].as_u64(), Some(0));
        assert_eq!(record["testLast"].as_u64(), Some(15));

        let record = decode(&program, &[0x11]).unwrap();
        assert_eq!(record["testFirst"].as_u64(), Some(1));
        assert_eq!(record["testLast"].as_u64(), Some(1));
    }

    #[test]
    fn test_record_keeps_program_order() {
        let mut builder = Program::builder();
        builder
            .uint8("zeta")
            .unwrap()
            .uint8("alpha")
            .unwrap()
            .uint8("mid")
            .unwrap();
        let record = decode(&builder.build(), &[1, 2, 3]).unwrap();

        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_skip_then_bits() {
        let mut builder = Program::builder();
        builder.skip(4).bits("test", 2).unwrap();

        let record = decode(&builder.build(), &[0x08]).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record["test"].as_u64(), Some(2));
    }

    #[test]
    fn test_back_rereads_bits() {
        let mut builder = Program::builder();
        builder.uint8("whole").unwrap().back(4).bits("low", 4).unwrap();

        let record = decode(&builder.build(), &[0xA7]).unwrap();
        assert_eq!(record["whole"].as_u64(), Some(0xA7));
        assert_eq!(record["low"].as_u64(), Some(0x7));
    }

    #[test]
    fn test_reordered_bits() {
        let mut builder = Program::builder();
        builder
            .bits_reordered(
                "testFirst",
                4,
                &[
                    ReorderRange::new(2, 1, 0),
                    ReorderRange::new(3, 1, 1),
                    ReorderRange::new(0, 2, 2),
                ],
            )
            .unwrap()
            .bits("testLast", 4)
            .unwrap();
        let program = builder.build();

        let cases = [
            (0x0f, 0),
            (0xff, 15),
            (0x11, 4),
            (0x41, 1),
            (0x81, 2),
            (0xa1, 10),
            (0xb1, 14),
        ];

        for (byte, first) in cases {
            let record = decode(&program, &[byte]).unwrap();
            assert_eq!(record["testFirst"].as_u64(), Some(first), "byte {byte:#04x}");
        }
    }

    #[test]
    fn test_out_of_range_is_all_or_nothing() {
        let mut builder = Program::builder();
        builder.uint8("a").unwrap().uint16("b").unwrap();

        assert_eq!(
            decode(&builder.build(), &[1, 2]),
            Err(DecodeError::OutOfRange {
                position: 8,
                width: 16,
                total_bits: 16
            })
        );
    }

    #[test]
    fn test_skip_past_end_fails() {
        let mut builder = Program::builder();
        builder.skip(9);
        assert!(matches!(
            decode(&builder.build(), &[0]),
            Err(DecodeError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_skip_to_exact_end() {
        let mut builder = Program::builder();
        builder.uint8("a").unwrap().skip(8);
        let record = decode(&builder.build(), &[5, 6]).unwrap();
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_back_underflow() {
        let mut builder = Program::builder();
        builder.bits("a", 3).unwrap().back(4);
        assert_eq!(
            decode(&builder.build(), &[0xff]),
            Err(DecodeError::CursorUnderflow {
                position: 3,
                width: 4
            })
        );
    }

    #[test]
    fn test_program_reusable_after_failure() {
        let mut builder = Program::builder();
        builder.uint16("x").unwrap();
        let program = builder.build();

        assert!(decode(&program, &[1]).is_err());
        assert_eq!(
            decode(&program, &[1, 2]).unwrap()["x"],
            Value::UInt {
                value: 0x0102,
                width: 16
            }
        );
    }

    #[test]
    fn test_duplicate_name_overwrites_in_place() {
        let mut builder = Program::builder();
        builder
            .uint8("x")
            .unwrap()
            .uint8("y")
            .unwrap()
            .uint8("x")
            .unwrap();
        let record = decode(&builder.build(), &[1, 2, 3]).unwrap();

        let entries: Vec<(&str, u64)> = record
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_u64().unwrap()))
            .collect();
        assert_eq!(entries, vec![("x", 3), ("y", 2)]);
    }

    #[test]
    fn test_unaligned_typed_fields() {
        let mut builder = Program::builder();
        builder
            .bits("pad", 4)
            .unwrap()
            .int8("i")
            .unwrap()
            .ascii("s", 2)
            .unwrap();

        // 0000 | 1111 1111 | 0100 0001 0100 0001 | 0000
        let record = decode(&builder.build(), &[0x0F, 0xF4, 0x14, 0x10]).unwrap();
        assert_eq!(record["i"].as_i64(), Some(-1));
        assert_eq!(record["s"].as_str(), Some("AA"));
    }
}
