//! # bitdecode
//!
//! Declarative bit-level decoding of packed binary records.
//!
//! Build a [Program] from field descriptors (raw bit runs, fixed-width
//! integers, floats, fixed-length text, and cursor moves), then decode byte
//! buffers into a [Record] keyed by field name. Bits are read MSB-first, so
//! fields need not start or end on byte boundaries.
//!
//! ## Example
//!
//! ```
//! use bitdecode::{Program, ReorderRange};
//!
//! let mut builder = Program::builder();
//! builder
//!     .bits_reordered(
//!         "swapped",
//!         8,
//!         &[ReorderRange::new(0, 4, 4), ReorderRange::new(4, 4, 0)],
//!     )?
//!     .int8("delta")?
//!     .ascii("tag", 2)?;
//! let program = builder.build();
//!
//! let record = program.decode(&[0x12, 0xFE, b'O', b'K'])?;
//! assert_eq!(record["swapped"].as_u64(), Some(0x21));
//! assert_eq!(record["delta"].as_i64(), Some(-2));
//! assert_eq!(record["tag"].as_str(), Some("OK"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! With the `serde` feature, programs can also be loaded from JSON via
//! `Program::from_json`, and decoded values serialize as plain JSON scalars.

pub mod bits;
pub mod decoders;
pub mod engine;
pub mod errors;
pub mod field;
pub mod program;
pub mod reorder;
#[cfg(feature = "serde")]
pub mod serde;
pub mod value;

pub use errors::{DecodeError, ProgramError};
pub use field::{Field, FieldKind};
pub use program::{Program, ProgramBuilder};
pub use reorder::{Reorder, ReorderRange};
pub use value::{Record, Value};
