//! Table-driven binary configuration codec.
//!
//! Human-edited, delimiter-separated tables are compiled into a compact
//! binary row stream, and decoded back into typed records at runtime.
//!
//! ```text
//! source text ─▶ matrix::load ─▶ Schema::build ─▶ StringPool::build
//!                                      │
//!                                      ▼
//!                             encoder::encode_table ─▶ blob
//!                                                        │
//!           DataTable ◀─ decoder::decode_table ◀─────────┘
//! ```
//!
//! The crate is pure: it reads no files, spawns no threads and never logs.
//! Failures and default-value fallbacks come back as values; callers decide
//! what to log and whether to continue.
//!
//! # Modules
//!
//! - [`codec`]: column codecs and the keyword [`TypeRegistry`]
//! - [`matrix`]: delimited text → [`RawMatrix`]
//! - [`schema`]: per-column metadata and the shared [`RowLayout`]
//! - [`string_pool`]: deterministic string deduplication
//! - [`encoder`] / [`decoder`]: the two directions of the row stream
//! - [`table`]: the runtime [`DataTable`] index

pub mod blob;
pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod matrix;
pub mod reader;
pub mod record;
pub mod schema;
pub mod string_pool;
pub mod table;
pub mod value;
pub mod varint;

pub use blob::{BLOB_MAGIC, BlobFormat};
pub use codec::{ColumnCodec, LookupError, ParseError, TypeRegistry, WriteError};
pub use decoder::{DecodeError, RowDecoder, RowFrames, decode_table, decode_text};
pub use encoder::{
    CellFailure, EncodeError, EncodedTable, FallbackNotice, RowEncoder, encode_table,
};
pub use error::{ErrorSeverity, TableError};
pub use matrix::{LoadOptions, MatrixLayout, RawMatrix, load};
pub use reader::RowReader;
pub use record::{FieldError, FromValue, Record};
pub use schema::{
    ColumnSchema, FieldLayout, IDENTIFIER_NAME, RowLayout, Schema, SchemaError,
    SchemaFingerprint,
};
pub use string_pool::StringPool;
pub use table::{DataTable, DuplicateIdPolicy, IndexError, Row};
pub use value::{
    Color, Color32, Quaternion, Rect, Timestamp, Value, Vector2, Vector3, Vector4,
};
