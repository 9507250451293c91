//! Document model, field schema, and text analyzers shared across the
//! segment store, indexer, and scorer crates.

mod analyzer;
mod document;
mod schema;

pub use analyzer::{
    tokenize_field_values, Analyzer, AnalyzerProfileKind, FIELD_VALUE_GAP,
};
pub use document::Document;
pub use schema::{FieldDescriptor, FieldKind, Schema, SchemaError};
