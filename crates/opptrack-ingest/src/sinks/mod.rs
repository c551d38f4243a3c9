//! Persistence sinks
//!
//! Two independent targets, each idempotent per ingestion run: a
//! dynamic-schema delimited-file writer and a fixed-schema SQLite writer.

pub mod csv;
pub mod sqlite;

pub use self::csv::CsvSink;
pub use self::sqlite::SqliteSink;
