// Rowguard - Core Library
// Schema-validated records: every field is gated by a bound validator,
// rows come in from CSV/JSON sources, tables go out through formatters.

pub mod value;       // Value Model - FieldValue / ValueKind
pub mod validators;  // Field Validators - check chains + error taxonomy
pub mod registry;    // Validator Registry - kind tag -> constructor
pub mod record;      // Record Layer - Schema + Record
pub mod reader;      // Row Sources - CSV and JSON into validated records
pub mod tableformat; // Table Formatters - text/csv/html + wrappers

// Re-export commonly used types
pub use value::{FieldValue, ValueKind};
pub use validators::{
    boolean, float, integer, list, non_empty_string, positive_float, positive_integer, string,
    Check, FieldValidator, ValidationError, ValidationErrorKind,
};
pub use registry::ValidatorRegistry;
pub use record::{DuplicateFieldError, Record, Schema, SchemaBuilder};
pub use reader::{
    csv_records, json_records, read_csv_records, read_json_records, RowReport, SkippedRow,
};
pub use tableformat::{
    as_is, create_formatter, fixed_decimal, print_table, CellTransform, ColumnFormats,
    CsvTableFormatter, FormatKind, FormatterOptions, HtmlTableFormatter, TableFormatter,
    TextTableFormatter, UpperHeadings,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
