// 📂 Row Sources - CSV and JSON rows into validated records
// The row source owns recovery: rows that fail validation are skipped,
// counted and logged; structural problems in the source itself (broken
// CSV framing, non-array JSON) are hard errors.

use crate::record::{Record, Schema};
use crate::validators::ValidationError;
use crate::value::{FieldValue, ValueKind};
use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

// ============================================================================
// ROW REPORT
// ============================================================================

/// A row rejected by the schema, with its 1-based position in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: ValidationError,
}

/// Outcome of reading a row source: the validated records plus every row
/// that was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct RowReport {
    pub records: Vec<Record>,
    pub skipped: Vec<SkippedRow>,
}

impl RowReport {
    fn new() -> Self {
        RowReport {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} records read, {} rows skipped",
            self.records.len(),
            self.skipped.len()
        )
    }

    fn accept(&mut self, record: Record) {
        self.records.push(record);
    }

    fn reject(&mut self, row: usize, reason: ValidationError) {
        warn!(row, %reason, "skipping row that failed validation");
        debug!(row, ?reason, "rejected row detail");
        self.skipped.push(SkippedRow { row, reason });
    }
}

// ============================================================================
// CSV SOURCE
// ============================================================================

/// Read CSV rows against a schema. The first line is a header row and is
/// skipped unread; the source must supply columns in declared field order.
pub fn csv_records<R: Read>(input: R, schema: &Arc<Schema>) -> Result<RowReport> {
    // flexible: short or long rows reach the schema, which reports Arity
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let mut report = RowReport::new();
    for (index, result) in reader.records().enumerate() {
        let row = index + 2; // +2 because: 1-indexed + header row
        let cells = result.with_context(|| format!("failed to read CSV row {}", row))?;
        let raw: Vec<&str> = cells.iter().collect();
        match schema.from_row(&raw) {
            Ok(record) => report.accept(record),
            Err(reason) => report.reject(row, reason),
        }
    }
    Ok(report)
}

/// Read a CSV file against a schema.
pub fn read_csv_records(path: &Path, schema: &Arc<Schema>) -> Result<RowReport> {
    let file = File::open(path)
        .with_context(|| format!("failed to open file: {}", path.display()))?;
    csv_records(file, schema)
}

// ============================================================================
// JSON SOURCE
// ============================================================================

/// Read a JSON array of row arrays against a schema.
///
/// Cells carry their JSON types (numbers stay numeric), so coercion only
/// applies where a cell arrives as a string. A `null` or object cell fails
/// its row's validation; only a non-array top level or a non-array row is
/// a structural error.
pub fn json_records<R: Read>(input: R, schema: &Arc<Schema>) -> Result<RowReport> {
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(input))
        .context("failed to parse JSON row source")?;

    let rows = json
        .as_array()
        .ok_or_else(|| anyhow!("JSON row source must be an array of rows"))?;

    let mut report = RowReport::new();
    for (index, row_value) in rows.iter().enumerate() {
        let row = index + 1;
        let cells = row_value
            .as_array()
            .ok_or_else(|| anyhow!("row {} is not an array", row))?;

        let mut values = Vec::with_capacity(cells.len());
        let mut bad_cell = None;
        for (column, cell) in cells.iter().enumerate() {
            match FieldValue::from_json(cell) {
                Some(value) => values.push(value),
                None => {
                    // a null or object cell has no field-value counterpart;
                    // reject just this row, as a mismatch against the
                    // declared kind
                    bad_cell = Some(unusable_cell(schema, column));
                    break;
                }
            }
        }

        match bad_cell {
            Some(reason) => report.reject(row, reason),
            None => match schema.construct(values) {
                Ok(record) => report.accept(record),
                Err(reason) => report.reject(row, reason),
            },
        }
    }
    Ok(report)
}

/// The validation reason for a JSON cell no field value can represent.
fn unusable_cell(schema: &Arc<Schema>, column: usize) -> ValidationError {
    let field = schema
        .field_names()
        .get(column)
        .copied()
        .unwrap_or_default()
        .to_string();
    let expected = schema
        .validator(&field)
        .and_then(|validator| validator.expected_kind())
        .unwrap_or(ValueKind::Str);
    ValidationError::TypeMismatch {
        field,
        expected,
        found: ValueKind::Str,
    }
}

/// Read a JSON file of row arrays against a schema.
pub fn read_json_records(path: &Path, schema: &Arc<Schema>) -> Result<RowReport> {
    let file = File::open(path)
        .with_context(|| format!("failed to open file: {}", path.display()))?;
    json_records(file, schema)
}

// ============================================================================
// TESTS
// ============================================================================
