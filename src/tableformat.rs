// 🖨️ Table Formatters - Render validated records as tables
// Base formats (text, csv, html) write into any io::Write; presentation
// options resolve into a wrapper chain around the base formatter at
// construction time. The presentation layer only reads values through
// Record::get, so it never re-validates anything.

use crate::record::Record;
use anyhow::{Context, Result};
use std::io::{self, Write};

// ============================================================================
// FORMATTER TRAIT
// ============================================================================

pub trait TableFormatter {
    /// Emit the heading row.
    fn headings(&mut self, headers: &[String]) -> io::Result<()>;

    /// Emit one data row.
    fn row(&mut self, cells: &[String]) -> io::Result<()>;
}

impl<F: TableFormatter + ?Sized> TableFormatter for Box<F> {
    fn headings(&mut self, headers: &[String]) -> io::Result<()> {
        (**self).headings(headers)
    }

    fn row(&mut self, cells: &[String]) -> io::Result<()> {
        (**self).row(cells)
    }
}

// ============================================================================
// BASE FORMATS
// ============================================================================

/// Plain text: right-aligned 10-wide columns under a dashed rule.
pub struct TextTableFormatter<W: Write> {
    out: W,
}

impl<W: Write> TextTableFormatter<W> {
    pub fn new(out: W) -> Self {
        TextTableFormatter { out }
    }
}

impl<W: Write> TableFormatter for TextTableFormatter<W> {
    fn headings(&mut self, headers: &[String]) -> io::Result<()> {
        let line: Vec<String> = headers.iter().map(|h| format!("{:>10}", h)).collect();
        writeln!(self.out, "{}", line.join(" "))?;
        let rule: Vec<String> = headers.iter().map(|_| "-".repeat(10)).collect();
        writeln!(self.out, "{}", rule.join(" "))
    }

    fn row(&mut self, cells: &[String]) -> io::Result<()> {
        let line: Vec<String> = cells.iter().map(|c| format!("{:>10}", c)).collect();
        writeln!(self.out, "{}", line.join(" "))
    }
}

/// Comma-separated output, headings included.
pub struct CsvTableFormatter<W: Write> {
    out: W,
}

impl<W: Write> CsvTableFormatter<W> {
    pub fn new(out: W) -> Self {
        CsvTableFormatter { out }
    }
}

impl<W: Write> TableFormatter for CsvTableFormatter<W> {
    fn headings(&mut self, headers: &[String]) -> io::Result<()> {
        writeln!(self.out, "{}", headers.join(","))
    }

    fn row(&mut self, cells: &[String]) -> io::Result<()> {
        writeln!(self.out, "{}", cells.join(","))
    }
}

/// HTML table rows: `<tr> <th>..</th> </tr>` headings, `<td>` cells.
pub struct HtmlTableFormatter<W: Write> {
    out: W,
}

impl<W: Write> HtmlTableFormatter<W> {
    pub fn new(out: W) -> Self {
        HtmlTableFormatter { out }
    }

    fn tagged_line(&mut self, tag: &str, cells: &[String]) -> io::Result<()> {
        let mut parts = Vec::with_capacity(cells.len() + 2);
        parts.push("<tr>".to_string());
        for cell in cells {
            parts.push(format!("<{}>{}</{}>", tag, cell, tag));
        }
        parts.push("</tr>".to_string());
        writeln!(self.out, "{}", parts.join(" "))
    }
}

impl<W: Write> TableFormatter for HtmlTableFormatter<W> {
    fn headings(&mut self, headers: &[String]) -> io::Result<()> {
        self.tagged_line("th", headers)
    }

    fn row(&mut self, cells: &[String]) -> io::Result<()> {
        self.tagged_line("td", cells)
    }
}

// ============================================================================
// WRAPPERS
// ============================================================================

/// Upper-cases headings before delegating; rows pass through.
pub struct UpperHeadings<F: TableFormatter> {
    inner: F,
}

impl<F: TableFormatter> UpperHeadings<F> {
    pub fn new(inner: F) -> Self {
        UpperHeadings { inner }
    }
}

impl<F: TableFormatter> TableFormatter for UpperHeadings<F> {
    fn headings(&mut self, headers: &[String]) -> io::Result<()> {
        let upper: Vec<String> = headers.iter().map(|h| h.to_uppercase()).collect();
        self.inner.headings(&upper)
    }

    fn row(&mut self, cells: &[String]) -> io::Result<()> {
        self.inner.row(cells)
    }
}

/// Per-column cell transform applied to data rows.
pub type CellTransform = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Leave a cell as-is.
pub fn as_is() -> CellTransform {
    Box::new(|cell| cell.to_string())
}

/// Render a numeric cell with a fixed number of decimal places;
/// non-numeric cells pass through unchanged.
pub fn fixed_decimal(places: usize) -> CellTransform {
    Box::new(move |cell| match cell.trim().parse::<f64>() {
        Ok(n) => format!("{:.*}", places, n),
        Err(_) => cell.to_string(),
    })
}

/// Applies one transform per column to every data row. Columns beyond the
/// transform list pass through; headings are untouched.
pub struct ColumnFormats<F: TableFormatter> {
    inner: F,
    transforms: Vec<CellTransform>,
}

impl<F: TableFormatter> ColumnFormats<F> {
    pub fn new(inner: F, transforms: Vec<CellTransform>) -> Self {
        ColumnFormats { inner, transforms }
    }
}

impl<F: TableFormatter> TableFormatter for ColumnFormats<F> {
    fn headings(&mut self, headers: &[String]) -> io::Result<()> {
        self.inner.headings(headers)
    }

    fn row(&mut self, cells: &[String]) -> io::Result<()> {
        let formatted: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(column, cell)| match self.transforms.get(column) {
                Some(transform) => transform(cell),
                None => cell.clone(),
            })
            .collect();
        self.inner.row(&formatted)
    }
}

// ============================================================================
// FACTORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Text,
    Csv,
    Html,
}

impl FormatKind {
    /// Parse a format name as given on a command line.
    pub fn parse(name: &str) -> Option<FormatKind> {
        match name.to_lowercase().as_str() {
            "text" => Some(FormatKind::Text),
            "csv" => Some(FormatKind::Csv),
            "html" => Some(FormatKind::Html),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FormatKind::Text => "text",
            FormatKind::Csv => "csv",
            FormatKind::Html => "html",
        }
    }
}

/// Presentation options resolved into the wrapper chain by the factory.
#[derive(Default)]
pub struct FormatterOptions {
    pub upper_headings: bool,
    pub column_formats: Vec<CellTransform>,
}

impl FormatterOptions {
    pub fn with_upper_headings(mut self) -> Self {
        self.upper_headings = true;
        self
    }

    pub fn with_column_formats(mut self, transforms: Vec<CellTransform>) -> Self {
        self.column_formats = transforms;
        self
    }
}

/// Build a formatter for a kind, wrapping the base format with the
/// requested presentation wrappers. Column formats sit closest to the
/// base, so upper-cased headings never reach a cell transform.
pub fn create_formatter<'a, W: Write + 'a>(
    kind: FormatKind,
    out: W,
    options: FormatterOptions,
) -> Box<dyn TableFormatter + 'a> {
    let mut formatter: Box<dyn TableFormatter + 'a> = match kind {
        FormatKind::Text => Box::new(TextTableFormatter::new(out)),
        FormatKind::Csv => Box::new(CsvTableFormatter::new(out)),
        FormatKind::Html => Box::new(HtmlTableFormatter::new(out)),
    };
    if !options.column_formats.is_empty() {
        formatter = Box::new(ColumnFormats::new(formatter, options.column_formats));
    }
    if options.upper_headings {
        formatter = Box::new(UpperHeadings::new(formatter));
    }
    formatter
}

// ============================================================================
// TABLE PRINTING
// ============================================================================

/// Render the named fields of each record through a formatter.
///
/// Values come straight out of `Record::get`: anything a record returns
/// has already passed validation, so this layer only formats.
pub fn print_table<F: TableFormatter + ?Sized>(
    records: &[Record],
    fields: &[&str],
    formatter: &mut F,
) -> Result<()> {
    let headers: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
    formatter
        .headings(&headers)
        .context("failed to write headings")?;

    for record in records {
        let mut cells = Vec::with_capacity(fields.len());
        for field in fields {
            cells.push(record.get(field)?.to_string());
        }
        formatter.row(&cells).context("failed to write table row")?;
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
