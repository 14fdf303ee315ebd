// Rowguard CLI - read a portfolio CSV, validate it, print a table

use anyhow::{bail, Result};
use std::env;
use std::io;
use std::path::Path;
use std::sync::Arc;

use rowguard::{
    create_formatter, non_empty_string, positive_float, positive_integer, print_table,
    read_csv_records, FormatKind, FormatterOptions, Schema,
};

/// The demo schema: a stock position per row.
fn portfolio_schema() -> Result<Arc<Schema>> {
    let schema = Schema::builder()
        .field("name", non_empty_string())
        .field("shares", positive_integer())
        .field("price", positive_float())
        .build()?;
    Ok(schema)
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("usage: rowguard <portfolio.csv> [text|csv|html]");
        std::process::exit(2);
    }

    let format_name = args.get(2).map(String::as_str).unwrap_or("text");
    let kind = match FormatKind::parse(format_name) {
        Some(kind) => kind,
        None => bail!("unknown format '{}' (expected text, csv or html)", format_name),
    };

    let schema = portfolio_schema()?;
    let report = read_csv_records(Path::new(&args[1]), &schema)?;

    if !report.is_clean() {
        eprintln!("⚠️  {}", report.summary());
        for skip in &report.skipped {
            eprintln!("   row {}: {}", skip.row, skip.reason);
        }
    }

    let mut formatter = create_formatter(kind, io::stdout(), FormatterOptions::default());
    print_table(&report.records, &["name", "shares", "price"], &mut formatter)?;

    Ok(())
}
