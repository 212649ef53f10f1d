//! Deal CSV ingest.
//!
//! Turns a spreadsheet export of candidate deals into `Deal`s for batch mode.
//!
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - no valuation logic here; range checks beyond parsing belong to the engine
//!
//! Expected columns (case-insensitive, any order):
//! `id, purchase_price, down_payment_pct, interest_rate_pct, loan_term_years, noi`.
//! `annual_interest_rate_pct` and `net_operating_income` are accepted aliases.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Deal, FinancingInputs};
use crate::error::AppError;

/// A row-level error encountered during ingest or evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

/// Ingest output: parsed deals (with their CSV line numbers) + row errors.
#[derive(Debug, Clone)]
pub struct IngestedDeals {
    pub deals: Vec<Deal>,
    pub lines: Vec<usize>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

const COL_ID: &str = "id";
const COL_PRICE: &str = "purchase_price";
const COL_DOWN: &str = "down_payment_pct";
const COL_RATE: &[&str] = &["interest_rate_pct", "annual_interest_rate_pct"];
const COL_TERM: &str = "loan_term_years";
const COL_NOI: &[&str] = &["noi", "net_operating_income"];

/// Load deals from a CSV file.
pub fn load_deals(path: &Path) -> Result<IngestedDeals, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let ingested = read_deals(file)?;
    tracing::info!(
        path = %path.display(),
        rows = ingested.rows_read,
        deals = ingested.deals.len(),
        errors = ingested.row_errors.len(),
        "deal CSV loaded"
    );
    Ok(ingested)
}

/// Parse deals from any CSV reader.
pub fn read_deals<R: Read>(reader: R) -> Result<IngestedDeals, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    let columns = resolve_columns(&header_map)?;

    let mut deals = Vec::new();
    let mut lines = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        if record.iter().all(str::is_empty) {
            continue;
        }

        match parse_row(&record, &columns) {
            Ok(deal) => {
                deals.push(deal);
                lines.push(line);
            }
            Err((id, message)) => row_errors.push(RowError { line, id, message }),
        }
    }

    if deals.is_empty() {
        return Err(AppError::new(3, "No valid deal rows found in CSV."));
    }

    Ok(IngestedDeals {
        deals,
        lines,
        row_errors,
        rows_read,
    })
}

/// Column indices for each required field.
struct Columns {
    id: usize,
    price: usize,
    down: usize,
    rate: usize,
    term: usize,
    noi: usize,
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel likes to prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_columns(header_map: &HashMap<String, usize>) -> Result<Columns, AppError> {
    let find = |names: &[&str]| -> Result<usize, AppError> {
        names
            .iter()
            .find_map(|n| header_map.get(*n).copied())
            .ok_or_else(|| AppError::new(2, format!("Missing required column: `{}`", names[0])))
    };

    Ok(Columns {
        id: find(&[COL_ID])?,
        price: find(&[COL_PRICE])?,
        down: find(&[COL_DOWN])?,
        rate: find(COL_RATE)?,
        term: find(&[COL_TERM])?,
        noi: find(COL_NOI)?,
    })
}

fn parse_row(record: &StringRecord, cols: &Columns) -> Result<Deal, (Option<String>, String)> {
    let id = record.get(cols.id).unwrap_or("").to_string();
    if id.is_empty() {
        return Err((None, "Missing `id` value.".to_string()));
    }
    let with_id = |msg: String| (Some(id.clone()), msg);

    let purchase_price = parse_number(record, cols.price, COL_PRICE).map_err(with_id)?;
    let down_payment_pct = parse_number(record, cols.down, COL_DOWN).map_err(with_id)?;
    let annual_interest_rate_pct = parse_number(record, cols.rate, COL_RATE[0]).map_err(with_id)?;
    let loan_term_years = record
        .get(cols.term)
        .unwrap_or("")
        .parse::<u32>()
        .map_err(|_| with_id(format!("Missing/invalid `{COL_TERM}` value.")))?;
    let net_operating_income = parse_number(record, cols.noi, COL_NOI[0]).map_err(with_id)?;

    Ok(Deal {
        id: id.clone(),
        inputs: FinancingInputs {
            purchase_price,
            down_payment_pct,
            annual_interest_rate_pct,
            loan_term_years,
            net_operating_income,
        },
    })
}

/// Parse a numeric cell, tolerating `$`, `%` and digit separators.
fn parse_number(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = record.get(idx).unwrap_or("");
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | '%' | ',' | '_' | ' '))
        .collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Missing/invalid `{name}` value.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_valid_rows_with_aliases_and_bom() {
        let csv = "\u{feff}ID,Purchase_Price,down_payment_pct,annual_interest_rate_pct,loan_term_years,net_operating_income\n\
                   inn,\"$1,000,000\",20,5.0,20,\"100,000\"\n\
                   motel,500000,30%,6.5,25,60000\n";
        let out = read_deals(csv.as_bytes()).unwrap();
        assert_eq!(out.rows_read, 2);
        assert_eq!(out.deals.len(), 2);
        assert_eq!(out.lines, vec![2, 3]);
        assert!(out.row_errors.is_empty());

        let inn = &out.deals[0];
        assert_eq!(inn.id, "inn");
        assert_eq!(inn.inputs.purchase_price, 1_000_000.0);
        assert_eq!(inn.inputs.net_operating_income, 100_000.0);
        assert_eq!(out.deals[1].inputs.down_payment_pct, 30.0);
        assert_eq!(out.deals[1].inputs.loan_term_years, 25);
    }

    #[test]
    fn bad_rows_are_reported_with_line_numbers() {
        let csv = "id,purchase_price,down_payment_pct,interest_rate_pct,loan_term_years,noi\n\
                   ok,900000,25,5,20,90000\n\
                   broken,abc,25,5,20,90000\n\
                   ,900000,25,5,20,90000\n\
                   fractional,900000,25,5,2.5,90000\n";
        let out = read_deals(csv.as_bytes()).unwrap();
        assert_eq!(out.deals.len(), 1);
        assert_eq!(out.row_errors.len(), 3);

        assert_eq!(out.row_errors[0].line, 3);
        assert_eq!(out.row_errors[0].id.as_deref(), Some("broken"));
        assert!(out.row_errors[0].message.contains("purchase_price"));
        assert_eq!(out.row_errors[1].id, None);
        assert!(out.row_errors[2].message.contains("loan_term_years"));
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let csv = "id,purchase_price,down_payment_pct,loan_term_years,noi\nx,1,2,3,4\n";
        let err = read_deals(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("interest_rate_pct"));
    }

    #[test]
    fn no_usable_rows_is_exit_code_3() {
        let csv = "id,purchase_price,down_payment_pct,interest_rate_pct,loan_term_years,noi\n";
        assert_eq!(read_deals(csv.as_bytes()).unwrap_err().exit_code(), 3);
    }
}
