//! Interactive deal-sheet picker for `hvcalc batch`.
//!
//! Only CSVs whose header carries the deal columns are offered, so exports
//! written by `--export` / `--export-schedule` don't clutter the list.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// How deep to recurse below the working directory.
const SEARCH_DEPTH: usize = 3;

/// Header columns a deal sheet must contain (lowercase).
const REQUIRED_COLUMNS: [&str; 3] = ["purchase_price", "down_payment_pct", "loan_term_years"];

/// Ask the user which deal sheet to evaluate.
///
/// Accepts a list number or a path; `q` cancels.
pub fn prompt_for_csv_path() -> Result<PathBuf, AppError> {
    let sheets = discover_deal_sheets(Path::new("."));
    if sheets.is_empty() {
        return Err(AppError::new(
            2,
            "No deal sheets found. Provide one with `hvcalc batch -f <deals.csv>`.",
        ));
    }

    println!("Deal sheets:");
    for (idx, path) in sheets.iter().enumerate() {
        println!("{:>3}) {}", idx + 1, display_path(path));
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Sheet number (1-{}), path, or q: ", sheets.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::new(2, format!("Failed to write prompt: {e}")))?;

        let Some(line) = lines.next() else {
            return Err(AppError::new(
                2,
                "No input received. Provide a deal sheet with `hvcalc batch -f <deals.csv>`.",
            ));
        };
        let line = line.map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;

        match resolve_choice(line.trim(), &sheets) {
            Choice::Quit => return Err(AppError::new(2, "Canceled.")),
            Choice::Path(path) => match validate_csv_path(&path) {
                Ok(path) => return Ok(path),
                Err(err) => println!("{err}"),
            },
            Choice::OutOfRange(n) => {
                println!("No sheet #{n}; pick 1-{}.", sheets.len());
            }
        }
    }
}

#[derive(Debug, PartialEq)]
enum Choice {
    Quit,
    Path(PathBuf),
    OutOfRange(usize),
}

fn resolve_choice(input: &str, sheets: &[PathBuf]) -> Choice {
    if input.eq_ignore_ascii_case("q") {
        return Choice::Quit;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=sheets.len()).contains(&n) => Choice::Path(sheets[n - 1].clone()),
        Ok(n) => Choice::OutOfRange(n),
        Err(_) => Choice::Path(PathBuf::from(input)),
    }
}

/// Validate that `path` is an existing `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.is_file() {
        return Err(AppError::new(
            2,
            format!("Deal sheet not found: {}", path.display()),
        ));
    }
    if !has_csv_extension(path) {
        return Err(AppError::new(
            2,
            format!("Expected a .csv deal sheet (got: {})", path.display()),
        ));
    }
    Ok(path.to_path_buf())
}

/// Deal sheets under `root`, sorted by display path.
pub fn discover_deal_sheets(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    walk(root, 0, &mut out);
    out.sort_by_key(|p| display_path(p));
    out
}

fn walk(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    if depth > SEARCH_DEPTH {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(kind) = entry.file_type() else {
            continue;
        };
        if kind.is_dir() {
            let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
            if !matches!(name, ".git" | "target" | "node_modules" | "reports") {
                walk(&path, depth + 1, out);
            }
        } else if kind.is_file() && has_csv_extension(&path) && looks_like_deal_sheet(&path) {
            out.push(path);
        }
    }
}

fn looks_like_deal_sheet(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut header = String::new();
    if BufReader::new(file).read_line(&mut header).is_err() {
        return false;
    }
    let columns: Vec<String> = header
        .trim_start_matches('\u{feff}')
        .split(',')
        .map(|c| c.trim().trim_matches('"').to_ascii_lowercase())
        .collect();
    REQUIRED_COLUMNS
        .iter()
        .all(|req| columns.iter().any(|c| c == req))
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn display_path(path: &Path) -> String {
    path.strip_prefix("./").unwrap_or(path).display().to_string()
}
