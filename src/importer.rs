use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{Result, SankeyError};
use crate::models::Transaction;
use crate::tree::{segments, SEPARATOR};

// ---------------------------------------------------------------------------
// Number formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NumberFormat {
    /// `1.234,56`
    #[default]
    German,
    /// `1,234.56`
    Plain,
}

impl NumberFormat {
    pub fn key(&self) -> &'static str {
        match self {
            Self::German => "german",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for NumberFormat {
    type Err = SankeyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "german" | "de" => Ok(Self::German),
            "plain" | "en" => Ok(Self::Plain),
            other => Err(SankeyError::UnknownNumberFormat(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parses a localized amount. Parenthesized values are negative.
pub fn parse_amount(raw: &str, format: NumberFormat) -> Option<f64> {
    let s: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '"' | '€' | '$'))
        .collect();
    let (negated, s) = match s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        Some(inner) => (true, inner.to_string()),
        None => (false, s),
    };
    let normalized = match format {
        NumberFormat::German => s.replace('.', "").replace(',', "."),
        NumberFormat::Plain => s.replace(',', ""),
    };
    let value: f64 = normalized.parse().ok().filter(|v: &f64| v.is_finite())?;
    Some(if negated { -value } else { value })
}

/// Trims every segment and drops empty ones: ` Food / /Groceries` → `Food/Groceries`.
pub fn normalize_path(raw: &str) -> String {
    segments(raw).join(&SEPARATOR.to_string())
}

fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
}

// ---------------------------------------------------------------------------
// import_files
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub category_column: String,
    pub amount_column: String,
    pub number_format: NumberFormat,
    /// Read byte-identical files only once instead of adding them up again.
    pub skip_duplicate_files: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            category_column: "Kategorie-Pfad".to_string(),
            amount_column: "Betrag".to_string(),
            number_format: NumberFormat::German,
            skip_duplicate_files: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileSummary {
    pub path: PathBuf,
    pub imported: usize,
    pub skipped: usize,
    pub duplicate_file: bool,
}

#[derive(Debug, Default)]
pub struct ImportResult {
    pub transactions: Vec<Transaction>,
    pub files: Vec<FileSummary>,
}

/// Reads every file in order. With `skip_duplicate_files`, a file whose
/// contents match an earlier one is reported but contributes no rows.
pub fn import_files<P: AsRef<Path>>(files: &[P], options: &ImportOptions) -> Result<ImportResult> {
    let mut result = ImportResult::default();
    let mut seen = HashSet::new();

    for file in files {
        let path = file.as_ref();
        if !path.exists() {
            return Err(SankeyError::FileNotFound(path.to_path_buf()));
        }
        if options.skip_duplicate_files && !seen.insert(compute_checksum(path)?) {
            warn!(file = %path.display(), "identical file already read, skipping");
            result.files.push(FileSummary {
                path: path.to_path_buf(),
                imported: 0,
                skipped: 0,
                duplicate_file: true,
            });
            continue;
        }

        let (rows, skipped) = parse_file(path, options)?;
        info!(file = %path.display(), imported = rows.len(), skipped, "read ledger export");
        result.files.push(FileSummary {
            path: path.to_path_buf(),
            imported: rows.len(),
            skipped,
            duplicate_file: false,
        });
        result.transactions.extend(rows);
    }
    Ok(result)
}

/// Parses one semicolon-separated export. Rows without a category path or
/// amount are skipped; amounts that do not parse are an error.
pub fn parse_file(path: &Path, options: &ImportOptions) -> Result<(Vec<Transaction>, usize)> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .quote(b'"')
        .has_headers(true)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let headers = rdr.headers()?.clone();
    let missing = |column: &str| SankeyError::MissingColumn {
        file: path.to_path_buf(),
        column: column.to_string(),
    };
    let idx_path = column_index(&headers, &options.category_column)
        .ok_or_else(|| missing(&options.category_column))?;
    let idx_amount = column_index(&headers, &options.amount_column)
        .ok_or_else(|| missing(&options.amount_column))?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for result in rdr.records() {
        let record = result?;
        let category_path = normalize_path(record.get(idx_path).unwrap_or(""));
        let raw_amount = record.get(idx_amount).unwrap_or("").trim();
        if category_path.is_empty() || raw_amount.is_empty() {
            skipped += 1;
            continue;
        }
        let amount = parse_amount(raw_amount, options.number_format).ok_or_else(|| {
            SankeyError::InvalidAmount {
                file: path.to_path_buf(),
                line: record.position().map_or(0, |p| p.line()),
                value: raw_amount.to_string(),
            }
        })?;
        rows.push(Transaction::new(category_path, amount));
    }
    debug!(file = %path.display(), rows = rows.len(), skipped, "parsed rows");
    Ok((rows, skipped))
}
