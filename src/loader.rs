//! Delimited-text loading with encoding fallback and delimiter sniffing.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1251;
use tracing::{debug, info, warn};

use crate::error::PipelineError;

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Header row plus loosely-typed cells; empty cells are `None`.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }

    /// Build a table from in-memory rows; short rows are padded with `None`.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, None);
                r
            })
            .collect();
        Self { headers, rows }
    }
}

/// Which decoder produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Windows1251,
}

/// Read a delimited file, trying UTF-8 first and Windows-1251 second.
pub fn load_table(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        return Err(PipelineError::InputMissing(path.to_path_buf()).into());
    }
    let bytes =
        fs::read(path).with_context(|| format!("failed to read table at {}", path.display()))?;
    let (text, encoding) = decode(bytes);
    if encoding == SourceEncoding::Windows1251 {
        warn!(path = %path.display(), "input is not valid UTF-8; decoded as windows-1251");
    }

    let table = parse_table(&text)
        .with_context(|| format!("failed to parse delimited text in {}", path.display()))?;
    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.headers.len(),
        ?encoding,
        "loaded input table"
    );
    Ok(table)
}

/// Decode raw bytes, falling back to Windows-1251 when they are not UTF-8.
pub fn decode(bytes: Vec<u8>) -> (String, SourceEncoding) {
    match String::from_utf8(bytes) {
        Ok(text) => {
            let text = match text.strip_prefix('\u{feff}') {
                Some(stripped) => stripped.to_string(),
                None => text,
            };
            (text, SourceEncoding::Utf8)
        }
        Err(err) => {
            let bytes = err.into_bytes();
            let (text, _) = WINDOWS_1251.decode_without_bom_handling(&bytes);
            (text.into_owned(), SourceEncoding::Windows1251)
        }
    }
}

/// Parse already-decoded text, sniffing the delimiter from the header line.
pub fn parse_table(text: &str) -> Result<RawTable> {
    let header_line = text.lines().next().unwrap_or_default();
    if header_line.trim().is_empty() {
        return Err(PipelineError::EmptyDataset("input has no header row".to_string()).into());
    }
    let delimiter = sniff_delimiter(header_line);
    debug!(delimiter = %(delimiter as char).escape_default(), "sniffed delimiter");

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("failed to read header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("malformed record at data row {}", idx + 1))?;
        let row = record
            .iter()
            .map(|cell| {
                let cell = cell.trim();
                (!cell.is_empty()).then(|| cell.to_string())
            })
            .collect();
        rows.push(row);
    }

    Ok(RawTable::from_rows(headers, rows))
}

/// Pick the candidate delimiter occurring most often outside quotes.
/// Falls back to `,` when none occur.
pub fn sniff_delimiter(header_line: &str) -> u8 {
    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut in_quotes = false;
    for byte in header_line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(pos) = CANDIDATE_DELIMITERS.iter().position(|d| *d == byte) {
            counts[pos] += 1;
        }
    }

    let mut best = 0;
    for (pos, count) in counts.iter().enumerate() {
        if *count > counts[best] {
            best = pos;
        }
    }
    CANDIDATE_DELIMITERS[best]
}
