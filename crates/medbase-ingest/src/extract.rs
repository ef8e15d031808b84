//! Delimited-text extract loading with explicit encoding handling.
//!
//! Registry extracts in the wild are `;`-delimited Latin-1; pricing extracts
//! are `,`-delimited UTF-8. The caller states both, and decoding happens
//! before the CSV parser ever sees the bytes, so accented status text
//! survives intact.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Character encoding of a source extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceEncoding {
    #[default]
    Utf8,
    /// Single-byte Latin-script encoding (decoded as windows-1252, the
    /// superset commonly labelled "latin1" by producers of these files).
    Latin1,
}

impl SourceEncoding {
    fn decode(self, bytes: &[u8]) -> String {
        let encoding = match self {
            SourceEncoding::Utf8 => encoding_rs::UTF_8,
            SourceEncoding::Latin1 => encoding_rs::WINDOWS_1252,
        };
        let (text, _, _) = encoding.decode(bytes);
        text.into_owned()
    }
}

/// How to read one extract: field delimiter plus character encoding.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    pub delimiter: u8,
    pub encoding: SourceEncoding,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            encoding: SourceEncoding::Utf8,
        }
    }
}

/// A loaded extract: header columns plus string rows, all trimmed.
#[derive(Debug, Clone)]
pub struct Extract {
    pub path: PathBuf,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Extract {
    /// Resolves a required column name to its index.
    ///
    /// Fails with the full available-column list so a misnamed header can be
    /// diagnosed from the error alone.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| IngestError::MissingColumn {
                column: name.to_string(),
                path: self.path.clone(),
                available: self.columns.clone(),
            })
    }

    /// Field value at (row, column), empty string when the row is short.
    pub fn value<'a>(&self, row: &'a [String], index: usize) -> &'a str {
        row.get(index).map_or("", String::as_str)
    }
}

/// Reads a delimited extract into memory, decoding with the stated encoding.
///
/// A file with a header row but no data rows is an `EmptySource` error; the
/// pipeline cannot treat "nothing to do" as success without masking a broken
/// upstream fetch.
pub fn read_extract(path: &Path, options: &ExtractOptions) -> Result<Extract> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let text = options.encoding.decode(&bytes);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        rows.push(record.iter().map(|v| v.trim().to_string()).collect());
    }

    if rows.is_empty() {
        return Err(IngestError::EmptySource {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(
        path = %path.display(),
        columns = columns.len(),
        rows = rows.len(),
        "extract loaded"
    );

    Ok(Extract {
        path: path.to_path_buf(),
        columns,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn reads_utf8_comma_delimited() {
        let file = create_temp_file(b"A,B\n1,2\n3,4\n");
        let extract = read_extract(file.path(), &ExtractOptions::default()).unwrap();
        assert_eq!(extract.columns, vec!["A", "B"]);
        assert_eq!(extract.rows.len(), 2);
        assert_eq!(extract.rows[0], vec!["1", "2"]);
    }

    #[test]
    fn decodes_latin1_accents() {
        // "VÁLIDO" with 0xC1 for Á, as a latin1 producer writes it.
        let file = create_temp_file(b"STATUS\nV\xC1LIDO\n");
        let options = ExtractOptions {
            delimiter: b';',
            encoding: SourceEncoding::Latin1,
        };
        let extract = read_extract(file.path(), &options).unwrap();
        assert_eq!(extract.rows[0][0], "V\u{c1}LIDO");
    }

    #[test]
    fn empty_source_is_an_error() {
        let file = create_temp_file(b"A,B\n");
        let result = read_extract(file.path(), &ExtractOptions::default());
        assert!(matches!(result, Err(IngestError::EmptySource { .. })));
    }

    #[test]
    fn missing_file_is_distinguished() {
        let result = read_extract(
            Path::new("/nonexistent/extract.csv"),
            &ExtractOptions::default(),
        );
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn require_column_reports_available() {
        let file = create_temp_file(b"A,B\n1,2\n");
        let extract = read_extract(file.path(), &ExtractOptions::default()).unwrap();
        let err = extract.require_column("C").unwrap_err();
        match err {
            IngestError::MissingColumn {
                column, available, ..
            } => {
                assert_eq!(column, "C");
                assert_eq!(available, vec!["A", "B"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn strips_utf8_bom() {
        let file = create_temp_file(b"\xEF\xBB\xBFA,B\n1,2\n");
        let extract = read_extract(file.path(), &ExtractOptions::default()).unwrap();
        assert_eq!(extract.columns, vec!["A", "B"]);
    }

    #[test]
    fn short_rows_yield_empty_fields() {
        let file = create_temp_file(b"A,B,C\n1,2\n");
        let extract = read_extract(file.path(), &ExtractOptions::default()).unwrap();
        let idx = extract.require_column("C").unwrap();
        assert_eq!(extract.value(&extract.rows[0], idx), "");
    }
}
