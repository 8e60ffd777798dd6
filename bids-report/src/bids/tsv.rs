//! Tab-separated table reader
//!
//! BIDS tabular files (participants.tsv, *_scans.tsv, *_channels.tsv) are
//! plain TSV with a header row. Cells are kept as strings; interpretation,
//! including the "n/a" sentinel, is left to the caller.

use crate::types::{ReportError, Result};
use std::path::{Path, PathBuf};

/// An in-memory TSV table
#[derive(Debug, Clone)]
pub struct TsvTable {
    /// Source file, used in error messages
    path: PathBuf,
    /// Header names in file order
    columns: Vec<String>,
    /// Data rows, each exactly `columns.len()` cells
    rows: Vec<Vec<String>>,
}

impl TsvTable {
    /// Read and parse a TSV file
    pub fn read(path: &Path) -> Result<Self> {
        log::debug!("Reading TSV file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    /// Parse TSV content; `path` is only used for error reporting
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut lines = content
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let Some((_, header)) = lines.next() else {
            return Err(ReportError::MalformedTsv {
                path: path.to_path_buf(),
                line: 1,
                reason: "missing header row".to_string(),
            });
        };
        let columns: Vec<String> = header.split('\t').map(|c| c.trim().to_string()).collect();

        let mut rows = Vec::new();
        for (index, line) in lines {
            let cells: Vec<String> = line.split('\t').map(|c| c.trim().to_string()).collect();
            if cells.len() != columns.len() {
                return Err(ReportError::MalformedTsv {
                    path: path.to_path_buf(),
                    line: index + 1,
                    reason: format!("expected {} cells, found {}", columns.len(), cells.len()),
                });
            }
            rows.push(cells);
        }

        Ok(Self {
            path: path.to_path_buf(),
            columns,
            rows,
        })
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// All cells of a column, or `None` if the column does not exist
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    /// Like [`TsvTable::column`], but a missing column is an error
    pub fn require_column(&self, name: &str) -> Result<Vec<&str>> {
        self.column(name).ok_or_else(|| ReportError::MissingColumn {
            path: self.path.clone(),
            column: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<TsvTable> {
        TsvTable::parse(Path::new("test.tsv"), content)
    }

    #[test]
    fn test_parse_table() {
        let table = parse("participant_id\tage\tsex\nsub-01\t24\tM\nsub-02\tn/a\tF\n").unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.has_column("age"));
        assert_eq!(table.column("sex"), Some(vec!["M", "F"]));
        assert_eq!(table.column("hand"), None);
    }

    #[test]
    fn test_header_only_and_missing_trailing_newline() {
        let table = parse("participant_id\nsub-001").unwrap();
        assert_eq!(table.require_column("participant_id").unwrap(), vec!["sub-001"]);

        let empty = parse("name\ttype\tstatus\n").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_crlf_and_bom() {
        let table = parse("\u{feff}name\tstatus\r\nMEG0111\tgood\r\nMEG0112\tbad\r\n").unwrap();
        assert_eq!(table.column("status"), Some(vec!["good", "bad"]));
    }

    #[test]
    fn test_malformed_rows() {
        let err = parse("name\tstatus\nMEG0111\n").unwrap_err();
        assert!(matches!(err, ReportError::MalformedTsv { line: 2, .. }));

        let err = parse("").unwrap_err();
        assert!(matches!(err, ReportError::MalformedTsv { line: 1, .. }));
    }

    #[test]
    fn test_require_missing_column() {
        let table = parse("participant_id\nsub-01\n").unwrap();
        let err = table.require_column("age").unwrap_err();
        assert!(matches!(err, ReportError::MissingColumn { ref column, .. } if column == "age"));
    }
}
