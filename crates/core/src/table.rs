use std::fmt;

use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    Reference,
    Products,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Products => write!(f, "products"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("could not parse {kind} file as CSV: {source}")]
    Malformed { kind: TableKind, source: csv::Error },
    #[error("could not serialize output CSV: {0}")]
    Serialize(String),
}

/// An in-memory CSV table: one header row plus a rectangular grid of string
/// cells. Column order is preserved end to end and an empty cell stands for
/// a missing value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Frame {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Reads a Latin-1 encoded CSV export. Every byte maps to the Unicode
    /// code point of the same value, so decoding is total; structural CSV
    /// problems (ragged rows, unterminated quotes) are fatal.
    pub fn from_latin1_csv(bytes: &[u8], kind: TableKind) -> Result<Self, TableError> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(bytes);

        let columns = reader
            .byte_headers()
            .map_err(|source| TableError::Malformed { kind, source })?
            .iter()
            .map(decode_latin1)
            .collect();

        let mut rows = Vec::new();
        let mut record = ByteRecord::new();
        loop {
            match reader.read_byte_record(&mut record) {
                Ok(true) => rows.push(record.iter().map(decode_latin1).collect()),
                Ok(false) => break,
                Err(source) => return Err(TableError::Malformed { kind, source }),
            }
        }

        Ok(Self { columns, rows })
    }

    pub fn to_csv(&self) -> Result<Vec<u8>, TableError> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        writer
            .write_record(&self.columns)
            .map_err(|error| TableError::Serialize(error.to_string()))?;
        for row in &self.rows {
            writer.write_record(row).map_err(|error| TableError::Serialize(error.to_string()))?;
        }
        writer.into_inner().map_err(|error| TableError::Serialize(error.to_string()))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Index of `name`, appending the column (filled with `fill`) when the
    /// export lacks it.
    pub fn ensure_column(&mut self, name: &str, fill: &str) -> usize {
        if let Some(index) = self.column_index(name) {
            return index;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(fill.to_string());
        }
        self.columns.len() - 1
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: String) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|cells| cells.get_mut(column)) {
            *cell = value;
        }
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut String> {
        self.rows.iter_mut().flat_map(|row| row.iter_mut())
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}

#[cfg(test)]
mod tests {
    use super::{Frame, TableError, TableKind};

    #[test]
    fn decodes_latin1_high_bytes() {
        let csv = b"Name\nCart\xE9\n";
        let frame = Frame::from_latin1_csv(csv, TableKind::Products).expect("valid csv");
        assert_eq!(frame.cell(0, 0), "Cart\u{e9}");
    }

    #[test]
    fn preserves_column_order_through_round_trip() {
        let csv = b"B,A,C\n1,2,3\n";
        let frame = Frame::from_latin1_csv(csv, TableKind::Products).expect("valid csv");
        assert_eq!(frame.columns(), ["B", "A", "C"]);

        let out = frame.to_csv().expect("serializable");
        assert_eq!(String::from_utf8(out).expect("utf8"), "B,A,C\n1,2,3\n");
    }

    #[test]
    fn ragged_row_is_a_structural_failure() {
        let csv = b"A,B\n1\n";
        let error = Frame::from_latin1_csv(csv, TableKind::Reference).expect_err("ragged row");
        assert!(matches!(error, TableError::Malformed { kind: TableKind::Reference, .. }));
    }

    #[test]
    fn ensure_column_appends_and_backfills() {
        let mut frame =
            Frame::new(vec!["A".to_string()], vec![vec!["1".to_string()], vec!["2".to_string()]]);

        let index = frame.ensure_column("Variant Price", "0");
        assert_eq!(index, 1);
        assert_eq!(frame.cell(0, 1), "0");
        assert_eq!(frame.cell(1, 1), "0");

        // already present: no duplicate column
        assert_eq!(frame.ensure_column("A", ""), 0);
        assert_eq!(frame.columns().len(), 2);
    }

    #[test]
    fn out_of_range_cell_reads_as_empty() {
        let frame = Frame::new(vec!["A".to_string()], vec![vec!["1".to_string()]]);
        assert_eq!(frame.cell(5, 0), "");
        assert_eq!(frame.cell(0, 5), "");
    }
}
