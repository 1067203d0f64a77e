//! Column-oriented table loaded from a CSV file with a header row.

use crate::error::{ReportError, Result};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// In-memory CSV table. Cells are kept as text and converted per column on
/// request, so unplotted columns may hold anything.
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Vec<String>,
    columns: Vec<Vec<String>>,
    rows: usize,
}

impl Dataset {
    /// Load a dataset from a CSV file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ReportError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Load a dataset from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut columns = vec![Vec::new(); headers.len()];
        let mut rows = 0;

        for record in reader.records() {
            let record = record?;
            for (column, cell) in columns.iter_mut().zip(record.iter()) {
                column.push(cell.to_string());
            }
            rows += 1;
        }

        Ok(Self {
            headers,
            columns,
            rows,
        })
    }

    /// Number of data rows (the header is not counted)
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Column names in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Raw cell text of a column, in row order
    pub fn column(&self, name: &str) -> Result<&[String]> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|idx| self.columns[idx].as_slice())
            .ok_or_else(|| ReportError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// A column parsed as numbers, in row order. Empty cells and the usual
    /// missing-value markers (`NA`, `null`, `N/A`, ...) become NaN.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        self.column(name)?
            .iter()
            .enumerate()
            .map(|(idx, cell)| parse_cell(name, idx + 1, cell))
            .collect()
    }
}

/// Cell texts read as a missing value, as dataframe readers do by default
const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn parse_cell(column: &str, row: usize, cell: &str) -> Result<f64> {
    if MISSING_MARKERS.contains(&cell) {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>().map_err(|_| ReportError::Parse {
        column: column.to_string(),
        row,
        value: cell.to_string(),
    })
}
