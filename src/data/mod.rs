//! `DataFrame` module for named column containers.
//!
//! Provides a minimal `DataFrame` for ML workflows: CSV ingestion,
//! column selection, and conversion to the `Matrix`/label inputs the
//! estimators consume. Heavy data wrangling belongs upstream.

use crate::error::{AprendizError, Result};
use crate::primitives::{Matrix, Vector};
use std::path::Path;

/// A minimal `DataFrame` with named `f32` columns of equal length.
///
/// # Examples
///
/// ```
/// use aprendiz::data::DataFrame;
/// use aprendiz::primitives::Vector;
///
/// let columns = vec![
///     ("height".to_string(), Vector::from_slice(&[1.6, 1.8, 1.7])),
///     ("weight".to_string(), Vector::from_slice(&[60.0, 80.0, 70.0])),
/// ];
/// let df = DataFrame::new(columns).expect("columns are valid");
/// assert_eq!(df.shape(), (3, 2));
/// ```
#[derive(Debug, Clone)]
pub struct DataFrame {
    columns: Vec<(String, Vector<f32>)>,
    n_rows: usize,
}

impl DataFrame {
    /// Creates a new `DataFrame` from named columns.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no columns, column lengths differ,
    /// a name is empty, or names are duplicated.
    pub fn new(columns: Vec<(String, Vector<f32>)>) -> Result<Self> {
        if columns.is_empty() {
            return Err(AprendizError::empty_input("DataFrame columns"));
        }

        let n_rows = columns[0].1.len();
        for (name, col) in &columns {
            if col.len() != n_rows {
                return Err(AprendizError::dimension_mismatch(
                    "column length",
                    n_rows,
                    col.len(),
                ));
            }
            if name.is_empty() {
                return Err("Column names cannot be empty".into());
            }
        }

        let mut names: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
        names.sort_unstable();
        for pair in names.windows(2) {
            if pair[0] == pair[1] {
                return Err(format!("Duplicate column name: {}", pair[0]).into());
            }
        }

        Ok(Self { columns, n_rows })
    }

    /// Reads a `DataFrame` from a CSV file.
    ///
    /// The first record is the header and names the columns; every
    /// body cell must parse as a float.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure, a malformed CSV, or a cell
    /// that is not a number (with row/column context).
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path.as_ref())?;

        let names: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if names.is_empty() {
            return Err(AprendizError::empty_input("CSV header"));
        }

        let mut columns: Vec<Vec<f32>> = vec![Vec::new(); names.len()];
        for (row_idx, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() != names.len() {
                return Err(AprendizError::dimension_mismatch(
                    "fields",
                    names.len(),
                    record.len(),
                ));
            }
            for (col_idx, cell) in record.iter().enumerate() {
                let value: f32 =
                    cell.trim()
                        .parse()
                        .map_err(|_| AprendizError::CsvParse {
                            row: row_idx + 1,
                            column: names[col_idx].clone(),
                            value: cell.to_string(),
                        })?;
                columns[col_idx].push(value);
            }
        }

        Self::new(
            names
                .into_iter()
                .zip(columns)
                .map(|(name, data)| (name, Vector::from_vec(data)))
                .collect(),
        )
    }

    /// Returns the shape as (`n_rows`, `n_cols`).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Returns the column names in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Returns a reference to a column by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the column doesn't exist.
    pub fn column(&self, name: &str) -> Result<&Vector<f32>> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| format!("Column not found: {name}").into())
    }

    /// Selects columns by name, returning a new `DataFrame` in the
    /// requested order.
    ///
    /// # Errors
    ///
    /// Returns an error if any column doesn't exist or the selection
    /// is empty.
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        if names.is_empty() {
            return Err(AprendizError::empty_input("column selection"));
        }

        let mut selected = Vec::with_capacity(names.len());
        for &name in names {
            let col = self.column(name)?;
            selected.push((name.to_string(), col.clone()));
        }
        Self::new(selected)
    }

    /// Converts the frame to a row-major feature matrix, columns in
    /// frame order.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix<f32> {
        let mut data = Vec::with_capacity(self.n_rows * self.columns.len());
        for row in 0..self.n_rows {
            for (_, col) in &self.columns {
                data.push(col[row]);
            }
        }
        Matrix::from_vec(self.n_rows, self.columns.len(), data)
            .expect("frame dimensions always match data length")
    }

    /// Extracts a column as integer class labels.
    ///
    /// Labels are stored as reals in the frame; the integer value is
    /// obtained by truncating cast at this boundary. Negative values
    /// are rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the column doesn't exist or contains a
    /// negative value.
    pub fn labels(&self, name: &str) -> Result<Vec<usize>> {
        let col = self.column(name)?;
        let mut labels = Vec::with_capacity(col.len());
        for &value in col.iter() {
            if value < 0.0 {
                return Err(format!(
                    "Column {name} contains negative value {value}; class labels must be non-negative"
                )
                .into());
            }
            labels.push(value as usize);
        }
        Ok(labels)
    }
}
