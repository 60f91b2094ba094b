//! In-memory tabular dataset and the CSV loader that produces it.
//!
//! A [`Dataset`] is an ordered list of row records. Every record carries one
//! raw cell per declared column; `None` marks an absent cell and an empty CSV
//! field stays `Some("")`. Cells are kept as the original text so that
//! missing-rate computations see the data before any numeric coercion.

use crate::error::{Result, ResultExt, StatsError};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One row of raw cells, aligned with [`Dataset::columns`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    cells: Vec<Option<String>>,
}

impl Record {
    /// Raw cell at `index`, `None` when null or absent.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|cell| cell.as_deref())
    }

    /// Number of cells in the record.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Ordered row records with a declared column list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Record>,
}

impl Dataset {
    /// Create an empty dataset with the given columns.
    ///
    /// Repeated column names keep their first position.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dataset = Self::default();
        for name in columns {
            dataset.declare_column(name.into());
        }
        dataset
    }

    /// Append a row given positionally.
    ///
    /// Short rows are padded with absent cells, extra cells are dropped.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let mut cells: Vec<Option<String>> = cells
            .into_iter()
            .take(self.columns.len())
            .map(|cell| cell.map(Into::into))
            .collect();
        cells.resize(self.columns.len(), None);
        self.rows.push(Record { cells });
    }

    /// Build a dataset from key/value records.
    ///
    /// The column set is the union of keys in first-seen order. Keys missing
    /// from a record read as absent cells.
    pub fn from_records<R, F, K, V>(records: R) -> Self
    where
        R: IntoIterator<Item = F>,
        F: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut dataset = Self::default();
        let mut keyed_rows = Vec::new();

        for record in records {
            let mut row = Vec::new();
            for (key, value) in record {
                let key = key.into();
                let index = dataset.declare_column(key);
                row.push((index, value.map(Into::into)));
            }
            keyed_rows.push(row);
        }

        let width = dataset.columns.len();
        dataset.rows = keyed_rows
            .into_iter()
            .map(|row| {
                let mut cells = vec![None; width];
                for (index, value) in row {
                    cells[index] = value;
                }
                Record { cells }
            })
            .collect();
        dataset
    }

    /// Convert a polars frame into a dataset of raw text cells.
    ///
    /// Every column is cast to string so numeric and text columns go through
    /// the same coercion later on.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let mut dataset = Self::new(df.get_column_names().iter().map(|name| name.as_str()));

        let mut columns: Vec<Vec<Option<String>>> = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            let as_text = column
                .as_materialized_series()
                .cast(&DataType::String)
                .context(format!("Casting column '{}' to text", column.name()))?;
            let values = as_text
                .str()?
                .into_iter()
                .map(|cell| cell.map(str::to_string))
                .collect();
            columns.push(values);
        }

        dataset.rows = (0..df.height())
            .map(|row| Record {
                cells: columns.iter().map(|column| column[row].clone()).collect(),
            })
            .collect();
        Ok(dataset)
    }

    /// Declared columns in first-seen order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All row records.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of declared columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column, if declared.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Position of a column, or [`StatsError::ColumnNotFound`].
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| StatsError::ColumnNotFound(name.to_string()))
    }

    /// Raw cells of one column, one entry per row.
    pub fn column(&self, name: &str) -> Result<Vec<Option<&str>>> {
        let index = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| row.get(index)).collect())
    }

    fn declare_column(&mut self, name: String) -> usize {
        if let Some(&index) = self.index.get(&name) {
            return index;
        }
        let index = self.columns.len();
        self.index.insert(name.clone(), index);
        self.columns.push(name);
        index
    }
}

/// Load a CSV file with a header row into a [`Dataset`].
///
/// All cells are read as text. If the strict read fails the file is read
/// again after dropping blank lines.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    info!("Loading dataset from: {}", path.display());

    let df = match read_csv_strict(path) {
        Ok(df) => df,
        Err(e) => {
            debug!("Standard loading failed: {}", e);
            let content = std::fs::read_to_string(path)?;
            read_csv_text(&drop_blank_lines(&content))
                .context(format!("Reading CSV file {}", path.display()))?
        }
    };

    let dataset = Dataset::from_dataframe(&df)?;
    if dataset.width() == 0 {
        return Err(StatsError::EmptyDataset);
    }
    info!(
        "Dataset loaded successfully: ({}, {})",
        dataset.height(),
        dataset.width()
    );
    Ok(dataset)
}

/// Parse CSV text with a header row into a [`Dataset`].
pub fn parse_csv(content: &str) -> Result<Dataset> {
    let df = read_csv_text(&drop_blank_lines(content))?;
    let dataset = Dataset::from_dataframe(&df)?;
    if dataset.width() == 0 {
        return Err(StatsError::EmptyDataset);
    }
    Ok(dataset)
}

fn text_read_options() -> CsvReadOptions {
    // Schema inference disabled: every column arrives as String.
    // Empty fields stay empty strings instead of turning into nulls.
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_missing_is_null(false),
        )
}

fn read_csv_strict(path: &Path) -> PolarsResult<DataFrame> {
    text_read_options()
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
}

fn read_csv_text(content: &str) -> PolarsResult<DataFrame> {
    text_read_options()
        .into_reader_with_file_handle(Cursor::new(content.as_bytes().to_vec()))
        .finish()
}

fn drop_blank_lines(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_records_union_of_keys_in_first_seen_order() {
        let dataset = Dataset::from_records(vec![
            vec![("y", Some("1")), ("g", Some("A"))],
            vec![("g", Some("B")), ("z", Some("x"))],
        ]);

        assert_eq!(dataset.columns(), &["y", "g", "z"]);
        assert_eq!(dataset.height(), 2);
        assert_eq!(dataset.column("y").unwrap(), vec![Some("1"), None]);
        assert_eq!(dataset.column("z").unwrap(), vec![None, Some("x")]);
    }

    #[test]
    fn test_push_row_pads_short_rows() {
        let mut dataset = Dataset::new(["a", "b", "c"]);
        dataset.push_row([Some("1")]);
        dataset.push_row([Some("1"), Some("2"), Some("3"), Some("4")]);

        assert_eq!(dataset.rows()[0].len(), 3);
        assert_eq!(dataset.column("c").unwrap(), vec![None, Some("3")]);
    }

    #[test]
    fn test_column_not_found() {
        let dataset = Dataset::new(["a"]);
        let err = dataset.column("missing").unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_from_dataframe_keeps_nulls() {
        let df = df!(
            "x" => [Some(1.5f64), None, Some(2.25)],
            "label" => [Some("a"), Some("b"), None],
        )
        .unwrap();

        let dataset = Dataset::from_dataframe(&df).unwrap();
        assert_eq!(dataset.columns(), &["x", "label"]);
        assert_eq!(dataset.column("x").unwrap(), vec![Some("1.5"), None, Some("2.25")]);
        assert_eq!(dataset.column("label").unwrap(), vec![Some("a"), Some("b"), None]);
    }

    #[test]
    fn test_parse_csv_reads_text_cells() {
        let dataset = parse_csv("y,g\n1,A\n\n2,B\n,C\n").unwrap();

        assert_eq!(dataset.columns(), &["y", "g"]);
        assert_eq!(dataset.height(), 3);
        assert_eq!(dataset.column("g").unwrap(), vec![Some("A"), Some("B"), Some("C")]);
        assert_eq!(dataset.column("y").unwrap()[0], Some("1"));
    }

    #[test]
    fn test_parse_csv_keeps_empty_fields() {
        let dataset = parse_csv("y,g\n1,A\n2,\n3,A\n4,\n").unwrap();

        assert_eq!(
            dataset.column("g").unwrap(),
            vec![Some("A"), Some(""), Some("A"), Some("")]
        );
    }
}
