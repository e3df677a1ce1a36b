use super::column::{parse_datetime, Column, ColumnData};
use super::DataFrame;
use crate::utils::error::{AutoMlError, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;

fn default_delimiter() -> char {
    ','
}

fn default_has_headers() -> bool {
    true
}

fn default_null_values() -> Vec<String> {
    ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "?"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvOptions {
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_has_headers")]
    pub has_headers: bool,
    #[serde(default = "default_null_values")]
    pub null_values: Vec<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            has_headers: default_has_headers(),
            null_values: default_null_values(),
        }
    }
}

impl CsvOptions {
    fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(AutoMlError::InvalidConfigValueError {
                field: "dataset.csv.delimiter".to_string(),
                value: self.delimiter.to_string(),
                reason: "Delimiter must be a single ASCII character".to_string(),
            })
        }
    }

    fn is_null(&self, cell: &str) -> bool {
        let trimmed = cell.trim();
        self.null_values.iter().any(|n| n == trimmed)
    }
}

/// Reads a CSV document and infers one dtype per column.
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> Result<DataFrame> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(options.delimiter_byte()?)
        .has_headers(options.has_headers)
        .from_reader(reader);

    let mut names: Vec<String> = if options.has_headers {
        rdr.headers()?.iter().map(|h| h.trim().to_string()).collect()
    } else {
        Vec::new()
    };

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for record in rdr.records() {
        let record = record?;
        if cells.is_empty() {
            cells = vec![Vec::new(); record.len()];
        }
        for (idx, cell) in record.iter().enumerate() {
            let value = if options.is_null(cell) {
                None
            } else {
                Some(cell.trim().to_string())
            };
            cells[idx].push(value);
        }
    }

    if names.is_empty() {
        names = (0..cells.len()).map(|i| format!("column_{}", i)).collect();
    }

    tracing::debug!("Read CSV with {} columns", names.len());

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| infer_column(name, values))
        .collect();
    DataFrame::new(columns)
}

fn all_parse<T>(values: &[Option<String>], parse: impl Fn(&str) -> Option<T>) -> Option<Vec<Option<T>>> {
    values
        .iter()
        .map(|v| match v {
            None => Some(None),
            Some(raw) => parse(raw).map(Some),
        })
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn infer_column(name: String, values: Vec<Option<String>>) -> Column {
    if values.iter().all(Option::is_none) {
        return Column::new(name, ColumnData::Categorical(values));
    }
    let data = if let Some(v) = all_parse(&values, parse_bool) {
        ColumnData::Boolean(v)
    } else if let Some(v) = all_parse(&values, |s| s.parse::<i64>().ok()) {
        ColumnData::Integer(v)
    } else if let Some(v) = all_parse(&values, |s| s.parse::<f64>().ok()) {
        ColumnData::Float(v)
    } else if let Some(v) = all_parse(&values, parse_datetime) {
        ColumnData::Date(v)
    } else {
        ColumnData::Categorical(values)
    };
    Column::new(name, data)
}

/// Serialises a frame as CSV; missing values become empty cells.
pub fn write_csv(frame: &DataFrame) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(frame.column_names())?;
    for row in 0..frame.n_rows() {
        let record: Vec<String> = frame
            .columns()
            .iter()
            .map(|c| c.data.get(row).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }
    wtr.into_inner()
        .map_err(|e| AutoMlError::IoError(e.into_error()))
}
