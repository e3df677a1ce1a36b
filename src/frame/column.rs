use crate::schema::enums::Dtype;
use crate::utils::error::{AutoMlError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parses the date layouts the CSV reader recognises.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for format in DATETIME_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(value);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|value| value.naive_utc())
}

/// A single non-null cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Date(NaiveDateTime),
    Str(String),
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Int(_) | Scalar::Float(_))
    }

    /// Date value, accepting strings in any layout `parse_datetime` knows.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Scalar::Date(v) => Some(*v),
            Scalar::Str(s) => parse_datetime(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Date(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            Scalar::Str(v) => write!(f, "{}", v),
        }
    }
}

/// Typed storage for one column, `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Boolean(Vec<Option<bool>>),
    Categorical(Vec<Option<String>>),
    Date(Vec<Option<NaiveDateTime>>),
}

fn sort_partial<T: PartialOrd>(values: &mut [T]) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}

/// Most frequent value; ties resolve to the smallest one.
fn sorted_mode<T: PartialOrd + Clone>(mut values: Vec<T>) -> Option<T> {
    sort_partial(&mut values);
    let mut best: Option<(T, usize)> = None;
    let mut idx = 0;
    while idx < values.len() {
        let mut run = 1;
        while idx + run < values.len() && values[idx + run] == values[idx] {
            run += 1;
        }
        if best.as_ref().map(|(_, n)| run > *n).unwrap_or(true) {
            best = Some((values[idx].clone(), run));
        }
        idx += run;
    }
    best.map(|(value, _)| value)
}

fn sorted_distinct<T: PartialOrd>(mut values: Vec<T>) -> usize {
    sort_partial(&mut values);
    values.dedup_by(|a, b| a == b);
    values.len()
}

fn take_opt<T: Clone>(values: &[Option<T>], indices: &[usize]) -> Vec<Option<T>> {
    indices.iter().map(|&i| values[i].clone()).collect()
}

fn fill<T: Clone>(values: &mut [Option<T>], value: T) -> usize {
    let mut filled = 0;
    for slot in values.iter_mut().filter(|v| v.is_none()) {
        *slot = Some(value.clone());
        filled += 1;
    }
    filled
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
            ColumnData::Date(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> Dtype {
        match self {
            ColumnData::Integer(_) => Dtype::Integer,
            ColumnData::Float(_) => Dtype::Float,
            ColumnData::Boolean(_) => Dtype::Boolean,
            ColumnData::Categorical(_) => Dtype::Categorical,
            ColumnData::Date(_) => Dtype::Date,
        }
    }

    pub fn get(&self, idx: usize) -> Option<Scalar> {
        match self {
            ColumnData::Integer(v) => v.get(idx).copied().flatten().map(Scalar::Int),
            ColumnData::Float(v) => v.get(idx).copied().flatten().map(Scalar::Float),
            ColumnData::Boolean(v) => v.get(idx).copied().flatten().map(Scalar::Bool),
            ColumnData::Categorical(v) => v.get(idx).cloned().flatten().map(Scalar::Str),
            ColumnData::Date(v) => v.get(idx).copied().flatten().map(Scalar::Date),
        }
    }

    pub fn is_null(&self, idx: usize) -> bool {
        match self {
            ColumnData::Integer(v) => v[idx].is_none(),
            ColumnData::Float(v) => v[idx].is_none(),
            ColumnData::Boolean(v) => v[idx].is_none(),
            ColumnData::Categorical(v) => v[idx].is_none(),
            ColumnData::Date(v) => v[idx].is_none(),
        }
    }

    pub fn null_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_null(i)).count()
    }

    /// Number of non-null values.
    pub fn count(&self) -> usize {
        self.len() - self.null_count()
    }

    /// Non-null values as floats for integer and float columns.
    pub fn numeric_values(&self) -> Option<Vec<f64>> {
        match self {
            ColumnData::Integer(v) => Some(v.iter().flatten().map(|x| *x as f64).collect()),
            ColumnData::Float(v) => Some(v.iter().flatten().copied().collect()),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnData::Integer(_) | ColumnData::Float(_))
    }

    pub fn mode(&self) -> Option<Scalar> {
        match self {
            ColumnData::Integer(v) => sorted_mode(v.iter().flatten().copied().collect()).map(Scalar::Int),
            ColumnData::Float(v) => sorted_mode(v.iter().flatten().copied().collect()).map(Scalar::Float),
            ColumnData::Boolean(v) => sorted_mode(v.iter().flatten().copied().collect()).map(Scalar::Bool),
            ColumnData::Categorical(v) => {
                sorted_mode(v.iter().flatten().cloned().collect()).map(Scalar::Str)
            }
            ColumnData::Date(v) => sorted_mode(v.iter().flatten().copied().collect()).map(Scalar::Date),
        }
    }

    /// Number of distinct non-null values.
    pub fn unique_count(&self) -> usize {
        match self {
            ColumnData::Integer(v) => sorted_distinct(v.iter().flatten().collect()),
            ColumnData::Float(v) => sorted_distinct(v.iter().flatten().collect()),
            ColumnData::Boolean(v) => sorted_distinct(v.iter().flatten().collect()),
            ColumnData::Categorical(v) => sorted_distinct(v.iter().flatten().collect()),
            ColumnData::Date(v) => sorted_distinct(v.iter().flatten().collect()),
        }
    }

    pub fn take(&self, indices: &[usize]) -> ColumnData {
        match self {
            ColumnData::Integer(v) => ColumnData::Integer(take_opt(v, indices)),
            ColumnData::Float(v) => ColumnData::Float(take_opt(v, indices)),
            ColumnData::Boolean(v) => ColumnData::Boolean(take_opt(v, indices)),
            ColumnData::Categorical(v) => ColumnData::Categorical(take_opt(v, indices)),
            ColumnData::Date(v) => ColumnData::Date(take_opt(v, indices)),
        }
    }

    /// Hashable, type-tagged representation of one cell.
    pub fn cell_key(&self, idx: usize) -> String {
        match self.get(idx) {
            None => "~".to_string(),
            Some(Scalar::Float(v)) => format!("f{}", v.to_bits()),
            Some(value) => format!("{}{}", self.dtype().tag(), value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn integer(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        Self::new(name, ColumnData::Integer(values))
    }

    pub fn float(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Float(values))
    }

    pub fn boolean(name: impl Into<String>, values: Vec<Option<bool>>) -> Self {
        Self::new(name, ColumnData::Boolean(values))
    }

    pub fn categorical<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        Self::new(
            name,
            ColumnData::Categorical(values.into_iter().map(|v| v.map(Into::into)).collect()),
        )
    }

    pub fn date(name: impl Into<String>, values: Vec<Option<NaiveDateTime>>) -> Self {
        Self::new(name, ColumnData::Date(values))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dtype(&self) -> Dtype {
        self.data.dtype()
    }

    /// Replaces every missing value with `value`, coercing it to the column dtype.
    pub fn fill_nulls(&mut self, value: &Scalar) -> Result<usize> {
        let incompatible = AutoMlError::UnsupportedDtype {
            column: self.name.clone(),
            reason: format!("value {} cannot fill a {} column", value, self.dtype()),
        };
        let filled = match (&mut self.data, value) {
            (ColumnData::Integer(v), Scalar::Int(x)) => fill(v, *x),
            (ColumnData::Integer(v), Scalar::Float(x)) if x.is_finite() => fill(v, x.round() as i64),
            (ColumnData::Float(v), x) if x.is_numeric() => fill(v, x.as_f64().unwrap_or_default()),
            (ColumnData::Boolean(v), Scalar::Bool(x)) => fill(v, *x),
            (ColumnData::Categorical(v), Scalar::Str(x)) => fill(v, x.clone()),
            (ColumnData::Date(v), x) => match x.as_datetime() {
                Some(date) => fill(v, date),
                None => return Err(incompatible),
            },
            _ => return Err(incompatible),
        };
        Ok(filled)
    }
}
