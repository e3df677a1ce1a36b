use super::{check_frame, not_fitted, Transformer};
use crate::frame::{Column, ColumnData, DataFrame};
use crate::schema::enums::Dtype;
use crate::utils::error::{AutoMlError, Result};
use chrono::{Datelike, NaiveDateTime};

fn year(d: &NaiveDateTime) -> i64 {
    d.year() as i64
}

fn month(d: &NaiveDateTime) -> i64 {
    d.month() as i64
}

fn day(d: &NaiveDateTime) -> i64 {
    d.day() as i64
}

fn weekday(d: &NaiveDateTime) -> i64 {
    d.weekday().num_days_from_monday() as i64
}

type Extract = fn(&NaiveDateTime) -> i64;

static PARTS: [(&str, Extract); 4] = [
    ("year", year),
    ("month", month),
    ("day", day),
    ("weekday", weekday),
];

/// Appends `<name>_year`, `_month`, `_day` and `_weekday` integer columns
/// for every date column. The source columns are kept.
#[derive(Debug, Clone, Default)]
pub struct DatetimeSplitter {
    columns: Option<Vec<String>>,
    feature_names: Vec<String>,
}

impl DatetimeSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    fn part_names(column: &str) -> impl Iterator<Item = String> + '_ {
        PARTS.iter().map(move |(part, _)| format!("{}_{}", column, part))
    }
}

impl Transformer for DatetimeSplitter {
    fn name(&self) -> &'static str {
        "DatetimeSplitter"
    }

    fn fit(&mut self, frame: &DataFrame) -> Result<()> {
        check_frame(frame)?;
        let columns: Vec<String> = frame
            .columns()
            .iter()
            .filter(|c| c.dtype() == Dtype::Date)
            .map(|c| c.name.clone())
            .collect();
        let mut feature_names = frame.column_names();
        for column in &columns {
            feature_names.extend(Self::part_names(column));
        }
        self.columns = Some(columns);
        self.feature_names = feature_names;
        Ok(())
    }

    fn transform(&self, frame: &DataFrame) -> Result<DataFrame> {
        let columns = self.columns.as_ref().ok_or_else(|| not_fitted(self.name()))?;
        check_frame(frame)?;
        let mut output = frame.clone();
        for name in columns {
            let column = frame
                .column(name)
                .ok_or_else(|| AutoMlError::column_not_found([name.as_str()]))?;
            let ColumnData::Date(values) = &column.data else {
                return Err(AutoMlError::UnsupportedDtype {
                    column: name.clone(),
                    reason: format!("expected a date column, found {}", column.dtype()),
                });
            };
            for ((_, extract), part_name) in PARTS.iter().zip(Self::part_names(name)) {
                let parts = values.iter().map(|v| v.as_ref().map(|d| extract(d))).collect();
                output.push_column(Column::integer(part_name, parts))?;
            }
        }
        Ok(output)
    }

    fn feature_names(&self) -> Result<Vec<String>> {
        if self.columns.is_none() {
            return Err(not_fitted(self.name()));
        }
        Ok(self.feature_names.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> DataFrame {
        let when = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        DataFrame::new(vec![
            Column::integer("id", vec![Some(1), Some(2)]),
            Column::date("joined", vec![Some(when), None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_splits_date_columns() {
        let mut splitter = DatetimeSplitter::new();
        let out = splitter.fit_transform(&sample()).unwrap();

        assert_eq!(
            out.column_names(),
            vec!["id", "joined", "joined_year", "joined_month", "joined_day", "joined_weekday"]
        );
        assert_eq!(splitter.feature_names().unwrap(), out.column_names());
        assert_eq!(
            out.column("joined_year").unwrap().data,
            ColumnData::Integer(vec![Some(2024), None])
        );
        // 2024-03-15 is a Friday
        assert_eq!(
            out.column("joined_weekday").unwrap().data,
            ColumnData::Integer(vec![Some(4), None])
        );
    }

    #[test]
    fn test_no_date_columns_is_identity() {
        let mut splitter = DatetimeSplitter::new();
        let frame = sample().select(&["id"]).unwrap();
        assert_eq!(splitter.fit_transform(&frame).unwrap(), frame);
    }
}
