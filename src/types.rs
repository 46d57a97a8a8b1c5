/// Типы данных для конвейера предобработки

use std::collections::{BTreeMap, HashSet};

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{PreprocessingError, Result};

pub const MONTHLY_INCOME: &str = "MonthlyIncome";
pub const NUMBER_OF_DEPENDENTS: &str = "NumberOfDependents";
pub const DEBT_RATIO: &str = "DebtRatio";
pub const REVOLVING_UTILIZATION: &str = "RevolvingUtilizationOfUnsecuredLines";
pub const REAL_ESTATE_LOANS: &str = "NumberRealEstateLoansOrLines";
pub const OPEN_CREDIT_LINES: &str = "NumberOfOpenCreditLinesAndLoans";
pub const AGE: &str = "age";
pub const PAST_DUE_30_59: &str = "NumberOfTime30-59DaysPastDueNotWorse";
pub const PAST_DUE_60_89: &str = "NumberOfTime60-89DaysPastDueNotWorse";
pub const PAST_DUE_90: &str = "NumberOfTimes90DaysLate";
pub const PAST_DUE_AGGREGATED: &str = "PastDueAggregated";

/// Прямоугольная таблица: строки - записи, колонки - именованные числовые поля.
///
/// Пропуск хранится как `NaN`. Порядок строк сохраняется всеми стадиями.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DatasetRepr", into = "DatasetRepr")]
pub struct Dataset {
    columns: Vec<String>,
    values: Array2<f64>,
}

/// JSON-представление: пропуски как `null`
#[derive(Serialize, Deserialize)]
struct DatasetRepr {
    columns: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if columns.len() != values.ncols() {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} columns", columns.len()),
                got: format!("{} columns", values.ncols()),
            });
        }

        let mut seen = HashSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "duplicate column '{}'",
                    name
                )));
            }
        }

        Ok(Self { columns, values })
    }

    /// Построение из строк; `None` - пропуск
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: &[Vec<Option<f64>>],
    ) -> Result<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let n_cols = columns.len();

        let mut values = Array2::from_elem((rows.len(), n_cols), f64::NAN);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(PreprocessingError::InvalidShape {
                    expected: format!("{} values in row {}", n_cols, i),
                    got: format!("{}", row.len()),
                });
            }
            for (j, val) in row.iter().enumerate() {
                if let Some(v) = val {
                    values[[i, j]] = *v;
                }
            }
        }

        Self::new(columns, values)
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn into_values(self) -> Array2<f64> {
        self.values
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.column_index(name).map(|idx| self.values.column(idx))
    }

    /// Индексы колонок в заданном порядке; ошибка на первой отсутствующей
    pub fn require_columns(&self, names: &[&str], stage: &'static str) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| PreprocessingError::missing_column(stage, *name))
            })
            .collect()
    }

    /// Подматрица из колонок `names` (в их порядке)
    pub fn select(&self, names: &[&str], stage: &'static str) -> Result<Array2<f64>> {
        let indices = self.require_columns(names, stage)?;
        Ok(self.values.select(Axis(1), &indices))
    }

    /// Добавляет колонку в конец или заменяет существующую
    pub fn with_column(mut self, name: &str, column: Array1<f64>) -> Result<Self> {
        if column.len() != self.n_rows() {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} rows", self.n_rows()),
                got: format!("{} rows", column.len()),
            });
        }

        match self.column_index(name) {
            Some(idx) => self.values.column_mut(idx).assign(&column),
            None => {
                self.values
                    .push_column(column.view())
                    .map_err(|e| PreprocessingError::InvalidShape {
                        expected: format!("{} rows", self.n_rows()),
                        got: e.to_string(),
                    })?;
                self.columns.push(name.to_string());
            }
        }

        Ok(self)
    }

    /// Удаляет колонки; отсутствующая колонка - ошибка
    pub fn drop_columns(&self, names: &[&str], stage: &'static str) -> Result<Self> {
        self.require_columns(names, stage)?;

        let keep: Vec<usize> = (0..self.n_cols())
            .filter(|&i| !names.contains(&self.columns[i].as_str()))
            .collect();
        let columns = keep.iter().map(|&i| self.columns[i].clone()).collect();

        Ok(Self {
            columns,
            values: self.values.select(Axis(1), &keep),
        })
    }

    /// Строка как запись "имя колонки -> значение"
    pub fn record(&self, row: usize) -> Option<BTreeMap<&str, Option<f64>>> {
        if row >= self.n_rows() {
            return None;
        }

        Some(
            self.columns
                .iter()
                .zip(self.values.row(row).iter())
                .map(|(name, &v)| (name.as_str(), if v.is_nan() { None } else { Some(v) }))
                .collect(),
        )
    }
}

impl TryFrom<DatasetRepr> for Dataset {
    type Error = PreprocessingError;

    fn try_from(repr: DatasetRepr) -> Result<Self> {
        Dataset::from_rows(repr.columns, &repr.rows)
    }
}

impl From<Dataset> for DatasetRepr {
    fn from(ds: Dataset) -> Self {
        let rows = ds
            .values
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .map(|&v| if v.is_nan() { None } else { Some(v) })
                    .collect()
            })
            .collect();

        DatasetRepr {
            columns: ds.columns,
            rows,
        }
    }
}
