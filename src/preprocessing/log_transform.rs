//! Коррекция скошенности: log(1 + x)

use crate::error::{PreprocessingError, Result};
use crate::preprocessing::traits::Transformer;
use crate::types::Dataset;

/// Применяет `log1p` к перечисленным колонкам, остальные не трогает.
///
/// Значение `<= -1` дает ошибку `NumericDomain`: ничего не обрезается,
/// стадия падает до выдачи результата. Пропуски проходят без изменений.
#[derive(Debug, Clone)]
pub struct LogTransformer {
    columns: Vec<String>,
}

impl LogTransformer {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl Transformer for LogTransformer {
    fn name(&self) -> &'static str {
        "LogTransformer"
    }

    fn fit(&mut self, _data: &Dataset) -> Result<()> {
        Ok(())
    }

    fn transform(&self, data: &Dataset) -> Result<Dataset> {
        let targets: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        let indices = data.require_columns(&targets, self.name())?;

        let mut values = data.values().clone();
        for (name, &idx) in targets.iter().zip(&indices) {
            let mut column = values.column_mut(idx);

            if let Some((row, &value)) = column.iter().enumerate().find(|(_, v)| **v <= -1.0) {
                return Err(PreprocessingError::NumericDomain {
                    stage: self.name(),
                    column: name.to_string(),
                    row,
                    value,
                });
            }

            column.mapv_inplace(f64::ln_1p);
        }

        tracing::debug!("{}: log1p applied to {:?}", self.name(), self.columns);

        Dataset::new(data.columns().to_vec(), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> Dataset {
        Dataset::from_rows(
            ["DebtRatio", "age", "PastDueAggregated"],
            &[
                vec![Some(0.0), Some(30.0), Some(0.0)],
                vec![Some(1.0), Some(40.0), None],
                vec![Some(9.0), Some(50.0), Some(3.0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_log1p_on_listed_columns_only() {
        let t = LogTransformer::new(["DebtRatio", "PastDueAggregated"]);
        let out = t.transform(&data()).unwrap();

        let debt = out.column("DebtRatio").unwrap();
        assert_eq!(debt[0], 0.0);
        assert!((debt[1] - 2f64.ln()).abs() < 1e-12);
        assert!((debt[2] - 10f64.ln()).abs() < 1e-12);

        assert_eq!(out.column("age").unwrap(), data().column("age").unwrap());
        assert!(out.column("PastDueAggregated").unwrap()[1].is_nan());
    }

    #[test]
    fn test_monotonic() {
        let rows: Vec<Vec<Option<f64>>> = (0..50).map(|i| vec![Some(i as f64 * 0.37)]).collect();
        let ds = Dataset::from_rows(["x"], &rows).unwrap();
        let out = LogTransformer::new(["x"]).transform(&ds).unwrap();
        let x = out.column("x").unwrap();
        for w in x.to_vec().windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn test_out_of_domain_value() {
        let ds = Dataset::from_rows(["x"], &[vec![Some(0.5)], vec![Some(-1.0)]]).unwrap();
        let err = LogTransformer::new(["x"]).transform(&ds).unwrap_err();
        assert!(matches!(
            err,
            PreprocessingError::NumericDomain { row: 1, value, .. } if value == -1.0
        ));
    }

    #[test]
    fn test_negative_above_minus_one_allowed() {
        let ds = Dataset::from_rows(["x"], &[vec![Some(-0.5)]]).unwrap();
        let out = LogTransformer::new(["x"]).transform(&ds).unwrap();
        assert!((out.column("x").unwrap()[0] - 0.5f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_missing_target_column() {
        let err = LogTransformer::new(["MonthlyIncome"]).transform(&data()).unwrap_err();
        assert!(matches!(err, PreprocessingError::MissingColumn { .. }));
    }
}
