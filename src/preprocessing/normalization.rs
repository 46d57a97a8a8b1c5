//! Нормализация данных в диапазон [0, 1]

#![allow(non_snake_case)]

use ndarray::{Array1, Array2};

use crate::error::{PreprocessingError, Result};
use crate::preprocessing::traits::Transformer;
use crate::types::Dataset;

/// MinMax: `(x - min) / (max - min)` по каждой колонке.
///
/// Колонка с нулевым размахом отображается в 0. Значения вне диапазона
/// обучения не обрезаются. Пропуски игнорируются при fit и сохраняются при transform.
#[derive(Debug, Clone, Default)]
pub struct MinMaxScaler {
    columns: Vec<String>,
    min: Option<Array1<f64>>,
    max: Option<Array1<f64>>,
    is_fitted: bool,
}

impl MinMaxScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_min(&self) -> Option<&Array1<f64>> {
        self.min.as_ref()
    }

    pub fn data_max(&self) -> Option<&Array1<f64>> {
        self.max.as_ref()
    }

    fn check_columns(&self, data: &Dataset) -> Result<()> {
        if data.columns() != self.columns.as_slice() {
            return Err(PreprocessingError::ColumnMismatch {
                stage: "MinMaxScaler",
                expected: self.columns.clone(),
                got: data.columns().to_vec(),
            });
        }
        Ok(())
    }

    fn params(&self) -> Result<(&Array1<f64>, &Array1<f64>)> {
        if !self.is_fitted {
            return Err(PreprocessingError::NotFitted("MinMaxScaler"));
        }

        let min = self.min.as_ref().ok_or(PreprocessingError::NotFitted("MinMaxScaler"))?;
        let max = self.max.as_ref().ok_or(PreprocessingError::NotFitted("MinMaxScaler"))?;
        Ok((min, max))
    }

    /// Обратное преобразование: `x * (max - min) + min`
    pub fn inverse_transform(&self, data: &Dataset) -> Result<Dataset> {
        let (min, max) = self.params()?;
        self.check_columns(data)?;

        let mut X: Array2<f64> = data.values().clone();
        for mut row in X.rows_mut() {
            for (i, val) in row.iter_mut().enumerate() {
                *val = *val * (max[i] - min[i]) + min[i];
            }
        }

        Dataset::new(self.columns.clone(), X)
    }
}

impl Transformer for MinMaxScaler {
    fn name(&self) -> &'static str {
        "MinMaxScaler"
    }

    fn fit(&mut self, data: &Dataset) -> Result<()> {
        if data.n_rows() == 0 {
            return Err(PreprocessingError::EmptyData(self.name()));
        }

        let X = data.values();
        let n = X.ncols();
        let mut min = Array1::from_elem(n, f64::NAN);
        let mut max = Array1::from_elem(n, f64::NAN);

        for (j, column) in X.columns().into_iter().enumerate() {
            for &v in column.iter().filter(|v| !v.is_nan()) {
                if min[j].is_nan() || v < min[j] {
                    min[j] = v;
                }
                if max[j].is_nan() || v > max[j] {
                    max[j] = v;
                }
            }

            if max[j] - min[j] == 0.0 {
                tracing::warn!(
                    "{}: column '{}' is constant, scaled values will be 0",
                    self.name(),
                    data.columns()[j]
                );
            }
        }

        self.columns = data.columns().to_vec();
        self.min = Some(min);
        self.max = Some(max);
        self.is_fitted = true;
        Ok(())
    }

    fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn transform(&self, data: &Dataset) -> Result<Dataset> {
        let (min, max) = self.params()?;
        self.check_columns(data)?;

        let mut scaled = data.values().clone();
        for mut row in scaled.rows_mut() {
            for (i, val) in row.iter_mut().enumerate() {
                let range = max[i] - min[i];
                *val = if val.is_nan() {
                    f64::NAN
                } else if range == 0.0 {
                    0.0
                } else {
                    (*val - min[i]) / range
                };
            }
        }

        tracing::debug!("{}: scaled {} rows", self.name(), data.n_rows());

        Dataset::new(self.columns.clone(), scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> Dataset {
        Dataset::from_rows(
            ["a", "b", "c"],
            &[
                vec![Some(0.0), Some(1.0), Some(7.0)],
                vec![Some(5.0), None, Some(7.0)],
                vec![Some(10.0), Some(3.0), Some(7.0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_fit_records_min_max_ignoring_missing() {
        let mut scaler = MinMaxScaler::new();
        scaler.fit(&data()).unwrap();
        assert_eq!(scaler.data_min().unwrap().to_vec(), vec![0.0, 1.0, 7.0]);
        assert_eq!(scaler.data_max().unwrap().to_vec(), vec![10.0, 3.0, 7.0]);
    }

    #[test]
    fn test_transform_to_unit_range() {
        let mut scaler = MinMaxScaler::new();
        let out = scaler.fit_transform(&data()).unwrap();

        assert_eq!(out.column("a").unwrap().to_vec(), vec![0.0, 0.5, 1.0]);

        let b = out.column("b").unwrap();
        assert_eq!(b[0], 0.0);
        assert!(b[1].is_nan());
        assert_eq!(b[2], 1.0);
    }

    #[test]
    fn test_constant_column_maps_to_zero() {
        let mut scaler = MinMaxScaler::new();
        let out = scaler.fit_transform(&data()).unwrap();
        assert_eq!(out.column("c").unwrap().to_vec(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_out_of_range_not_clipped() {
        let mut scaler = MinMaxScaler::new();
        scaler.fit(&data()).unwrap();
        let unseen =
            Dataset::from_rows(["a", "b", "c"], &[vec![Some(20.0), Some(0.0), Some(8.0)]])
                .unwrap();
        let out = scaler.transform(&unseen).unwrap();
        assert_eq!(out.values().row(0).to_vec(), vec![2.0, -0.5, 0.0]);
    }

    #[test]
    fn test_inverse_transform() {
        let mut scaler = MinMaxScaler::new();
        let scaled = scaler.fit_transform(&data()).unwrap();
        let restored = scaler.inverse_transform(&scaled).unwrap();
        assert_eq!(restored.column("a").unwrap().to_vec(), vec![0.0, 5.0, 10.0]);
        assert_eq!(restored.column("c").unwrap().to_vec(), vec![7.0, 7.0, 7.0]);
    }

    #[test]
    fn test_column_mismatch() {
        let mut scaler = MinMaxScaler::new();
        scaler.fit(&data()).unwrap();
        let other = data().drop_columns(&["b"], "test").unwrap();
        assert!(matches!(
            scaler.transform(&other),
            Err(PreprocessingError::ColumnMismatch { .. })
        ));
    }

    #[test]
    fn test_not_fitted_and_empty() {
        let scaler = MinMaxScaler::new();
        assert!(matches!(
            scaler.transform(&data()),
            Err(PreprocessingError::NotFitted(_))
        ));

        let empty = Dataset::from_rows(["a"], &[]).unwrap();
        assert!(matches!(
            MinMaxScaler::new().fit(&empty),
            Err(PreprocessingError::EmptyData(_))
        ));
    }
}
