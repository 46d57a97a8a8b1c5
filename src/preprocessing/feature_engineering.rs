//! Feature engineering: попарные взаимодействия признаков

#![allow(non_snake_case)]

use ndarray::{Array2, Axis};

use crate::error::{PreprocessingError, Result};
use crate::preprocessing::traits::Transformer;
use crate::types::Dataset;

/// Полиномиальные признаки степени 2 только из взаимодействий, без свободного члена.
///
/// Выход: исходные колонки, затем произведения всех пар `(i, j), i < j`
/// в лексикографическом порядке индексов. Имя колонки произведения - `"a b"`.
/// Ширина растет с n до n + n(n-1)/2.
#[derive(Debug, Clone, Default)]
pub struct PolynomialFeatures;

impl PolynomialFeatures {
    pub fn new() -> Self {
        Self
    }

    /// Пары индексов для произведений
    pub fn interaction_pairs(n_features: usize) -> Vec<(usize, usize)> {
        (0..n_features)
            .flat_map(|i| ((i + 1)..n_features).map(move |j| (i, j)))
            .collect()
    }

    pub fn feature_names_out(columns: &[String]) -> Vec<String> {
        let pairs = Self::interaction_pairs(columns.len());
        let mut names = Vec::with_capacity(columns.len() + pairs.len());
        names.extend(columns.iter().cloned());
        names.extend(
            pairs
                .into_iter()
                .map(|(i, j)| format!("{} {}", columns[i], columns[j])),
        );
        names
    }
}

impl Transformer for PolynomialFeatures {
    fn name(&self) -> &'static str {
        "PolynomialFeatures"
    }

    fn fit(&mut self, _data: &Dataset) -> Result<()> {
        Ok(())
    }

    fn transform(&self, data: &Dataset) -> Result<Dataset> {
        if data.n_cols() == 0 {
            return Err(PreprocessingError::InvalidParameter(
                "PolynomialFeatures needs at least one column".to_string(),
            ));
        }

        let X = data.values();
        let pairs = Self::interaction_pairs(data.n_cols());

        let mut interactions = Array2::<f64>::zeros((data.n_rows(), pairs.len()));
        for (k, &(i, j)) in pairs.iter().enumerate() {
            let product = &X.column(i) * &X.column(j);
            interactions.column_mut(k).assign(&product);
        }

        let values = ndarray::concatenate(Axis(1), &[X.view(), interactions.view()]).map_err(
            |e| PreprocessingError::InvalidShape {
                expected: format!("{} rows", data.n_rows()),
                got: e.to_string(),
            },
        )?;

        tracing::debug!(
            "{}: {} -> {} columns",
            self.name(),
            data.n_cols(),
            values.ncols()
        );

        Dataset::new(Self::feature_names_out(data.columns()), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_pairs() {
        assert_eq!(
            PolynomialFeatures::interaction_pairs(3),
            vec![(0, 1), (0, 2), (1, 2)]
        );
        assert!(PolynomialFeatures::interaction_pairs(1).is_empty());
        assert_eq!(PolynomialFeatures::interaction_pairs(14).len(), 14 * 13 / 2);
    }

    #[test]
    fn test_only_pairwise_products() {
        let ds = Dataset::from_rows(["a", "b", "c"], &[vec![Some(2.0), Some(3.0), Some(5.0)]])
            .unwrap();
        let out = PolynomialFeatures::new().transform(&ds).unwrap();

        assert_eq!(out.columns(), &["a", "b", "c", "a b", "a c", "b c"]);
        // нет квадратов и константы
        assert_eq!(
            out.values().row(0).to_vec(),
            vec![2.0, 3.0, 5.0, 6.0, 10.0, 15.0]
        );
    }

    #[test]
    fn test_width_and_missing_propagation() {
        let ds = Dataset::from_rows(
            ["a", "b", "c", "d"],
            &[
                vec![Some(1.0), None, Some(2.0), Some(0.5)],
                vec![Some(0.0), Some(4.0), Some(1.0), Some(1.0)],
            ],
        )
        .unwrap();
        let out = PolynomialFeatures::new().transform(&ds).unwrap();

        assert_eq!(out.n_cols(), 4 + 6);
        assert_eq!(out.n_rows(), 2);
        assert!(out.column("a b").unwrap()[0].is_nan());
        assert_eq!(out.column("c d").unwrap().to_vec(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_single_column_passthrough() {
        let ds = Dataset::from_rows(["a"], &[vec![Some(7.0)]]).unwrap();
        let out = PolynomialFeatures::new().transform(&ds).unwrap();
        assert_eq!(out, ds);
    }
}
