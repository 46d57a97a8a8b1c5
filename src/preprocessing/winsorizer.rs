//! Ограничение выбросов по квантилю

use std::collections::HashMap;

use crate::error::{PreprocessingError, Result};
use crate::preprocessing::traits::Transformer;
use crate::types::Dataset;

/// Винзоризация: каждое значение колонки обрезается до `[0, quantile(q)]`.
///
/// Ноль - жесткая нижняя граница (финансовые поля неотрицательны).
/// Пропуски при fit игнорируются, при transform проходят без изменений.
#[derive(Debug, Clone)]
pub struct Winsorizer {
    q: f64,
    upper_bounds: Option<HashMap<String, Option<f64>>>,
}

impl Winsorizer {
    pub fn new(q: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&q) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "quantile must be in [0, 1], got {}",
                q
            )));
        }

        Ok(Self {
            q,
            upper_bounds: None,
        })
    }

    pub fn quantile(&self) -> f64 {
        self.q
    }

    /// Верхняя граница колонки; `None` у колонки без значений
    pub fn upper_bound(&self, column: &str) -> Option<f64> {
        self.upper_bounds
            .as_ref()
            .and_then(|bounds| bounds.get(column).copied().flatten())
    }
}

impl Default for Winsorizer {
    fn default() -> Self {
        Self {
            q: 0.95,
            upper_bounds: None,
        }
    }
}

/// Квантиль с линейной интерполяцией между порядковыми статистиками
pub fn quantile(values: impl IntoIterator<Item = f64>, q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

impl Transformer for Winsorizer {
    fn name(&self) -> &'static str {
        "Winsorizer"
    }

    fn fit(&mut self, data: &Dataset) -> Result<()> {
        if data.n_rows() == 0 {
            return Err(PreprocessingError::EmptyData(self.name()));
        }

        let mut bounds = HashMap::with_capacity(data.n_cols());
        for (name, column) in data.columns().iter().zip(data.values().columns()) {
            let bound = quantile(column.iter().copied(), self.q).map(|b| b.max(0.0));
            if bound.is_none() {
                tracing::warn!(
                    "{}: column '{}' has no values, only the 0 floor applies",
                    self.name(),
                    name
                );
            }
            bounds.insert(name.clone(), bound);
        }

        self.upper_bounds = Some(bounds);
        Ok(())
    }

    fn is_fitted(&self) -> bool {
        self.upper_bounds.is_some()
    }

    fn transform(&self, data: &Dataset) -> Result<Dataset> {
        let bounds = self
            .upper_bounds
            .as_ref()
            .ok_or(PreprocessingError::NotFitted(self.name()))?;

        let mut values = data.values().clone();
        for (name, mut column) in data.columns().iter().zip(values.columns_mut()) {
            let upper = bounds.get(name).ok_or_else(|| {
                let mut expected: Vec<String> = bounds.keys().cloned().collect();
                expected.sort();
                PreprocessingError::ColumnMismatch {
                    stage: self.name(),
                    expected,
                    got: data.columns().to_vec(),
                }
            })?;

            let upper = upper.unwrap_or(f64::INFINITY);
            column.mapv_inplace(|v| if v.is_nan() { v } else { v.max(0.0).min(upper) });
        }

        tracing::debug!("{}: clipped {} columns", self.name(), data.n_cols());

        Dataset::new(data.columns().to_vec(), values)
    }
}
