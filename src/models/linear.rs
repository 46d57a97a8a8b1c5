//! Линейная регрессионная модель для импутации пропусков
//!
//! Предобученные модели (байесовская ridge-регрессия) хранятся на диске в JSON:
//! имена признаков, коэффициенты и свободный член. Предсказание линейно.

#![allow(non_snake_case)]

use std::fmt::Debug;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use linfa_linear::FittedLinearRegression;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{PreprocessingError, Result};

/// Контракт модели импутации: `predict(матрица признаков) -> вектор`
pub trait Regressor: Debug + Send + Sync {
    fn n_features(&self) -> usize;

    fn predict(&self, X: &Array2<f64>) -> Result<Array1<f64>>;

    /// Имена признаков, на которых обучалась модель (если известны)
    fn feature_names(&self) -> Option<&[String]> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            feature_names: Vec::new(),
            coefficients,
            intercept,
        }
    }

    pub fn with_feature_names<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.feature_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Проверка схемы артефакта
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("model has no coefficients".to_string());
        }
        if !self.feature_names.is_empty() && self.feature_names.len() != self.coefficients.len() {
            return Err(format!(
                "{} feature names for {} coefficients",
                self.feature_names.len(),
                self.coefficients.len()
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("model parameters must be finite".to_string());
        }
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| PreprocessingError::load(path, e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .map_err(|e| PreprocessingError::load(path, e))
    }
}

impl Regressor for LinearModel {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, X: &Array2<f64>) -> Result<Array1<f64>> {
        if X.ncols() != self.coefficients.len() {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} features", self.coefficients.len()),
                got: format!("{} features", X.ncols()),
            });
        }

        let weights = Array1::from(self.coefficients.clone());
        Ok(X.dot(&weights) + self.intercept)
    }

    fn feature_names(&self) -> Option<&[String]> {
        if self.feature_names.is_empty() {
            None
        } else {
            Some(&self.feature_names)
        }
    }
}

impl From<&FittedLinearRegression<f64>> for LinearModel {
    fn from(fitted: &FittedLinearRegression<f64>) -> Self {
        Self::new(fitted.params().to_vec(), fitted.intercept())
    }
}

/// Загрузка артефакта модели с диска.
///
/// Файл открывается только на чтение и закрывается при выходе из функции,
/// в том числе при ошибке разбора.
pub fn load_model(path: impl AsRef<Path>) -> Result<LinearModel> {
    let path = path.as_ref();

    let model: LinearModel = {
        let file = File::open(path).map_err(|e| PreprocessingError::load(path, e))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| PreprocessingError::load(path, e))?
    };

    model
        .validate()
        .map_err(|msg| PreprocessingError::load(path, msg))?;

    tracing::info!(
        "Loaded imputation model from {} ({} features)",
        path.display(),
        model.n_features()
    );

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use linfa::traits::Fit;
    use linfa::Dataset as LinfaDataset;
    use linfa_linear::LinearRegression;
    use ndarray::array;
    use std::io::Write;

    #[test]
    fn test_predict_is_linear() {
        let model = LinearModel::new(vec![2.0, -1.0], 0.5);
        let X = array![[1.0, 1.0], [0.0, 3.0]];
        let preds = model.predict(&X).unwrap();
        assert!((preds[0] - 1.5).abs() < 1e-12);
        assert!((preds[1] - (-2.5)).abs() < 1e-12);
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let model = LinearModel::new(vec![1.0, 1.0, 1.0], 0.0);
        let err = model.predict(&array![[1.0, 2.0]]).unwrap_err();
        assert!(matches!(err, PreprocessingError::InvalidShape { .. }));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mi.json");

        let model = LinearModel::new(vec![100.0, -20.0, 350.0], 4000.0).with_feature_names([
            "DebtRatio",
            "RevolvingUtilizationOfUnsecuredLines",
            "NumberRealEstateLoansOrLines",
        ]);
        model.save(&path).unwrap();

        let loaded = load_model(&path).unwrap();
        assert_eq!(loaded, model);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PreprocessingError::Load { .. }));
    }

    #[test]
    fn test_load_corrupt_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x80\x04joblib pickle").unwrap();
        let err = load_model(file.path()).unwrap_err();
        assert!(matches!(err, PreprocessingError::Load { .. }));
    }

    #[test]
    fn test_load_schema_mismatch() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"feature_names": ["a", "b"], "coefficients": [1.0], "intercept": 0.0}"#,
        )
        .unwrap();
        let err = load_model(file.path()).unwrap_err();
        assert!(err.to_string().contains("2 feature names for 1 coefficients"));
    }

    #[test]
    fn test_from_linfa_regression() {
        // y = 3 * x0 - 2 * x1 + 1
        let X = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [2.0, 1.0], [1.0, 3.0]];
        let y = X.column(0).mapv(|v| 3.0 * v) - X.column(1).mapv(|v| 2.0 * v) + 1.0;
        let fitted = LinearRegression::new()
            .fit(&LinfaDataset::new(X.clone(), y.clone()))
            .unwrap();

        let model = LinearModel::from(&fitted);
        assert_eq!(model.n_features(), 2);

        let preds = model.predict(&X).unwrap();
        for (p, t) in preds.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-8, "{} vs {}", p, t);
        }
    }
}
