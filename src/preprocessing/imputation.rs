//! Импутация пропусков вспомогательными регрессионными моделями

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ndarray::Axis;

use crate::error::{PreprocessingError, Result};
use crate::models::{load_model, Regressor};
use crate::preprocessing::traits::Transformer;
use crate::types::{
    Dataset, AGE, DEBT_RATIO, MONTHLY_INCOME, NUMBER_OF_DEPENDENTS, OPEN_CREDIT_LINES,
    REAL_ESTATE_LOANS, REVOLVING_UTILIZATION,
};

/// Постобработка предсказаний
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Только ограничение снизу нулем
    Off,
    /// Ограничение нулем и округление до целого, половины - к четному (как numpy)
    HalfEven,
}

/// Заполняет пропуски в целевой колонке предсказаниями модели по колонкам-предикторам.
///
/// Модель загружается из `model_path` при каждом `fit` и до следующего `fit` не меняется.
/// Строки с заполненным значением не трогаются.
#[derive(Debug, Clone)]
pub struct RegressionImputer {
    name: &'static str,
    target: &'static str,
    predictors: Vec<&'static str>,
    model_path: PathBuf,
    rounding: Rounding,
    injected: Option<Arc<dyn Regressor>>,
    model: Option<Arc<dyn Regressor>>,
}

impl RegressionImputer {
    pub fn new(
        name: &'static str,
        target: &'static str,
        predictors: Vec<&'static str>,
        model_path: impl Into<PathBuf>,
        rounding: Rounding,
    ) -> Self {
        Self {
            name,
            target,
            predictors,
            model_path: model_path.into(),
            rounding,
            injected: None,
            model: None,
        }
    }

    /// `MonthlyIncome` по долговой нагрузке, утилизации и числу ипотек
    pub fn monthly_income(model_path: impl Into<PathBuf>) -> Self {
        Self::new(
            "MonthlyIncomeImputer",
            MONTHLY_INCOME,
            vec![DEBT_RATIO, REVOLVING_UTILIZATION, REAL_ESTATE_LOANS],
            model_path,
            Rounding::Off,
        )
    }

    /// `NumberOfDependents` - счетчик, поэтому предсказание округляется
    pub fn number_of_dependents(model_path: impl Into<PathBuf>) -> Self {
        Self::new(
            "NumberOfDependentsImputer",
            NUMBER_OF_DEPENDENTS,
            vec![
                MONTHLY_INCOME,
                DEBT_RATIO,
                AGE,
                REVOLVING_UTILIZATION,
                OPEN_CREDIT_LINES,
            ],
            model_path,
            Rounding::HalfEven,
        )
    }

    /// Подставляет готовую модель; `fit` после этого не читает диск
    pub fn with_model(mut self, model: Arc<dyn Regressor>) -> Self {
        self.injected = Some(model);
        self
    }

    pub fn target(&self) -> &str {
        self.target
    }

    pub fn predictors(&self) -> &[&'static str] {
        &self.predictors
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    fn check_schema(&self, model: &dyn Regressor) -> std::result::Result<(), String> {
        if model.n_features() != self.predictors.len() {
            return Err(format!(
                "model expects {} features, {} has {} predictors",
                model.n_features(),
                self.name,
                self.predictors.len()
            ));
        }

        if let Some(names) = model.feature_names() {
            if names.iter().zip(&self.predictors).any(|(a, b)| a != b) {
                return Err(format!(
                    "model features {:?} do not match predictors {:?}",
                    names, self.predictors
                ));
            }
        }

        Ok(())
    }

    /// Нечисловое предсказание - ошибка; иначе обрезка снизу нулем и округление
    fn finish(&self, row: usize, pred: f64) -> Result<f64> {
        if !pred.is_finite() {
            return Err(PreprocessingError::NumericDomain {
                stage: self.name,
                column: self.target.to_string(),
                row,
                value: pred,
            });
        }

        let clamped = pred.max(0.0);
        Ok(match self.rounding {
            Rounding::Off => clamped,
            Rounding::HalfEven => clamped.round_ties_even(),
        })
    }
}

impl Transformer for RegressionImputer {
    fn name(&self) -> &'static str {
        self.name
    }

    /// Модель читается с диска при каждом `fit`, если она не подставлена через `with_model`
    fn fit(&mut self, _data: &Dataset) -> Result<()> {
        self.model = None;

        let model: Arc<dyn Regressor> = match &self.injected {
            Some(model) => Arc::clone(model),
            None => Arc::new(load_model(&self.model_path)?),
        };

        self.check_schema(model.as_ref())
            .map_err(|msg| PreprocessingError::load(&self.model_path, msg))?;

        self.model = Some(model);
        Ok(())
    }

    fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    fn transform(&self, data: &Dataset) -> Result<Dataset> {
        let model = self
            .model
            .as_ref()
            .ok_or(PreprocessingError::NotFitted(self.name))?;

        let target_idx = data
            .column_index(self.target)
            .ok_or_else(|| PreprocessingError::missing_column(self.name, self.target))?;
        let predictor_idx = data.require_columns(&self.predictors, self.name)?;

        let missing_rows: Vec<usize> = data
            .values()
            .column(target_idx)
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_nan())
            .map(|(i, _)| i)
            .collect();

        tracing::debug!(
            "{}: imputing {} of {} rows",
            self.name,
            missing_rows.len(),
            data.n_rows()
        );

        if missing_rows.is_empty() {
            return Ok(data.clone());
        }

        let features = data
            .values()
            .select(Axis(0), &missing_rows)
            .select(Axis(1), &predictor_idx);

        for (k, row) in features.rows().into_iter().enumerate() {
            if let Some(j) = row.iter().position(|v| v.is_nan()) {
                return Err(PreprocessingError::MissingValues {
                    stage: self.name,
                    column: self.predictors[j].to_string(),
                    row: missing_rows[k],
                });
            }
        }

        let preds = model.predict(&features)?;

        let mut values = data.values().clone();
        for (&row, &pred) in missing_rows.iter().zip(preds.iter()) {
            values[[row, target_idx]] = self.finish(row, pred)?;
        }

        Dataset::new(data.columns().to_vec(), values)
    }
}
