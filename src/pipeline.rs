//! Композиция стадий в линейные конвейеры
//!
//! Каждая стадия получает результат предыдущей. Стадии не читают состояние
//! последующих; при `fit` каждая стадия обучается на выходе уже обученных предыдущих.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::preprocessing::{
    LogTransformer, MinMaxScaler, PastDueAggregator, PolynomialFeatures, RegressionImputer,
    Transformer, Winsorizer,
};
use crate::types::Dataset;

/// Фиксированный набор стадий
#[derive(Debug, Clone)]
pub enum Stage {
    Imputer(RegressionImputer),
    PastDue(PastDueAggregator),
    Winsorizer(Winsorizer),
    Log(LogTransformer),
    Scaler(MinMaxScaler),
    Polynomial(PolynomialFeatures),
}

impl Stage {
    fn inner(&self) -> &dyn Transformer {
        match self {
            Stage::Imputer(t) => t,
            Stage::PastDue(t) => t,
            Stage::Winsorizer(t) => t,
            Stage::Log(t) => t,
            Stage::Scaler(t) => t,
            Stage::Polynomial(t) => t,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Transformer {
        match self {
            Stage::Imputer(t) => t,
            Stage::PastDue(t) => t,
            Stage::Winsorizer(t) => t,
            Stage::Log(t) => t,
            Stage::Scaler(t) => t,
            Stage::Polynomial(t) => t,
        }
    }
}

impl Transformer for Stage {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn fit(&mut self, data: &Dataset) -> Result<()> {
        self.inner_mut().fit(data)
    }

    fn transform(&self, data: &Dataset) -> Result<Dataset> {
        self.inner().transform(data)
    }

    fn is_fitted(&self) -> bool {
        self.inner().is_fitted()
    }

    fn fit_transform(&mut self, data: &Dataset) -> Result<Dataset> {
        self.inner_mut().fit_transform(data)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    steps: Vec<(String, Stage)>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, name: impl Into<String>, stage: Stage) -> Self {
        self.steps.push((name.into(), stage));
        self
    }

    pub fn steps(&self) -> &[(String, Stage)] {
        &self.steps
    }

    pub fn step(&self, name: &str) -> Option<&Stage> {
        self.steps
            .iter()
            .find(|(step_name, _)| step_name == name)
            .map(|(_, stage)| stage)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Обучает стадии по очереди; последняя стадия только обучается
    pub fn fit(&mut self, reference: &Dataset) -> Result<&mut Self> {
        let mut current = reference.clone();
        let n_steps = self.steps.len();

        for (i, (name, stage)) in self.steps.iter_mut().enumerate() {
            if i + 1 == n_steps {
                stage.fit(&current)?;
            } else {
                current = stage.fit_transform(&current)?;
            }
            tracing::debug!("Pipeline step '{}' ({}) fitted", name, stage.name());
        }

        tracing::info!(
            "Pipeline fitted: {} steps on {} rows",
            n_steps,
            reference.n_rows()
        );
        Ok(self)
    }

    pub fn transform(&self, data: &Dataset) -> Result<Dataset> {
        let mut current = data.clone();
        for (_, stage) in &self.steps {
            current = stage.transform(&current)?;
        }
        Ok(current)
    }

    pub fn fit_transform(&mut self, reference: &Dataset) -> Result<Dataset> {
        let mut current = reference.clone();
        for (_, stage) in self.steps.iter_mut() {
            current = stage.fit_transform(&current)?;
        }
        tracing::info!(
            "Pipeline fitted: {} steps on {} rows",
            self.steps.len(),
            reference.n_rows()
        );
        Ok(current)
    }

    pub fn is_fitted(&self) -> bool {
        self.steps.iter().all(|(_, stage)| stage.is_fitted())
    }
}

/// Импутация -> агрегация просрочек -> винзоризация -> log1p -> MinMax
pub fn make_preprocess_pipeline(config: &PipelineConfig) -> Result<Pipeline> {
    config.validate()?;

    Ok(Pipeline::new()
        .add(
            "mi_imputer",
            Stage::Imputer(RegressionImputer::monthly_income(&config.monthly_income_model)),
        )
        .add(
            "nd_imputer",
            Stage::Imputer(RegressionImputer::number_of_dependents(&config.dependents_model)),
        )
        .add("pastdue", Stage::PastDue(PastDueAggregator::new()))
        .add("winsor", Stage::Winsorizer(Winsorizer::new(config.winsor_quantile)?))
        .add("log", Stage::Log(LogTransformer::new(config.log_columns.iter().cloned())))
        .add("scaler", Stage::Scaler(MinMaxScaler::new())))
}

pub fn make_feature_pipeline() -> Pipeline {
    Pipeline::new().add("poly", Stage::Polynomial(PolynomialFeatures::new()))
}
