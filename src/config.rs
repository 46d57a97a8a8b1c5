/// Конфигурация конвейера предобработки

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PreprocessingError, Result};
use crate::types::{DEBT_RATIO, PAST_DUE_AGGREGATED};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_monthly_income_model")]
    pub monthly_income_model: PathBuf,
    #[serde(default = "default_dependents_model")]
    pub dependents_model: PathBuf,
    #[serde(default = "default_winsor_quantile")]
    pub winsor_quantile: f64,
    #[serde(default = "default_log_columns")]
    pub log_columns: Vec<String>,
}

fn default_monthly_income_model() -> PathBuf {
    PathBuf::from("models/bayesian_mi.json")
}

fn default_dependents_model() -> PathBuf {
    PathBuf::from("models/bayesian_nd.json")
}

fn default_winsor_quantile() -> f64 {
    0.95
}

fn default_log_columns() -> Vec<String> {
    vec![DEBT_RATIO.to_string(), PAST_DUE_AGGREGATED.to_string()]
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            monthly_income_model: default_monthly_income_model(),
            dependents_model: default_dependents_model(),
            winsor_quantile: default_winsor_quantile(),
            log_columns: default_log_columns(),
        }
    }
}

impl PipelineConfig {
    /// Пути к моделям задаются явно, без глобальных констант
    pub fn with_models(monthly_income: impl Into<PathBuf>, dependents: impl Into<PathBuf>) -> Self {
        Self {
            monthly_income_model: monthly_income.into(),
            dependents_model: dependents.into(),
            ..Self::default()
        }
    }

    /// Чтение из JSON; отсутствующие поля берутся по умолчанию.
    /// Относительные пути к моделям разрешаются от каталога файла конфигурации.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_err = |message: String| PreprocessingError::Config {
            path: path.to_path_buf(),
            message,
        };

        let mut config: PipelineConfig = {
            let file = File::open(path).map_err(|e| config_err(e.to_string()))?;
            serde_json::from_reader(BufReader::new(file)).map_err(|e| config_err(e.to_string()))?
        };

        if let Some(base) = path.parent() {
            for model in [&mut config.monthly_income_model, &mut config.dependents_model] {
                if model.is_relative() {
                    *model = base.join(&*model);
                }
            }
        }

        config.validate().map_err(|e| config_err(e.to_string()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.winsor_quantile) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "winsor_quantile must be in [0, 1], got {}",
                self.winsor_quantile
            )));
        }
        if self.log_columns.iter().any(|c| c.is_empty()) {
            return Err(PreprocessingError::InvalidParameter(
                "log_columns contains an empty name".to_string(),
            ));
        }
        Ok(())
    }
}
