//! Credit risk prep - конвейеры предобработки для датасета вероятности дефолта

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod types;

pub use config::PipelineConfig;
pub use error::{PreprocessingError, Result};
pub use models::{load_model, LinearModel, Regressor};
pub use pipeline::{make_feature_pipeline, make_preprocess_pipeline, Pipeline, Stage};
pub use preprocessing::*;
pub use types::Dataset;
