//! Ошибки предобработки

use std::path::PathBuf;
use thiserror::Error;

/// Ошибка любой стадии конвейера предобработки.
///
/// Все ошибки синхронно возвращаются вызывающему коду, повторов нет.
/// Стадия либо преобразует все строки, либо завершается ошибкой до выдачи результата.
#[derive(Debug, Error)]
pub enum PreprocessingError {
    /// Артефакт модели отсутствует, не читается или не совпадает по схеме
    #[error("Failed to load model from {path}: {message}")]
    Load { path: PathBuf, message: String },

    /// Колонка, на которую ссылается стадия, отсутствует во входных данных
    #[error("{stage}: missing column '{column}'")]
    MissingColumn { stage: &'static str, column: String },

    /// Значение вне области определения (например, log1p от x <= -1)
    #[error("{stage}: value {value} in column '{column}' at row {row} is out of domain")]
    NumericDomain {
        stage: &'static str,
        column: String,
        row: usize,
        value: f64,
    },

    /// Пропуск там, где нужно число (предиктор импутации)
    #[error("{stage}: missing value in column '{column}' at row {row}")]
    MissingValues {
        stage: &'static str,
        column: String,
        row: usize,
    },

    #[error("{0} is not fitted")]
    NotFitted(&'static str),

    #[error("{0}: cannot fit on empty data")]
    EmptyData(&'static str),

    /// Набор колонок при transform не совпадает с набором при fit
    #[error("{stage}: column mismatch, expected {expected:?}, got {got:?}")]
    ColumnMismatch {
        stage: &'static str,
        expected: Vec<String>,
        got: Vec<String>,
    },

    #[error("Invalid shape: expected {expected}, got {got}")]
    InvalidShape { expected: String, got: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, PreprocessingError>;

impl PreprocessingError {
    pub fn load(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Load {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn missing_column(stage: &'static str, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            stage,
            column: column.into(),
        }
    }
}
