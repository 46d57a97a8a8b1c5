/// Модуль предобработки данных

pub mod aggregation;
pub mod feature_engineering;
pub mod imputation;
pub mod log_transform;
pub mod normalization;
pub mod traits;
pub mod winsorizer;

pub use aggregation::PastDueAggregator;
pub use feature_engineering::PolynomialFeatures;
pub use imputation::{RegressionImputer, Rounding};
pub use log_transform::LogTransformer;
pub use normalization::MinMaxScaler;
pub use traits::Transformer;
pub use winsorizer::Winsorizer;
