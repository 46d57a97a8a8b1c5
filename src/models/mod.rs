/// Модели импутации

pub mod linear;

pub use linear::{load_model, LinearModel, Regressor};
