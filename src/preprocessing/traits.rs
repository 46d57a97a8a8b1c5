//! Общий интерфейс стадий конвейера

use crate::error::Result;
use crate::types::Dataset;

/// Стадия предобработки с двухфазным контрактом fit/transform.
///
/// `fit` выводит параметры из эталонного набора и меняет состояние стадии на месте.
/// `transform` - чистая функция от (входной набор, параметры), вход не изменяется.
/// Stateless-стадии готовы к `transform` сразу, остальные до `fit` возвращают `NotFitted`.
pub trait Transformer {
    fn name(&self) -> &'static str;

    fn fit(&mut self, data: &Dataset) -> Result<()>;

    fn transform(&self, data: &Dataset) -> Result<Dataset>;

    fn is_fitted(&self) -> bool {
        true
    }

    fn fit_transform(&mut self, data: &Dataset) -> Result<Dataset> {
        self.fit(data)?;
        self.transform(data)
    }
}
