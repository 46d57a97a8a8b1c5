//! Агрегация счетчиков просрочек

use crate::error::Result;
use crate::preprocessing::traits::Transformer;
use crate::types::{Dataset, PAST_DUE_30_59, PAST_DUE_60_89, PAST_DUE_90, PAST_DUE_AGGREGATED};

const PAST_DUE_COLUMNS: [&str; 3] = [PAST_DUE_30_59, PAST_DUE_60_89, PAST_DUE_90];

/// Сворачивает три счетчика просрочек в `PastDueAggregated`.
///
/// Новая колонка добавляется в конец, исходные удаляются (ширина уменьшается на 2).
/// Пропуск в любом из слагаемых дает пропуск в сумме.
#[derive(Debug, Clone, Default)]
pub struct PastDueAggregator;

impl PastDueAggregator {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for PastDueAggregator {
    fn name(&self) -> &'static str {
        "PastDueAggregator"
    }

    fn fit(&mut self, _data: &Dataset) -> Result<()> {
        Ok(())
    }

    fn transform(&self, data: &Dataset) -> Result<Dataset> {
        let counts = data.select(&PAST_DUE_COLUMNS, self.name())?;
        let total = counts.rows().into_iter().map(|row| row.sum()).collect();

        tracing::debug!("{}: aggregated {} rows", self.name(), data.n_rows());

        data.drop_columns(&PAST_DUE_COLUMNS, self.name())?
            .with_column(PAST_DUE_AGGREGATED, total)
    }
}
