use std::time::Duration;

use tracing::{Instrument, debug, info_span};

use crate::db::{MeasurementQuery, Repository};
use crate::error::{MeasurementError, StorageError};
use crate::measurement::Measurement;

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Validates measurement requests, runs them against the repository and
/// turns the stored rows into [`Measurement`]s.
#[derive(Debug, Clone)]
pub struct MeasurementService<R> {
    repository: R,
    query_timeout: Duration,
}

impl<R> MeasurementService<R>
where
    R: Repository,
{
    pub fn new(repository: R, query_timeout: Duration) -> Self {
        Self {
            repository,
            query_timeout,
        }
    }

    #[cfg(test)]
    pub(crate) fn repository(&self) -> &R {
        &self.repository
    }

    /// Either every row of the response, or an error. Never a partial list.
    pub async fn get_measurements<T, L>(
        &self,
        types: &[T],
        limits: &[L],
    ) -> Result<Vec<Measurement>, MeasurementError>
    where
        T: AsRef<str>,
        L: AsRef<str>,
    {
        let query = MeasurementQuery::from_params(types, limits)?;
        let span = info_span!(
            "get_measurements",
            granularity = query.granularity.code(),
            limit = query.limit.get()
        );
        self.run(query).instrument(span).await
    }

    async fn run(&self, query: MeasurementQuery) -> Result<Vec<Measurement>, MeasurementError> {
        let rows = tokio::time::timeout(self.query_timeout, self.repository.fetch_rollups(&query))
            .await
            .map_err(|_| StorageError::Timeout(self.query_timeout))??;

        debug!(rows = rows.len(), "Converting roll-up rows");
        rows.into_iter()
            .map(|row| Measurement::from_row(query.granularity, row))
            .collect()
    }
}
