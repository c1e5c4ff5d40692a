use std::future::Future;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::debug;

use crate::error::{BsError, StorageError};

mod query;

pub use query::MeasurementQuery;

/// One row of a roll-up table, as stored.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RollupRow {
    pub timestamp: String,
    pub temp_avg: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity_avg: f64,
    pub humidity_min: f64,
    pub humidity_max: f64,
    pub pressure_avg: f64,
    pub pressure_min: f64,
    pub pressure_max: f64,
}

/// Read access to the roll-up tables.
pub trait Repository: Send + Sync {
    /// Returns at most `query.limit` of the newest rows of the queried table, newest first.
    /// The limit must be applied by the store, not by the caller.
    fn fetch_rollups(
        &self,
        query: &MeasurementQuery,
    ) -> impl Future<Output = Result<Vec<RollupRow>, StorageError>> + Send;
}

#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Single-connection in-memory database with the roll-up tables created.
    pub async fn open_memory() -> Result<Self, BsError> {
        let options = SqliteConnectOptions::new().filename(":memory:");
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        migrate(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Repository for SqliteRepository {
    async fn fetch_rollups(&self, query: &MeasurementQuery) -> Result<Vec<RollupRow>, StorageError> {
        // Table names come from a closed enum, never from the request.
        let sql = format!(
            "SELECT timestamp, temp_avg, temp_min, temp_max, \
             humidity_avg, humidity_min, humidity_max, \
             pressure_avg, pressure_min, pressure_max \
             FROM {} ORDER BY timestamp DESC LIMIT ?",
            query.granularity.table_name()
        );

        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, RollupRow>(&sql)
            .bind(query.sql_limit())
            .fetch_all(&mut *conn)
            .await?;

        debug!(table = query.granularity.table_name(), rows = rows.len(), "Fetched roll-ups");
        Ok(rows)
    }
}

/// Creates the roll-up tables if they do not exist.
pub async fn migrate(pool: &SqlitePool) -> Result<(), BsError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU64;

    use super::*;
    use crate::granularity::Granularity;

    async fn insert(repository: &SqliteRepository, table: &str, timestamp: &str, temp_avg: f64) {
        sqlx::query(&format!(
            "INSERT INTO {table} VALUES (?, ?, 60.0, 80.0, 40.0, 30.0, 50.0, 1013.0, 1000.0, 1025.0)"
        ))
        .bind(timestamp)
        .bind(temp_avg)
        .execute(repository.pool())
        .await
        .unwrap();
    }

    fn query(granularity: Granularity, limit: u64) -> MeasurementQuery {
        MeasurementQuery::new(granularity, NonZeroU64::new(limit).unwrap())
    }

    #[tokio::test]
    async fn limit_is_applied_by_the_store() {
        let repository = SqliteRepository::open_memory().await.unwrap();
        for hour in 0..5 {
            insert(&repository, "envDataHours", &format!("2024-01-01 0{hour}:00:00"), hour as f64).await;
        }

        let rows = repository.fetch_rollups(&query(Granularity::Hour, 3)).await.unwrap();

        assert_eq!(rows.len(), 3);
        let stamps: Vec<_> = rows.iter().map(|r| r.timestamp.as_str()).collect();
        assert_eq!(
            stamps,
            ["2024-01-01 04:00:00", "2024-01-01 03:00:00", "2024-01-01 02:00:00"]
        );
        assert_eq!(rows[0].temp_avg, 4.0);
        assert_eq!(rows[0].pressure_max, 1025.0);
    }

    #[tokio::test]
    async fn reads_only_the_resolved_table() {
        let repository = SqliteRepository::open_memory().await.unwrap();
        insert(&repository, "envDataMinute", "2024-01-01 00:01:00", 1.0).await;
        insert(&repository, "envDataDays", "2024-01-01 00:00:00", 2.0).await;

        let minutes = repository.fetch_rollups(&query(Granularity::Minute, 10)).await.unwrap();
        let hours = repository.fetch_rollups(&query(Granularity::Hour, 10)).await.unwrap();
        let days = repository.fetch_rollups(&query(Granularity::Day, 10)).await.unwrap();

        assert_eq!(minutes.len(), 1);
        assert_eq!(minutes[0].temp_avg, 1.0);
        assert!(hours.is_empty());
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].temp_avg, 2.0);
    }

    #[tokio::test]
    async fn huge_limit_reads_every_row() {
        let repository = SqliteRepository::open_memory().await.unwrap();
        insert(&repository, "envDataDays", "2024-01-01 00:00:00", 1.0).await;
        insert(&repository, "envDataDays", "2024-01-02 00:00:00", 2.0).await;

        let rows = repository
            .fetch_rollups(&query(Granularity::Day, 99_999_999_999))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn undecodable_value_is_a_query_error() {
        let repository = SqliteRepository::open_memory().await.unwrap();
        insert(&repository, "envDataHours", "2024-01-01 01:00:00", 1.0).await;
        sqlx::query(
            "INSERT INTO envDataHours VALUES ('2024-01-01 00:00:00', 'abc', 60.0, 80.0, 40.0, 30.0, 50.0, 1013.0, 1000.0, 1025.0)",
        )
        .execute(repository.pool())
        .await
        .unwrap();

        let result = repository.fetch_rollups(&query(Granularity::Hour, 10)).await;
        assert!(matches!(result, Err(StorageError::Query(_))));
    }

    #[tokio::test]
    async fn missing_table_is_a_query_error() {
        let options = SqliteConnectOptions::new().filename(":memory:");
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        let repository = SqliteRepository::new(pool);

        let result = repository.fetch_rollups(&query(Granularity::Day, 1)).await;
        assert!(matches!(result, Err(StorageError::Query(_))));
    }
}
