use std::time::Duration;

/// Process level failures: startup, configuration and serving.
#[derive(Debug, thiserror::Error)]
pub enum BsError {
    #[error("Network error while serving: {0}")]
    Network(#[from] std::io::Error),
    #[error("Config parsing error: {0}")]
    Config(#[from] dotenvy::Error),
    #[error("Invalid value for {variable}: {reason}")]
    InvalidConfig { variable: &'static str, reason: String },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Failed to install log subscriber: {0}")]
    Telemetry(#[from] tracing::subscriber::SetGlobalDefaultError),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Roll-up query failed: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Roll-up query exceeded its deadline of {0:?}")]
    Timeout(Duration),
}

/// Failures of a single measurements request.
#[derive(Debug, thiserror::Error)]
pub enum MeasurementError {
    #[error("Request parameter '{0}' is required")]
    MissingParameter(&'static str),
    #[error("Only one '{0}' request parameter allowed")]
    TooManyParameters(&'static str),
    #[error("Invalid request parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("Reading roll-up records failed: {0}")]
    StorageReadFailure(#[from] StorageError),
    #[error("Stored timestamp {timestamp:?} is malformed: {source}")]
    DataCorruption {
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl MeasurementError {
    /// Whether the caller caused the failure (bad parameters) rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter(_) | Self::TooManyParameters(_) | Self::InvalidParameter { .. }
        )
    }
}
