use poem::{Server, listener::TcpListener};
use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;
use weather_station::{
    api::{self, EnvironmentApi},
    config::Config,
    db::{self, SqliteRepository},
    error::BsError,
    service::MeasurementService,
    telemetry,
};

#[tokio::main]
async fn main() -> Result<(), BsError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let (writer, _log_guard) = telemetry::log_writer(config.log_dir.as_deref(), "weather-station.log");
    let subscriber = telemetry::get_subscriber("weather-station".to_string(), &config.log_level, writer);
    telemetry::init_subscriber(subscriber)?;

    let db_pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.query_timeout)
        .connect(&config.database_url)
        .await?;
    if config.run_migrations {
        info!("Applying roll-up table migrations");
        db::migrate(&db_pool).await?;
    }

    let repository = SqliteRepository::new(db_pool);
    let service = MeasurementService::new(repository, config.query_timeout);
    let listen_address = config.listen_address();
    let app = api::routes(
        EnvironmentApi::new(service),
        &format!("http://{listen_address}"),
    );

    info!(address = %listen_address, "Serving measurements");
    Server::new(TcpListener::bind(listen_address)).run(app).await?;
    Ok(())
}
