use env_api_response::EnvironmentApiResponse;
use poem::{Endpoint, EndpointExt, Route, middleware::Tracing};
use poem_openapi::{OpenApi, OpenApiService, param::Query};

use crate::db::Repository;
use crate::measurement::Measurement;
use crate::service::MeasurementService;

mod env_api_response;

pub use env_api_response::INTERNAL_ERROR_MESSAGE;

pub struct EnvironmentApi<R> {
    pub service: MeasurementService<R>,
}

impl<R> EnvironmentApi<R> {
    pub fn new(service: MeasurementService<R>) -> Self {
        Self { service }
    }
}

#[OpenApi]
impl<R> EnvironmentApi<R>
where
    R: Repository + 'static,
{
    /// Newest roll-up measurements of the station.
    ///
    /// `type` selects minute (`m`), hour (`h`) or day (`d`) buckets and must be
    /// given exactly once. `limit` caps the number of buckets returned.
    #[oai(method = "get", path = "/measurements")]
    async fn get_measurements(
        &self,
        #[oai(name = "type")] rollup: Query<Option<Vec<String>>>,
        limit: Query<Option<Vec<String>>>,
    ) -> EnvironmentApiResponse<Vec<Measurement>> {
        let types = rollup.0.unwrap_or_default();
        let limits = limit.0.unwrap_or_default();
        self.service.get_measurements(&types, &limits).await.into()
    }
}

/// Measurement API with its OpenAPI document at `/openapi.json` and Swagger UI at `/docs`.
pub fn routes<R>(api: EnvironmentApi<R>, server_url: &str) -> impl Endpoint + use<R>
where
    R: Repository + 'static,
{
    let api_service = OpenApiService::new(api, "Weather station", env!("CARGO_PKG_VERSION"))
        .server(server_url);
    let spec = api_service.spec_endpoint();
    let ui = api_service.swagger_ui();

    Route::new()
        .nest("/docs", ui)
        .at("/openapi.json", spec)
        .nest("/", api_service)
        .with(Tracing)
}
