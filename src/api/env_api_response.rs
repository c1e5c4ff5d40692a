use poem_openapi::{
    ApiResponse,
    payload::{Json, PlainText},
    types::ToJSON,
};

use crate::error::MeasurementError;

/// Returned for every server side failure. Details go to the log only.
pub const INTERNAL_ERROR_MESSAGE: &str = "A problem occurred reading weather information";

#[derive(Debug, ApiResponse)]
pub enum EnvironmentApiResponse<T: ToJSON + Send> {
    #[oai(status = 200)]
    Ok(Json<T>),
    #[oai(status = 400)]
    ClientError(PlainText<String>),
    #[oai(status = 500)]
    InternalServerError(PlainText<String>),
}

impl<T: ToJSON + Send> From<Result<T, MeasurementError>> for EnvironmentApiResponse<T> {
    fn from(result: Result<T, MeasurementError>) -> Self {
        match result {
            Ok(body) => Self::Ok(Json(body)),
            Err(e) if e.is_client_error() => {
                tracing::debug!("Rejected request: {e}");
                Self::ClientError(PlainText(e.to_string()))
            }
            Err(e) => {
                tracing::error!(error = ?e, "Failed to serve measurements: {e}");
                Self::InternalServerError(PlainText(INTERNAL_ERROR_MESSAGE.to_string()))
            }
        }
    }
}
