use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// In-band request failure: an HTTP status plus a human-readable message.
///
/// Every error a middleware or route handler propagates is normalized into
/// this type, and all of them converge on the application's terminal
/// error-rendering stage. The `IntoResponse` impl stashes a clone of the
/// error in the response extensions so that stage can recover the original
/// message after the inner service has run.
#[derive(Clone, Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for HttpError {}

/// Errors without a declared status default to 500.
impl From<eyre::Report> for HttpError {
    fn from(report: eyre::Report) -> Self {
        tracing::error!("Unhandled error: {:?}", report);
        Self::internal(report.to_string())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.message.clone()).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Fallback handler for requests no mounted route matched.
///
/// Synthesizes the 404 condition and forwards it into the error path
/// instead of responding directly.
pub async fn not_found() -> HttpError {
    HttpError::not_found()
}
