//! Bearer authentication and response status mapping.

use reqwest::{RequestBuilder, Response, StatusCode};

use campus_core::error::AppError;

/// Attach a bearer token to a request.
pub(crate) trait WithAuth {
    fn with_auth(self, token: Option<&str>) -> Self;
}

impl WithAuth for RequestBuilder {
    fn with_auth(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.bearer_auth(token),
            None => self,
        }
    }
}

/// Map a transport-level failure.
pub(crate) fn map_reqwest(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::timeout(format!("Request timed out: {err}"))
    } else if err.is_decode() {
        AppError::data_shape(format!("Unexpected response body: {err}"))
    } else if let Some(status) = err.status() {
        map_status(status, &err.to_string())
    } else {
        AppError::transport(format!("Request failed: {err}"))
    }
}

/// Map a non-success status. Server errors are transport errors so they
/// are retried; client errors are not.
pub(crate) fn map_status(status: StatusCode, detail: &str) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AppError::authentication(format!("{status}: {detail}"))
        }
        StatusCode::NOT_FOUND => AppError::not_found(format!("{status}: {detail}")),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            AppError::timeout(format!("{status}: {detail}"))
        }
        s if s.is_server_error() => AppError::transport(format!("{status}: {detail}")),
        _ => AppError::validation(format!("{status}: {detail}")),
    }
}

/// Pass successful responses through, map the rest.
pub(crate) async fn check(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(map_status(status, body.trim()))
}
