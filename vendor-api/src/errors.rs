use crate::router::Endpoint;
use crate::service::ResponseBody;
use hyper::{Method, Response, StatusCode};
use notion::StoreError;
use serde::Serialize;
use shared::http::{json_response, make_boxed_error_response};

#[derive(thiserror::Error, Debug)]
pub enum VendorApiError {
    #[error("Token is required")]
    MissingToken,

    #[error("Organization not found for token")]
    OrganizationNotFound,

    #[error("Method {method} not allowed, expected {expected}")]
    MethodNotAllowed { method: Method, expected: Method },

    #[error("Not found")]
    NotFound,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// An outbound call whose failure aborts the request.
    #[error("{step} failed: {source}")]
    Upstream {
        step: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Hyper error: {0}")]
    Hyper(#[from] hyper::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl VendorApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            VendorApiError::MissingToken | VendorApiError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            VendorApiError::OrganizationNotFound | VendorApiError::NotFound => {
                StatusCode::NOT_FOUND
            }
            VendorApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            VendorApiError::Upstream { .. }
            | VendorApiError::Hyper(_)
            | VendorApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client errors carry only `error`. Server errors carry the endpoint's
    /// summary in `error` and the underlying message in `details`.
    pub fn into_response(self, endpoint: Endpoint) -> Response<ResponseBody> {
        let status = self.status();
        let message = self.to_string();

        let body = if status.is_server_error() {
            tracing::error!(endpoint = endpoint.name(), error = %message, "Request failed");
            ErrorBody {
                error: endpoint.failure_summary(),
                details: Some(message),
            }
        } else {
            tracing::info!(endpoint = endpoint.name(), status = %status, error = %message, "Rejected request");
            ErrorBody {
                error: &message,
                details: None,
            }
        };

        json_response(status, &body).unwrap_or_else(|_| make_boxed_error_response(status))
    }

    /// Response for errors raised before an endpoint is known.
    pub fn into_client_response(self) -> Response<ResponseBody> {
        let status = self.status();
        let message = self.to_string();
        let body = ErrorBody {
            error: &message,
            details: None,
        };
        json_response(status, &body).unwrap_or_else(|_| make_boxed_error_response(status))
    }
}
