use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use geodoh_domain::RelayError;
use tracing::warn;

pub struct ApiError(pub RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            RelayError::UnknownRoute(_) | RelayError::RegionNotConfigured(_) => {
                (StatusCode::NOT_FOUND, self.0.to_string())
            }

            RelayError::UnsupportedTransport(_)
            | RelayError::MissingQueryParameter
            | RelayError::InvalidQueryEncoding(_)
            | RelayError::MalformedQuery(_)
            | RelayError::EncodeFailure(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),

            RelayError::AllUpstreamsFailed(causes) => {
                for cause in causes {
                    warn!(endpoint = %cause.endpoint, cause = %cause.cause, "Upstream failed");
                }
                (StatusCode::BAD_GATEWAY, self.0.to_string())
            }

            RelayError::NoUpstreamsConfigured | RelayError::Internal(_) => {
                warn!(error = %self.0, "Internal fault while handling query");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        (status, message).into_response()
    }
}
