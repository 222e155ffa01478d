use thiserror::Error;

/// Outcome of one failed upstream attempt, retained for diagnostics.
#[derive(Debug, Clone)]
pub struct UpstreamFailure {
    pub endpoint: String,
    pub cause: String,
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("No client subnet configured for region {0}")]
    RegionNotConfigured(&'static str),

    #[error("Unsupported transport: {0}")]
    UnsupportedTransport(String),

    #[error("Missing 'dns' query parameter")]
    MissingQueryParameter,

    #[error("Invalid base64 in 'dns' parameter: {0}")]
    InvalidQueryEncoding(String),

    #[error("Malformed DNS message: {0}")]
    MalformedQuery(String),

    #[error("Failed to encode DNS message: {0}")]
    EncodeFailure(String),

    #[error("No upstream resolvers configured")]
    NoUpstreamsConfigured,

    #[error("All {} upstream resolvers failed", .0.len())]
    AllUpstreamsFailed(Vec<UpstreamFailure>),

    #[error("Internal error: {0}")]
    Internal(String),
}
