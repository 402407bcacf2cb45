//! # VC API Errors

use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors returned when calling an implementation's VC API.
#[derive(Error, Debug)]
pub enum Error {
    /// The implementation responded with a non-success status code. The
    /// parsed response body, if any, is carried in `data`.
    #[error("{status}: {}", .data.as_ref().map_or_else(String::new, Value::to_string))]
    Status {
        /// HTTP status returned by the implementation.
        status: StatusCode,

        /// Response body, when it was JSON.
        data: Option<Value>,
    },

    /// The request could not be sent or the response could not be read.
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    /// An access token could not be obtained for the endpoint.
    #[error("authorization: {0}")]
    Authorization(String),

    /// An implementation manifest is missing, malformed, or inconsistent.
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),
}

impl Error {
    /// The HTTP status code of a `Status` error.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The response body of a `Status` error.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        match self {
            Self::Status { data, .. } => data.as_ref(),
            _ => None,
        }
    }
}

/// Construct an `Error::InvalidManifest` error from a string or existing
/// error value.
macro_rules! invalid {
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::InvalidManifest(format!($fmt, $($arg)*))
    };
     ($err:expr $(,)?) => {
        $crate::Error::InvalidManifest(format!($err))
    };
}
pub(crate) use invalid;
