//! # Status Errors

use thiserror::Error;

/// Errors raised while locating or reading a credential's status.
#[derive(Error, Debug)]
pub enum Error {
    /// The credential carries no `credentialStatus` property.
    #[error("credential has no `credentialStatus`")]
    MissingStatus,

    /// The credential's status entry is not one of the supported types, or
    /// is missing required properties.
    #[error("unsupported credential status: {0}")]
    UnsupportedStatus(String),

    /// The status list credential could not be retrieved.
    #[error("issue fetching status list credential: {0}")]
    Fetch(String),

    /// The status list credential or its encoded list is malformed.
    #[error("invalid status list: {0}")]
    InvalidList(String),

    /// The status list index lies outside the decoded list.
    #[error("index {index} is out of range for a status list of {len} entries")]
    OutOfRange {
        /// The requested index.
        index: usize,

        /// The number of entries in the list.
        len: usize,
    },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Fetch(err.to_string())
    }
}

/// Construct an `Error::InvalidList` error from a string or existing error
/// value.
macro_rules! invalid {
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::InvalidList(format!($fmt, $($arg)*))
    };
     ($err:expr $(,)?) => {
        $crate::Error::InvalidList(format!($err))
    };
}
pub(crate) use invalid;
