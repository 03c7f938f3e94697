//! API error taxonomy.

use thiserror::Error;

/// Class of a failed call, derived from the status code alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// No response was received (status 0).
    Network,
    /// 401: credentials rejected; the gateway already cleared the token.
    Unauthorized,
    /// 403: the plan does not permit this, or a usage limit was hit.
    Entitlement,
    /// Any other non-2xx status.
    Server,
}

impl FailureKind {
    /// Classify a non-success status.
    pub fn from_status(status: u16) -> Self {
        match status {
            0 => Self::Network,
            401 => Self::Unauthorized,
            403 => Self::Entitlement,
            _ => Self::Server,
        }
    }
}

/// Error returned by typed calls built on the gateway.
///
/// Display is the user-facing message, suitable for a notification.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server could not be reached.
    #[error("{message}")]
    Network {
        /// Connectivity message.
        message: String,
    },

    /// Authentication failure (401).
    #[error("{message}")]
    Unauthorized {
        /// Message extracted from the response.
        message: String,
    },

    /// Entitlement or limit failure (403).
    #[error("{message}")]
    Entitlement {
        /// Message extracted from the response.
        message: String,
    },

    /// Any other non-2xx response.
    #[error("{message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response.
        message: String,
    },

    /// Success payload didn't match the expected shape.
    #[error("unexpected response from server: {0}")]
    Decode(#[from] serde_json::Error),

    /// Success payload lacked a required field.
    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl ApiError {
    /// Build the error for a failed response.
    pub fn from_failure(status: u16, message: String) -> Self {
        match FailureKind::from_status(status) {
            FailureKind::Network => Self::Network { message },
            FailureKind::Unauthorized => Self::Unauthorized { message },
            FailureKind::Entitlement => Self::Entitlement { message },
            FailureKind::Server => Self::Server { status, message },
        }
    }

    /// Failure class, if this error came from a response.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::Network { .. } => Some(FailureKind::Network),
            Self::Unauthorized { .. } => Some(FailureKind::Unauthorized),
            Self::Entitlement { .. } => Some(FailureKind::Entitlement),
            Self::Server { .. } => Some(FailureKind::Server),
            Self::Decode(_) | Self::MissingField(_) | Self::Client(_) => None,
        }
    }

    /// HTTP status, if this error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { .. } => Some(0),
            Self::Unauthorized { .. } => Some(401),
            Self::Entitlement { .. } => Some(403),
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}
