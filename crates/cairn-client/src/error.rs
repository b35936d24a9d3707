use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The bind endpoint explicitly denied the token exchange.
    #[error("support session bind rejected ({status}): {message}")]
    BindRejected { status: u16, message: String },
    /// The request never produced a usable response (connect, timeout, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// A 2xx response whose body did not match the documented shape.
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse {
        endpoint: &'static str,
        reason: String,
    },
    /// A non-2xx status from a non-bind endpoint.
    #[error("request to {endpoint} failed with status {status}")]
    UnexpectedStatus { endpoint: &'static str, status: u16 },
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Whether a retry could plausibly succeed without operator action.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Transport(_) => true,
            ClientError::UnexpectedStatus { status, .. } => *status >= 500,
            ClientError::BindRejected { .. } | ClientError::MalformedResponse { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_and_malformed_are_terminal() {
        let rejected = ClientError::BindRejected {
            status: 401,
            message: "invalid token".to_string(),
        };
        assert!(!rejected.is_transient());
        assert!(rejected.to_string().contains("invalid token"));

        let malformed = ClientError::MalformedResponse {
            endpoint: "support/impersonation/bind",
            reason: "missing field `mode`".to_string(),
        };
        assert!(!malformed.is_transient());
    }

    #[test]
    fn server_errors_are_transient() {
        let err = ClientError::UnexpectedStatus {
            endpoint: "users/me/permissions",
            status: 503,
        };
        assert!(err.is_transient());

        let err = ClientError::UnexpectedStatus {
            endpoint: "users/me/permissions",
            status: 404,
        };
        assert!(!err.is_transient());
    }
}
