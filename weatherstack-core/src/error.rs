//! Error type shared by the historical call and the HTTP transport.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherstackError {
    #[error("StartDate must be smaller or equal to EndDate.")]
    InvalidRange,

    #[error("Maximum time frame of {max_days} days exceeded.")]
    RangeTooWide { max_days: i64 },

    #[error("Request to weatherstack failed")]
    Request(#[from] reqwest::Error),

    #[error("weatherstack request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Error envelope returned by the service, usually with HTTP 200.
    #[error("weatherstack error {code} ({kind}): {info}")]
    Api { code: i64, kind: String, info: String },

    #[error("Failed to decode weatherstack response")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid weatherstack URL '{0}'")]
    InvalidUrl(String, #[source] url::ParseError),
}

impl WeatherstackError {
    /// Whether the error was raised locally before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidRange | Self::RangeTooWide { .. })
    }

    /// Whether repeating the same call right away could succeed.
    ///
    /// Service error envelopes never are: an exhausted monthly quota (104)
    /// only clears when the plan period resets.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(_) => true,
            Self::Status { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_match_upstream_wording() {
        assert_eq!(
            WeatherstackError::InvalidRange.to_string(),
            "StartDate must be smaller or equal to EndDate."
        );
        assert_eq!(
            WeatherstackError::RangeTooWide { max_days: 60 }.to_string(),
            "Maximum time frame of 60 days exceeded."
        );
    }

    #[test]
    fn validation_errors_are_not_retryable() {
        assert!(WeatherstackError::InvalidRange.is_validation());
        assert!(WeatherstackError::RangeTooWide { max_days: 60 }.is_validation());
        assert!(!WeatherstackError::InvalidRange.is_retryable());
    }

    #[test]
    fn status_retryability() {
        let server = WeatherstackError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: String::new(),
        };
        let not_found = WeatherstackError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            body: String::new(),
        };

        assert!(server.is_retryable());
        assert!(!not_found.is_retryable());
        assert!(!not_found.is_validation());
    }

    #[test]
    fn usage_limit_is_not_retryable() {
        let err = WeatherstackError::Api {
            code: 104,
            kind: "usage_limit_reached".into(),
            info: "Your monthly API request volume has been reached.".into(),
        };

        assert!(!err.is_retryable());
        assert!(!err.is_validation());
    }

    #[test]
    fn api_error_display() {
        let err = WeatherstackError::Api {
            code: 101,
            kind: "invalid_access_key".into(),
            info: "You have not supplied a valid API Access Key.".into(),
        };

        let msg = err.to_string();
        assert!(msg.contains("101"));
        assert!(msg.contains("invalid_access_key"));
        assert!(!err.is_retryable());
    }
}
