//! Error types for the wrapper.
//!
//! # Design
//! Build-time failures (`InvalidOption`, `InvalidMethod`, `InvalidUrl`) are
//! raised before any I/O and abort the request entirely. `MalformedBody` is
//! recoverable: it carries the raw body so the caller can still inspect it.
//! Transport failures are passed through without retry or reclassification.

use thiserror::Error;

/// Errors returned by the build, send and decode pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Option name matched neither the transport table nor the behavior
    /// flag set. Raised during build, before any network activity.
    #[error("invalid option '{0}'")]
    InvalidOption(String),

    /// Method string outside the supported GET/POST/PUT/PATCH/DELETE set.
    #[error("invalid method '{0}'")]
    InvalidMethod(String),

    /// URL failed to parse, or its scheme is outside the allowed protocol
    /// set. Checked before any I/O.
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Request parameters could not be form-encoded.
    #[error("parameter encoding failed: {0}")]
    Serialization(String),

    /// Response body failed to parse per its content type. The raw body
    /// stays accessible here.
    #[error("malformed {content_type} body: {reason}")]
    MalformedBody {
        content_type: String,
        reason: String,
        raw: String,
    },

    /// Non-2xx status with `fail_on_error` enabled; forwarded from the
    /// transport as-is.
    #[error("HTTP error ({status})")]
    Status { status: u16, body: String },

    /// Request timeout reported by the transport.
    #[error("request timeout")]
    Timeout,

    /// Any other transport failure (connection refused, TLS, protocol).
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Error::Status {
                status: code,
                body: String::new(),
            },
            ureq::Error::Timeout(_) => Error::Timeout,
            other => Error::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_option_display_names_the_option() {
        let err = Error::InvalidOption("bogus_flag".to_string());
        assert_eq!(format!("{err}"), "invalid option 'bogus_flag'");
    }

    #[test]
    fn malformed_body_keeps_the_raw_body() {
        let err = Error::MalformedBody {
            content_type: "json".to_string(),
            reason: "expected value".to_string(),
            raw: "{not json".to_string(),
        };
        if let Error::MalformedBody { raw, .. } = &err {
            assert_eq!(raw, "{not json");
        } else {
            panic!("expected MalformedBody");
        }
    }

    #[test]
    fn status_error_display_shows_the_code() {
        let err = Error::Status {
            status: 418,
            body: String::new(),
        };
        assert_eq!(format!("{err}"), "HTTP error (418)");
    }
}
