//! Error types for the Telegraph API client.
//!
//! # Design
//! Three kinds of failure reach the caller: a local argument check rejected
//! the call before anything was sent (`InvalidArgument`), the service answered
//! with `ok: false` (`Api`), or the exchange itself failed. The last kind is
//! split into `Http`, `Transport` and `Deserialization` so callers can see what
//! went wrong; `is_transport` groups them back together.

use thiserror::Error;

/// Errors returned by `TelegraphClient`, `Telegraph` and `TokenClient`.
#[derive(Error, Debug)]
pub enum TelegraphError {
    /// Caller-supplied arguments are structurally invalid. Raised before any
    /// request is sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The service replied with `ok: false`. Carries its `error` string as is.
    #[error("telegraph error: {0}")]
    Api(String),

    /// The server returned a non-success status and no envelope.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The transport could not complete the exchange.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be decoded into the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl TelegraphError {
    /// True for failures of the call-and-parse step itself, as opposed to
    /// local validation or a service-side `ok: false`.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TelegraphError::Http { .. }
                | TelegraphError::Transport(_)
                | TelegraphError::Deserialization(_)
        )
    }

    /// The service's error string, if this is an `Api` error.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            TelegraphError::Api(message) => Some(message),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TelegraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_kind_groups_exchange_failures() {
        assert!(TelegraphError::Transport("reset".into()).is_transport());
        assert!(TelegraphError::Deserialization("eof".into()).is_transport());
        assert!(TelegraphError::Http {
            status: 502,
            body: String::new()
        }
        .is_transport());
        assert!(!TelegraphError::Api("PAGE_NOT_FOUND".into()).is_transport());
        assert!(!TelegraphError::InvalidArgument("".into()).is_transport());
    }

    #[test]
    fn api_message_is_verbatim() {
        let err = TelegraphError::Api("PAGE_NOT_FOUND".into());
        assert_eq!(err.api_message(), Some("PAGE_NOT_FOUND"));
        assert_eq!(err.to_string(), "telegraph error: PAGE_NOT_FOUND");
    }
}
