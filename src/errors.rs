use std::fmt;
use thiserror::Error;

/// Why a call stopped waiting for the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller cancelled the call context.
    Cancelled,
    /// The call context deadline elapsed.
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Cancelled => write!(f, "context cancelled"),
            CancelReason::DeadlineExceeded => write!(f, "context deadline exceeded"),
        }
    }
}

/// Failure raised by a [`Transport`](crate::transport::Transport) before any
/// response was received.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(err.to_string())
    }
}

/// Every way a lookup can fail.
///
/// A subject that does not exist is not represented here: it is a successful
/// call that yields the default result (see [`Outcome`](crate::lookup::Outcome)).
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    /// The request payload could not be serialized.
    #[error("failed to build the request body: {0}")]
    Encode(String),
    /// The response was not well-formed XML/JSON or lacked the expected result.
    #[error("could not decode the service response: {0}")]
    Decode(String),
    /// The service rejected the identifier itself (malformed CEP, CPF, CNPJ).
    #[error("{description} ({code})")]
    InvalidInput { code: String, description: String },
    /// A kind-specific auxiliary field is missing or invalid.
    #[error("{reason} ({code})")]
    Validation { code: String, reason: String },
    /// The configured e-mail/password pair was refused.
    #[error("credenciais inválidas ({code})")]
    InvalidCredentials { code: String },
    /// The service failed while processing; a later attempt may succeed.
    #[error("ocorreu um erro e não foi possível realizar a consulta ({code})")]
    TransientFailure { code: String },
    /// The service reported itself unavailable.
    #[error("serviço indisponível no momento ({code})")]
    ServiceUnavailable { code: String },
    /// The service answered with a status code outside the known vocabulary.
    #[error("{code}: {description}")]
    UnknownFailure { code: String, description: String },
    /// A response arrived with a non-success HTTP status.
    #[error("service returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    /// The call context was cancelled or hit its deadline first.
    #[error("lookup aborted: {0}")]
    Cancelled(CancelReason),
    /// The network exchange failed before a response was received.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
}

impl LookupError {
    /// Vendor status code behind this error, when the service supplied one.
    pub fn status_code(&self) -> Option<&str> {
        match self {
            LookupError::InvalidInput { code, .. }
            | LookupError::Validation { code, .. }
            | LookupError::InvalidCredentials { code }
            | LookupError::TransientFailure { code }
            | LookupError::ServiceUnavailable { code }
            | LookupError::UnknownFailure { code, .. } => Some(code),
            _ => None,
        }
    }

    /// True for the two cancellation flavours.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LookupError::Cancelled(_))
    }
}

impl From<quick_xml::DeError> for LookupError {
    fn from(err: quick_xml::DeError) -> Self {
        LookupError::Decode(err.to_string())
    }
}

impl From<quick_xml::Error> for LookupError {
    fn from(err: quick_xml::Error) -> Self {
        LookupError::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_is_exposed_for_vendor_errors() {
        let err = LookupError::InvalidCredentials {
            code: "G000M000".to_string(),
        };
        assert_eq!(err.status_code(), Some("G000M000"));
        assert_eq!(err.to_string(), "credenciais inválidas (G000M000)");

        let err = LookupError::Cancelled(CancelReason::DeadlineExceeded);
        assert_eq!(err.status_code(), None);
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_unknown_failure_carries_raw_code_and_description() {
        let err = LookupError::UnknownFailure {
            code: "X999M999".to_string(),
            description: "erro desconhecido".to_string(),
        };
        assert_eq!(err.to_string(), "X999M999: erro desconhecido");
    }
}
