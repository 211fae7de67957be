use crate::codec::{Envelope, Transacted};
use crate::config::Ambiente;
use crate::errors::LookupError;
use crate::status::{translate, StatusTable, Verdict};
use crate::transport::TransportResponse;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Result of a lookup that reached the service and was understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Found(T),
    /// The service answered that the subject does not exist.
    NotFound,
}

impl<T> Outcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            Outcome::NotFound => None,
        }
    }
}

impl<T: Default> Outcome<T> {
    /// The found value, or the empty record for `NotFound`.
    pub fn into_value(self) -> T {
        self.found().unwrap_or_default()
    }
}

/// Top-level path segment of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceRoot {
    /// SOAP services
    WebServices,
    /// JSON services
    RestServices,
}

impl ServiceRoot {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceRoot::WebServices => "webservices",
            ServiceRoot::RestServices => "restservices",
        }
    }
}

/// Location of one lookup endpoint below the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub root: ServiceRoot,
    pub path: &'static str,
}

impl Endpoint {
    /// `{base_url}/{root}/{ambiente}/{path}`
    pub fn url(&self, base_url: &str, ambiente: Ambiente) -> String {
        format!(
            "{}/{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.root.as_str(),
            ambiente,
            self.path
        )
    }
}

/// Everything that distinguishes one lookup kind from another: where it is
/// sent, how it is framed, which status codes it knows and how the response
/// maps to the public record.
pub trait LookupKind {
    /// Short name used in logs.
    const NAME: &'static str;
    const ENDPOINT: Endpoint;
    const ENVELOPE: Envelope;
    const STATUS_CODES: StatusTable;

    type Request: Serialize + Send + 'static;
    type Response: DeserializeOwned + Transacted;
    type Output: Default + Send;

    fn into_output(response: Self::Response) -> Self::Output;
}

/// Turns the raw HTTP response of a `K` lookup into its outcome.
///
/// The body is decoded even on non-2xx statuses, since the service reports
/// business failures inside the body. The HTTP status only surfaces when the
/// body cannot be understood.
pub fn interpret<K: LookupKind>(
    response: TransportResponse,
) -> Result<Outcome<K::Output>, LookupError> {
    let decoded = match K::ENVELOPE.decode::<K::Response>(&response.body) {
        Ok(decoded) if !response.is_success() && decoded.status.code.is_empty() => {
            tracing::warn!(
                "{} lookup: HTTP {} without a vendor status",
                K::NAME,
                response.status
            );
            return Err(http_status(response));
        }
        Ok(decoded) => decoded,
        Err(e) if !response.is_success() => {
            tracing::warn!(
                "{} lookup: undecodable body with HTTP {}: {}",
                K::NAME,
                response.status,
                e
            );
            return Err(http_status(response));
        }
        Err(e) => return Err(e),
    };

    match translate(K::STATUS_CODES, &decoded.status) {
        Verdict::Value => Ok(Outcome::Found(K::into_output(decoded.payload))),
        Verdict::NotFound => {
            tracing::info!(
                "{} lookup: subject not found ({})",
                K::NAME,
                decoded.status.code
            );
            Ok(Outcome::NotFound)
        }
        Verdict::Failure(e) => {
            tracing::warn!("{} lookup failed: {}", K::NAME, e);
            Err(e)
        }
    }
}

fn http_status(response: TransportResponse) -> LookupError {
    LookupError::HttpStatus {
        status: response.status,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    }
}
