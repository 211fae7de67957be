use crate::errors::TransportError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

/// Status and fully-read body of an HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// "Send bytes, get bytes back" capability the lookups run on.
///
/// Implementations own their pooling, TLS and socket timeouts and must be
/// safe to share between concurrent calls.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs `body` to `url` and reads the whole response body.
    async fn exchange(
        &self,
        url: &str,
        content_type: &'static str,
        body: Vec<u8>,
    ) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn exchange(
        &self,
        url: &str,
        content_type: &'static str,
        body: Vec<u8>,
    ) -> Result<TransportResponse, TransportError> {
        let response = reqwest::Client::post(self, url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse { status, body })
    }
}
