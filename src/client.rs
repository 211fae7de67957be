use crate::config::{Ambiente, Config};
use crate::dispatcher::{dispatch, CallContext, OutboundRequest};
use crate::errors::{LookupError, TransportError};
use crate::lookup::{interpret, LookupKind, Outcome};
use crate::models::{Cep, Credentials, PessoaFisica, PessoaJuridica};
use crate::services::cep::ConsultaCepEstendida;
use crate::services::cnpj::ConsultaPessoaJuridicaNfe;
use crate::services::cpf::ConsultaPessoaFisicaNfe;
use crate::services::{CepLookup, CnpjLookup, CpfLookup};
use crate::transport::Transport;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Client for the SOA WebServices lookups.
///
/// Cheap to clone; clones share the underlying transport. Holds no mutable
/// state, so concurrent lookups on one client are independent.
#[derive(Clone)]
pub struct SoaClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    ambiente: Ambiente,
    credentials: Credentials,
}

impl SoaClient {
    /// Creates a client over an arbitrary transport.
    ///
    /// # Arguments
    ///
    /// * `transport` - Performs the HTTP exchanges.
    /// * `base_url` - Scheme and host of the service, e.g. `https://soawebservices.com.br`.
    /// * `ambiente` - Environment segment of every endpoint URL.
    /// * `credentials` - Account sent with every request.
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        ambiente: Ambiente,
        credentials: Credentials,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            ambiente,
            credentials,
        }
    }

    /// Creates a client backed by a `reqwest::Client` using the configured
    /// socket timeout.
    pub fn from_config(config: &Config) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                TransportError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self::new(
            Arc::new(http),
            config.base_url.clone(),
            config.ambiente,
            config.credentials.clone(),
        ))
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn ambiente(&self) -> Ambiente {
        self.ambiente
    }

    /// Runs one lookup of kind `K` end to end: encode, dispatch, decode and
    /// translate the status.
    ///
    /// Returns [`Outcome::NotFound`] when the service answers that the subject
    /// does not exist.
    pub async fn lookup<K: LookupKind>(
        &self,
        ctx: &CallContext,
        request: K::Request,
    ) -> Result<Outcome<K::Output>, LookupError> {
        let span = tracing::info_span!("lookup", kind = K::NAME, call_id = %Uuid::new_v4());

        async move {
            let body = K::ENVELOPE.encode(&request)?;
            let url = K::ENDPOINT.url(&self.base_url, self.ambiente);
            tracing::info!("Starting {} lookup", K::NAME);
            tracing::debug!("POST {} ({} bytes)", url, body.len());

            let outbound = OutboundRequest {
                url,
                content_type: K::ENVELOPE.content_type(),
                body,
            };
            let response = dispatch(Arc::clone(&self.transport), outbound, ctx).await?;
            tracing::debug!(
                "Received HTTP {} ({} bytes)",
                response.status,
                response.body.len()
            );

            let outcome = interpret::<K>(response)?;
            tracing::info!("{} lookup finished (found: {})", K::NAME, outcome.is_found());
            Ok::<_, LookupError>(outcome)
        }
        .instrument(span)
        .await
    }

    /// Looks up an address by postal code.
    ///
    /// An unknown CEP yields an empty [`Cep`].
    pub async fn consultar_cep(&self, ctx: &CallContext, cep: &str) -> Result<Cep, LookupError> {
        let request = ConsultaCepEstendida::new(self.credentials.clone(), cep);
        self.lookup::<CepLookup>(ctx, request)
            .await
            .map(Outcome::into_value)
    }

    /// Looks up an individual by CPF; the birth date is part of the query.
    pub async fn consultar_cpf(
        &self,
        ctx: &CallContext,
        cpf: &str,
        data_nascimento: NaiveDate,
    ) -> Result<PessoaFisica, LookupError> {
        let request = ConsultaPessoaFisicaNfe::new(self.credentials.clone(), cpf, data_nascimento);
        self.lookup::<CpfLookup>(ctx, request)
            .await
            .map(Outcome::into_value)
    }

    /// Looks up a company by CNPJ.
    pub async fn consultar_cnpj(
        &self,
        ctx: &CallContext,
        cnpj: &str,
    ) -> Result<PessoaJuridica, LookupError> {
        let request = ConsultaPessoaJuridicaNfe::new(self.credentials.clone(), cnpj);
        self.lookup::<CnpjLookup>(ctx, request)
            .await
            .map(Outcome::into_value)
    }
}

#[async_trait]
pub trait CepService: Send + Sync {
    async fn consultar_cep(&self, ctx: &CallContext, cep: &str) -> Result<Cep, LookupError>;
}

#[async_trait]
pub trait PessoaFisicaService: Send + Sync {
    async fn consultar_cpf(
        &self,
        ctx: &CallContext,
        cpf: &str,
        data_nascimento: NaiveDate,
    ) -> Result<PessoaFisica, LookupError>;
}

#[async_trait]
pub trait PessoaJuridicaService: Send + Sync {
    async fn consultar_cnpj(
        &self,
        ctx: &CallContext,
        cnpj: &str,
    ) -> Result<PessoaJuridica, LookupError>;
}

/// All three lookups behind one object, for callers that take `Arc<dyn LookupClient>`.
pub trait LookupClient: CepService + PessoaFisicaService + PessoaJuridicaService {}

impl<T> LookupClient for T where T: CepService + PessoaFisicaService + PessoaJuridicaService {}

#[async_trait]
impl CepService for SoaClient {
    async fn consultar_cep(&self, ctx: &CallContext, cep: &str) -> Result<Cep, LookupError> {
        SoaClient::consultar_cep(self, ctx, cep).await
    }
}

#[async_trait]
impl PessoaFisicaService for SoaClient {
    async fn consultar_cpf(
        &self,
        ctx: &CallContext,
        cpf: &str,
        data_nascimento: NaiveDate,
    ) -> Result<PessoaFisica, LookupError> {
        SoaClient::consultar_cpf(self, ctx, cpf, data_nascimento).await
    }
}

#[async_trait]
impl PessoaJuridicaService for SoaClient {
    async fn consultar_cnpj(
        &self,
        ctx: &CallContext,
        cnpj: &str,
    ) -> Result<PessoaJuridica, LookupError> {
        SoaClient::consultar_cnpj(self, ctx, cnpj).await
    }
}
