//! SOA WebServices lookup client
//!
//! Address lookup by CEP over SOAP, and individual (CPF) and company (CNPJ)
//! lookups over JSON, against the SOA WebServices API.
//!
//! # Modules
//!
//! - `client`: `SoaClient` and the per-lookup service traits.
//! - `codec`: SOAP and JSON envelopes, `Transacao` status extraction.
//! - `config`: Environment-based configuration.
//! - `dispatcher`: Cancellable network exchange and `CallContext`.
//! - `errors`: Error handling types.
//! - `lookup`: The generic lookup pipeline and `LookupKind`.
//! - `models`: Public records returned by the lookups.
//! - `services`: Wire shapes and status tables of each lookup kind.
//! - `status`: Vendor status code translation.
//! - `transport`: HTTP transport abstraction.

pub mod client;
pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod lookup;
pub mod models;
pub mod services;
pub mod status;
pub mod transport;

pub use client::{CepService, LookupClient, PessoaFisicaService, PessoaJuridicaService, SoaClient};
pub use config::{Ambiente, Config};
pub use dispatcher::CallContext;
pub use errors::{CancelReason, LookupError, TransportError};
pub use lookup::{LookupKind, Outcome};
pub use models::{
    Cep, Cnae, Credentials, NaturezaJuridica, PessoaFisica, PessoaJuridica, SituacaoCadastral,
};
