//! Lookup kinds offered by the service.
//!
//! Each module defines the wire request/response shapes of one endpoint, the
//! status codes that endpoint is known to return, and the mapping to the
//! public record.

pub mod cep;
pub mod cnpj;
pub mod cpf;

pub use cep::CepLookup;
pub use cnpj::CnpjLookup;
pub use cpf::CpfLookup;
