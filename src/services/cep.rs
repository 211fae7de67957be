use crate::codec::{Envelope, Transacao, TransactionStatus, Transacted, SERVICE_NAMESPACE};
use crate::lookup::{Endpoint, LookupKind, ServiceRoot};
use crate::models::{Cep, Credentials};
use crate::status::{StatusRule, StatusTable};
use serde::{Deserialize, Serialize};

pub const STATUS_CEP_INVALIDO: &str = "P016M001";
pub const STATUS_CEP_NAO_ENCONTRADO: &str = "P016M002";
pub const STATUS_CEP_FALHA_PROCESSAMENTO: &str = "P016M009";
pub const STATUS_CEP_SERVICO_INDISPONIVEL: &str = "P016M010";

/// `ConsultaCEPEstendida` SOAP operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename = "ConsultaCEPEstendida")]
pub struct ConsultaCepEstendida {
    #[serde(rename = "@xmlns")]
    namespace: &'static str,
    #[serde(rename = "Credenciais")]
    credenciais: Credentials,
    #[serde(rename = "CEP")]
    cep: String,
}

impl ConsultaCepEstendida {
    pub fn new(credenciais: Credentials, cep: &str) -> Self {
        Self {
            namespace: SERVICE_NAMESPACE,
            credenciais,
            cep: cep.to_string(),
        }
    }
}

/// `ConsultaCEPEstendidaResult` element of the SOAP response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConsultaCepEstendidaResult {
    #[serde(rename = "CEP")]
    pub cep: String,
    #[serde(rename = "UF")]
    pub uf: String,
    pub tipo_logradouro: String,
    pub logradouro_completo: String,
    pub logradouro_complemento: String,
    pub bairro: String,
    pub cidade: String,
    #[serde(rename = "CodigoIBGE")]
    pub codigo_ibge: String,
    pub mensagem: String,
    pub status: bool,
    pub transacao: Transacao,
}

impl Transacted for ConsultaCepEstendidaResult {
    fn transaction_status(&self) -> TransactionStatus {
        TransactionStatus::from_wire(self.status, &self.transacao)
    }
}

/// Address lookup by postal code.
pub struct CepLookup;

impl LookupKind for CepLookup {
    const NAME: &'static str = "CEP";
    const ENDPOINT: Endpoint = Endpoint {
        root: ServiceRoot::WebServices,
        path: "cep/cep.asmx",
    };
    const ENVELOPE: Envelope = Envelope::Soap {
        result_element: "ConsultaCEPEstendidaResult",
    };
    const STATUS_CODES: StatusTable = &[
        (STATUS_CEP_INVALIDO, StatusRule::InvalidInput("o cep informado é inválido")),
        (STATUS_CEP_FALHA_PROCESSAMENTO, StatusRule::TransientFailure),
        (STATUS_CEP_SERVICO_INDISPONIVEL, StatusRule::ServiceUnavailable),
        (STATUS_CEP_NAO_ENCONTRADO, StatusRule::NotFound),
    ];

    type Request = ConsultaCepEstendida;
    type Response = ConsultaCepEstendidaResult;
    type Output = Cep;

    fn into_output(result: ConsultaCepEstendidaResult) -> Cep {
        Cep {
            cep: result.cep,
            uf: result.uf,
            tipo_logradouro: result.tipo_logradouro,
            logradouro_completo: result.logradouro_completo,
            logradouro_complemento: result.logradouro_complemento,
            bairro: result.bairro,
            cidade: result.cidade,
            codigo_ibge: result.codigo_ibge,
        }
    }
}
