use crate::codec::{null_as_default, Envelope, Transacao, TransactionStatus, Transacted};
use crate::lookup::{Endpoint, LookupKind, ServiceRoot};
use crate::models::{format_br_date, parse_optional_br_date, Credentials, PessoaFisica, SituacaoCadastral};
use crate::status::{StatusRule, StatusTable, STATUS_DOCUMENTO_INVALIDO};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const STATUS_DATA_NASCIMENTO_OBRIGATORIA: &str = "P009M001";
pub const STATUS_DATA_NASCIMENTO_INVALIDA: &str = "P009M002";

/// Request body of `pessoafisicanfe.ashx`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsultaPessoaFisicaNfe {
    credenciais: Credentials,
    documento: String,
    /// DD/MM/YYYY
    data_nascimento: String,
}

impl ConsultaPessoaFisicaNfe {
    pub fn new(credenciais: Credentials, documento: &str, data_nascimento: NaiveDate) -> Self {
        Self {
            credenciais,
            documento: documento.to_string(),
            data_nascimento: format_br_date(data_nascimento),
        }
    }
}

/// Response body of `pessoafisicanfe.ashx`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PessoaFisicaResult {
    pub documento: Option<String>,
    pub nome: Option<String>,
    pub nome_social: Option<String>,
    pub data_nascimento: Option<String>,
    pub data_inscricao: Option<String>,
    pub ano_obito: Option<String>,
    pub mensagem_obito: Option<String>,
    pub codigo_situacao_cadastral: Option<String>,
    #[serde(rename = "SituacaoRFB")]
    pub situacao_rfb: Option<String>,
    #[serde(rename = "ProtocoloRFB")]
    pub protocolo_rfb: Option<String>,
    pub digito_verificador: Option<String>,
    pub mensagem: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub transacao: Transacao,
}

impl Transacted for PessoaFisicaResult {
    fn transaction_status(&self) -> TransactionStatus {
        TransactionStatus::from_wire(self.status, &self.transacao)
    }
}

/// Individual taxpayer lookup by CPF and birth date.
pub struct CpfLookup;

impl LookupKind for CpfLookup {
    const NAME: &'static str = "CPF";
    const ENDPOINT: Endpoint = Endpoint {
        root: ServiceRoot::RestServices,
        path: "cdc/pessoafisicanfe.ashx",
    };
    const ENVELOPE: Envelope = Envelope::Json;
    const STATUS_CODES: StatusTable = &[
        (STATUS_DOCUMENTO_INVALIDO, StatusRule::InvalidInput("o cpf informado é inválido")),
        (
            STATUS_DATA_NASCIMENTO_OBRIGATORIA,
            StatusRule::Validation("data de nascimento obrigatória"),
        ),
        (
            STATUS_DATA_NASCIMENTO_INVALIDA,
            StatusRule::Validation("data de nascimento inválida"),
        ),
    ];

    type Request = ConsultaPessoaFisicaNfe;
    type Response = PessoaFisicaResult;
    type Output = PessoaFisica;

    fn into_output(result: PessoaFisicaResult) -> PessoaFisica {
        let data_nascimento = result.data_nascimento.unwrap_or_default();
        PessoaFisica {
            data_nascimento: parse_optional_br_date("DataNascimento", &data_nascimento),
            situacao: result
                .codigo_situacao_cadastral
                .as_deref()
                .and_then(SituacaoCadastral::from_code),
            documento: result.documento.unwrap_or_default(),
            nome: result.nome.unwrap_or_default(),
            nome_social: result.nome_social.unwrap_or_default(),
        }
    }
}
