use crate::codec::{null_as_default, Envelope, Transacao, TransactionStatus, Transacted};
use crate::lookup::{Endpoint, LookupKind, ServiceRoot};
use crate::models::{parse_optional_br_date, Cnae, Credentials, NaturezaJuridica, PessoaJuridica};
use crate::status::{StatusRule, StatusTable, STATUS_DOCUMENTO_INVALIDO};
use serde::{Deserialize, Serialize};

/// Value of `MatrizFilial` for a head office.
const MATRIZ: &str = "MATRIZ";

/// Request body of `pessoajuridicanfe.ashx`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsultaPessoaJuridicaNfe {
    credenciais: Credentials,
    documento: String,
}

impl ConsultaPessoaJuridicaNfe {
    pub fn new(credenciais: Credentials, documento: &str) -> Self {
        Self {
            credenciais,
            documento: documento.to_string(),
        }
    }
}

/// Response body of `pessoajuridicanfe.ashx`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PessoaJuridicaResult {
    pub documento: Option<String>,
    pub razao_social: Option<String>,
    pub nome_fantasia: Option<String>,
    pub data_fundacao: Option<String>,
    pub matriz_filial: Option<String>,
    pub capital: Option<String>,
    pub codigo_atividade_economica: Option<String>,
    pub codigo_atividade_economica_descricao: Option<String>,
    pub codigo_natureza_juridica: Option<String>,
    pub codigo_natureza_juridica_descricao: Option<String>,
    #[serde(rename = "SituacaoRFB")]
    pub situacao_rfb: Option<String>,
    #[serde(rename = "DataSituacaoRFB")]
    pub data_situacao_rfb: Option<String>,
    #[serde(rename = "MotivoSituacaoRFB")]
    pub motivo_situacao_rfb: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub mensagem: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub transacao: Transacao,
}

impl Transacted for PessoaJuridicaResult {
    fn transaction_status(&self) -> TransactionStatus {
        TransactionStatus::from_wire(self.status, &self.transacao)
    }
}

/// Company lookup by CNPJ.
pub struct CnpjLookup;

impl LookupKind for CnpjLookup {
    const NAME: &'static str = "CNPJ";
    const ENDPOINT: Endpoint = Endpoint {
        root: ServiceRoot::RestServices,
        path: "cdc/pessoajuridicanfe.ashx",
    };
    const ENVELOPE: Envelope = Envelope::Json;
    const STATUS_CODES: StatusTable = &[(
        STATUS_DOCUMENTO_INVALIDO,
        StatusRule::InvalidInput("o cnpj informado é inválido"),
    )];

    type Request = ConsultaPessoaJuridicaNfe;
    type Response = PessoaJuridicaResult;
    type Output = PessoaJuridica;

    fn into_output(result: PessoaJuridicaResult) -> PessoaJuridica {
        let data_fundacao = result.data_fundacao.unwrap_or_default();
        PessoaJuridica {
            data_fundacao: parse_optional_br_date("DataFundacao", &data_fundacao),
            matriz: result
                .matriz_filial
                .as_deref()
                .is_some_and(|m| m.trim().eq_ignore_ascii_case(MATRIZ)),
            documento: result.documento.unwrap_or_default(),
            razao_social: result.razao_social.unwrap_or_default(),
            nome_fantasia: result.nome_fantasia.unwrap_or_default(),
            cnae: Cnae {
                codigo: result.codigo_atividade_economica.unwrap_or_default(),
                descricao: result.codigo_atividade_economica_descricao.unwrap_or_default(),
            },
            natureza_juridica: NaturezaJuridica {
                codigo: result.codigo_natureza_juridica.unwrap_or_default(),
                descricao: result.codigo_natureza_juridica_descricao.unwrap_or_default(),
            },
            email: result.email.unwrap_or_default(),
            telefone: result.telefone.unwrap_or_default(),
        }
    }
}
