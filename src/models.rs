use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Date layout used by the service for every date field, in both directions.
pub const BR_DATE_FORMAT: &str = "%d/%m/%Y";

// ============ Credentials ============

/// Account credentials sent inside every request body.
///
/// Owned by the client for its whole lifetime and never modified by a lookup.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Account e-mail.
    #[serde(rename = "Email")]
    pub email: String,
    /// Account password.
    #[serde(rename = "Senha")]
    pub senha: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, senha: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            senha: senha.into(),
        }
    }
}

// Keep the password out of logs and panic messages
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("senha", &"[REDACTED]")
            .finish()
    }
}

// ============ CEP ============

/// Address resolved from a postal code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cep {
    pub cep: String,
    pub uf: String,
    pub tipo_logradouro: String,
    pub logradouro_completo: String,
    pub logradouro_complemento: String,
    pub bairro: String,
    pub cidade: String,
    pub codigo_ibge: String,
}

// ============ Pessoa Física ============

/// Registration state of a CPF at the Receita Federal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SituacaoCadastral {
    Regular,
    Suspensa,
    TitularFalecido,
    CanceladaPorMultiplicidade,
    PendenteRegularizacao,
    CanceladaOficio,
    CanceladaEncerramento,
    Cancelada,
    Nula,
    Inexistente,
    DadosIncompletos,
}

impl SituacaoCadastral {
    pub const ALL: [SituacaoCadastral; 11] = [
        SituacaoCadastral::Regular,
        SituacaoCadastral::Suspensa,
        SituacaoCadastral::TitularFalecido,
        SituacaoCadastral::CanceladaPorMultiplicidade,
        SituacaoCadastral::PendenteRegularizacao,
        SituacaoCadastral::CanceladaOficio,
        SituacaoCadastral::CanceladaEncerramento,
        SituacaoCadastral::Cancelada,
        SituacaoCadastral::Nula,
        SituacaoCadastral::Inexistente,
        SituacaoCadastral::DadosIncompletos,
    ];

    /// Numeric code used by the service (`CodigoSituacaoCadastral`).
    pub fn code(self) -> u8 {
        match self {
            SituacaoCadastral::Regular => 1,
            SituacaoCadastral::Suspensa => 2,
            SituacaoCadastral::TitularFalecido => 3,
            SituacaoCadastral::CanceladaPorMultiplicidade => 4,
            SituacaoCadastral::PendenteRegularizacao => 5,
            SituacaoCadastral::CanceladaOficio => 6,
            SituacaoCadastral::CanceladaEncerramento => 7,
            SituacaoCadastral::Cancelada => 8,
            SituacaoCadastral::Nula => 9,
            SituacaoCadastral::Inexistente => 12,
            SituacaoCadastral::DadosIncompletos => 13,
        }
    }

    /// Parses a `CodigoSituacaoCadastral` value. Codes 10 and 11 are not
    /// assigned by the Receita Federal and map to `None`, like blanks.
    pub fn from_code(code: &str) -> Option<Self> {
        let numeric: u8 = code.trim().parse().ok()?;
        Self::ALL.into_iter().find(|s| s.code() == numeric)
    }
}

/// Individual taxpayer record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PessoaFisica {
    pub documento: String,
    pub nome: String,
    pub nome_social: String,
    /// `None` when the service omitted the date or sent one that does not parse.
    pub data_nascimento: Option<NaiveDate>,
    pub situacao: Option<SituacaoCadastral>,
}

// ============ Pessoa Jurídica ============

/// Main economic activity (Classificação Nacional de Atividades Econômicas).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cnae {
    pub codigo: String,
    pub descricao: String,
}

/// Legal nature classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NaturezaJuridica {
    pub codigo: String,
    pub descricao: String,
}

/// Company record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PessoaJuridica {
    pub documento: String,
    pub razao_social: String,
    pub nome_fantasia: String,
    pub data_fundacao: Option<NaiveDate>,
    /// Head office (`MATRIZ`) rather than a branch.
    pub matriz: bool,
    pub cnae: Cnae,
    pub natureza_juridica: NaturezaJuridica,
    pub email: String,
    pub telefone: String,
}

// ============ Date helpers ============

/// Parse Brazilian date format (DD/MM/YYYY) to chrono::NaiveDate
pub fn parse_br_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str.trim(), BR_DATE_FORMAT)
}

/// Format a date the way the service expects it (DD/MM/YYYY)
pub fn format_br_date(date: NaiveDate) -> String {
    date.format(BR_DATE_FORMAT).to_string()
}

/// Parses an auxiliary date field, degrading to `None` on blanks and
/// malformed values so a bad date never fails an otherwise good lookup.
pub(crate) fn parse_optional_br_date(field: &str, value: &str) -> Option<NaiveDate> {
    if value.trim().is_empty() {
        return None;
    }
    match parse_br_date(value) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!("Ignoring unparseable {} '{}': {}", field, value, e);
            None
        }
    }
}
