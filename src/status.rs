//! Vendor status-code translation.
//!
//! Each lookup kind owns a flat table of the codes it knows; one shared table
//! holds the codes common to every kind. A code resolves to the rule with the
//! lowest precedence rank across both tables. Codes nobody claims fall back to
//! the success flag.

use crate::codec::TransactionStatus;
use crate::errors::LookupError;

/// Credentials refused. Same code on every endpoint.
pub const STATUS_CREDENCIAIS_INVALIDAS: &str = "G000M000";
/// Malformed CPF/CNPJ document.
pub const STATUS_DOCUMENTO_INVALIDO: &str = "G000M003";

/// What a known status code means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRule {
    /// The identifier was rejected; carries the human-readable reason.
    InvalidInput(&'static str),
    TransientFailure,
    ServiceUnavailable,
    InvalidCredentials,
    /// An auxiliary field was missing or invalid; carries the reason.
    Validation(&'static str),
    /// The subject does not exist. Not an error.
    NotFound,
}

impl StatusRule {
    /// Rank used when a code is claimed by more than one rule; lower wins.
    pub fn precedence(&self) -> u8 {
        match self {
            StatusRule::InvalidInput(_) => 0,
            StatusRule::TransientFailure => 1,
            StatusRule::ServiceUnavailable => 2,
            StatusRule::InvalidCredentials => 3,
            StatusRule::Validation(_) => 4,
            StatusRule::NotFound => 5,
        }
    }

    fn verdict(self, status: &TransactionStatus) -> Verdict {
        let code = status.code.clone();
        match self {
            StatusRule::InvalidInput(reason) => Verdict::Failure(LookupError::InvalidInput {
                code,
                description: reason.to_string(),
            }),
            StatusRule::TransientFailure => {
                Verdict::Failure(LookupError::TransientFailure { code })
            }
            StatusRule::ServiceUnavailable => {
                Verdict::Failure(LookupError::ServiceUnavailable { code })
            }
            StatusRule::InvalidCredentials => {
                Verdict::Failure(LookupError::InvalidCredentials { code })
            }
            StatusRule::Validation(reason) => Verdict::Failure(LookupError::Validation {
                code,
                reason: reason.to_string(),
            }),
            StatusRule::NotFound => Verdict::NotFound,
        }
    }
}

/// Status code to rule mapping for one lookup kind.
pub type StatusTable = &'static [(&'static str, StatusRule)];

/// Codes every endpoint may return.
pub const SHARED_STATUS_CODES: StatusTable = &[(
    STATUS_CREDENCIAIS_INVALIDAS,
    StatusRule::InvalidCredentials,
)];

/// Translated meaning of one response.
#[derive(Debug)]
pub enum Verdict {
    /// Map the payload to the public record.
    Value,
    /// Return the empty record without error.
    NotFound,
    Failure(LookupError),
}

/// Looks up the rule for `code` in the kind table and the shared table.
pub fn rule_for(table: StatusTable, code: &str) -> Option<StatusRule> {
    table
        .iter()
        .chain(SHARED_STATUS_CODES.iter())
        .filter(|(known, _)| *known == code)
        .map(|(_, rule)| *rule)
        .min_by_key(StatusRule::precedence)
}

/// Interprets a transaction status against a kind's status table.
pub fn translate(table: StatusTable, status: &TransactionStatus) -> Verdict {
    match rule_for(table, &status.code) {
        Some(rule) => rule.verdict(status),
        None if !status.success => Verdict::Failure(LookupError::UnknownFailure {
            code: status.code.clone(),
            description: status.description.clone(),
        }),
        None => Verdict::Value,
    }
}
