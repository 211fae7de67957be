/// Property-based tests using proptest
/// Tests invariants of the codec, the status translator and the date helpers
use chrono::NaiveDate;
use proptest::prelude::*;
use soa_webservices::codec::{TransactionStatus, Transacao};
use soa_webservices::lookup::LookupKind;
use soa_webservices::models::{format_br_date, parse_br_date, Credentials};
use soa_webservices::services::cep::{ConsultaCepEstendida, ConsultaCepEstendidaResult};
use soa_webservices::services::cnpj::{ConsultaPessoaJuridicaNfe, PessoaJuridicaResult};
use soa_webservices::services::cpf::{ConsultaPessoaFisicaNfe, PessoaFisicaResult};
use soa_webservices::services::{CepLookup, CnpjLookup, CpfLookup};
use soa_webservices::status::{translate, Verdict, SHARED_STATUS_CODES};
use soa_webservices::LookupError;

fn credentials() -> Credentials {
    Credentials::new("test@test.com", "test")
}

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (1900i32..=2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

// Property: dates survive the dd/mm/yyyy format
proptest! {
    #[test]
    fn br_date_round_trips(date in any_date()) {
        let text = format_br_date(date);
        prop_assert_eq!(text.len(), 10);
        prop_assert_eq!(parse_br_date(&text).unwrap(), date);
    }

    #[test]
    fn br_date_parse_never_panics(text in "\\PC*") {
        let _ = parse_br_date(&text);
    }
}

// Property: identifying fields reach the wire byte for byte
proptest! {
    #[test]
    fn cpf_request_carries_document_and_date(
        documento in "[0-9.\\-]{0,20}",
        date in any_date()
    ) {
        let request = ConsultaPessoaFisicaNfe::new(credentials(), &documento, date);
        let body = CpfLookup::ENVELOPE.encode(&request).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        prop_assert_eq!(json["Documento"].as_str().unwrap(), documento.as_str());
        let sent = json["DataNascimento"].as_str().unwrap();
        prop_assert_eq!(parse_br_date(sent).unwrap(), date);
    }

    #[test]
    fn cnpj_request_carries_document(documento in "\\PC{0,30}") {
        let request = ConsultaPessoaJuridicaNfe::new(credentials(), &documento);
        let body = CnpjLookup::ENVELOPE.encode(&request).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        prop_assert_eq!(json["Documento"].as_str().unwrap(), documento.as_str());
    }

    #[test]
    fn cep_request_escapes_markup(cep in "[0-9<&\\-]{0,12}") {
        let request = ConsultaCepEstendida::new(credentials(), &cep);
        let body = String::from_utf8(CepLookup::ENVELOPE.encode(&request).unwrap()).unwrap();
        let escaped = cep.replace('&', "&amp;").replace('<', "&lt;");

        let expected = format!("<CEP>{}</CEP>", escaped);
        prop_assert!(body.contains(&expected));
    }
}

// Property: documents in a decoded response survive the field mapping
proptest! {
    #[test]
    fn cnpj_response_document_round_trips(
        documento in "[0-9]{14}",
        date in any_date()
    ) {
        let json = serde_json::json!({
            "Documento": documento,
            "DataFundacao": format_br_date(date),
            "Status": true,
            "Transacao": {"Status": true, "CodigoStatus": "G000M001", "CodigoStatusDescricao": "OK"}
        });
        let decoded = CnpjLookup::ENVELOPE
            .decode::<PessoaJuridicaResult>(json.to_string().as_bytes())
            .unwrap();
        let empresa = CnpjLookup::into_output(decoded.payload);

        prop_assert_eq!(empresa.documento, documento);
        prop_assert_eq!(empresa.data_fundacao, Some(date));
    }

    #[test]
    fn cpf_response_document_round_trips(documento in "[0-9]{11}") {
        let json = serde_json::json!({
            "Documento": documento,
            "Status": true,
            "Transacao": {"Status": true, "CodigoStatus": "G000M001", "CodigoStatusDescricao": "OK"}
        });
        let decoded = CpfLookup::ENVELOPE
            .decode::<PessoaFisicaResult>(json.to_string().as_bytes())
            .unwrap();

        prop_assert_eq!(CpfLookup::into_output(decoded.payload).documento, documento);
    }

    #[test]
    fn cep_response_fields_round_trip(
        cep in "[0-9]{8}",
        cidade in "[A-Z ]{1,30}"
    ) {
        let cidade = cidade.trim().to_string();
        prop_assume!(!cidade.is_empty());
        let xml = format!(
            "<soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\"><soap:Body><ConsultaCEPEstendidaResponse xmlns=\"SOAWebServices\"><ConsultaCEPEstendidaResult><CEP>{}</CEP><Cidade>{}</Cidade><Status>true</Status><Transacao><Status>true</Status><CodigoStatus>G000M001</CodigoStatus><CodigoStatusDescricao>OK</CodigoStatusDescricao></Transacao></ConsultaCEPEstendidaResult></ConsultaCEPEstendidaResponse></soap:Body></soap:Envelope>",
            cep, cidade
        );
        let decoded = CepLookup::ENVELOPE
            .decode::<ConsultaCepEstendidaResult>(xml.as_bytes())
            .unwrap();
        let address = CepLookup::into_output(decoded.payload);

        prop_assert_eq!(address.cep, cep);
        prop_assert_eq!(address.cidade, cidade);
    }
}

// Property: decoding and translation never panic
proptest! {
    #[test]
    fn json_decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = CnpjLookup::ENVELOPE.decode::<PessoaJuridicaResult>(&bytes);
    }

    #[test]
    fn soap_decode_never_panics(text in "\\PC*") {
        let _ = CepLookup::ENVELOPE.decode::<ConsultaCepEstendidaResult>(text.as_bytes());
    }

    #[test]
    fn soap_decode_tolerates_bom_and_multibyte_text(
        bom in any::<bool>(),
        noise in "[a-zçãé€\\x{FEFF} ]{0,12}",
        cep in "[0-9]{8}"
    ) {
        let xml = format!(
            "{}<soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\"><soap:Body>{}<ConsultaCEPEstendidaResponse xmlns=\"SOAWebServices\">{}<ConsultaCEPEstendidaResult><CEP>{}</CEP><Status>true</Status><Transacao><Status>true</Status><CodigoStatus>G000M001</CodigoStatus></Transacao></ConsultaCEPEstendidaResult></ConsultaCEPEstendidaResponse></soap:Body></soap:Envelope>",
            if bom { "\u{feff}" } else { "" },
            noise,
            noise,
            cep
        );
        let decoded = CepLookup::ENVELOPE
            .decode::<ConsultaCepEstendidaResult>(xml.as_bytes())
            .unwrap();

        prop_assert_eq!(decoded.payload.cep, cep);
        prop_assert_eq!(decoded.status.code, "G000M001");
    }

    #[test]
    fn credentials_code_wins_for_every_kind(success in any::<bool>(), description in "\\PC{0,20}") {
        let status = TransactionStatus::from_wire(
            success,
            &Transacao {
                status: success,
                codigo_status: "G000M000".to_string(),
                codigo_status_descricao: description,
            },
        );

        for table in [CepLookup::STATUS_CODES, CpfLookup::STATUS_CODES, CnpjLookup::STATUS_CODES, SHARED_STATUS_CODES] {
            let verdict = translate(table, &status);
            let is_invalid_credentials = matches!(verdict, Verdict::Failure(LookupError::InvalidCredentials { .. }));
            prop_assert!(is_invalid_credentials);
        }
    }

    #[test]
    fn unclaimed_failure_codes_are_unknown(code in "X[0-9]{3}M[0-9]{3}") {
        let status = TransactionStatus {
            success: false,
            code: code.clone(),
            description: "erro".to_string(),
        };
        let verdict = translate(CpfLookup::STATUS_CODES, &status);
        let is_unknown = matches!(verdict, Verdict::Failure(LookupError::UnknownFailure { code: ref c, .. }) if *c == code);
        prop_assert!(is_unknown);
    }
}
