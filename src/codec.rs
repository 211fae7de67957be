//! Wire formats used by the service.
//!
//! The CEP lookup speaks SOAP 1.1: the operation element is wrapped in a
//! `soap:Envelope`/`soap:Body` pair on the way out, and on the way back the
//! `<Operation>Result` element is located by local name wherever it sits in the
//! envelope. The document lookups take and return flat JSON objects.
//!
//! Every response, regardless of format, embeds a `Transacao` block. The codec
//! surfaces it as a [`TransactionStatus`] even when the business payload is
//! missing because the service refused the request.

use crate::errors::LookupError;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
pub const SOAP_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";
/// Default namespace of every SOAP operation element.
pub const SERVICE_NAMESPACE: &str = "SOAWebServices";

pub const CONTENT_TYPE_XML: &str = "text/xml";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// `Transacao` block as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Transacao {
    #[serde(rename = "Status", alias = "status", deserialize_with = "null_as_default")]
    pub status: bool,
    #[serde(rename = "CodigoStatus", deserialize_with = "null_as_default")]
    pub codigo_status: String,
    #[serde(rename = "CodigoStatusDescricao", deserialize_with = "null_as_default")]
    pub codigo_status_descricao: String,
}

/// Treats an explicit `null` like a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Success flag, status code and description reported by the service.
///
/// The code is authoritative: the service may report success while the code
/// says the subject was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionStatus {
    pub success: bool,
    pub code: String,
    pub description: String,
}

impl TransactionStatus {
    /// Builds the status from a response's top-level `Status` flag and its
    /// `Transacao` block.
    pub fn from_wire(success: bool, transacao: &Transacao) -> Self {
        Self {
            success,
            code: transacao.codigo_status.trim().to_string(),
            description: transacao.codigo_status_descricao.clone(),
        }
    }
}

/// Implemented by every decoded response so the pipeline can reach the status
/// without knowing the payload shape.
pub trait Transacted {
    fn transaction_status(&self) -> TransactionStatus;
}

/// A decoded response: the status plus the raw business payload.
#[derive(Debug)]
pub struct Decoded<R> {
    pub status: TransactionStatus,
    pub payload: R,
}

/// Outer wrapper of a request/response pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// SOAP envelope; responses carry the payload in `result_element`.
    Soap { result_element: &'static str },
    /// Flat JSON object, no wrapper.
    Json,
}

#[derive(Serialize)]
#[serde(rename = "soap:Envelope")]
struct SoapEnvelope<'a, T> {
    #[serde(rename = "@xmlns:xsi")]
    xsi: &'static str,
    #[serde(rename = "@xmlns:xsd")]
    xsd: &'static str,
    #[serde(rename = "@xmlns:soap")]
    soap: &'static str,
    #[serde(rename = "soap:Body")]
    body: SoapBody<'a, T>,
}

#[derive(Serialize)]
struct SoapBody<'a, T> {
    #[serde(rename = "$value")]
    content: &'a T,
}

impl Envelope {
    pub fn content_type(&self) -> &'static str {
        match self {
            Envelope::Soap { .. } => CONTENT_TYPE_XML,
            Envelope::Json => CONTENT_TYPE_JSON,
        }
    }

    /// Serializes a request payload into the bytes sent on the wire.
    pub fn encode<T: Serialize>(&self, payload: &T) -> Result<Vec<u8>, LookupError> {
        match self {
            Envelope::Soap { .. } => {
                let envelope = SoapEnvelope {
                    xsi: XSI_NAMESPACE,
                    xsd: XSD_NAMESPACE,
                    soap: SOAP_NAMESPACE,
                    body: SoapBody { content: payload },
                };
                quick_xml::se::to_string(&envelope)
                    .map(String::into_bytes)
                    .map_err(|e| LookupError::Encode(e.to_string()))
            }
            Envelope::Json => {
                serde_json::to_vec(payload).map_err(|e| LookupError::Encode(e.to_string()))
            }
        }
    }

    /// Decodes response bytes into the kind's response type.
    ///
    /// Fails with [`LookupError::Decode`] only when the bytes cannot be
    /// understood; business failures decode fine and show up in the status.
    pub fn decode<R>(&self, bytes: &[u8]) -> Result<Decoded<R>, LookupError>
    where
        R: DeserializeOwned + Transacted,
    {
        let payload: R = match self {
            Envelope::Soap { result_element } => {
                let xml = std::str::from_utf8(bytes)
                    .map_err(|e| LookupError::Decode(format!("response is not UTF-8: {}", e)))?;
                let fragment = find_element(xml, result_element)?;
                quick_xml::de::from_str(fragment)?
            }
            Envelope::Json => serde_json::from_slice(bytes)?,
        };

        Ok(Decoded {
            status: payload.transaction_status(),
            payload,
        })
    }
}

/// Returns the full text (start tag through end tag) of the first element
/// whose local name is `local_name`, ignoring namespace prefixes.
fn find_element<'x>(xml: &'x str, local_name: &str) -> Result<&'x str, LookupError> {
    // Reader offsets are counted after a leading BOM
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event()? {
            Event::Start(start) if start.local_name().as_ref() == local_name.as_bytes() => {
                // `<` + tag content + `>`
                let tag_start = (reader.buffer_position() as usize).checked_sub(start.len() + 2);
                let end = start.to_end().into_owned();
                reader.read_to_end(end.name())?;
                return slice_element(xml, tag_start, reader.buffer_position() as usize, local_name);
            }
            Event::Empty(start) if start.local_name().as_ref() == local_name.as_bytes() => {
                // `<` + tag content + `/>`
                let tag_start = (reader.buffer_position() as usize).checked_sub(start.len() + 3);
                return slice_element(xml, tag_start, reader.buffer_position() as usize, local_name);
            }
            Event::Eof => {
                return Err(LookupError::Decode(format!(
                    "response has no <{}> element",
                    local_name
                )));
            }
            _ => {}
        }
    }
}

/// Slices `start..end` out of `xml`, failing instead of panicking when the
/// offsets do not frame an element.
fn slice_element<'x>(
    xml: &'x str,
    start: Option<usize>,
    end: usize,
    local_name: &str,
) -> Result<&'x str, LookupError> {
    start
        .and_then(|start| xml.get(start..end))
        .filter(|fragment| fragment.starts_with('<'))
        .ok_or_else(|| {
            LookupError::Decode(format!(
                "could not isolate <{}> ending at byte {}",
                local_name, end
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename = "Ping")]
    struct Ping {
        #[serde(rename = "@xmlns")]
        namespace: &'static str,
        #[serde(rename = "Valor")]
        valor: String,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct PingResult {
        #[serde(rename = "Valor")]
        valor: String,
        #[serde(rename = "Status")]
        status: bool,
        #[serde(rename = "Transacao")]
        transacao: Transacao,
    }

    impl Transacted for PingResult {
        fn transaction_status(&self) -> TransactionStatus {
            TransactionStatus::from_wire(self.status, &self.transacao)
        }
    }

    const PING: Envelope = Envelope::Soap {
        result_element: "PingResult",
    };

    #[test]
    fn test_soap_encode_wraps_payload_in_envelope() {
        let body = PING
            .encode(&Ping {
                namespace: SERVICE_NAMESPACE,
                valor: "abc".to_string(),
            })
            .unwrap();
        let xml = String::from_utf8(body).unwrap();

        assert!(xml.starts_with("<soap:Envelope"));
        assert!(xml.contains(r#"xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/""#));
        assert!(xml.contains(r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#));
        assert!(xml.contains("<soap:Body><Ping xmlns=\"SOAWebServices\"><Valor>abc</Valor></Ping></soap:Body>"));
        assert!(xml.ends_with("</soap:Envelope>"));
    }

    #[test]
    fn test_soap_decode_finds_result_regardless_of_prefix() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<env:Envelope xmlns:env="http://schemas.xmlsoap.org/soap/envelope/">
  <env:Body>
    <PingResponse xmlns="SOAWebServices">
      <PingResult>
        <Valor>abc</Valor>
        <Status>true</Status>
        <Transacao>
          <Status>true</Status>
          <CodigoStatus>G000M001</CodigoStatus>
          <CodigoStatusDescricao>OK</CodigoStatusDescricao>
        </Transacao>
      </PingResult>
    </PingResponse>
  </env:Body>
</env:Envelope>"#;

        let decoded: Decoded<PingResult> = PING.decode(xml.as_bytes()).unwrap();
        assert_eq!(decoded.payload.valor, "abc");
        assert!(decoded.status.success);
        assert_eq!(decoded.status.code, "G000M001");
        assert_eq!(decoded.status.description, "OK");
    }

    #[test]
    fn test_soap_decode_tolerates_missing_payload() {
        let xml = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><PingResponse><PingResult><Status>false</Status><Transacao><Status>false</Status><CodigoStatus>G000M000</CodigoStatus><CodigoStatusDescricao>Credenciais invalidas</CodigoStatusDescricao></Transacao></PingResult></PingResponse></soap:Body></soap:Envelope>"#;

        let decoded: Decoded<PingResult> = PING.decode(xml.as_bytes()).unwrap();
        assert!(decoded.payload.valor.is_empty());
        assert!(!decoded.status.success);
        assert_eq!(decoded.status.code, "G000M000");
    }

    #[test]
    fn test_soap_decode_rejects_malformed_xml() {
        let err = PING
            .decode::<PingResult>(b"<soap:Envelope><soap:Body><PingResult><Valor>abc")
            .unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));

        let err = PING.decode::<PingResult>(b"not xml at all").unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));

        let err = PING
            .decode::<PingResult>(b"<a><PingResult></Wrong></a>")
            .unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
    }

    #[test]
    fn test_soap_decode_skips_leading_bom() {
        let xml = "\u{feff}<?xml version=\"1.0\" encoding=\"utf-8\"?><soap:Envelope><soap:Body><PingResponse><PingResult><Valor>abc</Valor><Status>true</Status><Transacao><Status>true</Status><CodigoStatus>G000M001</CodigoStatus></Transacao></PingResult></PingResponse></soap:Body></soap:Envelope>";

        let decoded: Decoded<PingResult> = PING.decode(xml.as_bytes()).unwrap();
        assert_eq!(decoded.payload.valor, "abc");
        assert_eq!(decoded.status.code, "G000M001");
    }

    #[test]
    fn test_soap_decode_with_multibyte_text_before_result() {
        let xml = "\u{feff}<soap:Envelope><soap:Body><Aviso>Atenção: €x ação</Aviso><PingResponse><PingResult><Valor>çé€</Valor><Status>true</Status></PingResult></PingResponse></soap:Body></soap:Envelope>";

        let decoded: Decoded<PingResult> = PING.decode(xml.as_bytes()).unwrap();
        assert_eq!(decoded.payload.valor, "çé€");
        assert!(decoded.status.success);

        let xml = "<soap:Envelope><soap:Body>€x<PingResult><Valor>abc</Valor></PingResult></soap:Body></soap:Envelope>";
        let decoded: Decoded<PingResult> = PING.decode(xml.as_bytes()).unwrap();
        assert_eq!(decoded.payload.valor, "abc");
    }

    #[test]
    fn test_soap_decode_self_closing_result_has_empty_status() {
        let xml = "\u{feff}<soap:Envelope><soap:Body><PingResponse><PingResult/></PingResponse></soap:Body></soap:Envelope>";

        let decoded: Decoded<PingResult> = PING.decode(xml.as_bytes()).unwrap();
        assert!(decoded.payload.valor.is_empty());
        assert!(!decoded.status.success);
        assert_eq!(decoded.status.code, "");
    }

    #[test]
    fn test_json_decode_status_and_errors() {
        let json = br#"{"Valor":"abc","Status":false,"Transacao":{"status":false,"CodigoStatus":"G000M003","CodigoStatusDescricao":"Documento invalido"}}"#;
        let decoded: Decoded<PingResult> = Envelope::Json.decode(json).unwrap();
        assert_eq!(decoded.payload.valor, "abc");
        assert!(!decoded.status.success);
        assert_eq!(decoded.status.code, "G000M003");

        let err = Envelope::Json.decode::<PingResult>(b"{\"Valor\":").unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
        let err = Envelope::Json.decode::<PingResult>(b"").unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
    }

    #[test]
    fn test_content_types() {
        assert_eq!(PING.content_type(), "text/xml");
        assert_eq!(Envelope::Json.content_type(), "application/json");
    }
}
