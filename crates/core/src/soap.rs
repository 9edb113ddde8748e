//! SOAP message shapes.
//!
//! A [`SoapMessage`] is the method element of an envelope plus the caller
//! identity and any header elements; [`SoapFault`] is the failure shape the
//! connector publishes when a script run fails. Envelopes are SOAP 1.1
//! (`http://schemas.xmlsoap.org/soap/envelope/`), serialized in
//! default-namespace form.

use crate::error::CoreError;
use crate::xml::XmlElement;

/// SOAP 1.1 envelope namespace.
pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

// ---------------------------------------------------------------------------
// SoapMessage
// ---------------------------------------------------------------------------

/// A SOAP request or reply, reduced to the parts scripts care about: the
/// method element under `Body`, the caller identity used to authenticate
/// outbound calls, and any envelope header elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapMessage {
    pub method: XmlElement,
    pub user_dn: Option<String>,
    pub headers: Vec<XmlElement>,
}

impl SoapMessage {
    pub fn new(method: XmlElement) -> Self {
        Self {
            method,
            user_dn: None,
            headers: Vec::new(),
        }
    }

    pub fn with_user_dn(mut self, user_dn: impl Into<String>) -> Self {
        self.user_dn = Some(user_dn.into());
        self
    }

    /// Local name of the method element.
    pub fn method_name(&self) -> &str {
        &self.method.name
    }

    /// Namespace URI of the method element.
    pub fn method_namespace(&self) -> Option<&str> {
        self.method.namespace.as_deref()
    }

    /// Read a message from envelope text.
    ///
    /// The root must be an `Envelope` in the SOAP namespace with a `Body`
    /// child; the method is the body's first element child. Header elements
    /// are collected from `Header` when present.
    pub fn from_envelope_str(input: &str) -> Result<Self, CoreError> {
        let envelope = XmlElement::parse(input)?;
        if envelope.name != "Envelope" || envelope.namespace.as_deref() != Some(SOAP_ENVELOPE_NS)
        {
            return Err(CoreError::Envelope(
                "root element is not a SOAP Envelope".into(),
            ));
        }

        let headers = envelope
            .descendants_named("Header", Some(SOAP_ENVELOPE_NS))
            .next()
            .map(|header| header.child_elements().cloned().collect())
            .unwrap_or_default();

        let body = envelope
            .descendants_named("Body", Some(SOAP_ENVELOPE_NS))
            .next()
            .ok_or_else(|| CoreError::Envelope("envelope has no Body".into()))?;
        let method = body
            .first_child_element()
            .cloned()
            .ok_or_else(|| CoreError::Envelope("envelope Body is empty".into()))?;

        Ok(Self {
            method,
            user_dn: None,
            headers,
        })
    }

    /// Render the full envelope.
    pub fn to_envelope_string(&self) -> String {
        let mut envelope = XmlElement::in_namespace("Envelope", SOAP_ENVELOPE_NS);
        if !self.headers.is_empty() {
            let mut header = XmlElement::new("Header");
            for h in &self.headers {
                header.push_child(h.clone());
            }
            envelope.push_child(header);
        }
        envelope.push_child(XmlElement::new("Body").with_child(self.method.clone()));
        envelope.to_string()
    }
}

/// Build the response method element for a request method:
/// `{LocalName}Response` in the request method's namespace.
pub fn response_method_for(method: &XmlElement) -> XmlElement {
    XmlElement {
        name: format!("{}Response", method.name),
        namespace: method.namespace.clone(),
        attributes: Vec::new(),
        children: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// SoapFault
// ---------------------------------------------------------------------------

/// A SOAP 1.1 fault: code, optional actor, human-readable string and
/// optional detail XML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    pub fault_code: String,
    pub fault_actor: Option<String>,
    pub fault_string: String,
    pub detail: Option<XmlElement>,
}

impl SoapFault {
    pub fn new(
        fault_code: impl Into<String>,
        fault_actor: Option<String>,
        fault_string: impl Into<String>,
        detail: Option<XmlElement>,
    ) -> Self {
        Self {
            fault_code: fault_code.into(),
            fault_actor,
            fault_string: fault_string.into(),
            detail,
        }
    }

    /// A `Server` fault with the given message.
    pub fn server(fault_string: impl Into<String>) -> Self {
        Self::new("Server", None, fault_string, None)
    }

    /// A `Client` fault with the given message.
    pub fn client(fault_string: impl Into<String>) -> Self {
        Self::new("Client", None, fault_string, None)
    }

    /// Render the fault envelope. Fault children are unqualified, per SOAP
    /// 1.1, which in default-namespace form requires `xmlns=""`.
    pub fn to_envelope_string(&self) -> String {
        let mut fault = XmlElement::new("Fault");
        fault.push_child(XmlElement::in_namespace("faultcode", "").with_text(&self.fault_code));
        fault.push_child(
            XmlElement::in_namespace("faultstring", "").with_text(&self.fault_string),
        );
        if let Some(actor) = &self.fault_actor {
            fault.push_child(XmlElement::in_namespace("faultactor", "").with_text(actor));
        }
        if let Some(detail) = &self.detail {
            fault.push_child(
                XmlElement::in_namespace("detail", "").with_child(detail.clone()),
            );
        }

        XmlElement::in_namespace("Envelope", SOAP_ENVELOPE_NS)
            .with_child(XmlElement::new("Body").with_child(fault))
            .to_string()
    }

    /// Interpret a reply method element as a fault, if it is one.
    pub fn from_method(method: &XmlElement) -> Option<Self> {
        if method.name != "Fault" {
            return None;
        }
        Some(Self {
            fault_code: method.descendant_text("faultcode").unwrap_or_default(),
            fault_actor: method.descendant_text("faultactor"),
            fault_string: method.descendant_text("faultstring").unwrap_or_default(),
            detail: method
                .find_descendant("detail", None)
                .and_then(XmlElement::first_child_element)
                .cloned(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::error::CoreError;

    fn echo_request() -> &'static str {
        "<SOAP:Envelope xmlns:SOAP=\"http://schemas.xmlsoap.org/soap/envelope/\">\
         <SOAP:Body><Echo xmlns=\"urn:m\"><test>something</test></Echo></SOAP:Body>\
         </SOAP:Envelope>"
    }

    #[test]
    fn reads_method_from_prefixed_envelope() {
        let msg = SoapMessage::from_envelope_str(echo_request()).unwrap();
        assert_eq!(msg.method_name(), "Echo");
        assert_eq!(msg.method_namespace(), Some("urn:m"));
        assert_eq!(msg.method.descendant_text("test").as_deref(), Some("something"));
    }

    #[test]
    fn reads_headers_when_present() {
        let text = "<Envelope xmlns=\"http://schemas.xmlsoap.org/soap/envelope/\">\
                    <Header><trace xmlns=\"urn:h\">1</trace></Header>\
                    <Body><Ping xmlns=\"urn:m\"/></Body></Envelope>";
        let msg = SoapMessage::from_envelope_str(text).unwrap();
        assert_eq!(msg.headers.len(), 1);
        assert_eq!(msg.headers[0].name, "trace");
    }

    #[test]
    fn rejects_non_envelope_root() {
        assert_matches!(
            SoapMessage::from_envelope_str("<Echo xmlns=\"urn:m\"/>"),
            Err(CoreError::Envelope(_))
        );
    }

    #[test]
    fn rejects_empty_body() {
        let text = "<Envelope xmlns=\"http://schemas.xmlsoap.org/soap/envelope/\">\
                    <Body/></Envelope>";
        assert_matches!(
            SoapMessage::from_envelope_str(text),
            Err(CoreError::Envelope(_))
        );
    }

    #[test]
    fn envelope_round_trips() {
        let msg = SoapMessage::from_envelope_str(echo_request()).unwrap();
        let again = SoapMessage::from_envelope_str(&msg.to_envelope_string()).unwrap();
        assert_eq!(msg.method, again.method);
    }

    #[test]
    fn response_method_keeps_namespace() {
        let method = XmlElement::in_namespace("Echo", "urn:m");
        let response = response_method_for(&method);
        assert_eq!(response.name, "EchoResponse");
        assert_eq!(response.namespace.as_deref(), Some("urn:m"));
        assert!(response.children.is_empty());
    }

    #[test]
    fn fault_envelope_carries_code_and_string() {
        let fault = SoapFault::server("backend unreachable");
        let envelope = fault.to_envelope_string();
        let msg = SoapMessage::from_envelope_str(&envelope).unwrap();
        assert_eq!(msg.method_name(), "Fault");
        let parsed = SoapFault::from_method(&msg.method).unwrap();
        assert_eq!(parsed.fault_code, "Server");
        assert_eq!(parsed.fault_string, "backend unreachable");
        assert_eq!(parsed.fault_actor, None);
    }

    #[test]
    fn fault_detail_round_trips() {
        let detail = XmlElement::in_namespace("reason", "urn:d").with_text("downstream");
        let fault = SoapFault::new("Client", Some("caller".into()), "bad input", Some(detail));
        let envelope = fault.to_envelope_string();
        let msg = SoapMessage::from_envelope_str(&envelope).unwrap();
        let parsed = SoapFault::from_method(&msg.method).unwrap();
        assert_eq!(parsed.fault_actor.as_deref(), Some("caller"));
        let detail = parsed.detail.unwrap();
        assert_eq!(detail.name, "reason");
        assert_eq!(detail.text(), "downstream");
    }

    #[test]
    fn non_fault_method_is_not_a_fault() {
        let method = XmlElement::in_namespace("EchoResponse", "urn:m");
        assert!(SoapFault::from_method(&method).is_none());
    }
}
