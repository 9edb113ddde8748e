//! ReadFromStore sample: fetch a stored document by composite key.

use soapbridge_connector::{Script, ScriptContext, ScriptFault};
use soapbridge_core::{StoreKey, XmlElement};

use crate::xmlstore;
use crate::StoreSettings;

/// Builds the composite store key from the request's `CITY`, `LAST_NAME`
/// and `FIRST_NAME` fields, fetches the object with `GetXMLObject` and
/// returns the stored rows wrapped in `<result>`.
pub struct ReadFromStore {
    settings: StoreSettings,
}

impl ReadFromStore {
    pub fn new(settings: StoreSettings) -> Self {
        Self { settings }
    }

    fn key_for(&self, request: &XmlElement) -> StoreKey {
        StoreKey::new(&self.settings.base_key)
            .push(&request.descendant_text("CITY").unwrap_or_default())
            .push(&request.descendant_text("LAST_NAME").unwrap_or_default())
            .push(&request.descendant_text("FIRST_NAME").unwrap_or_default())
    }
}

impl Script for ReadFromStore {
    fn execute(&self, ctx: &mut ScriptContext<'_>) -> Result<(), ScriptFault> {
        let key = self.key_for(ctx.request());
        let reply = ctx.send_soap_request(
            ctx.request_user_dn(),
            xmlstore::get_xml_object(key.as_str()),
        )?;

        let mut result = XmlElement::new("result");
        for row in xmlstore::tuple_rows(&reply) {
            result.push_child(row.clone());
        }
        ctx.set_response(result);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use soapbridge_connector::{ConnectorError, DispatchError};
    use soapbridge_core::{SoapMessage, XmlElement};

    use super::*;
    use crate::test_support::{harness_with, sample_request};

    fn read_request() -> XmlElement {
        sample_request("ReadFromStore")
            .with_child(XmlElement::new("CITY").with_text("London"))
            .with_child(XmlElement::new("LAST_NAME").with_text("O'Neil"))
            .with_child(XmlElement::new("FIRST_NAME").with_text("Ann"))
    }

    #[test]
    fn requests_object_under_escaped_composite_key() {
        let harness = harness_with(
            "ReadFromStore",
            Arc::new(ReadFromStore::new(StoreSettings::default())),
        );
        harness.run(read_request());

        let outbound = harness.dispatcher.requests();
        assert_eq!(outbound.len(), 1);
        assert_eq!(outbound[0].method_name(), "GetXMLObject");
        assert_eq!(outbound[0].user_dn.as_deref(), Some("cn=sample-caller"));
        let key = outbound[0].method.descendant_text("key").unwrap();
        assert_eq!(key, "/scriptsample/London/O#Neil/Ann");
    }

    #[test]
    fn wraps_stored_rows_in_result() {
        let harness = harness_with(
            "ReadFromStore",
            Arc::new(ReadFromStore::new(StoreSettings::default())),
        );
        let reply = XmlElement::parse(
            "<GetXMLObjectResponse xmlns=\"urn:s\">\
             <tuple><old><person><name>Ann</name></person></old></tuple>\
             </GetXMLObjectResponse>",
        )
        .unwrap();
        harness.dispatcher.enqueue_reply(SoapMessage::new(reply));

        let response = harness.run(read_request());
        let result = response.find_descendant("result", None).unwrap();
        assert_eq!(result.first_child_element().unwrap().name, "person");
    }

    #[test]
    fn missing_fields_become_empty_segments() {
        let harness = harness_with(
            "ReadFromStore",
            Arc::new(ReadFromStore::new(StoreSettings::default())),
        );
        harness.run(sample_request("ReadFromStore"));

        let outbound = harness.dispatcher.requests();
        let key = outbound[0].method.descendant_text("key").unwrap();
        assert_eq!(key, "/scriptsample///");
    }

    #[test]
    fn dispatch_failure_faults_the_transaction() {
        let harness = harness_with(
            "ReadFromStore",
            Arc::new(ReadFromStore::new(StoreSettings::default())),
        );
        harness
            .dispatcher
            .enqueue_error(DispatchError::Transport("store unreachable".into()));

        let error = harness
            .connector
            .process_message(SoapMessage::new(read_request()))
            .unwrap_err();
        assert_matches!(error, ConnectorError::Fault(_));
    }
}
