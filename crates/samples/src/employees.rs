//! EmployeeDirectory sample: synchronous backend call plus reshaping.

use soapbridge_connector::{Script, ScriptContext, ScriptFault};
use soapbridge_core::XmlElement;

use crate::xmlstore;

/// Namespace of the demo employee service.
pub const EMPLOYEE_DEMO_NS: &str = "http://schemas.cordys.com/1.0/demo/northwind";

/// Calls the demo `GetEmployees` method and reshapes the reply rows into
/// `<myemps><names><name>First Last</name>*</names>
/// <homephones><phone>…</phone>*</homephones></myemps>`.
///
/// The caller identity for the backend call is optional configuration,
/// defaulting to the inbound caller.
#[derive(Default)]
pub struct EmployeeDirectory {
    caller_dn: Option<String>,
}

impl EmployeeDirectory {
    pub fn new(caller_dn: Option<String>) -> Self {
        Self { caller_dn }
    }

    fn backend_request() -> XmlElement {
        XmlElement::in_namespace("GetEmployees", EMPLOYEE_DEMO_NS)
            .with_child(XmlElement::new("cursor").with_attr("numRows", "5"))
            .with_child(XmlElement::new("fromEmployeeID").with_text("0"))
            .with_child(XmlElement::new("toEmployeeID").with_text("100000"))
    }
}

impl Script for EmployeeDirectory {
    fn execute(&self, ctx: &mut ScriptContext<'_>) -> Result<(), ScriptFault> {
        let caller = self
            .caller_dn
            .as_deref()
            .unwrap_or_else(|| ctx.request_user_dn())
            .to_string();
        let reply = ctx.send_soap_request(&caller, Self::backend_request())?;

        let mut names = XmlElement::new("names");
        let mut phones = XmlElement::new("homephones");
        for row in xmlstore::tuple_rows(&reply) {
            let first = row.descendant_text("FirstName").unwrap_or_default();
            let last = row.descendant_text("LastName").unwrap_or_default();
            names.push_child(XmlElement::new("name").with_text(format!("{first} {last}")));
            phones.push_child(
                XmlElement::new("phone")
                    .with_text(row.descendant_text("HomePhone").unwrap_or_default()),
            );
        }

        ctx.set_response(
            XmlElement::new("myemps")
                .with_child(names)
                .with_child(phones),
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use soapbridge_core::{SoapMessage, XmlElement};

    use super::*;
    use crate::test_support::{harness_with, sample_request};

    fn employee_reply() -> SoapMessage {
        let reply = XmlElement::parse(
            "<GetEmployeesResponse xmlns=\"http://schemas.cordys.com/1.0/demo/northwind\">\
             <tuple><old><row>\
               <FirstName>Nancy</FirstName><LastName>Davolio</LastName>\
               <HomePhone>(206) 555-9857</HomePhone>\
             </row></old></tuple>\
             <tuple><old><row>\
               <FirstName>Andrew</FirstName><LastName>Fuller</LastName>\
               <HomePhone>(206) 555-9482</HomePhone>\
             </row></old></tuple>\
             </GetEmployeesResponse>",
        )
        .unwrap();
        SoapMessage::new(reply)
    }

    #[test]
    fn sends_cursor_and_range() {
        let harness = harness_with(
            "EmployeeDirectory",
            Arc::new(EmployeeDirectory::default()),
        );
        harness.dispatcher.enqueue_reply(employee_reply());
        harness.run(sample_request("EmployeeDirectory"));

        let outbound = harness.dispatcher.requests();
        assert_eq!(outbound[0].method_name(), "GetEmployees");
        let cursor = outbound[0].method.find_descendant("cursor", None).unwrap();
        assert_eq!(cursor.attr("numRows"), Some("5"));
        assert_eq!(
            outbound[0].method.descendant_text("fromEmployeeID").as_deref(),
            Some("0")
        );
        assert_eq!(
            outbound[0].method.descendant_text("toEmployeeID").as_deref(),
            Some("100000")
        );
    }

    #[test]
    fn pairs_names_and_phones_per_row() {
        let harness = harness_with(
            "EmployeeDirectory",
            Arc::new(EmployeeDirectory::default()),
        );
        harness.dispatcher.enqueue_reply(employee_reply());
        let response = harness.run(sample_request("EmployeeDirectory"));

        let names: Vec<String> = response
            .descendants_named("name", None)
            .map(XmlElement::text)
            .collect();
        assert_eq!(names, ["Nancy Davolio", "Andrew Fuller"]);

        let phones: Vec<String> = response
            .descendants_named("phone", None)
            .map(XmlElement::text)
            .collect();
        assert_eq!(phones, ["(206) 555-9857", "(206) 555-9482"]);
    }

    #[test]
    fn configured_caller_dn_overrides_request_identity() {
        let harness = harness_with(
            "EmployeeDirectory",
            Arc::new(EmployeeDirectory::new(Some("cn=service-account".into()))),
        );
        harness.dispatcher.enqueue_reply(employee_reply());
        harness.run(sample_request("EmployeeDirectory"));

        let outbound = harness.dispatcher.requests();
        assert_eq!(outbound[0].user_dn.as_deref(), Some("cn=service-account"));
    }

    #[test]
    fn empty_reply_yields_empty_containers() {
        let harness = harness_with(
            "EmployeeDirectory",
            Arc::new(EmployeeDirectory::default()),
        );
        let response = harness.run(sample_request("EmployeeDirectory"));

        let names = response.find_descendant("names", None).unwrap();
        assert!(names.children.is_empty());
    }
}
