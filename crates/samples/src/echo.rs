//! Echo sample: returns the incoming request body.

use soapbridge_connector::{Script, ScriptContext, ScriptFault};
use soapbridge_core::XmlElement;

/// Wraps the inbound method element unchanged inside
/// `<Success><Message>Hello {caller}</Message><OriginalRequest>…</OriginalRequest></Success>`.
pub struct Echo;

impl Script for Echo {
    fn execute(&self, ctx: &mut ScriptContext<'_>) -> Result<(), ScriptFault> {
        let mut response = XmlElement::new("Success");
        response.push_child(
            XmlElement::new("Message").with_text(format!("Hello {}", ctx.request_user_dn())),
        );
        response.push_child(XmlElement::new("OriginalRequest").with_child(ctx.request().clone()));
        ctx.set_response(response);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use soapbridge_core::XmlElement;

    use super::*;
    use crate::test_support::{harness_with, sample_request};

    #[test]
    fn wraps_request_unchanged() {
        let harness = harness_with("Echo", Arc::new(Echo));
        let request = sample_request("Echo")
            .with_child(XmlElement::new("x").with_text("1"));
        let response = harness.run(request.clone());

        assert_eq!(response.name, "EchoResponse");
        let original = response.find_descendant("OriginalRequest", None).unwrap();
        assert_eq!(original.first_child_element(), Some(&request));
    }

    #[test]
    fn greets_the_caller() {
        let harness = harness_with("Echo", Arc::new(Echo));
        let response = harness.run(sample_request("Echo"));
        assert_eq!(
            response.descendant_text("Message").as_deref(),
            Some("Hello cn=sample-caller")
        );
    }

    #[test]
    fn makes_no_outbound_calls() {
        let harness = harness_with("Echo", Arc::new(Echo));
        harness.run(sample_request("Echo"));
        assert!(harness.dispatcher.requests().is_empty());
    }
}
