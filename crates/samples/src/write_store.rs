//! WriteToStore sample: persist request data under a composite key.

use soapbridge_connector::{Script, ScriptContext, ScriptFault};
use soapbridge_core::{StoreKey, XmlElement};

use crate::xmlstore;
use crate::StoreSettings;

/// Builds the composite store key from `CITY`, `LAST_NAME` and
/// `FIRST_NAME`, stores the request's `DATA` element with
/// `UpdateXMLObject` and responds `<result>OK</result>`.
pub struct WriteToStore {
    settings: StoreSettings,
}

impl WriteToStore {
    pub fn new(settings: StoreSettings) -> Self {
        Self { settings }
    }
}

impl Script for WriteToStore {
    fn execute(&self, ctx: &mut ScriptContext<'_>) -> Result<(), ScriptFault> {
        let request = ctx.request();
        let key = StoreKey::new(&self.settings.base_key)
            .push(&request.descendant_text("CITY").unwrap_or_default())
            .push(&request.descendant_text("LAST_NAME").unwrap_or_default())
            .push(&request.descendant_text("FIRST_NAME").unwrap_or_default());
        let payload = request.find_descendant("DATA", None).cloned();

        ctx.send_soap_request(
            ctx.request_user_dn(),
            xmlstore::update_xml_object(key.as_str(), payload),
        )?;

        ctx.set_response(XmlElement::new("result").with_text("OK"));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
