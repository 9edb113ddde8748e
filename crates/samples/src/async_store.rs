//! AsyncStoreWrite sample: delayed fire-and-forget store update.

use std::time::Duration;

use soapbridge_connector::{Script, ScriptContext, ScriptFault};
use soapbridge_core::XmlElement;

use crate::xmlstore;

/// Default store key the delayed write lands under.
pub const DEFAULT_OUTPUT_KEY: &str = "/soapbridge/samples/AsyncStoreWriteOutput";

/// Default delivery delay.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(10);

/// Schedules an `UpdateXMLObject` to a fixed key after a configurable
/// delay and sets no response. The update is delivered even after this
/// invocation has completed.
pub struct AsyncStoreWrite {
    key: String,
    delay: Duration,
}

impl AsyncStoreWrite {
    pub fn new(key: impl Into<String>, delay: Duration) -> Self {
        Self {
            key: key.into(),
            delay,
        }
    }
}

impl Default for AsyncStoreWrite {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_KEY, DEFAULT_DELAY)
    }
}

impl Script for AsyncStoreWrite {
    fn execute(&self, ctx: &mut ScriptContext<'_>) -> Result<(), ScriptFault> {
        let payload = XmlElement::new("delaytest")
            .with_child(XmlElement::new("data").with_text("Async Call Works"));
        let request = xmlstore::update_xml_object(&self.key, Some(payload));

        ctx.schedule_soap_request(ctx.request_user_dn(), request, self.delay)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
