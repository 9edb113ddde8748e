//! LogMessage sample: writes a log entry and nothing else.

use soapbridge_connector::{Script, ScriptContext, ScriptFault};

/// Logs the request's `<message>` through the connector's tracing output
/// and sets no response body.
pub struct LogMessage;

impl Script for LogMessage {
    fn execute(&self, ctx: &mut ScriptContext<'_>) -> Result<(), ScriptFault> {
        let message = ctx.request().descendant_text("message").unwrap_or_default();
        tracing::info!(caller = %ctx.request_user_dn(), message = %message, "Script log entry");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
