//! The script contract and its bridge into the connector.
//!
//! A [`Script`] is a transform: it reads the inbound method element, may
//! call backend SOAP services through its [`ScriptContext`], and may publish
//! an output element. Execution is synchronous, one logical thread of
//! control per invocation; overlapping invocations never share state.

use std::time::Duration;

use soapbridge_core::{SoapFault, SoapMessage, XmlElement};

use crate::dispatch::DispatchError;
use crate::saved::SavedTransactionStore;
use crate::transaction::Connector;

// ---------------------------------------------------------------------------
// ScriptFault
// ---------------------------------------------------------------------------

/// A failure raised from a script run.
///
/// Scripts construct these directly for their own faults; dispatcher
/// failures and remote fault replies convert into them automatically and
/// propagate uncaught. There is no recovery layer inside a script run.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{fault_string}")]
pub struct ScriptFault {
    pub fault_code: String,
    pub fault_actor: Option<String>,
    pub fault_string: String,
    pub detail: Option<XmlElement>,
}

impl ScriptFault {
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

    pub fn server(fault_string: impl Into<String>) -> Self {
        Self::new("Server", None, fault_string, None)
    }

    pub fn client(fault_string: impl Into<String>) -> Self {
        Self::new("Client", None, fault_string, None)
    }
}

impl From<ScriptFault> for SoapFault {
    fn from(fault: ScriptFault) -> Self {
        SoapFault::new(
            fault.fault_code,
            fault.fault_actor,
            fault.fault_string,
            fault.detail,
        )
    }
}

impl From<SoapFault> for ScriptFault {
    fn from(fault: SoapFault) -> Self {
        Self::new(
            fault.fault_code,
            fault.fault_actor,
            fault.fault_string,
            fault.detail,
        )
    }
}

impl From<DispatchError> for ScriptFault {
    fn from(error: DispatchError) -> Self {
        Self::server(error.to_string())
    }
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// A registered transform script.
pub trait Script: Send + Sync {
    /// Run the transform. Returning without calling
    /// [`ScriptContext::set_response`] suppresses the response body; the
    /// transaction still emits the bare response method element.
    fn execute(&self, ctx: &mut ScriptContext<'_>) -> Result<(), ScriptFault>;
}

// ---------------------------------------------------------------------------
// ScriptContext
// ---------------------------------------------------------------------------

/// What a script run produced, harvested after `execute` returns.
pub(crate) struct ScriptOutcome {
    pub response: Option<XmlElement>,
    pub response_method_name: Option<String>,
    pub response_method_namespace: Option<String>,
    pub save_id: Option<String>,
}

/// Per-invocation bridge between a script and the connector.
///
/// Exposes the host contract: the inbound request and caller identity,
/// outbound SOAP dispatch (synchronous and delayed), response publishing,
/// custom properties and transaction persistence.
pub struct ScriptContext<'a> {
    request: &'a SoapMessage,
    connector: &'a Connector,
    user_dn: String,
    response: Option<XmlElement>,
    response_method_name: Option<String>,
    response_method_namespace: Option<String>,
    save_id: Option<String>,
}

impl<'a> ScriptContext<'a> {
    pub(crate) fn new(request: &'a SoapMessage, connector: &'a Connector) -> Self {
        let user_dn = request
            .user_dn
            .clone()
            .unwrap_or_else(|| connector.config().default_user_dn.clone());
        Self {
            request,
            connector,
            user_dn,
            response: None,
            response_method_name: None,
            response_method_namespace: None,
            save_id: None,
        }
    }

    /// The inbound method element.
    pub fn request(&self) -> &XmlElement {
        &self.request.method
    }

    /// The full inbound message, headers included.
    pub fn request_message(&self) -> &SoapMessage {
        self.request
    }

    /// Identity of the caller, usable as the authentication context for
    /// outbound calls.
    pub fn request_user_dn(&self) -> &str {
        &self.user_dn
    }

    /// Send a SOAP request and block until the reply arrives or the
    /// dispatcher fails. A fault reply propagates as a [`ScriptFault`].
    pub fn send_soap_request(
        &self,
        user_dn: &str,
        method: XmlElement,
    ) -> Result<XmlElement, ScriptFault> {
        let request = SoapMessage::new(method).with_user_dn(user_dn);
        let reply = self.connector.dispatcher().dispatch(&request)?;
        if let Some(fault) = SoapFault::from_method(&reply.method) {
            return Err(fault.into());
        }
        Ok(reply.method)
    }

    /// Schedule a SOAP request to be sent after `delay`, without waiting
    /// for any reply. Delivery happens even if this invocation has already
    /// completed; there is no cancellation and no completion signal.
    pub fn schedule_soap_request(
        &self,
        user_dn: &str,
        method: XmlElement,
        delay: Duration,
    ) -> Result<(), ScriptFault> {
        let request = SoapMessage::new(method).with_user_dn(user_dn);
        self.connector.schedule(request, delay)
    }

    /// Publish the script's output. Calling this is optional.
    pub fn set_response(&mut self, response: XmlElement) {
        self.response = Some(response);
    }

    /// Override the local name of the response method element.
    pub fn set_response_method_name(&mut self, name: impl Into<String>) {
        self.response_method_name = Some(name.into());
    }

    /// Override the namespace of the response method element.
    pub fn set_response_method_namespace(&mut self, namespace: impl Into<String>) {
        self.response_method_namespace = Some(namespace.into());
    }

    /// A value from the custom properties file, if configured.
    pub fn custom_property(&self, name: &str) -> Option<&str> {
        self.connector.config().custom_property(name)
    }

    /// Mark this transaction for persistence under the given id. The
    /// request and the produced response are written to the saved
    /// transaction store when the transaction completes.
    pub fn save_transaction(&mut self, id: &str) -> Result<(), ScriptFault> {
        if id.is_empty() {
            return Err(ScriptFault::client("Transaction ID is not set"));
        }
        self.save_id = Some(id.to_string());
        Ok(())
    }

    pub(crate) fn saved_store(&self) -> &SavedTransactionStore {
        self.connector.saved_store()
    }

    pub(crate) fn into_outcome(self) -> ScriptOutcome {
        ScriptOutcome {
            response: self.response,
            response_method_name: self.response_method_name,
            response_method_namespace: self.response_method_namespace,
            save_id: self.save_id,
        }
    }
}
