//! Per-request transaction processing.
//!
//! [`Connector`] holds the immutable runtime pieces (catalog, config,
//! dispatcher, saved-transaction store) and processes one inbound message
//! at a time: parse, locate the script, run it, wrap its output in the
//! response method element, persist the pair if the script asked for it.

use std::sync::Arc;
use std::time::Duration;

use soapbridge_core::{soap, SoapFault, SoapMessage};
use uuid::Uuid;

use crate::catalog::ScriptCatalog;
use crate::config::ConnectorConfig;
use crate::dispatch::SoapDispatcher;
use crate::error::ConnectorError;
use crate::saved::SavedTransactionStore;
use crate::schedule::schedule_delayed;
use crate::script::{ScriptContext, ScriptFault};

/// The connector runtime. Immutable after construction; safe to share
/// across overlapping invocations.
pub struct Connector {
    catalog: ScriptCatalog,
    config: ConnectorConfig,
    dispatcher: Arc<dyn SoapDispatcher>,
    saved: SavedTransactionStore,
    runtime: Option<tokio::runtime::Handle>,
}

impl Connector {
    /// Build a connector. When constructed inside a tokio runtime, delayed
    /// dispatch is available; outside one, scheduling calls fault.
    pub fn new(
        catalog: ScriptCatalog,
        config: ConnectorConfig,
        dispatcher: Arc<dyn SoapDispatcher>,
    ) -> Self {
        let saved = SavedTransactionStore::new(
            &config.transaction_save_path,
            config.max_files_per_transaction,
        );
        Self {
            catalog,
            config,
            dispatcher,
            saved,
            runtime: tokio::runtime::Handle::try_current().ok(),
        }
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn saved_store(&self) -> &SavedTransactionStore {
        &self.saved
    }

    pub(crate) fn dispatcher(&self) -> &Arc<dyn SoapDispatcher> {
        &self.dispatcher
    }

    pub(crate) fn schedule(
        &self,
        request: SoapMessage,
        delay: Duration,
    ) -> Result<(), ScriptFault> {
        let Some(handle) = &self.runtime else {
            return Err(ScriptFault::server(
                "Delayed dispatch requires a running async runtime",
            ));
        };
        schedule_delayed(handle, Arc::clone(&self.dispatcher), request, delay);
        Ok(())
    }

    /// Process one inbound message into the response message.
    pub fn process_message(&self, request: SoapMessage) -> Result<SoapMessage, ConnectorError> {
        let transaction_id = Uuid::now_v7();
        let name = request.method_name().to_string();
        let namespace = request.method_namespace().map(str::to_string);
        tracing::debug!(%transaction_id, method = %name, "Processing SOAP transaction");

        let script = self.catalog.resolve(&name, namespace.as_deref()).ok_or(
            ConnectorError::NoScriptForMethod {
                name: name.clone(),
                namespace,
            },
        )?;

        let mut ctx = ScriptContext::new(&request, self);
        script.execute(&mut ctx)?;
        let outcome = ctx.into_outcome();

        let mut wrapper = soap::response_method_for(&request.method);
        if let Some(name) = outcome.response_method_name {
            wrapper.name = name;
        }
        if let Some(namespace) = outcome.response_method_namespace {
            wrapper.namespace = Some(namespace);
        }
        if let Some(body) = outcome.response {
            wrapper.push_child(body);
        }

        if let Some(id) = outcome.save_id {
            let sequence = self.saved.save_request(&id, &request.method)?;
            self.saved.save_response(&id, sequence, &wrapper)?;
        }

        tracing::debug!(%transaction_id, response = %wrapper.name, "Transaction complete");
        Ok(SoapMessage::new(wrapper))
    }

    /// Process envelope text into response envelope text. `user_dn`
    /// overrides the configured default caller identity.
    pub fn process_envelope(
        &self,
        envelope: &str,
        user_dn: Option<&str>,
    ) -> Result<String, ConnectorError> {
        let mut request = SoapMessage::from_envelope_str(envelope)?;
        request.user_dn = Some(
            user_dn
                .unwrap_or(&self.config.default_user_dn)
                .to_string(),
        );
        let response = self.process_message(request)?;
        Ok(response.to_envelope_string())
    }

    /// The SOAP fault a processing failure surfaces as.
    pub fn fault_for(error: &ConnectorError) -> SoapFault {
        match error {
            ConnectorError::Fault(fault) => fault.clone().into(),
            ConnectorError::NoScriptForMethod { .. } | ConnectorError::Core(_) => {
                SoapFault::client(error.to_string())
            }
            ConnectorError::SavedStore(_) | ConnectorError::Io(_) => {
                SoapFault::server(error.to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
