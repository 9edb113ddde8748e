use soapbridge_core::CoreError;

use crate::script::ScriptFault;

/// Failures surfaced by transaction processing.
///
/// There is deliberately no retry or partial-failure recovery here: every
/// variant terminates the transaction, and the surface layer turns it into
/// a SOAP fault.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// XML or envelope handling failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// No script is registered for the inbound method.
    #[error("No script registered for method '{name}' (namespace {namespace:?})")]
    NoScriptForMethod {
        name: String,
        namespace: Option<String>,
    },

    /// The script raised a fault (its own, or a propagated remote one).
    #[error(transparent)]
    Fault(#[from] ScriptFault),

    /// The saved-transaction store refused the operation.
    #[error("Saved transaction store: {0}")]
    SavedStore(String),

    /// Filesystem failure in the saved-transaction store.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
