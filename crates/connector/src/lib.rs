//! The soapbridge connector runtime.
//!
//! Routes inbound SOAP requests to registered [`Script`]s, gives each run a
//! [`ScriptContext`] bridge for outbound SOAP calls (synchronous or delayed)
//! and response publishing, and wraps script output in the
//! `{Method}Response` element of the reply envelope.

pub mod builtin;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod saved;
pub mod schedule;
pub mod script;
pub mod transaction;

pub use builtin::register_builtins;
pub use catalog::{MethodLocator, ScriptCatalog};
pub use config::ConnectorConfig;
pub use dispatch::{DispatchError, RecordingDispatcher, SoapDispatcher, UnroutedDispatcher};
pub use error::ConnectorError;
pub use saved::{SavedTransaction, SavedTransactionStore};
pub use script::{Script, ScriptContext, ScriptFault};
pub use transaction::Connector;
