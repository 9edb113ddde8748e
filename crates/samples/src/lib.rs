//! Sample scripts for the soapbridge connector.
//!
//! Each sample is a self-contained transform: read fields from the inbound
//! method element, optionally call a backend service through the script
//! context, build a new output tree, publish it. Together they cover the
//! connector's surface, from pure echo and local enumeration to
//! synchronous store reads/writes, reply reshaping, logging and delayed
//! fire-and-forget dispatch.

use std::sync::Arc;

use soapbridge_connector::{MethodLocator, ScriptCatalog};

pub mod async_store;
pub mod echo;
pub mod employees;
pub mod list_files;
pub mod logging;
pub mod read_store;
pub mod write_store;
pub mod xmlstore;

pub use async_store::AsyncStoreWrite;
pub use echo::Echo;
pub use employees::EmployeeDirectory;
pub use list_files::ListFiles;
pub use logging::LogMessage;
pub use read_store::ReadFromStore;
pub use write_store::WriteToStore;

/// Namespace the samples are registered under.
pub const SAMPLES_NS: &str = "http://schemas.soapbridge.dev/1.0/samples";

/// Settings shared by the store-backed samples, passed in at registration
/// rather than kept as script-level globals.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Base prefix of every composite store key.
    pub base_key: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            base_key: "/scriptsample".to_string(),
        }
    }
}

/// Register every sample under [`SAMPLES_NS`].
pub fn register_all(catalog: &mut ScriptCatalog, settings: StoreSettings) {
    catalog.register(
        MethodLocator::in_namespace("Echo", SAMPLES_NS),
        Arc::new(Echo),
    );
    catalog.register(
        MethodLocator::in_namespace("ListFiles", SAMPLES_NS),
        Arc::new(ListFiles),
    );
    catalog.register(
        MethodLocator::in_namespace("LogMessage", SAMPLES_NS),
        Arc::new(LogMessage),
    );
    catalog.register(
        MethodLocator::in_namespace("ReadFromStore", SAMPLES_NS),
        Arc::new(ReadFromStore::new(settings.clone())),
    );
    catalog.register(
        MethodLocator::in_namespace("WriteToStore", SAMPLES_NS),
        Arc::new(WriteToStore::new(settings)),
    );
    catalog.register(
        MethodLocator::in_namespace("EmployeeDirectory", SAMPLES_NS),
        Arc::new(EmployeeDirectory::default()),
    );
    catalog.register(
        MethodLocator::in_namespace("AsyncStoreWrite", SAMPLES_NS),
        Arc::new(AsyncStoreWrite::default()),
    );
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------
