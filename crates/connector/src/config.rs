//! Connector configuration loaded from environment variables.
//!
//! All fields have defaults suitable for local development; override via
//! environment variables. Custom properties come from an optional
//! `key=value` file and are exposed to scripts through their context.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime configuration for the connector.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// Upper bound a dispatcher implementation applies to synchronous
    /// outbound SOAP calls.
    pub soap_request_timeout: Duration,
    /// Directory for saved-transaction files.
    pub transaction_save_path: PathBuf,
    /// Maximum saved request/response pairs per transaction id.
    pub max_files_per_transaction: u32,
    /// Caller identity used when a request carries none.
    pub default_user_dn: String,
    /// Values from the custom properties file.
    pub custom_properties: HashMap<String, String>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            soap_request_timeout: Duration::from_millis(30_000),
            transaction_save_path: PathBuf::from("transactions"),
            max_files_per_transaction: 100,
            default_user_dn: "anonymous".to_string(),
            custom_properties: HashMap::new(),
        }
    }
}

impl ConnectorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default        |
    /// |-----------------------------|----------------|
    /// | `SOAPBRIDGE_SOAP_TIMEOUT_MS`| `30000`        |
    /// | `SOAPBRIDGE_TXN_SAVE_PATH`  | `transactions` |
    /// | `SOAPBRIDGE_MAX_TXN_FILES`  | `100`          |
    /// | `SOAPBRIDGE_DEFAULT_USER_DN`| `anonymous`    |
    /// | `SOAPBRIDGE_PROPERTIES`     | unset          |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let soap_timeout_ms: u64 = std::env::var("SOAPBRIDGE_SOAP_TIMEOUT_MS")
            .map(|v| v.parse().expect("SOAPBRIDGE_SOAP_TIMEOUT_MS must be a valid u64"))
            .unwrap_or(defaults.soap_request_timeout.as_millis() as u64);

        let transaction_save_path = std::env::var("SOAPBRIDGE_TXN_SAVE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.transaction_save_path);

        let max_files_per_transaction: u32 = std::env::var("SOAPBRIDGE_MAX_TXN_FILES")
            .map(|v| v.parse().expect("SOAPBRIDGE_MAX_TXN_FILES must be a valid u32"))
            .unwrap_or(defaults.max_files_per_transaction);

        let default_user_dn = std::env::var("SOAPBRIDGE_DEFAULT_USER_DN")
            .unwrap_or(defaults.default_user_dn);

        // A missing properties file is not an error; scripts simply see no
        // custom properties.
        let custom_properties = std::env::var("SOAPBRIDGE_PROPERTIES")
            .ok()
            .and_then(|path| load_properties(Path::new(&path)).ok())
            .unwrap_or_default();

        Self {
            soap_request_timeout: Duration::from_millis(soap_timeout_ms),
            transaction_save_path,
            max_files_per_transaction,
            default_user_dn,
            custom_properties,
        }
    }

    /// A custom property by name.
    pub fn custom_property(&self, name: &str) -> Option<&str> {
        self.custom_properties.get(name).map(String::as_str)
    }
}

/// Parse a `key=value` properties file. Blank lines and lines starting with
/// `#` are skipped; values keep everything after the first `=`.
pub fn load_properties(path: &Path) -> io::Result<HashMap<String, String>> {
    let text = std::fs::read_to_string(path)?;
    let mut properties = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            properties.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    Ok(properties)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
