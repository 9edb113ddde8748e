//! Saved-transaction file store.
//!
//! Scripts can mark a transaction for persistence; the request and produced
//! response are then written as `{id}_request_{seq}.xml` and
//! `{id}_response_{seq}.xml` under the configured save path. Sequence
//! numbers grow per id, the id is escaped with the key escaper before use
//! in file names, and every file is stamped with a write timestamp that is
//! stripped and surfaced as a `timestamp` attribute on read-back.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use soapbridge_core::{escape_key_segment, XmlElement};

use crate::error::ConnectorError;

/// Attribute stamped onto the root element of every saved file.
const TIMESTAMP_ATTR: &str = "saved-at";

/// One persisted request/response pair.
#[derive(Debug, Clone)]
pub struct SavedTransaction {
    pub id: String,
    pub sequence: u32,
    pub request: XmlElement,
    pub request_time: String,
    pub response: Option<XmlElement>,
    pub response_time: Option<String>,
}

/// File-backed transaction store.
///
/// The filesystem is the source of truth for sequence numbers; the mutex
/// only serializes allocation between overlapping invocations.
pub struct SavedTransactionStore {
    path: PathBuf,
    max_files: u32,
    allocate: Mutex<()>,
}

impl SavedTransactionStore {
    pub fn new(path: impl Into<PathBuf>, max_files: u32) -> Self {
        Self {
            path: path.into(),
            max_files,
            allocate: Mutex::new(()),
        }
    }

    /// Directory the store writes into.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a request under the given id, returning the allocated
    /// sequence number.
    pub fn save_request(&self, id: &str, method: &XmlElement) -> Result<u32, ConnectorError> {
        let id = escape_key_segment(id);
        let _guard = self.allocate.lock().expect("saved store lock");
        fs::create_dir_all(&self.path)?;

        for sequence in 1..=self.max_files {
            let file = self.file_path(&id, "request", sequence);
            if !file.exists() {
                write_stamped(&file, method)?;
                return Ok(sequence);
            }
        }
        Err(ConnectorError::SavedStore(format!(
            "transaction '{id}' reached the limit of {} saved files",
            self.max_files
        )))
    }

    /// Persist the response belonging to an already-saved request.
    pub fn save_response(
        &self,
        id: &str,
        sequence: u32,
        method: &XmlElement,
    ) -> Result<(), ConnectorError> {
        let id = escape_key_segment(id);
        write_stamped(&self.file_path(&id, "response", sequence), method)
    }

    /// Read back every saved pair for an id, ordered by sequence.
    pub fn read_all(&self, id: &str) -> Result<Vec<SavedTransaction>, ConnectorError> {
        let id = escape_key_segment(id);
        let mut entries = Vec::new();

        for sequence in 1..=self.max_files {
            let request_file = self.file_path(&id, "request", sequence);
            if !request_file.exists() {
                break;
            }
            let (request, request_time) = read_stamped(&request_file)?;

            let response_file = self.file_path(&id, "response", sequence);
            let (response, response_time) = if response_file.exists() {
                let (method, time) = read_stamped(&response_file)?;
                (Some(method), Some(time))
            } else {
                (None, None)
            };

            entries.push(SavedTransaction {
                id: id.clone(),
                sequence,
                request,
                request_time,
                response,
                response_time,
            });
        }
        Ok(entries)
    }

    /// Delete every saved pair for an id, returning how many pairs were
    /// removed.
    pub fn delete(&self, id: &str) -> Result<u32, ConnectorError> {
        let id = escape_key_segment(id);
        let _guard = self.allocate.lock().expect("saved store lock");
        let mut removed = 0;

        for sequence in 1..=self.max_files {
            let request_file = self.file_path(&id, "request", sequence);
            if !request_file.exists() {
                break;
            }
            fs::remove_file(&request_file)?;
            let response_file = self.file_path(&id, "response", sequence);
            if response_file.exists() {
                fs::remove_file(&response_file)?;
            }
            removed += 1;
        }
        Ok(removed)
    }

    fn file_path(&self, id: &str, kind: &str, sequence: u32) -> PathBuf {
        self.path.join(format!("{id}_{kind}_{sequence}.xml"))
    }
}

fn write_stamped(path: &Path, method: &XmlElement) -> Result<(), ConnectorError> {
    let mut stamped = method.clone();
    stamped.set_attr(TIMESTAMP_ATTR, chrono::Utc::now().to_rfc3339());
    fs::write(path, stamped.to_string())?;
    Ok(())
}

fn read_stamped(path: &Path) -> Result<(XmlElement, String), ConnectorError> {
    let text = fs::read_to_string(path)?;
    let mut method = XmlElement::parse(&text)?;
    let time = method.remove_attr(TIMESTAMP_ATTR).unwrap_or_default();
    Ok((method, time))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
