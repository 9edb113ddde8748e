//! ListFiles sample: local directory enumeration.

use soapbridge_connector::{Script, ScriptContext, ScriptFault};
use soapbridge_core::XmlElement;

/// Reads `<dir>` from the request and returns
/// `<files><file>{path}</file>*</files>`. A missing or unreadable
/// directory yields an empty listing rather than a fault; entries are
/// sorted for stable output.
pub struct ListFiles;

impl Script for ListFiles {
    fn execute(&self, ctx: &mut ScriptContext<'_>) -> Result<(), ScriptFault> {
        let dir = ctx.request().descendant_text("dir").unwrap_or_default();

        let mut paths: Vec<_> = match std::fs::read_dir(&dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .collect(),
            Err(_) => Vec::new(),
        };
        paths.sort();

        let mut files = XmlElement::new("files");
        for path in paths {
            files.push_child(XmlElement::new("file").with_text(path.display().to_string()));
        }
        ctx.set_response(files);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
