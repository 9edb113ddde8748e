//! Method-to-script registry.
//!
//! Scripts are keyed by a [`MethodLocator`]: the method's local name plus an
//! optional namespace. A `None` namespace registers the script for that
//! method name in any namespace; resolution tries the exact namespace first
//! and falls back to the wildcard entry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::script::Script;

/// Registry key: method local name plus optional namespace URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodLocator {
    pub name: String,
    pub namespace: Option<String>,
}

impl MethodLocator {
    /// Locator matching the method name in any namespace.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    /// Locator matching the method name in exactly the given namespace.
    pub fn in_namespace(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
        }
    }
}

/// The set of registered scripts. Immutable after startup; resolution is
/// read-only and shared across invocations.
#[derive(Default)]
pub struct ScriptCatalog {
    scripts: HashMap<MethodLocator, Arc<dyn Script>>,
}

impl ScriptCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a script. A later registration for the same locator
    /// replaces the earlier one.
    pub fn register(&mut self, locator: MethodLocator, script: Arc<dyn Script>) {
        self.scripts.insert(locator, script);
    }

    /// Resolve the script for an inbound method: exact namespace match
    /// first, then the any-namespace entry.
    pub fn resolve(&self, name: &str, namespace: Option<&str>) -> Option<Arc<dyn Script>> {
        if let Some(ns) = namespace {
            let exact = MethodLocator::in_namespace(name, ns);
            if let Some(script) = self.scripts.get(&exact) {
                return Some(Arc::clone(script));
            }
        }
        self.scripts
            .get(&MethodLocator::named(name))
            .map(Arc::clone)
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
