//! Envelope shapes for the external XMLStore service.
//!
//! The store is key-addressed and exposed through two operations, get and
//! update. The namespace and the `tuple`/`old`/`new` container shapes are
//! wire constants of the external service; replies wrap result rows inside
//! nested `tuple`/`old` elements repeated once per row.

use soapbridge_core::XmlElement;

/// Namespace of the external XMLStore service.
pub const XMLSTORE_NS: &str = "http://schemas.cordys.com/1.0/xmlstore";

/// Build a `GetXMLObject` request for the given store key.
pub fn get_xml_object(key: &str) -> XmlElement {
    XmlElement::in_namespace("GetXMLObject", XMLSTORE_NS).with_child(
        XmlElement::new("key")
            .with_attr("version", "organization")
            .with_text(key),
    )
}

/// Build an `UpdateXMLObject` request storing `payload` under `key`.
/// An absent payload writes an empty object.
pub fn update_xml_object(key: &str, payload: Option<XmlElement>) -> XmlElement {
    let mut new = XmlElement::new("new");
    if let Some(payload) = payload {
        new.push_child(payload);
    }
    XmlElement::in_namespace("UpdateXMLObject", XMLSTORE_NS).with_child(
        XmlElement::new("tuple")
            .with_attr("key", key)
            .with_attr("version", "organization")
            .with_attr("isFolder", "false")
            .with_attr("unconditional", "true")
            .with_child(new),
    )
}

/// Unwrap the result rows of a store reply: for every `tuple` element, the
/// element children of its `old` container.
pub fn tuple_rows(reply: &XmlElement) -> Vec<&XmlElement> {
    reply
        .descendants_named("tuple", None)
        .filter_map(|tuple| tuple.find_descendant("old", None))
        .flat_map(XmlElement::child_elements)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
