//! Core domain types for the soapbridge connector.
//!
//! This crate is dependency-light on purpose: it holds the XML tree model,
//! the storage-key escaper and the SOAP message shapes, with no I/O and no
//! async. Everything the connector and the sample scripts share lives here.

pub mod error;
pub mod escape;
pub mod soap;
pub mod xml;

pub use error::CoreError;
pub use escape::{escape_key_segment, StoreKey};
pub use soap::{SoapFault, SoapMessage};
pub use xml::{XmlAttribute, XmlElement, XmlNode};
