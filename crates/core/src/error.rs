/// Domain-level errors for XML and SOAP handling.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("XML parse error: {0}")]
    Parse(String),

    #[error("Malformed SOAP envelope: {0}")]
    Envelope(String),
}
