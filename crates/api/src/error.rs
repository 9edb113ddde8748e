use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use soapbridge_connector::{Connector, ConnectorError};
use soapbridge_core::SoapFault;

/// Content type of every SOAP response and fault.
pub const TEXT_XML: &str = "text/xml; charset=utf-8";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`ConnectorError`] for transaction failures and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce a SOAP
/// fault envelope, which is how this surface reports every failure.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A transaction failure from the connector.
    #[error(transparent)]
    Connector(#[from] ConnectorError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let fault = match &self {
            ApiError::Connector(error) => {
                tracing::debug!(error = %error, "Transaction failed");
                Connector::fault_for(error)
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                SoapFault::server("An internal error occurred")
            }
        };

        // SOAP 1.1 over HTTP reports faults with status 500.
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, TEXT_XML)],
            fault.to_envelope_string(),
        )
            .into_response()
    }
}
