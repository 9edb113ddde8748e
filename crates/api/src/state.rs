use std::sync::Arc;

use soapbridge_connector::Connector;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`. Cheaply cloneable; everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The connector runtime processing SOAP transactions.
    pub connector: Arc<Connector>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
