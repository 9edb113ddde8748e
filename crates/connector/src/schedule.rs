//! Delayed fire-and-forget SOAP dispatch.
//!
//! A scheduled request is handed to the runtime and delivered after the
//! given delay, independent of the originating invocation's lifetime.
//! This is an at-least-once-effort contract: failures are logged, never
//! propagated, and there is no cancellation or completion signal.

use std::sync::Arc;
use std::time::Duration;

use soapbridge_core::SoapMessage;

use crate::dispatch::SoapDispatcher;

/// Spawn a task that dispatches `request` after `delay`.
pub fn schedule_delayed(
    handle: &tokio::runtime::Handle,
    dispatcher: Arc<dyn SoapDispatcher>,
    request: SoapMessage,
    delay: Duration,
) {
    let method = request.method_name().to_string();
    tracing::debug!(method = %method, delay_ms = delay.as_millis() as u64, "Scheduling delayed SOAP request");

    handle.spawn(async move {
        tokio::time::sleep(delay).await;
        // Dispatch blocks; keep it off the async workers.
        let result =
            tokio::task::spawn_blocking(move || dispatcher.dispatch(&request)).await;
        match result {
            Ok(Ok(reply)) => {
                tracing::debug!(
                    method = %method,
                    reply = %reply.method_name(),
                    "Delayed SOAP request delivered"
                );
            }
            Ok(Err(e)) => {
                tracing::error!(method = %method, error = %e, "Delayed SOAP request failed");
            }
            Err(e) => {
                tracing::error!(method = %method, error = %e, "Delayed SOAP dispatch task failed");
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
