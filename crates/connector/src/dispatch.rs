//! Outbound SOAP dispatch.
//!
//! [`SoapDispatcher`] is the seam between script runs and the host
//! environment's remote-call machinery: implementations deliver a request
//! envelope to the named backend service and return the raw reply. The
//! connector ships two implementations, a recording test double and a
//! dispatcher for deployments with no outbound route at all.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use soapbridge_core::{soap, SoapMessage};

/// Failures from outbound dispatch. Propagated uncaught into the script
/// run; no retry layer exists on this side of the seam.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DispatchError {
    #[error("SOAP transport failure: {0}")]
    Transport(String),

    #[error("SOAP request timed out after {0:?}")]
    Timeout(Duration),

    #[error("No outbound SOAP route is configured")]
    Unrouted,
}

/// Synchronous outbound SOAP delivery.
///
/// `dispatch` blocks until the reply arrives or the implementation's
/// configured timeout elapses. Implementations must be callable from
/// overlapping invocations without shared mutable state visible to callers.
pub trait SoapDispatcher: Send + Sync {
    fn dispatch(&self, request: &SoapMessage) -> Result<SoapMessage, DispatchError>;
}

// ---------------------------------------------------------------------------
// UnroutedDispatcher
// ---------------------------------------------------------------------------

/// Dispatcher for deployments without a backend route: every synchronous
/// or delayed call fails with [`DispatchError::Unrouted`]. Scripts that
/// never call out keep working.
#[derive(Debug, Default)]
pub struct UnroutedDispatcher;

impl SoapDispatcher for UnroutedDispatcher {
    fn dispatch(&self, _request: &SoapMessage) -> Result<SoapMessage, DispatchError> {
        Err(DispatchError::Unrouted)
    }
}

// ---------------------------------------------------------------------------
// RecordingDispatcher
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingState {
    requests: Vec<SoapMessage>,
    replies: VecDeque<Result<SoapMessage, DispatchError>>,
}

/// Test double: records every dispatched request and replays queued
/// replies. With no reply queued it answers with an empty
/// `{Method}Response` element in the request method's namespace.
#[derive(Default)]
pub struct RecordingDispatcher {
    state: Mutex<RecordingState>,
    arrived: Condvar,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next dispatch.
    pub fn enqueue_reply(&self, reply: SoapMessage) {
        self.state
            .lock()
            .expect("recording dispatcher lock")
            .replies
            .push_back(Ok(reply));
    }

    /// Queue a failure for the next dispatch.
    pub fn enqueue_error(&self, error: DispatchError) {
        self.state
            .lock()
            .expect("recording dispatcher lock")
            .replies
            .push_back(Err(error));
    }

    /// Snapshot of all recorded requests, in dispatch order.
    pub fn requests(&self) -> Vec<SoapMessage> {
        self.state
            .lock()
            .expect("recording dispatcher lock")
            .requests
            .clone()
    }

    /// Block until the request at `index` has been dispatched, or until
    /// `timeout` elapses. Used to observe delayed fire-and-forget calls
    /// that outlive the originating invocation.
    pub fn wait_for_request(&self, index: usize, timeout: Duration) -> Option<SoapMessage> {
        let state = self.state.lock().expect("recording dispatcher lock");
        let (state, _result) = self
            .arrived
            .wait_timeout_while(state, timeout, |s| s.requests.len() <= index)
            .expect("recording dispatcher lock");
        state.requests.get(index).cloned()
    }
}

impl SoapDispatcher for RecordingDispatcher {
    fn dispatch(&self, request: &SoapMessage) -> Result<SoapMessage, DispatchError> {
        let mut state = self.state.lock().expect("recording dispatcher lock");
        state.requests.push(request.clone());
        let reply = state.replies.pop_front().unwrap_or_else(|| {
            Ok(SoapMessage::new(soap::response_method_for(&request.method)))
        });
        drop(state);
        self.arrived.notify_all();
        reply
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
