//! Mock service control for unit and integration testing.
//!
//! The real adapters stop and start actual OS services, which needs admin
//! rights and an installed Qlik Sense.  `MockServiceControl` replaces every
//! OS call with in-memory bookkeeping:
//!
//! - `query_state` walks a scripted list of states.  Each query consumes one
//!   entry; the last entry repeats forever, so `[Stopped, StartPending]`
//!   models a service that never finishes starting.
//! - Every call is appended to `calls` so tests can assert the order.
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` to make every method return
//! `ServiceError::Platform`.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::application::restart_service::{ServiceControl, ServiceError, ServiceState};

/// One recorded call on the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceCall {
    QueryState,
    AcceptsStop,
    Stop,
    Start,
}

/// A mock service that follows a scripted state sequence.
pub struct MockServiceControl {
    /// Name returned by `service_name`.
    pub name: String,
    /// Remaining scripted states; the last one is sticky.
    pub states: Mutex<VecDeque<ServiceState>>,
    /// Every call made, in order.
    pub calls: Mutex<Vec<ServiceCall>>,
    /// Value returned by `accepts_stop`.
    pub accepts_stop: bool,
    /// When `true`, every method returns a platform error.
    pub should_fail: bool,
}

impl MockServiceControl {
    /// Creates a mock that accepts stop and reports `states` in order.
    pub fn new(states: Vec<ServiceState>) -> Self {
        Self {
            name: "Mock Printing Service".to_string(),
            states: Mutex::new(states.into()),
            calls: Mutex::new(Vec::new()),
            accepts_stop: true,
            should_fail: false,
        }
    }

    fn record(&self, call: ServiceCall) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(call);
        if self.should_fail {
            return Err(ServiceError::Platform("mock failure".into()));
        }
        Ok(())
    }
}

impl ServiceControl for MockServiceControl {
    fn service_name(&self) -> &str {
        &self.name
    }

    /// Pops the next scripted state, repeating the last one.
    fn query_state(&self) -> Result<ServiceState, ServiceError> {
        self.record(ServiceCall::QueryState)?;
        let mut states = self.states.lock().unwrap();
        let state = if states.len() > 1 {
            states.pop_front()
        } else {
            states.front().copied()
        };
        Ok(state.unwrap_or(ServiceState::Unknown))
    }

    fn accepts_stop(&self) -> Result<bool, ServiceError> {
        self.record(ServiceCall::AcceptsStop)?;
        Ok(self.accepts_stop)
    }

    fn stop(&self) -> Result<(), ServiceError> {
        self.record(ServiceCall::Stop)
    }

    fn start(&self) -> Result<(), ServiceError> {
        self.record(ServiceCall::Start)
    }
}
