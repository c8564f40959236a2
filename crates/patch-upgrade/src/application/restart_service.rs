//! RestartServiceUseCase: stops and starts the printing service.
//!
//! The OS is reached through the [`ServiceControl`] trait; the platform
//! implementations live in the infrastructure layer.  This module owns the
//! orchestration and the state polling:
//!
//! 1. If the service accepts a stop request, stop it and wait for
//!    [`ServiceState::Stopped`].  The wait is unbounded unless
//!    [`RestartPolicy::stop_timeout`] is set.
//! 2. Start it and wait up to [`RestartPolicy::start_timeout`] for
//!    [`ServiceState::Running`].
//!
//! A timeout is not an error.  It is returned as a [`RestartOutcome`] so the
//! caller can tell the operator that manual follow-up is needed and still
//! exit normally.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, error, info};

/// Error type for service control operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No service with this name is installed.
    #[error("service {0:?} is not installed")]
    NotInstalled(String),
    /// The OS refused or failed the request.
    #[error("platform error: {0}")]
    Platform(String),
    /// This platform has no service control adapter.
    #[error("service control is not supported on this platform")]
    Unsupported,
}

/// State of an OS service as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Stopped,
    StartPending,
    StopPending,
    Running,
    ContinuePending,
    PausePending,
    Paused,
    Unknown,
}

/// Platform-agnostic control of a single named service.
///
/// Each supported OS provides an implementation in the infrastructure layer.
pub trait ServiceControl: Send + Sync {
    /// Name of the controlled service, for log messages.
    fn service_name(&self) -> &str;

    /// Returns the current state of the service.
    fn query_state(&self) -> Result<ServiceState, ServiceError>;

    /// Returns `true` if the service currently accepts a stop request.
    fn accepts_stop(&self) -> Result<bool, ServiceError>;

    /// Asks the service to stop.  Does not wait.
    fn stop(&self) -> Result<(), ServiceError>;

    /// Asks the service to start.  Does not wait.
    fn start(&self) -> Result<(), ServiceError>;
}

/// Timing for a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartPolicy {
    /// How long to wait for `Running` after the start request.
    pub start_timeout: Duration,
    /// How long to wait for `Stopped`; `None` waits indefinitely.
    pub stop_timeout: Option<Duration>,
    /// Delay between two state queries.
    pub poll_interval: Duration,
}

impl Default for RestartPolicy {
    /// | Field         | Default    |
    /// |---------------|------------|
    /// | start_timeout | 10 seconds |
    /// | stop_timeout  | none       |
    /// | poll_interval | 250 ms     |
    fn default() -> Self {
        Self {
            start_timeout: Duration::from_secs(10),
            stop_timeout: None,
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// How a restart ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartOutcome {
    /// The service is running again.
    Restarted,
    /// The service did not stop within the stop timeout; start was not attempted.
    StopTimedOut { waited: Duration },
    /// The service was started but did not report `Running` in time.
    StartTimedOut { waited: Duration },
}

impl RestartOutcome {
    /// `true` if the operator must check the service by hand.
    pub fn needs_manual_action(&self) -> bool {
        !matches!(self, RestartOutcome::Restarted)
    }
}

/// The restart-service use case.
pub struct RestartServiceUseCase {
    control: Arc<dyn ServiceControl>,
    policy: RestartPolicy,
}

impl RestartServiceUseCase {
    /// Creates a new use case with the given platform adapter and timing.
    pub fn new(control: Arc<dyn ServiceControl>, policy: RestartPolicy) -> Self {
        Self { control, policy }
    }

    /// Stops (if possible) and starts the service.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if any OS call fails.  Timeouts are reported
    /// through the returned [`RestartOutcome`] instead.
    pub fn run(&self) -> Result<RestartOutcome, ServiceError> {
        let name = self.control.service_name();

        if self.control.accepts_stop()? {
            info!("Stopping {name}...");
            self.control.stop()?;
            if let Err(waited) = self.wait_for(ServiceState::Stopped, self.policy.stop_timeout)? {
                error!(
                    "{name} did not stop after {}s. Manual interaction required.",
                    waited.as_secs()
                );
                return Ok(RestartOutcome::StopTimedOut { waited });
            }
            info!("Stopping {name}... Done");
        } else {
            debug!("{name} does not accept stop requests; starting directly");
        }

        info!("Restarting {name}...");
        self.control.start()?;
        match self.wait_for(ServiceState::Running, Some(self.policy.start_timeout))? {
            Ok(()) => {
                info!("Restarting {name}... Done");
                Ok(RestartOutcome::Restarted)
            }
            Err(waited) => {
                error!("Restarting {name}... Error");
                error!(
                    "Service failed to restart after {}s. Manual interaction required.",
                    waited.as_secs()
                );
                Ok(RestartOutcome::StartTimedOut { waited })
            }
        }
    }

    /// Polls until the service reports `target`.
    ///
    /// The outer `Result` carries OS failures; the inner one is `Err(waited)`
    /// when `timeout` elapsed first.
    fn wait_for(
        &self,
        target: ServiceState,
        timeout: Option<Duration>,
    ) -> Result<Result<(), Duration>, ServiceError> {
        let started = Instant::now();
        loop {
            let state = self.control.query_state()?;
            if state == target {
                return Ok(Ok(()));
            }

            let elapsed = started.elapsed();
            let sleep_for = match timeout {
                Some(limit) if elapsed >= limit => return Ok(Err(limit)),
                Some(limit) => self.policy.poll_interval.min(limit - elapsed),
                None => self.policy.poll_interval,
            };
            debug!(?state, ?target, "waiting for service state");
            std::thread::sleep(sleep_for);
        }
    }
}
