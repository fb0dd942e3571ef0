use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{Result, ScoutError};
use crate::scrapers::selectors::Role;

/// What must hold for an element before the workflow acts on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Visible,
    Clickable,
}

/// Result of a bounded wait. Callers pick the policy for the non-ready cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    Ready,
    TimedOut { waited: Duration },
    NotFound,
}

impl WaitOutcome {
    /// Abort policy: anything but `Ready` becomes an error naming `role`.
    pub fn require(self, role: Role) -> Result<()> {
        match self {
            WaitOutcome::Ready => Ok(()),
            WaitOutcome::TimedOut { waited } => Err(ScoutError::Timeout { role, waited }),
            WaitOutcome::NotFound => Err(ScoutError::ElementNotFound { role }),
        }
    }
}

/// Polls a condition up to a fixed timeout
#[derive(Debug, Clone, Copy)]
pub struct BoundedWait {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl BoundedWait {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(250),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Poll `probe` until it reports true or the timeout passes.
    /// Probe errors end the wait immediately.
    pub fn until<F>(&self, mut probe: F) -> Result<WaitOutcome>
    where
        F: FnMut() -> Result<bool>,
    {
        let started = Instant::now();
        loop {
            if probe()? {
                return Ok(WaitOutcome::Ready);
            }

            let waited = started.elapsed();
            if waited >= self.timeout {
                debug!("Gave up after {:?}", waited);
                return Ok(WaitOutcome::TimedOut { waited });
            }

            thread::sleep(self.poll_interval.min(self.timeout - waited));
        }
    }

    /// Single probe, no waiting
    pub fn immediate<F>(mut probe: F) -> Result<WaitOutcome>
    where
        F: FnMut() -> Result<bool>,
    {
        if probe()? {
            Ok(WaitOutcome::Ready)
        } else {
            Ok(WaitOutcome::NotFound)
        }
    }
}

impl Default for BoundedWait {
    fn default() -> Self {
        Self::new(Duration::from_secs(15))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick(timeout_ms: u64) -> BoundedWait {
        BoundedWait::new(Duration::from_millis(timeout_ms)).with_poll_interval(Duration::from_millis(5))
    }

    #[test]
    fn ready_once_probe_passes() {
        let mut calls = 0;
        let outcome = quick(1_000)
            .until(|| {
                calls += 1;
                Ok(calls >= 3)
            })
            .unwrap();

        assert_eq!(outcome, WaitOutcome::Ready);
        assert_eq!(calls, 3);
    }

    #[test]
    fn times_out_when_probe_never_passes() {
        let outcome = quick(40).until(|| Ok(false)).unwrap();

        match outcome {
            WaitOutcome::TimedOut { waited } => assert!(waited >= Duration::from_millis(40)),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[test]
    fn probe_error_stops_waiting() {
        let err = quick(1_000)
            .until(|| Err(ScoutError::config("tab crashed")))
            .unwrap_err();
        assert!(matches!(err, ScoutError::Config { .. }));
    }

    #[test]
    fn immediate_reports_not_found() {
        assert_eq!(BoundedWait::immediate(|| Ok(false)).unwrap(), WaitOutcome::NotFound);
        assert_eq!(BoundedWait::immediate(|| Ok(true)).unwrap(), WaitOutcome::Ready);
    }

    #[test]
    fn require_maps_outcomes_to_errors() {
        assert!(WaitOutcome::Ready.require(Role::SearchField).is_ok());

        let err = WaitOutcome::TimedOut {
            waited: Duration::from_secs(15),
        }
        .require(Role::SeeAllButton)
        .unwrap_err();
        assert!(matches!(err, ScoutError::Timeout { role: Role::SeeAllButton, .. }));

        let err = WaitOutcome::NotFound.require(Role::RemineLink).unwrap_err();
        assert!(matches!(err, ScoutError::ElementNotFound { role: Role::RemineLink }));
    }
}
