//! Cancellable delayed task.
//!
//! At most one task is pending. Scheduling replaces the pending task and
//! restarts the delay; the caller drives time through [`Debouncer::fire_due`].

use chrono::{DateTime, TimeDelta, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending<T> {
    due: DateTime<Utc>,
    task: T,
}

/// Single-slot debouncer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer<T> {
    delay: TimeDelta,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub fn new(delay: TimeDelta) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule `task` to run `delay` after `now`, returning the task it
    /// replaced.
    pub fn schedule(&mut self, task: T, now: DateTime<Utc>) -> Option<T> {
        let due = now + self.delay;
        self.pending
            .replace(Pending { due, task })
            .map(|replaced| replaced.task)
    }

    /// Drop the pending task.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.task)
    }

    /// Take the pending task if it is due at `now`.
    pub fn fire_due(&mut self, now: DateTime<Utc>) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| p.due <= now) {
            self.cancel()
        } else {
            None
        }
    }

    /// When the pending task becomes due.
    #[must_use]
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.pending.as_ref().map(|p| p.due)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap_or_default()
    }

    #[test]
    fn test_fires_only_when_due() {
        let mut d = Debouncer::new(TimeDelta::milliseconds(250));
        assert_eq!(d.schedule("a", at(0)), None);
        assert_eq!(d.fire_due(at(249)), None);
        assert_eq!(d.fire_due(at(250)), Some("a"));
        assert!(!d.is_pending());
    }

    #[test]
    fn test_reschedule_replaces_and_restarts() {
        let mut d = Debouncer::new(TimeDelta::milliseconds(250));
        let _ = d.schedule(1, at(0));
        assert_eq!(d.schedule(2, at(200)), Some(1));
        assert_eq!(d.deadline(), Some(at(450)));
        assert_eq!(d.fire_due(at(300)), None);
        assert_eq!(d.fire_due(at(450)), Some(2));
    }

    #[test]
    fn test_cancel() {
        let mut d = Debouncer::new(TimeDelta::milliseconds(10));
        let _ = d.schedule((), at(0));
        assert_eq!(d.cancel(), Some(()));
        assert_eq!(d.fire_due(at(100)), None);
    }
}
