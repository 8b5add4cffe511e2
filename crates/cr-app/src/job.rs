use log::{info, warn};

/// Where a single `/submit-prompt/` request is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Received,
    Validated,
    Dispatched,
    Waiting,
    Completed,
    Rejected,
    DispatchFailed,
    TimedOut,
    Cancelled,
    Failed,
}

impl JobStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Received | Self::Validated | Self::Dispatched | Self::Waiting)
    }

    pub fn is_failed(&self) -> bool {
        matches!(
            self,
            Self::Rejected | Self::DispatchFailed | Self::TimedOut | Self::Cancelled | Self::Failed
        )
    }

    pub fn can_advance_to(&self, next: Self) -> bool {
        use JobStatus::*;

        matches!(
            (*self, next),
            (Received, Validated | Rejected)
                | (Validated, Dispatched | DispatchFailed)
                | (Dispatched, Waiting)
                | (Waiting, Completed | TimedOut | Cancelled | Failed)
        )
    }
}

/// Records and logs the transitions of one request.
#[derive(Debug)]
pub struct JobTracker {
    status: JobStatus,
}

impl JobTracker {
    pub fn new() -> Self {
        Self {
            status: JobStatus::Received,
        }
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn advance(&mut self, next: JobStatus) {
        if !self.status.is_active() {
            warn!("Job already finished as {:?}, ignoring {:?}", self.status, next);
            return;
        }
        if !self.status.can_advance_to(next) {
            warn!("Unexpected job transition {:?} -> {:?}", self.status, next);
        }
        if next.is_failed() {
            warn!("Job {:?} -> {:?}", self.status, next);
        } else {
            info!("Job {:?} -> {:?}", self.status, next);
        }
        self.status = next;
    }
}

impl Default for JobTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut tracker = JobTracker::new();
        for next in [JobStatus::Validated, JobStatus::Dispatched, JobStatus::Waiting, JobStatus::Completed] {
            assert!(tracker.status().can_advance_to(next));
            tracker.advance(next);
        }
        assert_eq!(tracker.status(), JobStatus::Completed);
        assert!(!tracker.status().is_active());

        tracker.advance(JobStatus::Failed);
        assert_eq!(tracker.status(), JobStatus::Completed);
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobStatus::Received.can_advance_to(JobStatus::Rejected));
        assert!(JobStatus::Validated.can_advance_to(JobStatus::DispatchFailed));
        assert!(JobStatus::Waiting.can_advance_to(JobStatus::TimedOut));

        for terminal in [JobStatus::Completed, JobStatus::Rejected, JobStatus::TimedOut] {
            assert!(!terminal.can_advance_to(JobStatus::Waiting));
            assert!(!terminal.is_active());
        }
    }

    #[test]
    fn test_no_skipping_dispatch() {
        assert!(!JobStatus::Validated.can_advance_to(JobStatus::Waiting));
        assert!(!JobStatus::Received.can_advance_to(JobStatus::Dispatched));
        assert!(!JobStatus::Dispatched.can_advance_to(JobStatus::TimedOut));
    }

    #[test]
    fn test_failed_states() {
        assert!(JobStatus::DispatchFailed.is_failed());
        assert!(!JobStatus::Completed.is_failed());
        assert!(!JobStatus::Dispatched.is_failed());
    }
}
