//! Per-invocation call context: cancellation and deadline.
//!
//! Every database round trip made through the repository checks the context
//! first, so a cancelled or expired context surfaces as an ordinary error at
//! the next statement boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{DbError, DbResult};

/// A cancellation flag shared between the caller and a running migration.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Cancellation and deadline for one engine invocation.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that never expires and is only cancelled through its token.
    pub fn background() -> Self {
        Self::default()
    }

    /// Attach an existing cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Expire at `deadline`, or earlier if a deadline is already set.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Expire `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Token that cancels this context (and every clone of it).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail if the context has been cancelled or its deadline has passed.
    pub fn check(&self) -> DbResult<()> {
        if self.cancel.is_cancelled() {
            return Err(DbError::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(DbError::DeadlineExceeded);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_live() {
        assert!(CallContext::background().check().is_ok());
    }

    #[test]
    fn test_cancel_propagates_to_clones() {
        let ctx = CallContext::background();
        let child = ctx.clone();
        ctx.cancellation_token().cancel();
        assert!(matches!(child.check(), Err(DbError::Cancelled)));
    }

    #[test]
    fn test_expired_deadline() {
        let ctx = CallContext::background().with_timeout(Duration::ZERO);
        assert!(matches!(ctx.check(), Err(DbError::DeadlineExceeded)));
    }

    #[test]
    fn test_earlier_deadline_wins() {
        let soon = Instant::now() + Duration::from_secs(1);
        let later = soon + Duration::from_secs(60);
        let ctx = CallContext::background()
            .with_deadline(soon)
            .with_deadline(later);
        assert_eq!(ctx.deadline(), Some(soon));
    }
}
