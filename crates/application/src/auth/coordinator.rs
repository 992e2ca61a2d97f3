//! Single-flight coordination of token refreshes.
//!
//! The first caller that sees an expired access token becomes the leader and
//! performs the refresh. Every caller arriving while the refresh is running
//! becomes a follower and waits for the leader's outcome.

use std::sync::Arc;

use parking_lot::Mutex;
use purse_domain::AuthError;
use tokio::sync::oneshot;
use tracing::debug;

/// Outcome of a refresh: the new access token or the reason it failed.
pub type RefreshOutcome = Result<String, AuthError>;

/// Whether a refresh is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    /// No refresh in flight.
    Idle,
    /// A leader holds the lease.
    Refreshing,
}

#[derive(Debug, Default)]
struct RefreshState {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
    cycles: u64,
}

/// Serializes refreshes for one transport.
///
/// The lock is only held for check-and-set and queue operations, never across
/// an await.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

/// Role assigned by [`RefreshCoordinator::begin_or_join`].
#[derive(Debug)]
pub enum RefreshRole {
    /// The caller must perform the refresh and settle the lease.
    Leader(RefreshLease),
    /// A refresh is already running; wait for its outcome.
    Follower(RefreshWaiter),
}

impl RefreshCoordinator {
    /// Create an idle coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a refresh cycle or joins the one in flight.
    #[must_use]
    pub fn begin_or_join(self: &Arc<Self>) -> RefreshRole {
        let mut state = self.state.lock();
        if state.refreshing {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            debug!(queued = state.waiters.len(), "Joined in-flight token refresh");
            RefreshRole::Follower(RefreshWaiter { rx })
        } else {
            state.refreshing = true;
            debug!("Starting token refresh");
            RefreshRole::Leader(RefreshLease {
                coordinator: Arc::clone(self),
                settled: false,
            })
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> RefreshPhase {
        if self.state.lock().refreshing {
            RefreshPhase::Refreshing
        } else {
            RefreshPhase::Idle
        }
    }

    /// Number of followers waiting on the current refresh.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Number of refresh cycles settled so far.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.state.lock().cycles
    }

    fn settle(&self, outcome: &RefreshOutcome) -> usize {
        let waiters = {
            let mut state = self.state.lock();
            state.refreshing = false;
            state.cycles += 1;
            std::mem::take(&mut state.waiters)
        };

        waiters
            .into_iter()
            .filter(|tx| !tx.is_closed())
            .map(|tx| tx.send(outcome.clone()))
            .filter(Result::is_ok)
            .count()
    }
}

/// Exclusive right to perform the current refresh.
///
/// Dropping an unsettled lease rejects every follower with
/// [`AuthError::RefreshAbandoned`]. `AuthenticatedTransport` keeps its lease
/// on a spawned task, so there this only happens if that task panics or the
/// runtime shuts down.
#[derive(Debug)]
pub struct RefreshLease {
    coordinator: Arc<RefreshCoordinator>,
    settled: bool,
}

impl RefreshLease {
    /// Hands the new access token to every follower.
    ///
    /// Returns the number of followers notified.
    pub fn resolve(mut self, access_token: impl Into<String>) -> usize {
        self.settled = true;
        self.coordinator.settle(&Ok(access_token.into()))
    }

    /// Fails every follower with `error`.
    ///
    /// Returns the number of followers notified.
    pub fn reject(mut self, error: AuthError) -> usize {
        self.settled = true;
        self.coordinator.settle(&Err(error))
    }
}

impl Drop for RefreshLease {
    fn drop(&mut self) {
        if !self.settled {
            let notified = self.coordinator.settle(&Err(AuthError::RefreshAbandoned));
            debug!(notified, "Token refresh abandoned");
        }
    }
}

/// A follower's handle on the in-flight refresh.
#[derive(Debug)]
pub struct RefreshWaiter {
    rx: oneshot::Receiver<RefreshOutcome>,
}

impl RefreshWaiter {
    /// Waits for the leader's outcome.
    ///
    /// # Errors
    ///
    /// Returns the error the leader rejected the refresh with.
    pub async fn wait(self) -> RefreshOutcome {
        self.rx.await.unwrap_or(Err(AuthError::RefreshAbandoned))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn leader(coordinator: &Arc<RefreshCoordinator>) -> RefreshLease {
        match coordinator.begin_or_join() {
            RefreshRole::Leader(lease) => lease,
            RefreshRole::Follower(_) => panic!("expected leader"),
        }
    }

    fn follower(coordinator: &Arc<RefreshCoordinator>) -> RefreshWaiter {
        match coordinator.begin_or_join() {
            RefreshRole::Follower(waiter) => waiter,
            RefreshRole::Leader(_) => panic!("expected follower"),
        }
    }

    #[tokio::test]
    async fn test_first_caller_leads_others_follow() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let lease = leader(&coordinator);
        assert_eq!(coordinator.phase(), RefreshPhase::Refreshing);

        let a = follower(&coordinator);
        let b = follower(&coordinator);
        assert_eq!(coordinator.queued(), 2);

        assert_eq!(lease.resolve("T2"), 2);
        assert_eq!(a.wait().await.unwrap(), "T2");
        assert_eq!(b.wait().await.unwrap(), "T2");

        assert_eq!(coordinator.phase(), RefreshPhase::Idle);
        assert_eq!(coordinator.queued(), 0);
        assert_eq!(coordinator.cycles(), 1);
    }

    #[tokio::test]
    async fn test_reject_fans_out_error() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let lease = leader(&coordinator);
        let waiter = follower(&coordinator);

        let error = AuthError::RefreshRejected {
            status: 401,
            message: "expired".to_string(),
        };
        assert_eq!(lease.reject(error.clone()), 1);
        assert_eq!(waiter.wait().await, Err(error));
        assert_eq!(coordinator.phase(), RefreshPhase::Idle);
    }

    #[tokio::test]
    async fn test_dropped_lease_abandons_refresh() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let lease = leader(&coordinator);
        let waiter = follower(&coordinator);

        drop(lease);

        assert_eq!(waiter.wait().await, Err(AuthError::RefreshAbandoned));
        assert_eq!(coordinator.phase(), RefreshPhase::Idle);
        assert_eq!(coordinator.cycles(), 1);
    }

    #[tokio::test]
    async fn test_new_cycle_after_settle() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        assert_eq!(leader(&coordinator).resolve("T2"), 0);

        let second = leader(&coordinator);
        let waiter = follower(&coordinator);
        second.resolve("T3");

        assert_eq!(waiter.wait().await.unwrap(), "T3");
        assert_eq!(coordinator.cycles(), 2);
    }

    #[test]
    fn test_dropped_follower_is_not_counted() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let lease = leader(&coordinator);
        let kept = follower(&coordinator);
        drop(follower(&coordinator));

        assert_eq!(lease.resolve("T2"), 1);
        drop(kept);
    }
}
