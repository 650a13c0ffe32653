use std::collections::VecDeque;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::error::RefreshError;

type Outcome = Result<String, RefreshError>;

/// Single-flight gate over credential refresh.
///
/// Holds the in-progress flag and the FIFO queue of waiting requests behind
/// one lock: checking the flag and enqueueing are a single step, so a waiter
/// can never slip in after the initiator has drained the queue.
#[derive(Debug, Default)]
pub(crate) struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

#[derive(Debug, Default)]
struct RefreshState {
    in_progress: bool,
    pending: VecDeque<oneshot::Sender<Outcome>>,
}

/// What a request that hit 401 should do next.
pub(crate) enum Ticket<'a> {
    /// Perform the refresh and settle everyone through the lease.
    Lead(RefreshLease<'a>),
    /// Wait for the in-flight refresh to hand over a token (or its error).
    Wait(oneshot::Receiver<Outcome>),
}

impl RefreshCoordinator {
    pub(crate) fn enter(&self) -> Ticket<'_> {
        let mut state = self.state.lock();
        if state.in_progress {
            let (tx, rx) = oneshot::channel();
            state.pending.push_back(tx);
            Ticket::Wait(rx)
        } else {
            state.in_progress = true;
            Ticket::Lead(RefreshLease {
                coordinator: self,
                settled: false,
            })
        }
    }

    pub(crate) fn is_refreshing(&self) -> bool {
        self.state.lock().in_progress
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Clear the flag, then hand `outcome` to every waiter in enqueue order.
    fn finish(&self, outcome: Outcome) -> usize {
        let waiters = {
            let mut state = self.state.lock();
            state.in_progress = false;
            std::mem::take(&mut state.pending)
        };

        let count = waiters.len();
        for waiter in waiters {
            // A closed receiver means that caller was cancelled; nothing to deliver.
            let _ = waiter.send(outcome.clone());
        }
        count
    }
}

/// Exclusive right to run the current refresh.
///
/// Must be settled with the refresh outcome. Dropping it unsettled (the
/// initiating request was cancelled mid-refresh) rejects all waiters with
/// [`RefreshError::Abandoned`] and reopens the gate.
pub(crate) struct RefreshLease<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl RefreshLease<'_> {
    /// Returns how many queued requests were settled.
    pub(crate) fn settle(mut self, outcome: Outcome) -> usize {
        self.settled = true;
        self.coordinator.finish(outcome)
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let abandoned = self.coordinator.finish(Err(RefreshError::Abandoned));
            tracing::warn!(waiters = abandoned, "Credential refresh abandoned");
        }
    }
}
