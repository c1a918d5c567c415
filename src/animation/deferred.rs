//! Cancelable follow-ups keyed to a deadline.
//!
//! Mode changes schedule work for later (unlocking width, revealing
//! content, flipping the displayed mode). Everything runs on the frame tick,
//! so there is no locking: a follow-up is just an entry with a deadline that
//! [`DeferredQueue::drain_due`] hands back once the tick passes it.
//! Scheduling an action replaces any pending action of the same kind (same
//! enum variant), and a canceled token can never fire.

use std::mem::{discriminant, Discriminant};

/// Handle for a scheduled follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CancelToken(u64);

#[derive(Debug, Clone)]
struct Pending<A> {
    token: CancelToken,
    kind: Discriminant<A>,
    deadline: f32,
    action: A,
}

/// Deadline-ordered queue of follow-up actions.
#[derive(Debug, Clone)]
pub struct DeferredQueue<A> {
    pending: Vec<Pending<A>>,
    next_token: u64,
}

impl<A> DeferredQueue<A> {
    /// Empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_token: 0,
        }
    }

    /// Schedule `action` to fire once time reaches `deadline`. A pending
    /// action of the same kind is canceled first.
    pub fn schedule(&mut self, deadline: f32, action: A) -> CancelToken {
        let kind = discriminant(&action);
        let before = self.pending.len();
        self.pending.retain(|p| p.kind != kind);
        if self.pending.len() != before {
            log::trace!("replaced pending follow-up of the same kind");
        }

        let token = CancelToken(self.next_token);
        self.next_token += 1;
        self.pending.push(Pending {
            token,
            kind,
            deadline,
            action,
        });
        token
    }

    /// Cancel one follow-up. Returns false if it already fired or was
    /// canceled.
    pub fn cancel(&mut self, token: CancelToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.token != token);
        before != self.pending.len()
    }

    /// Cancel everything. Returns how many follow-ups were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        if dropped > 0 {
            log::trace!("canceled {dropped} pending follow-ups");
        }
        dropped
    }

    /// Number of pending follow-ups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every action whose deadline is at or before `t`,
    /// earliest first (ties in scheduling order).
    pub fn drain_due(&mut self, t: f32) -> Vec<A> {
        let (mut due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|p| p.deadline <= t);
        self.pending = waiting;
        due.sort_by(|a, b| {
            a.deadline
                .total_cmp(&b.deadline)
                .then(a.token.cmp(&b.token))
        });
        due.into_iter().map(|p| p.action).collect()
    }
}

impl<A> Default for DeferredQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}
