//! Single-slot cancellable timer.
//!
//! The timer does not own a clock. Hosts either hand the returned
//! [`TimerToken`] to a real scheduler (e.g. `setTimeout`) and call
//! [`DebounceTimer::fire`] when it elapses, or drive it deterministically with
//! [`DebounceTimer::expired`].
//!
//! Only one firing is ever outstanding: scheduling again supersedes the
//! previous token, and a superseded or cancelled token never fires.

use tracing::trace;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Pending {
    token: TimerToken,
    due_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebounceTimer {
    delay_ms: f64,
    next_token: u64,
    pending: Option<Pending>,
}

impl DebounceTimer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms: delay_ms.max(0.0),
            next_token: 0,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Arms the timer at `now_ms + delay`, superseding any earlier token.
    pub fn schedule(&mut self, now_ms: f64) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        if let Some(prev) = self.pending.replace(Pending {
            token,
            due_ms: now_ms + self.delay_ms,
        }) {
            trace!(superseded = prev.token.0, token = token.0, "timer rescheduled");
        }
        token
    }

    /// Returns `true` if a pending firing was discarded.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Consumes the pending firing if `token` is still the current one.
    ///
    /// Stale tokens (superseded or cancelled) return `false` and leave the
    /// timer untouched.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        match self.pending {
            Some(p) if p.token == token => {
                self.pending = None;
                true
            }
            _ => {
                trace!(token = token.0, "stale timer firing ignored");
                false
            }
        }
    }

    /// The pending token if its deadline has passed at `now_ms`.
    pub fn expired(&self, now_ms: f64) -> Option<TimerToken> {
        self.pending
            .filter(|p| now_ms >= p.due_ms)
            .map(|p| p.token)
    }
}
