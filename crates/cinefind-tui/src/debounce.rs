//! Single-slot trailing-edge debounce.
//!
//! Each submission replaces the pending value and restarts the timer, so a
//! burst of changes settles into one value: the last one, released once no
//! further change arrived within the delay.

use std::time::Duration;

use tokio::time::Instant;

/// Default settle window for the search term.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(750);

/// A value waiting for its deadline.
#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Trailing-edge debouncer holding at most one pending value.
#[derive(Debug)]
pub struct Debouncer<T> {
    /// Settle window.
    delay: Duration,
    /// Latest submission, if not yet released.
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    /// Creates an empty debouncer with the given settle window.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Stores `value` and re-arms the timer, dropping any pending value.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn submit(&mut self, value: T) {
        let deadline = Instant::now() + self.delay;
        self.pending = Some(Pending { value, deadline });
    }

    /// Returns `true` while a value waits for its deadline.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending value.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Drops the pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Releases the pending value if its deadline is at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| p.deadline <= now) {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Waits for the pending value to settle and releases it.
    ///
    /// Never resolves while nothing is pending. Cancel-safe: dropping the
    /// future keeps the pending value in place.
    #[cfg(test)]
    pub async fn settled(&mut self) -> T {
        loop {
            let Some(deadline) = self.deadline() else {
                return std::future::pending().await;
            };
            tokio::time::sleep_until(deadline).await;
            if let Some(value) = self.take_due(Instant::now()) {
                return value;
            }
        }
    }
}

/// Sleeps until `deadline`, or forever when there is none.
///
/// Takes the deadline by value so it can sit in a `tokio::select!` branch
/// without borrowing the debouncer.
pub async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
