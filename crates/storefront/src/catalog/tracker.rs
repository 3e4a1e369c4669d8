//! Fetch lifecycle tracking with last-request-wins semantics.
//!
//! Every fetch of a resource takes a [`FetchTicket`] carrying a generation
//! number. A completed fetch is applied only if no newer fetch has started
//! since; stale responses are dropped instead of overwriting fresher state.

use std::sync::{Mutex, PoisonError};

/// Lifecycle of a tracked resource.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState<T> {
    /// Never fetched.
    #[default]
    Idle,
    /// A fetch is in flight. Holds the last fulfilled value, if any.
    Pending(Option<T>),
    /// The latest fetch succeeded.
    Fulfilled(T),
    /// The latest fetch failed.
    Rejected(String),
}

impl<T> FetchState<T> {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// The error message of a rejected fetch.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Rejected(message) => Some(message),
            _ => None,
        }
    }

    /// The value of the latest successful fetch still on display.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Fulfilled(value) | Self::Pending(Some(value)) => Some(value),
            _ => None,
        }
    }

    /// Short lowercase status name.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending(_) => "pending",
            Self::Fulfilled(_) => "fulfilled",
            Self::Rejected(_) => "rejected",
        }
    }
}

/// Handle for one fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a fetch ticket must be passed back to `complete`"]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct Inner<T> {
    generation: u64,
    state: FetchState<T>,
}

/// Tracks the fetch lifecycle of one resource.
#[derive(Debug)]
pub struct FetchTracker<T> {
    inner: Mutex<Inner<T>>,
}

impl<T> Default for FetchTracker<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Inner {
                generation: 0,
                state: FetchState::Idle,
            }),
        }
    }
}

impl<T: Clone> FetchTracker<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch, superseding any in flight.
    pub fn begin(&self) -> FetchTicket {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.generation += 1;
        let previous = inner.state.value().cloned();
        inner.state = FetchState::Pending(previous);
        FetchTicket {
            generation: inner.generation,
        }
    }

    /// Record the outcome of the fetch behind `ticket`.
    ///
    /// Returns `false` and leaves the state untouched if a newer fetch has
    /// begun since the ticket was issued.
    pub fn complete<E: ToString>(&self, ticket: FetchTicket, outcome: Result<T, E>) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if ticket.generation != inner.generation {
            tracing::debug!(
                ticket = ticket.generation,
                latest = inner.generation,
                "Dropping stale fetch result"
            );
            return false;
        }
        inner.state = match outcome {
            Ok(value) => FetchState::Fulfilled(value),
            Err(e) => FetchState::Rejected(e.to_string()),
        };
        true
    }

    /// A snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> FetchState<T> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .state
            .clone()
    }
}
