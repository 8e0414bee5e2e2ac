//! Cancellation tokens for in-flight suggestion resolutions.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// A shared cancellation flag.
///
/// Clones observe the same flag, so a token handed to a field resolver can
/// be cancelled from the outside while the resolver is running. Cancellation
/// is one-way: a cancelled token never becomes live again.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    /// The shared flag.
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a live token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the token cancelled.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called on any
    /// clone of this token.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
