//! Cancellation scope.
//!
//! One completion signal per form instance. Subscriptions and remote-call
//! continuations check it before applying any effect.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio_util::sync::CancellationToken;

/// One-shot completion signal shared by everything a form starts.
#[derive(Debug, Clone, Default)]
pub struct CancellationScope {
    token: CancellationToken,
    fired: Arc<AtomicBool>,
}

impl CancellationScope {
    /// Create an open scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal completion. Returns `false` if the scope was already signalled.
    pub fn signal(&self) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }

        self.token.cancel();

        true
    }

    /// Whether completion has been signalled.
    pub fn is_signalled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once completion is signalled.
    pub async fn signalled(&self) {
        self.token.cancelled().await;
    }
}
