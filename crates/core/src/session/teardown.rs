//! LIFO teardown of acquired session entities.

use futures_util::future::BoxFuture;
use tracing::{debug, warn};

use crate::engine::EngineError;

type Release = Box<dyn FnOnce() -> BoxFuture<'static, Result<(), EngineError>> + Send>;

/// Stack of labeled release steps, unwound newest first.
///
/// A failed step is logged and skipped so one bad release cannot strand the
/// entities acquired before it. Unwinding drains the stack; a second unwind
/// finds it empty and does nothing.
#[derive(Default)]
pub struct TeardownStack {
    steps: Vec<(&'static str, Release)>,
}

impl TeardownStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Registers the release step for the most recently acquired entity.
    pub fn push<F>(&mut self, label: &'static str, release: F)
    where
        F: FnOnce() -> BoxFuture<'static, Result<(), EngineError>> + Send + 'static,
    {
        self.steps.push((label, Box::new(release)));
    }

    /// Pops and runs every step, newest first.
    pub async fn unwind(&mut self) {
        while let Some((label, release)) = self.steps.pop() {
            debug!(target: "rigup.session", entity = label, "releasing");
            if let Err(error) = release().await {
                warn!(target: "rigup.session", entity = label, %error, "release failed");
            }
        }
    }
}
