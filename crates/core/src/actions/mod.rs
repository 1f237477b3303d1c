//! Host-side custom actions.
//!
//! Pipelines running inside the engine can refer to actions by name; the
//! names are announced during resource bring-up and the engine calls back
//! into the host to run them. The registry owns that name-to-implementation
//! mapping. The engine invokes actions one at a time, but the registry
//! itself is safe to share across threads.

mod select_force;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use rigup_protocol::ActionArgs;
use tracing::{debug, warn};

use crate::engine::EngineError;
use crate::session::{DeviceController, ExecutionContext};

pub use select_force::SelectForceAction;

/// A host-side action a pipeline can invoke by name.
///
/// The boolean result is what the engine reports back to the pipeline;
/// `Err` is reserved for engine faults while the action ran.
#[async_trait]
pub trait CustomAction: Send + Sync {
    async fn run(
        &self,
        ctx: &ActionContext<'_>,
        args: &ActionArgs,
    ) -> Result<bool, EngineError>;
}

/// The live session surfaces an action may drive.
pub struct ActionContext<'a> {
    pub controller: &'a DeviceController,
    pub context: &'a ExecutionContext,
}

/// Name-to-action mapping announced to the engine.
#[derive(Default)]
pub struct ActionRegistry {
    actions: RwLock<BTreeMap<String, Arc<dyn CustomAction>>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `action` under `name`, returning whatever was registered
    /// there before.
    pub fn register(
        &self,
        name: impl Into<String>,
        action: Arc<dyn CustomAction>,
    ) -> Option<Arc<dyn CustomAction>> {
        self.actions.write().insert(name.into(), action)
    }

    /// Registered names, sorted. This is the announcement order.
    pub fn names(&self) -> Vec<String> {
        self.actions.read().keys().cloned().collect()
    }

    /// Runs the action registered under `args.name`. An unknown name is
    /// reported to the engine as a plain "did not succeed", not a fault.
    pub async fn dispatch(
        &self,
        ctx: &ActionContext<'_>,
        args: &ActionArgs,
    ) -> Result<bool, EngineError> {
        let action = self.actions.read().get(&args.name).cloned();
        let Some(action) = action else {
            warn!(target: "rigup.actions", name = %args.name, "no action registered under this name");
            return Ok(false);
        };
        debug!(target: "rigup.actions", name = %args.name, "dispatching action");
        action.run(ctx, args).await
    }
}
