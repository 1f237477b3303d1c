//! Owned wrappers around engine handles.
//!
//! Each entity keeps its raw handle in a shared cell that can be emptied
//! exactly once, either through the entity's own [`release`] or through the
//! releaser handed to the teardown stack. Whichever runs first destroys the
//! handle; the other finds the cell empty and does nothing.
//!
//! [`release`]: ExecutionContext::release

use std::sync::Arc;

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use rigup_protocol::ClickPoint;

use crate::actions::ActionRegistry;
use crate::engine::{ControllerCapability, Engine, EngineError, Job, RawHandle};

/// Shared slot for a raw handle.
#[derive(Clone, Default)]
pub struct HandleCell(Arc<Mutex<Option<RawHandle>>>);

impl HandleCell {
    fn new(handle: RawHandle) -> Self {
        Self(Arc::new(Mutex::new(Some(handle))))
    }

    /// The live handle, or `None` once released.
    pub fn get(&self) -> Option<RawHandle> {
        *self.0.lock()
    }

    fn take(&self) -> Option<RawHandle> {
        self.0.lock().take()
    }
}

macro_rules! entity_common {
    ($destroy:ident) => {
        /// The live handle, or `None` once released.
        pub fn raw(&self) -> Option<RawHandle> {
            self.cell.get()
        }

        /// Destroys the underlying handle. Later calls are no-ops.
        pub fn release(&self) -> Result<(), EngineError> {
            match self.cell.take() {
                Some(handle) => self.engine.$destroy(handle),
                None => Ok(()),
            }
        }

        /// A deferred [`release`](Self::release) for the teardown stack.
        pub(crate) fn releaser(
            &self,
        ) -> impl FnOnce() -> BoxFuture<'static, Result<(), EngineError>> + Send + 'static {
            let engine = Arc::clone(&self.engine);
            let cell = self.cell.clone();
            move || {
                Box::pin(async move {
                    match cell.take() {
                        Some(handle) => engine.$destroy(handle),
                        None => Ok(()),
                    }
                })
            }
        }
    };
}

/// The engine-side agent context a session runs in.
pub struct ExecutionContext {
    engine: Arc<dyn Engine>,
    cell: HandleCell,
}

impl ExecutionContext {
    pub(crate) fn new(engine: Arc<dyn Engine>, handle: RawHandle) -> Self {
        Self {
            engine,
            cell: HandleCell::new(handle),
        }
    }

    entity_common!(destroy_context);

    /// Binds `resource` and `controller` to this context. `Ok(false)` means
    /// the engine rejected the combination.
    pub fn bind(
        &self,
        resource: &ResourceBundle,
        controller: &DeviceController,
    ) -> Result<bool, EngineError> {
        let context = self.cell.get().ok_or(EngineError::Closed)?;
        let resource = resource.raw().ok_or(EngineError::Closed)?;
        let controller = controller.raw().ok_or(EngineError::Closed)?;
        self.engine.bind(context, resource, controller)
    }
}

/// The recognition payload (models, pipelines) a session binds to its
/// context.
pub struct ResourceBundle {
    engine: Arc<dyn Engine>,
    cell: HandleCell,
}

impl ResourceBundle {
    pub(crate) fn new(engine: Arc<dyn Engine>, handle: RawHandle) -> Self {
        Self {
            engine,
            cell: HandleCell::new(handle),
        }
    }

    entity_common!(destroy_resource);

    /// Announces every registered action name to the engine so pipelines
    /// can refer to them.
    pub fn announce_actions(&self, registry: &ActionRegistry) -> Result<(), EngineError> {
        let handle = self.cell.get().ok_or(EngineError::Closed)?;
        for name in registry.names() {
            self.engine.announce_action(handle, &name)?;
        }
        Ok(())
    }
}

/// The device the session drives.
pub struct DeviceController {
    engine: Arc<dyn Engine>,
    cell: HandleCell,
}

impl DeviceController {
    pub(crate) fn new(engine: Arc<dyn Engine>, handle: RawHandle) -> Self {
        Self {
            engine,
            cell: HandleCell::new(handle),
        }
    }

    entity_common!(destroy_controller);

    /// Whether the controller exposes `capability`. A released controller
    /// supports nothing.
    pub fn supports(&self, capability: ControllerCapability) -> bool {
        match self.cell.get() {
            Some(handle) => self.engine.controller_supports(handle, capability),
            None => false,
        }
    }

    /// Starts connecting to the device endpoint.
    pub async fn post_connection(&self) -> Result<Job, EngineError> {
        let handle = self.cell.get().ok_or(EngineError::Closed)?;
        self.engine.post_connection(handle).await
    }

    /// Starts the named app package on the device.
    pub async fn post_app_start(&self, package: &str) -> Result<Job, EngineError> {
        let handle = self.cell.get().ok_or(EngineError::Closed)?;
        self.engine.post_app_start(handle, package).await
    }

    /// Queues a tap at `point`.
    pub async fn post_click(&self, point: ClickPoint) -> Result<Job, EngineError> {
        let handle = self.cell.get().ok_or(EngineError::Closed)?;
        self.engine.post_click(handle, point).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sim::{EngineCall, SimEngine};
    use crate::notify::RecordingSink;

    fn controller(engine: &Arc<SimEngine>) -> DeviceController {
        let sink = Arc::new(RecordingSink::new());
        let handle = engine.new_controller("dev:1", sink).unwrap();
        DeviceController::new(Arc::clone(engine) as Arc<dyn Engine>, handle)
    }

    #[tokio::test]
    async fn test_release_destroys_exactly_once() {
        let engine = SimEngine::builder().build();
        let controller = controller(&engine);
        engine.take_calls();

        controller.release().unwrap();
        controller.release().unwrap();

        assert_eq!(
            engine.take_calls(),
            vec![EngineCall::DestroyController(RawHandle(1))]
        );
        assert_eq!(controller.raw(), None);
    }

    #[tokio::test]
    async fn test_releaser_and_release_share_the_cell() {
        let engine = SimEngine::builder().build();
        let controller = controller(&engine);
        engine.take_calls();

        let release = controller.releaser();
        controller.release().unwrap();
        release().await.unwrap();

        assert_eq!(
            engine.take_calls(),
            vec![EngineCall::DestroyController(RawHandle(1))]
        );
    }

    #[tokio::test]
    async fn test_released_controller_refuses_operations() {
        let engine = SimEngine::builder().build();
        let controller = controller(&engine);

        controller.release().unwrap();

        assert!(!controller.supports(ControllerCapability::Click));
        assert!(matches!(
            controller.post_connection().await,
            Err(EngineError::Closed)
        ));
    }
}
