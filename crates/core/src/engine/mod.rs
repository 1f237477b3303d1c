//! The capability boundary to the external engine.
//!
//! Everything the rest of this crate does with the engine goes through the
//! [`Engine`] trait: handle allocation, binding, asynchronous device
//! operations, and teardown. The engine itself is closed-source and linked
//! in by the embedding application; [`sim::SimEngine`] stands in for it in
//! tests and rehearsal runs.

pub mod job;
pub mod sim;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use rigup_protocol::ClickPoint;

use crate::notify::NotificationSink;

pub use job::Job;

/// Process-wide options applied when the engine library is initialized.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Directory the engine may use for caches and its own log files.
    pub user_config_dir: Option<PathBuf>,
}

/// An engine-allocated identifier for a context, resource, or controller.
///
/// The engine hands these out on creation and expects them back on every
/// later call. Zero is the engine's "allocation failed" sentinel, never a
/// live handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawHandle(pub u64);

impl RawHandle {
    /// The sentinel returned when allocation fails.
    pub const NULL: RawHandle = RawHandle(0);

    pub fn is_null(self) -> bool {
        self == Self::NULL
    }
}

impl fmt::Display for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors surfaced at the engine boundary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine raised an internal fault.
    #[error("engine fault: {0}")]
    Fault(String),
    /// The engine or the handle backing this call has been torn down.
    #[error("engine handle is closed")]
    Closed,
}

/// Features a device controller may or may not expose.
///
/// Controllers for different transports implement different subsets; the
/// session probes before using an optional one instead of trusting the
/// endpoint string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerCapability {
    Connect,
    Click,
    AppLaunch,
}

/// The opaque engine surface.
///
/// Creation calls return [`RawHandle::NULL`] (not an error) when the engine
/// declines to allocate; `Err` is reserved for engine-internal faults.
/// `post_*` calls enqueue work on the device and return a [`Job`] to wait
/// on. Notifications for a handle flow to the sink passed at creation.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Engine library version string.
    fn version(&self) -> String;

    /// Initializes the engine library. Must be called before anything else.
    fn init(&self, options: &EngineOptions) -> Result<(), EngineError>;

    fn new_context(&self, sink: Arc<dyn NotificationSink>) -> Result<RawHandle, EngineError>;

    fn new_resource(&self, sink: Arc<dyn NotificationSink>) -> Result<RawHandle, EngineError>;

    fn new_controller(
        &self,
        endpoint: &str,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<RawHandle, EngineError>;

    fn destroy_context(&self, handle: RawHandle) -> Result<(), EngineError>;

    fn destroy_resource(&self, handle: RawHandle) -> Result<(), EngineError>;

    fn destroy_controller(&self, handle: RawHandle) -> Result<(), EngineError>;

    fn controller_supports(&self, handle: RawHandle, capability: ControllerCapability) -> bool;

    /// Starts connecting the controller to its device.
    async fn post_connection(&self, controller: RawHandle) -> Result<Job, EngineError>;

    /// Starts the named app package on the connected device.
    async fn post_app_start(
        &self,
        controller: RawHandle,
        package: &str,
    ) -> Result<Job, EngineError>;

    /// Queues a tap at `point` on the connected device.
    async fn post_click(
        &self,
        controller: RawHandle,
        point: ClickPoint,
    ) -> Result<Job, EngineError>;

    /// Binds resource and controller to the context. `Ok(false)` means the
    /// engine rejected the combination.
    fn bind(
        &self,
        context: RawHandle,
        resource: RawHandle,
        controller: RawHandle,
    ) -> Result<bool, EngineError>;

    /// Registers a custom-action name with the resource so pipelines can
    /// refer to it. Dispatch of the action itself stays host-side.
    fn announce_action(&self, resource: RawHandle, name: &str) -> Result<(), EngineError>;
}
