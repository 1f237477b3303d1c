//! Scripted in-memory engine for tests and rehearsal runs.
//!
//! `SimEngine` answers every capability call from a fixed script and records
//! the call in an ordered log, so a test can assert not just outcomes but
//! the exact sequence of engine traffic a session produced.
//!
//! # Example
//!
//! ```ignore
//! let engine = SimEngine::builder()
//!     .connect_status(JobStatus::Failed)
//!     .build();
//! let report = SessionCoordinator::new(engine.clone(), sink, config)
//!     .run()
//!     .await;
//! assert!(!report.succeeded());
//! assert!(engine.calls().contains(&EngineCall::NewController {
//!     endpoint: "127.0.0.1:16384".into(),
//! }));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rigup_protocol::{
    ClickPoint, ControllerActionDetail, JobStatus, LogDetail, LogLevel, NotificationEvent,
    NotificationPhase,
};

use crate::notify::NotificationSink;

use super::{ControllerCapability, Engine, EngineError, EngineOptions, Job, RawHandle};

/// One recorded engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Init,
    NewContext,
    NewResource,
    NewController {
        endpoint: String,
    },
    DestroyContext(RawHandle),
    DestroyResource(RawHandle),
    DestroyController(RawHandle),
    PostConnection(RawHandle),
    PostAppStart {
        controller: RawHandle,
        package: String,
    },
    PostClick {
        controller: RawHandle,
        point: ClickPoint,
    },
    Bind {
        context: RawHandle,
        resource: RawHandle,
        controller: RawHandle,
    },
    AnnounceAction {
        resource: RawHandle,
        name: String,
    },
}

#[derive(Debug, Clone)]
struct Script {
    version: String,
    fail_init: bool,
    fail_context: bool,
    null_context: bool,
    null_resource: bool,
    fail_controller: bool,
    fail_announce: bool,
    connect_status: JobStatus,
    bind_outcome: bool,
    fail_bind: bool,
    app_capability: bool,
    app_start_status: JobStatus,
    click_status: JobStatus,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            version: "1.8.2".to_string(),
            fail_init: false,
            fail_context: false,
            null_context: false,
            null_resource: false,
            fail_controller: false,
            fail_announce: false,
            connect_status: JobStatus::Succeeded,
            bind_outcome: true,
            fail_bind: false,
            app_capability: true,
            app_start_status: JobStatus::Succeeded,
            click_status: JobStatus::Succeeded,
        }
    }
}

/// Builder for scripted engines. Everything succeeds unless told otherwise.
#[derive(Debug, Default)]
pub struct SimEngineBuilder {
    script: Script,
}

impl SimEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.script.version = version.into();
        self
    }

    /// Library initialization raises a fault.
    pub fn fail_init(mut self) -> Self {
        self.script.fail_init = true;
        self
    }

    /// Context creation raises a fault.
    pub fn fail_context(mut self) -> Self {
        self.script.fail_context = true;
        self
    }

    /// Context creation returns the null handle.
    pub fn null_context(mut self) -> Self {
        self.script.null_context = true;
        self
    }

    /// Resource creation returns the null handle.
    pub fn null_resource(mut self) -> Self {
        self.script.null_resource = true;
        self
    }

    /// Controller creation returns the null handle.
    pub fn fail_controller(mut self) -> Self {
        self.script.fail_controller = true;
        self
    }

    /// Announcing a custom action raises a fault.
    pub fn fail_announce(mut self) -> Self {
        self.script.fail_announce = true;
        self
    }

    /// Terminal status of connection jobs.
    pub fn connect_status(mut self, status: JobStatus) -> Self {
        self.script.connect_status = status;
        self
    }

    /// Boolean outcome of bind calls.
    pub fn bind_outcome(mut self, outcome: bool) -> Self {
        self.script.bind_outcome = outcome;
        self
    }

    /// Bind raises a fault instead of answering.
    pub fn fail_bind(mut self) -> Self {
        self.script.fail_bind = true;
        self
    }

    /// Whether controllers report the app-launch capability.
    pub fn app_capability(mut self, supported: bool) -> Self {
        self.script.app_capability = supported;
        self
    }

    /// Terminal status of app-start jobs.
    pub fn app_start_status(mut self, status: JobStatus) -> Self {
        self.script.app_start_status = status;
        self
    }

    /// Terminal status of click jobs.
    pub fn click_status(mut self, status: JobStatus) -> Self {
        self.script.click_status = status;
        self
    }

    pub fn build(self) -> Arc<SimEngine> {
        Arc::new(SimEngine {
            script: self.script,
            next_handle: AtomicU64::new(1),
            next_action_id: AtomicU64::new(1),
            controller_sink: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        })
    }
}

/// In-memory [`Engine`] answering from a script. See the module docs.
pub struct SimEngine {
    script: Script,
    next_handle: AtomicU64,
    next_action_id: AtomicU64,
    controller_sink: Mutex<Option<Arc<dyn NotificationSink>>>,
    calls: Mutex<Vec<EngineCall>>,
}

impl SimEngine {
    pub fn builder() -> SimEngineBuilder {
        SimEngineBuilder::new()
    }

    /// The call log so far, in invocation order.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().clone()
    }

    /// Takes the call log, clearing it.
    pub fn take_calls(&self) -> Vec<EngineCall> {
        std::mem::take(&mut *self.calls.lock())
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().push(call);
    }

    fn allocate(&self) -> RawHandle {
        RawHandle(self.next_handle.fetch_add(1, Ordering::Relaxed))
    }

    /// Emits a Starting/terminal pair of controller-action events and a
    /// job already resolved to `status`.
    fn controller_job(&self, action: &str, status: JobStatus) -> Job {
        let action_id = self.next_action_id.fetch_add(1, Ordering::Relaxed);
        if let Some(sink) = self.controller_sink.lock().as_ref() {
            let phase = if status.succeeded() {
                NotificationPhase::Succeeded
            } else {
                NotificationPhase::Failed
            };
            for phase in [NotificationPhase::Starting, phase] {
                sink.dispatch(&NotificationEvent::ControllerAction(
                    ControllerActionDetail {
                        action: action.to_string(),
                        action_id,
                        phase,
                    },
                ));
            }
        }
        let (job, tx) = Job::pending();
        let _ = tx.send(status);
        job
    }
}

#[async_trait]
impl Engine for SimEngine {
    fn version(&self) -> String {
        self.script.version.clone()
    }

    fn init(&self, _options: &EngineOptions) -> Result<(), EngineError> {
        self.record(EngineCall::Init);
        if self.script.fail_init {
            return Err(EngineError::Fault("library init refused".into()));
        }
        Ok(())
    }

    fn new_context(&self, sink: Arc<dyn NotificationSink>) -> Result<RawHandle, EngineError> {
        self.record(EngineCall::NewContext);
        if self.script.fail_context {
            return Err(EngineError::Fault("context allocation fault".into()));
        }
        if self.script.null_context {
            return Ok(RawHandle::NULL);
        }
        sink.dispatch(&NotificationEvent::Log(LogDetail {
            level: LogLevel::Info,
            message: format!("agent context online (engine {})", self.script.version),
        }));
        Ok(self.allocate())
    }

    fn new_resource(&self, sink: Arc<dyn NotificationSink>) -> Result<RawHandle, EngineError> {
        self.record(EngineCall::NewResource);
        if self.script.null_resource {
            return Ok(RawHandle::NULL);
        }
        sink.dispatch(&NotificationEvent::Log(LogDetail {
            level: LogLevel::Debug,
            message: "resource bundle allocated".to_string(),
        }));
        Ok(self.allocate())
    }

    fn new_controller(
        &self,
        endpoint: &str,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<RawHandle, EngineError> {
        self.record(EngineCall::NewController {
            endpoint: endpoint.to_string(),
        });
        if self.script.fail_controller {
            return Ok(RawHandle::NULL);
        }
        *self.controller_sink.lock() = Some(sink);
        Ok(self.allocate())
    }

    fn destroy_context(&self, handle: RawHandle) -> Result<(), EngineError> {
        self.record(EngineCall::DestroyContext(handle));
        Ok(())
    }

    fn destroy_resource(&self, handle: RawHandle) -> Result<(), EngineError> {
        self.record(EngineCall::DestroyResource(handle));
        Ok(())
    }

    fn destroy_controller(&self, handle: RawHandle) -> Result<(), EngineError> {
        self.record(EngineCall::DestroyController(handle));
        Ok(())
    }

    fn controller_supports(&self, _handle: RawHandle, capability: ControllerCapability) -> bool {
        match capability {
            ControllerCapability::Connect | ControllerCapability::Click => true,
            ControllerCapability::AppLaunch => self.script.app_capability,
        }
    }

    async fn post_connection(&self, controller: RawHandle) -> Result<Job, EngineError> {
        self.record(EngineCall::PostConnection(controller));
        Ok(self.controller_job("connect", self.script.connect_status))
    }

    async fn post_app_start(
        &self,
        controller: RawHandle,
        package: &str,
    ) -> Result<Job, EngineError> {
        self.record(EngineCall::PostAppStart {
            controller,
            package: package.to_string(),
        });
        Ok(self.controller_job("startApp", self.script.app_start_status))
    }

    async fn post_click(
        &self,
        controller: RawHandle,
        point: ClickPoint,
    ) -> Result<Job, EngineError> {
        self.record(EngineCall::PostClick { controller, point });
        Ok(self.controller_job("click", self.script.click_status))
    }

    fn bind(
        &self,
        context: RawHandle,
        resource: RawHandle,
        controller: RawHandle,
    ) -> Result<bool, EngineError> {
        self.record(EngineCall::Bind {
            context,
            resource,
            controller,
        });
        if self.script.fail_bind {
            return Err(EngineError::Fault("bind fault".into()));
        }
        Ok(self.script.bind_outcome)
    }

    fn announce_action(&self, resource: RawHandle, name: &str) -> Result<(), EngineError> {
        self.record(EngineCall::AnnounceAction {
            resource,
            name: name.to_string(),
        });
        if self.script.fail_announce {
            return Err(EngineError::Fault("action announcement refused".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingSink;

    #[tokio::test]
    async fn test_default_script_allocates_live_handles_in_order() {
        let engine = SimEngine::builder().build();
        let sink = Arc::new(RecordingSink::new());

        let context = engine.new_context(sink.clone()).unwrap();
        let resource = engine.new_resource(sink.clone()).unwrap();
        let controller = engine.new_controller("dev:1", sink.clone()).unwrap();

        assert_eq!(context, RawHandle(1));
        assert_eq!(resource, RawHandle(2));
        assert_eq!(controller, RawHandle(3));
        assert!(!controller.is_null());

        assert_eq!(
            engine.take_calls(),
            vec![
                EngineCall::NewContext,
                EngineCall::NewResource,
                EngineCall::NewController {
                    endpoint: "dev:1".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_connect_emits_starting_then_terminal_phase() {
        let engine = SimEngine::builder()
            .connect_status(JobStatus::Failed)
            .build();
        let sink = Arc::new(RecordingSink::new());
        let controller = engine.new_controller("dev:1", sink.clone()).unwrap();

        let mut job = engine.post_connection(controller).await.unwrap();
        assert_eq!(job.wait().await, JobStatus::Failed);

        let phases: Vec<NotificationPhase> = sink
            .take()
            .into_iter()
            .filter_map(|event| match event {
                NotificationEvent::ControllerAction(detail) => Some(detail.phase),
                _ => None,
            })
            .collect();
        assert_eq!(
            phases,
            vec![NotificationPhase::Starting, NotificationPhase::Failed]
        );
    }

    #[tokio::test]
    async fn test_null_toggles_return_the_null_handle() {
        let engine = SimEngine::builder().null_context().null_resource().build();
        let sink = Arc::new(RecordingSink::new());

        assert!(engine.new_context(sink.clone()).unwrap().is_null());
        assert!(engine.new_resource(sink.clone()).unwrap().is_null());
    }
}
