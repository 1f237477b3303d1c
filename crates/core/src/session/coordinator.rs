//! The session coordinator.
//!
//! Bring-up happens in a fixed stage order; every acquired entity pushes
//! its release onto a teardown stack the moment it exists, so any later
//! failure unwinds exactly what was acquired, newest first. Teardown always
//! runs, whether bring-up finished or not.

use std::sync::Arc;

use rigup_protocol::JobStatus;
use tracing::{debug, error, info, warn};

use crate::actions::ActionRegistry;
use crate::engine::{ControllerCapability, Engine, EngineOptions};
use crate::notify::NotificationSink;

use super::config::SessionConfig;
use super::handle::{DeviceController, ExecutionContext, ResourceBundle};
use super::report::{AppLaunchOutcome, EntityKind, SessionError, SessionPhase, SessionReport};
use super::teardown::TeardownStack;

/// Drives one session from library init through teardown.
pub struct SessionCoordinator {
    engine: Arc<dyn Engine>,
    sink: Arc<dyn NotificationSink>,
    config: SessionConfig,
    actions: Arc<ActionRegistry>,
}

impl SessionCoordinator {
    pub fn new(
        engine: Arc<dyn Engine>,
        sink: Arc<dyn NotificationSink>,
        config: SessionConfig,
    ) -> Self {
        Self {
            engine,
            sink,
            config,
            actions: Arc::new(ActionRegistry::new()),
        }
    }

    /// Replaces the action registry (empty by default). Registered names
    /// are announced to the engine during resource bring-up.
    pub fn with_actions(mut self, actions: Arc<ActionRegistry>) -> Self {
        self.actions = actions;
        self
    }

    /// Runs the full session arc. Failures are reported, never returned;
    /// teardown runs regardless of where bring-up stopped.
    pub async fn run(&self) -> SessionReport {
        let mut phases = vec![SessionPhase::Init];
        let mut teardown = TeardownStack::new();
        let mut app_launch = AppLaunchOutcome::NotAttempted;

        let failure = match self
            .bring_up(&mut phases, &mut teardown, &mut app_launch)
            .await
        {
            Ok(()) => None,
            Err(error) => {
                match error.status() {
                    Some(status) => error!(
                        target: "rigup.session",
                        status = %status,
                        code = status.code(),
                        "session failed: {error}"
                    ),
                    None => error!(target: "rigup.session", "session failed: {error}"),
                }
                Some(error)
            }
        };

        teardown.unwind().await;
        phases.push(SessionPhase::TornDown);
        if failure.is_none() {
            info!(target: "rigup.session", "session complete");
        }

        SessionReport {
            phases,
            failure,
            app_launch,
            torn_down: true,
        }
    }

    async fn bring_up(
        &self,
        phases: &mut Vec<SessionPhase>,
        teardown: &mut TeardownStack,
        app_launch: &mut AppLaunchOutcome,
    ) -> Result<(), SessionError> {
        let options = EngineOptions {
            user_config_dir: self.config.user_config_dir.clone(),
        };
        self.engine.init(&options)?;
        info!(target: "rigup.session", version = %self.engine.version(), "engine initialized");

        let context = self.create_context(teardown)?;
        phases.push(SessionPhase::ContextReady);

        let resource = self.create_resource(teardown)?;
        resource.announce_actions(&self.actions)?;
        phases.push(SessionPhase::ResourceReady);

        let controller = self.create_controller(teardown)?;
        self.connect(&controller).await?;
        phases.push(SessionPhase::ControllerConnected);

        if !context.bind(&resource, &controller)? {
            return Err(SessionError::BindFailure);
        }
        debug!(target: "rigup.session", "context bound to resource and controller");
        phases.push(SessionPhase::Bound);

        *app_launch = self.launch_app(&controller).await;
        phases.push(match app_launch {
            AppLaunchOutcome::Launched => SessionPhase::AppLaunched,
            AppLaunchOutcome::Failed { .. } => SessionPhase::AppLaunchFailed,
            _ => SessionPhase::AppLaunchSkipped,
        });
        if let AppLaunchOutcome::Failed { status } = *app_launch {
            return Err(SessionError::LaunchFailure { status });
        }

        Ok(())
    }

    fn create_context(
        &self,
        teardown: &mut TeardownStack,
    ) -> Result<ExecutionContext, SessionError> {
        let handle = self.engine.new_context(Arc::clone(&self.sink))?;
        if handle.is_null() {
            return Err(SessionError::CreationFailure {
                entity: EntityKind::Context,
            });
        }
        let context = ExecutionContext::new(Arc::clone(&self.engine), handle);
        teardown.push("execution context", context.releaser());
        debug!(target: "rigup.session", %handle, "execution context ready");
        Ok(context)
    }

    fn create_resource(
        &self,
        teardown: &mut TeardownStack,
    ) -> Result<ResourceBundle, SessionError> {
        let handle = self.engine.new_resource(Arc::clone(&self.sink))?;
        if handle.is_null() {
            return Err(SessionError::CreationFailure {
                entity: EntityKind::Resource,
            });
        }
        let resource = ResourceBundle::new(Arc::clone(&self.engine), handle);
        teardown.push("resource bundle", resource.releaser());
        debug!(target: "rigup.session", %handle, "resource bundle ready");
        Ok(resource)
    }

    fn create_controller(
        &self,
        teardown: &mut TeardownStack,
    ) -> Result<DeviceController, SessionError> {
        let endpoint = self.config.device_endpoint.as_str();
        let handle = self.engine.new_controller(endpoint, Arc::clone(&self.sink))?;
        if handle.is_null() {
            return Err(SessionError::CreationFailure {
                entity: EntityKind::Controller,
            });
        }
        let controller = DeviceController::new(Arc::clone(&self.engine), handle);
        // Registered before connecting: a controller whose connection never
        // comes up still has to be destroyed.
        teardown.push("device controller", controller.releaser());
        debug!(target: "rigup.session", %handle, endpoint, "device controller ready");
        Ok(controller)
    }

    async fn connect(&self, controller: &DeviceController) -> Result<(), SessionError> {
        let mut job = controller.post_connection().await?;
        let status = job.wait().await;
        if !status.succeeded() {
            return Err(SessionError::ConnectionFailure { status });
        }
        info!(
            target: "rigup.session",
            endpoint = %self.config.device_endpoint,
            "device connected"
        );
        Ok(())
    }

    /// The launch stage is soft: every outcome short of launching leaves
    /// the bound session standing and flows into the report instead.
    async fn launch_app(&self, controller: &DeviceController) -> AppLaunchOutcome {
        let Some(package) = self.config.app_package.as_deref() else {
            info!(target: "rigup.session", "no app package configured, skipping launch");
            return AppLaunchOutcome::SkippedNoPackage;
        };
        if !controller.supports(ControllerCapability::AppLaunch) {
            warn!(
                target: "rigup.session",
                package,
                "controller has no app-launch capability, skipping"
            );
            return AppLaunchOutcome::CapabilityAbsent;
        }
        let status = match controller.post_app_start(package).await {
            Ok(mut job) => job.wait().await,
            Err(error) => {
                warn!(target: "rigup.session", package, %error, "app start rejected by engine");
                JobStatus::Invalid
            }
        };
        if !status.succeeded() {
            return AppLaunchOutcome::Failed { status };
        }
        info!(
            target: "rigup.session",
            package,
            settle_ms = self.config.settle_delay.as_millis() as u64,
            "app launched, settling"
        );
        tokio::time::sleep(self.config.settle_delay).await;
        AppLaunchOutcome::Launched
    }
}
