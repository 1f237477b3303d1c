// rigup: session bring-up orchestration for a closed vision-automation engine.
//
// The engine itself (image recognition, device protocols, pipeline
// execution) is external; this crate owns the choreography around it:
// bringing a session's entities up in order, tearing them down in reverse,
// routing the engine's notifications, and hosting the custom actions
// pipelines call back into.

pub mod actions;
pub mod engine;
pub mod notify;
pub mod session;

pub use rigup_protocol as protocol;

pub use actions::{ActionContext, ActionRegistry, CustomAction, SelectForceAction};
pub use engine::{ControllerCapability, Engine, EngineError, EngineOptions, Job, RawHandle};
pub use notify::{NotificationSink, RecordingSink, TracingSink};
pub use session::{
    AppLaunchOutcome, DeviceController, ExecutionContext, ResourceBundle, SessionConfig,
    SessionCoordinator, SessionError, SessionPhase, SessionReport,
};
