//! Session lifecycle: bring-up, binding, app launch, teardown.
//!
//! A session acquires engine entities in a fixed order (context, resource,
//! controller), binds them, optionally launches an app, and always gives
//! back what it acquired, newest first. [`SessionCoordinator`] drives the
//! whole arc and reports the outcome instead of returning errors.

mod config;
mod coordinator;
mod handle;
mod report;
mod teardown;

pub use config::{DEFAULT_SETTLE_DELAY, SessionConfig};
pub use coordinator::SessionCoordinator;
pub use handle::{DeviceController, ExecutionContext, HandleCell, ResourceBundle};
pub use report::{AppLaunchOutcome, EntityKind, SessionError, SessionPhase, SessionReport};
pub use teardown::TeardownStack;
