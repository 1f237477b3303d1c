//! The force-selection toggle action.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use rigup_protocol::{ActionArgs, ClickPoint};
use tracing::{debug, warn};

use crate::engine::EngineError;

use super::{ActionContext, CustomAction};

/// Taps the force-selection toggle.
///
/// The selection screen places the toggle at one position the first time it
/// is shown and at another from then on, so the first invocation of a
/// session clicks differently from every later one. The flag is per
/// instance; construct a fresh action per session to start over.
///
/// The pipeline treats the tap as fire-and-forget: the action reports
/// success as soon as the click job terminates, whatever its status.
pub struct SelectForceAction {
    first: AtomicBool,
}

impl SelectForceAction {
    /// Name announced to the engine.
    pub const NAME: &'static str = "SelectForce";

    /// Toggle position the first time the selection screen is shown.
    pub const FIRST_CLICK: ClickPoint = ClickPoint::new(270, 270);
    /// Toggle position on every later showing.
    pub const REPEAT_CLICK: ClickPoint = ClickPoint::new(100, 270);

    pub fn new() -> Self {
        Self {
            first: AtomicBool::new(true),
        }
    }
}

impl Default for SelectForceAction {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomAction for SelectForceAction {
    async fn run(
        &self,
        ctx: &ActionContext<'_>,
        _args: &ActionArgs,
    ) -> Result<bool, EngineError> {
        // swap is atomic, so exactly one invocation sees the first branch.
        let point = if self.first.swap(false, Ordering::Relaxed) {
            Self::FIRST_CLICK
        } else {
            Self::REPEAT_CLICK
        };
        debug!(target: "rigup.actions", %point, "tapping force-selection toggle");

        let mut job = ctx.controller.post_click(point).await?;
        let status = job.wait().await;
        if !status.succeeded() {
            warn!(
                target: "rigup.actions",
                %point,
                %status,
                "toggle tap did not succeed, reporting done anyway"
            );
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionRegistry;
    use crate::engine::Engine;
    use crate::engine::sim::{EngineCall, SimEngine};
    use crate::notify::RecordingSink;
    use crate::session::{DeviceController, ExecutionContext};
    use rigup_protocol::JobStatus;
    use std::sync::Arc;

    fn surfaces(engine: &Arc<SimEngine>) -> (ExecutionContext, DeviceController) {
        let sink = Arc::new(RecordingSink::new());
        let context = engine.new_context(sink.clone()).unwrap();
        let controller = engine.new_controller("dev:1", sink).unwrap();
        (
            ExecutionContext::new(Arc::clone(engine) as Arc<dyn Engine>, context),
            DeviceController::new(Arc::clone(engine) as Arc<dyn Engine>, controller),
        )
    }

    fn clicks(engine: &SimEngine) -> Vec<ClickPoint> {
        engine
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::PostClick { point, .. } => Some(point),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_first_click_differs_from_all_later_ones() {
        let engine = SimEngine::builder().build();
        let (context, controller) = surfaces(&engine);
        let action = SelectForceAction::new();
        let ctx = ActionContext {
            controller: &controller,
            context: &context,
        };
        let args = ActionArgs::bare(SelectForceAction::NAME);

        for _ in 0..4 {
            assert!(action.run(&ctx, &args).await.unwrap());
        }

        assert_eq!(
            clicks(&engine),
            vec![
                SelectForceAction::FIRST_CLICK,
                SelectForceAction::REPEAT_CLICK,
                SelectForceAction::REPEAT_CLICK,
                SelectForceAction::REPEAT_CLICK,
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_click_still_reports_done() {
        let engine = SimEngine::builder()
            .click_status(JobStatus::Failed)
            .build();
        let (context, controller) = surfaces(&engine);
        let action = SelectForceAction::new();
        let ctx = ActionContext {
            controller: &controller,
            context: &context,
        };

        let done = action
            .run(&ctx, &ActionArgs::bare(SelectForceAction::NAME))
            .await
            .unwrap();
        assert!(done);
    }

    #[tokio::test]
    async fn test_concurrent_invocations_take_the_first_branch_once() {
        let engine = SimEngine::builder().build();
        let (context, controller) = surfaces(&engine);
        let action = Arc::new(SelectForceAction::new());
        let context = Arc::new(context);
        let controller = Arc::new(controller);

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let action = Arc::clone(&action);
            let context = Arc::clone(&context);
            let controller = Arc::clone(&controller);
            tasks.push(tokio::spawn(async move {
                let ctx = ActionContext {
                    controller: &controller,
                    context: &context,
                };
                action
                    .run(&ctx, &ActionArgs::bare(SelectForceAction::NAME))
                    .await
                    .unwrap()
            }));
        }
        for task in tasks {
            assert!(task.await.unwrap());
        }

        let taps = clicks(&engine);
        assert_eq!(taps.len(), 8);
        let first_taps = taps
            .iter()
            .filter(|point| **point == SelectForceAction::FIRST_CLICK)
            .count();
        assert_eq!(first_taps, 1);
    }

    #[tokio::test]
    async fn test_registry_dispatch_reaches_the_toggle() {
        let engine = SimEngine::builder().build();
        let (context, controller) = surfaces(&engine);
        let registry = ActionRegistry::new();
        registry.register(SelectForceAction::NAME, Arc::new(SelectForceAction::new()));

        let done = registry
            .dispatch(
                &ActionContext {
                    controller: &controller,
                    context: &context,
                },
                &ActionArgs::bare(SelectForceAction::NAME),
            )
            .await
            .unwrap();

        assert!(done);
        assert_eq!(clicks(&engine), vec![SelectForceAction::FIRST_CLICK]);
    }
}
