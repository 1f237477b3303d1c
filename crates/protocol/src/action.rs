//! Custom action invocation types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in device pixels, origin at the top-left of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClickPoint {
    pub x: i32,
    pub y: i32,
}

impl ClickPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for ClickPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Arguments handed to a registered custom action when the engine invokes
/// it from a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionArgs {
    /// Registered action name, as announced to the engine.
    pub name: String,
    /// Free-form parameter object from the pipeline definition.
    #[serde(default)]
    pub params: serde_json::Value,
}

impl ActionArgs {
    pub fn new(name: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Arguments with no pipeline parameters.
    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, serde_json::Value::Null)
    }
}
