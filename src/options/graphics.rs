use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::lod::GraphicsMode;

/// Rendering quality selection.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[schemars(title = "Graphics", inline)]
#[serde(default)]
pub struct GraphicsOptions {
    /// Level-of-detail tier applied to every group.
    #[schemars(title = "Quality")]
    pub mode: GraphicsMode,
}
