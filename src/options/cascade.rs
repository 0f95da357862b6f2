use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color::{Color, ColorSchemeType, ColorSpec};

/// Starting values for color scheme edits made from the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Coloring", inline)]
#[serde(default)]
pub struct CascadeOptions {
    /// Mode preselected for new color edits.
    #[schemars(title = "Mode")]
    pub mode: ColorSchemeType,
    /// Base color for `uniform` and `generate` modes.
    #[schemars(skip)]
    pub value: Color,
    /// Hue window half-width in degrees.
    #[schemars(title = "Variability", range(min = 1, max = 180))]
    pub variability: u32,
    /// Rotation of generated colors in percent.
    #[schemars(title = "Shift", range(min = 0, max = 100))]
    pub shift: u32,
    /// Lightness adjustment.
    #[schemars(
        title = "Lightness",
        range(min = -6.0, max = 6.0),
        extend("step" = 0.1)
    )]
    pub lightness: f32,
    /// Opacity.
    #[schemars(
        title = "Opacity",
        range(min = 0.0, max = 1.0),
        extend("step" = 0.01)
    )]
    pub alpha: f32,
    /// Emissive strength.
    #[schemars(
        title = "Emissive",
        range(min = 0.0, max = 1.0),
        extend("step" = 0.01)
    )]
    pub emissive: f32,
    /// Illustrative rendering.
    #[schemars(title = "Illustrative")]
    pub illustrative: bool,
}

impl Default for CascadeOptions {
    fn default() -> Self {
        let spec = ColorSpec::default();
        Self {
            mode: ColorSchemeType::GroupGenerate,
            value: spec.value,
            variability: spec.variability,
            shift: spec.shift,
            lightness: spec.lightness,
            alpha: spec.alpha,
            emissive: spec.emissive,
            illustrative: spec.illustrative,
        }
    }
}

impl CascadeOptions {
    /// The color spec these defaults describe.
    #[must_use]
    pub fn to_spec(&self) -> ColorSpec {
        ColorSpec {
            kind: self.mode,
            value: self.value,
            variability: self.variability,
            shift: self.shift,
            lightness: self.lightness,
            alpha: self.alpha,
            emissive: self.emissive,
            illustrative: self.illustrative,
        }
    }
}
