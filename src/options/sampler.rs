use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color::variation::HueWrap;
use crate::color::HclRange;

/// Tuning for the distinct-color search and hue variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Sampler", inline)]
#[serde(default)]
pub struct SamplerOptions {
    /// Lower bound on the candidate pool size of the distinct search.
    #[schemars(title = "Min Samples", range(min = 100, max = 100_000))]
    pub min_sample_count: usize,
    /// Candidate pool size per requested color.
    #[schemars(title = "Samples per Color", range(min = 1, max = 1000))]
    pub sample_count_factor: usize,
    /// Region used for one base color per top-level group.
    #[schemars(skip)]
    pub base_range: HclRange,
    /// Chroma bounds of hue variants.
    #[schemars(skip)]
    pub variant_chroma: [f64; 2],
    /// Luminance bounds of hue variants.
    #[schemars(skip)]
    pub variant_luminance: [f64; 2],
    /// Correction of hue windows that cross 0°/360°.
    #[schemars(title = "Hue Wrap")]
    pub hue_wrap: HueWrap,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            min_sample_count: 1000,
            sample_count_factor: 100,
            base_range: HclRange::default(),
            variant_chroma: [30.0, 100.0],
            variant_luminance: [50.0, 100.0],
            hue_wrap: HueWrap::Legacy,
        }
    }
}
