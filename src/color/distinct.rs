//! Distinct color sampling over a constrained HCL region.
//!
//! Small requests (at most [`DISTINCT_PALETTE`]`.len()` colors) take a
//! curated palette slice. Larger requests lay a regular hue × chroma ×
//! luminance grid over the requested region, keep the in-gamut points, and
//! greedily pick the point farthest (CIE76) from everything already picked.
//! There is no iterative refinement and no output sorting, so callers must
//! not rely on rank.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::space::{Hcl, Lab};
use super::{rotate_by_shift, Color};
use crate::color::scheme::validate_shift;
use crate::error::MesoError;
use crate::options::SamplerOptions;

/// Hand-picked, maximally separated colors for the common case of a few
/// top-level groups.
pub const DISTINCT_PALETTE: [Color; 8] = [
    Color::from_hex(0x4477aa),
    Color::from_hex(0xee6677),
    Color::from_hex(0x228833),
    Color::from_hex(0xccbb44),
    Color::from_hex(0x66ccee),
    Color::from_hex(0xaa3377),
    Color::from_hex(0xee7733),
    Color::from_hex(0x009988),
];

/// Inclusive hue/chroma/luminance bounds of an HCL sampling region.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct HclRange {
    /// Hue bounds in degrees. The upper bound may exceed 360.
    pub hue: [f64; 2],
    /// Chroma bounds.
    pub chroma: [f64; 2],
    /// Luminance bounds, 0–100.
    pub luminance: [f64; 2],
}

impl HclRange {
    /// The full hue circle with the given chroma and luminance bounds.
    #[must_use]
    pub const fn full_hue(chroma: [f64; 2], luminance: [f64; 2]) -> Self {
        Self {
            hue: [0.0, 360.0],
            chroma,
            luminance,
        }
    }
}

impl Default for HclRange {
    fn default() -> Self {
        Self {
            hue: [1.0, 360.0],
            chroma: [25.0, 100.0],
            luminance: [30.0, 100.0],
        }
    }
}

/// Procedural color source configured by [`SamplerOptions`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorSampler {
    pub(super) options: SamplerOptions,
}

impl ColorSampler {
    /// Create a sampler with the given tuning.
    #[must_use]
    pub fn new(options: SamplerOptions) -> Self {
        Self { options }
    }

    /// Sampler tuning.
    #[must_use]
    pub fn options(&self) -> &SamplerOptions {
        &self.options
    }

    /// `count` visually distinct colors inside `range`, rotated by `shift`.
    ///
    /// Up to eight colors come from [`DISTINCT_PALETTE`] regardless of
    /// `range`. Fails only when `shift` is outside `0..=100`.
    pub fn sample_distinct(
        &self,
        count: usize,
        range: &HclRange,
        shift: u32,
    ) -> Result<Vec<Color>, MesoError> {
        validate_shift(shift)?;
        let colors = if count <= DISTINCT_PALETTE.len() {
            DISTINCT_PALETTE[..count].to_vec()
        } else {
            self.distinct_colors(count, range)
        };
        Ok(rotate_by_shift(colors, shift))
    }

    /// [`sample_distinct`](Self::sample_distinct) over the configured base
    /// region, used for one color per top-level group.
    pub fn sample_base_colors(
        &self,
        count: usize,
        shift: u32,
    ) -> Result<Vec<Color>, MesoError> {
        self.sample_distinct(count, &self.options.base_range, shift)
    }

    /// Run the distinct search without the small-count palette or shift.
    ///
    /// Always returns exactly `count` colors. When the region holds fewer
    /// distinct grid points than requested, picks repeat cyclically.
    ///
    /// The greedy pick scans the whole pool once per color, and the pool
    /// grows as `count * sample_count_factor`, so cost is quadratic in
    /// `count`. Hosts asking for hundreds of colors should lower
    /// `sample_count_factor`.
    #[must_use]
    pub fn distinct_colors(
        &self,
        count: usize,
        range: &HclRange,
    ) -> Vec<Color> {
        if count == 0 {
            return Vec::new();
        }
        let target = self
            .options
            .min_sample_count
            .max(count * self.options.sample_count_factor);
        let mut pool = sample_pool(range, target, true);
        if pool.len() < count {
            log::debug!(
                "distinct search: {} in-gamut samples for {count} colors, \
                 dropping gamut filter",
                pool.len()
            );
            pool = sample_pool(range, target, false);
        }
        if pool.is_empty() {
            return vec![Color::BLACK; count];
        }

        let picks = farthest_point_picks(&pool, count);
        (0..count)
            .map(|i| pool[picks[i % picks.len()]].to_color())
            .collect()
    }
}

/// Evenly spaced values from `lo` to `hi` (inclusive) using `divider`
/// intervals. A degenerate range yields its single bound.
fn axis_steps(range: [f64; 2], divider: f64) -> Vec<f64> {
    let [lo, hi] = range;
    let step = (hi - lo) / divider;
    if step <= 0.0 || !step.is_finite() {
        return vec![lo];
    }
    let mut values = Vec::new();
    let mut v = lo;
    while v <= hi + 1e-9 {
        values.push(v);
        v += step;
    }
    values
}

/// Regular grid of roughly `target` Lab points covering `range`.
fn sample_pool(range: &HclRange, target: usize, gamut_only: bool) -> Vec<Lab> {
    let divider = (target as f64).cbrt() * 1.001;
    let hues = axis_steps(range.hue, divider);
    let chromas = axis_steps(range.chroma, divider);
    let luminances = axis_steps(range.luminance, divider);

    let mut pool =
        Vec::with_capacity(hues.len() * chromas.len() * luminances.len());
    for &h in &hues {
        for &c in &chromas {
            for &l in &luminances {
                let lab = Hcl::new(h, c, l).to_lab();
                if !gamut_only || lab.in_gamut() {
                    pool.push(lab);
                }
            }
        }
    }
    pool
}

/// Greedy max-min selection: start at the first pool point, then
/// repeatedly take the point whose nearest picked neighbor is farthest.
/// Ties go to the earlier pool index.
fn farthest_point_picks(pool: &[Lab], count: usize) -> Vec<usize> {
    let wanted = count.min(pool.len());
    let mut nearest = vec![f64::INFINITY; pool.len()];
    let mut picks = Vec::with_capacity(wanted);
    let mut next = 0;

    while picks.len() < wanted {
        picks.push(next);
        let chosen = pool[next];
        let mut best = (0, f64::NEG_INFINITY);
        for (i, lab) in pool.iter().enumerate() {
            let d = lab.distance_squared(chosen);
            if d < nearest[i] {
                nearest[i] = d;
            }
            if nearest[i] > best.1 {
                best = (i, nearest[i]);
            }
        }
        next = best.0;
    }
    picks
}
