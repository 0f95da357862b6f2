//! Graphics quality tiers and their level-of-detail tables.
//!
//! Each tier maps to four distance bands. Nearer bands draw every instance
//! at full size; farther bands skip instances (`stride`) and enlarge the
//! survivors (`scale_bias`) to keep the apparent density. Higher tiers push
//! the full-detail band farther out and use smaller long-range strides.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::MesoError;
use crate::hierarchy::{HierarchyStore, NodeRef, NodeUpdate, UpdateBatch};

/// One distance band of a level-of-detail table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LodLevel {
    /// Camera distance where the band starts.
    pub min_distance: f32,
    /// Camera distance where the band ends (may be infinite).
    pub max_distance: f32,
    /// Distance over which neighbouring bands cross-fade.
    pub overlap: f32,
    /// Draw every `stride`-th instance.
    pub stride: u32,
    /// Size multiplier for the instances that remain.
    pub scale_bias: f32,
}

impl LodLevel {
    const fn new(
        min_distance: f32,
        max_distance: f32,
        stride: u32,
        scale_bias: f32,
    ) -> Self {
        Self {
            min_distance,
            max_distance,
            overlap: 0.0,
            stride,
            scale_bias,
        }
    }

    /// Whether `distance` falls inside this band.
    #[must_use]
    pub fn contains(&self, distance: f32) -> bool {
        distance >= self.min_distance && distance < self.max_distance
    }
}

/// Level-of-detail settings stored on a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LodSpec {
    /// Distance bands ordered by increasing distance.
    pub levels: Vec<LodLevel>,
    /// Use approximate (cheaper) impostor shading.
    pub approximate: bool,
    /// Thickness used for alpha-blended shading.
    pub alpha_thickness: f32,
}

impl Default for LodSpec {
    fn default() -> Self {
        GraphicsMode::default()
            .graphics_mode_props()
            .map_or_else(
                || Self {
                    levels: Vec::new(),
                    approximate: false,
                    alpha_thickness: 12.0,
                },
                GraphicsModeProps::into_lod_spec,
            )
    }
}

impl LodSpec {
    /// The band covering `distance`, if any.
    #[must_use]
    pub fn level_for(&self, distance: f32) -> Option<&LodLevel> {
        self.levels.iter().find(|level| level.contains(distance))
    }
}

/// Graphics quality tier.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum GraphicsMode {
    /// Fewest instances at range.
    Performance,
    /// Middle ground.
    Balanced,
    /// Full detail to mid range.
    #[default]
    Quality,
    /// Full detail far out.
    Ultra,
    /// Keep whatever level-of-detail settings each group already has.
    Custom,
}

/// Render settings derived from a tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphicsModeProps {
    /// The tier's distance bands.
    pub levels: [LodLevel; 4],
    /// Use approximate impostor shading.
    pub approximate: bool,
    /// Alpha-blending thickness.
    pub alpha_thickness: f32,
}

impl GraphicsModeProps {
    /// Store form of these settings.
    #[must_use]
    pub fn into_lod_spec(self) -> LodSpec {
        LodSpec {
            levels: self.levels.to_vec(),
            approximate: self.approximate,
            alpha_thickness: self.alpha_thickness,
        }
    }
}

impl GraphicsMode {
    /// Every tier, in increasing quality with `Custom` last.
    pub const ALL: [Self; 5] = [
        Self::Performance,
        Self::Balanced,
        Self::Quality,
        Self::Ultra,
        Self::Custom,
    ];

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Performance => "performance",
            Self::Balanced => "balanced",
            Self::Quality => "quality",
            Self::Ultra => "ultra",
            Self::Custom => "custom",
        }
    }

    /// The tier's distance bands; `None` for [`GraphicsMode::Custom`].
    #[must_use]
    pub const fn lod_levels(self) -> Option<[LodLevel; 4]> {
        let levels = match self {
            Self::Performance => [
                LodLevel::new(1.0, 200.0, 1, 1.0),
                LodLevel::new(200.0, 2000.0, 80, 3.0),
                LodLevel::new(2000.0, 6000.0, 200, 2.5),
                LodLevel::new(6000.0, f32::INFINITY, 400, 2.0),
            ],
            Self::Balanced => [
                LodLevel::new(1.0, 300.0, 1, 1.0),
                LodLevel::new(300.0, 2000.0, 40, 3.0),
                LodLevel::new(2000.0, 6000.0, 150, 2.5),
                LodLevel::new(6000.0, f32::INFINITY, 300, 2.0),
            ],
            Self::Quality => [
                LodLevel::new(1.0, 500.0, 1, 1.0),
                LodLevel::new(500.0, 2000.0, 15, 3.0),
                LodLevel::new(2000.0, 6000.0, 70, 2.7),
                LodLevel::new(6000.0, f32::INFINITY, 200, 2.5),
            ],
            Self::Ultra => [
                LodLevel::new(1.0, 5000.0, 1, 1.0),
                LodLevel::new(5000.0, 10000.0, 10, 3.0),
                LodLevel::new(10000.0, 30000.0, 50, 2.5),
                LodLevel::new(30000.0, f32::INFINITY, 150, 2.0),
            ],
            Self::Custom => return None,
        };
        Some(levels)
    }

    /// Bands plus shading flags; `None` for [`GraphicsMode::Custom`].
    #[must_use]
    pub fn graphics_mode_props(self) -> Option<GraphicsModeProps> {
        let levels = self.lod_levels()?;
        Some(GraphicsModeProps {
            levels,
            approximate: !matches!(self, Self::Quality | Self::Ultra),
            alpha_thickness: if self == Self::Performance {
                15.0
            } else {
                12.0
            },
        })
    }

    /// The settings a group should hold under this tier. `Custom` returns
    /// `current` untouched.
    #[must_use]
    pub fn apply_to(self, current: &LodSpec) -> LodSpec {
        self.graphics_mode_props().map_or_else(
            || current.clone(),
            GraphicsModeProps::into_lod_spec,
        )
    }
}

impl fmt::Display for GraphicsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GraphicsMode {
    type Err = MesoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| MesoError::InvalidTier(s.to_owned()))
    }
}

/// Write `tier`'s settings to every group of every hierarchy in one batch.
///
/// Returns the number of groups written. [`GraphicsMode::Custom`] writes
/// nothing and leaves each group's own settings in place.
pub fn apply_graphics_mode<S: HierarchyStore + ?Sized>(
    store: &mut S,
    tier: GraphicsMode,
) -> Result<usize, MesoError> {
    let Some(props) = tier.graphics_mode_props() else {
        return Ok(0);
    };
    let spec = props.into_lod_spec();
    let mut batch = UpdateBatch::new();
    let mut stack: Vec<String> =
        store.roots().into_iter().rev().map(|g| g.tag).collect();
    while let Some(tag) = stack.pop() {
        let children = store.child_groups(&tag)?;
        stack.extend(children.into_iter().rev().map(|g| g.tag));
        batch.queue(NodeRef::Group(tag), NodeUpdate::Lod(spec.clone()));
    }
    let written = batch.len();
    store.commit_batch(batch)?;
    log::debug!("graphics tier {tier} applied to {written} group(s)");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{GroupNode, MemoryHierarchy};

    const TABLED: [GraphicsMode; 4] = [
        GraphicsMode::Performance,
        GraphicsMode::Balanced,
        GraphicsMode::Quality,
        GraphicsMode::Ultra,
    ];

    #[test]
    fn tables_are_ordered_and_contiguous() {
        for mode in TABLED {
            let levels = mode.lod_levels().unwrap();
            for pair in levels.windows(2) {
                assert!(pair[0].min_distance < pair[1].min_distance);
                assert_eq!(pair[0].max_distance, pair[1].min_distance);
                assert!(pair[0].stride < pair[1].stride);
            }
            assert_eq!(levels[0].stride, 1);
            assert!(levels[3].max_distance.is_infinite());
        }
    }

    #[test]
    fn higher_tiers_keep_detail_farther_out() {
        for pair in TABLED.windows(2) {
            let lower = pair[0].lod_levels().unwrap();
            let higher = pair[1].lod_levels().unwrap();
            assert!(higher[0].max_distance > lower[0].max_distance);
            assert!(higher[3].stride < lower[3].stride);
        }
    }

    #[test]
    fn shading_flags_follow_tier() {
        let props = |m: GraphicsMode| m.graphics_mode_props().unwrap();
        assert!(props(GraphicsMode::Performance).approximate);
        assert!(props(GraphicsMode::Balanced).approximate);
        assert!(!props(GraphicsMode::Quality).approximate);
        assert!(!props(GraphicsMode::Ultra).approximate);
        assert_eq!(props(GraphicsMode::Performance).alpha_thickness, 15.0);
        assert_eq!(props(GraphicsMode::Ultra).alpha_thickness, 12.0);
    }

    #[test]
    fn custom_passes_stored_settings_through() {
        assert!(GraphicsMode::Custom.lod_levels().is_none());
        let stored = LodSpec {
            levels: vec![LodLevel::new(0.0, 42.0, 3, 1.5)],
            approximate: true,
            alpha_thickness: 7.0,
        };
        assert_eq!(GraphicsMode::Custom.apply_to(&stored), stored);
        let ultra = GraphicsMode::Ultra.apply_to(&stored);
        assert_eq!(ultra.levels.len(), 4);
        assert!(!ultra.approximate);
    }

    #[test]
    fn tier_names_parse_and_unknown_names_fail() {
        for mode in GraphicsMode::ALL {
            assert_eq!(mode.to_string().parse::<GraphicsMode>().unwrap(), mode);
        }
        assert!(matches!(
            "extreme".parse::<GraphicsMode>(),
            Err(MesoError::InvalidTier(name)) if name == "extreme"
        ));
    }

    #[test]
    fn level_lookup_by_distance() {
        let spec = GraphicsMode::Balanced.apply_to(&LodSpec::default());
        assert_eq!(spec.level_for(10.0).unwrap().stride, 1);
        assert_eq!(spec.level_for(2500.0).unwrap().stride, 150);
        assert_eq!(spec.level_for(1.0e9).unwrap().stride, 300);
        assert!(spec.level_for(0.5).is_none());
    }

    #[test]
    fn tier_is_written_to_every_group() {
        let mut store = MemoryHierarchy::new();
        store.add_group(GroupNode::new("a", "A")).unwrap();
        store
            .add_group(GroupNode::new("a/b", "B").with_parent("a"))
            .unwrap();
        store.add_group(GroupNode::new("c", "C")).unwrap();

        let written =
            apply_graphics_mode(&mut store, GraphicsMode::Performance).unwrap();
        assert_eq!(written, 3);
        let expected = GraphicsMode::Performance.apply_to(&LodSpec::default());
        for tag in ["a", "a/b", "c"] {
            assert_eq!(store.group(tag).unwrap().lod, expected);
        }

        let before = store.generation();
        assert_eq!(
            apply_graphics_mode(&mut store, GraphicsMode::Custom).unwrap(),
            0
        );
        assert_eq!(store.generation(), before);
        assert_eq!(store.group("a/b").unwrap().lod, expected);
    }
}
