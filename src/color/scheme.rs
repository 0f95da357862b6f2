//! Per-node color scheme and its range validation.
//!
//! Out-of-range values are rejected, never clamped: clamping would silently
//! change the requested visual variability.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Color;
use crate::error::MesoError;

/// How a node's descendants are colored.
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
#[serde(rename_all = "kebab-case")]
pub enum ColorSchemeType {
    /// Hue variants of `value` across all matching entities.
    #[default]
    Generate,
    /// `value` on every matching entity.
    Uniform,
    /// Colors are set by hand; nothing cascades.
    Custom,
    /// One distinct base color per leaf group, hue variants within each.
    GroupGenerate,
    /// One distinct base color per leaf group, shared by its entities.
    GroupUniform,
}

impl ColorSchemeType {
    /// Whether the scheme assigns one base color per leaf group.
    #[must_use]
    pub const fn is_grouped(self) -> bool {
        matches!(self, Self::GroupGenerate | Self::GroupUniform)
    }

    /// Whether entities receive per-entity variants rather than one shared
    /// color.
    #[must_use]
    pub const fn is_generated(self) -> bool {
        matches!(self, Self::Generate | Self::GroupGenerate)
    }
}

/// Color parameters owned by one group or entity node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ColorSpec {
    /// Coloring mode.
    #[serde(rename = "type")]
    pub kind: ColorSchemeType,
    /// Base color.
    pub value: Color,
    /// Half-width of the hue window in degrees, 1–180.
    pub variability: u32,
    /// Rotation of generated colors in percent, 0–100.
    pub shift: u32,
    /// Lightness adjustment, -6–6.
    pub lightness: f32,
    /// Opacity, 0–1.
    pub alpha: f32,
    /// Emissive strength, 0–1.
    pub emissive: f32,
    /// Illustrative (outlined, flat-shaded) rendering.
    pub illustrative: bool,
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self {
            kind: ColorSchemeType::Generate,
            value: Color::from_hex(0x1f78b4),
            variability: 20,
            shift: 0,
            lightness: 0.0,
            alpha: 1.0,
            emissive: 0.0,
            illustrative: false,
        }
    }
}

impl ColorSpec {
    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), MesoError> {
        validate_variability(self.variability)?;
        validate_shift(self.shift)?;
        check_range("lightness", self.lightness, -6.0, 6.0)?;
        check_range("alpha", self.alpha, 0.0, 1.0)?;
        check_range("emissive", self.emissive, 0.0, 1.0)
    }

    /// Copy of this spec with a different mode.
    #[must_use]
    pub fn with_kind(mut self, kind: ColorSchemeType) -> Self {
        self.kind = kind;
        self
    }
}

/// Reject a hue variability outside `1..=180`.
pub fn validate_variability(variability: u32) -> Result<(), MesoError> {
    if (1..=180).contains(&variability) {
        Ok(())
    } else {
        Err(MesoError::MalformedColorSpec {
            field: "variability",
            value: f64::from(variability),
        })
    }
}

/// Reject a shift outside `0..=100`.
pub fn validate_shift(shift: u32) -> Result<(), MesoError> {
    if shift <= 100 {
        Ok(())
    } else {
        Err(MesoError::MalformedColorSpec {
            field: "shift",
            value: f64::from(shift),
        })
    }
}

fn check_range(
    field: &'static str,
    value: f32,
    lo: f32,
    hi: f32,
) -> Result<(), MesoError> {
    if (lo..=hi).contains(&value) {
        Ok(())
    } else {
        Err(MesoError::MalformedColorSpec {
            field,
            value: f64::from(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec_is_valid() {
        assert!(ColorSpec::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        let cases = [
            (
                ColorSpec {
                    variability: 0,
                    ..ColorSpec::default()
                },
                "variability",
            ),
            (
                ColorSpec {
                    variability: 181,
                    ..ColorSpec::default()
                },
                "variability",
            ),
            (
                ColorSpec {
                    shift: 101,
                    ..ColorSpec::default()
                },
                "shift",
            ),
            (
                ColorSpec {
                    lightness: 6.5,
                    ..ColorSpec::default()
                },
                "lightness",
            ),
            (
                ColorSpec {
                    alpha: -0.1,
                    ..ColorSpec::default()
                },
                "alpha",
            ),
            (
                ColorSpec {
                    emissive: f32::NAN,
                    ..ColorSpec::default()
                },
                "emissive",
            ),
        ];
        for (spec, expected) in cases {
            match spec.validate() {
                Err(MesoError::MalformedColorSpec { field, .. }) => {
                    assert_eq!(field, expected);
                }
                other => panic!("expected {expected} rejection, got {other:?}"),
            }
        }
    }

    #[test]
    fn scheme_type_uses_kebab_case_names() {
        let json = serde_json::to_string(&ColorSchemeType::GroupGenerate)
            .unwrap();
        assert_eq!(json, "\"group-generate\"");
        assert!(ColorSchemeType::GroupUniform.is_grouped());
        assert!(!ColorSchemeType::Uniform.is_generated());
    }
}
