//! Clip geometry in UI-relative and world-space forms.
//!
//! The UI edits clip position and scale as integer percentages of the
//! scene's bounding sphere; the renderer consumes world-space objects.
//! Converting back rounds to whole percent, so a world → relative → world
//! trip is only accurate to one percent of the radius.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::MesoError;
use crate::hierarchy::{HierarchyStore, NodeRef, NodeUpdate, UpdateBatch};

/// Bounding sphere of the rendered scene.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingSphere {
    /// Sphere center in world units.
    pub center: Vec3,
    /// Sphere radius in world units.
    pub radius: f32,
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 1.0,
        }
    }
}

/// Clip primitive shape.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum ClipType {
    /// No clipping.
    #[default]
    None,
    /// Sphere.
    Sphere,
    /// Axis-aligned box before rotation.
    Cube,
    /// Half-space.
    Plane,
    /// Capped cylinder.
    Cylinder,
    /// Cone extending without bound.
    InfiniteCone,
}

/// Rotation as an axis and an angle in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClipRotation {
    /// Rotation axis (need not be normalized).
    pub axis: Vec3,
    /// Rotation angle in degrees.
    pub angle: f32,
}

impl Default for ClipRotation {
    fn default() -> Self {
        Self {
            axis: Vec3::X,
            angle: 0.0,
        }
    }
}

impl ClipRotation {
    fn to_quat(self) -> Quat {
        Quat::from_axis_angle(
            self.axis.normalize_or(Vec3::X),
            self.angle.to_radians(),
        )
    }
}

/// Clip settings relative to the scene bounding sphere.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClipSpec {
    /// Clip shape.
    #[serde(rename = "type")]
    pub kind: ClipType,
    /// Keep the outside instead of the inside.
    pub invert: bool,
    /// Center offset in percent of the radius, `[-100, 100]` per axis.
    pub position: Vec3,
    /// Orientation.
    pub rotation: ClipRotation,
    /// Extent in percent of the diameter, `[0, 100]` per axis.
    pub scale: Vec3,
}

impl Default for ClipSpec {
    fn default() -> Self {
        Self {
            kind: ClipType::None,
            invert: false,
            position: Vec3::ZERO,
            rotation: ClipRotation::default(),
            scale: Vec3::splat(100.0),
        }
    }
}

/// A world-space clip primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipObject {
    /// Clip shape (never [`ClipType::None`]).
    pub kind: ClipType,
    /// Keep the outside instead of the inside.
    pub invert: bool,
    /// Center in world units.
    pub position: Vec3,
    /// Orientation.
    pub rotation: ClipRotation,
    /// Extent in world units.
    pub scale: Vec3,
}

impl ClipSpec {
    /// World-space object for this spec; `None` when clipping is off.
    #[must_use]
    pub fn to_world(&self, sphere: &BoundingSphere) -> Option<ClipObject> {
        if self.kind == ClipType::None {
            return None;
        }
        Some(ClipObject {
            kind: self.kind,
            invert: self.invert,
            position: sphere.center + sphere.radius * self.position / 100.0,
            rotation: self.rotation,
            scale: self.scale * 2.0 * sphere.radius / 100.0,
        })
    }
}

impl ClipObject {
    /// Relative spec for this object, rounded to whole percent.
    ///
    /// A degenerate (zero-radius) sphere maps to zero percentages.
    #[must_use]
    pub fn to_relative(&self, sphere: &BoundingSphere) -> ClipSpec {
        let (position, scale) = if sphere.radius > 0.0 {
            (
                ((self.position - sphere.center) / sphere.radius * 100.0)
                    .round(),
                (self.scale / (2.0 * sphere.radius) * 100.0).round(),
            )
        } else {
            (Vec3::ZERO, Vec3::ZERO)
        };
        ClipSpec {
            kind: self.kind,
            invert: self.invert,
            position,
            rotation: self.rotation,
            scale,
        }
    }

    /// World transform (translation · rotation · scale) of the primitive.
    #[must_use]
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation.to_quat(),
            self.position,
        )
    }
}

/// World-space objects of every active spec, in input order.
#[must_use]
pub fn clip_objects(
    specs: &[ClipSpec],
    sphere: &BoundingSphere,
) -> Vec<ClipObject> {
    specs.iter().filter_map(|s| s.to_world(sphere)).collect()
}

/// Store `spec` on group `tag` and return its world-space object under the
/// store's current bounding sphere.
pub fn set_group_clip<S: HierarchyStore + ?Sized>(
    store: &mut S,
    tag: &str,
    spec: ClipSpec,
) -> Result<Option<ClipObject>, MesoError> {
    let _ = store.group(tag)?;
    let mut batch = UpdateBatch::new();
    batch.queue(NodeRef::group(tag), NodeUpdate::Clip(spec));
    store.commit_batch(batch)?;
    Ok(spec.to_world(&store.bounding_sphere()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{GroupNode, MemoryHierarchy};

    fn sphere() -> BoundingSphere {
        BoundingSphere {
            center: Vec3::new(10.0, -5.0, 2.0),
            radius: 50.0,
        }
    }

    fn cube() -> ClipSpec {
        ClipSpec {
            kind: ClipType::Cube,
            invert: true,
            position: Vec3::new(20.0, -40.0, 0.0),
            rotation: ClipRotation {
                axis: Vec3::Y,
                angle: 30.0,
            },
            scale: Vec3::new(50.0, 10.0, 100.0),
        }
    }

    #[test]
    fn none_produces_no_object() {
        assert!(ClipSpec::default().to_world(&sphere()).is_none());
        let specs = [ClipSpec::default(), cube()];
        assert_eq!(clip_objects(&specs, &sphere()).len(), 1);
    }

    #[test]
    fn relative_values_scale_with_the_sphere() {
        let object = cube().to_world(&sphere()).unwrap();
        assert_eq!(object.position, Vec3::new(20.0, -25.0, 2.0));
        assert_eq!(object.scale, Vec3::new(50.0, 10.0, 100.0));
        assert!(object.invert);
        assert_eq!(object.kind, ClipType::Cube);
    }

    #[test]
    fn relative_round_trip_is_exact_for_integer_percentages() {
        let spec = cube();
        let back = spec.to_world(&sphere()).unwrap().to_relative(&sphere());
        assert_eq!(back, spec);
    }

    #[test]
    fn to_relative_rounds_to_whole_percent() {
        let object = ClipObject {
            kind: ClipType::Sphere,
            invert: false,
            position: Vec3::new(10.3, -5.0, 2.0),
            rotation: ClipRotation::default(),
            scale: Vec3::splat(33.3),
        };
        let spec = object.to_relative(&sphere());
        assert_eq!(spec.position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(spec.scale, Vec3::splat(33.0));
    }

    #[test]
    fn zero_radius_maps_to_zero_percentages() {
        let degenerate = BoundingSphere {
            center: Vec3::ZERO,
            radius: 0.0,
        };
        let spec = cube().to_world(&sphere()).unwrap().to_relative(&degenerate);
        assert_eq!(spec.position, Vec3::ZERO);
        assert_eq!(spec.scale, Vec3::ZERO);
    }

    #[test]
    fn transform_places_the_primitive() {
        let object = cube().to_world(&sphere()).unwrap();
        let center = object.transform().transform_point3(Vec3::ZERO);
        assert!((center - object.position).length() < 1e-4);
    }

    #[test]
    fn group_clip_is_committed() {
        let mut store = MemoryHierarchy::new();
        store.add_group(GroupNode::new("cell", "Cell")).unwrap();
        store.set_bounding_sphere(sphere());
        let object = set_group_clip(&mut store, "cell", cube()).unwrap();
        assert!(object.is_some());
        assert_eq!(store.group("cell").unwrap().clip, cube());
        assert!(matches!(
            set_group_clip(&mut store, "gone", cube()),
            Err(MesoError::StaleHierarchyReference(_))
        ));
    }
}
