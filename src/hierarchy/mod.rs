//! The group/entity hierarchy the engine colors, seen through a store
//! adapter.
//!
//! Groups form trees (one per root: "by compartment", "by function", ...).
//! Entities are leaves that name their direct group in each tree by tag, so
//! one entity can be reachable from several roots at once. Nothing here
//! owns a parent/child pointer; every relationship is a tag lookup.
//!
//! Writes never go to a store directly. Callers queue [`NodeUpdate`]s into
//! an [`UpdateBatch`] and hand the whole batch to
//! [`HierarchyStore::commit_batch`], which applies all of it or none of it.

mod cache;
mod filter;
mod memory;

pub use cache::HierarchyCache;
pub use filter::EntityFilter;
pub use memory::MemoryHierarchy;

use crate::clip::{BoundingSphere, ClipSpec};
use crate::color::{Color, ColorSchemeType, ColorSpec};
use crate::error::MesoError;
use crate::lod::LodSpec;

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// A group in one of the hierarchy trees.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    /// Unique, path-like identifier (e.g. `"function/transport"`).
    pub tag: String,
    /// Display name.
    pub label: String,
    /// Tag of the enclosing group; `None` for a root.
    pub parent: Option<String>,
    /// Color scheme for the group's descendants.
    pub color: ColorSpec,
    /// Level-of-detail settings.
    pub lod: LodSpec,
    /// Clip settings.
    pub clip: ClipSpec,
}

impl GroupNode {
    /// A root group with default settings.
    pub fn new(tag: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            label: label.into(),
            parent: None,
            color: ColorSpec::default(),
            lod: LodSpec::default(),
            clip: ClipSpec::default(),
        }
    }

    /// Place the group under `parent`.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Replace the color scheme.
    #[must_use]
    pub fn with_color(mut self, color: ColorSpec) -> Self {
        self.color = color;
        self
    }

    /// Whether the group has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Resolved appearance of one renderable entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityAppearance {
    /// Final color.
    pub color: Color,
    /// Lightness adjustment.
    pub lightness: f32,
    /// Opacity.
    pub alpha: f32,
    /// Emissive strength.
    pub emissive: f32,
}

impl Default for EntityAppearance {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            lightness: 0.0,
            alpha: 1.0,
            emissive: 0.0,
        }
    }
}

impl EntityAppearance {
    /// `color` with the lightness, opacity and emission of `spec`.
    #[must_use]
    pub fn from_spec(color: Color, spec: &ColorSpec) -> Self {
        Self {
            color,
            lightness: spec.lightness,
            alpha: spec.alpha,
            emissive: spec.emissive,
        }
    }
}

/// A renderable leaf (one structure or shape representation).
#[derive(Debug, Clone, PartialEq)]
pub struct EntityNode {
    /// Unique identifier.
    pub key: String,
    /// Display name, matched by [`EntityFilter`].
    pub label: String,
    /// Tags of the groups directly containing this entity, at most one per
    /// tree.
    pub groups: Vec<String>,
    /// Whether the entity is currently shown.
    pub visible: bool,
    /// Current appearance.
    pub appearance: EntityAppearance,
}

impl EntityNode {
    /// A visible entity with default appearance in the given groups.
    pub fn new<I, T>(
        key: impl Into<String>,
        label: impl Into<String>,
        groups: I,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            key: key.into(),
            label: label.into(),
            groups: groups.into_iter().map(Into::into).collect(),
            visible: true,
            appearance: EntityAppearance::default(),
        }
    }

    /// Whether `tag` directly contains this entity.
    #[must_use]
    pub fn is_in(&self, tag: &str) -> bool {
        self.groups.iter().any(|g| g == tag)
    }
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

/// Reference to a node by identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// A group, by tag.
    Group(String),
    /// An entity, by key.
    Entity(String),
}

impl NodeRef {
    /// Reference a group.
    pub fn group(tag: impl Into<String>) -> Self {
        Self::Group(tag.into())
    }

    /// Reference an entity.
    pub fn entity(key: impl Into<String>) -> Self {
        Self::Entity(key.into())
    }
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Group(tag) => write!(f, "group '{tag}'"),
            Self::Entity(key) => write!(f, "entity '{key}'"),
        }
    }
}

/// A single queued mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeUpdate {
    /// Replace a group's color scheme.
    Color(ColorSpec),
    /// Change only a group's color mode.
    ColorKind(ColorSchemeType),
    /// Replace an entity's appearance.
    Appearance(EntityAppearance),
    /// Replace a group's level-of-detail settings.
    Lod(LodSpec),
    /// Replace a group's clip settings.
    Clip(ClipSpec),
}

impl NodeUpdate {
    /// Whether this update targets groups (as opposed to entities).
    #[must_use]
    pub const fn is_group_update(&self) -> bool {
        !matches!(self, Self::Appearance(_))
    }

    /// Apply to a group. Returns `false` if the update is entity-only.
    pub fn apply_to_group(&self, group: &mut GroupNode) -> bool {
        match self {
            Self::Color(spec) => group.color = *spec,
            Self::ColorKind(kind) => group.color.kind = *kind,
            Self::Lod(lod) => group.lod = lod.clone(),
            Self::Clip(clip) => group.clip = *clip,
            Self::Appearance(_) => return false,
        }
        true
    }

    /// Apply to an entity. Returns `false` if the update is group-only.
    pub fn apply_to_entity(&self, entity: &mut EntityNode) -> bool {
        match self {
            Self::Appearance(appearance) => {
                entity.appearance = *appearance;
                true
            }
            _ => false,
        }
    }
}

/// An ordered set of writes committed as one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBatch {
    updates: Vec<(NodeRef, NodeUpdate)>,
}

impl UpdateBatch {
    /// An empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `update` for `node`. Later updates to the same node win.
    pub fn queue(&mut self, node: NodeRef, update: NodeUpdate) {
        self.updates.push((node, update));
    }

    /// Number of queued updates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Queued updates in order.
    pub fn iter(&self) -> impl Iterator<Item = &(NodeRef, NodeUpdate)> {
        self.updates.iter()
    }

    /// Check that every update matches its node kind.
    pub fn validate_kinds(&self) -> Result<(), MesoError> {
        for (node, update) in &self.updates {
            let for_group = matches!(node, NodeRef::Group(_));
            if for_group != update.is_group_update() {
                return Err(MesoError::InvalidUpdate(format!(
                    "{update:?} cannot be applied to {node}"
                )));
            }
        }
        Ok(())
    }
}

impl IntoIterator for UpdateBatch {
    type Item = (NodeRef, NodeUpdate);
    type IntoIter = std::vec::IntoIter<(NodeRef, NodeUpdate)>;

    fn into_iter(self) -> Self::IntoIter {
        self.updates.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Adapter over the host's scene graph.
///
/// Lookups of a tag or key that no longer exists return
/// [`MesoError::StaleHierarchyReference`].
pub trait HierarchyStore {
    /// All root groups, in creation order.
    fn roots(&self) -> Vec<GroupNode>;

    /// The group with `tag`.
    fn group(&self, tag: &str) -> Result<GroupNode, MesoError>;

    /// Direct child groups of `tag`, in creation order.
    fn child_groups(&self, tag: &str) -> Result<Vec<GroupNode>, MesoError>;

    /// Entities directly contained in `tag`.
    fn entities(&self, tag: &str) -> Result<Vec<EntityNode>, MesoError>;

    /// The entity with `key`.
    fn entity(&self, key: &str) -> Result<EntityNode, MesoError>;

    /// Entities anywhere under `tag`, each listed once, in depth-first
    /// group order.
    fn all_entities(&self, tag: &str) -> Result<Vec<EntityNode>, MesoError> {
        let mut out: Vec<EntityNode> = Vec::new();
        let mut stack = vec![tag.to_owned()];
        while let Some(current) = stack.pop() {
            for entity in self.entities(&current)? {
                if !out.iter().any(|e| e.key == entity.key) {
                    out.push(entity);
                }
            }
            let children = self.child_groups(&current)?;
            stack.extend(children.into_iter().rev().map(|g| g.tag));
        }
        Ok(out)
    }

    /// Apply every update in `batch`, or none of them.
    fn commit_batch(&mut self, batch: UpdateBatch) -> Result<(), MesoError>;

    /// Bounding sphere of everything rendered.
    fn bounding_sphere(&self) -> BoundingSphere;
}
