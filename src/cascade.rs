//! Top-down color assignment over the group hierarchy.
//!
//! A [`CascadeRequest`] names a target group and the [`ColorSpec`] to apply
//! there. The controller walks the target's subtree through the
//! [`HierarchyCache`], asks the [`ColorSampler`] for colors, and commits
//! every resulting write in one [`UpdateBatch`]:
//!
//! - `custom` writes the target's spec and nothing else.
//! - `group-uniform` / `group-generate` give each *leaf group* (a group with
//!   at least one direct visible, filter-matching entity) one distinct base
//!   color. Entities get the base itself, or a hue variant of it drawn with
//!   the leaf's own stored variability and shift.
//! - `uniform` / `generate` ignore group structure and color every matching
//!   entity below the target directly.
//!
//! Every mode except `custom` downgrades the leaf groups it wrote and every
//! other root hierarchy, so an untargeted grouping never recolors the same
//! entities on its next refresh.

use rand::Rng;
use rustc_hash::FxHashSet;

use crate::color::scheme::{validate_shift, validate_variability};
use crate::color::{Color, ColorSampler, ColorSchemeType, ColorSpec};
use crate::error::MesoError;
use crate::hierarchy::{
    EntityAppearance, EntityFilter, HierarchyCache, HierarchyStore, NodeRef,
    NodeUpdate, UpdateBatch,
};
use crate::options::Options;

/// One color scheme edit, as issued by the host UI.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeRequest {
    /// Tag of the group the edit applies to.
    pub target: String,
    /// Scheme to apply.
    pub spec: ColorSpec,
    /// Restricts which entities take part.
    pub filter: EntityFilter,
}

impl CascadeRequest {
    /// Apply `spec` at `target` to every entity.
    pub fn new(target: impl Into<String>, spec: ColorSpec) -> Self {
        Self {
            target: target.into(),
            spec,
            filter: EntityFilter::All,
        }
    }

    /// Restrict the edit to entities whose label passes `filter`.
    #[must_use]
    pub fn with_filter(mut self, filter: &str) -> Self {
        self.filter = EntityFilter::parse(filter);
        self
    }
}

/// What a cascade wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Entities that received a color.
    pub entities_colored: usize,
    /// Distinct groups whose settings were written.
    pub groups_updated: usize,
    /// Leaf groups in walk order.
    pub leaf_groups: Vec<String>,
}

impl CascadeReport {
    /// Whether nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities_colored == 0 && self.groups_updated == 0
    }
}

struct Leaf {
    tag: String,
    entities: Vec<String>,
}

/// Drives color scheme edits through a [`HierarchyStore`].
#[derive(Debug, Clone, Default)]
pub struct ColorCascade {
    sampler: ColorSampler,
}

impl ColorCascade {
    /// Controller sampling colors with `sampler`.
    #[must_use]
    pub fn new(sampler: ColorSampler) -> Self {
        Self { sampler }
    }

    /// Controller using the sampler tuning in `options`.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        Self::new(ColorSampler::new(options.sampler.clone()))
    }

    /// The color source.
    #[must_use]
    pub fn sampler(&self) -> &ColorSampler {
        &self.sampler
    }

    /// Apply `request` and commit the result.
    ///
    /// Either every write lands or none does. A target or member that has
    /// disappeared from the store fails with
    /// [`MesoError::StaleHierarchyReference`]; out-of-range spec values fail
    /// with [`MesoError::MalformedColorSpec`] before any color is sampled.
    pub fn apply<S: HierarchyStore + ?Sized>(
        &self,
        store: &mut S,
        cache: &mut HierarchyCache,
        request: &CascadeRequest,
    ) -> Result<CascadeReport, MesoError> {
        self.apply_with_rng(store, cache, request, &mut rand::rng())
    }

    /// [`apply`](Self::apply) drawing grayscale noise from `rng`.
    pub fn apply_with_rng<S, R>(
        &self,
        store: &mut S,
        cache: &mut HierarchyCache,
        request: &CascadeRequest,
        rng: &mut R,
    ) -> Result<CascadeReport, MesoError>
    where
        S: HierarchyStore + ?Sized,
        R: Rng + ?Sized,
    {
        let spec = &request.spec;
        spec.validate()?;
        let _ = store.group(&request.target)?;

        if spec.kind == ColorSchemeType::Custom {
            let mut batch = UpdateBatch::new();
            batch.queue(
                NodeRef::group(&request.target),
                NodeUpdate::Color(*spec),
            );
            store.commit_batch(batch)?;
            return Ok(CascadeReport {
                groups_updated: 1,
                ..CascadeReport::default()
            });
        }

        let leaves = collect_leaves(&*store, cache, request)?;
        if leaves.is_empty() {
            log::debug!(
                "cascade at '{}': no matching entities, nothing written",
                request.target
            );
            return Ok(CascadeReport::default());
        }

        let mut batch = UpdateBatch::new();
        batch.queue(NodeRef::group(&request.target), NodeUpdate::Color(*spec));
        let entities_colored = if spec.kind.is_grouped() {
            self.queue_grouped(&*store, &leaves, spec, rng, &mut batch)?
        } else {
            self.queue_flat(&*store, &leaves, spec, rng, &mut batch)?
        };
        queue_sibling_roots(&*store, cache, &request.target, &mut batch)?;

        let groups_updated = batch
            .iter()
            .filter_map(|(node, _)| match node {
                NodeRef::Group(tag) => Some(tag.as_str()),
                NodeRef::Entity(_) => None,
            })
            .collect::<FxHashSet<_>>()
            .len();
        let writes = batch.len();
        store.commit_batch(batch)?;
        log::debug!(
            "cascade {:?} at '{}': {entities_colored} entities in {} leaf \
             groups, {writes} writes",
            spec.kind,
            request.target,
            leaves.len()
        );

        Ok(CascadeReport {
            entities_colored,
            groups_updated,
            leaf_groups: leaves.into_iter().map(|leaf| leaf.tag).collect(),
        })
    }

    /// One base color per leaf group; entities get the base or variants.
    fn queue_grouped<S, R>(
        &self,
        store: &S,
        leaves: &[Leaf],
        spec: &ColorSpec,
        rng: &mut R,
        batch: &mut UpdateBatch,
    ) -> Result<usize, MesoError>
    where
        S: HierarchyStore + ?Sized,
        R: Rng + ?Sized,
    {
        let generate = spec.kind.is_generated();
        let mut stored = Vec::with_capacity(leaves.len());
        for leaf in leaves {
            let leaf_spec = store.group(&leaf.tag)?.color;
            if generate {
                validate_variability(leaf_spec.variability)?;
                validate_shift(leaf_spec.shift)?;
            }
            stored.push(leaf_spec);
        }

        let bases = self.sampler.sample_base_colors(leaves.len(), spec.shift)?;
        let mut colored = 0;
        for ((leaf, leaf_spec), base) in leaves.iter().zip(&stored).zip(bases) {
            let colors = if generate {
                self.sampler.sample_variants_with_rng(
                    leaf.entities.len(),
                    base,
                    leaf_spec.variability,
                    leaf_spec.shift,
                    rng,
                )?
            } else {
                vec![base; leaf.entities.len()]
            };
            batch.queue(
                NodeRef::group(&leaf.tag),
                NodeUpdate::Color(ColorSpec {
                    kind: ColorSchemeType::Custom,
                    value: base,
                    lightness: spec.lightness,
                    alpha: spec.alpha,
                    emissive: spec.emissive,
                    illustrative: spec.illustrative,
                    ..*leaf_spec
                }),
            );
            colored += queue_entities(batch, &leaf.entities, &colors, spec);
        }
        Ok(colored)
    }

    /// Color every matching entity below the target as one set.
    fn queue_flat<S, R>(
        &self,
        store: &S,
        leaves: &[Leaf],
        spec: &ColorSpec,
        rng: &mut R,
        batch: &mut UpdateBatch,
    ) -> Result<usize, MesoError>
    where
        S: HierarchyStore + ?Sized,
        R: Rng + ?Sized,
    {
        let mut seen = FxHashSet::default();
        let keys: Vec<&String> = leaves
            .iter()
            .flat_map(|leaf| &leaf.entities)
            .filter(|key| seen.insert(key.as_str()))
            .collect();

        let (colors, leaf_kind) = if spec.kind.is_generated() {
            let colors = self.sampler.sample_variants_with_rng(
                keys.len(),
                spec.value,
                spec.variability,
                spec.shift,
                rng,
            )?;
            (colors, ColorSchemeType::Custom)
        } else {
            (vec![spec.value; keys.len()], ColorSchemeType::Uniform)
        };

        for leaf in leaves {
            let stored = store.group(&leaf.tag)?.color;
            batch.queue(
                NodeRef::group(&leaf.tag),
                NodeUpdate::Color(ColorSpec {
                    kind: leaf_kind,
                    value: spec.value,
                    ..stored
                }),
            );
        }
        Ok(queue_entities(batch, keys, &colors, spec))
    }
}

/// Groups in the target's subtree with at least one direct visible,
/// filter-matching entity, in depth-first pre-order.
fn collect_leaves<S: HierarchyStore + ?Sized>(
    store: &S,
    cache: &mut HierarchyCache,
    request: &CascadeRequest,
) -> Result<Vec<Leaf>, MesoError> {
    let mut leaves = Vec::new();
    for tag in cache.subtree_tags(store, &request.target)? {
        let mut entities = Vec::new();
        for key in cache.member_keys(store, &tag)? {
            // Visibility and labels change without structural edits, so they
            // come from the store rather than the cache.
            let entity = store.entity(&key)?;
            if entity.visible && request.filter.matches(&entity.label) {
                entities.push(key);
            }
        }
        if !entities.is_empty() {
            leaves.push(Leaf { tag, entities });
        }
    }
    Ok(leaves)
}

fn queue_entities<'a>(
    batch: &mut UpdateBatch,
    keys: impl IntoIterator<Item = &'a String>,
    colors: &[Color],
    spec: &ColorSpec,
) -> usize {
    let mut queued = 0;
    for (key, color) in keys.into_iter().zip(colors) {
        batch.queue(
            NodeRef::entity(key),
            NodeUpdate::Appearance(EntityAppearance::from_spec(*color, spec)),
        );
        queued += 1;
    }
    queued
}

/// Mark every root outside the target's tree as `custom`.
fn queue_sibling_roots<S: HierarchyStore + ?Sized>(
    store: &S,
    cache: &mut HierarchyCache,
    target: &str,
    batch: &mut UpdateBatch,
) -> Result<(), MesoError> {
    let own = cache.root_of(store, target)?;
    for root in cache.roots(store) {
        if root == own {
            continue;
        }
        if store.group(&root)?.color.kind != ColorSchemeType::Custom {
            batch.queue(
                NodeRef::group(root),
                NodeUpdate::ColorKind(ColorSchemeType::Custom),
            );
        }
    }
    Ok(())
}

/// Set one entity's appearance by hand and mark every group above it, in
/// every hierarchy, as `custom`.
///
/// Returns how many groups were downgraded.
pub fn override_entity_color<S: HierarchyStore + ?Sized>(
    store: &mut S,
    key: &str,
    appearance: EntityAppearance,
) -> Result<usize, MesoError> {
    let entity = store.entity(key)?;
    let mut batch = UpdateBatch::new();
    batch.queue(NodeRef::entity(key), NodeUpdate::Appearance(appearance));

    let mut downgraded = 0;
    for tag in &entity.groups {
        let mut next = Some(tag.clone());
        while let Some(tag) = next {
            let group = store.group(&tag)?;
            if group.color.kind != ColorSchemeType::Custom {
                batch.queue(
                    NodeRef::group(tag),
                    NodeUpdate::ColorKind(ColorSchemeType::Custom),
                );
                downgraded += 1;
            }
            next = group.parent;
        }
    }
    store.commit_batch(batch)?;
    Ok(downgraded)
}
