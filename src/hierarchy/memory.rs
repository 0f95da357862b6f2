use super::{EntityNode, GroupNode, HierarchyStore, NodeRef, UpdateBatch};
use crate::clip::BoundingSphere;
use crate::error::MesoError;

/// In-process [`HierarchyStore`] backed by plain vectors.
///
/// Used by hosts without a scene graph of their own and by tests. Groups
/// and entities keep insertion order, which is the order lookups return.
#[derive(Debug, Clone, Default)]
pub struct MemoryHierarchy {
    groups: Vec<GroupNode>,
    entities: Vec<EntityNode>,
    sphere: BoundingSphere,
    generation: u64,
}

fn stale(node: impl std::fmt::Display) -> MesoError {
    MesoError::StaleHierarchyReference(node.to_string())
}

impl MemoryHierarchy {
    /// An empty hierarchy with a unit bounding sphere.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Incremented by every structural change and committed batch.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn group_index(&self, tag: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.tag == tag)
    }

    fn entity_index(&self, key: &str) -> Option<usize> {
        self.entities.iter().position(|e| e.key == key)
    }

    /// Insert a group. Its parent, if any, must already exist.
    pub fn add_group(&mut self, group: GroupNode) -> Result<(), MesoError> {
        if self.group_index(&group.tag).is_some() {
            return Err(MesoError::Hierarchy(format!(
                "duplicate group tag '{}'",
                group.tag
            )));
        }
        if let Some(parent) = &group.parent {
            if self.group_index(parent).is_none() {
                return Err(MesoError::Hierarchy(format!(
                    "parent '{parent}' of '{}' does not exist",
                    group.tag
                )));
            }
        }
        self.groups.push(group);
        self.generation += 1;
        Ok(())
    }

    /// Insert an entity. Every group it names must already exist.
    pub fn add_entity(&mut self, entity: EntityNode) -> Result<(), MesoError> {
        if self.entity_index(&entity.key).is_some() {
            return Err(MesoError::Hierarchy(format!(
                "duplicate entity key '{}'",
                entity.key
            )));
        }
        if let Some(missing) =
            entity.groups.iter().find(|g| self.group_index(g).is_none())
        {
            return Err(MesoError::Hierarchy(format!(
                "group '{missing}' of entity '{}' does not exist",
                entity.key
            )));
        }
        self.entities.push(entity);
        self.generation += 1;
        Ok(())
    }

    /// Remove a group with its descendant groups. Entities lose their
    /// membership in the removed groups but are otherwise kept.
    pub fn remove_group(&mut self, tag: &str) -> Result<(), MesoError> {
        if self.group_index(tag).is_none() {
            return Err(stale(NodeRef::group(tag)));
        }
        let mut doomed = vec![tag.to_owned()];
        let mut i = 0;
        while i < doomed.len() {
            let current = doomed[i].clone();
            doomed.extend(
                self.groups
                    .iter()
                    .filter(|g| g.parent.as_deref() == Some(current.as_str()))
                    .map(|g| g.tag.clone()),
            );
            i += 1;
        }
        self.groups.retain(|g| !doomed.contains(&g.tag));
        for entity in &mut self.entities {
            entity.groups.retain(|g| !doomed.contains(g));
        }
        self.generation += 1;
        log::debug!("removed {} group(s) under '{tag}'", doomed.len());
        Ok(())
    }

    /// Remove an entity.
    pub fn remove_entity(&mut self, key: &str) -> Result<(), MesoError> {
        let index = self
            .entity_index(key)
            .ok_or_else(|| stale(NodeRef::entity(key)))?;
        let _ = self.entities.remove(index);
        self.generation += 1;
        Ok(())
    }

    /// Show or hide an entity. Not a structural edit: cached hierarchy
    /// indexes stay valid.
    pub fn set_entity_visible(
        &mut self,
        key: &str,
        visible: bool,
    ) -> Result<(), MesoError> {
        let index = self
            .entity_index(key)
            .ok_or_else(|| stale(NodeRef::entity(key)))?;
        self.entities[index].visible = visible;
        self.generation += 1;
        Ok(())
    }

    /// Replace the scene bounding sphere.
    pub fn set_bounding_sphere(&mut self, sphere: BoundingSphere) {
        self.sphere = sphere;
    }
}

impl HierarchyStore for MemoryHierarchy {
    fn roots(&self) -> Vec<GroupNode> {
        self.groups.iter().filter(|g| g.is_root()).cloned().collect()
    }

    fn group(&self, tag: &str) -> Result<GroupNode, MesoError> {
        self.group_index(tag)
            .map(|i| self.groups[i].clone())
            .ok_or_else(|| stale(NodeRef::group(tag)))
    }

    fn child_groups(&self, tag: &str) -> Result<Vec<GroupNode>, MesoError> {
        let _ = self.group(tag)?;
        Ok(self
            .groups
            .iter()
            .filter(|g| g.parent.as_deref() == Some(tag))
            .cloned()
            .collect())
    }

    fn entities(&self, tag: &str) -> Result<Vec<EntityNode>, MesoError> {
        let _ = self.group(tag)?;
        Ok(self
            .entities
            .iter()
            .filter(|e| e.is_in(tag))
            .cloned()
            .collect())
    }

    fn entity(&self, key: &str) -> Result<EntityNode, MesoError> {
        self.entity_index(key)
            .map(|i| self.entities[i].clone())
            .ok_or_else(|| stale(NodeRef::entity(key)))
    }

    fn commit_batch(&mut self, batch: UpdateBatch) -> Result<(), MesoError> {
        batch.validate_kinds()?;
        // Resolve every reference before touching anything.
        let mut resolved = Vec::with_capacity(batch.len());
        for (node, update) in batch {
            let index = match &node {
                NodeRef::Group(tag) => self.group_index(tag),
                NodeRef::Entity(key) => self.entity_index(key),
            }
            .ok_or_else(|| stale(&node))?;
            resolved.push((node, index, update));
        }

        for (node, index, update) in &resolved {
            let applied = match node {
                NodeRef::Group(_) => {
                    update.apply_to_group(&mut self.groups[*index])
                }
                NodeRef::Entity(_) => {
                    update.apply_to_entity(&mut self.entities[*index])
                }
            };
            debug_assert!(applied, "update kinds were validated");
        }
        self.generation += 1;
        log::trace!("committed batch of {} update(s)", resolved.len());
        Ok(())
    }

    fn bounding_sphere(&self) -> BoundingSphere {
        self.sphere
    }
}
