use rustc_hash::FxHashMap;

use super::HierarchyStore;
use crate::error::MesoError;

/// Lazily built tag index over a [`HierarchyStore`].
///
/// Only structure is cached: child tags, member keys and ancestry. Entity
/// state such as visibility and labels is always read from the store.
/// Entries are filled on first query and kept until the host reports a
/// structural edit through [`invalidate`](Self::invalidate). The cache
/// never observes the store on its own, so a missed invalidation yields
/// stale answers rather than errors.
#[derive(Debug, Default)]
pub struct HierarchyCache {
    child_tags: FxHashMap<String, Vec<String>>,
    member_keys: FxHashMap<String, Vec<String>>,
    root_of: FxHashMap<String, String>,
    roots: Option<Vec<String>>,
}

impl HierarchyCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags of the direct child groups of `tag`.
    pub fn child_tags<S: HierarchyStore + ?Sized>(
        &mut self,
        store: &S,
        tag: &str,
    ) -> Result<Vec<String>, MesoError> {
        if let Some(tags) = self.child_tags.get(tag) {
            return Ok(tags.clone());
        }
        let tags: Vec<String> = store
            .child_groups(tag)?
            .into_iter()
            .map(|g| g.tag)
            .collect();
        let _ = self.child_tags.insert(tag.to_owned(), tags.clone());
        Ok(tags)
    }

    /// Keys of the entities directly inside `tag`.
    pub fn member_keys<S: HierarchyStore + ?Sized>(
        &mut self,
        store: &S,
        tag: &str,
    ) -> Result<Vec<String>, MesoError> {
        if let Some(keys) = self.member_keys.get(tag) {
            return Ok(keys.clone());
        }
        let keys: Vec<String> =
            store.entities(tag)?.into_iter().map(|e| e.key).collect();
        let _ = self.member_keys.insert(tag.to_owned(), keys.clone());
        Ok(keys)
    }

    /// `tag` followed by every descendant group tag, depth-first pre-order.
    pub fn subtree_tags<S: HierarchyStore + ?Sized>(
        &mut self,
        store: &S,
        tag: &str,
    ) -> Result<Vec<String>, MesoError> {
        let mut out = Vec::new();
        let mut stack = vec![tag.to_owned()];
        while let Some(current) = stack.pop() {
            let children = self.child_tags(store, &current)?;
            stack.extend(children.into_iter().rev());
            out.push(current);
        }
        Ok(out)
    }

    /// Tag of the root whose tree contains `tag`.
    pub fn root_of<S: HierarchyStore + ?Sized>(
        &mut self,
        store: &S,
        tag: &str,
    ) -> Result<String, MesoError> {
        if let Some(root) = self.root_of.get(tag) {
            return Ok(root.clone());
        }
        let mut group = store.group(tag)?;
        while let Some(parent) = group.parent.take() {
            group = store.group(&parent)?;
        }
        let _ = self.root_of.insert(tag.to_owned(), group.tag.clone());
        Ok(group.tag)
    }

    /// Tags of every root group.
    pub fn roots<S: HierarchyStore + ?Sized>(
        &mut self,
        store: &S,
    ) -> Vec<String> {
        self.roots
            .get_or_insert_with(|| {
                store.roots().into_iter().map(|g| g.tag).collect()
            })
            .clone()
    }

    /// Drop cached answers after a structural edit.
    ///
    /// `Some(tag)` drops the entries computed from `tag`: its children, its
    /// member keys and every child list naming it. Ancestry and the root list
    /// are always rebuilt. `None` clears everything.
    pub fn invalidate(&mut self, tag: Option<&str>) {
        match tag {
            Some(tag) => {
                let _ = self.child_tags.remove(tag);
                let _ = self.member_keys.remove(tag);
                self.child_tags
                    .retain(|_, children| !children.iter().any(|c| c == tag));
            }
            None => {
                self.child_tags.clear();
                self.member_keys.clear();
            }
        }
        self.root_of.clear();
        self.roots = None;
        log::trace!("hierarchy cache invalidated ({tag:?})");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{EntityNode, GroupNode, MemoryHierarchy};

    fn store() -> MemoryHierarchy {
        let mut store = MemoryHierarchy::new();
        store.add_group(GroupNode::new("r", "R")).unwrap();
        store
            .add_group(GroupNode::new("r/a", "A").with_parent("r"))
            .unwrap();
        store
            .add_group(GroupNode::new("r/a/x", "X").with_parent("r/a"))
            .unwrap();
        store
            .add_group(GroupNode::new("r/b", "B").with_parent("r"))
            .unwrap();
        store
            .add_entity(EntityNode::new("e1", "one", ["r/a/x"]))
            .unwrap();
        store
    }

    #[test]
    fn subtree_is_pre_order() {
        let store = store();
        let mut cache = HierarchyCache::new();
        assert_eq!(
            cache.subtree_tags(&store, "r").unwrap(),
            vec!["r", "r/a", "r/a/x", "r/b"]
        );
        assert_eq!(cache.root_of(&store, "r/a/x").unwrap(), "r");
        assert_eq!(cache.roots(&store), vec!["r"]);
    }

    #[test]
    fn answers_are_stale_until_invalidated() {
        let mut store = store();
        let mut cache = HierarchyCache::new();
        assert_eq!(cache.child_tags(&store, "r").unwrap().len(), 2);
        assert_eq!(cache.member_keys(&store, "r/b").unwrap().len(), 0);

        store
            .add_group(GroupNode::new("r/c", "C").with_parent("r"))
            .unwrap();
        store
            .add_entity(EntityNode::new("e2", "two", ["r/b"]))
            .unwrap();
        assert_eq!(cache.child_tags(&store, "r").unwrap().len(), 2);

        cache.invalidate(Some("r"));
        assert_eq!(cache.child_tags(&store, "r").unwrap().len(), 3);
        // Members of another tag survive a targeted invalidation.
        assert_eq!(cache.member_keys(&store, "r/b").unwrap().len(), 0);

        cache.invalidate(Some("r/b"));
        assert_eq!(cache.member_keys(&store, "r/b").unwrap().len(), 1);
    }

    #[test]
    fn invalidating_a_child_drops_the_parent_list() {
        let mut store = store();
        let mut cache = HierarchyCache::new();
        assert_eq!(
            cache.child_tags(&store, "r/a").unwrap(),
            vec!["r/a/x"]
        );
        store.remove_group("r/a/x").unwrap();
        cache.invalidate(Some("r/a/x"));
        assert!(cache.child_tags(&store, "r/a").unwrap().is_empty());
    }

    #[test]
    fn full_invalidation_and_stale_tags() {
        let mut store = store();
        let mut cache = HierarchyCache::new();
        let _ = cache.subtree_tags(&store, "r").unwrap();
        store.remove_group("r/a").unwrap();
        cache.invalidate(None);
        assert_eq!(
            cache.subtree_tags(&store, "r").unwrap(),
            vec!["r", "r/b"]
        );
        assert!(matches!(
            cache.member_keys(&store, "r/a"),
            Err(MesoError::StaleHierarchyReference(_))
        ));
    }
}
