//! Process-wide table of live groups, keyed by normalized command name.
//!
//! Explicitly constructed and injected; its lifetime equals the host
//! process's. The keys are unique and always equal the *current*
//! `command_name` of the group they map to — a rename re-keys the table
//! with a remove-then-reinsert under one write lock, never an in-place
//! key mutation.

use crate::error::{GroupError, Result};
use crate::group::GroupHandle;
use crate::types::ContainerId;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct Registry {
    groups: RwLock<HashMap<String, Arc<GroupHandle>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a group under `key` (its current command name). Fails with
    /// `DuplicateGroup` if the key is already taken.
    pub fn register(&self, key: &str, handle: Arc<GroupHandle>) -> Result<()> {
        let mut groups = self.groups.write().expect("registry lock poisoned");
        if groups.contains_key(key) {
            return Err(GroupError::DuplicateGroup(key.to_string()));
        }
        groups.insert(key.to_string(), handle);
        Ok(())
    }

    pub fn lookup(&self, command_name: &str) -> Option<Arc<GroupHandle>> {
        self.groups
            .read()
            .expect("registry lock poisoned")
            .get(command_name)
            .cloned()
    }

    /// Atomic remove-and-reinsert under the new key. Renaming a group to
    /// its own key is a no-op success; `new` taken by a different group is
    /// `DuplicateGroup`; `old` absent is `GroupNotFound`.
    pub fn rename(&self, old: &str, new: &str) -> Result<()> {
        let mut groups = self.groups.write().expect("registry lock poisoned");
        if !groups.contains_key(old) {
            return Err(GroupError::GroupNotFound(old.to_string()));
        }
        if old == new {
            return Ok(());
        }
        if groups.contains_key(new) {
            return Err(GroupError::DuplicateGroup(new.to_string()));
        }
        if let Some(handle) = groups.remove(old) {
            groups.insert(new.to_string(), handle);
        }
        Ok(())
    }

    /// Remove and return the group registered under `command_name`.
    pub fn unregister(&self, command_name: &str) -> Result<Arc<GroupHandle>> {
        self.groups
            .write()
            .expect("registry lock poisoned")
            .remove(command_name)
            .ok_or_else(|| GroupError::GroupNotFound(command_name.to_string()))
    }

    /// Resolve the group owning `container` (event routing: platform
    /// notifications carry container ids, not command names).
    pub fn find_by_container(&self, container: ContainerId) -> Option<Arc<GroupHandle>> {
        self.groups
            .read()
            .expect("registry lock poisoned")
            .values()
            .find(|h| h.container_id() == container)
            .cloned()
    }

    /// All registered command names, sorted.
    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .groups
            .read()
            .expect("registry lock poisoned")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn handles(&self) -> Vec<Arc<GroupHandle>> {
        self.groups
            .read()
            .expect("registry lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.groups.read().expect("registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Group;
    use crate::types::{ContainerId, RoleId};

    fn handle(container: u64, display: &str) -> Arc<GroupHandle> {
        Arc::new(GroupHandle::new(Group::new(
            ContainerId(container),
            display,
            RoleId(container * 10 + 1),
            RoleId(container * 10 + 2),
        )))
    }

    #[test]
    fn register_and_lookup() {
        let registry = Registry::new();
        let h = handle(1, "Curse of Strahd");
        registry.register("curse-of-strahd", h.clone()).unwrap();
        let found = registry.lookup("curse-of-strahd").unwrap();
        assert_eq!(found.container_id(), h.container_id());
        assert!(registry.lookup("missing").is_none());
    }

    #[test]
    fn register_rejects_duplicate_key() {
        let registry = Registry::new();
        registry.register("strahd", handle(1, "Strahd")).unwrap();
        let err = registry.register("strahd", handle(2, "Strahd")).unwrap_err();
        assert!(matches!(err, GroupError::DuplicateGroup(_)));
    }

    #[test]
    fn rename_moves_key_atomically() {
        let registry = Registry::new();
        registry.register("old-name", handle(1, "Old Name")).unwrap();
        registry.rename("old-name", "new-name").unwrap();
        assert!(registry.lookup("old-name").is_none());
        assert!(registry.lookup("new-name").is_some());
    }

    #[test]
    fn rename_missing_key_is_not_found() {
        let registry = Registry::new();
        let err = registry.rename("ghost", "anything").unwrap_err();
        assert!(matches!(err, GroupError::GroupNotFound(_)));
    }

    #[test]
    fn rename_onto_taken_key_is_duplicate() {
        let registry = Registry::new();
        registry.register("a", handle(1, "A")).unwrap();
        registry.register("b", handle(2, "B")).unwrap();
        let err = registry.rename("a", "b").unwrap_err();
        assert!(matches!(err, GroupError::DuplicateGroup(_)));
        // Failed rename leaves both entries in place.
        assert!(registry.lookup("a").is_some());
        assert!(registry.lookup("b").is_some());
    }

    #[test]
    fn rename_to_self_is_noop() {
        let registry = Registry::new();
        registry.register("same", handle(1, "Same")).unwrap();
        registry.rename("same", "same").unwrap();
        assert!(registry.lookup("same").is_some());
    }

    #[test]
    fn unregister_returns_evicted_group() {
        let registry = Registry::new();
        registry.register("gone", handle(1, "Gone")).unwrap();
        let evicted = registry.unregister("gone").unwrap();
        assert_eq!(evicted.container_id(), ContainerId(1));
        assert!(registry.lookup("gone").is_none());
        assert!(matches!(
            registry.unregister("gone").unwrap_err(),
            GroupError::GroupNotFound(_)
        ));
    }

    #[test]
    fn find_by_container_scans_values() {
        let registry = Registry::new();
        registry.register("a", handle(1, "A")).unwrap();
        registry.register("b", handle(2, "B")).unwrap();
        let found = registry.find_by_container(ContainerId(2)).unwrap();
        assert_eq!(found.container_id(), ContainerId(2));
        assert!(registry.find_by_container(ContainerId(9)).is_none());
    }

    #[test]
    fn command_names_are_sorted() {
        let registry = Registry::new();
        registry.register("zeta", handle(1, "Zeta")).unwrap();
        registry.register("alpha", handle(2, "Alpha")).unwrap();
        assert_eq!(registry.command_names(), vec!["alpha", "zeta"]);
    }
}
