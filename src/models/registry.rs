// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Class name to id registry.
//!
//! Ids are handed out sequentially and never reassigned, so a label file
//! written in one session still means the same thing after a restart. The
//! registry keeps a reverse index so overlay rendering can look up a name
//! from the id stored on each box.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::AnnotateError;

/// Integer id of a class, as written in label files.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub u32);

impl ClassId {
    #[inline]
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Largest id accepted from a persisted mapping. Ids above it would leave too
/// little room for `resolve` to keep counting upwards.
pub const MAX_LOADED_ID: u32 = u32::MAX / 2;

/// Append-only mapping between class names and ids.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    ids: HashMap<String, ClassId>,
    names: HashMap<ClassId, String>,
    next_id: u32,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a persisted mapping.
    ///
    /// # Errors
    ///
    /// Fails if two names share an id, or if any id is above
    /// [`MAX_LOADED_ID`].
    pub fn from_mapping<I>(mapping: I) -> Result<Self, AnnotateError>
    where
        I: IntoIterator<Item = (String, ClassId)>,
    {
        let mut registry = Self::new();
        let mut max_id: Option<ClassId> = None;

        for (name, id) in mapping {
            if id.0 > MAX_LOADED_ID {
                return Err(AnnotateError::ClassIdOverflow(id));
            }
            if let Some(existing) = registry.names.get(&id) {
                return Err(AnnotateError::DuplicateClassId {
                    id,
                    first: existing.clone(),
                    second: name,
                });
            }
            max_id = max_id.max(Some(id));
            registry.names.insert(id, name.clone());
            registry.ids.insert(name, id);
        }

        registry.next_id = max_id.map_or(0, |id| id.0 + 1);
        Ok(registry)
    }

    /// Replace the contents with a persisted mapping.
    ///
    /// Only valid on a registry that has not assigned anything yet; loading
    /// later could hand out ids that collide with ones already in use.
    ///
    /// # Errors
    ///
    /// [`AnnotateError::RegistryInUse`] if classes were already resolved,
    /// plus anything [`ClassRegistry::from_mapping`] rejects.
    pub fn load<I>(&mut self, mapping: I) -> Result<(), AnnotateError>
    where
        I: IntoIterator<Item = (String, ClassId)>,
    {
        if !self.is_empty() {
            return Err(AnnotateError::RegistryInUse(self.len()));
        }
        *self = Self::from_mapping(mapping)?;
        log::info!(
            "Loaded {} class(es), next class id {}",
            self.len(),
            self.next_id
        );
        Ok(())
    }

    /// Id for `name`, assigning the next free id the first time it is seen.
    pub fn resolve(&mut self, name: &str) -> ClassId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }

        let id = ClassId(self.next_id);
        // Loaded ids are capped, so this only saturates after ~2^31 new names.
        self.next_id = self.next_id.saturating_add(1);
        self.ids.insert(name.to_string(), id);
        self.names.insert(id, name.to_string());
        log::info!("Assigned class '{}' id {}", name, id);
        id
    }

    /// Id for `name` without assigning one.
    pub fn get(&self, name: &str) -> Option<ClassId> {
        self.ids.get(name).copied()
    }

    /// Name registered under `id`.
    ///
    /// # Errors
    ///
    /// [`AnnotateError::NotFound`] when no name maps to `id`, which means the
    /// registry and the boxes referencing it are out of sync.
    pub fn reverse_lookup(&self, id: ClassId) -> Result<&str, AnnotateError> {
        self.names
            .get(&id)
            .map(String::as_str)
            .ok_or(AnnotateError::NotFound(id))
    }

    /// Class names ordered by ascending id.
    pub fn names_sorted_by_id(&self) -> Vec<String> {
        let mut entries: Vec<(&ClassId, &String)> = self.names.iter().collect();
        entries.sort_by_key(|(id, _)| **id);
        entries.into_iter().map(|(_, name)| name.clone()).collect()
    }

    /// `(name, id)` pairs ordered by ascending id.
    pub fn entries(&self) -> Vec<(String, ClassId)> {
        let mut entries: Vec<(String, ClassId)> = self
            .ids
            .iter()
            .map(|(name, id)| (name.clone(), *id))
            .collect();
        entries.sort_by_key(|(_, id)| *id);
        entries
    }

    /// The id the next new class will receive.
    pub fn next_id(&self) -> ClassId {
        ClassId(self.next_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, u32)]) -> Vec<(String, ClassId)> {
        pairs
            .iter()
            .map(|(name, id)| (name.to_string(), ClassId(*id)))
            .collect()
    }

    #[test]
    fn test_resolve_is_stable() {
        let mut registry = ClassRegistry::new();
        let cat = registry.resolve("cat");
        let dog = registry.resolve("dog");
        assert_eq!(cat, ClassId(0));
        assert_eq!(dog, ClassId(1));
        assert_eq!(registry.resolve("cat"), cat);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.next_id(), ClassId(2));
    }

    #[test]
    fn test_load_continues_after_max_id() {
        let mut registry = ClassRegistry::new();
        registry
            .load(mapping(&[("length", 0), ("angle", 3), ("bom", 2)]))
            .expect("load mapping");
        assert_eq!(registry.resolve("roughness"), ClassId(4));
        assert_eq!(registry.resolve("angle"), ClassId(3));
    }

    #[test]
    fn test_load_empty_mapping_starts_at_zero() {
        let mut registry = ClassRegistry::new();
        registry.load(Vec::new()).expect("load empty mapping");
        assert_eq!(registry.resolve("first"), ClassId(0));
    }

    #[test]
    fn test_load_rejected_after_resolve() {
        let mut registry = ClassRegistry::new();
        registry.resolve("cat");
        let err = registry.load(mapping(&[("dog", 0)])).unwrap_err();
        assert!(matches!(err, AnnotateError::RegistryInUse(1)));
        assert_eq!(registry.reverse_lookup(ClassId(0)).unwrap(), "cat");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = ClassRegistry::from_mapping(mapping(&[("a", 1), ("b", 1)])).unwrap_err();
        assert!(matches!(err, AnnotateError::DuplicateClassId { id: ClassId(1), .. }));
    }

    #[test]
    fn test_max_id_overflow_rejected() {
        let err = ClassRegistry::from_mapping(mapping(&[("huge", u32::MAX)])).unwrap_err();
        assert!(matches!(err, AnnotateError::ClassIdOverflow(_)));
    }

    #[test]
    fn test_near_max_id_rejected() {
        let mut registry = ClassRegistry::new();
        let err = registry
            .load(mapping(&[("a", 0), ("b", u32::MAX - 1)]))
            .unwrap_err();
        assert!(matches!(err, AnnotateError::ClassIdOverflow(ClassId(id)) if id == u32::MAX - 1));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_largest_loadable_id_keeps_resolving() {
        let mut registry = ClassRegistry::new();
        registry
            .load(mapping(&[("top", MAX_LOADED_ID)]))
            .expect("load mapping");
        assert_eq!(registry.resolve("b"), ClassId(MAX_LOADED_ID + 1));
        assert_eq!(registry.resolve("c"), ClassId(MAX_LOADED_ID + 2));
        assert_eq!(registry.reverse_lookup(ClassId(MAX_LOADED_ID)).unwrap(), "top");
    }

    #[test]
    fn test_names_sorted_by_id() {
        let registry =
            ClassRegistry::from_mapping(mapping(&[("dog", 1), ("cat", 0), ("bird", 2)]))
                .expect("build registry");
        assert_eq!(registry.names_sorted_by_id(), vec!["cat", "dog", "bird"]);
    }

    #[test]
    fn test_reverse_lookup_missing_id() {
        let registry = ClassRegistry::from_mapping(mapping(&[("cat", 0)])).expect("build");
        assert_eq!(registry.reverse_lookup(ClassId(0)).unwrap(), "cat");
        let err = registry.reverse_lookup(ClassId(7)).unwrap_err();
        assert!(matches!(err, AnnotateError::NotFound(ClassId(7))));
    }
}
