//! Per-entity property map cache.

use crate::bound::EntityRef;
use crate::descriptor::PropertyMap;
use crate::error::ValueResult;
use crate::registry::TypeRegistry;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Caches each entity's developer-name → property mapping.
///
/// The first lookup for a type copies the mapping out of the registry;
/// later lookups only take the read lock. Populating is idempotent, so two
/// threads racing on the same miss both succeed and one copy is dropped.
#[derive(Debug, Default)]
pub struct PropertyCache {
    entries: RwLock<HashMap<TypeId, Arc<PropertyMap>>>,
}

impl PropertyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the property map for `entity`, loading it from `registry` on
    /// first use.
    pub fn properties(
        &self,
        registry: &TypeRegistry,
        entity: EntityRef,
    ) -> ValueResult<Arc<PropertyMap>> {
        if let Some(hit) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&entity.type_id())
        {
            return Ok(Arc::clone(hit));
        }

        let loaded = Arc::new(registry.find_by_ref(entity)?.properties().clone());
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(
            entries.entry(entity.type_id()).or_insert(loaded),
        ))
    }

    /// Returns the number of cached entity types.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached mapping.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
