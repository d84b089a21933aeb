/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */

//! Memoized mappers keyed by (type, schema signature).

use std::any::TypeId;
use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use dashmap::DashMap;
use rowcast_core::{RowSchema, ValueKind};
use tracing::debug;
use twox_hash::XxHash64;
use crate::program::ErasedMapper;

/// Identity of a compiled mapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MapperKey {
    pub requested: TypeId,
    pub specific: TypeId,
    /// Configured creation and compiler overrides, see `TypeConfig::signature`.
    pub creation: String,
    pub populate: bool,
    pub columns: Vec<(String, ValueKind)>,
}

impl MapperKey {
    pub fn new(requested: TypeId, specific: TypeId, creation: String, populate: bool, schema: &RowSchema) -> MapperKey {
        MapperKey {
            requested,
            specific,
            creation,
            populate,
            columns: schema.signature(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Default)]
pub struct MapperCache {
    mappers: DashMap<MapperKey, Arc<dyn ErasedMapper>, BuildHasherDefault<XxHash64>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MapperCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &MapperKey) -> Option<Arc<dyn ErasedMapper>> {
        match self.mappers.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("[Rowcast]: Mapper cache hit for {} columns", key.columns.len());
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("[Rowcast]: Mapper cache miss for {} columns", key.columns.len());
                None
            }
        }
    }

    /// Inserts `mapper` unless another thread got there first; returns the
    /// mapper now stored under `key`.
    pub fn put(&self, key: MapperKey, mapper: Arc<dyn ErasedMapper>) -> Arc<dyn ErasedMapper> {
        self.mappers.entry(key).or_insert(mapper).value().clone()
    }

    pub fn clear(&self) {
        debug!("[Rowcast]: Clearing {} cached mappers", self.mappers.len());
        self.mappers.clear();
    }

    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.mappers.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowcast_core::Record;
    use crate::errors::MapError;
    use crate::shape::{unbox, Boxed};

    struct Constant(u8);

    impl ErasedMapper for Constant {
        fn map(&self, _record: &dyn Record, _input: Option<Boxed>) -> Result<Boxed, MapError> {
            Ok(Box::new(self.0))
        }
    }

    fn key(names: &[&str]) -> MapperKey {
        let schema = names.iter().fold(RowSchema::default(), |s, n| s.column(*n, ValueKind::I32));
        MapperKey::new(TypeId::of::<u8>(), TypeId::of::<u8>(), String::new(), false, &schema)
    }

    #[test]
    fn first_writer_wins() {
        let cache = MapperCache::new();
        cache.put(key(&["a"]), Arc::new(Constant(1)));
        let stored = cache.put(key(&["a"]), Arc::new(Constant(2)));
        let schema = RowSchema::default();
        let row = rowcast_core::RecordRef::new(&schema, &[]);
        assert_eq!(unbox::<u8>(stored.map(&row, None).unwrap()).unwrap(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn counts_hits_and_misses() {
        let cache = MapperCache::new();
        assert!(cache.get(&key(&["a"])).is_none());
        cache.put(key(&["a"]), Arc::new(Constant(1)));
        assert!(cache.get(&key(&["a"])).is_some());
        assert!(cache.get(&key(&["a", "b"])).is_none());
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 2, entries: 1 });
        cache.clear();
        assert!(cache.is_empty());
    }
}
