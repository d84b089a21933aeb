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

//! The mapping entry point.

use std::any::TypeId;
use std::marker::PhantomData;
use std::sync::Arc;
use rowcast_core::{Record, RowSchema, Rows};
use tracing::debug;
use crate::cache::{CacheStats, MapperCache, MapperKey};
use crate::column::ColumnSet;
use crate::compiler::{RecordCompiler, StrategyCompiler};
use crate::config::MapperConfig;
use crate::context::CompilationContext;
use crate::dispatch::{CompiledBranch, SubclassMapper};
use crate::errors::{Capability, CompileError, MapError};
use crate::mapping::{Branch, TypeConfig, TypeMapping, TypeMappings};
use crate::program::ErasedMapper;
use crate::shape::{unbox, Mapped, Shape};

/// Owns the configuration, the per-type mappings and the mapper cache.
///
/// ```ignore
/// let registry = MapperRegistry::new(MapperConfig::default());
/// let users: Vec<User> = registry.map_rows(&rows)?;
/// ```
#[derive(Default)]
pub struct MapperRegistry {
    config: MapperConfig,
    types: TypeMappings,
    cache: MapperCache,
}

impl MapperRegistry {
    pub fn new(config: MapperConfig) -> Self {
        MapperRegistry {
            config,
            types: TypeMappings::default(),
            cache: MapperCache::new(),
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Registers the mapping options of `T`, replacing earlier ones. Cached
    /// mappers are dropped.
    pub fn configure<T: Mapped>(&self, mapping: TypeMapping<T>) {
        for (type_id, config) in mapping.into_configs() {
            debug!("[Rowcast]: Configured {} ({})", config.type_name(), config.signature());
            self.types.insert(type_id, Arc::new(config));
        }
        self.cache.clear();
    }

    pub fn mapper<T: Mapped>(&self, schema: &RowSchema) -> Result<Mapper<T>, CompileError> {
        let inner = self.compile(&T::shape(), TypeId::of::<T>(), schema, false, true)?;
        Ok(Mapper { inner, _marker: PhantomData })
    }

    /// Mapper that assigns columns onto an existing `T`.
    pub fn populator<T: Mapped>(&self, schema: &RowSchema) -> Result<Populator<T>, CompileError> {
        let inner = self.compile(&T::shape(), TypeId::of::<T>(), schema, true, true)?;
        Ok(Populator { inner, _marker: PhantomData })
    }

    pub fn map_rows<T: Mapped>(&self, rows: &Rows) -> crate::Result<Vec<T>> {
        let mapper = self.mapper::<T>(rows.schema())?;
        Ok(mapper.map_all(rows)?)
    }

    /// Drops every cached mapper.
    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn compile(
        &self,
        shape: &Shape,
        requested: TypeId,
        schema: &RowSchema,
        populate: bool,
        dispatch: bool,
    ) -> Result<Arc<dyn ErasedMapper>, CompileError> {
        let type_config = self.types.get(&shape.type_id()).map(|entry| entry.value().clone());
        if let Some(config) = type_config.as_deref().filter(|config| dispatch && config.has_branches()) {
            if populate {
                return Err(CompileError::MissingCapability {
                    type_name: shape.type_name(),
                    capability: Capability::InPlacePopulation,
                });
            }
            return self.compile_branches(shape, config, schema);
        }

        let signature = type_config.as_ref().map(|config| config.signature()).unwrap_or_default();
        let key = MapperKey::new(requested, shape.type_id(), signature, populate, schema);
        let caching = self.config.cache_enabled();
        if caching {
            if let Some(mapper) = self.cache.get(&key) {
                return Ok(mapper);
            }
        }

        let prefixes = match type_config.as_deref() {
            Some(config) if !config.ignored_prefixes.is_empty() => config.ignored_prefixes.as_slice(),
            _ => self.config.ignored_prefixes(),
        };
        let columns = ColumnSet::extract(schema, prefixes, self.config.column_renames());
        let compiler: Arc<dyn RecordCompiler> = match type_config.as_ref().and_then(|config| config.compiler.clone()) {
            Some(compiler) => compiler,
            None => Arc::new(StrategyCompiler),
        };
        let mut ctx = CompilationContext::new(&self.config, &self.types, requested, shape.type_id()).populate(populate);
        let mapper = compiler.compile(&mut ctx, shape, &columns)?;
        if ctx.is_populating() {
            return Err(CompileError::MissingCapability {
                type_name: shape.type_name(),
                capability: Capability::InPlacePopulation,
            });
        }
        if caching && ctx.is_cacheable() {
            Ok(self.cache.put(key, mapper))
        } else {
            Ok(mapper)
        }
    }

    fn compile_branches(&self, shape: &Shape, config: &TypeConfig, schema: &RowSchema) -> Result<Arc<dyn ErasedMapper>, CompileError> {
        let compile = |branch: &Branch| -> Result<CompiledBranch, CompileError> {
            let specific = (branch.shape)();
            let dispatch = branch.specific != shape.type_id();
            let mapper = self.compile(&specific, shape.type_id(), schema, false, dispatch)?;
            Ok(CompiledBranch { predicate: branch.predicate.clone(), mapper, into: branch.into.clone() })
        };
        let branches = config.branches.iter().map(compile).collect::<Result<Vec<_>, _>>()?;
        let otherwise = config.otherwise.as_ref().map(compile).transpose()?;
        debug!(
            "[Rowcast]: Compiled {} subclass branches for {}",
            branches.len() + otherwise.iter().count(),
            shape.type_name()
        );
        Ok(Arc::new(SubclassMapper::new(shape.type_name(), branches, otherwise, shape.default_fn().cloned())))
    }
}

/// A compiled `record -> T` function. Cheap to clone and safe to call from
/// many threads at once.
pub struct Mapper<T> {
    inner: Arc<dyn ErasedMapper>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Mapper<T> {
    fn clone(&self) -> Self {
        Mapper { inner: self.inner.clone(), _marker: PhantomData }
    }
}

impl<T: 'static> Mapper<T> {
    pub fn map(&self, record: &dyn Record) -> Result<T, MapError> {
        unbox::<T>(self.inner.map(record, None)?)
    }

    pub fn map_all(&self, rows: &Rows) -> Result<Vec<T>, MapError> {
        rows.iter().map(|row| self.map(row)).collect()
    }
}

/// Assigns a record's columns onto an existing instance; members without a
/// matching column keep their value.
pub struct Populator<T> {
    inner: Arc<dyn ErasedMapper>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Populator<T> {
    fn clone(&self) -> Self {
        Populator { inner: self.inner.clone(), _marker: PhantomData }
    }
}

impl<T: 'static> Populator<T> {
    pub fn populate(&self, record: &dyn Record, target: T) -> Result<T, MapError> {
        unbox::<T>(self.inner.map(record, Some(Box::new(target)))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowcast_core::{Value, ValueKind};

    fn rows() -> Rows {
        let mut rows = Rows::new(RowSchema::default().column("A", ValueKind::I32).column("a", ValueKind::I32));
        rows.push_values(vec![Value::Int(5), Value::Int(6)]);
        rows
    }

    #[test]
    fn duplicate_columns_fill_a_list() {
        let registry = MapperRegistry::default();
        let mapped: Vec<Vec<i32>> = registry.map_rows(&rows()).unwrap();
        assert_eq!(mapped, vec![vec![5, 6]]);
    }

    #[test]
    fn second_compile_is_served_from_cache() {
        let registry = MapperRegistry::default();
        registry.mapper::<Vec<i32>>(rows().schema()).unwrap();
        registry.mapper::<Vec<i32>>(rows().schema()).unwrap();
        let stats = registry.cache_stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
    }

    #[test]
    fn disabled_cache_compiles_every_time() {
        let registry = MapperRegistry::new(MapperConfig::default().set_cache_enabled(false));
        registry.mapper::<Vec<i32>>(rows().schema()).unwrap();
        registry.mapper::<Vec<i32>>(rows().schema()).unwrap();
        assert_eq!(registry.cache_stats().entries, 0);
    }
}
