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

//! Per-type mapping configuration.

use std::any::{type_name, TypeId};
use std::hash::BuildHasherDefault;
use std::marker::PhantomData;
use std::sync::Arc;
use dashmap::DashMap;
use rowcast_core::Record;
use twox_hash::XxHash64;
use crate::column::ColumnSet;
use crate::compiler::RecordCompiler;
use crate::errors::{ConfigError, MapError};
use crate::program::{FactoryFn, RecordFn};
use crate::shape::{unbox, Boxed, Constructor, Mapped, ObjectShape, ShapeFn};

pub type FinderFn = Arc<dyn Fn(&ObjectShape, &ColumnSet) -> Option<Constructor> + Send + Sync>;
pub type PredicateFn = Arc<dyn Fn(&dyn Record) -> bool + Send + Sync>;
pub type IntoBaseFn = Arc<dyn Fn(Boxed) -> Result<Boxed, MapError> + Send + Sync>;

pub(crate) type TypeMappings = DashMap<TypeId, Arc<TypeConfig>, BuildHasherDefault<XxHash64>>;

/// How instances of a type are created. At most one per type.
#[derive(Clone)]
pub enum Creation {
    Map(RecordFn),
    Constructor(Constructor),
    Finder(FinderFn),
    Factory(FactoryFn),
}

impl Creation {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Creation::Map(_) => "map function",
            Creation::Constructor(_) => "constructor",
            Creation::Finder(_) => "constructor finder",
            Creation::Factory(_) => "factory",
        }
    }

    /// Part of the mapper cache key.
    pub fn describe(&self) -> String {
        match self {
            Creation::Constructor(constructor) => constructor.signature().to_string(),
            other => other.kind_name().to_string(),
        }
    }
}

/// One subclass branch: rows matching `predicate` map to `specific`, then
/// convert into the base type.
#[derive(Clone)]
pub struct Branch {
    pub(crate) predicate: Option<PredicateFn>,
    pub(crate) specific: TypeId,
    pub(crate) specific_name: &'static str,
    pub(crate) shape: ShapeFn,
    pub(crate) into: IntoBaseFn,
}

impl Branch {
    fn new<T: 'static, S: Mapped, F>(predicate: Option<PredicateFn>, into: F) -> Branch
    where
        F: Fn(S) -> T + Send + Sync + 'static,
    {
        Branch {
            predicate,
            specific: TypeId::of::<S>(),
            specific_name: type_name::<S>(),
            shape: S::shape,
            into: Arc::new(move |value| unbox::<S>(value).map(|v| Box::new(into(v)) as Boxed)),
        }
    }

    pub fn specific_name(&self) -> &'static str {
        self.specific_name
    }
}

/// Type-erased form of a [`TypeMapping`], stored in the registry.
#[derive(Clone)]
pub struct TypeConfig {
    pub(crate) type_name: &'static str,
    pub(crate) creation: Option<Creation>,
    pub(crate) compiler: Option<Arc<dyn RecordCompiler>>,
    pub(crate) separator: Option<String>,
    pub(crate) ignored_prefixes: Vec<String>,
    pub(crate) branches: Vec<Branch>,
    pub(crate) otherwise: Option<Branch>,
}

impl TypeConfig {
    fn new(type_name: &'static str) -> TypeConfig {
        TypeConfig {
            type_name,
            creation: None,
            compiler: None,
            separator: None,
            ignored_prefixes: Vec::new(),
            branches: Vec::new(),
            otherwise: None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn creation(&self) -> Option<&Creation> {
        self.creation.as_ref()
    }

    pub fn has_branches(&self) -> bool {
        !self.branches.is_empty() || self.otherwise.is_some()
    }

    /// Cache-key fragment for the overrides that change compiled output.
    pub(crate) fn signature(&self) -> String {
        let mut parts = Vec::new();
        if let Some(creation) = &self.creation {
            parts.push(creation.describe());
        }
        if self.compiler.is_some() {
            parts.push("compiler".to_string());
        }
        parts.join("+")
    }
}

/// Builder for the mapping options of `T`.
///
/// ```ignore
/// let mapping = TypeMapping::<User>::new()
///     .factory(|| Some(User::default()))?
///     .separator("__");
/// registry.configure(mapping);
/// ```
pub struct TypeMapping<T> {
    config: TypeConfig,
    nested: Vec<(TypeId, TypeConfig)>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Mapped> Default for TypeMapping<T> {
    fn default() -> Self {
        TypeMapping::new()
    }
}

impl<T: Mapped> TypeMapping<T> {
    pub fn new() -> Self {
        TypeMapping {
            config: TypeConfig::new(type_name::<T>()),
            nested: Vec::new(),
            _marker: PhantomData,
        }
    }

    fn set_creation(mut self, creation: Creation) -> Result<Self, ConfigError> {
        let type_name = self.config.type_name;
        let requested = creation.kind_name();
        match &self.config.creation {
            Some(Creation::Map(_)) => {
                return Err(ConfigError::MapFunctionWithOverrides { type_name, other: requested });
            }
            Some(existing) if matches!(creation, Creation::Map(_)) => {
                return Err(ConfigError::MapFunctionWithOverrides { type_name, other: existing.kind_name() });
            }
            Some(existing) => {
                return Err(ConfigError::ConflictingCreation { type_name, existing: existing.kind_name(), requested });
            }
            None => {}
        }
        if matches!(creation, Creation::Map(_)) && self.config.compiler.is_some() {
            return Err(ConfigError::MapFunctionWithOverrides { type_name, other: "compiler" });
        }
        self.config.creation = Some(creation);
        Ok(self)
    }

    /// Maps the whole record with `map`. Excludes every other creation
    /// override and a compiler override.
    pub fn map_with<F>(self, map: F) -> Result<Self, ConfigError>
    where
        F: Fn(&dyn Record) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let map: RecordFn = Arc::new(move |record| map(record).map(|v| Box::new(v) as Boxed).map_err(MapError::Custom));
        self.set_creation(Creation::Map(map))
    }

    pub fn constructor(self, constructor: Constructor) -> Result<Self, ConfigError> {
        self.set_creation(Creation::Constructor(constructor))
    }

    /// Chooses the constructor for a schema; returning `None` falls back to
    /// constructor scoring.
    pub fn constructor_finder<F>(self, finder: F) -> Result<Self, ConfigError>
    where
        F: Fn(&ObjectShape, &ColumnSet) -> Option<Constructor> + Send + Sync + 'static,
    {
        self.set_creation(Creation::Finder(Arc::new(finder)))
    }

    /// Creates instances with `factory`; members are then assigned from
    /// columns. A factory returning `None` fails the row.
    pub fn factory<F>(self, factory: F) -> Result<Self, ConfigError>
    where
        F: Fn() -> Option<T> + Send + Sync + 'static,
    {
        let factory: FactoryFn = Arc::new(move || factory().map(|v| Box::new(v) as Boxed));
        self.set_creation(Creation::Factory(factory))
    }

    pub fn compiler(mut self, compiler: Arc<dyn RecordCompiler>) -> Result<Self, ConfigError> {
        if let Some(Creation::Map(_)) = self.config.creation {
            return Err(ConfigError::MapFunctionWithOverrides { type_name: self.config.type_name, other: "compiler" });
        }
        self.config.compiler = Some(compiler);
        Ok(self)
    }

    /// Separator between this type's member names and its children's
    /// column names.
    pub fn separator<S: Into<String>>(mut self, separator: S) -> Self {
        self.config.separator = Some(separator.into());
        self
    }

    pub fn ignore_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.ignored_prefixes.push(prefix.into());
        self
    }

    /// Rows matching `predicate` are mapped as `S` and converted with `into`.
    /// Branches are tried in registration order.
    pub fn subclass<S, P, F>(mut self, predicate: P, into: F) -> Self
    where
        S: Mapped,
        P: Fn(&dyn Record) -> bool + Send + Sync + 'static,
        F: Fn(S) -> T + Send + Sync + 'static,
    {
        self.config.branches.push(Branch::new::<T, S, F>(Some(Arc::new(predicate)), into));
        self
    }

    /// Like [`TypeMapping::subclass`], with its own mapping options for `S`.
    pub fn subclass_with<S, P, F>(mut self, predicate: P, mapping: TypeMapping<S>, into: F) -> Self
    where
        S: Mapped,
        P: Fn(&dyn Record) -> bool + Send + Sync + 'static,
        F: Fn(S) -> T + Send + Sync + 'static,
    {
        self.nested.extend(mapping.into_configs());
        self.subclass(predicate, into)
    }

    /// Branch used when no predicate matches.
    pub fn otherwise<S, F>(mut self, into: F) -> Self
    where
        S: Mapped,
        F: Fn(S) -> T + Send + Sync + 'static,
    {
        self.config.otherwise = Some(Branch::new::<T, S, F>(None, into));
        self
    }

    pub(crate) fn into_configs(self) -> Vec<(TypeId, TypeConfig)> {
        let mut configs = self.nested;
        configs.push((TypeId::of::<T>(), self.config));
        configs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Thing;

    impl Mapped for Thing {
        fn shape() -> crate::shape::Shape {
            crate::shape::Shape::opaque_with_default::<Thing>()
        }
    }

    #[test]
    fn second_creation_conflicts() {
        let err = TypeMapping::<Thing>::new()
            .factory(|| Some(Thing))
            .and_then(|m| m.constructor(Constructor::new::<Thing>("new").build(|_| Ok(Thing))))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::ConflictingCreation { existing: "factory", requested: "constructor", .. }));
    }

    #[test]
    fn map_function_excludes_overrides() {
        let err = TypeMapping::<Thing>::new()
            .map_with(|_| Ok(Thing))
            .and_then(|m| m.factory(|| None))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::MapFunctionWithOverrides { other: "factory", .. }));

        let err = TypeMapping::<Thing>::new()
            .compiler(Arc::new(crate::compiler::StrategyCompiler))
            .and_then(|m| m.map_with(|_| Ok(Thing)))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::MapFunctionWithOverrides { other: "compiler", .. }));
    }

    #[test]
    fn nested_mappings_are_collected() {
        #[derive(Default)]
        struct Sub;
        impl Mapped for Sub {
            fn shape() -> crate::shape::Shape {
                crate::shape::Shape::opaque_with_default::<Sub>()
            }
        }
        let configs = TypeMapping::<Thing>::new()
            .subclass_with(|_| true, TypeMapping::<Sub>::new().separator("."), |_: Sub| Thing)
            .into_configs();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].0, TypeId::of::<Sub>());
        assert!(configs[1].1.has_branches());
    }
}
