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

use std::fmt;
use rowcast_core::DataError;
use thiserror::Error;

/// Operations a shape must provide for a strategy to build it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ParameterlessConstructor,
    ElementCountConstructor,
    AddMethod,
    InsertMethod,
    InPlacePopulation,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::ParameterlessConstructor => "parameterless constructor",
            Capability::ElementCountConstructor => "element-count constructor",
            Capability::AddMethod => "add method",
            Capability::InsertMethod => "add(key, value) method",
            Capability::InPlacePopulation => "in-place population support",
        };
        f.write_str(name)
    }
}

/// Invalid per-type configuration, raised while the mapping is registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("`{type_name}` already uses a {existing}; cannot also configure a {requested}")]
    ConflictingCreation {
        type_name: &'static str,
        existing: &'static str,
        requested: &'static str,
    },
    #[error("a map function for `{type_name}` cannot be combined with a {other}")]
    MapFunctionWithOverrides {
        type_name: &'static str,
        other: &'static str,
    },
}

/// Schema-level failure, raised once per (type, schema) compile attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("type `{type_name}` cannot be mapped from a record")]
    UnmappableType { type_name: &'static str },
    #[error("type `{type_name}` is missing a required {capability}")]
    MissingCapability {
        type_name: &'static str,
        capability: Capability,
    },
    #[error("non-invokable constructor `{constructor}` for `{type_name}`: {reason}")]
    NonInvokableConstructor {
        type_name: &'static str,
        constructor: String,
        reason: &'static str,
    },
    #[error("no suitable constructor for `{type_name}` among columns [{columns}]")]
    NoSuitableConstructor {
        type_name: &'static str,
        columns: String,
    },
    #[error("`{type_name}` cannot hold elements of type `{element}`")]
    UnsupportedElement {
        type_name: &'static str,
        element: &'static str,
    },
    #[error("mapping `{type_name}` exceeded the nesting limit of {limit}")]
    RecursionLimit { type_name: &'static str, limit: usize },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Row-time failure. Every variant names the member or column at fault.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("factory for `{type_name}` returned no instance")]
    FactoryReturnedNone { type_name: &'static str },
    #[error("column `{column}` holds '{value}', which is not a valid GUID for `{member}`")]
    InvalidGuid {
        member: String,
        column: String,
        value: String,
    },
    #[error("column `{column}` overflows `{target}` for `{member}`")]
    NumericOverflow {
        member: String,
        column: String,
        target: &'static str,
    },
    #[error("column `{column}` cannot be converted to `{target}` for `{member}`: {source}")]
    Conversion {
        member: String,
        column: String,
        target: &'static str,
        #[source]
        source: DataError,
    },
    #[error("expected a value of type `{expected}` while mapping")]
    TypeMismatch { expected: &'static str },
    #[error("no branch of `{type_name}` matched the row and the type has no default")]
    NoMatchingBranch { type_name: &'static str },
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl MapError {
    pub fn type_mismatch<T: ?Sized>() -> Self {
        MapError::TypeMismatch { expected: std::any::type_name::<T>() }
    }
}

#[derive(Debug, Error)]
pub enum RowcastError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, RowcastError>;
