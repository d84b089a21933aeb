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

//! Rowcast compiles a mapping from a result set's shape to a Rust type once,
//! caches it, and then maps every row with the compiled program.
//!
//! Features:
//!
//! *   Case-insensitive, prefix-scoped column matching for nested members;
//! *   Constructor selection by column coverage, factories and map functions;
//! *   Collections, dictionaries, tuples and per-row subclass dispatch.
//!
//! ## Installation
//!
//! Put the desired version of the crate into the `dependencies` section of your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! rowcast = "0.1.0"
//! ```
//!
//! ## Feature.
//!
//! * ```sqlite``` - to read result sets from sqlite with `rusqlite`
//!
//! ## Annotions.
//! * Mapped - to make rowcast work with structs
//! * default - on the struct, build with `Default` and assign members.
//! * alias - alternate column name for a field.
//! * unnamed - field may take a column reported without a name.
//! * skip - field is never mapped.
//!
//! ## Support Field Types.
//!
//! * ```Option<T>```
//! * ```bool, char```
//! * ```i8, i16, i32, i64, isize, u8, u16, u32, u64, usize```
//! * ```f32, f64, BigDecimal```
//! * ```String, Blob, serde_json::Value```
//! * ```Uuid, NaiveDate, NaiveTime, NaiveDateTime, DateTime<Utc>```
//! * ```Vec<T>, VecDeque<T>, HashSet<T>, BTreeSet<T>, HashMap<String, V>, tuples```
//!
//! ## Example
//!
//! ```ignore
//! use rowcast::*;
//!
//! #[derive(Mapped, Default)]
//! #[mapped(default)]
//! pub struct Address {
//!     pub city: String,
//!     pub zip: Option<String>,
//! }
//!
//! #[derive(Mapped, Default)]
//! #[mapped(default)]
//! pub struct User {
//!     pub id: i64,
//!     #[mapped(alias = "user_name")]
//!     pub name: String,
//!     pub address: Option<Address>,
//! }
//!
//! let registry = MapperRegistry::new(MapperConfig::default());
//! let mut rows = Rows::new(RowSchema::default()
//!     .column("Id", ValueKind::I64)
//!     .column("USER_NAME", ValueKind::String)
//!     .column("Address_City", ValueKind::String)
//!     .column("Address_Zip", ValueKind::String));
//! rows.push_values(vec![1i64.into(), "Jack".into(), "Paris".into(), Value::Null]);
//! let users: Vec<User> = registry.map_rows(&rows)?;
//! ```

#![deny(clippy::all)]

extern crate self as rowcast;

mod errors;
mod config;
mod column;
mod classify;
mod convert;
mod constructor;
mod context;
mod compiler;
mod program;
mod mapping;
mod strategy;
mod dispatch;
mod cache;
mod registry;
mod driver;
pub mod shape;

#[doc(inline)]
pub use errors::{Capability, CompileError, ConfigError, MapError, Result, RowcastError};
#[doc(inline)]
pub use config::MapperConfig;
#[doc(inline)]
pub use column::{ColumnInfo, ColumnSet, ViewColumn};
#[doc(inline)]
pub use classify::{classify, Classification, MAX_TUPLE_ARITY};
#[doc(inline)]
pub use convert::{ScalarConverter, ScalarRule};
pub use constructor::{resolve as resolve_constructor, score as score_constructor, validate as validate_constructor};
#[doc(inline)]
pub use context::CompilationContext;
#[doc(inline)]
pub use compiler::{RecordCompiler, StrategyCompiler};
#[doc(inline)]
pub use program::{ConstructedValue, ErasedMapper, FactoryFn, Label, Op, Program, RecordFn, Slot};
#[doc(inline)]
pub use mapping::{Branch, Creation, FinderFn, IntoBaseFn, PredicateFn, TypeConfig, TypeMapping};
#[doc(inline)]
pub use cache::{CacheStats, MapperCache, MapperKey};
#[doc(inline)]
pub use registry::{Mapper, MapperRegistry, Populator};
#[doc(inline)]
pub use shape::{unbox, Args, Boxed, Constructor, Mapped, ObjectShape, Property, Shape, ShapeKind};
#[cfg(feature = "sqlite")]
pub use driver::sqlite;

pub use rowcast_core::*;
pub use rowcast_derive::*;
