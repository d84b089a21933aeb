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

//! Compiler entry points.

use std::sync::Arc;
use tracing::debug;
use crate::column::ColumnSet;
use crate::context::CompilationContext;
use crate::errors::{Capability, CompileError};
use crate::program::{ErasedMapper, Program};
use crate::shape::Shape;
use crate::strategy::{compile_value, default_value, Source};

/// Turns a shape and a column view into a row mapper.
///
/// Registered per type with [`TypeMapping::compiler`](crate::TypeMapping::compiler);
/// an override may delegate to [`StrategyCompiler`] for the parts it does not
/// handle itself.
pub trait RecordCompiler: Send + Sync {
    fn compile(
        &self,
        ctx: &mut CompilationContext<'_>,
        shape: &Shape,
        columns: &ColumnSet,
    ) -> Result<Arc<dyn ErasedMapper>, CompileError>;
}

/// The default compiler: classification dispatch into the strategy tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategyCompiler;

impl RecordCompiler for StrategyCompiler {
    fn compile(
        &self,
        ctx: &mut CompilationContext<'_>,
        shape: &Shape,
        columns: &ColumnSet,
    ) -> Result<Arc<dyn ErasedMapper>, CompileError> {
        let outermost = ctx.depth() == 0;
        let saved = ctx.reset_registers();
        ctx.set_direct(shape.type_id());
        let result = build(ctx, shape, columns);
        let (slots, labels) = (ctx.slot_count(), ctx.label_count());
        ctx.restore_registers(saved);
        let value = result?;
        if outermost && ctx.is_populating() {
            return Err(CompileError::MissingCapability {
                type_name: shape.type_name(),
                capability: Capability::InPlacePopulation,
            });
        }
        let program = Program::new(value, slots, labels);
        debug!(
            "[Rowcast]: Compiled {} over {} columns into {} ops",
            shape.type_name(),
            columns.len(),
            program.len()
        );
        Ok(Arc::new(program))
    }
}

fn build(
    ctx: &mut CompilationContext<'_>,
    shape: &Shape,
    columns: &ColumnSet,
) -> Result<crate::program::ConstructedValue, CompileError> {
    match compile_value(ctx, shape, columns, Source::Root)? {
        Some(value) => Ok(value),
        None => default_value(ctx, shape),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::TypeId;
    use indexmap::IndexMap;
    use rowcast_core::{Row, RowSchema, Value, ValueKind};
    use crate::config::MapperConfig;
    use crate::mapping::TypeMappings;
    use crate::shape::{unbox, Constructor, Mapped, ObjectShape, Property};

    #[derive(Debug, Default, PartialEq)]
    struct Person {
        id: i32,
        name: String,
        age: i64,
    }

    impl Mapped for Person {
        fn shape() -> Shape {
            ObjectShape::builder::<Person>()
                .constructor(Constructor::new::<Person>("new").param::<i32>("id").param::<String>("name").build(|a| {
                    Ok(Person { id: a.next()?, name: a.next()?, age: 0 })
                }))
                .property(Property::new("name", |p: &mut Person, v: String| p.name = v))
                .property(Property::new("age", |p: &mut Person, v: i64| p.age = v))
                .build()
        }
    }

    fn schema() -> RowSchema {
        RowSchema::default()
            .column("Id", ValueKind::I32)
            .column("NAME", ValueKind::String)
            .column("age", ValueKind::I64)
            .column("extra", ValueKind::String)
    }

    #[test]
    fn consumes_constructor_and_property_columns_once() {
        let config = MapperConfig::default();
        let types = TypeMappings::default();
        let schema = schema();
        let columns = ColumnSet::extract(&schema, &[], &IndexMap::new());
        let mut ctx = CompilationContext::new(&config, &types, TypeId::of::<Person>(), TypeId::of::<Person>());
        let mapper = StrategyCompiler.compile(&mut ctx, &Person::shape(), &columns).unwrap();
        assert_eq!(columns.mapped_indices(), vec![0, 1, 2]);

        let row = Row::new(
            Arc::new(schema),
            vec![Value::Int(1), Value::Text("Ann".to_string()), Value::Bigint(30), Value::Null],
        );
        let person = unbox::<Person>(mapper.map(&row, None).unwrap()).unwrap();
        assert_eq!(person, Person { id: 1, name: "Ann".to_string(), age: 30 });
    }

    #[test]
    fn scalars_cannot_be_populated() {
        let config = MapperConfig::default();
        let types = TypeMappings::default();
        let schema = schema();
        let columns = ColumnSet::extract(&schema, &[], &IndexMap::new());
        let mut ctx = CompilationContext::new(&config, &types, TypeId::of::<i32>(), TypeId::of::<i32>()).populate(true);
        let err = StrategyCompiler.compile(&mut ctx, &i32::shape(), &columns).err().unwrap();
        assert_eq!(
            err,
            CompileError::MissingCapability { type_name: "i32", capability: Capability::InPlacePopulation }
        );
    }
}
