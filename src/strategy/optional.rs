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

use std::collections::HashSet;
use std::sync::Arc;
use crate::column::ColumnSet;
use crate::context::CompilationContext;
use crate::errors::{Capability, CompileError};
use crate::program::{ConstructedValue, Op};
use crate::shape::{OptionalShape, Shape};
use super::{route, Source};

/// `Some(inner)` unless every column the inner value consumed is NULL.
pub(super) fn compile(
    ctx: &mut CompilationContext<'_>,
    shape: &Shape,
    optional: &OptionalShape,
    columns: &ColumnSet,
    source: Source<'_>,
) -> Result<Option<ConstructedValue>, CompileError> {
    if ctx.take_populate_root() {
        return Err(CompileError::MissingCapability {
            type_name: shape.type_name(),
            capability: Capability::InPlacePopulation,
        });
    }
    let before: HashSet<usize> = columns.mapped_indices().into_iter().collect();
    let inner = match route(ctx, optional.inner(), columns, source)? {
        Some(inner) => inner,
        None => return Ok(None),
    };
    let consumed: Vec<usize> = columns.mapped_indices().into_iter().filter(|index| !before.contains(index)).collect();

    let dest = ctx.slot();
    if consumed.is_empty() {
        let mut value = ConstructedValue::new(dest);
        let src = value.splice(inner);
        value.push(Op::Wrap { dest, src, wrap: optional.some_fn() });
        return Ok(Some(value));
    }
    let when_null = ctx.label();
    let end = ctx.label();
    let none = optional.none_fn();
    let mut value = ConstructedValue::new(dest);
    value.push(Op::JumpIfAllNull { columns: consumed, target: when_null });
    let src = value.splice(inner);
    value.push(Op::Wrap { dest, src, wrap: optional.some_fn() });
    value.push(Op::Jump { target: end });
    value.push(Op::Label(when_null));
    value.push(Op::Default { dest, make: Arc::new(move || none()) });
    value.push(Op::Label(end));
    Ok(Some(value))
}
