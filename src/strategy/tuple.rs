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

use crate::column::ColumnSet;
use crate::context::CompilationContext;
use crate::errors::CompileError;
use crate::program::{ConstructedValue, Op};
use crate::shape::TupleShape;
use super::{compile_value, default_value, member_view, Source};

/// Positions take the view's columns in order; a position left without a
/// column gets its default.
pub(super) fn compile(
    ctx: &mut CompilationContext<'_>,
    tuple: &TupleShape,
    columns: &ColumnSet,
    source: Source<'_>,
) -> Result<Option<ConstructedValue>, CompileError> {
    let view = match member_view(columns, source) {
        Some(view) => view,
        None => return Ok(None),
    };
    let dest = ctx.slot();
    let mut value = ConstructedValue::new(dest);
    let mut parts = Vec::with_capacity(tuple.arity());
    for element in tuple.elements() {
        let part = match compile_value(ctx, &element, &view, Source::Next)? {
            Some(part) => part,
            None => default_value(ctx, &element)?,
        };
        parts.push(value.splice(part));
    }
    value.push(Op::Tuple { dest, parts, build: tuple.build_fn() });
    Ok(Some(value))
}
