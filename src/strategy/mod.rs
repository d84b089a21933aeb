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

//! Strategy dispatch. Every strategy that needs a child value re-enters
//! [`compile_value`] with the child's shape.

use std::borrow::Cow;
use std::sync::Arc;
use tracing::trace;
use crate::classify::{classify, Classification};
use crate::column::ColumnSet;
use crate::context::CompilationContext;
use crate::errors::{Capability, CompileError};
use crate::mapping::Creation;
use crate::program::{ConstructedValue, Op, Slot};
use crate::shape::{Shape, ShapeKind};

mod any;
mod dictionary;
mod object;
mod optional;
mod scalar;
mod sequence;
mod tuple;

/// A named member binding: constructor parameter or property.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Member<'m> {
    pub name: &'m str,
    pub alias: Option<&'m str>,
    pub unnamed: bool,
    /// Separator of the declaring type, used to scope nested children.
    pub separator: &'m str,
}

impl<'m> Member<'m> {
    pub fn named(name: &'m str, separator: &'m str) -> Member<'m> {
        Member { name, alias: None, unnamed: false, separator }
    }
}

/// Where a value's columns come from.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Source<'m> {
    /// The whole request: the value may take every remaining column.
    Root,
    /// A positional slot (tuple item, element, dictionary value): scalars
    /// take the next unmapped column.
    Next,
    Member(Member<'m>),
}

impl<'m> Source<'m> {
    fn member_name(&self) -> Option<&'m str> {
        match self {
            Source::Member(member) => Some(member.name),
            _ => None,
        }
    }
}

pub(crate) fn compile_value(
    ctx: &mut CompilationContext<'_>,
    shape: &Shape,
    columns: &ColumnSet,
    source: Source<'_>,
) -> Result<Option<ConstructedValue>, CompileError> {
    let member = source.member_name();
    ctx.enter(shape, member)?;
    let result = route(ctx, shape, columns, source);
    ctx.leave(member);
    result
}

fn route(
    ctx: &mut CompilationContext<'_>,
    shape: &Shape,
    columns: &ColumnSet,
    source: Source<'_>,
) -> Result<Option<ConstructedValue>, CompileError> {
    if let Some(Creation::Map(map)) = ctx.creation(shape.type_id()) {
        trace!("[Rowcast]: {} uses a map function", shape.type_name());
        ctx.mark_uncacheable();
        let dest = ctx.slot();
        return Ok(Some(ConstructedValue::single(Op::Custom { dest, map }, dest)));
    }
    if let Some(compiler) = ctx.compiler_override(shape) {
        trace!("[Rowcast]: {} uses a compiler override", shape.type_name());
        let view = match override_view(shape, columns, source) {
            Some(view) => view,
            None => return Ok(None),
        };
        let mapper = compiler.compile(ctx, shape, &view)?;
        let dest = ctx.slot();
        let map = Arc::new(move |record: &dyn rowcast_core::Record| mapper.map(record, None));
        return Ok(Some(ConstructedValue::single(Op::Custom { dest, map }, dest)));
    }

    let class = classify(shape);
    trace!("[Rowcast]: {} routed to the {} strategy", shape.type_name(), class);
    match (class, shape.kind()) {
        (Classification::Any, _) => Ok(any::compile(ctx, shape, columns, source)),
        (Classification::Scalar, ShapeKind::Scalar(scalar)) => Ok(scalar::compile(ctx, shape, scalar, columns, source)),
        (Classification::Optional, ShapeKind::Optional(optional)) => optional::compile(ctx, shape, optional, columns, source),
        (_, ShapeKind::Sequence(sequence)) if class.is_sequence() => sequence::compile(ctx, shape, sequence, class, columns, source),
        (_, ShapeKind::Dictionary(dictionary)) if class.is_dictionary() => {
            dictionary::compile(ctx, shape, dictionary, class, columns, source)
        }
        (Classification::Tuple(_), ShapeKind::Tuple(tuple)) => tuple::compile(ctx, tuple, columns, source),
        (Classification::CustomObject, ShapeKind::Object(object)) => object::compile(ctx, shape, object, columns, source),
        _ => Err(CompileError::UnmappableType { type_name: shape.type_name() }),
    }
}

/// View handed to a nested compiler override.
fn override_view<'c>(shape: &Shape, columns: &'c ColumnSet, source: Source<'_>) -> Option<Cow<'c, ColumnSet>> {
    match (source, classify(shape)) {
        (Source::Member(member), Classification::Scalar | Classification::Any) => {
            scalar::resolve_member(columns, &member).map(|column| Cow::Owned(columns.single(column.index())))
        }
        _ => member_view(columns, source),
    }
}

/// Columns available to a structured value: the whole view for positional
/// sources, the member's prefix-scoped view (then its alias) for members.
/// `None` when a member has nothing left to consume.
pub(crate) fn member_view<'c>(columns: &'c ColumnSet, source: Source<'_>) -> Option<Cow<'c, ColumnSet>> {
    match source {
        Source::Root | Source::Next => Some(Cow::Borrowed(columns)),
        Source::Member(member) => {
            let view = columns.scoped(member.name, member.separator);
            if view.has_unmapped_columns() {
                return Some(Cow::Owned(view));
            }
            member
                .alias
                .map(|alias| columns.scoped(alias, member.separator))
                .filter(ColumnSet::has_unmapped_columns)
                .map(Cow::Owned)
        }
    }
}

/// Default value of `shape` for a slot that matched no column.
pub(crate) fn default_value(ctx: &mut CompilationContext<'_>, shape: &Shape) -> Result<ConstructedValue, CompileError> {
    let make = match shape.kind() {
        ShapeKind::Scalar(scalar) => scalar.default_fn(),
        _ => shape.default_fn().cloned().ok_or(CompileError::MissingCapability {
            type_name: shape.type_name(),
            capability: Capability::ParameterlessConstructor,
        })?,
    };
    let dest: Slot = ctx.slot();
    Ok(ConstructedValue::single(Op::Default { dest, make }, dest))
}
