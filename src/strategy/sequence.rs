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

use std::borrow::Cow;
use crate::classify::{classify, Classification};
use crate::column::ColumnSet;
use crate::context::CompilationContext;
use crate::errors::{Capability, CompileError};
use crate::program::{ConstructedValue, Op};
use crate::shape::{SequenceShape, Shape};
use super::{compile_value, member_view, Source};

pub(super) fn compile(
    ctx: &mut CompilationContext<'_>,
    shape: &Shape,
    sequence: &SequenceShape,
    class: Classification,
    columns: &ColumnSet,
    source: Source<'_>,
) -> Result<Option<ConstructedValue>, CompileError> {
    let element = sequence.element();
    let element_class = classify(&element);
    if !matches!(element_class, Classification::Scalar | Classification::Any | Classification::CustomObject) {
        return Err(CompileError::UnsupportedElement {
            type_name: shape.type_name(),
            element: element.type_name(),
        });
    }

    let populate = ctx.take_populate_root();
    let missing = |capability| CompileError::MissingCapability { type_name: shape.type_name(), capability };
    if populate && class != Classification::ConcreteCollection {
        return Err(missing(Capability::InPlacePopulation));
    }
    let new = match (class, sequence.new_fn()) {
        (_, Some(new)) => Some(new),
        (_, None) if populate => None,
        (Classification::Array, None) => return Err(missing(Capability::ElementCountConstructor)),
        (_, None) => return Err(missing(Capability::ParameterlessConstructor)),
    };
    let add = sequence.add_fn().ok_or_else(|| missing(Capability::AddMethod))?;

    let elements = if element_class == Classification::Scalar {
        match scalar_columns(columns, source) {
            Some((view, indices)) => {
                let mut elements = Vec::with_capacity(indices.len());
                for index in indices {
                    if let Some(value) = compile_value(ctx, &element, &view.single(index), Source::Next)? {
                        elements.push(value);
                    }
                }
                elements
            }
            None => return Ok(None),
        }
    } else {
        match member_view(columns, source) {
            Some(view) => repeated_elements(ctx, &element, &view)?,
            None => return Ok(None),
        }
    };

    let target = ctx.slot();
    let dest = ctx.slot();
    let mut value = ConstructedValue::new(dest);
    match new {
        Some(new) if !populate => value.push(Op::NewSequence { dest: target, capacity: elements.len(), new }),
        _ => value.push(Op::Input { dest: target }),
    }
    for element in elements {
        let slot = value.splice(element);
        value.push(Op::Push { target, value: slot, add });
    }
    value.push(Op::Finish { dest, src: target, finish: sequence.finish_fn() });
    Ok(Some(value))
}

/// Columns feeding a sequence of scalars: every remaining column at the root;
/// for a member its exact-name duplicates, then its alias, then the unnamed
/// bucket, then every column under its prefix.
fn scalar_columns<'c>(columns: &'c ColumnSet, source: Source<'_>) -> Option<(Cow<'c, ColumnSet>, Vec<usize>)> {
    let member = match source {
        Source::Root | Source::Next => {
            let indices = columns.unmapped().map(|c| c.index()).collect();
            return Some((Cow::Borrowed(columns), indices));
        }
        Source::Member(member) => member,
    };
    let indices = |found: Vec<crate::column::ViewColumn<'_>>| found.iter().map(|c| c.index()).collect::<Vec<_>>();
    let mut found = indices(columns.find_all(member.name));
    if found.is_empty() {
        if let Some(alias) = member.alias {
            found = indices(columns.find_all(alias));
        }
    }
    if found.is_empty() && member.unnamed {
        found = indices(columns.unnamed());
    }
    if !found.is_empty() {
        return Some((Cow::Borrowed(columns), found));
    }
    let scoped = columns.scoped(member.name, member.separator);
    let found: Vec<usize> = scoped.unmapped().map(|c| c.index()).collect();
    if found.is_empty() {
        None
    } else {
        Some((Cow::Owned(scoped), found))
    }
}

/// Compiles `element` against the same view until a pass consumes nothing.
fn repeated_elements(
    ctx: &mut CompilationContext<'_>,
    element: &Shape,
    view: &ColumnSet,
) -> Result<Vec<ConstructedValue>, CompileError> {
    let mut elements = Vec::new();
    while view.has_unmapped_columns() {
        let before = view.mapped_indices().len();
        let value = match compile_value(ctx, element, view, Source::Root) {
            Ok(value) => value,
            // A later pass that fits no constructor has run out of columns.
            Err(CompileError::NoSuitableConstructor { .. }) if !elements.is_empty() => break,
            Err(err) => return Err(err),
        };
        match value {
            Some(value) if view.mapped_indices().len() > before => elements.push(value),
            _ => break,
        }
    }
    Ok(elements)
}
