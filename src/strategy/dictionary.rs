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
use crate::classify::Classification;
use crate::column::ColumnSet;
use crate::context::CompilationContext;
use crate::errors::{Capability, CompileError};
use crate::program::{ConstructedValue, Op};
use crate::shape::{DictionaryShape, Shape};
use super::{compile_value, member_view, Source};

/// String-keyed dictionary over the whole view (root) or the member's
/// prefix-scoped view. Keys are local column names.
pub(super) fn compile(
    ctx: &mut CompilationContext<'_>,
    shape: &Shape,
    dictionary: &DictionaryShape,
    class: Classification,
    columns: &ColumnSet,
    source: Source<'_>,
) -> Result<Option<ConstructedValue>, CompileError> {
    let populate = ctx.take_populate_root();
    let missing = |capability| CompileError::MissingCapability { type_name: shape.type_name(), capability };
    if populate && class != Classification::ConcreteDictionary {
        return Err(missing(Capability::InPlacePopulation));
    }
    let new = dictionary.new_fn();
    if new.is_none() && !populate {
        return Err(missing(Capability::ParameterlessConstructor));
    }
    let insert = dictionary.insert_fn().ok_or_else(|| missing(Capability::InsertMethod))?;

    let view = match member_view(columns, source) {
        Some(view) => view,
        None => return Ok(None),
    };
    let mut seen = HashSet::new();
    let keys: Vec<(String, usize)> = view
        .unmapped()
        .filter(|column| seen.insert(column.name().to_string()))
        .map(|column| (column.local_name().to_string(), column.index()))
        .collect();

    let value_shape = dictionary.value();
    let target = ctx.slot();
    let dest = ctx.slot();
    let mut value = ConstructedValue::new(dest);
    match new {
        Some(new) if !populate => value.push(Op::NewDictionary { dest: target, new }),
        _ => value.push(Op::Input { dest: target }),
    }
    for (key, index) in keys {
        if let Some(entry) = compile_value(ctx, &value_shape, &view.single(index), Source::Next)? {
            let slot = value.splice(entry);
            value.push(Op::Insert { target, key, value: slot, insert });
        }
    }
    value.push(Op::Finish { dest, src: target, finish: dictionary.finish_fn() });
    Ok(Some(value))
}
