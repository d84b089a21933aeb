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

use tracing::debug;
use crate::column::ColumnSet;
use crate::constructor;
use crate::context::CompilationContext;
use crate::errors::CompileError;
use crate::mapping::Creation;
use crate::program::{ConstructedValue, Op};
use crate::shape::{Constructor, ObjectShape, Shape};
use super::{compile_value, default_value, member_view, Member, Source};

/// Builds a user-defined type: create the instance (input, factory or a
/// constructor), then assign every property not already passed to the
/// constructor.
pub(super) fn compile(
    ctx: &mut CompilationContext<'_>,
    shape: &Shape,
    object: &ObjectShape,
    columns: &ColumnSet,
    source: Source<'_>,
) -> Result<Option<ConstructedValue>, CompileError> {
    let view = match member_view(columns, source) {
        Some(view) => view,
        None => return Ok(None),
    };
    let populate = ctx.take_populate_root();
    let separator = ctx.separator_for(shape.type_id());
    let dest = ctx.slot();
    let mut value = ConstructedValue::new(dest);
    let mut params: Vec<String> = Vec::new();

    if populate {
        value.push(Op::Input { dest });
    } else {
        let chosen = match ctx.creation(shape.type_id()) {
            Some(Creation::Factory(make)) => {
                ctx.mark_uncacheable();
                value.push(Op::Factory { dest, type_name: shape.type_name(), make });
                None
            }
            Some(Creation::Constructor(chosen)) => {
                constructor::validate(&chosen, shape)?;
                Some(chosen)
            }
            Some(Creation::Finder(finder)) => match finder(object, &*view) {
                Some(chosen) => {
                    constructor::validate(&chosen, shape)?;
                    Some(chosen)
                }
                None => Some(constructor::resolve(object, shape, &view)?),
            },
            _ => Some(constructor::resolve(object, shape, &view)?),
        };
        if let Some(chosen) = chosen {
            debug!("[Rowcast]: {} built with {}", shape.type_name(), chosen.signature());
            params = chosen.params().iter().map(|p| p.name().to_lowercase()).collect();
            construct(ctx, &mut value, chosen, &view, &separator)?;
        }
    }

    for property in object.properties() {
        if params.iter().any(|p| *p == property.name().to_lowercase()) {
            continue;
        }
        let member = Member {
            name: property.name(),
            alias: property.alias_name(),
            unnamed: property.accepts_unnamed(),
            separator: &separator,
        };
        if let Some(assigned) = compile_value(ctx, &property.shape(), &view, Source::Member(member))? {
            let slot = value.splice(assigned);
            value.push(Op::Assign { target: dest, value: slot, set: property.setter() });
        }
    }
    Ok(Some(value))
}

fn construct(
    ctx: &mut CompilationContext<'_>,
    value: &mut ConstructedValue,
    chosen: Constructor,
    view: &ColumnSet,
    separator: &str,
) -> Result<(), CompileError> {
    let mut args = Vec::with_capacity(chosen.arity());
    for param in chosen.params() {
        let shape = param.shape();
        let arg = match compile_value(ctx, &shape, view, Source::Member(Member::named(param.name(), separator)))? {
            Some(arg) => arg,
            None => default_value(ctx, &shape)?,
        };
        args.push(value.splice(arg));
    }
    value.push(Op::Construct { dest: value.value, constructor: chosen, args });
    Ok(())
}
