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
use crate::column::ColumnSet;
use crate::context::CompilationContext;
use crate::program::{ConstructedValue, Op};
use crate::shape::Shape;
use super::{scalar, Source};

/// The untyped value. At the root it is an object of every remaining column;
/// as a member it is the matching column, or a list when several match.
pub(super) fn compile(
    ctx: &mut CompilationContext<'_>,
    shape: &Shape,
    columns: &ColumnSet,
    source: Source<'_>,
) -> Option<ConstructedValue> {
    match source {
        Source::Root => Some(row_object(ctx, columns)),
        Source::Next => {
            let column = columns.unmapped().next()?;
            let member = ctx.member_path(shape.short_name());
            Some(scalar::emit(ctx, None, column, member))
        }
        Source::Member(member) => {
            let mut matches = columns.find_all(member.name);
            if matches.is_empty() {
                if let Some(alias) = member.alias {
                    matches = columns.find_all(alias);
                }
            }
            if matches.is_empty() && member.unnamed {
                matches = columns.unnamed();
            }
            match matches.len() {
                0 => None,
                1 => {
                    let path = ctx.member_path(member.name);
                    Some(scalar::emit(ctx, None, matches[0], path))
                }
                _ => {
                    let dest = ctx.slot();
                    let indices = matches
                        .iter()
                        .map(|column| {
                            column.info().mark_mapped();
                            column.index()
                        })
                        .collect();
                    Some(ConstructedValue::single(Op::ValueList { dest, columns: indices }, dest))
                }
            }
        }
    }
}

/// Object keyed by local column name over the first unmapped occurrence of
/// each name.
pub(super) fn row_object(ctx: &mut CompilationContext<'_>, columns: &ColumnSet) -> ConstructedValue {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for column in columns.unmapped() {
        if seen.insert(column.name()) {
            column.info().mark_mapped();
            entries.push((column.local_name().to_string(), column.index()));
        }
    }
    let dest = ctx.slot();
    ConstructedValue::single(Op::RowObject { dest, columns: entries }, dest)
}
