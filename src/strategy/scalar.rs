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
use rowcast_core::ValueKind;
use crate::column::{ColumnSet, ViewColumn};
use crate::context::CompilationContext;
use crate::convert::{ScalarConverter, ScalarRule};
use crate::program::{ConstructedValue, Op};
use crate::shape::{ScalarShape, Shape};
use super::{Member, Source};

pub(super) fn compile(
    ctx: &mut CompilationContext<'_>,
    shape: &Shape,
    scalar: &ScalarShape,
    columns: &ColumnSet,
    source: Source<'_>,
) -> Option<ConstructedValue> {
    let column = match source {
        Source::Root | Source::Next => columns.unmapped().next(),
        Source::Member(member) => resolve_member(columns, &member),
    }?;
    let member = ctx.member_path(shape.short_name());
    Some(emit(ctx, Some(scalar), column, member))
}

/// Exact name, then the alias, then (if the member accepts it) the first
/// unnamed column.
pub(super) fn resolve_member<'c>(columns: &'c ColumnSet, member: &Member<'_>) -> Option<ViewColumn<'c>> {
    columns
        .find(member.name)
        .or_else(|| member.alias.and_then(|alias| columns.find(alias)))
        .or_else(|| if member.unnamed { columns.unnamed().into_iter().next() } else { None })
}

/// Reads `column` into a fresh slot; `target` is `None` for the untyped
/// value.
pub(super) fn emit(
    ctx: &mut CompilationContext<'_>,
    target: Option<&ScalarShape>,
    column: ViewColumn<'_>,
    member: String,
) -> ConstructedValue {
    let target_kind = target.map(ScalarShape::kind).unwrap_or(ValueKind::Any);
    let rule = ScalarRule::select(column.kind(), target_kind);
    if rule == ScalarRule::Default {
        debug!(
            "[Rowcast]: No conversion from {} to {} for column {}, {} gets its default",
            column.kind(),
            target_kind,
            column.info().original_name(),
            member
        );
    }
    column.info().mark_mapped();
    let dest = ctx.slot();
    let converter = ScalarConverter::new(rule, target.cloned(), member, column.info().original_name().to_string());
    ConstructedValue::single(Op::Scalar { dest, column: column.index(), converter }, dest)
}
