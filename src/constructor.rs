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

//! Constructor validation and scoring.

use tracing::{trace, warn};
use crate::classify::{classify, Classification};
use crate::column::ColumnSet;
use crate::errors::CompileError;
use crate::shape::{Constructor, ObjectShape, Shape};

/// Checks that a caller-chosen constructor can build `shape`.
pub fn validate(constructor: &Constructor, shape: &Shape) -> Result<(), CompileError> {
    let reason = if !constructor.is_public() {
        Some("constructor is not public")
    } else if constructor.is_static() {
        Some("constructor is an associated function")
    } else if constructor.declaring_type() != shape.type_id() {
        Some("constructor is declared by another type")
    } else {
        None
    };
    match reason {
        Some(reason) => {
            warn!("[Rowcast]: Rejected constructor {} for {}: {}", constructor.signature(), shape.type_name(), reason);
            Err(CompileError::NonInvokableConstructor {
                type_name: shape.type_name(),
                constructor: constructor.signature().to_string(),
                reason,
            })
        }
        None => Ok(()),
    }
}

/// Score of `constructor` against the unmapped columns: -1 when any
/// parameter lacks a column or is not a scalar, else the parameter count.
pub fn score(constructor: &Constructor, columns: &ColumnSet) -> i32 {
    let mut score = 0;
    for param in constructor.params() {
        if !columns.contains_unmapped(param.name()) || classify(&param.shape()) != Classification::Scalar {
            return -1;
        }
        score += 1;
    }
    score
}

/// Picks the best-scoring public constructor; ties go to the one declared
/// first.
pub fn resolve(object: &ObjectShape, shape: &Shape, columns: &ColumnSet) -> Result<Constructor, CompileError> {
    let mut best: Option<(&Constructor, i32)> = None;
    for constructor in object.constructors().iter().filter(|c| c.is_public() && !c.is_static()) {
        let score = score(constructor, columns);
        trace!("[Rowcast]: Constructor {} scored {}", constructor.signature(), score);
        let better = match best {
            Some((_, top)) => score > top,
            None => true,
        };
        if score >= 0 && better {
            best = Some((constructor, score));
        }
    }
    best.map(|(constructor, _)| constructor.clone()).ok_or_else(|| CompileError::NoSuitableConstructor {
        type_name: shape.type_name(),
        columns: columns.describe_unmapped(),
    })
}
