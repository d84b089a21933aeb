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

//! Per-row subclass dispatch.

use std::sync::Arc;
use rowcast_core::Record;
use crate::errors::MapError;
use crate::mapping::{IntoBaseFn, PredicateFn};
use crate::program::ErasedMapper;
use crate::shape::{Boxed, DefaultFn};

pub(crate) struct CompiledBranch {
    pub predicate: Option<PredicateFn>,
    pub mapper: Arc<dyn ErasedMapper>,
    pub into: IntoBaseFn,
}

impl CompiledBranch {
    fn map(&self, record: &dyn Record) -> Result<Boxed, MapError> {
        (self.into)(self.mapper.map(record, None)?)
    }
}

/// Evaluates branch predicates in registration order and maps the row with
/// the first match; falls back to `otherwise`, then the base default.
pub(crate) struct SubclassMapper {
    type_name: &'static str,
    branches: Vec<CompiledBranch>,
    otherwise: Option<CompiledBranch>,
    default: Option<DefaultFn>,
}

impl SubclassMapper {
    pub fn new(
        type_name: &'static str,
        branches: Vec<CompiledBranch>,
        otherwise: Option<CompiledBranch>,
        default: Option<DefaultFn>,
    ) -> SubclassMapper {
        SubclassMapper { type_name, branches, otherwise, default }
    }
}

impl ErasedMapper for SubclassMapper {
    fn map(&self, record: &dyn Record, _input: Option<Boxed>) -> Result<Boxed, MapError> {
        let matched = self
            .branches
            .iter()
            .find(|branch| branch.predicate.as_ref().is_some_and(|predicate| predicate(record)));
        if let Some(branch) = matched.or(self.otherwise.as_ref()) {
            return branch.map(record);
        }
        match &self.default {
            Some(make) => Ok(make()),
            None => Err(MapError::NoMatchingBranch { type_name: self.type_name }),
        }
    }
}
