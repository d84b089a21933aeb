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

use std::any::TypeId;
use std::sync::Arc;
use crate::compiler::RecordCompiler;
use crate::config::MapperConfig;
use crate::errors::CompileError;
use crate::mapping::{Creation, TypeConfig, TypeMappings};
use crate::program::{Label, Slot};
use crate::shape::Shape;

/// State of one compile pass: register and label allocation, per-type
/// options, nesting depth and the member path used in error messages.
pub struct CompilationContext<'a> {
    config: &'a MapperConfig,
    types: &'a TypeMappings,
    requested: TypeId,
    specific: TypeId,
    populate_root: bool,
    direct: Option<TypeId>,
    cacheable: bool,
    slots: usize,
    labels: usize,
    depth: usize,
    path: Vec<String>,
}

impl<'a> CompilationContext<'a> {
    pub(crate) fn new(config: &'a MapperConfig, types: &'a TypeMappings, requested: TypeId, specific: TypeId) -> Self {
        CompilationContext {
            config,
            types,
            requested,
            specific,
            populate_root: false,
            direct: None,
            cacheable: true,
            slots: 0,
            labels: 0,
            depth: 0,
            path: Vec::new(),
        }
    }

    pub(crate) fn populate(mut self, populate_root: bool) -> Self {
        self.populate_root = populate_root;
        self
    }

    pub fn config(&self) -> &MapperConfig {
        self.config
    }

    pub fn requested_type(&self) -> TypeId {
        self.requested
    }

    pub fn specific_type(&self) -> TypeId {
        self.specific
    }

    pub fn slot(&mut self) -> Slot {
        self.slots += 1;
        Slot(self.slots - 1)
    }

    pub fn label(&mut self) -> Label {
        self.labels += 1;
        Label(self.labels - 1)
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.slots
    }

    pub(crate) fn label_count(&self) -> usize {
        self.labels
    }

    /// Starts a fresh register file, returning the previous counters.
    pub(crate) fn reset_registers(&mut self) -> (usize, usize) {
        let saved = (self.slots, self.labels);
        self.slots = 0;
        self.labels = 0;
        saved
    }

    pub(crate) fn restore_registers(&mut self, saved: (usize, usize)) {
        self.slots = saved.0;
        self.labels = saved.1;
    }

    pub fn type_config(&self, type_id: TypeId) -> Option<Arc<TypeConfig>> {
        self.types.get(&type_id).map(|entry| entry.value().clone())
    }

    pub(crate) fn creation(&self, type_id: TypeId) -> Option<Creation> {
        self.type_config(type_id).and_then(|config| config.creation.clone())
    }

    /// Compiler override for a nested `shape`. The shape a compiler was
    /// invoked for directly is built by the strategies instead.
    pub(crate) fn compiler_override(&mut self, shape: &Shape) -> Option<Arc<dyn RecordCompiler>> {
        if self.direct == Some(shape.type_id()) {
            self.direct = None;
            return None;
        }
        self.type_config(shape.type_id()).and_then(|config| config.compiler.clone())
    }

    pub(crate) fn set_direct(&mut self, type_id: TypeId) {
        self.direct = Some(type_id);
    }

    /// Child separator used by members of `type_id`.
    pub fn separator_for(&self, type_id: TypeId) -> String {
        self.type_config(type_id)
            .and_then(|config| config.separator.clone())
            .unwrap_or_else(|| self.config.separator().to_string())
    }

    /// True once, for the root value of an in-place population.
    pub(crate) fn take_populate_root(&mut self) -> bool {
        self.depth == 1 && std::mem::take(&mut self.populate_root)
    }

    pub(crate) fn is_populating(&self) -> bool {
        self.populate_root
    }

    pub fn mark_uncacheable(&mut self) {
        self.cacheable = false;
    }

    pub fn is_cacheable(&self) -> bool {
        self.cacheable
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn enter(&mut self, shape: &Shape, member: Option<&str>) -> Result<(), CompileError> {
        if self.depth >= self.config.max_depth() {
            return Err(CompileError::RecursionLimit {
                type_name: shape.type_name(),
                limit: self.config.max_depth(),
            });
        }
        self.depth += 1;
        if let Some(member) = member {
            self.path.push(member.to_string());
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self, member: Option<&str>) {
        self.depth = self.depth.saturating_sub(1);
        if member.is_some() {
            self.path.pop();
        }
    }

    /// Dotted member path for diagnostics, e.g. `address.city`.
    pub fn member_path(&self, root: &str) -> String {
        if self.path.is_empty() {
            root.to_string()
        } else {
            self.path.join(".")
        }
    }
}
