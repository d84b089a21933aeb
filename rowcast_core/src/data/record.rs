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

use crate::{RowSchema, Value};

static NULL_VALUE: Value = Value::Null;

/// A positioned row handed to a compiled mapper.
pub trait Record {
    fn schema(&self) -> &RowSchema;

    /// Raw value at `index`. Positions past the end read as `Value::Null`.
    fn value(&self, index: usize) -> &Value;

    fn len(&self) -> usize {
        self.schema().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_null(&self, index: usize) -> bool {
        self.value(index).is_null()
    }

    fn value_by_name(&self, name: &str) -> Option<&Value> {
        self.schema().position(name).map(|idx| self.value(idx))
    }
}

/// Borrowed view over a schema and a slice of values.
#[derive(Debug, Clone, Copy)]
pub struct RecordRef<'a> {
    schema: &'a RowSchema,
    values: &'a [Value],
}

impl<'a> RecordRef<'a> {
    pub fn new(schema: &'a RowSchema, values: &'a [Value]) -> Self {
        Self { schema, values }
    }
}

impl<'a> Record for RecordRef<'a> {
    fn schema(&self) -> &RowSchema {
        self.schema
    }

    fn value(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&NULL_VALUE)
    }
}

pub(crate) fn null_value() -> &'static Value {
    &NULL_VALUE
}
