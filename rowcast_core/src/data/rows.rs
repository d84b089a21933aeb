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

use std::slice;
use std::sync::Arc;
use crate::{DataError, Row, RowSchema, Value};

/// A materialized result set: rows sharing one schema.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Rows {
    pub schema: Arc<RowSchema>,
    pub data: Vec<Row>,
}

impl Rows {
    pub fn new(schema: RowSchema) -> Self {
        Rows {
            schema: Arc::new(schema),
            data: Vec::new(),
        }
    }

    pub fn schema(&self) -> &RowSchema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Appends `row`. Its schema is replaced by this result set's schema.
    pub fn push(&mut self, mut row: Row) {
        row.schema = self.schema.clone();
        self.data.push(row)
    }

    /// Appends a row of values in schema order.
    pub fn push_values(&mut self, values: Vec<Value>) {
        self.data.push(Row::new(self.schema.clone(), values))
    }

    pub fn iter(&self) -> slice::Iter<'_, Row> {
        self.data.iter()
    }

    pub fn first(&self) -> Option<&Row> {
        self.data.first()
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.data.get(index)
    }

    /// One JSON object per row, keyed by column name.
    pub fn to_json(&self) -> Result<String, DataError> {
        let objects: Vec<Value> = self.iter().map(Row::as_object).collect();
        serde_json::to_string(&objects).map_err(|err| DataError::SerializeError(err.to_string()))
    }
}

impl<'a> IntoIterator for &'a Rows {
    type Item = &'a Row;
    type IntoIter = slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueKind;

    #[test]
    fn exports_json() {
        let mut rows = Rows::new(RowSchema::default().column("id", ValueKind::I32).column("tag", ValueKind::String));
        rows.push_values(vec![Value::Int(1), Value::from("a")]);
        rows.push_values(vec![Value::Int(2), Value::Null]);
        assert_eq!(rows.to_json().unwrap(), r#"[{"id":1,"tag":"a"},{"id":2,"tag":null}]"#);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn pushed_rows_share_the_schema() {
        let mut rows = Rows::new(RowSchema::from_names(["a"]));
        rows.push(Row::new(Arc::new(RowSchema::default()), vec![Value::Int(1)]));
        assert_eq!(rows.first().map(|row| row.columns()), Some(vec!["a".to_string()]));
        assert_eq!(rows.get(0).map(|row| row.data.clone()), Some(vec![Value::Int(1)]));
    }
}
