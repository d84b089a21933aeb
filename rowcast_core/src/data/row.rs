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

use std::sync::Arc;
use crate::data::record::null_value;
use crate::{ColumnIndex, DataError, FromValue, Record, RowSchema, Value};

#[derive(Debug, PartialEq, Clone)]
pub struct Row {
    pub schema: Arc<RowSchema>,
    pub data: Vec<Value>,
}

impl Row {

    pub fn new(schema: Arc<RowSchema>, data: Vec<Value>) -> Self {
        Self { schema, data }
    }

    /// Returns length of a row.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns column names of this row.
    pub fn columns(&self) -> Vec<String> {
        self.schema.names()
    }

    pub fn iter(&self) -> RowIter<'_> {
        RowIter {
            row: self,
            index: 0,
        }
    }

    /// Converts the value at `index` to `T`.
    pub fn get<T, I>(&self, index: I) -> Result<T, DataError>
    where
        T: FromValue,
        I: ColumnIndex,
    {
        let idx = index
            .idx(&self.schema)
            .ok_or_else(|| DataError::NoSuchFieldError(index.describe()))?;
        self.data
            .get(idx)
            .ok_or(DataError::IndexOutOfBounds(idx, self.data.len()))
            .and_then(T::from_value_opt)
    }

    /// Takes the value at `index`, leaving `Value::Null` behind.
    pub fn take<I: ColumnIndex>(&mut self, index: I) -> Option<Value> {
        index
            .idx(&self.schema)
            .and_then(|idx| self.data.get_mut(idx))
            .map(Value::take)
    }

    pub fn get_value(&self, index: usize) -> Option<&Value> {
        self.data.get(index)
    }

    pub fn get_value_by_column(&self, column: &str) -> Option<&Value> {
        self.schema.position(column).and_then(|idx| self.data.get(idx))
    }

    #[doc(hidden)]
    pub fn place(&mut self, index: usize, value: Value) {
        if let Some(slot) = self.data.get_mut(index) {
            *slot = value;
        }
    }

    pub fn into_data(self) -> Vec<Value> {
        self.data
    }

    pub fn as_object(&self) -> Value {
        let mut object = Value::new_object();
        for (column, value) in self.iter() {
            object.insert_obj_value(column, value);
        }
        object
    }
}

impl Record for Row {
    fn schema(&self) -> &RowSchema {
        &self.schema
    }

    fn value(&self, index: usize) -> &Value {
        self.data.get(index).unwrap_or(null_value())
    }
}

pub struct RowIter<'a> {
    row: &'a Row,
    index: usize,
}

impl<'a> Iterator for RowIter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let column = self.row.schema.get(self.index)?;
        let value = self.row.data.get(self.index).unwrap_or(null_value());
        self.index += 1;
        Some((column.name(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.row.schema.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for RowIter<'a> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueKind;

    fn row() -> Row {
        let schema = RowSchema::default().column("id", ValueKind::I32).column("name", ValueKind::String);
        Row::new(Arc::new(schema), vec![Value::Int(3), Value::from("ann")])
    }

    #[test]
    fn reads_by_index_and_name() {
        let row = row();
        assert_eq!(row.get::<i64, _>(0).unwrap(), 3);
        assert_eq!(row.get::<String, _>("NAME").unwrap(), "ann");
        assert!(row.get::<String, _>("missing").is_err());
        assert!(Record::value(&row, 9).is_null());
    }

    #[test]
    fn exports_object() {
        let object = row().as_object();
        assert_eq!(object.get_obj_value("name"), Some(&Value::from("ann")));
        assert_eq!(object.get_obj_len(), 2);
    }
}
