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

use crate::{SqlType, ValueKind};

/// One column of a result set: its name as reported by the provider, its
/// declared kind and the provider's type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnMeta {
    name: String,
    kind: ValueKind,
    provider_type: String,
}

impl ColumnMeta {
    pub fn new<N: Into<String>>(name: N, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            provider_type: kind.name().to_string(),
        }
    }

    /// Derives the declared kind from a provider type name such as
    /// `VARCHAR(32)`. Unknown names declare `ValueKind::Any`.
    pub fn with_provider_type<N: Into<String>>(name: N, provider_type: &str) -> Self {
        Self {
            name: name.into(),
            kind: SqlType::from_str(provider_type).value_kind(),
            provider_type: provider_type.to_string(),
        }
    }

    pub fn set_provider_type(mut self, provider_type: &str) -> Self {
        self.provider_type = provider_type.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn provider_type(&self) -> &str {
        &self.provider_type
    }
}

/// Ordered column metadata of one result set. Names may repeat and may be
/// empty for unnamed columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RowSchema {
    columns: Vec<ColumnMeta>,
}

impl RowSchema {
    pub fn new(columns: Vec<ColumnMeta>) -> Self {
        Self { columns }
    }

    /// Schema whose columns carry no declared type.
    pub fn from_names<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        names.into_iter().map(|name| ColumnMeta::new(name, ValueKind::Any)).collect()
    }

    pub fn column<N: Into<String>>(mut self, name: N, kind: ValueKind) -> Self {
        self.columns.push(ColumnMeta::new(name, kind));
        self
    }

    pub fn typed_column<N: Into<String>>(mut self, name: N, provider_type: &str) -> Self {
        self.columns.push(ColumnMeta::with_provider_type(name, provider_type));
        self
    }

    pub fn push(&mut self, column: ColumnMeta) {
        self.columns.push(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    pub fn get(&self, index: usize) -> Option<&ColumnMeta> {
        self.columns.get(index)
    }

    /// Index of the first column called `name`, preferring an exact match
    /// over a case-insensitive one.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .or_else(|| self.columns.iter().position(|c| c.name.eq_ignore_ascii_case(name)))
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Ordered (name, declared kind) pairs; two schemas with the same
    /// signature compile to the same mapper.
    pub fn signature(&self) -> Vec<(String, ValueKind)> {
        self.columns.iter().map(|c| (c.name.clone(), c.kind)).collect()
    }
}

impl FromIterator<ColumnMeta> for RowSchema {
    fn from_iter<T: IntoIterator<Item = ColumnMeta>>(iter: T) -> Self {
        RowSchema { columns: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_types_declare_kinds() {
        let schema = RowSchema::default()
            .typed_column("Id", "INT")
            .typed_column("Name", "varchar(20)")
            .typed_column("Shape", "geometry");
        let kinds: Vec<ValueKind> = schema.columns().iter().map(ColumnMeta::kind).collect();
        assert_eq!(kinds, vec![ValueKind::I32, ValueKind::String, ValueKind::Any]);
        assert_eq!(schema.columns()[1].provider_type(), "varchar(20)");
    }

    #[test]
    fn finds_columns_by_name() {
        let schema = RowSchema::from_names(["id", "Name", "name"]);
        assert_eq!(schema.position("name"), Some(2));
        assert_eq!(schema.position("NAME"), Some(1));
        assert_eq!(schema.position("other"), None);
    }
}
