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

//! Canonical, prefix-scoped view of a result set's columns.
//!
//! A `ColumnSet` is created once per compile from the row schema. Sub-views
//! made with [`ColumnSet::scoped`] or [`ColumnSet::single`] share the mapped
//! flags of the root, so a column consumed anywhere in the tree is consumed
//! everywhere.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use indexmap::IndexMap;
use rowcast_core::{RowSchema, ValueKind};

/// Metadata of one result column plus its consumption flag.
pub struct ColumnInfo {
    index: usize,
    name: String,
    original_name: String,
    kind: ValueKind,
    provider_type: String,
    mapped: Cell<bool>,
}

impl ColumnInfo {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Lower-cased name after ignore-prefix stripping and renames.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name exactly as reported by the provider.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn provider_type(&self) -> &str {
        &self.provider_type
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped.get()
    }

    pub(crate) fn mark_mapped(&self) {
        self.mapped.set(true)
    }
}

impl fmt::Debug for ColumnInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnInfo")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("mapped", &self.mapped.get())
            .finish()
    }
}

#[derive(Debug, Clone)]
struct Entry {
    index: usize,
    name: String,
    local: String,
}

/// A column seen through one view: the shared info plus the view-local name.
#[derive(Debug, Clone, Copy)]
pub struct ViewColumn<'a> {
    info: &'a ColumnInfo,
    name: &'a str,
    local: &'a str,
}

impl<'a> ViewColumn<'a> {
    pub fn info(&self) -> &'a ColumnInfo {
        self.info
    }

    pub fn index(&self) -> usize {
        self.info.index
    }

    /// Canonical name inside this view, with any scope prefix removed.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Case-preserving name inside this view.
    pub fn local_name(&self) -> &'a str {
        self.local
    }

    pub fn kind(&self) -> ValueKind {
        self.info.kind
    }

    pub fn is_mapped(&self) -> bool {
        self.info.is_mapped()
    }
}

#[derive(Debug, Clone)]
pub struct ColumnSet {
    table: Rc<[ColumnInfo]>,
    entries: Vec<Entry>,
    by_name: IndexMap<String, Vec<usize>>,
    path: String,
}

impl ColumnSet {
    /// Builds the root view of `schema`.
    ///
    /// For each column the longest matching entry of `ignored_prefixes` is
    /// stripped (case-insensitively) before canonicalization; a column listed
    /// in `renames` (keyed by lower-cased raw name) takes the mapped name.
    pub fn extract(schema: &RowSchema, ignored_prefixes: &[String], renames: &IndexMap<String, String>) -> ColumnSet {
        let mut prefixes: Vec<String> = ignored_prefixes.iter().map(|p| p.to_lowercase()).collect();
        prefixes.sort_by_key(|p| std::cmp::Reverse(p.len()));

        let mut table = Vec::with_capacity(schema.len());
        let mut entries = Vec::with_capacity(schema.len());
        for (index, meta) in schema.columns().iter().enumerate() {
            let original = meta.name();
            let local = match renames.get(&original.to_lowercase()) {
                Some(member) => member.clone(),
                None => prefixes
                    .iter()
                    .filter(|p| !p.is_empty())
                    .find_map(|p| strip_prefix_ci(original, p))
                    .unwrap_or(original)
                    .to_string(),
            };
            let name = local.to_lowercase();
            table.push(ColumnInfo {
                index,
                name: name.clone(),
                original_name: original.to_string(),
                kind: meta.kind(),
                provider_type: meta.provider_type().to_string(),
                mapped: Cell::new(false),
            });
            entries.push(Entry { index, name, local });
        }
        ColumnSet::build(Rc::from(table), entries, String::new())
    }

    fn build(table: Rc<[ColumnInfo]>, entries: Vec<Entry>, path: String) -> ColumnSet {
        let mut by_name: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (pos, entry) in entries.iter().enumerate() {
            by_name.entry(entry.name.clone()).or_default().push(pos);
        }
        ColumnSet { table, entries, by_name, path }
    }

    fn view<'s>(&'s self, entry: &'s Entry) -> ViewColumn<'s> {
        ViewColumn {
            info: &self.table[entry.index],
            name: &entry.name,
            local: &entry.local,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical prefix path of this view; empty at the root.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn iter(&self) -> impl Iterator<Item = ViewColumn<'_>> + '_ {
        self.entries.iter().map(move |e| self.view(e))
    }

    /// Unmapped columns of this view in index order.
    pub fn unmapped(&self) -> impl Iterator<Item = ViewColumn<'_>> + '_ {
        self.iter().filter(|c| !c.is_mapped())
    }

    pub fn has_unmapped_columns(&self) -> bool {
        self.unmapped().next().is_some()
    }

    /// Distinct canonical names of this view in first-appearance order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_name.keys().map(String::as_str)
    }

    /// First unmapped column called `name`.
    pub fn find(&self, name: &str) -> Option<ViewColumn<'_>> {
        let key = name.to_lowercase();
        self.by_name
            .get(&key)?
            .iter()
            .map(|&pos| self.view(&self.entries[pos]))
            .find(|c| !c.is_mapped())
    }

    /// Every unmapped column called `name`, in index order.
    pub fn find_all(&self, name: &str) -> Vec<ViewColumn<'_>> {
        let key = name.to_lowercase();
        match self.by_name.get(&key) {
            Some(positions) => positions
                .iter()
                .map(|&pos| self.view(&self.entries[pos]))
                .filter(|c| !c.is_mapped())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn contains_unmapped(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Unmapped columns the provider reported without a name.
    pub fn unnamed(&self) -> Vec<ViewColumn<'_>> {
        self.find_all("")
    }

    /// Sub-view of the columns named `prefix` + `separator` + rest, with that
    /// prefix removed. Names equal to the bare prefix are not included.
    pub fn scoped(&self, prefix: &str, separator: &str) -> ColumnSet {
        let full = format!("{}{}", prefix, separator).to_lowercase();
        let entries = self
            .entries
            .iter()
            .filter(|e| e.name.len() > full.len() && e.name.starts_with(&full))
            .map(|e| {
                let name = e.name[full.len()..].to_string();
                let local = strip_prefix_ci(&e.local, &full).map(str::to_string).unwrap_or_else(|| name.clone());
                Entry { index: e.index, name, local }
            })
            .collect();
        let path = if self.path.is_empty() {
            prefix.to_lowercase()
        } else {
            format!("{}{}{}", self.path, separator.to_lowercase(), prefix.to_lowercase())
        };
        ColumnSet::build(self.table.clone(), entries, path)
    }

    /// One-column view of the column at schema position `index`.
    pub fn single(&self, index: usize) -> ColumnSet {
        let entries = self.entries.iter().filter(|e| e.index == index).take(1).cloned().collect();
        ColumnSet::build(self.table.clone(), entries, self.path.clone())
    }

    pub fn column(&self, index: usize) -> Option<&ColumnInfo> {
        self.table.get(index)
    }

    pub(crate) fn mark_mapped(&self, index: usize) {
        if let Some(info) = self.table.get(index) {
            info.mark_mapped();
        }
    }

    /// Schema positions consumed so far, across every view of this compile.
    pub fn mapped_indices(&self) -> Vec<usize> {
        self.table.iter().filter(|c| c.is_mapped()).map(|c| c.index).collect()
    }

    /// Comma separated local names of the unmapped columns, for diagnostics.
    pub fn describe_unmapped(&self) -> String {
        self.unmapped().map(|c| c.local_name().to_string()).collect::<Vec<_>>().join(", ")
    }
}

/// Strips `prefix` (already lower-cased) from `name`, comparing
/// case-insensitively. Returns the remainder with its original casing.
fn strip_prefix_ci<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(name);
    }
    let mut lowered = String::with_capacity(prefix.len());
    for (idx, ch) in name.char_indices() {
        lowered.extend(ch.to_lowercase());
        if lowered.len() >= prefix.len() {
            return if lowered == prefix { Some(&name[idx + ch.len_utf8()..]) } else { None };
        }
        if !prefix.starts_with(lowered.as_str()) {
            return None;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(names: &[&str]) -> RowSchema {
        RowSchema::from_names(names.iter().copied())
    }

    #[test]
    fn groups_duplicates_in_index_order() {
        let set = ColumnSet::extract(&schema(&["A", "b", "a"]), &[], &IndexMap::new());
        let found: Vec<usize> = set.find_all("A").iter().map(ViewColumn::index).collect();
        assert_eq!(found, vec![0, 2]);
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn strips_longest_ignored_prefix() {
        let prefixes = vec!["t_".to_string(), "T_USER_".to_string()];
        let set = ColumnSet::extract(&schema(&["t_user_Name", "t_Id", "other"]), &prefixes, &IndexMap::new());
        let names: Vec<&str> = set.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["name", "id", "other"]);
        assert_eq!(set.iter().next().map(|c| c.local_name()), Some("Name"));
        assert_eq!(set.column(0).map(ColumnInfo::original_name), Some("t_user_Name"));
    }

    #[test]
    fn renames_apply_before_canonicalization() {
        let mut renames = IndexMap::new();
        renames.insert("user_nm".to_string(), "UserName".to_string());
        let set = ColumnSet::extract(&schema(&["USER_NM"]), &[], &renames);
        assert!(set.contains_unmapped("username"));
    }

    #[test]
    fn scoped_views_strip_prefix_and_share_flags() {
        let set = ColumnSet::extract(&schema(&["Id", "Address_City", "ADDRESS_Zip", "Address"]), &[], &IndexMap::new());
        let address = set.scoped("Address", "_");
        let locals: Vec<&str> = address.iter().map(|c| c.local_name()).collect();
        assert_eq!(locals, vec!["City", "Zip"]);
        assert_eq!(address.path(), "address");

        let city = address.find("city").map(|c| c.index());
        assert_eq!(city, Some(1));
        address.mark_mapped(1);
        assert!(set.column(1).map(ColumnInfo::is_mapped).unwrap_or(false));
        assert_eq!(set.mapped_indices(), vec![1]);
        assert!(address.has_unmapped_columns());
    }

    #[test]
    fn custom_separators_compose() {
        let set = ColumnSet::extract(&schema(&["AddressXCity", "Address_City"]), &[], &IndexMap::new());
        let address = set.scoped("address", "X");
        assert_eq!(address.len(), 1);
        assert_eq!(address.iter().next().map(|c| c.index()), Some(0));
        let nested = address.scoped("city", "X");
        assert!(nested.is_empty());
    }

    #[test]
    fn unnamed_columns_use_empty_name() {
        let set = ColumnSet::extract(&schema(&["", "id", ""]), &[], &IndexMap::new());
        assert_eq!(set.unnamed().len(), 2);
        let first = set.unmapped().next().map(|c| c.index());
        assert_eq!(first, Some(0));
    }

    #[test]
    fn strip_prefix_is_case_insensitive() {
        assert_eq!(strip_prefix_ci("TBL_Name", "tbl_"), Some("Name"));
        assert_eq!(strip_prefix_ci("tb", "tbl_"), None);
        assert_eq!(strip_prefix_ci("xbl_Name", "tbl_"), None);
    }
}
