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

use indexmap::IndexMap;
use serde::Deserialize;

pub const DEFAULT_SEPARATOR: &str = "_";
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Registry-wide mapping options.
///
/// Can be built in code with the `set_*` methods or deserialized, e.g. from
/// `{"separator": "__", "ignored_prefixes": ["tbl_"]}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    separator: String,
    ignored_prefixes: Vec<String>,
    column_renames: IndexMap<String, String>,
    cache_enabled: bool,
    max_depth: usize,
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfig {
            separator: DEFAULT_SEPARATOR.to_string(),
            ignored_prefixes: Vec::new(),
            column_renames: IndexMap::new(),
            cache_enabled: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl MapperConfig {
    pub fn new() -> Self {
        MapperConfig::default()
    }

    /// Separator between a parent member name and a child column name.
    pub fn set_separator<S: Into<String>>(mut self, separator: S) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Adds a column-name prefix that is stripped before matching.
    pub fn add_ignored_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.ignored_prefixes.push(prefix.into());
        self
    }

    pub fn set_ignored_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.ignored_prefixes = prefixes;
        self
    }

    pub fn ignored_prefixes(&self) -> &[String] {
        &self.ignored_prefixes
    }

    /// Makes the column `column` match members named `member`.
    pub fn rename_column<C: Into<String>, M: Into<String>>(mut self, column: C, member: M) -> Self {
        self.column_renames.insert(column.into().to_lowercase(), member.into());
        self
    }

    pub fn column_renames(&self) -> &IndexMap<String, String> {
        &self.column_renames
    }

    pub fn set_cache_enabled(mut self, cache_enabled: bool) -> Self {
        self.cache_enabled = cache_enabled;
        self
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    pub fn set_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_partial_config() {
        let cfg: MapperConfig = serde_json::from_str(r#"{"separator": "X", "ignored_prefixes": ["tbl_"]}"#).unwrap();
        assert_eq!(cfg.separator(), "X");
        assert_eq!(cfg.ignored_prefixes(), ["tbl_".to_string()]);
        assert!(cfg.cache_enabled());
        assert_eq!(cfg.max_depth(), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn builder_lowercases_renames() {
        let cfg = MapperConfig::new().rename_column("USER_NM", "username");
        assert_eq!(cfg.column_renames().get("user_nm").map(String::as_str), Some("username"));
    }
}
