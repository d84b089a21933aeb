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

//!
//! Sequences, dictionaries and untyped values.
//!

mod common;

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;
use common::{registry, rows, text};
use rowcast::*;

#[test]
fn root_sequence_takes_every_column() {
    let schema = RowSchema::default()
        .column("n", ValueKind::I32)
        .column("n", ValueKind::I32)
        .column("other", ValueKind::I64);
    let rows = rows(schema, vec![vec![Value::Int(1), Value::Int(2), Value::Bigint(3)]]);
    let lists: Vec<Vec<i32>> = registry().map_rows(&rows).unwrap();
    assert_eq!(lists, vec![vec![1, 2, 3]]);
}

#[test]
fn sequence_forms() {
    let schema = RowSchema::default()
        .column("a", ValueKind::I32)
        .column("b", ValueKind::I32)
        .column("c", ValueKind::I32);
    let rows = rows(schema, vec![vec![Value::Int(3), Value::Int(1), Value::Int(3)]]);
    let registry = registry();

    let boxed: Vec<Box<[i32]>> = registry.map_rows(&rows).unwrap();
    assert_eq!(&*boxed[0], &[3, 1, 3]);
    let shared: Vec<Arc<[i32]>> = registry.map_rows(&rows).unwrap();
    assert_eq!(&*shared[0], &[3, 1, 3]);
    let deque: Vec<VecDeque<i32>> = registry.map_rows(&rows).unwrap();
    assert_eq!(deque[0], VecDeque::from(vec![3, 1, 3]));
    let set: Vec<BTreeSet<i32>> = registry.map_rows(&rows).unwrap();
    assert_eq!(set[0].iter().copied().collect::<Vec<_>>(), vec![1, 3]);
}

#[derive(Mapped, Debug, Default, PartialEq)]
#[mapped(default)]
pub struct Tagged {
    pub id: i32,
    pub tags: Vec<String>,
}

#[test]
fn member_sequence_from_duplicate_columns() {
    let schema = RowSchema::default()
        .column("id", ValueKind::I32)
        .column("tags", ValueKind::String)
        .column("TAGS", ValueKind::String);
    let rows = rows(schema, vec![vec![Value::Int(1), text("red"), text("blue")]]);
    let tagged: Vec<Tagged> = registry().map_rows(&rows).unwrap();
    assert_eq!(tagged[0].tags, vec!["red".to_string(), "blue".to_string()]);
}

#[test]
fn member_sequence_from_prefixed_columns() {
    let schema = RowSchema::default()
        .column("id", ValueKind::I32)
        .column("tags_1", ValueKind::String)
        .column("tags_2", ValueKind::String);
    let rows = rows(schema, vec![vec![Value::Int(1), text("a"), Value::Null]]);
    let tagged: Vec<Tagged> = registry().map_rows(&rows).unwrap();
    assert_eq!(tagged[0].tags, vec!["a".to_string(), String::new()]);
}

#[test]
fn root_dictionary_is_keyed_by_local_name() {
    let config = MapperConfig::default().add_ignored_prefix("tbl_");
    let registry = MapperRegistry::new(config);
    let schema = RowSchema::default()
        .column("tbl_Width", ValueKind::I32)
        .column("Height", ValueKind::I32)
        .column("height", ValueKind::I32);
    let rows = rows(schema, vec![vec![Value::Int(4), Value::Int(5), Value::Int(6)]]);
    let maps: Vec<HashMap<String, i32>> = registry.map_rows(&rows).unwrap();
    assert_eq!(maps[0].len(), 2);
    assert_eq!(maps[0]["Width"], 4);
    assert_eq!(maps[0]["Height"], 5);
}

#[test]
fn abstract_dictionary() {
    let schema = RowSchema::default().column("k", ValueKind::String);
    let rows = rows(schema, vec![vec![text("v")]]);
    let maps: Vec<Arc<HashMap<String, String>>> = registry().map_rows(&rows).unwrap();
    assert_eq!(maps[0].get("k").map(String::as_str), Some("v"));
}

#[derive(Mapped, Debug, Default, PartialEq)]
#[mapped(default)]
pub struct Settings {
    pub id: i32,
    pub props: HashMap<String, String>,
}

#[test]
fn member_dictionary_takes_prefixed_columns() {
    let schema = RowSchema::default()
        .column("id", ValueKind::I32)
        .column("props_color", ValueKind::String)
        .column("props_size", ValueKind::I64);
    let rows = rows(schema, vec![vec![Value::Int(1), text("red"), Value::Bigint(42)]]);
    let settings: Vec<Settings> = registry().map_rows(&rows).unwrap();
    assert_eq!(settings[0].props.len(), 2);
    assert_eq!(settings[0].props["color"], "red");
    assert_eq!(settings[0].props["size"], "42");
}

#[derive(Mapped, Debug, Default, Clone, PartialEq)]
pub struct Item {
    pub id: i32,
    pub name: String,
}

#[test]
fn object_elements_repeat_until_columns_run_out() {
    let schema = RowSchema::default()
        .column("id", ValueKind::I32)
        .column("name", ValueKind::String)
        .column("id", ValueKind::I32)
        .column("name", ValueKind::String);
    let rows = rows(schema, vec![vec![Value::Int(1), text("a"), Value::Int(2), text("b")]]);
    let items: Vec<Vec<Item>> = registry().map_rows(&rows).unwrap();
    assert_eq!(
        items[0],
        vec![Item { id: 1, name: "a".to_string() }, Item { id: 2, name: "b".to_string() }]
    );
}

#[test]
fn untyped_elements_are_row_objects() {
    let schema = RowSchema::default()
        .column("a", ValueKind::I32)
        .column("b", ValueKind::String)
        .column("a", ValueKind::I32);
    let rows = rows(schema, vec![vec![Value::Int(1), text("x"), Value::Int(2)]]);
    let values: Vec<Vec<Value>> = registry().map_rows(&rows).unwrap();
    assert_eq!(values[0].len(), 2);
    assert_eq!(values[0][0].get_obj_value("a"), Some(&Value::Int(1)));
    assert_eq!(values[0][0].get_obj_value("b"), Some(&text("x")));
    assert_eq!(values[0][1].get_obj_value("a"), Some(&Value::Int(2)));
}

#[test]
fn nested_sequences_are_unsupported() {
    let schema = RowSchema::default().column("a", ValueKind::I32);
    let err = registry().mapper::<Vec<Vec<i32>>>(&schema).err().unwrap();
    assert!(matches!(err, CompileError::UnsupportedElement { .. }), "{}", err);
}

#[test]
fn untyped_root_is_an_object_of_every_column() {
    let schema = RowSchema::default().column("id", ValueKind::I32).column("name", ValueKind::String);
    let rows = rows(schema, vec![vec![Value::Int(9), Value::Null]]);
    let values: Vec<Value> = registry().map_rows(&rows).unwrap();
    assert_eq!(values[0].get_obj_len(), 2);
    assert_eq!(values[0].get_obj_value("id"), Some(&Value::Int(9)));
    assert_eq!(values[0].get_obj_value("name"), Some(&Value::Null));
}

#[derive(Mapped, Debug, Default, PartialEq)]
#[mapped(default)]
pub struct Loose {
    pub id: i32,
    pub extra: Value,
}

#[test]
fn untyped_member_collects_duplicates_into_a_list() {
    let schema = RowSchema::default()
        .column("id", ValueKind::I32)
        .column("extra", ValueKind::String)
        .column("extra", ValueKind::I64);
    let rows = rows(schema, vec![vec![Value::Int(1), text("a"), Value::Bigint(2)]]);
    let loose: Vec<Loose> = registry().map_rows(&rows).unwrap();
    assert_eq!(loose[0].extra, Value::List(vec![text("a"), Value::Bigint(2)]));

    let schema = RowSchema::default().column("id", ValueKind::I32).column("extra", ValueKind::String);
    let rows = common::rows(schema, vec![vec![Value::Int(1), text("only")]]);
    let loose: Vec<Loose> = registry().map_rows(&rows).unwrap();
    assert_eq!(loose[0].extra, text("only"));
}
