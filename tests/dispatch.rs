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
//! Per-row subclass dispatch.
//!

mod common;

use common::{registry, rows, text};
use rowcast::*;

#[derive(Mapped, Debug, Default, PartialEq)]
pub struct Dog {
    pub name: String,
    pub barks: bool,
}

#[derive(Mapped, Debug, Default, PartialEq)]
#[mapped(default)]
pub struct Cat {
    pub name: String,
    pub lives: i32,
}

#[derive(Debug, Default, PartialEq)]
pub enum Animal {
    #[default]
    Unknown,
    Dog(Dog),
    Cat(Cat),
}

impl Mapped for Animal {
    fn shape() -> Shape {
        Shape::opaque_with_default::<Animal>()
    }
}

#[derive(Debug, PartialEq)]
pub enum Shelter {
    Dog(Dog),
}

impl Mapped for Shelter {
    fn shape() -> Shape {
        Shape::opaque::<Shelter>()
    }
}

fn kind_is(kind: &'static str) -> impl Fn(&dyn Record) -> bool + Send + Sync + 'static {
    move |record: &dyn Record| record.value_by_name("kind").and_then(Value::as_str) == Some(kind)
}

fn animals() -> Rows {
    let schema = RowSchema::default()
        .column("kind", ValueKind::String)
        .column("name", ValueKind::String)
        .column("barks", ValueKind::I32)
        .column("lives", ValueKind::I32);
    rows(
        schema,
        vec![
            vec![text("dog"), text("Rex"), Value::Int(1), Value::Null],
            vec![text("cat"), text("Tom"), Value::Null, Value::Int(9)],
            vec![text("fish"), text("Nemo"), Value::Null, Value::Null],
        ],
    )
}

#[test]
fn first_matching_predicate_picks_the_branch() {
    let registry = registry();
    registry.configure(
        TypeMapping::<Animal>::new()
            .subclass(kind_is("dog"), Animal::Dog)
            .subclass(kind_is("cat"), Animal::Cat),
    );
    let animals: Vec<Animal> = registry.map_rows(&animals()).unwrap();
    assert_eq!(animals[0], Animal::Dog(Dog { name: "Rex".to_string(), barks: true }));
    assert_eq!(animals[1], Animal::Cat(Cat { name: "Tom".to_string(), lives: 9 }));
    assert_eq!(animals[2], Animal::Unknown);
}

#[test]
fn otherwise_branch_catches_the_rest() {
    let registry = registry();
    registry.configure(
        TypeMapping::<Animal>::new()
            .subclass(kind_is("dog"), Animal::Dog)
            .otherwise(Animal::Cat),
    );
    let animals: Vec<Animal> = registry.map_rows(&animals()).unwrap();
    assert!(matches!(animals[1], Animal::Cat(ref cat) if cat.lives == 9));
    assert!(matches!(animals[2], Animal::Cat(ref cat) if cat.name == "Nemo" && cat.lives == 0));
}

#[test]
fn no_match_without_a_default_fails_the_row() {
    let registry = registry();
    registry.configure(TypeMapping::<Shelter>::new().subclass(kind_is("dog"), Shelter::Dog));
    let mapper = registry.mapper::<Shelter>(animals().schema()).unwrap();
    let rows = animals();
    assert!(mapper.map(&rows.data[0]).is_ok());
    let err = mapper.map(&rows.data[1]).unwrap_err();
    assert!(matches!(err, MapError::NoMatchingBranch { type_name } if type_name.ends_with("Shelter")));
}

#[test]
fn dispatched_types_cannot_be_populated() {
    let registry = registry();
    registry.configure(TypeMapping::<Animal>::new().subclass(kind_is("dog"), Animal::Dog));
    let err = registry.populator::<Animal>(animals().schema()).err().unwrap();
    assert!(matches!(err, CompileError::MissingCapability { capability: Capability::InPlacePopulation, .. }));
}

#[test]
fn branch_with_its_own_mapping() {
    let registry = registry();
    registry.configure(
        TypeMapping::<Animal>::new()
            .subclass_with(
                kind_is("cat"),
                TypeMapping::<Cat>::new().factory(|| Some(Cat { lives: 7, ..Cat::default() })).unwrap(),
                Animal::Cat,
            ),
    );
    let schema = RowSchema::default().column("kind", ValueKind::String).column("name", ValueKind::String);
    let rows = rows(schema, vec![vec![text("cat"), text("Kit")]]);
    let animals: Vec<Animal> = registry.map_rows(&rows).unwrap();
    assert_eq!(animals[0], Animal::Cat(Cat { name: "Kit".to_string(), lives: 7 }));
}
