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
//! Nested members scoped by column-name prefixes.
//!

mod common;

use common::{registry, rows, text};
use rowcast::*;

#[derive(Mapped, Debug, Default, Clone, PartialEq)]
#[mapped(default)]
pub struct Address {
    pub city: String,
    pub zip: Option<String>,
}

#[derive(Mapped, Debug, Default, PartialEq)]
#[mapped(default)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub address: Address,
}

#[derive(Mapped, Debug, Default, PartialEq)]
#[mapped(default)]
pub struct Contact {
    pub id: i32,
    pub address: Option<Address>,
}

#[derive(Mapped, Debug, Default, PartialEq)]
#[mapped(default)]
pub struct Person {
    pub name: String,
    pub home: Address,
}

#[derive(Mapped, Debug, Default, PartialEq)]
#[mapped(default)]
pub struct Company {
    pub name: String,
    pub ceo: Person,
}

fn address(city: &str, zip: Option<&str>) -> Address {
    Address { city: city.to_string(), zip: zip.map(str::to_string) }
}

#[test]
fn prefixed_columns_fill_the_nested_member() {
    let schema = RowSchema::default()
        .column("Id", ValueKind::I32)
        .column("Name", ValueKind::String)
        .column("Address_City", ValueKind::String)
        .column("address_zip", ValueKind::String);
    let rows = rows(schema, vec![vec![Value::Int(1), text("Ann"), text("Oslo"), text("0150")]]);
    let users: Vec<User> = registry().map_rows(&rows).unwrap();
    assert_eq!(users[0].address, address("Oslo", Some("0150")));
    assert_eq!(users[0].name, "Ann");
}

#[test]
fn missing_prefix_keeps_the_default() {
    let schema = RowSchema::default().column("id", ValueKind::I32).column("city", ValueKind::String);
    let rows = rows(schema, vec![vec![Value::Int(1), text("Oslo")]]);
    let users: Vec<User> = registry().map_rows(&rows).unwrap();
    assert_eq!(users[0].address, Address::default());
}

#[test]
fn configured_separator() {
    let registry = MapperRegistry::new(MapperConfig::default().set_separator("X"));
    let schema = RowSchema::default().column("id", ValueKind::I32).column("AddressXCity", ValueKind::String);
    let rows = rows(schema, vec![vec![Value::Int(2), text("Rome")]]);
    let users: Vec<User> = registry.map_rows(&rows).unwrap();
    assert_eq!(users[0].address.city, "Rome");
}

#[test]
fn per_type_separator_applies_to_its_members() {
    let registry = registry();
    registry.configure(TypeMapping::<User>::new().separator("__"));
    let schema = RowSchema::default()
        .column("id", ValueKind::I32)
        .column("address__city", ValueKind::String)
        .column("address_zip", ValueKind::String);
    let rows = rows(schema, vec![vec![Value::Int(2), text("Rome"), text("00100")]]);
    let users: Vec<User> = registry.map_rows(&rows).unwrap();
    assert_eq!(users[0].address, address("Rome", None));
}

#[test]
fn optional_member_is_none_when_all_its_columns_are_null() {
    let schema = RowSchema::default()
        .column("id", ValueKind::I32)
        .column("address_city", ValueKind::String)
        .column("address_zip", ValueKind::String);
    let rows = rows(
        schema,
        vec![
            vec![Value::Int(1), Value::Null, Value::Null],
            vec![Value::Int(2), text("Lima"), Value::Null],
        ],
    );
    let contacts: Vec<Contact> = registry().map_rows(&rows).unwrap();
    assert_eq!(contacts[0].address, None);
    assert_eq!(contacts[1].address, Some(address("Lima", None)));
}

#[test]
fn optional_member_without_columns_is_none() {
    let rows = rows(RowSchema::default().column("id", ValueKind::I32), vec![vec![Value::Int(3)]]);
    let contacts: Vec<Contact> = registry().map_rows(&rows).unwrap();
    assert_eq!(contacts, vec![Contact { id: 3, address: None }]);
}

#[test]
fn three_levels_deep() {
    let schema = RowSchema::default()
        .column("name", ValueKind::String)
        .column("ceo_name", ValueKind::String)
        .column("ceo_home_city", ValueKind::String);
    let rows = rows(schema, vec![vec![text("Acme"), text("Wile"), text("Tucson")]]);
    let companies: Vec<Company> = registry().map_rows(&rows).unwrap();
    assert_eq!(
        companies[0],
        Company {
            name: "Acme".to_string(),
            ceo: Person { name: "Wile".to_string(), home: address("Tucson", None) },
        }
    );
}

#[test]
fn nesting_beyond_the_limit_fails_to_compile() {
    let registry = MapperRegistry::new(MapperConfig::default().set_max_depth(2));
    let schema = RowSchema::default().column("name", ValueKind::String).column("ceo_name", ValueKind::String);
    let err = registry.mapper::<Company>(&schema).err().unwrap();
    assert!(matches!(err, CompileError::RecursionLimit { limit: 2, .. }), "{}", err);

    // A flat type still fits.
    let rows = rows(RowSchema::default().column("city", ValueKind::String), vec![vec![text("Oslo")]]);
    let addresses: Vec<Address> = registry.map_rows(&rows).unwrap();
    assert_eq!(addresses[0].city, "Oslo");
}
