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
//! Mapper caching.
//!

mod common;

use std::thread;
use common::{registry, rows, text};
use rowcast::*;

#[derive(Mapped, Debug, Default, Clone, PartialEq)]
#[mapped(default)]
pub struct Order {
    pub id: i64,
    pub status: String,
}

fn schema() -> RowSchema {
    RowSchema::default().column("id", ValueKind::I64).column("status", ValueKind::String)
}

#[test]
fn same_schema_hits_the_cache() {
    let registry = registry();
    registry.mapper::<Order>(&schema()).unwrap();
    registry.mapper::<Order>(&schema()).unwrap();
    assert_eq!(registry.cache_stats(), CacheStats { hits: 1, misses: 1, entries: 1 });
}

#[test]
fn different_schemas_compile_separately() {
    let registry = registry();
    registry.mapper::<Order>(&schema()).unwrap();
    registry.mapper::<Order>(&RowSchema::default().column("id", ValueKind::I64)).unwrap();
    registry.mapper::<Order>(&RowSchema::default().column("id", ValueKind::String)).unwrap();
    let stats = registry.cache_stats();
    assert_eq!(stats.misses, 3);
    assert_eq!(stats.entries, 3);

    // Mapping and population never share a mapper.
    registry.populator::<Order>(&schema()).unwrap();
    assert_eq!(registry.cache_stats().entries, 4);
}

#[test]
fn factories_and_map_functions_are_not_cached() {
    let registry = registry();
    registry.configure(TypeMapping::<Order>::new().factory(|| Some(Order::default())).unwrap());
    registry.mapper::<Order>(&schema()).unwrap();
    registry.mapper::<Order>(&schema()).unwrap();
    assert_eq!(registry.cache_stats().entries, 0);

    registry.configure(TypeMapping::<Order>::new().map_with(|_| Ok(Order::default())).unwrap());
    registry.mapper::<Order>(&schema()).unwrap();
    assert_eq!(registry.cache_stats().entries, 0);
}

#[test]
fn configure_drops_cached_mappers() {
    let registry = registry();
    registry.mapper::<Order>(&schema()).unwrap();
    assert_eq!(registry.cache_stats().entries, 1);
    registry.configure(TypeMapping::<Order>::new().ignore_prefix("o_"));
    assert_eq!(registry.cache_stats().entries, 0);

    let rows = rows(RowSchema::default().column("o_id", ValueKind::I64), vec![vec![Value::Bigint(5)]]);
    let orders: Vec<Order> = registry.map_rows(&rows).unwrap();
    assert_eq!(orders[0].id, 5);
}

#[test]
fn clear_empties_the_cache() {
    let registry = registry();
    registry.mapper::<Order>(&schema()).unwrap();
    registry.mapper::<(i64, String)>(&schema()).unwrap();
    assert_eq!(registry.cache_stats().entries, 2);
    registry.clear();
    assert_eq!(registry.cache_stats().entries, 0);
}

#[test]
fn disabled_cache_stores_nothing() {
    let registry = MapperRegistry::new(MapperConfig::default().set_cache_enabled(false));
    registry.mapper::<Order>(&schema()).unwrap();
    registry.mapper::<Order>(&schema()).unwrap();
    assert_eq!(registry.cache_stats(), CacheStats::default());
}

#[test]
fn concurrent_requests_share_one_mapper() {
    let registry = registry();
    let data: Vec<Vec<Value>> = (0..32).map(|i| vec![Value::Bigint(i), text("open")]).collect();
    let rows = rows(schema(), data);
    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let orders: Vec<Order> = registry.map_rows(&rows).unwrap();
                assert_eq!(orders.len(), 32);
                assert_eq!(orders[31].id, 31);
            });
        }
    });
    let stats = registry.cache_stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.hits + stats.misses, 8);
}
