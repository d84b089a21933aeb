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

use criterion::{criterion_group, criterion_main, Criterion};
use rowcast::*;
use std::hint::black_box;
use std::time::Duration;

#[derive(Mapped, Debug, Default, Clone)]
#[mapped(default)]
pub struct Address {
    pub city: String,
    pub zip: Option<String>,
}

#[derive(Mapped, Debug, Default, Clone)]
#[mapped(default)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub active: bool,
    pub balance: f64,
    pub address: Option<Address>,
}

fn account_rows(count: i64) -> Rows {
    let schema = RowSchema::default()
        .column("id", ValueKind::I64)
        .column("username", ValueKind::String)
        .column("active", ValueKind::I32)
        .column("balance", ValueKind::F64)
        .column("address_city", ValueKind::String)
        .column("address_zip", ValueKind::String);
    let mut rows = Rows::new(schema);
    for id in 0..count {
        let city = if id % 3 == 0 { Value::Null } else { Value::Text(format!("city-{}", id)) };
        rows.push_values(vec![
            Value::Bigint(id),
            Value::Text(format!("user-{}", id)),
            Value::Int((id % 2) as i32),
            Value::Double(id as f64 * 1.5),
            city,
            Value::Null,
        ]);
    }
    rows
}

pub fn bench_row_mapping(c: &mut Criterion) {
    let rows = account_rows(1_000);
    let registry = MapperRegistry::new(MapperConfig::default());

    let mut group = c.benchmark_group("row_mapping");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(100);

    // Benchmark: Compile without the cache
    group.bench_function("compile", |b| {
        let uncached = MapperRegistry::new(MapperConfig::default().set_cache_enabled(false));
        b.iter(|| {
            black_box(uncached.mapper::<Account>(black_box(rows.schema()))).unwrap();
        });
    });

    // Benchmark: Cached mapper lookup
    group.bench_function("cached_lookup", |b| {
        b.iter(|| {
            black_box(registry.mapper::<Account>(black_box(rows.schema()))).unwrap();
        });
    });

    // Benchmark: Map a thousand rows
    group.bench_function("map_1000_rows", |b| {
        let mapper = registry.mapper::<Account>(rows.schema()).unwrap();
        b.iter(|| {
            black_box(mapper.map_all(black_box(&rows))).unwrap();
        });
    });

    // Benchmark: Untyped row objects
    group.bench_function("map_1000_values", |b| {
        let mapper = registry.mapper::<Value>(rows.schema()).unwrap();
        b.iter(|| {
            black_box(mapper.map_all(black_box(&rows))).unwrap();
        });
    });

    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .significance_level(0.05)
        .noise_threshold(0.02)
        .warm_up_time(Duration::from_secs(1));
    targets = bench_row_mapping
);

criterion_main!(benches);
