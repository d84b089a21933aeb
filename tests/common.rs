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
//! Shared fixtures.
//!
#![allow(dead_code)]

use rowcast::*;

/// Result set with one row per entry of `data`.
pub fn rows(schema: RowSchema, data: Vec<Vec<Value>>) -> Rows {
    let mut rows = Rows::new(schema);
    for values in data {
        rows.push_values(values);
    }
    rows
}

pub fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

pub fn registry() -> MapperRegistry {
    MapperRegistry::new(MapperConfig::default())
}
