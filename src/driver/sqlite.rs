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
//! SQLite row source.
//!

use rusqlite::{Connection, Params};
use rowcast_core::{ColumnMeta, RowSchema, Rows, Value, ValueKind};
use tracing::debug;
use crate::errors::Result;

/// Runs `sql` and collects the result set with its schema. Declared column
/// types come from the table definition; expression columns declare
/// `ValueKind::Any`.
pub fn query_rows<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Rows> {
    let mut stmt = conn.prepare(sql)?;
    let schema: RowSchema = stmt
        .columns()
        .iter()
        .map(|column| match column.decl_type() {
            Some(decl_type) => ColumnMeta::with_provider_type(column.name(), decl_type),
            None => ColumnMeta::new(column.name(), ValueKind::Any).set_provider_type(""),
        })
        .collect();
    let column_count = schema.len();
    let mut records = Rows::new(schema);
    let mut rows = stmt.query(params)?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            values.push(convert_sqlite_value(row.get(i)?));
        }
        records.push_values(values);
    }
    debug!("[Rowcast]: Fetched {} sqlite rows over {} columns", records.len(), column_count);
    Ok(records)
}

fn convert_sqlite_value(value: rusqlite::types::Value) -> Value {
    match value {
        rusqlite::types::Value::Null => Value::Null,
        rusqlite::types::Value::Integer(i) => Value::Bigint(i),
        rusqlite::types::Value::Real(f) => Value::Double(f),
        rusqlite::types::Value::Text(text) => Value::Text(text),
        rusqlite::types::Value::Blob(bytes) => Value::Blob(bytes),
    }
}
