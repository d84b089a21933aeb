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

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::{fmt, mem};
use uuid::Uuid;

mod blob;
mod from_value;

use crate::ValueKind;
pub use blob::*;
pub use from_value::*;

/// A raw value read from one column of one row. `Null` is the NULL sentinel.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Tinyint(i8),
    Smallint(i16),
    Int(i32),
    Bigint(i64),
    Float(f32),
    Double(f64),
    BigDecimal(BigDecimal),
    Blob(Vec<u8>),
    Char(char),
    Text(String),
    Json(JsonValue),
    Uuid(Uuid),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),

    // ========== Container type ==========
    Object(IndexMap<String, Value>),
    List(Vec<Value>),
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Tinyint(v) => serializer.serialize_i8(*v),
            Value::Smallint(v) => serializer.serialize_i16(*v),
            Value::Int(v) => serializer.serialize_i32(*v),
            Value::Bigint(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f32(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::BigDecimal(v) => serializer.serialize_str(&v.to_string()),
            Value::Blob(v) => serializer.serialize_str(&base64::encode(v)),
            Value::Char(v) => serializer.serialize_char(*v),
            Value::Text(v) => serializer.serialize_str(v),
            Value::Json(v) => v.serialize(serializer),
            Value::Uuid(v) => serializer.serialize_str(&v.to_string()),
            Value::Date(v) => serializer.serialize_str(&v.to_string()),
            Value::Time(v) => serializer.serialize_str(&v.to_string()),
            Value::DateTime(v) => serializer.serialize_str(&v.format("%Y-%m-%d %H:%M:%S").to_string()),
            Value::Timestamp(v) => serializer.serialize_str(&v.to_rfc3339()),
            Value::Object(v) => v.serialize(serializer),
            Value::List(v) => v.serialize(serializer),
        }
    }
}

impl<'a> From<&'a Value> for Value {
    fn from(v: &'a Value) -> Value {
        v.to_owned()
    }
}

macro_rules! impl_from_primitive {
    ($ty: ty, $variant: ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Value {
                Value::$variant(v)
            }
        }
    };
}

impl_from_primitive!(bool, Bool);
impl_from_primitive!(i8, Tinyint);
impl_from_primitive!(i16, Smallint);
impl_from_primitive!(i32, Int);
impl_from_primitive!(i64, Bigint);
impl_from_primitive!(f32, Float);
impl_from_primitive!(f64, Double);
impl_from_primitive!(BigDecimal, BigDecimal);
impl_from_primitive!(Vec<u8>, Blob);
impl_from_primitive!(char, Char);
impl_from_primitive!(String, Text);
impl_from_primitive!(JsonValue, Json);
impl_from_primitive!(Uuid, Uuid);
impl_from_primitive!(NaiveDate, Date);
impl_from_primitive!(NaiveTime, Time);
impl_from_primitive!(NaiveDateTime, DateTime);
impl_from_primitive!(DateTime<Utc>, Timestamp);

impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Value {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl Value {
    // ========== Type check method ==========

    pub fn is_number(&self) -> bool {
        matches!(
            *self,
            Value::Tinyint(_)
            | Value::Smallint(_)
            | Value::Int(_)
            | Value::Bigint(_)
            | Value::Float(_)
            | Value::Double(_)
            | Value::BigDecimal(_)
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Value::Tinyint(v) => *v == 0,
            Value::Smallint(v) => *v == 0,
            Value::Int(v) => *v == 0,
            Value::Bigint(v) => *v == 0,
            Value::Float(v) => *v == 0.0,
            Value::Double(v) => *v == 0.0,
            Value::BigDecimal(v) => *v == BigDecimal::from(0),
            _ => false,
        }
    }

    /// Kind of the stored value; `Null` and containers report `Any`.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Any,
            Value::Bool(_) => ValueKind::Bool,
            Value::Tinyint(_) => ValueKind::I8,
            Value::Smallint(_) => ValueKind::I16,
            Value::Int(_) => ValueKind::I32,
            Value::Bigint(_) => ValueKind::I64,
            Value::Float(_) => ValueKind::F32,
            Value::Double(_) => ValueKind::F64,
            Value::BigDecimal(_) => ValueKind::Decimal,
            Value::Blob(_) => ValueKind::Bytes,
            Value::Char(_) => ValueKind::Char,
            Value::Text(_) => ValueKind::String,
            Value::Json(_) => ValueKind::Json,
            Value::Uuid(_) => ValueKind::Uuid,
            Value::Date(_) => ValueKind::Date,
            Value::Time(_) => ValueKind::Time,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::Object(_) | Value::List(_) => ValueKind::Any,
        }
    }

    // ========== Type conversion method ==========

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Tinyint(v) => Some(*v as i64),
            Value::Smallint(v) => Some(*v as i64),
            Value::Int(v) => Some(*v as i64),
            Value::Bigint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Tinyint(v) => Some(*v as f64),
            Value::Smallint(v) => Some(*v as f64),
            Value::Int(v) => Some(*v as f64),
            Value::Bigint(v) => Some(*v as f64),
            Value::Float(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    // ========== Object manipulation method ==========

    pub fn take(&mut self) -> Value {
        mem::replace(self, Value::Null)
    }

    pub fn new_object() -> Self {
        Value::Object(IndexMap::new())
    }

    pub fn insert_obj<K, V>(&mut self, k: K, v: V)
    where
        K: ToString,
        V: Into<Value>,
    {
        if let Value::Object(data) = self {
            data.insert(k.to_string(), v.into());
        }
    }

    pub fn insert_obj_value<K>(&mut self, k: K, value: &Value)
    where
        K: ToString,
    {
        if let Value::Object(v) = self {
            v.insert(k.to_string(), value.clone());
        }
    }

    pub fn get_obj_value(&self, s: &str) -> Option<&Value> {
        match self {
            Value::Object(data) => data.get(s),
            _ => None,
        }
    }

    pub fn get_obj_len(&self) -> usize {
        match self {
            Value::Object(data) => data.len(),
            _ => 0,
        }
    }

    /// Check if it is empty
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            Value::List(vec) => vec.is_empty(),
            Value::Object(map) => map.is_empty(),
            Value::Blob(data) => data.is_empty(),
            _ => false,
        }
    }

    /// Textual form used when a column is mapped onto a string target.
    pub fn coerce_to_string(&self) -> String {
        match self {
            Value::Null => "".to_string(),
            Value::Text(s) => s.clone(),
            Value::Char(c) => c.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Tinyint(v) => v.to_string(),
            Value::Smallint(v) => v.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Bigint(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Double(f) => f.to_string(),
            Value::BigDecimal(bd) => bd.to_string(),
            Value::Date(d) => d.to_string(),
            Value::Time(t) => t.to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::Timestamp(ts) => ts.to_rfc3339(),
            Value::Uuid(u) => u.to_string(),
            Value::Json(v) => v.to_string(),
            Value::Blob(v) => String::from_utf8_lossy(v).into_owned(),
            Value::List(items) => items.iter().map(Value::coerce_to_string).collect::<Vec<_>>().join(","),
            Value::Object(_) => serde_json::to_string(self).unwrap_or_default(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            other => f.write_str(&other.coerce_to_string()),
        }
    }
}
