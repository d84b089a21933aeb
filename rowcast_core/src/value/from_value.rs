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

use crate::{ConversionError, DataError, Value};
use bigdecimal::{BigDecimal, FromPrimitive, ToPrimitive};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use uuid::Uuid;

/// Decodes a raw [`Value`] into a Rust type.
///
/// Numeric decoding is checked: a value outside the target's range is a
/// `NumericOverflow` error instead of a wrapped result.
pub trait FromValue: Sized {
    fn from_value_opt(value: &Value) -> Result<Self, DataError>;
}

impl FromValue for Value {
    fn from_value_opt(v: &Value) -> Result<Self, DataError> {
        Ok(v.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value_opt(other).map(Some),
        }
    }
}

fn mismatch(expected: &str, value: &Value) -> DataError {
    DataError::ConversionError(ConversionError::TypeMismatch {
        expected: expected.to_string(),
        found: format!("{:?}", value),
    })
}

macro_rules! impl_from_value_integer {
    ($ty: ty, $method: ident, $ty_name: tt) => {
        impl FromValue for $ty {
            fn from_value_opt(v: &Value) -> Result<Self, DataError> {
                let overflow = || DataError::numeric_overflow_error($ty_name);
                match *v {
                    Value::Tinyint(v) => <$ty>::try_from(v).map_err(|_| overflow()),
                    Value::Smallint(v) => <$ty>::try_from(v).map_err(|_| overflow()),
                    Value::Int(v) => <$ty>::try_from(v).map_err(|_| overflow()),
                    Value::Bigint(v) => <$ty>::try_from(v).map_err(|_| overflow()),
                    Value::Bool(v) => Ok(if v { 1 } else { 0 }),
                    Value::Float(v) => float_to_integer(v as f64, <$ty>::MIN as f64, (<$ty>::MAX / 2 + 1) as f64 * 2.0)
                        .map(|v| v as $ty)
                        .ok_or_else(overflow),
                    Value::Double(v) => float_to_integer(v, <$ty>::MIN as f64, (<$ty>::MAX / 2 + 1) as f64 * 2.0)
                        .map(|v| v as $ty)
                        .ok_or_else(overflow),
                    Value::BigDecimal(ref v) => v.with_scale(0).$method().ok_or_else(overflow),
                    Value::Text(ref s) => parse_integer::<$ty>(s.trim(), $ty_name),
                    _ => Err(DataError::not_supported_error(format!("{:?}", v), $ty_name.to_string())),
                }
            }
        }
    }
}

/// Range-checks a float before it is truncated toward zero. `end` is one
/// past the largest value of the target, exact in `f64` for every width.
fn float_to_integer(v: f64, min: f64, end: f64) -> Option<f64> {
    if !v.is_finite() {
        return None;
    }
    let truncated = v.trunc();
    if truncated < min || truncated >= end {
        None
    } else {
        Some(truncated)
    }
}

fn parse_integer<T: FromStr>(s: &str, ty_name: &str) -> Result<T, DataError> {
    if let Ok(v) = s.parse::<T>() {
        return Ok(v);
    }
    // "12.0", "1e3" and out-of-range literals
    match BigDecimal::from_str(s) {
        Ok(_) if s.parse::<i128>().is_ok() => Err(DataError::numeric_overflow_error(ty_name)),
        Ok(_) => Err(DataError::parse_error(format!("'{}' is not an integral {}", s, ty_name))),
        Err(_) => Err(DataError::parse_error(format!("Failed to parse '{}' as {}", s, ty_name))),
    }
}

impl_from_value_integer!(i8, to_i8, "i8");
impl_from_value_integer!(i16, to_i16, "i16");
impl_from_value_integer!(i32, to_i32, "i32");
impl_from_value_integer!(i64, to_i64, "i64");
impl_from_value_integer!(isize, to_isize, "isize");
impl_from_value_integer!(u8, to_u8, "u8");
impl_from_value_integer!(u16, to_u16, "u16");
impl_from_value_integer!(u32, to_u32, "u32");
impl_from_value_integer!(u64, to_u64, "u64");
impl_from_value_integer!(usize, to_usize, "usize");

impl FromValue for f64 {
    fn from_value_opt(v: &Value) -> Result<Self, DataError> {
        match v {
            Value::Double(v) => Ok(*v),
            Value::Float(v) => Ok(*v as f64),
            Value::BigDecimal(v) => v.to_f64().ok_or_else(|| DataError::numeric_overflow_error("f64")),
            Value::Bool(v) => Ok(if *v { 1.0 } else { 0.0 }),
            Value::Text(s) => s.trim().parse().map_err(|_| DataError::parse_error(format!("Failed to parse '{}' as f64", s))),
            other => other.as_f64().ok_or_else(|| mismatch("f64", other)),
        }
    }
}

impl FromValue for f32 {
    fn from_value_opt(v: &Value) -> Result<Self, DataError> {
        match v {
            Value::Float(v) => Ok(*v),
            other => {
                let wide = f64::from_value_opt(other)?;
                if wide.is_finite() && wide.abs() > f32::MAX as f64 {
                    Err(DataError::numeric_overflow_error("f32"))
                } else {
                    Ok(wide as f32)
                }
            }
        }
    }
}

// Implement for other types
impl FromValue for bool {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Tinyint(v) => Ok(*v != 0),
            Value::Smallint(v) => Ok(*v != 0),
            Value::Int(v) => Ok(*v != 0),
            Value::Bigint(v) => Ok(*v != 0),
            Value::Float(v) => Ok(*v != 0.0),
            Value::Double(v) => Ok(*v != 0.0),
            Value::BigDecimal(v) => Ok(*v != BigDecimal::from(0)),
            Value::Text(s) => {
                let lower = s.trim().to_lowercase();
                match lower.as_str() {
                    "true" | "1" | "yes" | "on" => Ok(true),
                    "false" | "0" | "no" | "off" => Ok(false),
                    _ => Err(DataError::parse_error(format!("Failed to parse '{}' as bool", s))),
                }
            }
            _ => Err(mismatch("bool", value)),
        }
    }
}

impl FromValue for String {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Text(s) => Ok(s.to_string()),
            Value::Json(v) => serde_json::to_string(&v).map_err(|e| DataError::conversion_error(e.to_string())),
            Value::Blob(v) => String::from_utf8(v.clone()).map_err(|e| DataError::conversion_error(e.to_string())),
            other => Ok(other.coerce_to_string()),
        }
    }
}

impl FromValue for char {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Char(c) => Ok(*c),
            Value::Text(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(DataError::conversion_error(format!("String '{}' is not a single character", s))),
                }
            }
            _ => Err(mismatch("char", value)),
        }
    }
}

impl FromValue for Uuid {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Uuid(uuid) => Ok(*uuid),
            Value::Text(s) => Uuid::parse_str(s).map_err(|e| DataError::parse_error(e.to_string())),
            Value::Blob(bytes) => Uuid::from_slice(bytes).map_err(|e| DataError::parse_error(e.to_string())),
            _ => Err(mismatch("Uuid", value)),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Date(date) => Ok(*date),
            Value::Text(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .or_else(|_| NaiveDateTime::from_value_opt(value).map(|dt| dt.date()))
                .map_err(|_| DataError::parse_error(format!("Failed to parse '{}' as NaiveDate", s))),
            Value::DateTime(dt) => Ok(dt.date()),
            Value::Timestamp(ts) => Ok(ts.date_naive()),
            _ => Err(mismatch("NaiveDate", value)),
        }
    }
}

impl FromValue for NaiveTime {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Time(time) => Ok(*time),
            Value::Text(s) => NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
                .map_err(|e| DataError::parse_error(e.to_string())),
            Value::DateTime(dt) => Ok(dt.time()),
            Value::Timestamp(ts) => Ok(ts.time()),
            _ => Err(mismatch("NaiveTime", value)),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::DateTime(dt) => Ok(*dt),
            Value::Text(s) => {
                // Experiment with multiple datetime formats
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                    return Ok(dt);
                }
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                    return Ok(dt);
                }
                if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                    return Ok(ts.naive_utc());
                }
                if let Some(dt) = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)) {
                    return Ok(dt);
                }
                Err(DataError::parse_error(format!("Failed to parse '{}' as NaiveDateTime", s)))
            }
            Value::Date(date) => date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| DataError::conversion_error(format!("Invalid date {}", date))),
            Value::Timestamp(ts) => Ok(ts.naive_utc()),
            _ => Err(mismatch("NaiveDateTime", value)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Timestamp(ts) => Ok(*ts),
            Value::Text(s) => match DateTime::parse_from_rfc3339(s) {
                Ok(dt) => Ok(dt.with_timezone(&Utc)),
                Err(_) => NaiveDateTime::from_value_opt(value).map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            },
            Value::DateTime(dt) => Ok(DateTime::from_naive_utc_and_offset(*dt, Utc)),
            Value::Date(_) => NaiveDateTime::from_value_opt(value).map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            _ => Err(mismatch("DateTime<Utc>", value)),
        }
    }
}

impl FromValue for BigDecimal {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::BigDecimal(bd) => Ok(bd.clone()),
            Value::Text(s) => BigDecimal::from_str(s.trim())
                .map_err(|_| DataError::parse_error(format!("Failed to parse '{}' as BigDecimal", s))),
            Value::Tinyint(v) => Ok(BigDecimal::from(*v)),
            Value::Smallint(v) => Ok(BigDecimal::from(*v)),
            Value::Int(v) => Ok(BigDecimal::from(*v)),
            Value::Bigint(v) => Ok(BigDecimal::from(*v)),
            Value::Bool(v) => Ok(BigDecimal::from(*v as i32)),
            Value::Float(v) => BigDecimal::from_f32(*v).ok_or_else(|| DataError::conversion_error("Cannot convert f32 to BigDecimal")),
            Value::Double(v) => BigDecimal::from_f64(*v).ok_or_else(|| DataError::conversion_error("Cannot convert f64 to BigDecimal")),
            _ => Err(mismatch("BigDecimal", value)),
        }
    }
}

impl FromValue for JsonValue {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Json(json) => Ok(json.clone()),
            Value::Text(s) => Ok(serde_json::from_str(s).unwrap_or_else(|_| JsonValue::String(s.to_string()))),
            Value::Object(map) => {
                let json_map: serde_json::Map<String, JsonValue> = map
                    .iter()
                    .map(|(k, v)| Ok((k.to_string(), JsonValue::from_value_opt(v)?)))
                    .collect::<Result<_, DataError>>()?;
                Ok(JsonValue::Object(json_map))
            }
            Value::List(items) => {
                let json_array: Vec<JsonValue> = items
                    .iter()
                    .map(JsonValue::from_value_opt)
                    .collect::<Result<_, _>>()?;
                Ok(JsonValue::Array(json_array))
            }
            Value::Null => Ok(JsonValue::Null),
            other => serde_json::to_value(other).map_err(|e| DataError::SerializeError(e.to_string())),
        }
    }
}

impl<V: FromValue> FromValue for HashMap<String, V> {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| Ok((k.to_string(), V::from_value_opt(v)?)))
                .collect(),
            _ => Err(mismatch("HashMap<String, V>", value)),
        }
    }
}

impl<V: FromValue> FromValue for BTreeMap<String, V> {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| Ok((k.to_string(), V::from_value_opt(v)?)))
                .collect(),
            _ => Err(mismatch("BTreeMap<String, V>", value)),
        }
    }
}

impl<V: FromValue> FromValue for IndexMap<String, V> {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| Ok((k.to_string(), V::from_value_opt(v)?)))
                .collect(),
            _ => Err(mismatch("IndexMap<String, V>", value)),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::List(items) => items.iter().map(T::from_value_opt).collect(),
            Value::Null => Ok(Vec::new()),
            other => Ok(vec![T::from_value_opt(other)?]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_range_checked() {
        assert_eq!(i32::from_value_opt(&Value::Bigint(12)).unwrap(), 12);
        assert!(i8::from_value_opt(&Value::Int(300)).unwrap_err().is_overflow());
        assert!(u32::from_value_opt(&Value::Int(-1)).unwrap_err().is_overflow());
        assert!(i32::from_value_opt(&Value::Double(f64::NAN)).unwrap_err().is_overflow());
        assert_eq!(i16::from_value_opt(&Value::Double(-7.9)).unwrap(), -7);
    }

    #[test]
    fn floats_at_the_integer_boundary_overflow() {
        assert!(i64::from_value_opt(&Value::Double(9.223372036854775807e18)).unwrap_err().is_overflow());
        assert!(u64::from_value_opt(&Value::Double(1.8446744073709552e19)).unwrap_err().is_overflow());
        assert!(i32::from_value_opt(&Value::Double(2147483648.0)).unwrap_err().is_overflow());
        assert_eq!(i32::from_value_opt(&Value::Double(2147483647.0)).unwrap(), i32::MAX);
        assert_eq!(i64::from_value_opt(&Value::Double(-9.223372036854775808e18)).unwrap(), i64::MIN);
        assert_eq!(u8::from_value_opt(&Value::Float(255.5)).unwrap(), 255);
    }

    #[test]
    fn integers_parse_text() {
        assert_eq!(i64::from_value_opt(&Value::Text(" 42 ".to_string())).unwrap(), 42);
        assert!(u8::from_value_opt(&Value::Text("256".to_string())).unwrap_err().is_overflow());
        assert!(!i32::from_value_opt(&Value::Text("abc".to_string())).unwrap_err().is_overflow());
    }

    #[test]
    fn decimals_decode_into_integers() {
        let value = Value::BigDecimal(BigDecimal::from_str("12.75").unwrap());
        assert_eq!(i64::from_value_opt(&value).unwrap(), 12);
        assert_eq!(f64::from_value_opt(&value).unwrap(), 12.75);
    }

    #[test]
    fn options_absorb_null() {
        assert_eq!(Option::<i32>::from_value_opt(&Value::Null).unwrap(), None);
        assert_eq!(Option::<String>::from_value_opt(&Value::from("a")).unwrap(), Some("a".to_string()));
    }

    #[test]
    fn dates_parse_text() {
        let dt = NaiveDateTime::from_value_opt(&Value::from("2024-02-01 10:11:12")).unwrap();
        assert_eq!(dt.to_string(), "2024-02-01 10:11:12");
        let date = NaiveDate::from_value_opt(&Value::from("2024-02-01")).unwrap();
        assert_eq!(date.to_string(), "2024-02-01");
    }
}
