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

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive kind of a column as declared by the provider, or of a scalar
/// mapping target.
///
/// `Any` as a declared kind means the provider reported no usable type, so
/// conversions are chosen per row from the raw value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueKind {
    #[default]
    Any,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    String,
    Char,
    Bytes,
    Json,
    Uuid,
    Date,
    Time,
    DateTime,
    Timestamp,
}

impl ValueKind {
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float() || *self == ValueKind::Decimal
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ValueKind::I8
                | ValueKind::I16
                | ValueKind::I32
                | ValueKind::I64
                | ValueKind::U8
                | ValueKind::U16
                | ValueKind::U32
                | ValueKind::U64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ValueKind::F32 | ValueKind::F64)
    }

    pub fn is_boolean(&self) -> bool {
        *self == ValueKind::Bool
    }

    /// Kinds that take part in the generic value-to-value conversion.
    pub fn is_convertible(&self) -> bool {
        self.is_numeric()
            || matches!(
                self,
                ValueKind::Bool
                    | ValueKind::String
                    | ValueKind::Char
                    | ValueKind::Date
                    | ValueKind::DateTime
                    | ValueKind::Timestamp
            )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Any => "any",
            ValueKind::Bool => "bool",
            ValueKind::I8 => "i8",
            ValueKind::I16 => "i16",
            ValueKind::I32 => "i32",
            ValueKind::I64 => "i64",
            ValueKind::U8 => "u8",
            ValueKind::U16 => "u16",
            ValueKind::U32 => "u32",
            ValueKind::U64 => "u64",
            ValueKind::F32 => "f32",
            ValueKind::F64 => "f64",
            ValueKind::Decimal => "decimal",
            ValueKind::String => "string",
            ValueKind::Char => "char",
            ValueKind::Bytes => "bytes",
            ValueKind::Json => "json",
            ValueKind::Uuid => "uuid",
            ValueKind::Date => "date",
            ValueKind::Time => "time",
            ValueKind::DateTime => "datetime",
            ValueKind::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Provider column type names.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum SqlType {
    Bool,
    Tinyint,
    Smallint,
    Int,
    Bigint,
    Real,
    Float,
    Double,
    Numeric,
    Blob,
    Varbinary,
    Char,
    Varchar,
    Text,
    Json,
    Uuid,
    Date,
    Time,
    DateTime,
    Timestamp,
    TimestampTz,
    Unknown(String),
}

impl SqlType {
    pub fn as_string(&self) -> String {
        match self {
            SqlType::Bool => "bool".into(),
            SqlType::Tinyint => "tinyint".into(),
            SqlType::Smallint => "smallint".into(),
            SqlType::Int => "int".into(),
            SqlType::Bigint => "bigint".into(),
            SqlType::Real => "real".into(),
            SqlType::Float => "float".into(),
            SqlType::Double => "double".into(),
            SqlType::Numeric => "numeric".into(),
            SqlType::Blob => "blob".into(),
            SqlType::Varbinary => "varbinary".into(),
            SqlType::Char => "char".into(),
            SqlType::Varchar => "varchar".into(),
            SqlType::Text => "text".into(),
            SqlType::Json => "json".into(),
            SqlType::Uuid => "uuid".into(),
            SqlType::Date => "date".into(),
            SqlType::Time => "time".into(),
            SqlType::DateTime => "datetime".into(),
            SqlType::Timestamp => "timestamp".into(),
            SqlType::TimestampTz => "timestamptz".into(),
            SqlType::Unknown(name) => name.clone(),
        }
    }

    /// Parses a provider type name such as `VARCHAR(255)` or
    /// `int unsigned`. Length and precision suffixes are ignored.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(sql_type: &str) -> Self {
        let lower = sql_type.trim().to_lowercase();
        let base = match lower.find('(') {
            Some(pos) => &lower[..pos],
            None => lower.as_str(),
        };
        let base = base.trim().trim_end_matches(" unsigned").trim();
        match base {
            "bool" | "boolean" | "bit" => SqlType::Bool,
            "tinyint" => SqlType::Tinyint,
            "smallint" | "int2" => SqlType::Smallint,
            "int" | "int4" | "mediumint" => SqlType::Int,
            // sqlite integers are 64 bit
            "integer" | "bigint" | "int8" => SqlType::Bigint,
            "real" => SqlType::Real,
            "float" | "float4" => SqlType::Float,
            "double" | "double precision" | "float8" => SqlType::Double,
            "numeric" | "decimal" | "money" => SqlType::Numeric,
            "blob" | "tinyblob" | "mediumblob" | "longblob" | "bytea" => SqlType::Blob,
            "binary" | "varbinary" => SqlType::Varbinary,
            "char" | "nchar" | "character" => SqlType::Char,
            "varchar" | "nvarchar" | "character varying" => SqlType::Varchar,
            "text" | "tinytext" | "mediumtext" | "longtext" | "clob" | "string" => SqlType::Text,
            "json" | "jsonb" => SqlType::Json,
            "uuid" | "uniqueidentifier" => SqlType::Uuid,
            "date" => SqlType::Date,
            "time" => SqlType::Time,
            "datetime" => SqlType::DateTime,
            "timestamp" | "timestamp without time zone" => SqlType::Timestamp,
            "timestamptz" | "timestamp with time zone" => SqlType::TimestampTz,
            other => SqlType::Unknown(other.to_string()),
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            SqlType::Bool => ValueKind::Bool,
            SqlType::Tinyint => ValueKind::I8,
            SqlType::Smallint => ValueKind::I16,
            SqlType::Int => ValueKind::I32,
            SqlType::Bigint => ValueKind::I64,
            SqlType::Float => ValueKind::F32,
            SqlType::Real | SqlType::Double => ValueKind::F64,
            SqlType::Numeric => ValueKind::Decimal,
            SqlType::Blob | SqlType::Varbinary => ValueKind::Bytes,
            SqlType::Char | SqlType::Varchar | SqlType::Text => ValueKind::String,
            SqlType::Json => ValueKind::Json,
            SqlType::Uuid => ValueKind::Uuid,
            SqlType::Date => ValueKind::Date,
            SqlType::Time => ValueKind::Time,
            SqlType::DateTime | SqlType::Timestamp => ValueKind::DateTime,
            SqlType::TimestampTz => ValueKind::Timestamp,
            SqlType::Unknown(_) => ValueKind::Any,
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
