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

//! Scalar conversion rules, chosen per (declared column kind, target kind)
//! pair when a mapper is compiled.

use rowcast_core::{DataError, Value, ValueKind};
use uuid::Uuid;
use crate::errors::MapError;
use crate::shape::{Boxed, ScalarShape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarRule {
    /// Target is the untyped value: hand the raw value over.
    PassThrough,
    /// Provider declared no type: select a rule from each raw value.
    Dynamic,
    Identity,
    Stringify,
    Numeric,
    /// Nonzero is true. NULL is false, including for `Option<bool>`.
    BoolFromNumeric,
    GuidFromString,
    Generic,
    /// No conversion exists; the target default is produced.
    Default,
}

impl ScalarRule {
    /// Most specific rule first. `target` is `ValueKind::Any` for the
    /// untyped value.
    pub fn select(declared: ValueKind, target: ValueKind) -> ScalarRule {
        if target == ValueKind::Any {
            ScalarRule::PassThrough
        } else if declared == ValueKind::Any {
            ScalarRule::Dynamic
        } else if declared == target {
            ScalarRule::Identity
        } else if target == ValueKind::String {
            ScalarRule::Stringify
        } else if declared.is_numeric() && target.is_numeric() {
            ScalarRule::Numeric
        } else if target.is_boolean() && declared.is_numeric() {
            ScalarRule::BoolFromNumeric
        } else if declared == ValueKind::String && target == ValueKind::Uuid {
            ScalarRule::GuidFromString
        } else if declared.is_convertible() && target.is_convertible() {
            ScalarRule::Generic
        } else {
            ScalarRule::Default
        }
    }
}

/// A compiled conversion for one column into one member.
#[derive(Clone)]
pub struct ScalarConverter {
    rule: ScalarRule,
    target: Option<ScalarShape>,
    member: String,
    column: String,
}

impl ScalarConverter {
    pub fn new(rule: ScalarRule, target: Option<ScalarShape>, member: String, column: String) -> ScalarConverter {
        ScalarConverter { rule, target, member, column }
    }

    pub fn rule(&self) -> ScalarRule {
        self.rule
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn convert(&self, raw: &Value) -> Result<Boxed, MapError> {
        let target = match &self.target {
            Some(target) => target,
            None => return Ok(Box::new(raw.clone())),
        };
        let rule = match self.rule {
            ScalarRule::Dynamic if !raw.is_null() => match ScalarRule::select(raw.kind(), target.kind()) {
                ScalarRule::Dynamic => ScalarRule::Generic,
                rule => rule,
            },
            rule => rule,
        };
        if raw.is_null() {
            return match rule {
                ScalarRule::BoolFromNumeric => self.decode(target, &Value::Bool(false)),
                _ => Ok(target.default_value()),
            };
        }
        match rule {
            ScalarRule::PassThrough => Ok(Box::new(raw.clone())),
            ScalarRule::Identity | ScalarRule::Numeric | ScalarRule::Generic | ScalarRule::Dynamic => self.decode(target, raw),
            ScalarRule::Stringify => self.decode(target, &Value::Text(raw.coerce_to_string())),
            ScalarRule::BoolFromNumeric => {
                if raw.is_number() {
                    self.decode(target, &Value::Bool(!raw.is_zero()))
                } else {
                    self.decode(target, raw)
                }
            }
            ScalarRule::GuidFromString => match raw {
                Value::Text(text) => match Uuid::parse_str(text.trim()) {
                    Ok(uuid) => self.decode(target, &Value::Uuid(uuid)),
                    Err(_) => Err(MapError::InvalidGuid {
                        member: self.member.clone(),
                        column: self.column.clone(),
                        value: text.clone(),
                    }),
                },
                other => self.decode(target, other),
            },
            ScalarRule::Default => Ok(target.default_value()),
        }
    }

    fn decode(&self, target: &ScalarShape, raw: &Value) -> Result<Boxed, MapError> {
        target.decode(raw).map_err(|err| self.error(target, err))
    }

    fn error(&self, target: &ScalarShape, err: DataError) -> MapError {
        if err.is_overflow() {
            MapError::NumericOverflow {
                member: self.member.clone(),
                column: self.column.clone(),
                target: target.kind().name(),
            }
        } else {
            MapError::Conversion {
                member: self.member.clone(),
                column: self.column.clone(),
                target: target.kind().name(),
                source: err,
            }
        }
    }
}
