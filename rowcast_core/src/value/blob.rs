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

use crate::{DataError, FromValue, Value};

/// Binary column content. Kept distinct from `Vec<u8>` so a byte column maps
/// as one scalar rather than as a collection of `u8` elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Blob(pub Vec<u8>);

impl Blob {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Blob {
    fn from(data: Vec<u8>) -> Self {
        Blob(data)
    }
}

impl From<Blob> for Vec<u8> {
    fn from(blob: Blob) -> Self {
        blob.0
    }
}

impl From<Blob> for Value {
    fn from(blob: Blob) -> Self {
        Value::Blob(blob.0)
    }
}

impl FromValue for Blob {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Blob(data) => Ok(Blob(data.clone())),
            Value::Text(s) => Ok(Blob(s.as_bytes().to_vec())),
            Value::Uuid(u) => Ok(Blob(u.as_bytes().to_vec())),
            _ => Err(DataError::type_mismatch_error("Vec<u8>", format!("{:?}", value))),
        }
    }
}
