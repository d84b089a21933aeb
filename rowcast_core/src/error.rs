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

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: String,
        found: String,
    },
    #[error("NotSupported  `{0}` :`{1}`")]
    NotSupported(String, String),
    #[error("Cannot convert null value to {target_type}")]
    NullValue {
        target_type: String,
    },
    #[error("Conversion failed: {message}")]
    ConversionError {
        message: String,
    },
    #[error("Numeric overflow when converting to {target_type}")]
    NumericOverflow {
        target_type: String,
    },
    #[error("Parse error: {message}")]
    ParseError {
        message: String,
    },
}

impl From<serde_json::Error> for ConversionError {
    fn from(err: serde_json::Error) -> Self {
        ConversionError::NotSupported(err.to_string(), "SerdeJson".to_string())
    }
}

impl ConversionError {
    pub fn conversion_error<T: Into<String>>(err: T) -> Self {
        Self::ConversionError { message: err.into() }
    }

    pub fn parse_error<T: Into<String>>(err: T) -> Self {
        Self::ParseError { message: err.into() }
    }

    pub fn type_mismatch_error<T: Into<String>, E: Into<String>>(expected: T, found: E) -> Self {
        Self::TypeMismatch { expected: expected.into(), found: found.into() }
    }

    pub fn numeric_overflow_error<T: Into<String>>(target_type: T) -> Self {
        Self::NumericOverflow { target_type: target_type.into() }
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, ConversionError::NumericOverflow { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("No Such Value Error: {0}")]
    NoSuchValueError(String),
    #[error("No Such Field Error: {0}")]
    NoSuchFieldError(String),
    #[error("Conversion Data Error: {0}")]
    ConversionError(#[from] ConversionError),
    #[error("IndexOutOfBoundsException: Index: {0}, Size: {1}")]
    IndexOutOfBounds(usize, usize),
    #[error("Serialize Error: {0}")]
    SerializeError(String),
}

impl DataError {
    pub fn conversion_error<T: Into<String>>(err: T) -> Self {
        Self::ConversionError(ConversionError::conversion_error(err))
    }

    pub fn parse_error<T: Into<String>>(err: T) -> Self {
        Self::ConversionError(ConversionError::parse_error(err))
    }

    pub fn type_mismatch_error<T: Into<String>, E: Into<String>>(expected: T, found: E) -> Self {
        Self::ConversionError(ConversionError::type_mismatch_error(expected, found))
    }

    pub fn not_supported_error<T: Into<String>, E: Into<String>>(field: T, expected: E) -> Self {
        Self::ConversionError(ConversionError::NotSupported(field.into(), expected.into()))
    }

    pub fn null_value_error<T: Into<String>>(target_type: T) -> Self {
        Self::ConversionError(ConversionError::NullValue { target_type: target_type.into() })
    }

    pub fn numeric_overflow_error<T: Into<String>>(target_type: T) -> Self {
        Self::ConversionError(ConversionError::numeric_overflow_error(target_type))
    }

    /// True when the failure came from a value outside the target's range.
    pub fn is_overflow(&self) -> bool {
        match self {
            DataError::ConversionError(err) => err.is_overflow(),
            _ => false,
        }
    }
}
