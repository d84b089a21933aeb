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

//! Routing of a requested shape to the strategy that builds it.

use std::fmt;
use crate::shape::{DictionaryForm, SequenceForm, Shape, ShapeKind};

pub const MAX_TUPLE_ARITY: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Any,
    Scalar,
    Optional,
    Array,
    UntypedEnumerable,
    ConcreteDictionary,
    AbstractDictionary,
    AbstractCollection,
    ConcreteCollection,
    Tuple(usize),
    CustomObject,
    Unmappable,
}

impl Classification {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Classification::Scalar)
    }

    pub fn is_sequence(&self) -> bool {
        matches!(
            self,
            Classification::Array
                | Classification::UntypedEnumerable
                | Classification::AbstractCollection
                | Classification::ConcreteCollection
        )
    }

    pub fn is_dictionary(&self) -> bool {
        matches!(self, Classification::ConcreteDictionary | Classification::AbstractDictionary)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Any => f.write_str("any"),
            Classification::Scalar => f.write_str("scalar"),
            Classification::Optional => f.write_str("optional"),
            Classification::Array => f.write_str("array"),
            Classification::UntypedEnumerable => f.write_str("untyped enumerable"),
            Classification::ConcreteDictionary => f.write_str("concrete dictionary"),
            Classification::AbstractDictionary => f.write_str("abstract dictionary"),
            Classification::AbstractCollection => f.write_str("abstract collection"),
            Classification::ConcreteCollection => f.write_str("concrete collection"),
            Classification::Tuple(arity) => write!(f, "tuple/{}", arity),
            Classification::CustomObject => f.write_str("custom object"),
            Classification::Unmappable => f.write_str("unmappable"),
        }
    }
}

/// First-match classification of `shape`.
pub fn classify(shape: &Shape) -> Classification {
    match shape.kind() {
        ShapeKind::Any => Classification::Any,
        ShapeKind::Scalar(_) => Classification::Scalar,
        ShapeKind::Optional(_) => Classification::Optional,
        ShapeKind::Sequence(seq) => {
            if seq.form() == SequenceForm::Array {
                Classification::Array
            } else if matches!(seq.element().kind(), ShapeKind::Any) {
                Classification::UntypedEnumerable
            } else if seq.form() == SequenceForm::Interface {
                Classification::AbstractCollection
            } else {
                Classification::ConcreteCollection
            }
        }
        ShapeKind::Dictionary(dict) => match dict.form() {
            DictionaryForm::Concrete => Classification::ConcreteDictionary,
            DictionaryForm::Interface => Classification::AbstractDictionary,
        },
        ShapeKind::Tuple(tuple) if (1..=MAX_TUPLE_ARITY).contains(&tuple.arity()) => Classification::Tuple(tuple.arity()),
        ShapeKind::Tuple(_) => Classification::Unmappable,
        ShapeKind::Object(_) => Classification::CustomObject,
        ShapeKind::Opaque => Classification::Unmappable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Mapped;
    use crate::shape::{ShapeFn, TupleShape};
    use rowcast_core::Value;
    use std::collections::{BTreeMap, HashMap, HashSet};
    use std::sync::Arc;
    use uuid::Uuid;

    #[test]
    fn scalars_and_nullable_forms() {
        assert_eq!(classify(&i32::shape()), Classification::Scalar);
        assert_eq!(classify(&Option::<Option<i32>>::shape()), Classification::Scalar);
        assert_eq!(classify(&Uuid::shape()), Classification::Scalar);
        assert_eq!(classify(&String::shape()), Classification::Scalar);
        assert_eq!(classify(&Value::shape()), Classification::Any);
    }

    #[test]
    fn sequences() {
        assert_eq!(classify(&Box::<[i32]>::shape()), Classification::Array);
        assert_eq!(classify(&Box::<[Value]>::shape()), Classification::Array);
        assert_eq!(classify(&Vec::<Value>::shape()), Classification::UntypedEnumerable);
        assert_eq!(classify(&Arc::<[i64]>::shape()), Classification::AbstractCollection);
        assert_eq!(classify(&Vec::<i64>::shape()), Classification::ConcreteCollection);
        assert_eq!(classify(&HashSet::<String>::shape()), Classification::ConcreteCollection);
    }

    #[test]
    fn dictionaries_and_tuples() {
        assert_eq!(classify(&HashMap::<String, i32>::shape()), Classification::ConcreteDictionary);
        assert_eq!(classify(&BTreeMap::<String, Value>::shape()), Classification::ConcreteDictionary);
        assert_eq!(classify(&Arc::<HashMap<String, i32>>::shape()), Classification::AbstractDictionary);
        assert_eq!(classify(&<(i32, Option<String>)>::shape()), Classification::Tuple(2));
        assert_eq!(classify(&Option::<Vec<i32>>::shape()), Classification::Optional);
    }

    #[test]
    fn unmappable_shapes() {
        struct Handle;
        assert_eq!(classify(&Shape::opaque::<Handle>()), Classification::Unmappable);
        let wide = TupleShape::new(vec![i32::shape as ShapeFn; 8], |_| Err(crate::errors::MapError::type_mismatch::<()>()));
        assert_eq!(classify(&Shape::new::<()>(ShapeKind::Tuple(wide))), Classification::Unmappable);
    }
}
