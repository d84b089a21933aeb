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

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::hash::Hash;
use std::sync::Arc;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use indexmap::IndexMap;
use rowcast_core::{Blob, Value, ValueKind};
use uuid::Uuid;
use crate::errors::MapError;
use super::*;

macro_rules! impl_mapped_scalar {
    ($($ty: ty => $kind: ident),+ $(,)?) => {
        $(
            impl Mapped for $ty {
                fn shape() -> Shape {
                    Shape::new::<$ty>(ShapeKind::Scalar(ScalarShape::of::<$ty>(ValueKind::$kind)))
                        .with_default(<$ty>::default)
                }
            }
        )+
    }
}

impl_mapped_scalar!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => U64,
    f32 => F32,
    f64 => F64,
    BigDecimal => Decimal,
    String => String,
    char => Char,
    Blob => Bytes,
    serde_json::Value => Json,
    Uuid => Uuid,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    DateTime<Utc> => Timestamp,
);

impl Mapped for Value {
    fn shape() -> Shape {
        Shape::new::<Value>(ShapeKind::Any).with_default(|| Value::Null)
    }
}

impl<T: Mapped> Mapped for Option<T> {
    fn shape() -> Shape {
        let inner = T::shape();
        let kind = match inner.kind() {
            ShapeKind::Scalar(scalar) => ShapeKind::Scalar(scalar.nullable::<T>()),
            _ => ShapeKind::Optional(OptionalShape::new::<T>(inner)),
        };
        Shape::new::<Option<T>>(kind).with_default(|| None::<T>)
    }
}

impl<T: Mapped> Mapped for Box<[T]> {
    fn shape() -> Shape {
        Shape::new::<Box<[T]>>(ShapeKind::Sequence(SequenceShape::array::<Box<[T]>, T>()))
            .with_default(|| Vec::<T>::new().into_boxed_slice())
    }
}

impl<T: Mapped> Mapped for Arc<[T]> {
    fn shape() -> Shape {
        Shape::new::<Arc<[T]>>(ShapeKind::Sequence(SequenceShape::interface::<Arc<[T]>, T>()))
            .with_default(|| Arc::<[T]>::from(Vec::new()))
    }
}

macro_rules! impl_mapped_collection {
    ($($coll: ident $(: $bound: ident $(+ $more: ident)*)?),+ $(,)?) => {
        $(
            impl<T: Mapped $(+ $bound $(+ $more)*)?> Mapped for $coll<T> {
                fn shape() -> Shape {
                    Shape::new::<$coll<T>>(ShapeKind::Sequence(SequenceShape::collection::<$coll<T>, T>()))
                        .with_default($coll::<T>::new)
                }
            }
        )+
    }
}

impl_mapped_collection!(
    Vec,
    VecDeque,
    LinkedList,
    BTreeSet: Ord,
    HashSet: Eq + Hash,
);

macro_rules! impl_mapped_dictionary {
    ($($map: ident),+ $(,)?) => {
        $(
            impl<V: Mapped> Mapped for $map<String, V> {
                fn shape() -> Shape {
                    Shape::new::<$map<String, V>>(ShapeKind::Dictionary(DictionaryShape::concrete::<$map<String, V>, V>()))
                        .with_default($map::<String, V>::new)
                }
            }
        )+
    }
}

impl_mapped_dictionary!(HashMap, BTreeMap, IndexMap);

impl<V: Mapped> Mapped for Arc<HashMap<String, V>> {
    fn shape() -> Shape {
        Shape::new::<Arc<HashMap<String, V>>>(ShapeKind::Dictionary(DictionaryShape::interface::<Arc<HashMap<String, V>>, V>()))
            .with_default(|| Arc::new(HashMap::<String, V>::new()))
    }
}

macro_rules! impl_mapped_tuple {
    ($($name: ident),+) => {
        impl<$($name: Mapped),+> Mapped for ($($name,)+) {
            fn shape() -> Shape {
                let elements: Vec<ShapeFn> = vec![$(<$name as Mapped>::shape),+];
                Shape::new::<($($name,)+)>(ShapeKind::Tuple(TupleShape::new(elements, |parts| {
                    let mut parts = parts.into_iter();
                    let value = ($(
                        unbox::<$name>(parts.next().ok_or_else(MapError::type_mismatch::<$name>)?)?,
                    )+);
                    Ok(Box::new(value) as Boxed)
                })))
            }
        }
    }
}

impl_mapped_tuple!(A);
impl_mapped_tuple!(A, B);
impl_mapped_tuple!(A, B, C);
impl_mapped_tuple!(A, B, C, D);
impl_mapped_tuple!(A, B, C, D, E);
impl_mapped_tuple!(A, B, C, D, E, F);
impl_mapped_tuple!(A, B, C, D, E, F, G);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_scalar_shapes_keep_their_kind() {
        match Option::<i64>::shape().kind() {
            ShapeKind::Scalar(scalar) => {
                assert_eq!(scalar.kind(), ValueKind::I64);
                assert!(scalar.is_nullable());
            }
            _ => panic!("expected a scalar shape"),
        }
    }

    #[test]
    fn option_of_collection_is_optional() {
        assert!(matches!(Option::<Vec<Value>>::shape().kind(), ShapeKind::Optional(_)));
    }

    #[test]
    fn collection_shapes_build_values() {
        let shape = match BTreeSet::<i32>::shape().kind().clone() {
            ShapeKind::Sequence(seq) => seq,
            _ => unreachable!(),
        };
        let mut set = (shape.new_fn().unwrap())(2);
        (shape.add_fn().unwrap())(set.as_mut(), Box::new(3)).unwrap();
        (shape.add_fn().unwrap())(set.as_mut(), Box::new(1)).unwrap();
        let set = unbox::<BTreeSet<i32>>((shape.finish_fn())(set).unwrap()).unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn interface_sequences_finish_into_the_requested_type() {
        let shape = match Arc::<[String]>::shape().kind().clone() {
            ShapeKind::Sequence(seq) => seq,
            _ => unreachable!(),
        };
        assert_eq!(shape.form(), SequenceForm::Interface);
        let mut list = (shape.new_fn().unwrap())(1);
        (shape.add_fn().unwrap())(list.as_mut(), Box::new("a".to_string())).unwrap();
        let list = unbox::<Arc<[String]>>((shape.finish_fn())(list).unwrap()).unwrap();
        assert_eq!(&list[..], ["a".to_string()]);
    }

    #[test]
    fn tuples_build_from_parts() {
        let shape = match <(i32, String)>::shape().kind().clone() {
            ShapeKind::Tuple(tuple) => tuple,
            _ => unreachable!(),
        };
        assert_eq!(shape.arity(), 2);
        let built = (shape.build_fn())(vec![Box::new(7) as Boxed, Box::new("x".to_string()) as Boxed]).unwrap();
        assert_eq!(unbox::<(i32, String)>(built).unwrap(), (7, "x".to_string()));
    }
}
