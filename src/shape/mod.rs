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

//! Shape descriptors: what the compiler knows about a mappable type.
//!
//! Every mappable type implements [`Mapped`] and returns a [`Shape`]. Values
//! travel through a compiled program type-erased as [`Boxed`]; the typed
//! functions stored in a shape know how to build, fill and finish them.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;
use rowcast_core::{DataError, Value, ValueKind};
use crate::errors::MapError;

mod impls;
mod object;

pub use object::*;

/// A type-erased value produced while mapping one row.
pub type Boxed = Box<dyn Any>;

/// Lazily produced child shape, so recursive types can describe themselves.
pub type ShapeFn = fn() -> Shape;

pub type DefaultFn = Arc<dyn Fn() -> Boxed + Send + Sync>;
pub type DecodeFn = Arc<dyn Fn(&Value) -> Result<Boxed, DataError> + Send + Sync>;
pub type NewSequenceFn = fn(usize) -> Boxed;
pub type AddFn = fn(&mut dyn Any, Boxed) -> Result<(), MapError>;
pub type NewDictionaryFn = fn() -> Boxed;
pub type InsertFn = fn(&mut dyn Any, String, Boxed) -> Result<(), MapError>;
pub type FinishFn = fn(Boxed) -> Result<Boxed, MapError>;
pub type WrapFn = fn(Boxed) -> Result<Boxed, MapError>;
pub type TupleFn = Arc<dyn Fn(Vec<Boxed>) -> Result<Boxed, MapError> + Send + Sync>;

/// Types that can be built from a record.
pub trait Mapped: 'static {
    fn shape() -> Shape;
}

#[derive(Clone)]
pub struct Shape {
    type_id: TypeId,
    type_name: &'static str,
    kind: ShapeKind,
    default: Option<DefaultFn>,
}

#[derive(Clone)]
pub enum ShapeKind {
    /// The untyped [`Value`].
    Any,
    Scalar(ScalarShape),
    /// `Option` around a non-scalar shape.
    Optional(OptionalShape),
    Sequence(SequenceShape),
    Dictionary(DictionaryShape),
    Tuple(TupleShape),
    Object(ObjectShape),
    /// A type with no structure the compiler can use.
    Opaque,
}

impl Shape {
    pub fn new<T: 'static>(kind: ShapeKind) -> Shape {
        Shape {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            kind,
            default: None,
        }
    }

    pub fn opaque<T: 'static>() -> Shape {
        Shape::new::<T>(ShapeKind::Opaque)
    }

    /// Opaque shape whose default is `T::default()`, used when it is the
    /// base of a subclass mapping.
    pub fn opaque_with_default<T: Default + 'static>() -> Shape {
        Shape::opaque::<T>().with_default(T::default)
    }

    pub fn with_default<V, F>(mut self, default: F) -> Shape
    where
        V: 'static,
        F: Fn() -> V + Send + Sync + 'static,
    {
        self.default = Some(Arc::new(move || Box::new(default()) as Boxed));
        self
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type name without its module path, for signatures and logs.
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.type_name)
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn default_fn(&self) -> Option<&DefaultFn> {
        self.default.as_ref()
    }

    pub fn default_value(&self) -> Option<Boxed> {
        self.default.as_ref().map(|f| f())
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            ShapeKind::Any => "any",
            ShapeKind::Scalar(_) => "scalar",
            ShapeKind::Optional(_) => "optional",
            ShapeKind::Sequence(_) => "sequence",
            ShapeKind::Dictionary(_) => "dictionary",
            ShapeKind::Tuple(_) => "tuple",
            ShapeKind::Object(_) => "object",
            ShapeKind::Opaque => "opaque",
        };
        f.debug_struct("Shape").field("type_name", &self.type_name).field("kind", &kind).finish()
    }
}

pub(crate) fn short_type_name(name: &'static str) -> &'static str {
    if name.starts_with(['(', '[', '&']) {
        return name;
    }
    let base = match name.find('<') {
        Some(pos) => &name[..pos],
        None => name,
    };
    match base.rfind("::") {
        Some(pos) => &base[pos + 2..],
        _ => name,
    }
}

/// Downcasts a boxed value, reporting the expected type on failure.
pub fn unbox<T: 'static>(value: Boxed) -> Result<T, MapError> {
    value.downcast::<T>().map(|v| *v).map_err(|_| MapError::type_mismatch::<T>())
}

pub(crate) fn unbox_mut<T: 'static>(value: &mut dyn Any) -> Result<&mut T, MapError> {
    value.downcast_mut::<T>().ok_or_else(MapError::type_mismatch::<T>)
}

/// A primitive target: how to decode it from a raw value and what its
/// default is.
#[derive(Clone)]
pub struct ScalarShape {
    kind: ValueKind,
    nullable: bool,
    decode: DecodeFn,
    default: DefaultFn,
}

impl ScalarShape {
    pub fn of<T>(kind: ValueKind) -> ScalarShape
    where
        T: rowcast_core::FromValue + Default + 'static,
    {
        ScalarShape::with(kind, T::from_value_opt, T::default)
    }

    /// Scalar with caller-supplied decoding, e.g. for a newtype over a
    /// string column.
    pub fn with<T, D, F>(kind: ValueKind, decode: D, default: F) -> ScalarShape
    where
        T: 'static,
        D: Fn(&Value) -> Result<T, DataError> + Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        ScalarShape {
            kind,
            nullable: false,
            decode: Arc::new(move |value| decode(value).map(|v| Box::new(v) as Boxed)),
            default: Arc::new(move || Box::new(default()) as Boxed),
        }
    }

    /// The `Option<T>` form of this scalar, where `T` is the type this shape
    /// decodes to.
    pub fn nullable<T: 'static>(&self) -> ScalarShape {
        let inner = self.decode.clone();
        ScalarShape {
            kind: self.kind,
            nullable: true,
            decode: Arc::new(move |value| {
                let decoded = inner(value)?;
                decoded
                    .downcast::<T>()
                    .map(|v| Box::new(Some(*v)) as Boxed)
                    .map_err(|_| DataError::type_mismatch_error(type_name::<T>(), "decoded scalar"))
            }),
            default: Arc::new(|| Box::new(None::<T>) as Boxed),
        }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn decode(&self, value: &Value) -> Result<Boxed, DataError> {
        (self.decode)(value)
    }

    pub fn default_value(&self) -> Boxed {
        (self.default)()
    }

    pub(crate) fn default_fn(&self) -> DefaultFn {
        self.default.clone()
    }
}

#[derive(Clone)]
pub struct OptionalShape {
    inner: Box<Shape>,
    some: WrapFn,
    none: fn() -> Boxed,
}

impl OptionalShape {
    pub fn new<T: 'static>(inner: Shape) -> OptionalShape {
        fn some<T: 'static>(value: Boxed) -> Result<Boxed, MapError> {
            unbox::<T>(value).map(|v| Box::new(Some(v)) as Boxed)
        }
        fn none<T: 'static>() -> Boxed {
            Box::new(None::<T>)
        }
        OptionalShape {
            inner: Box::new(inner),
            some: some::<T>,
            none: none::<T>,
        }
    }

    pub fn inner(&self) -> &Shape {
        &self.inner
    }

    pub fn some_fn(&self) -> WrapFn {
        self.some
    }

    pub fn none_fn(&self) -> fn() -> Boxed {
        self.none
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceForm {
    /// Fixed-size array built from an element count.
    Array,
    /// A concrete collection type with its own constructor and add method.
    Concrete,
    /// A collection abstraction filled through a fresh backing list.
    Interface,
}

/// Collection-like shape. For `Interface` forms `new` and `add` operate on
/// the backing list and `finish` converts it into the requested type.
#[derive(Clone)]
pub struct SequenceShape {
    form: SequenceForm,
    element: ShapeFn,
    new: Option<NewSequenceFn>,
    add: Option<AddFn>,
    finish: FinishFn,
}

fn new_vec<T: 'static>(capacity: usize) -> Boxed {
    Box::new(Vec::<T>::with_capacity(capacity))
}

fn new_default<C: Default + 'static>(_capacity: usize) -> Boxed {
    Box::new(C::default())
}

fn extend_one<C: Extend<T> + 'static, T: 'static>(target: &mut dyn Any, value: Boxed) -> Result<(), MapError> {
    let value = unbox::<T>(value)?;
    unbox_mut::<C>(target)?.extend(std::iter::once(value));
    Ok(())
}

fn finish_identity(value: Boxed) -> Result<Boxed, MapError> {
    Ok(value)
}

fn finish_into<B: 'static, C: From<B> + 'static>(value: Boxed) -> Result<Boxed, MapError> {
    unbox::<B>(value).map(|v| Box::new(C::from(v)) as Boxed)
}

impl SequenceShape {
    /// `Box<[T]>`-like array: sized up front, then filled.
    pub fn array<C: From<Vec<T>> + 'static, T: Mapped>() -> SequenceShape {
        SequenceShape {
            form: SequenceForm::Array,
            element: T::shape,
            new: Some(new_vec::<T>),
            add: Some(extend_one::<Vec<T>, T>),
            finish: finish_into::<Vec<T>, C>,
        }
    }

    /// A concrete collection with a default constructor and `Extend`.
    pub fn collection<C: Default + Extend<T> + 'static, T: Mapped>() -> SequenceShape {
        SequenceShape {
            form: SequenceForm::Concrete,
            element: T::shape,
            new: Some(new_default::<C>),
            add: Some(extend_one::<C, T>),
            finish: finish_identity,
        }
    }

    /// A concrete collection described by hand; a missing constructor or add
    /// method is reported when the type is compiled.
    pub fn concrete(element: ShapeFn, new: Option<NewSequenceFn>, add: Option<AddFn>) -> SequenceShape {
        SequenceShape {
            form: SequenceForm::Concrete,
            element,
            new,
            add,
            finish: finish_identity,
        }
    }

    /// A collection abstraction backed by a fresh `Vec<T>`.
    pub fn interface<C: From<Vec<T>> + 'static, T: Mapped>() -> SequenceShape {
        SequenceShape {
            form: SequenceForm::Interface,
            element: T::shape,
            new: Some(new_vec::<T>),
            add: Some(extend_one::<Vec<T>, T>),
            finish: finish_into::<Vec<T>, C>,
        }
    }

    pub fn form(&self) -> SequenceForm {
        self.form
    }

    pub fn element(&self) -> Shape {
        (self.element)()
    }

    pub fn new_fn(&self) -> Option<NewSequenceFn> {
        self.new
    }

    pub fn add_fn(&self) -> Option<AddFn> {
        self.add
    }

    pub fn finish_fn(&self) -> FinishFn {
        self.finish
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryForm {
    Concrete,
    /// Filled through a fresh backing `HashMap<String, V>`.
    Interface,
}

/// String-keyed dictionary shape.
#[derive(Clone)]
pub struct DictionaryShape {
    form: DictionaryForm,
    value: ShapeFn,
    new: Option<NewDictionaryFn>,
    insert: Option<InsertFn>,
    finish: FinishFn,
}

fn new_map<M: Default + 'static>() -> Boxed {
    Box::new(M::default())
}

fn insert_entry<M: Extend<(String, V)> + 'static, V: 'static>(target: &mut dyn Any, key: String, value: Boxed) -> Result<(), MapError> {
    let value = unbox::<V>(value)?;
    unbox_mut::<M>(target)?.extend(std::iter::once((key, value)));
    Ok(())
}

impl DictionaryShape {
    pub fn concrete<M: Default + Extend<(String, V)> + 'static, V: Mapped>() -> DictionaryShape {
        DictionaryShape {
            form: DictionaryForm::Concrete,
            value: V::shape,
            new: Some(new_map::<M>),
            insert: Some(insert_entry::<M, V>),
            finish: finish_identity,
        }
    }

    /// A dictionary described by hand; missing operations are reported when
    /// the type is compiled.
    pub fn custom(value: ShapeFn, new: Option<NewDictionaryFn>, insert: Option<InsertFn>) -> DictionaryShape {
        DictionaryShape {
            form: DictionaryForm::Concrete,
            value,
            new,
            insert,
            finish: finish_identity,
        }
    }

    pub fn interface<C: From<std::collections::HashMap<String, V>> + 'static, V: Mapped>() -> DictionaryShape {
        type Backing<V> = std::collections::HashMap<String, V>;
        DictionaryShape {
            form: DictionaryForm::Interface,
            value: V::shape,
            new: Some(new_map::<Backing<V>>),
            insert: Some(insert_entry::<Backing<V>, V>),
            finish: finish_into::<Backing<V>, C>,
        }
    }

    pub fn form(&self) -> DictionaryForm {
        self.form
    }

    pub fn value(&self) -> Shape {
        (self.value)()
    }

    pub fn new_fn(&self) -> Option<NewDictionaryFn> {
        self.new
    }

    pub fn insert_fn(&self) -> Option<InsertFn> {
        self.insert
    }

    pub fn finish_fn(&self) -> FinishFn {
        self.finish
    }
}

#[derive(Clone)]
pub struct TupleShape {
    elements: Vec<ShapeFn>,
    build: TupleFn,
}

impl TupleShape {
    pub fn new<F>(elements: Vec<ShapeFn>, build: F) -> TupleShape
    where
        F: Fn(Vec<Boxed>) -> Result<Boxed, MapError> + Send + Sync + 'static,
    {
        TupleShape { elements, build: Arc::new(build) }
    }

    pub fn arity(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> impl Iterator<Item = Shape> + '_ {
        self.elements.iter().map(|f| f())
    }

    pub fn build_fn(&self) -> TupleFn {
        self.build.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names_drop_module_paths() {
        assert_eq!(short_type_name("my_crate::models::User"), "User");
        assert_eq!(short_type_name("alloc::vec::Vec<my_crate::User>"), "Vec");
        assert_eq!(short_type_name("i32"), "i32");
        assert_eq!(short_type_name("(i32, alloc::string::String)"), "(i32, alloc::string::String)");
    }

    #[test]
    fn nullable_scalars_wrap_decoded_values() {
        let scalar = ScalarShape::of::<i32>(ValueKind::I32).nullable::<i32>();
        let decoded = scalar.decode(&Value::Bigint(4)).unwrap();
        assert_eq!(unbox::<Option<i32>>(decoded).unwrap(), Some(4));
        assert_eq!(unbox::<Option<i32>>(scalar.default_value()).unwrap(), None);
        assert!(scalar.is_nullable());
    }

    #[test]
    fn unbox_reports_expected_type() {
        let err = unbox::<String>(Box::new(1u8)).unwrap_err();
        assert!(err.to_string().contains("String"));
    }
}
