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

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use crate::errors::MapError;
use super::{short_type_name, unbox, unbox_mut, Boxed, DefaultFn, Mapped, Shape, ShapeFn, ShapeKind};

pub type InvokeFn = Arc<dyn Fn(&mut Args) -> Result<Boxed, MapError> + Send + Sync>;
pub type SetterFn = Arc<dyn Fn(&mut dyn Any, Boxed) -> Result<(), MapError> + Send + Sync>;

/// A constructor parameter.
#[derive(Clone)]
pub struct Param {
    name: String,
    shape: ShapeFn,
}

impl Param {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> Shape {
        (self.shape)()
    }

    pub(crate) fn shape_fn(&self) -> ShapeFn {
        self.shape
    }
}

/// Positional arguments handed to a constructor body.
pub struct Args {
    values: std::vec::IntoIter<Boxed>,
    position: usize,
}

impl Args {
    pub(crate) fn new(values: Vec<Boxed>) -> Args {
        Args { values: values.into_iter(), position: 0 }
    }

    /// Takes the next argument as a `T`.
    #[allow(clippy::should_implement_trait)]
    pub fn next<T: 'static>(&mut self) -> Result<T, MapError> {
        self.position += 1;
        match self.values.next() {
            Some(value) => unbox::<T>(value),
            None => Err(MapError::type_mismatch::<T>()),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

/// A way to create an object from an ordered list of parameters.
#[derive(Clone)]
pub struct Constructor {
    name: String,
    signature: String,
    declaring: TypeId,
    declaring_name: &'static str,
    public: bool,
    is_static: bool,
    params: Vec<Param>,
    invoke: InvokeFn,
}

impl Constructor {
    #[allow(clippy::new_ret_no_self)]
    pub fn new<T: 'static>(name: &str) -> ConstructorBuilder<T> {
        ConstructorBuilder {
            name: name.to_string(),
            declaring: TypeId::of::<T>(),
            declaring_name: type_name::<T>(),
            public: true,
            is_static: false,
            params: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// e.g. `User::new(id: i32, name: String)`.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn declaring_type(&self) -> TypeId {
        self.declaring
    }

    pub fn declaring_type_name(&self) -> &'static str {
        self.declaring_name
    }

    pub fn is_public(&self) -> bool {
        self.public
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn invoke(&self, args: Vec<Boxed>) -> Result<Boxed, MapError> {
        (self.invoke)(&mut Args::new(args))
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature)
    }
}

pub struct ConstructorBuilder<T> {
    name: String,
    declaring: TypeId,
    declaring_name: &'static str,
    public: bool,
    is_static: bool,
    params: Vec<Param>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> ConstructorBuilder<T> {
    pub fn param<P: Mapped>(mut self, name: &str) -> Self {
        self.params.push(Param { name: name.to_string(), shape: P::shape });
        self
    }

    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    /// Marks this as an associated function rather than an instance
    /// constructor; such entries are never invoked by the mapper.
    pub fn associated(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Records `D` as the declaring type instead of `T`.
    pub fn declared_by<D: 'static>(mut self) -> Self {
        self.declaring = TypeId::of::<D>();
        self.declaring_name = type_name::<D>();
        self
    }

    pub fn build<F>(self, body: F) -> Constructor
    where
        F: Fn(&mut Args) -> Result<T, MapError> + Send + Sync + 'static,
    {
        let params = self
            .params
            .iter()
            .map(|p| format!("{}: {}", p.name, short_type_name(p.shape().type_name())))
            .collect::<Vec<_>>()
            .join(", ");
        let signature = format!("{}::{}({})", short_type_name(type_name::<T>()), self.name, params);
        Constructor {
            name: self.name,
            signature,
            declaring: self.declaring,
            declaring_name: self.declaring_name,
            public: self.public,
            is_static: self.is_static,
            params: self.params,
            invoke: Arc::new(move |args| body(args).map(|v| Box::new(v) as Boxed)),
        }
    }
}

/// A settable member of an object.
#[derive(Clone)]
pub struct Property {
    name: String,
    alias: Option<String>,
    unnamed: bool,
    shape: ShapeFn,
    set: SetterFn,
}

impl Property {
    pub fn new<S, F, A>(name: &str, set: A) -> Property
    where
        S: 'static,
        F: Mapped,
        A: Fn(&mut S, F) + Send + Sync + 'static,
    {
        Property {
            name: name.to_string(),
            alias: None,
            unnamed: false,
            shape: F::shape,
            set: Arc::new(move |target, value| {
                let value = unbox::<F>(value)?;
                set(unbox_mut::<S>(target)?, value);
                Ok(())
            }),
        }
    }

    /// Alternate column name tried when no column matches the member name.
    pub fn alias<N: Into<String>>(mut self, alias: N) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Lets this member bind to a column the provider reported without a name.
    pub fn unnamed(mut self) -> Self {
        self.unnamed = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn accepts_unnamed(&self) -> bool {
        self.unnamed
    }

    pub fn shape(&self) -> Shape {
        (self.shape)()
    }

    pub(crate) fn setter(&self) -> SetterFn {
        self.set.clone()
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property").field("name", &self.name).field("alias", &self.alias).finish()
    }
}

/// Constructors and settable members of a user-defined type.
#[derive(Clone, Debug)]
pub struct ObjectShape {
    constructors: Vec<Constructor>,
    properties: Vec<Property>,
}

impl ObjectShape {
    pub fn builder<T: 'static>() -> ObjectShapeBuilder<T> {
        ObjectShapeBuilder {
            constructors: Vec::new(),
            properties: Vec::new(),
            default: None,
            _marker: PhantomData,
        }
    }

    /// Constructors in declaration order.
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn parameterless(&self) -> Option<&Constructor> {
        self.constructors.iter().find(|c| c.arity() == 0 && c.is_public() && !c.is_static())
    }
}

pub struct ObjectShapeBuilder<T> {
    constructors: Vec<Constructor>,
    properties: Vec<Property>,
    default: Option<DefaultFn>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> ObjectShapeBuilder<T> {
    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn build(self) -> Shape {
        let mut shape = Shape::new::<T>(ShapeKind::Object(ObjectShape {
            constructors: self.constructors,
            properties: self.properties,
        }));
        shape.default = self.default;
        shape
    }
}

impl<T: Default + 'static> ObjectShapeBuilder<T> {
    /// Adds a parameterless constructor backed by `T::default()`, which also
    /// serves as the type's default value.
    pub fn default_constructor(mut self) -> Self {
        self.constructors.push(Constructor::new::<T>("default").build(|_| Ok(T::default())));
        self.default = Some(Arc::new(|| Box::new(T::default()) as Boxed));
        self
    }
}
