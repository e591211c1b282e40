//! Declaring the attributes of a type
//!
//! Rust has no runtime reflection, so a type makes its attributes discoverable by implementing [`Inspect`], usually
//! through the [`declare_attributes!`](crate::declare_attributes) macro. Every declaration consists of a name, a
//! declared type, a scope (instance or static), a set of markers and an accessor reading the current value.

#![deny(unsafe_code)]

use std::error::Error as StdError;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::error::EvaluationError;
use crate::type_ref::{Marker, MarkerRef, TypeRef};
use crate::value::{AttributeType, FieldValue};

pub(crate) type InstanceRead<O> = Arc<dyn Fn(&O) -> Result<FieldValue, EvaluationError> + Send + Sync>;
pub(crate) type StaticRead = Arc<dyn Fn() -> Result<FieldValue, EvaluationError> + Send + Sync>;

/// Trait for types whose attributes can be resolved
///
/// # Example
/// ```
/// use std::sync::atomic::{AtomicI32, Ordering};
///
/// use fieldpoll::{Declarations, Inspect};
///
/// struct Counter {
///     count: AtomicI32,
/// }
///
/// impl Inspect for Counter {
///     fn declare(declarations: &mut Declarations<Self>) {
///         declarations.field("count", |counter: &Counter| counter.count.load(Ordering::SeqCst));
///     }
/// }
/// ```
pub trait Inspect: Sized + 'static {
    /// Declares the attributes of `Self`
    fn declare(declarations: &mut Declarations<Self>);
}

/// The scope of an attribute
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Scope {
    /// The attribute belongs to an instance and can only be read given an instance
    Instance,

    /// The attribute belongs to the type itself and can be read without an instance
    Static,
}

pub(crate) enum Accessor<O> {
    Instance(InstanceRead<O>),
    Static(StaticRead),
}

impl<O> Accessor<O> {
    fn scope(&self) -> Scope {
        match self {
            Self::Instance(_) => Scope::Instance,
            Self::Static(_) => Scope::Static,
        }
    }
}

impl<O> Clone for Accessor<O> {
    fn clone(&self) -> Self {
        match self {
            Self::Instance(read) => Self::Instance(Arc::clone(read)),
            Self::Static(read) => Self::Static(Arc::clone(read)),
        }
    }
}

/// A declared attribute of a type `O`
///
/// The attribute may have been declared by `O` itself or inherited from a base type, see
/// [`Declarations::inherit`].
pub struct Attribute<O> {
    owner: TypeRef,
    name: &'static str,
    declared_type: TypeRef,
    markers: Vec<MarkerRef>,
    depth: usize,
    accessor: Accessor<O>,
}

impl<O> Attribute<O> {
    /// Returns the type that declares this attribute
    pub fn owner(&self) -> TypeRef {
        self.owner
    }

    /// Returns the name of this attribute
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared type of this attribute
    pub fn declared_type(&self) -> TypeRef {
        self.declared_type
    }

    /// Returns the markers attached to this attribute
    pub fn markers(&self) -> &[MarkerRef] {
        &self.markers
    }

    /// Returns whether the given marker is attached to this attribute
    pub fn has_marker(&self, marker: MarkerRef) -> bool {
        self.markers.contains(&marker)
    }

    /// Returns the scope of this attribute
    pub fn scope(&self) -> Scope {
        self.accessor.scope()
    }

    /// Returns the number of inheritance steps between the inspected type and the declaring type
    ///
    /// This is `0` for attributes declared by the inspected type itself.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn accessor(&self) -> &Accessor<O> {
        &self.accessor
    }
}

impl<O> Clone for Attribute<O> {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner,
            name: self.name,
            declared_type: self.declared_type,
            markers: self.markers.clone(),
            depth: self.depth,
            accessor: self.accessor.clone(),
        }
    }
}

impl<O> Debug for Attribute<O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("markers", &self.markers)
            .field("scope", &self.scope())
            .field("depth", &self.depth)
            .finish()
    }
}

/// Collector of the attribute declarations of a type `O`
///
/// An instance of this is passed to [`Inspect::declare`].
pub struct Declarations<O> {
    owner: TypeRef,
    attributes: Vec<Attribute<O>>,
}

impl<O> Declarations<O>
where
    O: Inspect,
{
    fn new() -> Self {
        Self {
            owner: TypeRef::of::<O>(),
            attributes: Vec::new(),
        }
    }

    /// Declares an instance attribute of type `T`
    ///
    /// The `read` closure is invoked every time the attribute is sampled. It must not block, so shared state is
    /// usually read from atomics.
    pub fn field<T, F>(&mut self, name: &'static str, read: F) -> DeclaredAttribute<'_>
    where
        T: AttributeType,
        F: Fn(&O) -> T + Send + Sync + 'static,
    {
        self.push::<T>(
            name,
            Accessor::Instance(Arc::new(move |object: &O| {
                Ok::<_, EvaluationError>(FieldValue::new(read(object)))
            })),
        )
    }

    /// Declares an instance attribute of type `T` whose read may fail
    ///
    /// A failing read aborts any polling loop sampling the attribute.
    pub fn try_field<T, E, F>(&mut self, name: &'static str, read: F) -> DeclaredAttribute<'_>
    where
        T: AttributeType,
        E: Into<Box<dyn StdError + Send + Sync>>,
        F: Fn(&O) -> Result<T, E> + Send + Sync + 'static,
    {
        self.push::<T>(
            name,
            Accessor::Instance(Arc::new(move |object: &O| {
                read(object).map(FieldValue::new).map_err(EvaluationError::new)
            })),
        )
    }

    /// Declares a static attribute of type `T`
    pub fn static_field<T, F>(&mut self, name: &'static str, read: F) -> DeclaredAttribute<'_>
    where
        T: AttributeType,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.push::<T>(
            name,
            Accessor::Static(Arc::new(move || Ok::<_, EvaluationError>(FieldValue::new(read())))),
        )
    }

    /// Inherits the attributes of a base type `P` embedded in `O`
    ///
    /// The `base` closure projects an instance of `O` onto its embedded `P`. Inherited attributes whose name is also
    /// declared by a nearer type are shadowed, regardless of the order of declarations.
    pub fn inherit<P, F>(&mut self, base: F)
    where
        P: Inspect,
        F: Fn(&O) -> &P + Send + Sync + 'static,
    {
        let base = Arc::new(base);

        for attribute in attributes::<P>() {
            let accessor = match attribute.accessor {
                Accessor::Instance(read) => {
                    let base = Arc::clone(&base);
                    Accessor::Instance(Arc::new(move |object: &O| read(base(object))) as InstanceRead<O>)
                }
                Accessor::Static(read) => Accessor::Static(read),
            };

            self.attributes.push(Attribute {
                owner: attribute.owner,
                name: attribute.name,
                declared_type: attribute.declared_type,
                markers: attribute.markers,
                depth: attribute.depth + 1,
                accessor,
            });
        }
    }

    fn push<T>(&mut self, name: &'static str, accessor: Accessor<O>) -> DeclaredAttribute<'_>
    where
        T: AttributeType,
    {
        self.attributes.push(Attribute {
            owner: self.owner,
            name,
            declared_type: TypeRef::of::<T>(),
            markers: Vec::new(),
            depth: 0,
            accessor,
        });

        let len = self.attributes.len();
        DeclaredAttribute {
            markers: &mut self.attributes[len - 1].markers,
        }
    }

    /// Returns the declared attributes, nearest first, with shadowed attributes removed
    fn into_attributes(mut self) -> Vec<Attribute<O>> {
        self.attributes.sort_by_key(Attribute::depth);

        let mut visible: Vec<Attribute<O>> = Vec::with_capacity(self.attributes.len());
        for attribute in self.attributes {
            let shadowed = visible
                .iter()
                .any(|nearer| nearer.name == attribute.name && nearer.depth < attribute.depth);

            if !shadowed {
                visible.push(attribute);
            }
        }

        visible
    }
}

impl<O> Debug for Declarations<O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Declarations")
            .field("owner", &self.owner)
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Handle to a freshly declared attribute, used to attach markers
#[derive(Debug)]
pub struct DeclaredAttribute<'a> {
    markers: &'a mut Vec<MarkerRef>,
}

impl DeclaredAttribute<'_> {
    /// Attaches the marker `M` to the attribute
    pub fn marked<M>(self) -> Self
    where
        M: Marker,
    {
        let marker = MarkerRef::of::<M>();
        if !self.markers.contains(&marker) {
            self.markers.push(marker);
        }

        self
    }
}

/// Returns all attributes visible on the type `O`
///
/// Attributes declared by `O` itself come first, followed by inherited attributes ordered by inheritance depth.
/// Inherited attributes that are shadowed by a nearer declaration with the same name are not included.
pub fn attributes<O>() -> Vec<Attribute<O>>
where
    O: Inspect,
{
    let mut declarations = Declarations::new();
    O::declare(&mut declarations);
    declarations.into_attributes()
}
