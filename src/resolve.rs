//! Resolving a single attribute from selection criteria

#![deny(unsafe_code)]

use std::any;
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;

use tracing::debug;

use crate::attribute::{self, Accessor, Attribute, InstanceRead, Inspect, Scope, StaticRead};
use crate::criteria::Criteria;
use crate::error::{AttributeNotFoundError, EvaluationError, NotFoundReason};
use crate::type_ref::{Marker, MarkerRef};
use crate::value::{AttributeType, FieldValue};
use crate::TRACING_TARGET;

/// The target against which attributes are resolved
pub enum Target<'a, O> {
    /// A live instance, both instance and static attributes can be resolved
    Instance(&'a O),

    /// A bare type, only static attributes can be resolved
    Type,
}

impl<O> Target<'_, O> {
    /// Returns whether attributes of the given scope can be read through this target
    pub fn admits(&self, scope: Scope) -> bool {
        match self {
            Self::Instance(_) => true,
            Self::Type => scope == Scope::Static,
        }
    }
}

impl<O> Copy for Target<'_, O> {}

impl<O> Clone for Target<'_, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O> Debug for Target<'_, O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(_) => write!(f, "Instance({})", any::type_name::<O>()),
            Self::Type => write!(f, "Type({})", any::type_name::<O>()),
        }
    }
}

/// The kind of values a [`FieldSupplier`] produces
///
/// This is implemented by [`Untyped`] and [`Typed<T>`] only.
pub trait ValueKind: private::Sealed {
    /// The type of the produced values
    type Output;

    #[doc(hidden)]
    fn convert(value: FieldValue) -> Result<Self::Output, EvaluationError>;
}

/// Marker for suppliers producing [`FieldValue`]s because the attribute type was not fixed statically
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Untyped;

/// Marker for suppliers producing values of type `T`
pub struct Typed<T>(PhantomData<fn() -> T>);

impl ValueKind for Untyped {
    type Output = FieldValue;

    fn convert(value: FieldValue) -> Result<FieldValue, EvaluationError> {
        Ok(value)
    }
}

impl<T> ValueKind for Typed<T>
where
    T: AttributeType,
{
    type Output = T;

    fn convert(value: FieldValue) -> Result<T, EvaluationError> {
        value.downcast::<T>().map_err(|value| {
            EvaluationError::new(format!(
                "attribute value {value:?} is of type {} instead of {}",
                value.type_ref(),
                any::type_name::<T>()
            ))
        })
    }
}

mod private {
    pub trait Sealed {}

    impl Sealed for super::Untyped {}
    impl<T> Sealed for super::Typed<T> {}
}

/// The accessor of a resolved attribute, bound to its target
enum Binding<'a, O> {
    Instance { object: &'a O, read: InstanceRead<O> },
    Static { read: StaticRead },
}

/// A supplier of the current value of a resolved attribute
///
/// Every call to [`get`](Self::get) reads the attribute anew. The supplier stays bound to the attribute it was
/// resolved to, it never resolves again.
pub struct FieldSupplier<'a, O, K = Untyped> {
    attribute: Attribute<O>,
    binding: Binding<'a, O>,
    _kind: PhantomData<fn() -> K>,
}

impl<O, K> FieldSupplier<'_, O, K>
where
    K: ValueKind,
{
    /// Returns the attribute this supplier is bound to
    pub fn attribute(&self) -> &Attribute<O> {
        &self.attribute
    }

    /// Reads the current value of the attribute
    ///
    /// # Errors
    /// Returns an error if the accessor of the attribute fails
    pub fn get(&self) -> Result<K::Output, EvaluationError> {
        let value = match &self.binding {
            Binding::Instance { object, read } => read(*object)?,
            Binding::Static { read } => read()?,
        };

        K::convert(value)
    }
}

impl<O, K> Debug for FieldSupplier<'_, O, K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSupplier")
            .field("attribute", &self.attribute)
            .finish()
    }
}

/// Resolves exactly one attribute of `O` matching the given criteria and binds it to the target
///
/// Attributes are matched by exact name, exact declared type and marker presence. If the target is a bare type,
/// only static attributes are eligible.
///
/// # Errors
/// Returns an error if the criteria are empty, or if zero or more than one eligible attribute matches
pub fn resolve<'a, O>(
    target: Target<'a, O>,
    criteria: &Criteria,
) -> Result<FieldSupplier<'a, O>, AttributeNotFoundError>
where
    O: Inspect,
{
    let owner = any::type_name::<O>();
    let not_found = |reason| AttributeNotFoundError::new(owner, criteria.clone(), reason);

    if criteria.is_empty() {
        return Err(not_found(NotFoundReason::NoCriteria));
    }

    let matching: Vec<_> = attribute::attributes::<O>()
        .into_iter()
        .filter(|attribute| criteria.matches(attribute))
        .collect();
    let any_matching = !matching.is_empty();

    let mut eligible: Vec<_> = matching
        .into_iter()
        .filter(|attribute| target.admits(attribute.scope()))
        .collect();

    let attribute = match eligible.len() {
        1 => eligible.remove(0),
        0 if any_matching => return Err(not_found(NotFoundReason::InstanceThroughType)),
        0 => return Err(not_found(NotFoundReason::NoMatch)),
        matches => return Err(not_found(NotFoundReason::Ambiguous { matches })),
    };

    let binding = match (attribute.accessor(), target) {
        (Accessor::Static(read), _) => Binding::Static { read: read.clone() },
        (Accessor::Instance(read), Target::Instance(object)) => Binding::Instance {
            object,
            read: read.clone(),
        },
        (Accessor::Instance(_), Target::Type) => return Err(not_found(NotFoundReason::InstanceThroughType)),
    };

    debug!(
        target: TRACING_TARGET,
        owner,
        %criteria,
        attribute.name = attribute.name(),
        attribute.declared_type = %attribute.declared_type(),
        attribute.scope = ?attribute.scope(),
        "resolved attribute"
    );

    Ok(FieldSupplier {
        attribute,
        binding,
        _kind: PhantomData,
    })
}

/// Starts a query for an attribute of the given object
///
/// Both instance and static attributes can be found this way.
pub fn field_in<O>(object: &O) -> FieldQuery<'_, O>
where
    O: Inspect,
{
    FieldQuery::new(Target::Instance(object))
}

/// Starts a query for a static attribute of the type `O`
pub fn field_in_type<O>() -> FieldQuery<'static, O>
where
    O: Inspect,
{
    FieldQuery::new(Target::Type)
}

/// A fluent query for an attribute
///
/// Criteria can be added in any order, the result of [`resolve`](Self::resolve) does not depend on it. Using
/// [`of_type`](Self::of_type) makes the resulting supplier produce values of that type directly instead of
/// [`FieldValue`]s.
pub struct FieldQuery<'a, O, K = Untyped> {
    target: Target<'a, O>,
    criteria: Criteria,
    _kind: PhantomData<fn() -> K>,
}

impl<'a, O> FieldQuery<'a, O>
where
    O: Inspect,
{
    fn new(target: Target<'a, O>) -> Self {
        Self {
            target,
            criteria: Criteria::new(),
            _kind: PhantomData,
        }
    }
}

impl<'a, O, K> FieldQuery<'a, O, K>
where
    O: Inspect,
    K: ValueKind,
{
    /// Requires the attribute to have exactly the given name
    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            criteria: self.criteria.with_name(name),
            ..self
        }
    }

    /// Same as [`with_name`](Self::with_name)
    pub fn and_with_name(self, name: impl Into<String>) -> Self {
        self.with_name(name)
    }

    /// Requires the attribute to be declared with exactly the type `T`
    pub fn of_type<T>(self) -> FieldQuery<'a, O, Typed<T>>
    where
        T: AttributeType,
    {
        FieldQuery {
            target: self.target,
            criteria: self.criteria.of_type::<T>(),
            _kind: PhantomData,
        }
    }

    /// Same as [`of_type`](Self::of_type)
    pub fn and_of_type<T>(self) -> FieldQuery<'a, O, Typed<T>>
    where
        T: AttributeType,
    {
        self.of_type()
    }

    /// Requires the attribute to carry the marker `M`
    pub fn annotated_with<M>(self) -> Self
    where
        M: Marker,
    {
        Self {
            criteria: self.criteria.annotated_with(MarkerRef::of::<M>()),
            ..self
        }
    }

    /// Same as [`annotated_with`](Self::annotated_with)
    pub fn and_annotated_with<M>(self) -> Self
    where
        M: Marker,
    {
        self.annotated_with::<M>()
    }

    /// Returns the criteria collected so far
    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Resolves the attribute
    ///
    /// # Errors
    /// Returns an error if zero or more than one attribute matches, see [`resolve`]
    pub fn resolve(self) -> Result<FieldSupplier<'a, O, K>, AttributeNotFoundError> {
        let FieldSupplier { attribute, binding, .. } = resolve(self.target, &self.criteria)?;

        Ok(FieldSupplier {
            attribute,
            binding,
            _kind: PhantomData,
        })
    }
}

impl<O, K> Debug for FieldQuery<'_, O, K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldQuery")
            .field("target", &self.target)
            .field("criteria", &self.criteria)
            .finish()
    }
}
