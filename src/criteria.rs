//! Selection criteria for resolving attributes

#![deny(unsafe_code)]

use std::fmt::{self, Display, Formatter};

use crate::attribute::Attribute;
use crate::type_ref::{MarkerRef, TypeRef};

/// A set of constraints an attribute has to satisfy in order to be selected
///
/// Every present constraint must hold (AND semantics), regardless of the order in which the constraints were added.
/// Setting a constraint again replaces its previous value.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Criteria {
    name: Option<String>,
    declared_type: Option<TypeRef>,
    marker: Option<MarkerRef>,
}

impl Criteria {
    /// Creates an empty set of criteria
    ///
    /// Note that resolving with empty criteria always fails, at least one criterion has to be added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the attribute to have exactly the given name
    ///
    /// The name is copied, so it may be borrowed from a value computed at runtime.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Requires the attribute to be declared with exactly the type `T`
    pub fn of_type<T>(self) -> Self
    where
        T: ?Sized + 'static,
    {
        self.of_type_ref(TypeRef::of::<T>())
    }

    /// Requires the attribute to be declared with exactly the given type
    pub fn of_type_ref(mut self, declared_type: TypeRef) -> Self {
        self.declared_type = Some(declared_type);
        self
    }

    /// Requires the attribute to carry the given marker
    pub fn annotated_with(mut self, marker: MarkerRef) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Returns the required name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the required declared type, if any
    pub fn declared_type(&self) -> Option<TypeRef> {
        self.declared_type
    }

    /// Returns the required marker, if any
    pub fn marker(&self) -> Option<MarkerRef> {
        self.marker
    }

    /// Returns whether no criterion is present
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.declared_type.is_none() && self.marker.is_none()
    }

    /// Returns whether the given attribute satisfies every present criterion
    ///
    /// The scope of the attribute is not taken into account here.
    pub(crate) fn matches<O>(&self, attribute: &Attribute<O>) -> bool {
        self.name.as_deref().map_or(true, |name| attribute.name() == name)
            && self
                .declared_type
                .map_or(true, |declared_type| attribute.declared_type() == declared_type)
            && self.marker.map_or(true, |marker| attribute.has_marker(marker))
    }
}

impl Display for Criteria {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("no criteria");
        }

        let mut separator = "";

        if let Some(name) = &self.name {
            write!(f, "{separator}name \"{name}\"")?;
            separator = " and ";
        }

        if let Some(declared_type) = &self.declared_type {
            write!(f, "{separator}type {declared_type}")?;
            separator = " and ";
        }

        if let Some(marker) = &self.marker {
            write!(f, "{separator}marker {marker}")?;
        }

        Ok(())
    }
}
