/// Implements [`Inspect`](crate::Inspect) for a type by listing its attributes
///
/// Every entry has one of the following forms, separated by commas:
/// - `name: Type = |object| expr` declares an instance attribute
/// - `static NAME: Type = || expr` declares a static attribute
/// - `inherit Base = |object| &object.base` inherits the attributes of an embedded base type
///
/// Attribute entries can be preceded by `#[marker(M1, M2, ...)]` to attach markers.
///
/// # Example
/// ```
/// use std::sync::atomic::{AtomicI32, Ordering};
///
/// use fieldpoll::{declare_attributes, Marker};
///
/// struct Observed;
/// impl Marker for Observed {}
///
/// static CREATED: AtomicI32 = AtomicI32::new(0);
///
/// struct Repository {
///     value: AtomicI32,
/// }
///
/// declare_attributes! {
///     Repository {
///         #[marker(Observed)]
///         value: i32 = |repository: &Repository| repository.value.load(Ordering::SeqCst),
///         static CREATED: i32 = || CREATED.load(Ordering::SeqCst),
///     }
/// }
/// ```
#[macro_export]
macro_rules! declare_attributes {
    ($owner:ty { $($body:tt)* }) => {
        impl $crate::Inspect for $owner {
            fn declare(declarations: &mut $crate::Declarations<Self>) {
                $crate::__declare_attribute!(declarations; $($body)*);
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __declare_attribute {
    ($declarations:ident;) => {};

    ($declarations:ident; inherit $base:ty = $project:expr $(, $($rest:tt)*)?) => {
        $declarations.inherit::<$base, _>($project);
        $crate::__declare_attribute!($declarations; $($($rest)*)?);
    };

    (
        $declarations:ident;
        $(#[marker($($marker:ty),+ $(,)?)])*
        static $name:ident : $ty:ty = $read:expr
        $(, $($rest:tt)*)?
    ) => {
        $declarations
            .static_field::<$ty, _>(stringify!($name), $read)
            $($(.marked::<$marker>())+)*;
        $crate::__declare_attribute!($declarations; $($($rest)*)?);
    };

    (
        $declarations:ident;
        $(#[marker($($marker:ty),+ $(,)?)])*
        $name:ident : $ty:ty = $read:expr
        $(, $($rest:tt)*)?
    ) => {
        $declarations
            .field::<$ty, _>(stringify!($name), $read)
            $($(.marked::<$marker>())+)*;
        $crate::__declare_attribute!($declarations; $($($rest)*)?);
    };
}
