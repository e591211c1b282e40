//! Waiting for asynchronous state changes in tests, without manual sleeps or retry loops
//!
//! This crate repeatedly samples a source of values until a condition on the sampled value holds or a timeout
//! elapses. Sources can be plain closures or attributes of objects that are located by name, declared type and
//! markers through the [attribute resolver](crate::field_in).
//!
//! # Waiting on closures
//! ```
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::time::Duration;
//!
//! let ready = AtomicBool::new(true);
//!
//! fieldpoll::wait()
//!     .at_most(Duration::from_secs(1))
//!     .until_true(|| ready.load(Ordering::SeqCst))
//!     .unwrap();
//! ```
//!
//! # Waiting on attributes
//! Types make their attributes discoverable by implementing [`Inspect`], usually through
//! [`declare_attributes!`]. An attribute is then resolved once from any combination of criteria, in any order, and
//! read afresh on every sample:
//! ```
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use std::time::Duration;
//!
//! use fieldpoll::{declare_attributes, field_in, Marker};
//!
//! struct Observed;
//! impl Marker for Observed {}
//!
//! struct Repository {
//!     value: AtomicI32,
//! }
//!
//! declare_attributes! {
//!     Repository {
//!         #[marker(Observed)]
//!         value: i32 = |repository: &Repository| repository.value.load(Ordering::SeqCst),
//!     }
//! }
//!
//! let repository = Repository { value: AtomicI32::new(1) };
//!
//! let value = fieldpoll::wait()
//!     .at_most(Duration::from_secs(1))
//!     .until(
//!         field_in(&repository).annotated_with::<Observed>().and_of_type::<i32>(),
//!         |value| *value == 1,
//!     )
//!     .unwrap();
//!
//! assert_eq!(value, 1);
//! ```
//!
//! # Cargo features
//! - `wait_async`: Enables the asynchronous polling loop [`poll_until_async`] and the `*_async` methods of
//!   [`ConditionFactory`], based on [`tokio`](https://docs.rs/tokio)
//!
//! # Tracing
//! The crate emits [`tracing`](https://docs.rs/tracing) events and spans under the target `fieldpoll`: one span
//! per polling loop run, an event per sample at the `TRACE` level and events on resolution, success, timeout and
//! abort at the `DEBUG` level.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

pub use attribute::{attributes, Attribute, DeclaredAttribute, Declarations, Inspect, Scope};
pub use condition::{Condition, Evaluation};
pub use criteria::Criteria;
pub use error::{AttributeNotFoundError, AwaitError, ConditionTimeoutError, EvaluationError, NotFoundReason};
pub use factory::{wait, wait_with_alias, ConditionFactory};
pub use policy::{Intervals, PollInterval, PollPolicy};
pub use predicate::{equal_to, EqualTo, Predicate};
pub use resolve::{field_in, field_in_type, resolve, FieldQuery, FieldSupplier, Target, Typed, Untyped, ValueKind};
pub use supplier::{fallible, Fallible, IntoSupplier, SourceOutput, Supplier};
pub use type_ref::{Marker, MarkerRef, TypeRef};
pub use value::{AttributeType, FieldValue};
#[cfg(feature = "wait_async")]
pub use wait_async::poll_until_async;
pub use wait_blocking::poll_until;

pub mod defaults;

mod attribute;
mod condition;
mod criteria;
mod error;
mod factory;
mod macros;
mod policy;
mod predicate;
mod resolve;
mod session;
mod supplier;
mod type_ref;
mod value;
#[cfg(feature = "wait_async")]
mod wait_async;
mod wait_blocking;

const TRACING_TARGET: &str = "fieldpoll";
