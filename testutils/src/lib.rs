//! Fixtures for testing code that waits on attributes
//!
//! The fake repositories declare their attributes through `fieldpoll`, so they can be resolved by name, type and
//! marker. [`Asynch`] changes their value from another thread after a delay.

pub use asynch::Asynch;
pub use repository::{
    BaseRepository, DerivedRepository, DisposableRepository, ExampleMarker, ExampleMarker2, FakeRepository,
    FakeRepositoryWithMarker, FakeRepositoryWithStaticField, ValueHolder,
};

mod asynch;
mod repository;
