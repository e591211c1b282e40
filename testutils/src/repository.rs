use std::sync::atomic::{AtomicBool, AtomicI32, AtomicI64, AtomicU64, Ordering};

use fieldpoll::{declare_attributes, Declarations, Inspect, Marker};

/// A repository whose value can be changed through a shared reference
pub trait ValueHolder {
    fn value(&self) -> i32;

    fn set_value(&self, value: i32);
}

#[derive(Debug)]
pub struct ExampleMarker;
impl Marker for ExampleMarker {}

#[derive(Debug)]
pub struct ExampleMarker2;
impl Marker for ExampleMarker2 {}

/// A repository with a single `i32` attribute named `value`
#[derive(Debug, Default)]
pub struct FakeRepository {
    value: AtomicI32,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValueHolder for FakeRepository {
    fn value(&self) -> i32 {
        self.value.load(Ordering::SeqCst)
    }

    fn set_value(&self, value: i32) {
        self.value.store(value, Ordering::SeqCst);
    }
}

declare_attributes! {
    FakeRepository {
        value: i32 = |repository: &FakeRepository| repository.value(),
    }
}

/// A repository whose `value` carries [`ExampleMarker`], next to an `updates` counter carrying [`ExampleMarker2`]
#[derive(Debug, Default)]
pub struct FakeRepositoryWithMarker {
    value: AtomicI32,
    updates: AtomicU64,
}

impl FakeRepositoryWithMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> u64 {
        self.updates.load(Ordering::SeqCst)
    }
}

impl ValueHolder for FakeRepositoryWithMarker {
    fn value(&self) -> i32 {
        self.value.load(Ordering::SeqCst)
    }

    fn set_value(&self, value: i32) {
        self.value.store(value, Ordering::SeqCst);
        self.updates.fetch_add(1, Ordering::SeqCst);
    }
}

declare_attributes! {
    FakeRepositoryWithMarker {
        #[marker(ExampleMarker)]
        value: i32 = |repository: &FakeRepositoryWithMarker| repository.value(),
        #[marker(ExampleMarker2)]
        updates: u64 = |repository: &FakeRepositoryWithMarker| repository.updates(),
    }
}

static STATIC_VALUE: AtomicI32 = AtomicI32::new(0);

/// A repository whose `value` is a static attribute shared by all instances
///
/// Tests must not mutate the static value concurrently.
#[derive(Debug, Default)]
pub struct FakeRepositoryWithStaticField {
    _private: (),
}

impl FakeRepositoryWithStaticField {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValueHolder for FakeRepositoryWithStaticField {
    fn value(&self) -> i32 {
        STATIC_VALUE.load(Ordering::SeqCst)
    }

    fn set_value(&self, value: i32) {
        STATIC_VALUE.store(value, Ordering::SeqCst);
    }
}

declare_attributes! {
    FakeRepositoryWithStaticField {
        #[marker(ExampleMarker)]
        static value: i32 = || STATIC_VALUE.load(Ordering::SeqCst),
    }
}

/// A repository embedded in [`DerivedRepository`]
#[derive(Debug, Default)]
pub struct BaseRepository {
    value: AtomicI32,
    created: AtomicI32,
}

impl BaseRepository {
    pub fn new(created: i32) -> Self {
        Self {
            value: AtomicI32::new(0),
            created: AtomicI32::new(created),
        }
    }
}

declare_attributes! {
    BaseRepository {
        #[marker(ExampleMarker)]
        value: i32 = |repository: &BaseRepository| repository.value.load(Ordering::SeqCst),
        created: i32 = |repository: &BaseRepository| repository.created.load(Ordering::SeqCst),
    }
}

/// A repository declaring its own `i64` attribute `value`, which shadows the `i32` one of its base
#[derive(Debug, Default)]
pub struct DerivedRepository {
    base: BaseRepository,
    value: AtomicI64,
}

impl DerivedRepository {
    pub fn new(base: BaseRepository) -> Self {
        Self {
            base,
            value: AtomicI64::new(0),
        }
    }

    pub fn base(&self) -> &BaseRepository {
        &self.base
    }

    pub fn set_derived_value(&self, value: i64) {
        self.value.store(value, Ordering::SeqCst);
    }
}

declare_attributes! {
    DerivedRepository {
        value: i64 = |repository: &DerivedRepository| repository.value.load(Ordering::SeqCst),
        inherit BaseRepository = |repository: &DerivedRepository| &repository.base,
    }
}

/// A repository whose `value` can no longer be read after it has been disposed
#[derive(Debug, Default)]
pub struct DisposableRepository {
    value: AtomicI32,
    disposed: AtomicBool,
}

impl DisposableRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    fn read(&self) -> Result<i32, &'static str> {
        if self.disposed.load(Ordering::SeqCst) {
            Err("repository has been disposed")
        } else {
            Ok(self.value.load(Ordering::SeqCst))
        }
    }
}

impl ValueHolder for DisposableRepository {
    fn value(&self) -> i32 {
        self.value.load(Ordering::SeqCst)
    }

    fn set_value(&self, value: i32) {
        self.value.store(value, Ordering::SeqCst);
    }
}

impl Inspect for DisposableRepository {
    fn declare(declarations: &mut Declarations<Self>) {
        declarations.try_field("value", DisposableRepository::read);
    }
}
