use std::cell::Cell;
use std::sync::Arc;
use std::time::{Duration, Instant};

use fieldpoll::{
    equal_to, field_in, field_in_type, resolve, ConditionFactory, Criteria, NotFoundReason, Scope, Target, TypeRef,
};
use testutils::{
    Asynch, BaseRepository, DerivedRepository, DisposableRepository, ExampleMarker, ExampleMarker2, FakeRepository,
    FakeRepositoryWithMarker, ValueHolder,
};

fn wait() -> ConditionFactory {
    fieldpoll::wait().at_most(Duration::from_secs(2))
}

#[test]
fn of_type_and_name() {
    let repository = Arc::new(FakeRepository::new());
    let handle = Asynch::new(&repository).perform();

    let value = wait()
        .until(field_in(&*repository).of_type::<i32>().and_with_name("value"), |value| *value == 1)
        .unwrap();

    assert_eq!(value, 1);
    assert_eq!(repository.value(), 1);
    handle.join().unwrap();
}

#[test]
fn name_and_of_type() {
    let repository = Arc::new(FakeRepository::new());
    let handle = Asynch::new(&repository).perform();

    wait()
        .until(field_in(&*repository).with_name("value").and_of_type::<i32>(), |value| *value == 1)
        .unwrap();

    assert_eq!(repository.value(), 1);
    handle.join().unwrap();
}

#[test]
fn name_only() {
    let repository = Arc::new(FakeRepository::new());
    let handle = Asynch::new(&repository).perform();

    let value = wait()
        .until_matches(field_in(&*repository).with_name("value"), equal_to(1))
        .unwrap();

    assert_eq!(value, 1);
    assert_eq!(value.type_ref(), TypeRef::of::<i32>());
    handle.join().unwrap();
}

#[test]
fn type_only() {
    let repository = Arc::new(FakeRepository::new());
    let handle = Asynch::new(&repository).perform();

    wait()
        .until(field_in(&*repository).of_type::<i32>(), |value| *value == 1)
        .unwrap();

    assert_eq!(repository.value(), 1);
    handle.join().unwrap();
}

#[test]
fn marker_only() {
    let repository = Arc::new(FakeRepositoryWithMarker::new());
    let handle = Asynch::new(&repository).perform();

    wait()
        .until_matches(field_in(&*repository).annotated_with::<ExampleMarker>(), equal_to(1))
        .unwrap();

    assert_eq!(repository.value(), 1);
    handle.join().unwrap();
}

#[test]
fn marker_and_name() {
    let repository = Arc::new(FakeRepositoryWithMarker::new());
    let handle = Asynch::new(&repository).perform();

    wait()
        .until(
            field_in(&*repository)
                .annotated_with::<ExampleMarker>()
                .and_with_name("value"),
            |value| *value == 1,
        )
        .unwrap();

    assert_eq!(repository.value(), 1);
    handle.join().unwrap();
}

#[test]
fn marker_and_name_and_type() {
    let repository = Arc::new(FakeRepositoryWithMarker::new());
    let handle = Asynch::new(&repository).perform();

    wait()
        .until(
            field_in(&*repository)
                .annotated_with::<ExampleMarker>()
                .and_with_name("value")
                .and_of_type::<i32>(),
            |value| *value == 1,
        )
        .unwrap();

    assert_eq!(repository.value(), 1);
    handle.join().unwrap();
}

#[test]
fn marker_and_type() {
    let repository = Arc::new(FakeRepositoryWithMarker::new());
    let handle = Asynch::new(&repository).perform();

    wait()
        .until(
            field_in(&*repository)
                .annotated_with::<ExampleMarker>()
                .and_of_type::<i32>(),
            |value| *value == 1,
        )
        .unwrap();

    assert_eq!(repository.value(), 1);
    handle.join().unwrap();
}

#[test]
fn marker_and_type_and_name() {
    let repository = Arc::new(FakeRepositoryWithMarker::new());
    let handle = Asynch::new(&repository).perform();

    wait()
        .until(
            field_in(&*repository)
                .annotated_with::<ExampleMarker>()
                .and_of_type::<i32>()
                .and_with_name("value"),
            |value| *value == 1,
        )
        .unwrap();

    assert_eq!(repository.value(), 1);
    handle.join().unwrap();
}

#[test]
fn second_marker_selects_other_attribute() {
    let repository = Arc::new(FakeRepositoryWithMarker::new());
    let handle = Asynch::new(&repository).perform();

    let updates = wait()
        .until(
            field_in(&*repository).annotated_with::<ExampleMarker2>().and_of_type::<u64>(),
            |updates| *updates > 0,
        )
        .unwrap();

    assert_eq!(updates, 1);
    handle.join().unwrap();
}

#[test]
fn name_matches_but_type_does_not() {
    let repository = FakeRepositoryWithMarker::new();

    let err = wait()
        .until(field_in(&repository).of_type::<i8>().and_with_name("value"), |value| *value == 1)
        .unwrap_err();

    assert!(err.is_attribute_not_found());
}

#[test]
fn type_matches_but_name_does_not() {
    let repository = FakeRepositoryWithMarker::new();

    let err = wait()
        .until(field_in(&repository).of_type::<i32>().and_with_name("value2"), |value| *value == 1)
        .unwrap_err();

    assert!(err.is_attribute_not_found());
}

#[test]
fn name_and_type_when_name_matches_but_type_does_not() {
    let repository = FakeRepositoryWithMarker::new();

    let err = wait()
        .until(field_in(&repository).with_name("value").and_of_type::<i8>(), |value| *value == 1)
        .unwrap_err();

    assert!(err.is_attribute_not_found());
}

#[test]
fn name_and_type_when_type_matches_but_name_does_not() {
    let repository = FakeRepositoryWithMarker::new();

    let err = wait()
        .until(field_in(&repository).with_name("value2").and_of_type::<i32>(), |value| *value == 1)
        .unwrap_err();

    assert!(err.is_attribute_not_found());
}

#[test]
fn marker_and_name_when_name_matches_but_marker_does_not() {
    let repository = FakeRepositoryWithMarker::new();

    let err = wait()
        .until_matches(
            field_in(&repository)
                .annotated_with::<ExampleMarker2>()
                .and_with_name("value"),
            equal_to(1),
        )
        .unwrap_err();

    assert!(err.is_attribute_not_found());
}

#[test]
fn marker_and_name_and_type_when_name_and_type_match_but_marker_does_not() {
    let repository = FakeRepositoryWithMarker::new();

    let err = wait()
        .until(
            field_in(&repository)
                .annotated_with::<ExampleMarker2>()
                .and_with_name("value")
                .and_of_type::<i32>(),
            |value| *value == 1,
        )
        .unwrap_err();

    assert!(err.is_attribute_not_found());
}

#[test]
fn marker_and_name_and_type_when_name_and_marker_match_but_type_does_not() {
    let repository = FakeRepositoryWithMarker::new();

    let err = wait()
        .until(
            field_in(&repository)
                .annotated_with::<ExampleMarker>()
                .and_with_name("value")
                .and_of_type::<i8>(),
            |value| *value == 1,
        )
        .unwrap_err();

    assert!(err.is_attribute_not_found());
}

#[test]
fn marker_and_name_when_marker_matches_but_name_does_not() {
    let repository = FakeRepositoryWithMarker::new();

    let err = wait()
        .until_matches(
            field_in(&repository)
                .annotated_with::<ExampleMarker>()
                .and_with_name("value2"),
            equal_to(1),
        )
        .unwrap_err();

    assert!(err.is_attribute_not_found());
}

#[test]
fn marker_and_type_when_marker_matches_but_type_does_not() {
    let repository = FakeRepositoryWithMarker::new();

    let err = wait()
        .until(
            field_in(&repository).annotated_with::<ExampleMarker>().and_of_type::<i8>(),
            |value| *value == 1,
        )
        .unwrap_err();

    assert!(err.is_attribute_not_found());
}

#[test]
fn marker_and_type_when_type_matches_but_marker_does_not() {
    let repository = FakeRepositoryWithMarker::new();

    let err = wait()
        .until(
            field_in(&repository).annotated_with::<ExampleMarker2>().and_of_type::<i32>(),
            |value| *value == 1,
        )
        .unwrap_err();

    assert!(err.is_attribute_not_found());
}

#[test]
fn unknown_name_fails_before_sampling() {
    let repository = FakeRepository::new();
    let start = Instant::now();

    let err = wait()
        .poll_delay(Duration::from_secs(1))
        .until_matches(field_in(&repository).with_name("value2"), equal_to(1))
        .unwrap_err();

    assert!(err.is_attribute_not_found());
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn direct_criteria_resolve_like_fluent_queries() {
    let repository = FakeRepositoryWithMarker::new();
    let criteria = Criteria::new().with_name("value").of_type::<i32>();

    let direct = resolve(Target::Instance(&repository), &criteria).unwrap();
    let name_first = field_in(&repository).with_name("value").and_of_type::<i32>();
    let type_first = field_in(&repository).of_type::<i32>().and_with_name("value");

    assert_eq!(name_first.criteria(), &criteria);
    assert_eq!(type_first.criteria(), &criteria);

    let name_first = name_first.resolve().unwrap();
    let type_first = type_first.resolve().unwrap();
    for attribute in [name_first.attribute(), type_first.attribute()] {
        assert_eq!(attribute.name(), direct.attribute().name());
        assert_eq!(attribute.declared_type(), direct.attribute().declared_type());
        assert_eq!(attribute.depth(), direct.attribute().depth());
    }

    repository.set_value(3);
    assert_eq!(direct.get().unwrap(), 3);
    assert_eq!(name_first.get().unwrap(), 3);
    assert_eq!(type_first.get().unwrap(), 3);
}

#[test]
fn direct_criteria_with_conflicting_type_are_not_found() {
    let repository = FakeRepository::new();

    let err = resolve(
        Target::Instance(&repository),
        &Criteria::new().with_name("value").of_type::<i8>(),
    )
    .unwrap_err();

    assert_eq!(err.reason(), NotFoundReason::NoMatch);
    assert_eq!(err.criteria(), &Criteria::new().of_type::<i8>().with_name("value"));
}

#[test]
fn direct_criteria_through_type_do_not_reach_instance_attribute() {
    let err = resolve(
        Target::<FakeRepository>::Type,
        &Criteria::new().with_name("value").of_type::<i32>(),
    )
    .unwrap_err();

    assert_eq!(err.reason(), NotFoundReason::InstanceThroughType);
}

#[test]
fn name_computed_at_runtime() {
    let repository = FakeRepository::new();
    let name = format!("val{}", "ue");

    let supplier = field_in(&repository).with_name(name.as_str()).resolve().unwrap();

    assert_eq!(supplier.attribute().name(), "value");
}

#[test]
fn instance_attribute_through_type_is_not_found() {
    let err = field_in_type::<FakeRepository>().with_name("value").resolve().unwrap_err();

    assert_eq!(err.reason(), NotFoundReason::InstanceThroughType);
}

#[test]
fn empty_criteria_are_not_found() {
    let repository = FakeRepository::new();

    let err = field_in(&repository).resolve().unwrap_err();

    assert_eq!(err.reason(), NotFoundReason::NoCriteria);
}

#[test]
fn ambiguous_criteria_are_not_found() {
    let repository = BaseRepository::new(7);

    let err = field_in(&repository).of_type::<i32>().resolve().unwrap_err();

    assert_eq!(err.reason(), NotFoundReason::Ambiguous { matches: 2 });
    assert!(err.to_string().contains("2 attributes match"));
}

#[test]
fn nearest_declaration_shadows_inherited_one() {
    let repository = DerivedRepository::new(BaseRepository::new(7));
    repository.set_derived_value(42);

    let supplier = field_in(&repository).with_name("value").resolve().unwrap();

    assert_eq!(supplier.attribute().declared_type(), TypeRef::of::<i64>());
    assert_eq!(supplier.get().unwrap(), 42_i64);

    let err = field_in(&repository).annotated_with::<ExampleMarker>().resolve().unwrap_err();
    assert_eq!(err.reason(), NotFoundReason::NoMatch);
}

#[test]
fn inherited_attribute_reads_embedded_base() {
    let repository = DerivedRepository::new(BaseRepository::new(7));

    let supplier = field_in(&repository).with_name("created").of_type::<i32>().resolve().unwrap();

    assert_eq!(supplier.attribute().scope(), Scope::Instance);
    assert_eq!(supplier.attribute().depth(), 1);
    assert_eq!(supplier.get().unwrap(), 7);
}

#[test]
fn supplier_reflects_live_value() {
    let repository = FakeRepository::new();
    let supplier = field_in(&repository).of_type::<i32>().resolve().unwrap();

    assert_eq!(supplier.get().unwrap(), 0);
    repository.set_value(5);
    assert_eq!(supplier.get().unwrap(), 5);
}

#[test]
fn flipped_value_is_observed_after_about_twenty_attempts() {
    let repository = Arc::new(FakeRepository::new());
    let supplier = field_in(&*repository).of_type::<i32>().resolve().unwrap();
    let attempts = Cell::new(0);
    let handle = Asynch::new(&repository).with_delay(Duration::from_millis(200)).perform();

    let value = fieldpoll::wait()
        .at_most(Duration::from_millis(2000))
        .poll_interval(Duration::from_millis(10))
        .until(
            || {
                attempts.set(attempts.get() + 1);
                supplier.get().unwrap()
            },
            |value| *value == 1,
        )
        .unwrap();

    assert_eq!(value, 1);
    assert!((5..=25).contains(&attempts.get()), "attempts: {}", attempts.get());
    handle.join().unwrap();
}

#[test]
fn failing_read_aborts_polling() {
    let repository = DisposableRepository::new();
    repository.dispose();

    let err = wait()
        .until(field_in(&repository).of_type::<i32>(), |value| *value == 1)
        .unwrap_err();

    assert!(err.is_evaluation());
    assert!(err.to_string().contains("repository has been disposed"));
}

#[test]
fn typed_timeout_reports_last_value() {
    let repository = FakeRepository::new();

    let err = fieldpoll::wait_with_alias("repository updated")
        .at_most(Duration::from_millis(50))
        .poll_interval(Duration::from_millis(10))
        .until(field_in(&repository).of_type::<i32>(), |value| *value == 1)
        .unwrap_err();

    match err {
        fieldpoll::AwaitError::Timeout(err) => {
            assert_eq!(err.alias(), Some("repository updated"));
            assert_eq!(err.last_value(), Some(&0));
            assert!(err.attempts() >= 2);
        }
        err => panic!("expected timeout, got {err}"),
    }
}
