// tests/finally_validation.rs

use std::error::Error;

use taskweave::dag::{accumulate_finally, sort_tasks_to_run};
use taskweave::errors::{FinallyViolation, TaskweaveError};
use taskweave::task::{Registry, Task};

type TestResult = Result<(), Box<dyn Error>>;

fn violation(result: taskweave::errors::Result<taskweave::dag::SortedRun>) -> (String, FinallyViolation) {
    match result {
        Err(TaskweaveError::FinallyConfiguration { task, violation }) => (task, violation),
        other => panic!("expected FinallyConfiguration, got {other:?}"),
    }
}

#[test]
fn valid_finalizer_is_recorded_on_its_owner() -> TestResult {
    let mut registry = Registry::new();
    registry.declare("cleanup")?.run(|_| Ok(()));
    registry.declare("build")?.finally(["cleanup"]).run(|_| Ok(()));

    let run = sort_tasks_to_run(registry.tasks(), &["build"])?;
    assert_eq!(run.task_names(), vec!["build"]);
    assert_eq!(run.finally_names(|_| false), vec!["cleanup"]);
    Ok(())
}

#[test]
fn aggregate_owner_is_rejected() -> TestResult {
    let mut registry = Registry::new();
    registry.declare("actual_task")?.run(|_| Ok(()));
    registry.declare("aggregate_task")?.depends_on(["actual_task"]).finally(["actual_task"]);

    let (task, v) = violation(sort_tasks_to_run(registry.tasks(), &["aggregate_task"]));
    assert_eq!(task, "aggregate_task");
    assert_eq!(v, FinallyViolation::AggregateOwner);
    Ok(())
}

#[test]
fn chained_finalizer_is_rejected() -> TestResult {
    let mut registry = Registry::new();
    registry.declare("inner")?.run(|_| Ok(()));
    registry.declare("outer")?.finally(["inner"]).run(|_| Ok(()));
    registry.declare("main")?.finally(["outer"]).run(|_| Ok(()));

    let (task, v) = violation(sort_tasks_to_run(registry.tasks(), &["main"]));
    assert_eq!(task, "outer");
    assert_eq!(v, FinallyViolation::Chained);
    Ok(())
}

#[test]
fn finalizer_with_required_argument_is_rejected() -> TestResult {
    let mut registry = Registry::new();
    registry.declare("notify")?.required_arg("channel").run(|_| Ok(()));
    registry.declare("build")?.finally(["notify"]).run(|_| Ok(()));

    let (task, v) = violation(sort_tasks_to_run(registry.tasks(), &["build"]));
    assert_eq!(task, "notify");
    assert_eq!(v, FinallyViolation::RequiredArgument("channel".to_string()));
    Ok(())
}

#[test]
fn finalizer_with_optional_argument_is_accepted() -> TestResult {
    let mut registry = Registry::new();
    registry.declare("notify")?.optional_arg("channel").run(|_| Ok(()));
    registry.declare("build")?.finally(["notify"]).run(|_| Ok(()));

    sort_tasks_to_run(registry.tasks(), &["build"])?;
    Ok(())
}

#[test]
fn constraints_apply_through_finalizer_dependencies() -> TestResult {
    let mut registry = Registry::new();
    registry.declare("auth")?.required_arg("token").run(|_| Ok(()));
    registry.declare("upload")?.depends_on(["auth"]).run(|_| Ok(()));
    registry.declare("build")?.finally(["upload"]).run(|_| Ok(()));

    let (task, v) = violation(sort_tasks_to_run(registry.tasks(), &["build"]));
    assert_eq!(task, "auth");
    assert_eq!(v, FinallyViolation::RequiredArgument("token".to_string()));
    Ok(())
}

#[test]
fn cycle_among_finalizer_dependencies_is_rejected() -> TestResult {
    let mut registry = Registry::new();
    registry.declare("a")?.depends_on(["b"]).run(|_| Ok(()));
    registry.declare("b")?.depends_on(["a"]).run(|_| Ok(()));
    registry.declare("main")?.finally(["a"]).run(|_| Ok(()));

    match sort_tasks_to_run(registry.tasks(), &["main"]) {
        Err(TaskweaveError::FinallyCycle(name)) => assert_eq!(name, "a"),
        other => panic!("expected FinallyCycle, got {other:?}"),
    }
    Ok(())
}

#[test]
fn unknown_finalizer_is_an_error() -> TestResult {
    let mut registry = Registry::new();
    registry.declare("main")?.finally(["ghost"]).run(|_| Ok(()));

    match sort_tasks_to_run(registry.tasks(), &["main"]) {
        Err(TaskweaveError::TaskNotFound(name)) => assert_eq!(name, "ghost"),
        other => panic!("expected TaskNotFound, got {other:?}"),
    }
    Ok(())
}

#[test]
fn finalizers_are_only_checked_for_owners_in_the_run() -> TestResult {
    let mut registry = Registry::new();
    registry.declare("bad")?.required_arg("x").run(|_| Ok(()));
    registry.declare("owner")?.finally(["bad"]).run(|_| Ok(()));
    registry.declare("other")?.run(|_| Ok(()));

    sort_tasks_to_run(registry.tasks(), &["other"])?;
    Ok(())
}

#[test]
fn later_owners_come_first_and_duplicates_collapse() -> TestResult {
    let mut registry = Registry::new();
    for name in ["f1", "f2", "f3"] {
        registry.declare(name)?.run(|_| Ok(()));
    }
    registry.declare("a")?.finally(["f1", "f2"]).run(|_| Ok(()));
    registry.declare("b")?.finally(["f3", "F1"]).run(|_| Ok(()));

    let a: &Task = registry.get("a").unwrap();
    let b: &Task = registry.get("b").unwrap();
    let names = accumulate_finally([a, b]);
    assert_eq!(names, vec!["f3", "F1", "f2"]);
    Ok(())
}

#[test]
fn skipped_owner_contributes_nothing() -> TestResult {
    let mut registry = Registry::new();
    registry.declare("f1")?.run(|_| Ok(()));
    registry.declare("f2")?.run(|_| Ok(()));
    registry.declare("a")?.finally(["f1"]).run(|_| Ok(()));
    registry.declare("b")?.depends_on(["a"]).finally(["f2"]).run(|_| Ok(()));

    let run = sort_tasks_to_run(registry.tasks(), &["b"])?;
    assert_eq!(run.finally_names(|_| false), vec!["f1", "f2"]);
    assert_eq!(run.finally_names(|owner| owner.name() == "a"), vec!["f2"]);
    Ok(())
}
