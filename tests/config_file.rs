// tests/config_file.rs

use std::error::Error;
use std::io::Write;

use clap::Parser;
use tempfile::NamedTempFile;
use taskweave::cli::CliArgs;
use taskweave::config::{default_config_path, load_and_validate};
use taskweave::engine::RunOutcome;
use taskweave::errors::TaskweaveError;
use taskweave::run_registry;
use taskweave::types::{FailurePolicy, UnusedArgsPolicy};
use taskweave_test_utils::{init_tracing, with_timeout, CaptureBuffer};
use tokio_util::sync::CancellationToken;

type TestResult = Result<(), Box<dyn Error>>;

fn task_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_task_file_is_loaded() -> TestResult {
    let file = task_file(
        r#"
[config]
auto_namespace = true
unused_args = "error"
on_failure = "continue"

[task.fmt]
cmd = "echo fmt"

[task.build]
description = "compile"
cmd = "echo build"
depends_on = ["fmt"]
finally = ["cleanup"]
continue_on_error = true

[task.build.args.profile]
one_of = ["dev", "release"]

[task.cleanup]
cmd = "echo cleanup"
hidden = true

[task.all]
depends_on = ["build"]
"#,
    );

    let loaded = load_and_validate(file.path())?;
    let options = loaded.options();
    assert!(options.auto_namespace);
    assert_eq!(options.unused_args, UnusedArgsPolicy::Error);
    assert_eq!(options.on_failure, FailurePolicy::Continue);

    let registry = loaded.into_registry()?;
    assert_eq!(registry.len(), 4);

    let build = registry.get("build").unwrap();
    assert_eq!(build.description(), "compile");
    assert_eq!(build.dependencies(), ["fmt"]);
    assert_eq!(build.finally(), ["cleanup"]);
    assert!(build.continue_on_error());
    assert_eq!(build.declared_args().len(), 1);
    assert!(!build.declared_args()[0].is_required());

    assert!(registry.get("cleanup").unwrap().hidden());
    assert!(registry.get("all").unwrap().is_aggregate());
    Ok(())
}

#[test]
fn required_argument_comes_from_the_args_table() -> TestResult {
    let file = task_file(
        r#"
[task.deploy]
cmd = "echo deploy"

[task.deploy.args.target]
required = true

[task.deploy.args.note]
"#,
    );

    let registry = load_and_validate(file.path())?.into_registry()?;
    let deploy = registry.get("deploy").unwrap();
    assert_eq!(deploy.first_required_arg().map(|a| a.name.as_str()), Some("target"));
    assert_eq!(deploy.declared_args().len(), 2);
    Ok(())
}

#[test]
fn dependency_cycle_is_rejected_at_load() {
    let file = task_file(
        r#"
[task.A]
cmd = "echo A"
depends_on = ["B"]

[task.B]
cmd = "echo B"
depends_on = ["A"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(TaskweaveError::CycleDetected(names)) => {
            assert!(names.iter().any(|n| n == "A" || n == "B"));
        }
        Err(e) => panic!("expected CycleDetected, got {e:?}"),
        Ok(_) => panic!("expected an error, got Ok"),
    }
}

#[test]
fn unknown_dependency_is_rejected_at_load() {
    let file = task_file(
        r#"
[task.A]
cmd = "echo A"
depends_on = ["NonExistent"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(TaskweaveError::ConfigError(msg)) => {
            assert!(msg.contains("unknown dependency"));
            assert!(msg.contains("NonExistent"));
        }
        Err(e) => panic!("expected ConfigError, got {e:?}"),
        Ok(_) => panic!("expected an error, got Ok"),
    }
}

#[test]
fn unknown_finalizer_is_rejected_at_load() {
    let file = task_file(
        r#"
[task.A]
cmd = "echo A"
finally = ["ghost"]
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(TaskweaveError::ConfigError(_))
    ));
}

#[test]
fn self_dependency_is_rejected_at_load() {
    let file = task_file(
        r#"
[task.A]
cmd = "echo A"
depends_on = ["a"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(TaskweaveError::ConfigError(msg)) => assert!(msg.contains("itself")),
        Err(e) => panic!("expected ConfigError, got {e:?}"),
        Ok(_) => panic!("expected an error, got Ok"),
    }
}

#[test]
fn invalid_pattern_is_rejected_at_load() {
    let file = task_file(
        r#"
[task.A]
cmd = "echo A"

[task.A.args.level]
pattern = "(unclosed"
"#,
    );

    match load_and_validate(file.path()) {
        Err(TaskweaveError::ConfigError(msg)) => assert!(msg.contains("invalid pattern")),
        Err(e) => panic!("expected ConfigError, got {e:?}"),
        Ok(_) => panic!("expected an error, got Ok"),
    }
}

#[test]
fn case_only_duplicates_are_rejected_at_load() {
    let file = task_file(
        r#"
[task.build]
cmd = "echo 1"

[task.Build]
cmd = "echo 2"
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(TaskweaveError::DuplicateTask { .. })
    ));
}

#[test]
fn empty_file_is_rejected() {
    let file = task_file("");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(TaskweaveError::ConfigError(_))
    ));
}

#[test]
fn bad_policy_value_is_a_toml_error() {
    let file = task_file(
        r#"
[config]
on_failure = "sometimes"

[task.A]
cmd = "echo A"
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(TaskweaveError::TomlError(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(
        load_and_validate("/definitely/not/here/Taskweave.toml"),
        Err(TaskweaveError::IoError(_))
    ));
}

#[test]
fn config_flag_defaults_to_the_task_file_in_the_current_directory() {
    let args = CliArgs::try_parse_from(["taskweave", "build"]).unwrap();
    assert_eq!(args.config, default_config_path());
    assert_eq!(args.tokens, vec!["build"]);

    let args = CliArgs::try_parse_from(["taskweave", "--config", "ci.toml", "build", "-v"]).unwrap();
    assert_eq!(args.config.to_str(), Some("ci.toml"));
    assert_eq!(args.tokens, vec!["build", "-v"]);
}

#[cfg(unix)]
#[tokio::test]
async fn shell_tasks_stream_output_and_receive_arguments() -> TestResult {
    init_tracing();
    let file = task_file(
        r#"
[task.greet]
cmd = "echo hello $TASKWEAVE_ARG_WHO_AM_I; echo oops >&2"

[task.greet.args.who-am-i]
required = true

[task.all]
depends_on = ["greet"]
"#,
    );
    let registry = load_and_validate(file.path())?.into_registry()?;

    let out = CaptureBuffer::new();
    let outcome = with_timeout(run_registry(
        &registry,
        ["all", "--who-am-i=world"],
        out.writer(),
        CancellationToken::new(),
    ))
    .await?;

    let RunOutcome::Finished(report) = outcome else {
        panic!("expected a finished run");
    };
    assert!(report.is_success());

    let lines = out.lines();
    assert!(lines.iter().any(|l| l == "       | hello world"), "{lines:?}");
    assert!(lines.iter().any(|l| l == "       | oops"), "{lines:?}");
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn failing_shell_command_fails_the_task() -> TestResult {
    init_tracing();
    let file = task_file(
        r#"
[task.broken]
cmd = "exit 3"
"#,
    );
    let registry = load_and_validate(file.path())?.into_registry()?;

    let out = CaptureBuffer::new();
    let outcome = with_timeout(run_registry(
        &registry,
        ["broken"],
        out.writer(),
        CancellationToken::new(),
    ))
    .await?;

    assert_eq!(outcome.exit_code(), 2);
    assert!(out.has_line_starting_with("FAIL   | broken in "));
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn dry_run_prints_the_command_without_running_it() -> TestResult {
    init_tracing();
    let file = task_file(
        r#"
[task.wipe]
cmd = "exit 1"
"#,
    );
    let registry = load_and_validate(file.path())?.into_registry()?;

    let out = CaptureBuffer::new();
    let outcome = with_timeout(run_registry(
        &registry,
        ["wipe", "-n"],
        out.writer(),
        CancellationToken::new(),
    ))
    .await?;

    assert_eq!(outcome.exit_code(), 0);
    assert!(out.lines().iter().any(|l| l == "       | exec: exit 1"));
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn cancellation_kills_a_running_command() -> TestResult {
    init_tracing();
    let file = task_file(
        r#"
[task.hang]
cmd = "sleep 30"
"#,
    );
    let registry = load_and_validate(file.path())?.into_registry()?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            cancel.cancel();
        });
    }

    let out = CaptureBuffer::new();
    let outcome = with_timeout(run_registry(&registry, ["hang"], out.writer(), cancel)).await?;

    assert_eq!(outcome.exit_code(), 2);
    assert!(out.contents().contains("was cancelled"));
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn command_line_is_echoed_only_when_verbose() -> TestResult {
    init_tracing();
    let file = task_file(
        r#"
[task.say]
cmd = "echo said"
"#,
    );
    let registry = load_and_validate(file.path())?.into_registry()?;

    let quiet = CaptureBuffer::new();
    with_timeout(run_registry(&registry, ["say"], quiet.writer(), CancellationToken::new())).await?;
    assert!(!quiet.contents().contains("exec: echo said"));
    assert!(quiet.lines().iter().any(|l| l == "       | said"));

    let loud = CaptureBuffer::new();
    with_timeout(run_registry(&registry, ["say", "-v"], loud.writer(), CancellationToken::new())).await?;
    assert!(loud.lines().iter().any(|l| l == "       | exec: echo said"));
    assert!(loud.lines().iter().any(|l| l == "       | said"));
    Ok(())
}
