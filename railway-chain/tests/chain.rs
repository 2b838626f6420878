//! Chain tests: threading, short-circuiting, settings and around hooks.

use railway_chain::{Chain, ChainBuilder, ChainOutcome, ChainRunStrategy, ChainRunner};
use railway_core::test_utils::{ConstantLogic, RecordingLogic};
use railway_core::{
    AnyContract, ChainError, ConfigError, Flow, NoneContract, OperationError, StepName, Typed,
};
use railway_op::{Operation, OperationBuilder};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn add(name: &str, amount: i64) -> Operation {
    OperationBuilder::passthrough(name)
        .logic_fn(move |input, _| {
            let n = input.as_i64().unwrap_or(0);
            Ok(Flow::success(n + amount))
        })
        .finalize()
        .unwrap()
}

fn recorded(name: &str, logic: &Arc<RecordingLogic>) -> Operation {
    OperationBuilder::passthrough(name)
        .logic_shared(logic.clone())
        .finalize()
        .unwrap()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Threading and short-circuiting
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn threads_output_into_next_input() {
    let double = OperationBuilder::passthrough("Double")
        .logic_fn(|input, _| Ok(Flow::success(input.as_i64().unwrap_or(0) * 2)))
        .finalize()
        .unwrap();
    let chain = ChainBuilder::new("Math")
        .step("a", add("AddOne", 1))
        .step("b", double)
        .step("c", add("AddTen", 10))
        .finalize()
        .unwrap();

    let outcome = chain.call(json!(4)).unwrap();
    assert!(outcome.is_successful());
    assert_eq!(outcome.success(), Some(&json!((4 + 1) * 2 + 10)));
    assert_eq!(outcome.step().map(StepName::as_str), Some("c"));
}

#[test]
fn stops_at_first_failure() {
    let first = Arc::new(RecordingLogic::echo());
    let third = Arc::new(RecordingLogic::echo());
    let chain = ChainBuilder::new("Halting")
        .step("first", recorded("First", &first))
        .step(
            "second",
            OperationBuilder::passthrough("Second")
                .logic(ConstantLogic::failing(json!({"message": "nope"}))),
        )
        .step("third", recorded("Third", &third))
        .finalize()
        .unwrap();

    let outcome = chain.call(json!("start")).unwrap();

    assert!(outcome.is_failure());
    assert_eq!(outcome.step().map(StepName::as_str), Some("second"));
    assert_eq!(outcome.failure(), Some(&json!({"message": "nope"})));
    assert_eq!(first.calls(), 1);
    assert_eq!(third.calls(), 0);
}

#[test]
fn step_errors_abort_with_step_name() {
    let chain = ChainBuilder::new("Raising")
        .step("ok", add("AddOne", 1))
        .step(
            "strict",
            OperationBuilder::new("Strict")
                .input(Typed::<String>::new())
                .output(AnyContract)
                .error(AnyContract)
                .logic(RecordingLogic::echo()),
        )
        .finalize()
        .unwrap();

    let err = chain.call(json!(1)).unwrap_err();
    assert_eq!(err.step().map(StepName::as_str), Some("strict"));
    assert!(matches!(
        err,
        ChainError::Step {
            source: OperationError::Contract(_),
            ..
        }
    ));
}

#[test]
fn derived_contracts() {
    let chain = ChainBuilder::new("Contracts")
        .step(
            "first",
            OperationBuilder::new("First")
                .input(NoneContract)
                .output(AnyContract)
                .error(Typed::<String>::named("FirstError"))
                .logic(RecordingLogic::echo()),
        )
        .step(
            "last",
            OperationBuilder::new("Last")
                .input(AnyContract)
                .output(Typed::<i64>::named("Count"))
                .error(Typed::<String>::named("LastError"))
                .logic(RecordingLogic::echo()),
        )
        .finalize()
        .unwrap();

    assert_eq!(chain.input().map(|c| c.name()), Some("None"));
    assert_eq!(chain.output().map(|c| c.name()), Some("Count"));
    let errors: Vec<&str> = chain.errors().into_iter().map(|c| c.name()).collect();
    assert_eq!(errors, vec!["FirstError", "LastError"]);
    assert_eq!(chain.len(), 2);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Settings
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn settings_chain(logic: &Arc<RecordingLogic>) -> Chain {
    ChainBuilder::new("Configured")
        .step(
            "configured",
            OperationBuilder::passthrough("Configured")
                .settings(AnyContract)
                .logic_shared(logic.clone()),
        )
        .step("plain", add("AddOne", 1))
        .default_settings("configured", json!({"mode": "default"}))
        .finalize()
        .unwrap()
}

#[test]
fn call_uses_chain_default_settings() {
    let logic = Arc::new(RecordingLogic::echo());
    let chain = settings_chain(&logic);
    chain.call(json!(1)).unwrap();
    assert_eq!(logic.settings(), vec![Some(json!({"mode": "default"}))]);
}

#[test]
fn with_does_not_touch_chain_defaults() {
    let logic = Arc::new(RecordingLogic::echo());
    let chain = settings_chain(&logic);

    chain
        .with([("configured", json!({"mode": "override"}))])
        .unwrap()
        .call(json!(1))
        .unwrap();
    chain.call(json!(1)).unwrap();

    assert_eq!(
        logic.settings(),
        vec![
            Some(json!({"mode": "override"})),
            Some(json!({"mode": "default"}))
        ]
    );
    assert_eq!(
        chain.default_settings("configured"),
        Some(&json!({"mode": "default"}))
    );
}

#[test]
fn overrides_replace_defaults_entirely() {
    let logic = Arc::new(RecordingLogic::echo());
    let chain = settings_chain(&logic);

    let call = chain.with([("plain", Value::Null)]).unwrap();
    assert_eq!(call.runner().settings("configured"), None);
    call.call(json!(1)).unwrap();

    assert_eq!(logic.settings(), vec![None]);
}

#[test]
fn unknown_override_is_ignored() {
    let logic = Arc::new(RecordingLogic::echo());
    let chain = settings_chain(&logic);
    let outcome = chain
        .with([("missing", json!(1))])
        .unwrap()
        .call(json!(1))
        .unwrap();
    assert!(outcome.is_successful());
}

#[test]
fn invalid_override_reports_step() {
    let logic = Arc::new(RecordingLogic::echo());
    let chain = settings_chain(&logic);
    let err = chain.with([("plain", json!({"not": "allowed"}))]).unwrap_err();
    assert_eq!(err.step().map(StepName::as_str), Some("plain"));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Around hook
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn around_wraps_the_run_and_sees_failures() {
    let log = Arc::new(Mutex::new(Vec::<String>::new()));
    let hook_log = Arc::clone(&log);
    let chain = ChainBuilder::new("Transactional")
        .step("ok", add("AddOne", 1))
        .step(
            "fail",
            OperationBuilder::passthrough("Fail").logic(RecordingLogic::reject()),
        )
        .around_fn(move |runner, input| {
            hook_log.lock().unwrap().push("begin".into());
            let outcome = runner.call(input)?;
            let end = if outcome.is_failure() { "rollback" } else { "commit" };
            hook_log.lock().unwrap().push(end.into());
            Ok(outcome)
        })
        .finalize()
        .unwrap();

    let outcome = chain.call(json!(1)).unwrap();
    assert!(outcome.is_failure());
    assert_eq!(outcome.step().map(StepName::as_str), Some("fail"));
    assert_eq!(outcome.value(), &json!(2));
    assert_eq!(*log.lock().unwrap(), vec!["begin", "rollback"]);
}

#[test]
fn around_applies_to_prepared_calls() {
    let seen = Arc::new(Mutex::new(Vec::<Value>::new()));
    let hook_seen = Arc::clone(&seen);
    let logic = Arc::new(RecordingLogic::echo());
    let chain = ChainBuilder::new("Hooked")
        .step(
            "configured",
            OperationBuilder::passthrough("Configured")
                .settings(AnyContract)
                .logic_shared(logic.clone()),
        )
        .around_fn(move |runner, input| {
            let settings = runner.settings("configured").cloned();
            hook_seen.lock().unwrap().push(settings.unwrap_or_default());
            runner.call(input)
        })
        .finalize()
        .unwrap();

    chain
        .with([("configured", json!("custom"))])
        .unwrap()
        .call(json!(1))
        .unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![json!("custom")]);
    assert!(chain.has_around());
}

#[test]
fn runner_bypasses_around() {
    let chain = ChainBuilder::new("Bypass")
        .step("ok", add("AddOne", 1))
        .around_fn(|_, _| Err(ChainError::Other("hook must not run".into())))
        .finalize()
        .unwrap();

    assert!(chain.call(json!(1)).is_err());
    let outcome = chain.runner().unwrap().call(json!(1)).unwrap();
    assert_eq!(outcome.value(), &json!(2));
}

#[test]
fn custom_chain_result_constructor() {
    let chain = ChainBuilder::new("Tagged")
        .step("ok", add("AddOne", 1))
        .result_constructor(|value, successful, step| {
            ChainOutcome::new(json!({"result": value}), successful, step)
        })
        .finalize()
        .unwrap();

    let outcome = chain.call(json!(1)).unwrap();
    assert_eq!(outcome.value(), &json!({"result": 2}));
}

#[test]
fn finalized_chain_is_shareable_across_threads() {
    let chain = ChainBuilder::new("Shared")
        .step("a", add("AddOne", 1))
        .step("b", add("AddTwo", 2))
        .finalize()
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let chain = chain.clone();
            std::thread::spawn(move || chain.call(json!(i)).unwrap().into_value())
        })
        .collect();
    let mut results: Vec<i64> = handles
        .into_iter()
        .map(|h| h.join().unwrap().as_i64().unwrap())
        .collect();
    results.sort();
    assert_eq!(results, vec![3, 4, 5, 6]);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Run strategies
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Counts runs, then threads the value with the built-in pipeline.
#[derive(Clone, Default)]
struct CountingRun {
    runs: Arc<AtomicUsize>,
}

impl ChainRunStrategy for CountingRun {
    fn run(&self, runner: &ChainRunner, input: Value) -> Result<ChainOutcome, ChainError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        runner.execute(input)
    }
}

#[test]
fn custom_runner_handles_every_entry_point() {
    let counting = CountingRun::default();
    let wrapped = Arc::new(AtomicUsize::new(0));
    let hook_count = Arc::clone(&wrapped);
    let chain = ChainBuilder::new("Counted")
        .step(
            "configured",
            OperationBuilder::passthrough("Configured")
                .settings(AnyContract)
                .logic(RecordingLogic::echo()),
        )
        .step("plain", add("AddOne", 1))
        .runner(counting.clone())
        .around_fn(move |runner, input| {
            hook_count.fetch_add(1, Ordering::SeqCst);
            runner.call(input)
        })
        .finalize()
        .unwrap();

    assert_eq!(chain.call(json!(1)).unwrap().value(), &json!(2));
    chain
        .with([("configured", json!("x"))])
        .unwrap()
        .call(json!(1))
        .unwrap();
    chain.runner().unwrap().call(json!(1)).unwrap();

    assert_eq!(counting.runs.load(Ordering::SeqCst), 3);
    assert_eq!(wrapped.load(Ordering::SeqCst), 2);
}

#[test]
fn custom_runner_can_drive_steps_itself() {
    let visited = Arc::new(Mutex::new(Vec::<String>::new()));
    let seen = Arc::clone(&visited);
    let chain = ChainBuilder::new("Lenient")
        .step("a", add("AddOne", 1))
        .step(
            "b",
            OperationBuilder::passthrough("Reject").logic(RecordingLogic::reject()),
        )
        .step("c", add("AddTen", 10))
        .runner_fn(move |runner, input| {
            // Keeps going past failures, reporting the last failed step.
            let mut value = input;
            let mut failed = None;
            let names: Vec<StepName> = runner.steps().map(|(name, _)| name.clone()).collect();
            for name in names {
                seen.lock().unwrap().push(name.to_string());
                let (ok, payload) = runner.call_step(name.as_str(), value)?.into_parts();
                if !ok {
                    failed = Some(name);
                }
                value = payload;
            }
            Ok(runner.finish(value, failed.is_none(), failed))
        })
        .finalize()
        .unwrap();

    let outcome = chain.call(json!(1)).unwrap();
    assert!(outcome.is_failure());
    assert_eq!(outcome.step().map(StepName::as_str), Some("b"));
    assert_eq!(outcome.value(), &json!(12));
    assert_eq!(*visited.lock().unwrap(), vec!["a", "b", "c"]);
}

#[test]
fn call_step_rejects_unknown_steps() {
    let chain = ChainBuilder::new("Single")
        .step("only", add("AddOne", 1))
        .finalize()
        .unwrap();
    let runner = chain.runner().unwrap();

    assert_eq!(runner.call_step("only", json!(1)).unwrap().value(), &json!(2));
    assert!(matches!(
        runner.call_step("missing", json!(1)),
        Err(ChainError::Config(ConfigError::UnknownStep { .. }))
    ));
}
