//! RecordingLogic: counts calls and records what it saw.

use crate::error::OperationError;
use crate::flow::Flow;
use crate::logic::Logic;
use serde_json::Value;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Logic that records every input and settings value it receives, then
/// delegates to a reply function. Share it through an `Arc` to inspect it
/// after the operation has been built.
pub struct RecordingLogic {
    calls: AtomicUsize,
    inputs: Mutex<Vec<Value>>,
    settings: Mutex<Vec<Option<Value>>>,
    reply: Box<dyn Fn(Value, Option<&Value>) -> Flow + Send + Sync>,
}

impl RecordingLogic {
    /// Record, then reply with `reply(input, settings)`.
    pub fn new<F>(reply: F) -> Self
    where
        F: Fn(Value, Option<&Value>) -> Flow + Send + Sync + 'static,
    {
        Self {
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(vec![]),
            settings: Mutex::new(vec![]),
            reply: Box::new(reply),
        }
    }

    /// Succeed with the input unchanged.
    pub fn echo() -> Self {
        Self::new(|input, _| Flow::success(input))
    }

    /// Fail with the input unchanged.
    pub fn reject() -> Self {
        Self::new(|input, _| Flow::fail(input))
    }

    /// Number of calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Inputs seen, in call order.
    pub fn inputs(&self) -> Vec<Value> {
        self.inputs.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Settings seen, in call order.
    pub fn settings(&self) -> Vec<Option<Value>> {
        self.settings.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Logic for RecordingLogic {
    fn call(&self, input: Value, settings: Option<&Value>) -> Result<Flow, OperationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut inputs) = self.inputs.lock() {
            inputs.push(input.clone());
        }
        if let Ok(mut seen) = self.settings.lock() {
            seen.push(settings.cloned());
        }
        Ok((self.reply)(input, settings))
    }
}
