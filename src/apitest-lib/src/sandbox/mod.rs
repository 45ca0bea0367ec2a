//! Assertion scripts run in a fresh Boa context on a dedicated thread.
//!
//! The context only sees the frozen globals installed by [`bindings::install`];
//! there is no module loader, filesystem, network or timer access. Evaluation
//! yields every few instructions and is dropped once the deadline passes, so a
//! timed-out script stops running and its thread exits.

pub mod bindings;

use crate::core::error::SandboxError;
use crate::model::{AssertionResult, CapturedRequest, CapturedResponse};
use crate::resolve::ExecutionRecord;
use boa_engine::{Context, Script, Source};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::future::{poll_fn, Future};
use std::pin::pin;
use std::sync::mpsc;
use std::task::Poll;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

pub const PASSED_MESSAGE: &str = "All assertions passed";

const LOOP_ITERATION_LIMIT: u64 = 50_000_000;
const RECURSION_LIMIT: usize = 1_024;
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;
// Instructions between deadline checks.
const INSTRUCTION_BUDGET: u32 = 1_024;
// Extra wait for a worker stuck inside a native call.
const WORKER_GRACE: Duration = Duration::from_secs(1);

/// Everything a script may look at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptInput {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
    pub params: Map<String, Value>,
    pub records: Value,
}

impl ScriptInput {
    pub fn new(
        response: &CapturedResponse,
        request: &CapturedRequest,
        record: &ExecutionRecord,
    ) -> Self {
        Self {
            status: response.status_code,
            headers: response.headers.clone(),
            body: response.body.clone(),
            params: request.query.clone(),
            records: serde_json::to_value(record).unwrap_or_else(|_| Value::Array(Vec::new())),
        }
    }
}

enum Outcome {
    Completed,
    Threw(String),
}

#[derive(Debug, Clone)]
pub struct AssertionEvaluator {
    timeout: Duration,
}

impl AssertionEvaluator {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Scores a response. Never fails: every problem becomes a failed result.
    pub async fn evaluate(&self, script: &str, input: ScriptInput) -> AssertionResult {
        if script.trim().is_empty() {
            return fallback(input.status);
        }
        let script = script.to_string();
        let timeout = self.timeout;
        let span = tracing::Span::current();
        match tokio::task::spawn_blocking(move || span.in_scope(|| run(script, input, timeout)))
            .await
        {
            Ok(result) => result,
            Err(e) => AssertionResult::fail(format!("Script worker failed: {e}")),
        }
    }

    /// Blocking variant of [`AssertionEvaluator::evaluate`].
    pub fn evaluate_blocking(&self, script: &str, input: ScriptInput) -> AssertionResult {
        if script.trim().is_empty() {
            return fallback(input.status);
        }
        run(script.to_string(), input, self.timeout)
    }
}

/// Pass iff the status is 2xx.
pub fn fallback(status: u16) -> AssertionResult {
    if (200..=299).contains(&status) {
        AssertionResult::pass(format!("Status code {status} is successful"))
    } else {
        AssertionResult::fail(format!("Expected a 2xx status code, got {status}"))
    }
}

fn run(script: String, input: ScriptInput, timeout: Duration) -> AssertionResult {
    match run_on_worker(script, input, timeout) {
        Ok(Outcome::Completed) => AssertionResult::pass(PASSED_MESSAGE),
        Ok(Outcome::Threw(message)) => {
            tracing::debug!(%message, "assertion script threw");
            AssertionResult::fail(message)
        }
        Err(e) => {
            tracing::warn!("assertion script did not complete: {e}");
            AssertionResult::fail(e.to_string())
        }
    }
}

type WorkerResult = Result<Outcome, SandboxError>;

fn run_on_worker(
    script: String,
    input: ScriptInput,
    timeout: Duration,
) -> Result<Outcome, SandboxError> {
    let (_worker, rx) = spawn_worker(script, input, timeout)?;
    match rx.recv_timeout(timeout + WORKER_GRACE) {
        Ok(outcome) => outcome,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            Err(SandboxError::Timeout(timeout.as_millis() as u64))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(SandboxError::WorkerLost),
    }
}

fn spawn_worker(
    script: String,
    input: ScriptInput,
    timeout: Duration,
) -> Result<(JoinHandle<()>, mpsc::Receiver<WorkerResult>), SandboxError> {
    let (tx, rx) = mpsc::sync_channel(1);
    let span = tracing::Span::current();
    let deadline = Instant::now() + timeout;

    let worker = std::thread::Builder::new()
        .name("apitest-script".to_string())
        .stack_size(WORKER_STACK_SIZE)
        .spawn(move || {
            let _entered = span.enter();
            // The receiver is gone if the caller gave up.
            let _ = tx.send(execute(&script, &input, deadline, timeout));
        })
        .map_err(|e| SandboxError::Setup(e.to_string()))?;
    Ok((worker, rx))
}

fn execute(
    source: &str,
    input: &ScriptInput,
    deadline: Instant,
    timeout: Duration,
) -> WorkerResult {
    let mut context = Context::default();
    context
        .runtime_limits_mut()
        .set_loop_iteration_limit(LOOP_ITERATION_LIMIT);
    context.runtime_limits_mut().set_recursion_limit(RECURSION_LIMIT);

    if let Err(e) = bindings::install(&mut context, input) {
        return Err(SandboxError::Setup(bindings::error_message(&e, &mut context)));
    }

    let script = match Script::parse(Source::from_bytes(source.as_bytes()), None, &mut context) {
        Ok(script) => script,
        Err(e) => return Ok(Outcome::Threw(bindings::error_message(&e, &mut context))),
    };

    let completed = {
        let mut evaluation =
            pin!(script.evaluate_async_with_budget(&mut context, INSTRUCTION_BUDGET));
        futures::executor::block_on(poll_fn(|cx| {
            if Instant::now() >= deadline {
                return Poll::Ready(None);
            }
            evaluation.as_mut().poll(cx).map(Some)
        }))
    };

    match completed {
        Some(Ok(_)) => Ok(Outcome::Completed),
        Some(Err(e)) => Ok(Outcome::Threw(bindings::error_message(&e, &mut context))),
        None => Err(SandboxError::Timeout(timeout.as_millis() as u64)),
    }
}
