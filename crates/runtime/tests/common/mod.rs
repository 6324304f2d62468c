//! Shared mocks for runtime integration tests.

#![allow(dead_code, clippy::panic, clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use waypoint_core::*;
use waypoint_runtime::*;

pub type Responder = Box<dyn Fn(usize) -> Result<ReasoningResponse, ProviderError> + Send + Sync>;

/// Reasoning provider driven by a closure over the call number.
pub struct ScriptedReasoning {
    responder: Responder,
    calls: AtomicUsize,
    gate: Option<(usize, Arc<Semaphore>)>,
}

impl ScriptedReasoning {
    pub fn new(responder: impl Fn(usize) -> Result<ReasoningResponse, ProviderError> + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Block call number `at_call` until a permit is added to the returned semaphore.
    pub fn gated(mut self, at_call: usize) -> (Self, Arc<Semaphore>) {
        let permits = Arc::new(Semaphore::new(0));
        self.gate = Some((at_call, permits.clone()));
        (self, permits)
    }

    pub fn always(decision: Decision) -> Self {
        Self::new(move |_| respond(decision.clone()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReasoningProvider for ScriptedReasoning {
    async fn decide(&self, _request: &ReasoningRequest) -> Result<ReasoningResponse, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((at_call, permits)) = &self.gate {
            if n == *at_call {
                permits.acquire().await.unwrap().forget();
            }
        }
        (self.responder)(n)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Perception provider that fails its first `fail_first` captures.
pub struct StubPerception {
    fail_first: usize,
    calls: AtomicUsize,
}

impl StubPerception {
    pub fn new() -> Self {
        Self::failing(0)
    }

    pub fn failing(fail_first: usize) -> Self {
        Self {
            fail_first,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PerceptionProvider for StubPerception {
    async fn capture(&self, _handle: &dyn AutomationHandle) -> Result<PerceptionSnapshot, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.fail_first {
            return Err(ProviderError::Perception("surface not ready".to_string()));
        }
        Ok(PerceptionSnapshot::new("[1]<input name=q />\n[2]<button>Search</button>")
            .with_location("https://example.com")
            .with_elements([1, 2]))
    }
}

#[derive(Default)]
pub struct RecordingHandle {
    calls: Mutex<Vec<String>>,
    closes: AtomicUsize,
    close_gate: Option<Arc<Semaphore>>,
}

impl RecordingHandle {
    /// `close` counts the call, then blocks until a permit is added to the returned semaphore.
    pub fn gated_close() -> (Self, Arc<Semaphore>) {
        let permits = Arc::new(Semaphore::new(0));
        let handle = Self {
            close_gate: Some(permits.clone()),
            ..Self::default()
        };
        (handle, permits)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn push(&self, call: String) -> Result<(), ProviderError> {
        self.calls.lock().push(call);
        Ok(())
    }
}

#[async_trait]
impl AutomationHandle for RecordingHandle {
    async fn navigate(&self, url: &str) -> Result<(), ProviderError> {
        self.push(format!("navigate:{}", url))
    }

    async fn click(&self, index: u32) -> Result<(), ProviderError> {
        self.push(format!("click:{}", index))
    }

    async fn input_text(&self, index: u32, text: &str) -> Result<(), ProviderError> {
        self.push(format!("input:{}:{}", index, text))
    }

    async fn select_option(&self, index: u32, text: &str) -> Result<(), ProviderError> {
        self.push(format!("select:{}:{}", index, text))
    }

    async fn scroll(&self, direction: ScrollDirection, index: Option<u32>) -> Result<(), ProviderError> {
        self.push(format!("scroll:{:?}:{:?}", direction, index))
    }

    async fn key_press(&self, key: &str) -> Result<(), ProviderError> {
        self.push(format!("key:{}", key))
    }

    async fn go_back(&self) -> Result<(), ProviderError> {
        self.push("back".to_string())
    }

    async fn go_forward(&self) -> Result<(), ProviderError> {
        self.push("forward".to_string())
    }

    async fn refresh(&self) -> Result<(), ProviderError> {
        self.push("refresh".to_string())
    }

    async fn close(&self) -> Result<(), ProviderError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if let Some(permits) = &self.close_gate {
            permits.acquire().await.unwrap().forget();
        }
        Ok(())
    }
}

/// Collects everything the loop reports through the observer hooks.
#[derive(Default)]
pub struct CollectingObserver {
    pub decisions: Mutex<Vec<Decision>>,
    pub events: Mutex<Vec<StepEvent>>,
    pub completed: Mutex<Option<TaskOutput>>,
}

#[async_trait]
impl TaskObserver for CollectingObserver {
    async fn on_decision(&self, decision: &Decision) {
        self.decisions.lock().push(decision.clone());
    }

    async fn on_step(&self, event: &StepEvent) {
        self.events.lock().push(event.clone());
    }

    async fn on_complete(&self, output: &TaskOutput) {
        *self.completed.lock() = Some(output.clone());
    }
}

pub fn fast_config() -> RuntimeConfig {
    RuntimeConfig {
        retry_base_delay_ms: 1,
        perception_backoff_ms: 1,
        pause_poll_interval_ms: 10,
        settle_delay_ms: 0,
        action_timeout_ms: 1000,
        ..RuntimeConfig::default()
    }
}

pub fn supervisor(
    reasoning: Arc<dyn ReasoningProvider>,
    perception: Arc<dyn PerceptionProvider>,
    config: RuntimeConfig,
) -> Supervisor {
    Supervisor::builder()
        .reasoning(reasoning)
        .perception(perception)
        .config(config)
        .build()
        .unwrap()
}

pub fn decision(actions: Vec<ProposedAction>) -> Decision {
    Decision {
        thoughts: "working on it".to_string(),
        next_goal: "make progress".to_string(),
        actions,
    }
}

pub fn respond(decision: Decision) -> Result<ReasoningResponse, ProviderError> {
    Ok(ReasoningResponse {
        decision,
        usage: None,
    })
}

pub fn navigate() -> ProposedAction {
    ProposedAction::new("goToUrl", json!({"url": "https://example.com/search"}))
}

pub fn complete(text: &str) -> ProposedAction {
    ProposedAction::new("complete", json!({ "text": text }))
}

/// Poll until `check` holds, failing the test after two seconds.
pub async fn eventually(mut check: impl FnMut() -> bool) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}
