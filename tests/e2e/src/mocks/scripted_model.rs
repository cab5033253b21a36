//! Scripted language model
//!
//! Replays a queue of canned replies or failures in order, then falls back
//! to a fixed reply (or fails once the script runs dry). Every request is
//! recorded so tests can assert on prompts, safety policy and call counts.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use feedlens_core::{GenerationRequest, LanguageModel, ModelError};

enum Step {
    Reply(String),
    Fail(String),
}

/// Deterministic [`LanguageModel`] for tests
pub struct ScriptedModel {
    script: Mutex<VecDeque<Step>>,
    fallback: Option<String>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedModel {
    /// Empty script; every call fails until steps are queued
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call with `reply`
    pub fn always(reply: impl Into<String>) -> Self {
        Self {
            fallback: Some(reply.into()),
            ..Self::new()
        }
    }

    /// Queue a successful reply
    pub fn then_reply(self, reply: impl Into<String>) -> Self {
        self.push(Step::Reply(reply.into()));
        self
    }

    /// Queue a call failure
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.push(Step::Fail(message.into()));
        self
    }

    fn push(&self, step: Step) {
        self.script
            .lock()
            .expect("script lock poisoned")
            .push_back(step);
    }

    /// Number of generate calls so far
    pub fn calls(&self) -> usize {
        self.requests.lock().expect("request log poisoned").len()
    }

    /// Every request seen so far, oldest first
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().expect("request log poisoned").clone()
    }
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ModelError> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(request.clone());

        let step = self.script.lock().expect("script lock poisoned").pop_front();
        match step {
            Some(Step::Reply(reply)) => Ok(reply),
            Some(Step::Fail(message)) => Err(ModelError::Unavailable(message)),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| ModelError::Unavailable("script exhausted".to_string())),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
