//! Mock LLM provider for testing
//!
//! Answers with a default response unless a scripted rule matches the
//! prompt. Rules are checked in the order they were added; the first rule
//! whose needle occurs in the prompt decides the outcome.

use crate::client::{LLMClient, LLMRequest, LLMResponse};
use crate::error::{LLMError, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

enum Outcome {
    Respond(String),
    Fail(String),
}

struct Rule {
    needle: String,
    outcome: Outcome,
    delay: Option<Duration>,
}

/// Mock LLM provider for testing
pub struct MockProvider {
    name: String,
    default_response: String,
    rules: Vec<Rule>,
    calls: Mutex<Vec<LLMRequest>>,
}

impl MockProvider {
    /// Create a new mock provider
    pub fn new() -> Self {
        Self::with_response("Mock LLM response")
    }

    /// Create with custom default response
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            name: "mock".to_string(),
            default_response: response.into(),
            rules: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer `response` to any prompt containing `needle`
    pub fn respond_to(mut self, needle: impl Into<String>, response: impl Into<String>) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            outcome: Outcome::Respond(response.into()),
            delay: None,
        });
        self
    }

    /// Fail any prompt containing `needle`
    pub fn fail_on(mut self, needle: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            outcome: Outcome::Fail(message.into()),
            delay: None,
        });
        self
    }

    /// Delay the answer to prompts containing `needle`
    pub fn delay_on(
        mut self,
        needle: impl Into<String>,
        response: impl Into<String>,
        delay: Duration,
    ) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            outcome: Outcome::Respond(response.into()),
            delay: Some(delay),
        });
        self
    }

    /// Requests received so far, in arrival order
    pub fn calls(&self) -> Vec<LLMRequest> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Prompts received so far, in arrival order
    pub fn prompts(&self) -> Vec<String> {
        self.calls().into_iter().map(|r| r.prompt).collect()
    }

    fn matching_rule(&self, prompt: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| prompt.contains(&rule.needle))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for MockProvider {
    async fn call(&self, request: LLMRequest) -> Result<LLMResponse> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        let content = match self.matching_rule(&request.prompt) {
            Some(rule) => {
                if let Some(delay) = rule.delay {
                    tokio::time::sleep(delay).await;
                }
                match &rule.outcome {
                    Outcome::Respond(text) => text.clone(),
                    Outcome::Fail(message) => {
                        return Err(LLMError::ApiCallFailed(message.clone()));
                    }
                }
            }
            None => self.default_response.clone(),
        };

        Ok(LLMResponse::new(content, request.model)
            .with_tokens(10)
            .with_finish_reason("stop"))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
