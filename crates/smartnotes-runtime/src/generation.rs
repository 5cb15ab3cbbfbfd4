//! Generation capability
//!
//! The orchestrator hands each interpolated prompt to a [`Generator`] along
//! with the field's generation type. It depends only on this request/response
//! shape; provider wire formats live in `smartnotes-llm`.

use crate::error::{Result, RuntimeError};
use async_trait::async_trait;
use smartnotes_core::GenerationType;
use smartnotes_llm::{LLMClient, LLMRequest};
use std::collections::HashMap;
use std::sync::Arc;

/// External text-generation capability
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce the text for one field from its interpolated prompt
    async fn generate(&self, prompt: &str, generation_type: GenerationType) -> Result<String>;
}

/// Chat-completion generator backed by an LLM client
pub struct ChatGenerator {
    client: Arc<dyn LLMClient>,
    model: String,
    system: Option<String>,
    temperature: Option<f32>,
}

impl ChatGenerator {
    /// Create a generator using `model` on `client`
    pub fn new(client: Arc<dyn LLMClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            system: None,
            temperature: None,
        }
    }

    /// Set a system message sent with every prompt
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Generator for ChatGenerator {
    async fn generate(&self, prompt: &str, _generation_type: GenerationType) -> Result<String> {
        let mut request = LLMRequest::new(prompt, self.model.clone());
        request.system = self.system.clone();
        request.temperature = self.temperature;

        let response = self.client.call(request).await?;

        if response.content.trim().is_empty() {
            return Err(RuntimeError::GenerationRequestFailed(format!(
                "{} returned an empty response",
                self.client.name()
            )));
        }

        Ok(response.content)
    }
}

/// Dispatches each request to the generator registered for its type
#[derive(Default, Clone)]
pub struct GeneratorRegistry {
    generators: HashMap<GenerationType, Arc<dyn Generator>>,
}

impl GeneratorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generator (builder form)
    pub fn with_generator(
        mut self,
        generation_type: GenerationType,
        generator: Arc<dyn Generator>,
    ) -> Self {
        self.register(generation_type, generator);
        self
    }

    /// Register or replace the generator for a type
    pub fn register(&mut self, generation_type: GenerationType, generator: Arc<dyn Generator>) {
        self.generators.insert(generation_type, generator);
    }

    pub fn supports(&self, generation_type: GenerationType) -> bool {
        self.generators.contains_key(&generation_type)
    }
}

#[async_trait]
impl Generator for GeneratorRegistry {
    async fn generate(&self, prompt: &str, generation_type: GenerationType) -> Result<String> {
        let generator = self.generators.get(&generation_type).ok_or_else(|| {
            RuntimeError::GenerationRequestFailed(format!(
                "no generator registered for {}",
                generation_type
            ))
        })?;
        generator.generate(prompt, generation_type).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartnotes_llm::MockProvider;

    #[tokio::test]
    async fn test_chat_generator_returns_content() {
        let provider = Arc::new(MockProvider::new().respond_to("perro", "dog"));
        let generator = ChatGenerator::new(provider.clone(), "gpt-4o").with_system("be brief");

        let text = generator
            .generate("Translate perro", GenerationType::Chat)
            .await
            .unwrap();
        assert_eq!(text, "dog");

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "gpt-4o");
        assert_eq!(calls[0].system.as_deref(), Some("be brief"));
    }

    #[tokio::test]
    async fn test_chat_generator_rejects_empty_response() {
        let provider = Arc::new(MockProvider::with_response("   "));
        let generator = ChatGenerator::new(provider, "gpt-4o");

        let err = generator
            .generate("anything", GenerationType::Chat)
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::GenerationRequestFailed(_)));
    }

    #[tokio::test]
    async fn test_chat_generator_maps_provider_failure() {
        let provider = Arc::new(MockProvider::new().fail_on("x", "quota exceeded"));
        let generator = ChatGenerator::new(provider, "gpt-4o");

        let err = generator.generate("x", GenerationType::Chat).await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_registry_dispatches_by_type() {
        let chat = Arc::new(ChatGenerator::new(
            Arc::new(MockProvider::with_response("chat")),
            "gpt-4o",
        ));
        let audio = Arc::new(ChatGenerator::new(
            Arc::new(MockProvider::with_response("[sound:word.mp3]")),
            "audio",
        ));
        let registry = GeneratorRegistry::new()
            .with_generator(GenerationType::Chat, chat)
            .with_generator(GenerationType::Audio, audio);

        assert_eq!(
            registry.generate("p", GenerationType::Chat).await.unwrap(),
            "chat"
        );
        assert_eq!(
            registry.generate("p", GenerationType::Audio).await.unwrap(),
            "[sound:word.mp3]"
        );
    }

    #[tokio::test]
    async fn test_registry_without_generator_fails() {
        let registry = GeneratorRegistry::new();
        assert!(!registry.supports(GenerationType::Audio));

        let err = registry
            .generate("p", GenerationType::Audio)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no generator registered for Forvo Audio"));
    }
}
