use async_trait::async_trait;

/// Repository for text generation.
/// Abstracts the underlying generative-language provider.
#[async_trait]
pub trait GenerationRepository: Send + Sync {
    /// Generate a reply for the given prompt with a single upstream call
    ///
    /// # Errors
    /// Returns error detail (for logging only) if the provider fails or
    /// returns no usable text
    async fn generate(&self, prompt: &str) -> Result<String, String>;
}
