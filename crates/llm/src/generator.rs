use async_trait::async_trait;

use crate::error::GenerationError;

/// A black-box text generator: one prompt in, one completion out.
///
/// Implementations make a single attempt; retry and fallback policy
/// belongs to the caller.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
