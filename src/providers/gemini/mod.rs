use crate::attachment::{Attachment, LocalFile};
use crate::conversation::Turn;
use crate::core::error::{CompletionError, UploadError};
use crate::persona::Persona;
use crate::providers::ChatProvider;
use async_trait::async_trait;

mod client;
mod types;
mod upload;

pub use client::GeminiClient;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-8b";

#[derive(Clone)]
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    pub fn with_endpoint(endpoint: String, api_key: Option<String>, model: String) -> Self {
        let api_key = api_key.unwrap_or_default();
        Self {
            client: GeminiClient::new(endpoint, api_key, model),
        }
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn model(&self) -> &str {
        &self.client.model
    }

    fn set_api_key(&mut self, api_key: String) {
        self.client.set_api_key(api_key);
    }

    fn has_api_key(&self) -> bool {
        self.client.has_api_key()
    }

    async fn upload_file(&self, file: &LocalFile) -> Result<Attachment, UploadError> {
        self.client.upload(file).await
    }

    async fn request_completion(
        &self,
        conversation: &[Turn],
        persona: &Persona,
    ) -> Result<Turn, CompletionError> {
        let text = self.client.generate_content(conversation, persona).await?;
        Ok(Turn::model(text))
    }
}
