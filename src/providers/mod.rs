use crate::attachment::{Attachment, LocalFile};
use crate::conversation::Turn;
use crate::core::error::{CompletionError, UploadError};
use crate::persona::Persona;
use async_trait::async_trait;

pub mod base_client;
pub mod gemini;
#[cfg(test)]
pub mod test_server;

/// The two calls the chat client makes against the remote API.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn model(&self) -> &str;

    fn set_api_key(&mut self, api_key: String);

    fn has_api_key(&self) -> bool;

    /// Stores `file` remotely and returns a reference usable in requests.
    async fn upload_file(&self, file: &LocalFile) -> Result<Attachment, UploadError>;

    /// Asks for the reply to `conversation`, whose last turn is the one
    /// being sent.
    async fn request_completion(
        &self,
        conversation: &[Turn],
        persona: &Persona,
    ) -> Result<Turn, CompletionError>;
}
