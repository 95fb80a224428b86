use crate::attachment::{Attachment, LocalFile};
use crate::conversation::{Role, Turn};
use crate::core::error::{CompletionError, UploadError};
use crate::persona::Persona;
use crate::providers::base_client::HttpClient;
use crate::providers::gemini::types::*;
use crate::providers::gemini::upload;
use tracing::{debug, warn};

/// Maps one turn to the provider's part list: every attachment in order,
/// then exactly one text part.
pub fn turn_to_content(turn: &Turn) -> GeminiContent {
    let mut parts: Vec<GeminiPart> = turn
        .attachments
        .iter()
        .map(|attachment| {
            GeminiPart::FileData(FileData {
                file_uri: attachment.reference.clone(),
                mime_type: attachment.mime_type.clone(),
            })
        })
        .collect();
    parts.push(GeminiPart::Text(turn.text.clone()));

    GeminiContent {
        role: turn.role,
        parts,
    }
}

/// Builds the request body: the persona preamble when its prompt is
/// non-empty, then every turn in store order.
pub fn build_payload(conversation: &[Turn], persona: &Persona) -> GenerateContentRequest {
    let mut contents = Vec::with_capacity(conversation.len() + 1);

    if persona.has_preamble() {
        contents.push(GeminiContent {
            role: Role::System,
            parts: vec![GeminiPart::Text(persona.system_prompt.to_string())],
        });
    }
    contents.extend(conversation.iter().map(turn_to_content));

    GenerateContentRequest {
        contents,
        generation_config: GenerationConfig::default(),
    }
}

/// Reads the reply text out of a `generateContent` response body.
pub fn parse_completion(body: &str) -> Result<String, CompletionError> {
    let parsed: GeminiResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or(CompletionError::NoCandidates)?;

    let content = candidate
        .content
        .ok_or_else(|| CompletionError::NoContent("candidate has no content".to_string()))?;
    if content.parts.is_empty() {
        return Err(CompletionError::NoContent(
            "candidate content has no parts".to_string(),
        ));
    }

    content
        .parts
        .into_iter()
        .find_map(|part| part.text)
        .ok_or_else(|| CompletionError::NoContent("no text part in candidate".to_string()))
}

#[derive(Clone)]
pub struct GeminiClient {
    pub model: String,
    client: HttpClient,
}

impl GeminiClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        let mut client = HttpClient::new(base_url);

        // Add API key to query params
        client.set_query_param("key", api_key);

        Self { client, model }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.client.set_query_param("key", api_key);
    }

    pub fn has_api_key(&self) -> bool {
        self.client.query_param("key").is_some_and(|k| !k.is_empty())
    }

    pub async fn generate_content(
        &self,
        conversation: &[Turn],
        persona: &Persona,
    ) -> Result<String, CompletionError> {
        let payload = build_payload(conversation, persona);
        debug!(
            model = %self.model,
            contents = payload.contents.len(),
            persona = persona.id,
            "requesting completion"
        );

        let response = self
            .client
            .post(
                &format!("v1beta/models/{}:generateContent", self.model),
                &payload,
            )
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "completion call failed");
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion(&body)
    }

    pub async fn upload(&self, file: &LocalFile) -> Result<Attachment, UploadError> {
        upload::upload_file(&self.client, file).await
    }
}
