use crate::attachment::{
    Attachment, AttachmentKind, KNOWLEDGE_BASE_ACCEPT, LocalFile, check_accept,
};
use crate::conversation::{ConversationStore, Turn};
use crate::core::error::{ChatError, UploadError};
use crate::persona::{self, Persona};
use crate::providers::ChatProvider;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// All state of one chat session. Handlers receive it explicitly.
pub struct Session {
    provider: Box<dyn ChatProvider>,
    persona: &'static Persona,
    store: ConversationStore,
    pending: Vec<Attachment>,
    knowledge_base: Option<LocalFile>,
    busy: bool,
    pub should_continue: bool,
}

impl Session {
    pub fn new(provider: Box<dyn ChatProvider>) -> Self {
        Self {
            provider,
            persona: persona::default_persona(),
            store: ConversationStore::new(),
            pending: Vec::new(),
            knowledge_base: None,
            busy: false,
            should_continue: true,
        }
    }

    pub fn persona(&self) -> &'static Persona {
        self.persona
    }

    /// Selects the persona used by future requests; existing turns are kept.
    pub fn select_persona(&mut self, id: &str) -> Result<&'static Persona, ChatError> {
        let persona = persona::lookup(id).map_err(ChatError::Input)?;
        self.persona = persona;
        Ok(persona)
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.provider.set_api_key(api_key);
    }

    pub fn has_api_key(&self) -> bool {
        self.provider.has_api_key()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn turns(&self) -> &[Turn] {
        self.store.all()
    }

    pub fn pending(&self) -> &[Attachment] {
        &self.pending
    }

    pub fn knowledge_base(&self) -> Option<&LocalFile> {
        self.knowledge_base.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub async fn attach(&mut self, kind: AttachmentKind, path: &Path) -> Result<Attachment, ChatError> {
        let mut results = self.attach_all(kind, &[path.to_path_buf()]).await?;
        results.remove(0).map_err(ChatError::from)
    }

    /// Uploads `paths` concurrently. Successful uploads join the pending list
    /// in the order of `paths`, whatever order the uploads finish in.
    pub async fn attach_all(
        &mut self,
        kind: AttachmentKind,
        paths: &[PathBuf],
    ) -> Result<Vec<Result<Attachment, UploadError>>, ChatError> {
        if self.busy {
            return Err(ChatError::Busy);
        }
        if !self.provider.has_api_key() {
            return Err(ChatError::MissingApiKey);
        }

        self.busy = true;
        let provider = self.provider.as_ref();
        let uploads = paths.iter().map(|path| async move {
            let file = LocalFile::read(path).await?;
            kind.check(&file)?;
            let attachment = provider.upload_file(&file).await?;
            Ok::<_, UploadError>(attachment)
        });
        let results = join_all(uploads).await;
        self.busy = false;

        for (path, result) in paths.iter().zip(&results) {
            match result {
                Ok(attachment) => {
                    debug!(file = %attachment.display_name, reference = %attachment.reference, "attached");
                    self.pending.push(attachment.clone());
                }
                Err(err) => warn!(path = %path.display(), error = %err, "attachment failed"),
            }
        }

        Ok(results)
    }

    /// Keeps the knowledge base file in memory. It is never sent.
    pub async fn set_knowledge_base(&mut self, path: &Path) -> Result<&LocalFile, ChatError> {
        let file = LocalFile::read(path).await?;
        check_accept(KNOWLEDGE_BASE_ACCEPT, &file)?;
        Ok(&*self.knowledge_base.insert(file))
    }

    /// Appends a user turn carrying the pending attachments, requests the
    /// reply and appends it. On failure the user turn stays in the store.
    pub async fn send(&mut self, text: &str) -> Result<Turn, ChatError> {
        if text.trim().is_empty() && self.pending.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.busy {
            return Err(ChatError::Busy);
        }
        if !self.provider.has_api_key() {
            return Err(ChatError::MissingApiKey);
        }

        let attachments = std::mem::take(&mut self.pending);
        self.store.append(Turn::user(text, attachments));

        self.busy = true;
        let result = self
            .provider
            .request_completion(self.store.all(), self.persona)
            .await;
        self.busy = false;

        match result {
            Ok(reply) => {
                self.store.append(reply.clone());
                Ok(reply)
            }
            Err(err) => {
                warn!(error = %err, "completion failed");
                Err(err.into())
            }
        }
    }
}
