use crate::attachment::{AttachmentKind, KNOWLEDGE_BASE_ACCEPT};
use crate::core::error::ChatError;
use crate::display;
use crate::persona;
use crate::session::Session;
use crate::utils::text::mask_secret;
use async_trait::async_trait;
use console::style;
use std::path::PathBuf;

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(
        &self,
        session: &mut Session,
        args: &[&str],
    ) -> Result<Option<String>, ChatError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct AttachCommand(pub AttachmentKind);
pub struct PendingCommand;
pub struct PersonaCommand;
pub struct PersonasCommand;
pub struct KeyCommand;
pub struct KnowledgeBaseCommand;
pub struct TranscriptCommand;
pub struct SettingsCommand;

#[async_trait]
impl CommandHandler for QuitCommand {
    async fn execute(
        &self,
        session: &mut Session,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        session.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the chat session"
    }
}

#[async_trait]
impl CommandHandler for AttachCommand {
    async fn execute(
        &self,
        session: &mut Session,
        args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let kind = self.0;
        if args.is_empty() {
            return Ok(Some(format!(
                "Usage: /{} <path>... (accepts {})",
                kind,
                kind.accept()
            )));
        }

        let paths: Vec<PathBuf> = args.iter().map(|arg| PathBuf::from(*arg)).collect();
        let results = session.attach_all(kind, &paths).await?;

        let lines: Vec<String> = paths
            .iter()
            .zip(results)
            .map(|(path, result)| match result {
                Ok(attachment) => format!(
                    "{} {}",
                    style("✔").green(),
                    attachment.display_name
                ),
                Err(err) => format!("{} {}: {}", style("✖").red(), path.display(), err),
            })
            .collect();
        display::display_pending(session.pending());

        Ok(Some(lines.join("\n")))
    }

    fn help(&self) -> &'static str {
        match self.0 {
            AttachmentKind::Image => "/image <path>... - Attach images (image/*)",
            AttachmentKind::Document => "/document <path>... - Attach documents (.pdf, .doc, .docx)",
            AttachmentKind::Video => "/video <path>... - Attach videos (video/*)",
        }
    }
}

#[async_trait]
impl CommandHandler for PendingCommand {
    async fn execute(
        &self,
        session: &mut Session,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        display::display_pending(session.pending());
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/pending - Show attachments waiting for the next message"
    }
}

#[async_trait]
impl CommandHandler for PersonaCommand {
    async fn execute(
        &self,
        session: &mut Session,
        args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        match args.first() {
            None => {
                let current = session.persona();
                Ok(Some(format!(
                    "Current persona: {} ({})",
                    current.display_name, current.id
                )))
            }
            Some(id) => {
                let selected = session.select_persona(id)?;
                display::display_header(selected, session.model());
                Ok(Some(format!("Persona set to: {}", selected.display_name)))
            }
        }
    }

    fn help(&self) -> &'static str {
        "/persona <id> - Show or change the persona"
    }
}

#[async_trait]
impl CommandHandler for PersonasCommand {
    async fn execute(
        &self,
        session: &mut Session,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let current = session.persona().id;
        let lines: Vec<String> = persona::list()
            .iter()
            .map(|p| {
                let marker = if p.id == current { "*" } else { " " };
                format!("{} {:<18} {}", marker, p.id, style(p.display_name).dim())
            })
            .collect();
        Ok(Some(lines.join("\n")))
    }

    fn help(&self) -> &'static str {
        "/personas - List available personas"
    }
}

#[async_trait]
impl CommandHandler for KeyCommand {
    async fn execute(
        &self,
        session: &mut Session,
        args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let key = match args.first() {
            Some(key) => key.to_string(),
            None => {
                let term = console::Term::stderr();
                term.write_str("API key: ")?;
                term.read_secure_line()?
            }
        };
        let key = key.trim().to_string();
        if key.is_empty() {
            return Ok(Some("API key unchanged.".to_string()));
        }

        let masked = mask_secret(&key);
        session.set_api_key(key);
        Ok(Some(format!("API key set ({}).", masked)))
    }

    fn help(&self) -> &'static str {
        "/key [key] - Set the API key (prompts with hidden input when omitted)"
    }
}

#[async_trait]
impl CommandHandler for KnowledgeBaseCommand {
    async fn execute(
        &self,
        session: &mut Session,
        args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        match args.first() {
            None => Ok(Some(match session.knowledge_base() {
                Some(file) => format!("Knowledge base: {}", file.name),
                None => format!("No knowledge base. Usage: /kb <path> ({})", KNOWLEDGE_BASE_ACCEPT),
            })),
            Some(path) => {
                let file = session.set_knowledge_base(&PathBuf::from(*path)).await?;
                Ok(Some(format!("Loaded: {} ({} bytes)", file.name, file.size())))
            }
        }
    }

    fn help(&self) -> &'static str {
        "/kb <path> - Load a knowledge base file (.txt, .pdf, .doc, .docx)"
    }
}

#[async_trait]
impl CommandHandler for TranscriptCommand {
    async fn execute(
        &self,
        session: &mut Session,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        display::display_transcript(session.turns());
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/transcript - Show the whole conversation"
    }
}

#[async_trait]
impl CommandHandler for SettingsCommand {
    async fn execute(
        &self,
        session: &mut Session,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let persona = session.persona();
        let lines = [
            style("Settings").bold().underlined().to_string(),
            format!(
                "API key:        {}",
                if session.has_api_key() { "set" } else { "not set" }
            ),
            format!("Model:          {}", session.model()),
            format!("Persona:        {} ({})", persona.display_name, persona.id),
            format!(
                "Knowledge base: {}",
                session
                    .knowledge_base()
                    .map(|f| f.name.as_str())
                    .unwrap_or("none")
            ),
            format!("Messages:       {}", session.turns().len()),
        ];
        Ok(Some(lines.join("\n")))
    }

    fn help(&self) -> &'static str {
        "/settings - Show the session settings"
    }
}
