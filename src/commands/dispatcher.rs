use super::{
    handler::{
        AttachCommand, KeyCommand, KnowledgeBaseCommand, PendingCommand, PersonaCommand,
        PersonasCommand, QuitCommand, SettingsCommand, TranscriptCommand,
    },
    registry::CommandRegistry,
};
use crate::attachment::AttachmentKind;
use crate::core::error::ChatError;
use crate::session::Session;
use console::style;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    /// Runs a `/command arg...` line. `help` is answered here since it needs
    /// the registry itself.
    pub async fn execute(
        &self,
        command: &str,
        args: &[&str],
        session: &mut Session,
    ) -> Result<Option<String>, ChatError> {
        if command == "help" {
            return Ok(Some(self.help_text()));
        }
        self.registry.execute(command, args, session).await
    }

    pub fn get_command_names(&self) -> Vec<String> {
        let mut names = self.registry.get_command_names();
        names.push("help".to_string());
        names.sort();
        names
    }

    fn help_text(&self) -> String {
        let mut lines = vec![style("Available Commands").bold().underlined().to_string()];
        lines.push("/help - Show available commands".to_string());
        lines.extend(self.registry.help_lines().into_iter().map(str::to_string));
        lines.push(
            style("Quote paths that contain spaces: /image \"my photo.png\"")
                .dim()
                .to_string(),
        );
        lines.push(
            style("Any other line is sent as a message with the pending attachments.")
                .dim()
                .to_string(),
        );
        lines.join("\n")
    }
}

/// Splits an input line into command name and arguments, if it is a command.
pub fn parse_command_line(line: &str) -> Option<(&str, Vec<String>)> {
    let rest = line.trim().strip_prefix('/')?;
    let (command, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    if command.is_empty() {
        return None;
    }
    Some((command, split_arguments(args)))
}

/// Whitespace separates arguments unless it sits inside single or double
/// quotes, so `/image "my photo.png"` is one path.
fn split_arguments(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_arg = true;
            }
            None if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(c);
                in_arg = true;
            }
        }
    }
    if in_arg {
        args.push(current);
    }
    args
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("quit", QuitCommand);
    registry.register("image", AttachCommand(AttachmentKind::Image));
    registry.register("document", AttachCommand(AttachmentKind::Document));
    registry.register("video", AttachCommand(AttachmentKind::Video));
    registry.register("pending", PendingCommand);
    registry.register("persona", PersonaCommand);
    registry.register("personas", PersonasCommand);
    registry.register("key", KeyCommand);
    registry.register("kb", KnowledgeBaseCommand);
    registry.register("transcript", TranscriptCommand);
    registry.register("settings", SettingsCommand);

    CommandDispatcher::new(Arc::new(registry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_lines() {
        let (command, args) = parse_command_line("/image a.png  b.png").unwrap();
        assert_eq!(command, "image");
        assert_eq!(args, ["a.png", "b.png"]);

        let (command, args) = parse_command_line("  /quit ").unwrap();
        assert_eq!(command, "quit");
        assert!(args.is_empty());

        assert!(parse_command_line("hello /image").is_none());
        assert!(parse_command_line("/").is_none());
    }

    #[test]
    fn quoted_paths_keep_their_spaces() {
        let (_, args) =
            parse_command_line(r#"/image "my photo.png" 'scan 2.jpg' plain.png"#).unwrap();
        assert_eq!(args, ["my photo.png", "scan 2.jpg", "plain.png"]);

        let (_, args) = parse_command_line(r#"/kb "" notes.txt"#).unwrap();
        assert_eq!(args, ["", "notes.txt"]);
    }

    #[test]
    fn lists_every_command_once() {
        let names = create_command_registry().get_command_names();
        for expected in ["help", "image", "document", "video", "persona", "key", "kb", "quit"] {
            assert_eq!(names.iter().filter(|n| *n == expected).count(), 1, "{expected}");
        }
    }
}
