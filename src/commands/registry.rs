use crate::commands::handler::CommandHandler;
use crate::core::error::ChatError;
use crate::session::Session;
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct CommandRegistry {
    handlers: BTreeMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    pub fn register<C: CommandHandler + 'static>(&mut self, name: &str, command: C) {
        self.handlers.insert(name.to_string(), Arc::new(command));
    }

    pub async fn execute(
        &self,
        name: &str,
        args: &[&str],
        session: &mut Session,
    ) -> Result<Option<String>, ChatError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| ChatError::Input(format!("Unknown command: /{}, try /help", name)))?;
        handler.execute(session, args).await
    }

    /// Command names in alphabetical order
    pub fn get_command_names(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    pub fn help_lines(&self) -> Vec<&'static str> {
        self.handlers.values().map(|h| h.help()).collect()
    }
}
