use crate::attachment::AttachmentKind;
use crate::cli::Args;
use crate::commands::{CommandDispatcher, parse_command_line};
use crate::core::error::ChatError;
use crate::display;
use crate::input;
use crate::session::Session;
use is_terminal::IsTerminal;
use std::io::{self, Read};
use tracing::{error, warn};

pub struct Application {
    pub args: Args,
    pub session: Session,
    pub command_dispatcher: CommandDispatcher,
}

impl Application {
    pub fn new(args: Args, session: Session, command_dispatcher: CommandDispatcher) -> Self {
        Self {
            args,
            session,
            command_dispatcher,
        }
    }

    pub async fn run(&mut self) -> Result<(), ChatError> {
        let context = if !io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| ChatError::Input(format!("Failed to read from stdin: {}", e)))?;
            Some(buffer)
        } else {
            None
        };

        let wants_chat = self.args.chat || (self.args.query.is_none() && context.is_none());
        if wants_chat && context.is_none() {
            self.handle_chat_session().await
        } else {
            if wants_chat {
                warn!("stdin is not a terminal, answering once instead of starting a session");
            }
            self.handle_single_message(context).await
        }
    }

    /// Shows a failure and keeps going unless it is fatal.
    fn report(&self, err: ChatError) -> Result<(), ChatError> {
        if err.is_recoverable() {
            warn!(error = %err, "action failed");
            display::display_error(&err);
            Ok(())
        } else {
            error!(error = %err, "fatal error");
            Err(err)
        }
    }

    async fn handle_single_message(&mut self, context: Option<String>) -> Result<(), ChatError> {
        let text = compose_query(self.args.query.as_deref(), context.as_deref());

        for path in self.args.attachments.clone() {
            let kind = AttachmentKind::for_path(&path);
            self.session.attach(kind, &path).await?;
        }

        let reply = self.session.send(&text).await?;
        display::display_turn(&reply);
        Ok(())
    }

    /// A query given together with `--chat` is the session's first message.
    async fn send_opening_query(&mut self) -> Result<(), ChatError> {
        let Some(query) = self.args.query.clone() else {
            return Ok(());
        };
        display::display_thinking();
        match self.session.send(&query).await {
            Ok(reply) => display::display_turn(&reply),
            Err(err) => self.report(err)?,
        }
        Ok(())
    }

    async fn handle_chat_session(&mut self) -> Result<(), ChatError> {
        display::display_header(self.session.persona(), self.session.model());
        if !self.session.has_api_key() {
            display::display_info("No API key set. Use /key to enter one.");
        }
        println!(
            "Type '/help' for available commands. Press Ctrl+D or type /quit to exit."
        );

        for path in self.args.attachments.clone() {
            let kind = AttachmentKind::for_path(&path);
            if let Err(err) = self.session.attach(kind, &path).await {
                self.report(err)?;
            }
        }
        if !self.session.pending().is_empty() {
            display::display_pending(self.session.pending());
        }
        self.send_opening_query().await?;

        let mut editor = input::create_editor(self.command_dispatcher.clone())?;

        while self.session.should_continue {
            let line = match input::read_input(&mut editor, self.session.is_busy())? {
                Some(line) => line,
                None => break,
            };

            if let Some((command, args)) = parse_command_line(&line) {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                match self
                    .command_dispatcher
                    .execute(command, &args, &mut self.session)
                    .await
                {
                    Ok(Some(output)) => println!("{}", output),
                    Ok(None) => {}
                    Err(err) => self.report(err)?,
                }
                continue;
            }

            if line.trim().is_empty() && self.session.pending().is_empty() {
                continue;
            }

            display::display_thinking();
            match self.session.send(&line).await {
                Ok(reply) => display::display_turn(&reply),
                Err(err) => self.report(err)?,
            }
        }

        Ok(())
    }
}

/// Piped stdin comes first, wrapped so the model can tell it from the question.
pub fn compose_query(query: Option<&str>, context: Option<&str>) -> String {
    match (query, context) {
        (Some(q), Some(ctx)) => format!("<pipe>{}</pipe>\n\n{}", ctx, q),
        (None, Some(ctx)) => format!("<pipe>{}</pipe>", ctx),
        (Some(q), None) => q.to_string(),
        (None, None) => String::new(),
    }
}
