use crate::commands::CommandDispatcher;
use crate::core::error::ChatError;

use console::style;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter, MatchingBracketHighlighter};
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, EditMode, Editor, Helper};
use std::borrow::Cow;

/// Completes command names after `/`, file paths everywhere else
pub struct ChatCompleter {
    filename_completer: FilenameCompleter,
    commands: CommandDispatcher,
}

impl ChatCompleter {
    pub fn new(commands: CommandDispatcher) -> Self {
        Self {
            filename_completer: FilenameCompleter::new(),
            commands,
        }
    }

    fn complete_command(&self, prefix: &str) -> Vec<Pair> {
        self.commands
            .get_command_names()
            .into_iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd,
            })
            .collect()
    }
}

impl Completer for ChatCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Still typing the command name itself
        if let Some(typed) = line[..pos].strip_prefix('/') {
            if !typed.contains(char::is_whitespace) {
                let matches = self.complete_command(typed);
                if !matches.is_empty() {
                    return Ok((1, matches)); // 1 is the position after '/'
                }
            }
        }

        self.filename_completer.complete(line, pos, ctx)
    }
}

/// Helper struct that combines the rustyline components
pub struct ChatHelper {
    completer: ChatCompleter,
    highlighter: MatchingBracketHighlighter,
    hinter: HistoryHinter,
}

impl ChatHelper {
    pub fn new(commands: CommandDispatcher) -> Self {
        Self {
            completer: ChatCompleter::new(commands),
            highlighter: MatchingBracketHighlighter::new(),
            hinter: HistoryHinter {},
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(style(hint).dim().to_string())
    }

    fn highlight_char(&self, line: &str, pos: usize, kind: CmdKind) -> bool {
        self.highlighter.highlight_char(line, pos, kind)
    }
}

impl Validator for ChatHelper {}

pub type ChatEditor = Editor<ChatHelper, DefaultHistory>;

/// Creates a configured rustyline editor. History stays in memory.
pub fn create_editor(commands: CommandDispatcher) -> Result<ChatEditor, ChatError> {
    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(false)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| ChatError::Input(format!("Failed to create line editor: {}", e)))?;
    editor.set_helper(Some(ChatHelper::new(commands)));

    Ok(editor)
}

/// Prompt showing whether the next send is allowed.
pub fn prompt(busy: bool) -> String {
    if cfg!(windows) && std::env::var("PSModulePath").is_ok() {
        return "> ".to_string();
    }
    if busy {
        style("… ").dim().to_string()
    } else {
        style("> ").bold().cyan().to_string()
    }
}

/// Reads a line of input; `None` on Ctrl-C or Ctrl-D.
pub fn read_input(editor: &mut ChatEditor, busy: bool) -> Result<Option<String>, ChatError> {
    match editor.readline(&prompt(busy)) {
        Ok(line) => {
            if !line.trim().is_empty() {
                editor.add_history_entry(line.as_str())?;
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            println!("Exiting...");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create_command_registry;

    #[test]
    fn completes_command_names_after_slash() {
        let completer = ChatCompleter::new(create_command_registry());
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);

        let (start, pairs) = completer.complete("/per", 4, &ctx).unwrap();
        assert_eq!(start, 1);
        let names: Vec<&str> = pairs.iter().map(|p| p.replacement.as_str()).collect();
        assert_eq!(names, ["persona", "personas"]);
    }
}
