use crate::attachment::Attachment;
use crate::conversation::{Role, Turn};
use crate::persona::Persona;
use crate::utils::text::{display_width, wrap_text};
use console::style;
use termimad::MadSkin;

fn box_width(max: usize) -> usize {
    let term = console::Term::stdout();
    let terminal_width = term.size().1 as usize;
    std::cmp::min(terminal_width.saturating_sub(4), max).max(40)
}

/// Title bar naming the selected persona
pub fn display_header(persona: &Persona, model: &str) {
    let width = box_width(100);
    let title = format!(" {} ", persona.display_name);
    let fill = width.saturating_sub(display_width(&title) + 2);
    println!(
        "{}{}{}",
        style("━━").bold().blue(),
        style(&title).bold().white().on_blue(),
        style("━".repeat(fill)).bold().blue()
    );
    println!("{}", style(format!("model: {}", model)).dim());
}

/// Attachment names as inline chips, e.g. `[cat.png] [report.pdf]`.
pub fn format_attachment_chips(attachments: &[Attachment]) -> String {
    attachments
        .iter()
        .map(|a| format!("[{}]", a.display_name))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rough check for replies worth rendering as markdown
pub fn looks_like_markdown(text: &str) -> bool {
    text.contains("```")
        || text.contains('*')
        || text.contains('`')
        || text.lines().any(|l| {
            let l = l.trim_start();
            l.starts_with('#') || l.starts_with("- ") || l.starts_with("1. ")
        })
}

fn role_label(role: Role) -> console::StyledObject<&'static str> {
    match role {
        Role::User => style("You").bold().cyan(),
        Role::Model => style("AI").bold().blue(),
        Role::System => style("System").bold().yellow(),
    }
}

/// Render one turn of the transcript
pub fn display_turn(turn: &Turn) {
    println!(
        "\n{} {}",
        role_label(turn.role),
        style(turn.created_at.format("%H:%M")).dim()
    );

    if !turn.attachments.is_empty() {
        println!("{}", style(format_attachment_chips(&turn.attachments)).dim().magenta());
    }

    if turn.text.is_empty() {
        return;
    }

    match turn.role {
        Role::Model if looks_like_markdown(&turn.text) => display_markdown(&turn.text),
        Role::Model => display_response(&turn.text),
        _ => println!("{}", turn.text),
    }
}

pub fn display_transcript(turns: &[Turn]) {
    if turns.is_empty() {
        println!("{}", style("No messages yet.").dim());
        return;
    }
    for turn in turns {
        display_turn(turn);
    }
}

/// Display a model reply in a formatted box
pub fn display_response(response: &str) {
    let max_width = box_width(120);

    let mut wrapped_lines = Vec::new();
    for line in response.lines() {
        if line.is_empty() {
            wrapped_lines.push(String::new());
        } else {
            wrapped_lines.extend(wrap_text(line, max_width.saturating_sub(4)));
        }
    }

    let content_max_len = wrapped_lines
        .iter()
        .map(|line| display_width(line))
        .max()
        .unwrap_or(0);
    let width = std::cmp::min(max_width, content_max_len + 4);

    let top_border = "┌".to_string() + &"─".repeat(width - 2) + "┐";
    let bottom_border = "└".to_string() + &"─".repeat(width - 2) + "┘";

    println!("{}", style(&top_border).dim().blue());
    for line in wrapped_lines {
        let padding = width.saturating_sub(display_width(&line) + 3);
        println!("│ {}{}│", style(&line).white(), " ".repeat(padding));
    }
    println!("{}", style(&bottom_border).dim().blue());
}

pub fn display_markdown(text: &str) {
    let skin = MadSkin::default();
    skin.print_text(text);
}

/// Attachments waiting for the next message
pub fn display_pending(attachments: &[Attachment]) {
    if attachments.is_empty() {
        println!("{}", style("No pending attachments.").dim());
    } else {
        println!(
            "{} {}",
            style("📎 Pending:").bold().magenta(),
            format_attachment_chips(attachments)
        );
    }
}

pub fn display_thinking() {
    println!("{}", style("… waiting for reply").dim().italic());
}

/// Visible error line; the session keeps running
pub fn display_error(err: &dyn std::fmt::Display) {
    eprintln!("{} {}", style("✖").bold().red(), style(err).red());
}

pub fn display_info(message: &str) {
    println!("{} {}", style("ℹ").bold().cyan(), message);
}
