//! Terminal styling utilities for consistent CLI output

use colored::Colorize;
use std::io::{self, IsTerminal, Write};

/// Print an error message to stderr
pub fn error(msg: &str) {
    eprintln!("{} {}", "error:".red().bold(), msg);
}

/// Print a warning message to stderr
pub fn warning(msg: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), msg);
}

/// Print a success message to stdout
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print a hint message to stderr (dimmed)
pub fn hint(msg: &str) {
    eprintln!("{} {}", "hint:".dimmed(), msg.dimmed());
}

/// Print a status/info header
pub fn header(msg: &str) {
    println!("{}", msg.cyan().bold());
}

/// Format a path for display (bright white)
pub fn path(p: &std::path::Path) -> String {
    p.display().to_string().bright_white().to_string()
}

/// Format a package cycle, e.g. `a → b → a`, with dimmed arrows
pub fn cycle(packages: &[String]) -> String {
    let arrow = format!(" {} ", "→".dimmed());
    packages
        .iter()
        .map(|p| p.yellow().to_string())
        .collect::<Vec<_>>()
        .join(arrow.as_str())
}

/// Render markdown to the terminal with colors and formatting.
/// If not a TTY, writes plain markdown.
pub fn render_markdown(markdown: &str, output: &mut dyn Write) -> io::Result<()> {
    if io::stdout().is_terminal() {
        let skin = create_skin();
        let rendered = skin.term_text(markdown);
        write!(output, "{}", rendered)
    } else {
        write!(output, "{}", markdown)
    }
}

fn create_skin() -> termimad::MadSkin {
    use crossterm::style::Color;
    use termimad::{MadSkin, StyledChar};

    let mut skin = MadSkin::default();

    skin.set_headers_fg(Color::Cyan);
    skin.bold.set_fg(Color::White);
    skin.bullet = StyledChar::from_fg_char(Color::Blue, '•');
    skin.inline_code.set_fg(Color::Yellow);
    skin.horizontal_rule = StyledChar::from_fg_char(Color::DarkGrey, '─');

    skin
}
