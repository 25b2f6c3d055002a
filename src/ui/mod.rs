//! CLI UI utilities for terminal output.
//!
//! This module provides colored status lines, progress bars and the styled
//! blocks shown during an Explorer session. Functions that build text return
//! `String`s so they can be routed through a [`Prompter`](crate::explorer::Prompter).

use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::models::Publication;

/// Get the current terminal width.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(100)
}

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Download,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Download => "↓",
    }
}

/// A single styled status line.
pub fn status_line(status: Status, msg: &str) -> String {
    let icon = status_icon(status);
    match status {
        Status::Success => format!("{} {}", icon.green().bold(), msg.green()),
        Status::Error => format!("{} {}", icon.red().bold(), msg.red().bold()),
        Status::Warning => format!("{} {}", icon.yellow().bold(), msg),
        Status::Info => format!("{} {}", icon.cyan().bold(), msg),
        Status::Download => format!("{} {}", icon.magenta(), msg),
    }
}

/// Print a styled status message.
#[macro_export]
macro_rules! print_status {
    ($status:expr, $($arg:tt)*) => {
        println!("{}", $crate::ui::status_line($status, &format!($($arg)*)))
    };
}

/// Print a styled status message to stderr.
#[macro_export]
macro_rules! eprint_status {
    ($status:expr, $($arg:tt)*) => {
        eprintln!("{}", $crate::ui::status_line($status, &format!($($arg)*)))
    };
}

/// Instructions shown before a prompt.
pub fn notice(text: &str) -> String {
    format!("\n{}", text.yellow())
}

/// Numbered listing of library file names.
pub fn library_listing(names: &[String]) -> String {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("[{}] {}", i, name).blue().bold().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The block shown for one publication during manual review.
pub fn review_card(position: usize, total: usize, publication: &Publication) -> String {
    let width = terminal_width().min(100);
    let mut card = String::new();

    card.push_str(&format!(
        "{}\n",
        publication.paper_title.bright_blue().bold().underline()
    ));
    card.push_str(&format!(
        "{} {} {}\n",
        format!("[{}/{}]", position, total).cyan().underline(),
        "Info:".cyan(),
        publication.paper_info_link
    ));
    card.push_str(&format!("{} {}\n", "PDF: ".cyan(), publication.paper_link));
    card.push_str(&format!("{}\n", "─".repeat(width).dimmed()));

    card.push_str(&format!("{}\n", "Abstract".cyan().bold().underline()));
    card.push_str(publication.paper_abstract.trim());
    card.push_str("\n\n");

    card.push_str(&format!(
        "{}\n{}",
        "Would you like to select this publication?".yellow(),
        "(y/n) to accept/reject, (p) to view the PDF, (i) for more info, (e) to finish early."
            .yellow()
    ));
    card
}

/// Truncate text to fit within the specified width using unicode-aware truncation.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width <= 3 {
        return "...".to_string();
    }

    let char_widths: Vec<(char, usize)> = text
        .chars()
        .map(|c| (c, unicode_width::UnicodeWidthChar::width(c).unwrap_or(1)))
        .collect();

    let total_width: usize = char_widths.iter().map(|(_, w)| *w).sum();

    if total_width <= max_width {
        return text.to_string();
    }

    // Find the longest prefix that fits
    let mut current_width = 0;
    let mut end_idx = 0;

    for (i, (_, w)) in char_widths.iter().enumerate() {
        if current_width + w > max_width.saturating_sub(3) {
            break;
        }
        current_width += w;
        end_idx = i + 1;
    }

    if end_idx == 0 {
        return "...".to_string();
    }

    let truncated: String = char_widths[..end_idx].iter().map(|(c, _)| *c).collect();
    format!("{}...", truncated)
}

/// Get a human-readable file size.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Create a progress bar for batch work.
pub fn progress_bar(len: u64, msg: &str) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new(len);
    let style = indicatif::ProgressStyle::with_template(
        "{msg}: {bar:40.cyan/blue} {pos}/{len} ({percent}%) [{elapsed_precise}<{eta_precise}]",
    )
    .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
    .progress_chars("█▓▒░ ");
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb
}
