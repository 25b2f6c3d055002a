//! Console and browser capabilities used by the Explorer.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

/// Line-oriented console interaction
pub trait Prompter {
    /// Display a block of text
    fn show(&mut self, text: &str);

    /// Ask for one line of input; the trailing newline is removed.
    ///
    /// End of input is an [`io::ErrorKind::UnexpectedEof`] error.
    fn ask(&mut self, prompt: &str) -> io::Result<String>;

    /// Clear the screen before a new item
    fn clear(&mut self) {}
}

/// Opens a URL outside the program
pub trait UrlOpener {
    fn open(&mut self, url: &str) -> io::Result<()>;
}

/// [`Prompter`] on stdin/stdout
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn show(&mut self, text: &str) {
        println!("{}", text);
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "> {}: ", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn clear(&mut self) {
        if crate::ui::is_terminal() {
            print!("\x1B[2J\x1B[1;1H");
        }
    }
}

/// [`Prompter`] replaying a fixed list of responses.
///
/// Everything shown and every prompt asked is recorded.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    responses: VecDeque<String>,
    /// Text passed to [`Prompter::show`]
    pub shown: Vec<String>,
    /// Prompts passed to [`Prompter::ask`]
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            shown: Vec::new(),
            asked: Vec::new(),
        }
    }

    /// Responses not consumed yet
    pub fn remaining(&self) -> usize {
        self.responses.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn show(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.asked.push(prompt.to_string());
        self.responses
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

/// [`UrlOpener`] using the platform's default handler
#[derive(Debug, Default)]
pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open(&mut self, url: &str) -> io::Result<()> {
        let program = opener_program().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::Unsupported,
                "opening URLs is not supported on this platform",
            )
        })?;

        let mut command = Command::new(program);
        command.arg(url).stdin(Stdio::null());
        spawn_reaped(command)?;
        Ok(())
    }
}

fn opener_program() -> Option<&'static str> {
    if cfg!(target_os = "windows") {
        Some("explorer")
    } else if cfg!(target_os = "macos") {
        Some("open")
    } else if cfg!(target_os = "linux") {
        Some("xdg-open")
    } else {
        None
    }
}

/// Spawn `command` and wait for it on a background thread, so the child is
/// reaped without blocking the session.
fn spawn_reaped(mut command: Command) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child = command.spawn()?;
    Ok(thread::spawn(move || child.wait()))
}

/// [`UrlOpener`] that only records what it was asked to open
#[derive(Debug, Default)]
pub struct RecordingOpener {
    pub opened: Vec<String>,
}

impl UrlOpener for RecordingOpener {
    fn open(&mut self, url: &str) -> io::Result<()> {
        self.opened.push(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_prompter_replays_in_order() {
        let mut prompter = ScriptedPrompter::new(["first", "second"]);

        assert_eq!(prompter.ask("one").unwrap(), "first");
        assert_eq!(prompter.ask("two").unwrap(), "second");
        assert_eq!(prompter.asked, vec!["one", "two"]);
        assert_eq!(prompter.remaining(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_spawned_opener_is_waited_on() {
        let handle = spawn_reaped(Command::new("true")).unwrap();
        let status = handle.join().unwrap().unwrap();

        assert!(status.success());
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let err = spawn_reaped(Command::new("cvpr-explorer-no-such-opener")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_scripted_prompter_eof() {
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let err = prompter.ask("anything").unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
