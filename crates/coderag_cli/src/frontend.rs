//! Line-oriented terminal presentation of [`App`] state.
//!
//! Rendering is incremental: only screen changes, new history entries and
//! notices are written. The loading line is redrawn in place with `\r`.

use std::io::{self, Write};

use coderag::app::GREETING;
use coderag::{App, MessageId, NoticeLevel, Role, Screen};

/// Presentation surface driven by the runtime loop.
pub trait Frontend {
    fn render(&mut self, app: &mut App) -> io::Result<()>;
    fn alert(&mut self, message: &str) -> io::Result<()>;
    /// Shows a yes/no question; the answer arrives as the next input line.
    fn confirm_prompt(&mut self, prompt: &str) -> io::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScreenKey {
    name: &'static str,
    session_id: Option<String>,
}

impl ScreenKey {
    fn of(screen: &Screen) -> Self {
        Self {
            name: screen.name(),
            session_id: screen.session().map(|session| session.id().to_string()),
        }
    }
}

pub struct TerminalFrontend<W: Write> {
    out: W,
    shown_screen: Option<ScreenKey>,
    shown_messages: usize,
    first_shown_id: Option<MessageId>,
    loading_line: Option<String>,
    typing_shown: bool,
}

impl<W: Write> TerminalFrontend<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown_screen: None,
            shown_messages: 0,
            first_shown_id: None,
            loading_line: None,
            typing_shown: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Terminates an in-place loading line before regular output.
    fn break_loading_line(&mut self) -> io::Result<()> {
        if self.loading_line.take().is_some() {
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn write_screen_header(&mut self, screen: &Screen) -> io::Result<()> {
        match screen {
            Screen::Submission => {
                writeln!(self.out, "== CodeRAG ==")?;
                writeln!(
                    self.out,
                    "Paste a repository URL to index it, or /join <session-id>. /help lists commands."
                )?;
            }
            Screen::Loading { session: None, .. } => {
                writeln!(self.out, "Indexing repository...")?;
            }
            Screen::Loading {
                session: Some(session),
                ..
            } => {
                writeln!(self.out, "Session id: {}", session.id())?;
                writeln!(self.out, "Indexing finished. Type /start to begin chatting.")?;
            }
            Screen::Chat { session } => {
                writeln!(self.out, "== Chat {} ==", session.id())?;
                writeln!(self.out, "Bot: {GREETING}")?;
            }
        }
        Ok(())
    }

    fn write_history(&mut self, app: &App) -> io::Result<bool> {
        let messages = app.history().messages();
        let first_id = messages.first().map(|message| message.id);
        if messages.len() < self.shown_messages || first_id != self.first_shown_id {
            self.shown_messages = 0;
        }
        self.first_shown_id = first_id;

        let mut wrote = false;
        for message in &messages[self.shown_messages..] {
            if message.role == Role::Bot && self.typing_shown {
                self.typing_shown = false;
            }
            let label = match message.role {
                Role::User => "You",
                Role::Bot => "Bot",
            };
            writeln!(self.out, "{label}: {}", message.text)?;
            wrote = true;
        }
        self.shown_messages = messages.len();

        if app.is_query_in_flight() && !self.typing_shown {
            writeln!(self.out, "Bot is typing...")?;
            wrote = true;
        }
        self.typing_shown = app.is_query_in_flight();

        Ok(wrote)
    }

    fn draw_loading_line(&mut self, line: String) -> io::Result<()> {
        if self.loading_line.as_deref() == Some(line.as_str()) {
            return Ok(());
        }

        let previous = self.loading_line.as_deref().map_or(0, str::len);
        let padding = previous.saturating_sub(line.len());
        write!(self.out, "\r{line}{}", " ".repeat(padding))?;
        self.loading_line = Some(line);
        Ok(())
    }
}

impl<W: Write> Frontend for TerminalFrontend<W> {
    fn render(&mut self, app: &mut App) -> io::Result<()> {
        let mut wrote_lines = false;

        let key = ScreenKey::of(app.screen());
        if self.shown_screen.as_ref() != Some(&key) {
            self.break_loading_line()?;
            self.write_screen_header(app.screen())?;
            self.shown_screen = Some(key);
            self.shown_messages = 0;
            self.first_shown_id = None;
            self.typing_shown = false;
            wrote_lines = true;
        }

        let notices = app.take_notices();
        if !notices.is_empty() {
            self.break_loading_line()?;
            for notice in notices {
                let tag = match notice.level {
                    NoticeLevel::Info => "info",
                    NoticeLevel::Warning => "warn",
                };
                writeln!(self.out, "[{tag}] {}", notice.text)?;
            }
            wrote_lines = true;
        }

        match app.screen() {
            Screen::Chat { .. } => {
                if self.write_history(app)? {
                    wrote_lines = true;
                }
            }
            Screen::Loading { progress, .. } => {
                let line = format!("{} {}", progress.frame(), progress.status_text());
                self.draw_loading_line(line)?;
            }
            Screen::Submission => {}
        }

        if wrote_lines && self.loading_line.is_none() && !app.should_exit {
            write!(self.out, "> ")?;
        }
        self.out.flush()
    }

    fn alert(&mut self, message: &str) -> io::Result<()> {
        self.break_loading_line()?;
        writeln!(self.out, "! {message}")?;
        self.out.flush()
    }

    fn confirm_prompt(&mut self, prompt: &str) -> io::Result<()> {
        self.break_loading_line()?;
        write!(self.out, "? {prompt} [y/N] ")?;
        self.out.flush()
    }
}
