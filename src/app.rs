use std::time::Duration;

use rag_backend::{BackendError, BackendEvent, IngestReceipt, RetrieveAnswer};
use tracing::{debug, info, warn};

use crate::commands::{parse_slash_command, SlashCommand};
use crate::error::{ClientError, ValidationError};
use crate::history::History;
use crate::progress::{ProgressState, ProgressTiming, TimerKind};
use crate::screen::{Route, Screen};
use crate::session::{is_valid_session_id, Session, SessionId};

pub use rag_backend::RequestId;

/// Capabilities the event loop lends to [`App`] for the duration of one call.
pub trait HostOps {
    fn start_ingest(&mut self, repo_url: String) -> Result<RequestId, String>;
    fn start_query(&mut self, session_id: SessionId, query: String) -> Result<RequestId, String>;
    fn start_timer(&mut self, kind: TimerKind, interval: Duration);
    fn cancel_timer(&mut self, kind: TimerKind);
    /// Blocks until the user answers. Other events are held back meanwhile.
    fn confirm(&mut self, prompt: &str) -> bool;
    fn alert(&mut self, message: &str);
    fn request_render(&mut self);
    fn request_stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Transient line shown once by the frontend, never part of [`History`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingIngest {
    request_id: RequestId,
    repo_url: String,
}

pub const GREETING: &str = "Hi! I'm your CodeRAG AI assistant. I've analyzed your repository and I'm ready to help you understand your codebase. What would you like to know?";
pub const CLEAR_NOTICE: &str = "Chat cleared! I'm still here to help you understand your codebase. What would you like to explore?";
pub const RELOAD_PROMPT: &str = "Do you want to refresh the page? Unsaved changes may be lost.";
pub const LEAVE_PROMPT: &str = "Refresh or leaving page cause deletion of files";
pub const NOT_AVAILABLE: &str = "Not available on this screen";
const HELP_TEXT: &str =
    "Commands: /help, /join <session-id>, /start, /session, /clear, /reload, /quit";
const QUERY_IN_FLIGHT: &str = "Waiting for the current answer...";
const INGEST_IN_FLIGHT: &str = "Repository is still being indexed, please wait.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    screen: Screen,
    pub input: String,
    history: History,
    pending_ingest: Option<PendingIngest>,
    query_in_flight: Option<RequestId>,
    notices: Vec<Notice>,
    timing: ProgressTiming,
    pub should_exit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self::with_timing(ProgressTiming::default())
    }

    pub fn with_timing(timing: ProgressTiming) -> Self {
        Self {
            screen: Screen::Submission,
            input: String::new(),
            history: History::new(),
            pending_ingest: None,
            query_in_flight: None,
            notices: Vec::new(),
            timing,
            should_exit: false,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn route(&self) -> Route {
        self.screen.route()
    }

    pub fn session(&self) -> Option<&Session> {
        self.screen.session()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn timing(&self) -> ProgressTiming {
        self.timing
    }

    /// True while an ingestion request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.pending_ingest.is_some()
    }

    /// True once a session is held: ingestion finished or an existing id
    /// was asserted.
    pub fn is_ingestion_complete(&self) -> bool {
        self.session().is_some()
    }

    pub fn is_query_in_flight(&self) -> bool {
        self.query_in_flight.is_some()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn on_input_replace(&mut self, text: String) {
        self.input = text;
    }

    /// Handles one submitted input line according to the active screen.
    pub fn on_submit(&mut self, host: &mut dyn HostOps) {
        let submitted = std::mem::take(&mut self.input);
        let trimmed = submitted.trim();

        if trimmed.is_empty() {
            host.request_render();
            return;
        }

        match parse_slash_command(trimmed) {
            // Chat questions may start with a path such as `/src/main.rs`.
            Some(SlashCommand::Unknown(_)) if matches!(self.screen, Screen::Chat { .. }) => {}
            Some(command) => {
                self.on_command(command, host);
                return;
            }
            None => {}
        }

        if matches!(self.screen, Screen::Submission) {
            let repo_url = trimmed.to_string();
            self.submit_repository(&repo_url, host);
            return;
        }

        if let Some(captured) = self.loading_session_captured() {
            if captured {
                self.push_info("Indexing finished. Type /start to begin chatting.");
            } else {
                self.push_info(INGEST_IN_FLIGHT);
            }
            host.request_render();
            return;
        }

        if self.is_query_in_flight() {
            self.input = submitted;
            self.push_info(QUERY_IN_FLIGHT);
            host.request_render();
            return;
        }
        self.ask(&submitted, host);
    }

    /// Starts ingestion of `repo_url` and shows the loading screen.
    pub fn submit_repository(&mut self, repo_url: &str, host: &mut dyn HostOps) {
        let repo_url = repo_url.trim();
        if repo_url.is_empty() {
            host.request_render();
            return;
        }

        if self.is_busy() {
            self.push_info(INGEST_IN_FLIGHT);
            host.request_render();
            return;
        }

        if !matches!(self.screen, Screen::Submission) {
            self.push_warning(NOT_AVAILABLE);
            host.request_render();
            return;
        }

        self.enter_loading(host);
        match host.start_ingest(repo_url.to_string()) {
            Ok(request_id) => {
                info!(request_id, repo_url, "ingestion started");
                self.pending_ingest = Some(PendingIngest {
                    request_id,
                    repo_url: repo_url.to_string(),
                });
            }
            Err(message) => {
                warn!(%message, "failed to start ingestion");
                self.leave_loading(host);
                self.screen = Screen::Submission;
                host.alert(
                    &ClientError::Transport {
                        message,
                        detail: None,
                    }
                    .alert_text(),
                );
            }
        }

        host.request_render();
    }

    pub fn on_backend_event(&mut self, event: BackendEvent, host: &mut dyn HostOps) {
        match event {
            BackendEvent::Ingested {
                request_id,
                outcome,
            } => self.on_ingest_finished(request_id, outcome, host),
            BackendEvent::Answered {
                request_id,
                outcome,
            } => self.on_answer_finished(request_id, outcome, host),
        }
    }

    pub fn on_ingest_finished(
        &mut self,
        request_id: RequestId,
        outcome: Result<IngestReceipt, BackendError>,
        host: &mut dyn HostOps,
    ) {
        let pending = match self.pending_ingest.take() {
            Some(pending) if pending.request_id == request_id => pending,
            other => {
                debug!(request_id, "ignoring stale ingest completion");
                self.pending_ingest = other;
                return;
            }
        };

        let session = outcome.map_err(ClientError::from).and_then(|receipt| {
            Session::from_ingestion(&receipt.session_id, pending.repo_url).map_err(|_| {
                ClientError::Application {
                    detail: "response is missing 'session_id'".to_string(),
                }
            })
        });

        match session {
            Ok(session) => {
                info!(request_id, session_id = %session.id(), "ingestion succeeded");
                if let Screen::Loading { session: slot, .. } = &mut self.screen {
                    *slot = Some(session);
                }
            }
            Err(error) => {
                warn!(request_id, %error, "ingestion failed");
                self.leave_loading(host);
                self.screen = Screen::Submission;
                host.alert(&error.alert_text());
            }
        }

        host.request_render();
    }

    /// Sends `query` for the current chat session.
    pub fn ask(&mut self, query: &str, host: &mut dyn HostOps) {
        if query.trim().is_empty() {
            host.request_render();
            return;
        }

        if self.is_query_in_flight() {
            self.push_info(QUERY_IN_FLIGHT);
            host.request_render();
            return;
        }

        let Some(session_id) = self.chat_session_id() else {
            self.push_warning(NOT_AVAILABLE);
            host.request_render();
            return;
        };

        self.history.push_user(query);
        self.input.clear();

        match host.start_query(session_id, query.to_string()) {
            Ok(request_id) => {
                debug!(request_id, "query started");
                self.query_in_flight = Some(request_id);
            }
            Err(message) => {
                warn!(%message, "failed to start query");
                self.query_in_flight = None;
                host.alert(
                    &ClientError::Transport {
                        message,
                        detail: None,
                    }
                    .alert_text(),
                );
            }
        }

        host.request_render();
    }

    pub fn on_answer_finished(
        &mut self,
        request_id: RequestId,
        outcome: Result<RetrieveAnswer, BackendError>,
        host: &mut dyn HostOps,
    ) {
        if self.query_in_flight != Some(request_id) {
            debug!(request_id, "ignoring stale answer");
            return;
        }
        self.query_in_flight = None;

        match outcome {
            Ok(answer) => {
                debug!(request_id, bytes = answer.text.len(), "answer received");
                self.history.push_bot(answer.text);
            }
            Err(error) => {
                let error = ClientError::from(error);
                warn!(request_id, %error, "query failed");
                host.alert(&error.alert_text());
            }
        }

        host.request_render();
    }

    pub fn on_timer_tick(&mut self, kind: TimerKind, host: &mut dyn HostOps) {
        let Screen::Loading { progress, .. } = &mut self.screen else {
            return;
        };

        match kind {
            TimerKind::ProgressStatus => {
                if progress.on_status_tick() {
                    host.cancel_timer(TimerKind::ProgressStatus);
                }
            }
            TimerKind::AssetRotation => progress.on_asset_tick(),
        }

        host.request_render();
    }

    /// Route-driven transition. Chat routes validate their identifier first.
    pub fn navigate(&mut self, route: Route, host: &mut dyn HostOps) {
        match route {
            Route::Root => {
                self.reset(host);
            }
            Route::Chat(candidate) => match Session::from_user_input(&candidate) {
                Ok(session) => self.enter_chat(session, host),
                Err(error) => self.refuse_chat_entry(&candidate, error, host),
            },
        }

        host.request_render();
    }

    /// Joins a pre-existing session from the submission screen.
    pub fn join_session(&mut self, candidate: &str, host: &mut dyn HostOps) {
        if !matches!(self.screen, Screen::Submission) {
            self.push_warning(NOT_AVAILABLE);
            host.request_render();
            return;
        }

        match Session::from_user_input(candidate) {
            Ok(session) => self.enter_chat(session, host),
            Err(ValidationError::EmptyInput) => {}
            Err(error) => self.push_warning(error.to_string()),
        }

        host.request_render();
    }

    /// Confirms the captured session and opens the chat. The server id gets
    /// the same entry check as a `/chat/<id>` route.
    pub fn start_chat(&mut self, host: &mut dyn HostOps) {
        match self.loading_session_captured() {
            Some(true) => {
                if let Some(session) = self.session().cloned() {
                    if is_valid_session_id(session.id().as_str()) {
                        self.enter_chat(session, host);
                    } else {
                        self.refuse_chat_entry(
                            session.id().as_str(),
                            ValidationError::MalformedSessionId,
                            host,
                        );
                    }
                }
            }
            Some(false) => self.push_info(INGEST_IN_FLIGHT),
            None => self.push_warning(NOT_AVAILABLE),
        }

        host.request_render();
    }

    pub fn clear_chat(&mut self, host: &mut dyn HostOps) {
        if !matches!(self.screen, Screen::Chat { .. }) {
            self.push_warning(NOT_AVAILABLE);
        } else if self.is_query_in_flight() {
            self.push_info(QUERY_IN_FLIGHT);
        } else {
            self.history = History::new();
            self.push_info(CLEAR_NOTICE);
        }

        host.request_render();
    }

    pub fn on_reload(&mut self, host: &mut dyn HostOps) {
        if matches!(self.screen, Screen::Submission) {
            self.push_warning(NOT_AVAILABLE);
            host.request_render();
            return;
        }

        if host.confirm(RELOAD_PROMPT) {
            info!(from = self.screen.name(), "reloading");
            self.reset(host);
        }

        host.request_render();
    }

    pub fn on_quit(&mut self, host: &mut dyn HostOps) {
        if self.has_session_state() && !host.confirm(LEAVE_PROMPT) {
            host.request_render();
            return;
        }

        self.exit(host);
    }

    /// Input stream ended; nobody is left to answer a prompt.
    pub fn on_input_closed(&mut self, host: &mut dyn HostOps) {
        self.exit(host);
    }

    fn on_command(&mut self, command: SlashCommand, host: &mut dyn HostOps) {
        match command {
            SlashCommand::Help => {
                self.push_info(HELP_TEXT);
                host.request_render();
            }
            SlashCommand::Join(candidate) => {
                let candidate = candidate.unwrap_or_default();
                self.join_session(&candidate, host);
            }
            SlashCommand::Start => self.start_chat(host),
            SlashCommand::Session => {
                match self.session() {
                    Some(session) => self.push_info(format!("Session id: {}", session.id())),
                    None => self.push_info("No active session"),
                }
                host.request_render();
            }
            SlashCommand::Clear => self.clear_chat(host),
            SlashCommand::Reload => self.on_reload(host),
            SlashCommand::Quit => self.on_quit(host),
            SlashCommand::Unknown(command) => {
                self.push_warning(format!("Unknown command: {command}"));
                host.request_render();
            }
        }
    }

    /// `Some(captured)` while on the loading screen, `None` elsewhere.
    fn loading_session_captured(&self) -> Option<bool> {
        match &self.screen {
            Screen::Loading { session, .. } => Some(session.is_some()),
            _ => None,
        }
    }

    fn chat_session_id(&self) -> Option<SessionId> {
        match &self.screen {
            Screen::Chat { session } => Some(session.id().clone()),
            _ => None,
        }
    }

    fn refuse_chat_entry(&mut self, candidate: &str, error: ValidationError, host: &mut dyn HostOps) {
        warn!(%candidate, "rejected chat entry");
        self.reset(host);
        if error == ValidationError::MalformedSessionId {
            host.alert(&error.to_string());
        }
    }

    fn has_session_state(&self) -> bool {
        self.is_busy() || self.session().is_some()
    }

    fn enter_loading(&mut self, host: &mut dyn HostOps) {
        self.screen = Screen::Loading {
            session: None,
            progress: ProgressState::started(),
        };
        host.start_timer(TimerKind::ProgressStatus, self.timing.status_interval);
        host.start_timer(TimerKind::AssetRotation, self.timing.asset_interval);
    }

    /// Stops whichever loading timers are still running.
    fn leave_loading(&mut self, host: &mut dyn HostOps) {
        if let Screen::Loading { progress, .. } = &mut self.screen {
            for kind in progress.stop() {
                host.cancel_timer(kind);
            }
        }
    }

    fn enter_chat(&mut self, session: Session, host: &mut dyn HostOps) {
        self.leave_loading(host);
        info!(session_id = %session.id(), "entering chat");
        self.pending_ingest = None;
        self.query_in_flight = None;
        self.history = History::new();
        self.screen = Screen::Chat { session };
    }

    fn reset(&mut self, host: &mut dyn HostOps) {
        self.leave_loading(host);
        self.pending_ingest = None;
        self.query_in_flight = None;
        self.history = History::new();
        self.input.clear();
        self.screen = Screen::Submission;
    }

    fn exit(&mut self, host: &mut dyn HostOps) {
        self.leave_loading(host);
        self.should_exit = true;
        host.request_stop();
        host.request_render();
    }

    fn push_info(&mut self, text: impl Into<String>) {
        self.notices.push(Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        });
    }

    fn push_warning(&mut self, text: impl Into<String>) {
        self.notices.push(Notice {
            level: NoticeLevel::Warning,
            text: text.into(),
        });
    }
}
