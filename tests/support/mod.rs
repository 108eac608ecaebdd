#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use coderag::{HostOps, RequestId, SessionId, TimerKind};

/// Records every capability call `App` makes and answers prompts from a script.
#[derive(Default)]
pub struct HostSpy {
    pub next_request_id: RequestId,
    pub refuse_requests: Option<String>,
    pub ingests: Vec<(RequestId, String)>,
    pub queries: Vec<(RequestId, String, String)>,
    pub started_timers: Vec<(TimerKind, Duration)>,
    pub cancelled_timers: Vec<TimerKind>,
    pub confirm_prompts: Vec<String>,
    pub confirm_answers: VecDeque<bool>,
    pub alerts: Vec<String>,
    pub render_requests: usize,
    pub stop_requests: usize,
}

impl HostSpy {
    pub fn new() -> Self {
        Self {
            next_request_id: 1,
            ..Self::default()
        }
    }

    pub fn answering(answers: &[bool]) -> Self {
        Self {
            confirm_answers: answers.iter().copied().collect(),
            ..Self::new()
        }
    }

    pub fn last_ingest_id(&self) -> RequestId {
        self.ingests.last().map(|(id, _)| *id).expect("an ingest was started")
    }

    pub fn last_query_id(&self) -> RequestId {
        self.queries
            .last()
            .map(|(id, _, _)| *id)
            .expect("a query was started")
    }

    /// Timers started but not yet cancelled, in start order.
    pub fn running_timers(&self) -> Vec<TimerKind> {
        let mut running: Vec<TimerKind> = self.started_timers.iter().map(|(k, _)| *k).collect();
        for cancelled in &self.cancelled_timers {
            if let Some(position) = running.iter().position(|kind| kind == cancelled) {
                running.remove(position);
            }
        }
        running
    }

    fn allocate(&mut self) -> Result<RequestId, String> {
        if let Some(error) = &self.refuse_requests {
            return Err(error.clone());
        }
        let id = self.next_request_id;
        self.next_request_id += 1;
        Ok(id)
    }
}

impl HostOps for HostSpy {
    fn start_ingest(&mut self, repo_url: String) -> Result<RequestId, String> {
        let id = self.allocate()?;
        self.ingests.push((id, repo_url));
        Ok(id)
    }

    fn start_query(&mut self, session_id: SessionId, query: String) -> Result<RequestId, String> {
        let id = self.allocate()?;
        self.queries.push((id, session_id.to_string(), query));
        Ok(id)
    }

    fn start_timer(&mut self, kind: TimerKind, interval: Duration) {
        self.started_timers.push((kind, interval));
    }

    fn cancel_timer(&mut self, kind: TimerKind) {
        self.cancelled_timers.push(kind);
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.confirm_prompts.push(prompt.to_string());
        self.confirm_answers.pop_front().unwrap_or(false)
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn request_render(&mut self) {
        self.render_requests += 1;
    }

    fn request_stop(&mut self) {
        self.stop_requests += 1;
    }
}

pub const SESSION: &str = "11111111-1111-1111-1111-111111111111";
pub const REPO: &str = "https://github.com/acme/widgets";

pub fn submit(app: &mut coderag::App, host: &mut HostSpy, line: &str) {
    app.on_input_replace(line.to_string());
    app.on_submit(host);
}

/// Drives an app from the submission screen into a chat on [`SESSION`].
pub fn app_in_chat(host: &mut HostSpy) -> coderag::App {
    let mut app = coderag::App::new();
    submit(&mut app, host, &format!("/join {SESSION}"));
    app
}
