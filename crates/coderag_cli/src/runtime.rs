//! Event loop that owns the [`App`] and performs its side effects.
//!
//! Backend calls run on named worker threads and report back through the
//! loop's channel. Loading timers are ticker threads; every tick carries the
//! generation of the timer that produced it so ticks from a cancelled timer
//! are dropped.

use std::collections::{HashMap, VecDeque};
use std::io::{self, BufRead};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use coderag::{App, HostOps, RequestId, Route, SessionId, TimerKind};
use rag_backend::{BackendError, BackendEvent, IngestRequest, RagBackend, RetrieveRequest};
use tracing::{debug, info, warn};

use crate::frontend::Frontend;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// One submitted input line.
    Input(String),
    /// The input source reached end of file.
    InputClosed,
    Backend(BackendEvent),
    Tick { kind: TimerKind, generation: u64 },
}

struct Ticker {
    generation: u64,
    cancel: Arc<AtomicBool>,
    join_handle: JoinHandle<()>,
}

pub struct Runtime<F: Frontend> {
    backend: Arc<dyn RagBackend>,
    frontend: F,
    events_tx: Sender<RuntimeEvent>,
    events_rx: Receiver<RuntimeEvent>,
    deferred: VecDeque<RuntimeEvent>,
    next_request_id: RequestId,
    next_generation: u64,
    workers: Vec<JoinHandle<()>>,
    timers: HashMap<TimerKind, Ticker>,
    render_requested: bool,
    stop_requested: bool,
}

impl<F: Frontend> Runtime<F> {
    pub fn new(backend: Arc<dyn RagBackend>, frontend: F) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            backend,
            frontend,
            events_tx,
            events_rx,
            deferred: VecDeque::new(),
            next_request_id: 1,
            next_generation: 1,
            workers: Vec::new(),
            timers: HashMap::new(),
            render_requested: false,
            stop_requested: false,
        }
    }

    /// Channel used by input sources to feed the loop.
    pub fn sender(&self) -> Sender<RuntimeEvent> {
        self.events_tx.clone()
    }

    /// Runs until the app asks to exit, then stops all timers.
    ///
    /// Backend calls still in flight at exit are detached; their results are
    /// discarded with the channel.
    pub fn run(mut self, mut app: App, startup: Option<Route>) -> App {
        let profile = self.backend.profile();
        info!(
            provider = %profile.provider_id,
            endpoint = profile.endpoint.as_deref().unwrap_or("-"),
            "runtime started"
        );

        if let Some(route) = startup {
            app.navigate(route, &mut self);
        }
        self.render(&mut app);

        while !(app.should_exit || self.stop_requested) {
            let Some(event) = self.next_event() else {
                break;
            };
            self.dispatch(&mut app, event);
            self.reap_workers();

            if self.render_requested {
                self.render(&mut app);
            }
        }

        self.shutdown();
        app
    }

    fn next_event(&mut self) -> Option<RuntimeEvent> {
        self.deferred
            .pop_front()
            .or_else(|| self.events_rx.recv().ok())
    }

    fn dispatch(&mut self, app: &mut App, event: RuntimeEvent) {
        match event {
            RuntimeEvent::Input(line) => {
                app.on_input_replace(line);
                app.on_submit(self);
            }
            RuntimeEvent::InputClosed => app.on_input_closed(self),
            RuntimeEvent::Backend(event) => app.on_backend_event(event, self),
            RuntimeEvent::Tick { kind, generation } => {
                let current = self.timers.get(&kind).map(|ticker| ticker.generation);
                if current == Some(generation) {
                    app.on_timer_tick(kind, self);
                } else {
                    debug!(?kind, generation, "dropping tick from stopped timer");
                }
            }
        }
    }

    fn render(&mut self, app: &mut App) {
        self.render_requested = false;
        if let Err(error) = self.frontend.render(app) {
            warn!(%error, "render failed");
        }
    }

    fn spawn_worker<T, C, W>(&mut self, name: String, call: C, wrap: W) -> Result<(), String>
    where
        T: 'static,
        C: FnOnce(&dyn RagBackend) -> Result<T, BackendError> + Send + 'static,
        W: FnOnce(Result<T, BackendError>) -> BackendEvent + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let events = self.events_tx.clone();
        let join_handle = thread::Builder::new()
            .name(name)
            .spawn(move || {
                let outcome = catch_unwind(AssertUnwindSafe(|| call(&*backend)))
                    .unwrap_or_else(|_| Err(BackendError::transport("Backend panicked")));
                let _ = events.send(RuntimeEvent::Backend(wrap(outcome)));
            })
            .map_err(|error| format!("Failed to spawn backend worker: {error}"))?;

        self.workers.push(join_handle);
        Ok(())
    }

    fn reap_workers(&mut self) {
        let (finished, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.workers)
            .into_iter()
            .partition(|handle| handle.is_finished());
        self.workers = running;
        for handle in finished {
            let _ = handle.join();
        }
    }

    fn allocate_request_id(&mut self) -> RequestId {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        request_id
    }

    fn shutdown(&mut self) {
        let kinds: Vec<TimerKind> = self.timers.keys().copied().collect();
        for kind in kinds {
            self.cancel_timer(kind);
        }
        self.reap_workers();
        if !self.workers.is_empty() {
            debug!(count = self.workers.len(), "detaching in-flight backend calls");
        }
        info!("runtime stopped");
    }
}

impl<F: Frontend> HostOps for Runtime<F> {
    fn start_ingest(&mut self, repo_url: String) -> Result<RequestId, String> {
        let request_id = self.allocate_request_id();
        self.spawn_worker(
            format!("coderag-ingest-{request_id}"),
            move |backend| {
                backend.ingest(IngestRequest {
                    request_id,
                    repo_url,
                })
            },
            move |outcome| BackendEvent::Ingested {
                request_id,
                outcome,
            },
        )?;
        Ok(request_id)
    }

    fn start_query(&mut self, session_id: SessionId, query: String) -> Result<RequestId, String> {
        let request_id = self.allocate_request_id();
        self.spawn_worker(
            format!("coderag-query-{request_id}"),
            move |backend| {
                backend.retrieve(RetrieveRequest {
                    request_id,
                    session_id: session_id.as_str().to_string(),
                    query,
                })
            },
            move |outcome| BackendEvent::Answered {
                request_id,
                outcome,
            },
        )?;
        Ok(request_id)
    }

    fn start_timer(&mut self, kind: TimerKind, interval: Duration) {
        self.cancel_timer(kind);

        let generation = self.next_generation;
        self.next_generation += 1;
        let cancel = Arc::new(AtomicBool::new(false));

        match spawn_ticker(
            kind,
            interval,
            generation,
            Arc::clone(&cancel),
            self.events_tx.clone(),
        ) {
            Ok(join_handle) => {
                self.timers.insert(
                    kind,
                    Ticker {
                        generation,
                        cancel,
                        join_handle,
                    },
                );
            }
            Err(error) => warn!(?kind, %error, "failed to start timer"),
        }
    }

    fn cancel_timer(&mut self, kind: TimerKind) {
        let Some(ticker) = self.timers.remove(&kind) else {
            return;
        };

        ticker.cancel.store(true, Ordering::SeqCst);
        ticker.join_handle.thread().unpark();
        let _ = ticker.join_handle.join();
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        if self.deferred.contains(&RuntimeEvent::InputClosed) {
            return false;
        }
        if let Err(error) = self.frontend.confirm_prompt(prompt) {
            warn!(%error, "failed to show confirmation");
            return false;
        }

        loop {
            match self.events_rx.recv() {
                Ok(RuntimeEvent::Input(line)) => return is_affirmative(&line),
                Ok(RuntimeEvent::InputClosed) => {
                    self.deferred.push_back(RuntimeEvent::InputClosed);
                    return false;
                }
                Ok(other) => self.deferred.push_back(other),
                Err(_) => return false,
            }
        }
    }

    fn alert(&mut self, message: &str) {
        if let Err(error) = self.frontend.alert(message) {
            warn!(%error, "failed to show alert");
        }
    }

    fn request_render(&mut self) {
        self.render_requested = true;
    }

    fn request_stop(&mut self) {
        self.stop_requested = true;
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn spawn_ticker(
    kind: TimerKind,
    interval: Duration,
    generation: u64,
    cancel: Arc<AtomicBool>,
    events: Sender<RuntimeEvent>,
) -> io::Result<JoinHandle<()>> {
    let name = match kind {
        TimerKind::ProgressStatus => "coderag-progress-timer",
        TimerKind::AssetRotation => "coderag-asset-timer",
    };

    thread::Builder::new().name(name.to_string()).spawn(move || {
        let mut deadline = Instant::now() + interval;
        loop {
            if cancel.load(Ordering::SeqCst) {
                return;
            }

            let now = Instant::now();
            if now < deadline {
                thread::park_timeout(deadline - now);
                continue;
            }

            if events
                .send(RuntimeEvent::Tick { kind, generation })
                .is_err()
            {
                return;
            }
            deadline += interval;
        }
    })
}

/// Forwards each line of `reader` to the loop, then reports end of input.
pub fn spawn_line_reader<R>(reader: R, events: Sender<RuntimeEvent>) -> io::Result<JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("coderag-input".to_string())
        .spawn(move || {
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if events.send(RuntimeEvent::Input(line)).is_err() {
                            return;
                        }
                    }
                    Err(error) => {
                        warn!(%error, "input read failed");
                        break;
                    }
                }
            }
            let _ = events.send(RuntimeEvent::InputClosed);
        })
}
