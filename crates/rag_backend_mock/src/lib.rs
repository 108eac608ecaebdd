//! Deterministic mock implementation of the shared `rag_backend` contract.
//!
//! This crate contains no transport/protocol logic and is intended for local
//! development and contract-level integration testing.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use rag_backend::{
    BackendError, BackendProfile, IngestReceipt, IngestRequest, RagBackend, RetrieveAnswer,
    RetrieveRequest,
};
use tracing::debug;

/// Stable provider identifier used for explicit startup selection.
pub const MOCK_PROVIDER_ID: &str = "mock";

/// Scripted result for the next call of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOutcome {
    /// Answer normally.
    Succeed,
    /// Well-formed response with a non-success status and optional detail.
    Reject { detail: Option<String> },
    /// Behave like an unreachable server.
    Unreachable,
    /// Behave like a response missing its payload field.
    Malformed,
}

/// One call observed by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Ingest {
        request_id: u64,
        repo_url: String,
    },
    Retrieve {
        request_id: u64,
        session_id: String,
        query: String,
    },
}

#[derive(Debug, Default)]
struct MockState {
    ingest_script: VecDeque<MockOutcome>,
    retrieve_script: VecDeque<MockOutcome>,
    answer_index: usize,
    calls: Vec<MockCall>,
}

/// Deterministic mock backend used by `coderag_cli` tests and local runs.
#[derive(Debug)]
pub struct MockBackend {
    answers: Vec<String>,
    delay: Duration,
    state: Mutex<MockState>,
}

impl MockBackend {
    /// Creates a mock backend that cycles through the given answers.
    #[must_use]
    pub fn new(answers: Vec<String>) -> Self {
        Self {
            answers: sanitize_answers(answers),
            delay: Duration::ZERO,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Sleeps for `delay` before every call completes.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queues the outcome of the next unscripted ingest call.
    pub fn script_ingest(&self, outcome: MockOutcome) {
        lock_unpoisoned(&self.state).ingest_script.push_back(outcome);
    }

    /// Queues the outcome of the next unscripted retrieve call.
    pub fn script_retrieve(&self, outcome: MockOutcome) {
        lock_unpoisoned(&self.state)
            .retrieve_script
            .push_back(outcome);
    }

    /// Returns every call received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        lock_unpoisoned(&self.state).calls.clone()
    }

    fn pause(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }

    const SERVER_DOWN: &'static str = "connection refused (mock)";
    const DEFAULT_DELAY_MS: u64 = 400;
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new(vec![
            "This repository is organised around a small entry point that wires configuration, \
             logging and the request router before handing control to the server loop."
                .to_string(),
            "The main module lives in `src/main.rs`. It parses arguments, loads the settings \
             file and then calls `run()`.\n\n```rust\nfn main() {\n    app::run();\n}\n```"
                .to_string(),
            "Tests sit next to the code they cover in `#[cfg(test)]` modules, with end-to-end \
             cases under `tests/`."
                .to_string(),
        ])
        .with_delay(Duration::from_millis(Self::DEFAULT_DELAY_MS))
    }
}

impl RagBackend for MockBackend {
    fn profile(&self) -> BackendProfile {
        BackendProfile {
            provider_id: MOCK_PROVIDER_ID.to_string(),
            endpoint: None,
        }
    }

    fn ingest(&self, req: IngestRequest) -> Result<IngestReceipt, BackendError> {
        let outcome = {
            let mut state = lock_unpoisoned(&self.state);
            state.calls.push(MockCall::Ingest {
                request_id: req.request_id,
                repo_url: req.repo_url.clone(),
            });
            state
                .ingest_script
                .pop_front()
                .unwrap_or(MockOutcome::Succeed)
        };
        debug!(request_id = req.request_id, ?outcome, "mock ingest");
        self.pause();

        match outcome {
            MockOutcome::Succeed => {
                if !looks_like_repository_url(&req.repo_url) {
                    return Err(BackendError::Rejected {
                        status: "error".to_string(),
                        detail: Some(format!("Invalid repository URL: {}", req.repo_url)),
                    });
                }
                Ok(IngestReceipt {
                    session_id: uuid::Uuid::new_v4().to_string(),
                    detail: Some("Repository ingested".to_string()),
                })
            }
            MockOutcome::Reject { detail } => Err(BackendError::Rejected {
                status: "error".to_string(),
                detail,
            }),
            MockOutcome::Unreachable => Err(BackendError::transport(Self::SERVER_DOWN)),
            MockOutcome::Malformed => Err(BackendError::Malformed(
                "response is missing 'session_id'".to_string(),
            )),
        }
    }

    fn retrieve(&self, req: RetrieveRequest) -> Result<RetrieveAnswer, BackendError> {
        let (outcome, answer_index) = {
            let mut state = lock_unpoisoned(&self.state);
            state.calls.push(MockCall::Retrieve {
                request_id: req.request_id,
                session_id: req.session_id.clone(),
                query: req.query.clone(),
            });
            let outcome = state
                .retrieve_script
                .pop_front()
                .unwrap_or(MockOutcome::Succeed);
            let index = state.answer_index;
            if outcome == MockOutcome::Succeed {
                state.answer_index = (index + 1) % self.answers.len();
            }
            (outcome, index)
        };
        debug!(request_id = req.request_id, ?outcome, "mock retrieve");
        self.pause();

        match outcome {
            MockOutcome::Succeed => Ok(RetrieveAnswer {
                text: self.answers[answer_index].clone(),
            }),
            MockOutcome::Reject { detail } => Err(BackendError::Rejected {
                status: "error".to_string(),
                detail,
            }),
            MockOutcome::Unreachable => Err(BackendError::transport(Self::SERVER_DOWN)),
            MockOutcome::Malformed => Err(BackendError::Malformed(
                "response is missing 'llm_response'".to_string(),
            )),
        }
    }
}

fn looks_like_repository_url(value: &str) -> bool {
    let value = value.trim();
    ["https://", "http://"].iter().any(|scheme| {
        value
            .strip_prefix(scheme)
            .is_some_and(|rest| !rest.trim_matches('/').is_empty())
    })
}

fn sanitize_answers(answers: Vec<String>) -> Vec<String> {
    let mut sanitized: Vec<String> = answers
        .into_iter()
        .filter(|value| !value.trim().is_empty())
        .collect();

    if sanitized.is_empty() {
        sanitized.push("No answer configured.".to_string());
    }

    sanitized
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
