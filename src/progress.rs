//! Time-driven progress narration shown while a repository is ingested.
//!
//! The presenter never learns anything from the backend. Its text advances on
//! a fixed cadence and stops at the final step; the only completion signals
//! are the ingest response and the user's confirmation to start chatting.

use std::time::Duration;

/// Status text shown before the first tick.
pub const INITIAL_STATUS: &str = ".....";

pub const PROGRESS_STEPS: &[&str] = &[
    "Validating repository URL...",
    "Cloning repository...",
    "Walking through the file system...",
    "Reading source files...",
    "Parsing files into ASTs...",
    "Extracting functions, classes, and modules...",
    "Generating embeddings for code chunks...",
    "Storing embeddings in Vector Database...",
    "Updating Graph Database with AST relationships...",
    "Linking code elements for semantic search...",
    "Indexing code for quick context retrieval...",
    "Optimizing storage and retrieval structures...",
    "Finalizing RAG setup...",
    "Ready to chat with the codebase!",
    "chatting about to start....",
    "Wait",
    "wait",
    "if it takes too long, contact for support",
];

/// Cosmetic animation frames rotated independently of the status text.
pub const ASSET_FRAMES: &[&str] = &[
    "[=     ]", "[ =    ]", "[  =   ]", "[   =  ]", "[    = ]", "[     =]",
];

pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_millis(3000);
pub const DEFAULT_ASSET_INTERVAL: Duration = Duration::from_millis(2500);

/// The two repeating timers owned by the loading screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    ProgressStatus,
    AssetRotation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTiming {
    pub status_interval: Duration,
    pub asset_interval: Duration,
}

impl Default for ProgressTiming {
    fn default() -> Self {
        Self {
            status_interval: DEFAULT_STATUS_INTERVAL,
            asset_interval: DEFAULT_ASSET_INTERVAL,
        }
    }
}

impl ProgressTiming {
    pub fn interval(&self, kind: TimerKind) -> Duration {
        match kind {
            TimerKind::ProgressStatus => self.status_interval,
            TimerKind::AssetRotation => self.asset_interval,
        }
    }
}

/// Index into [`PROGRESS_STEPS`]; holds at the last step once reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressCursor {
    shown: Option<usize>,
}

impl ProgressCursor {
    /// Moves to the next step. Returns true once the last step is showing.
    pub fn advance(&mut self) -> bool {
        let last = PROGRESS_STEPS.len().saturating_sub(1);
        let next = match self.shown {
            None => 0,
            Some(index) => (index + 1).min(last),
        };
        self.shown = Some(next);
        next >= last
    }

    pub fn position(&self) -> Option<usize> {
        self.shown
    }

    pub fn is_exhausted(&self) -> bool {
        self.shown
            .is_some_and(|index| index + 1 >= PROGRESS_STEPS.len())
    }

    pub fn text(&self) -> &'static str {
        self.shown
            .and_then(|index| PROGRESS_STEPS.get(index).copied())
            .unwrap_or(INITIAL_STATUS)
    }
}

/// Per-loading-screen presenter state. Discarded when Loading is left.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    cursor: ProgressCursor,
    frame: usize,
    status_timer_running: bool,
    asset_timer_running: bool,
}

impl ProgressState {
    pub(crate) fn started() -> Self {
        Self {
            status_timer_running: true,
            asset_timer_running: true,
            ..Self::default()
        }
    }

    pub fn cursor(&self) -> ProgressCursor {
        self.cursor
    }

    pub fn status_text(&self) -> &'static str {
        self.cursor.text()
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    pub fn frame(&self) -> &'static str {
        ASSET_FRAMES.get(self.frame).copied().unwrap_or("")
    }

    pub fn is_timer_running(&self, kind: TimerKind) -> bool {
        match kind {
            TimerKind::ProgressStatus => self.status_timer_running,
            TimerKind::AssetRotation => self.asset_timer_running,
        }
    }

    /// Applies one status tick. Returns true when the status timer should stop.
    pub(crate) fn on_status_tick(&mut self) -> bool {
        if !self.status_timer_running {
            return false;
        }
        let exhausted = self.cursor.advance();
        if exhausted {
            self.status_timer_running = false;
        }
        exhausted
    }

    pub(crate) fn on_asset_tick(&mut self) {
        if self.asset_timer_running && !ASSET_FRAMES.is_empty() {
            self.frame = (self.frame + 1) % ASSET_FRAMES.len();
        }
    }

    /// Timers still running; the caller cancels each of them.
    pub(crate) fn stop(&mut self) -> Vec<TimerKind> {
        let mut running = Vec::new();
        if std::mem::take(&mut self.status_timer_running) {
            running.push(TimerKind::ProgressStatus);
        }
        if std::mem::take(&mut self.asset_timer_running) {
            running.push(TimerKind::AssetRotation);
        }
        running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_starts_with_placeholder_and_walks_every_step() {
        let mut cursor = ProgressCursor::default();
        assert_eq!(cursor.text(), INITIAL_STATUS);

        for (index, step) in PROGRESS_STEPS.iter().enumerate() {
            let exhausted = cursor.advance();
            assert_eq!(cursor.text(), *step);
            assert_eq!(exhausted, index + 1 == PROGRESS_STEPS.len());
        }
    }

    #[test]
    fn cursor_holds_last_step_after_exhaustion() {
        let mut cursor = ProgressCursor::default();
        for _ in 0..PROGRESS_STEPS.len() * 3 {
            cursor.advance();
            assert!(cursor.position().is_some_and(|p| p < PROGRESS_STEPS.len()));
        }

        assert!(cursor.is_exhausted());
        assert_eq!(cursor.text(), "if it takes too long, contact for support");
    }

    #[test]
    fn status_tick_reports_stop_once_and_ignores_late_ticks() {
        let mut state = ProgressState::started();
        let stops: usize = (0..PROGRESS_STEPS.len() + 5)
            .filter(|_| state.on_status_tick())
            .count();

        assert_eq!(stops, 1);
        assert!(!state.is_timer_running(TimerKind::ProgressStatus));
        assert!(state.is_timer_running(TimerKind::AssetRotation));
    }

    #[test]
    fn asset_rotation_wraps() {
        let mut state = ProgressState::started();
        for _ in 0..ASSET_FRAMES.len() {
            state.on_asset_tick();
        }
        assert_eq!(state.frame_index(), 0);

        state.on_asset_tick();
        assert_eq!(state.frame(), ASSET_FRAMES[1]);
    }

    #[test]
    fn stop_returns_only_running_timers() {
        let mut state = ProgressState::started();
        while !state.on_status_tick() {}

        assert_eq!(state.stop(), vec![TimerKind::AssetRotation]);
        assert!(state.stop().is_empty());
    }

    #[test]
    fn default_timing_matches_loading_cadence() {
        let timing = ProgressTiming::default();
        assert_eq!(timing.interval(TimerKind::ProgressStatus), Duration::from_millis(3000));
        assert_eq!(timing.interval(TimerKind::AssetRotation), Duration::from_millis(2500));
    }
}
