//! Client-side session lifecycle and chat orchestration for a CodeRAG
//! indexing service.
//!
//! [`App`] is a plain state machine. It never performs I/O itself: the event
//! loop lends it a [`HostOps`] implementation for each call, and feeds
//! backend completions and timer ticks back through `on_*` methods.
//!
//! Invariant: completions carry the [`RequestId`] they were started with;
//! anything that does not match the outstanding request is dropped.

pub mod app;
pub mod commands;
pub mod error;
pub mod history;
pub mod progress;
pub mod screen;
pub mod session;

pub use crate::app::{App, HostOps, Notice, NoticeLevel, RequestId};
pub use crate::error::{ClientError, ValidationError};
pub use crate::history::{History, Message, MessageId, Role};
pub use crate::progress::{ProgressCursor, ProgressState, ProgressTiming, TimerKind};
pub use crate::screen::{Route, RouteParseError, Screen};
pub use crate::session::{Session, SessionId, SessionOrigin};
