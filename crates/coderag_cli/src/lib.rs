//! Terminal client for the CodeRAG indexing service.
//!
//! ## Provider bootstrap
//!
//! - `--provider mock` (default) answers from canned text; no server needed.
//! - `--provider http --server-url <URL>` talks to a running service.
//!
//! Every flag also reads an environment variable (`CODERAG_PROVIDER`,
//! `CODERAG_SERVER_URL`, `CODERAG_TIMEOUT_SEC`, ...). Logs go to the file
//! named by `--log-file`; `RUST_LOG` sets the filter.
//!
//! ## Input
//!
//! Each input line is submitted as-is. On the first screen a line is a
//! repository URL; on the chat screen it is a question. Lines starting with
//! `/` are commands (`/help` lists them).

pub mod config;
pub mod frontend;
pub mod logging;
pub mod providers;
pub mod runtime;
