//! # Equity Report Server
//!
//! A read-only dashboard server for pre-computed investment-analysis
//! reports. Reports are opaque narrative documents authored externally
//! (an analyst or an LLM pipeline); this server merely stores, resolves,
//! and presents them.
//!
//! ## Features
//!
//! - **Report store**: in-memory, keyed by company name, last-writer-wins
//!   merges from bundled samples and a remote spreadsheet
//! - **Remote source**: spreadsheet-export client behind a trait boundary,
//!   with retries and a time-based fetch cache
//! - **Name resolution**: deterministic case-insensitive substring
//!   autocomplete over the known-names universe
//! - **Selection sessions**: per-client pending/draft/generated state with
//!   explicit generate semantics
//! - **Presenter**: pure projection of a report into a serializable view
//!   tree of headings, paragraphs, and tables
//!
//! ## Architecture
//!
//! ```text
//! UI Client → JSON-RPC Server (stdio) → ReportStore (in-memory)
//!                      ↓                      ↑
//!            SelectionSessions        Sheet API (HTTP, cached)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use equity_report_server::{AppState, Config, ReportServer};
//! use equity_report_server::report::sample_records;
//! use equity_report_server::store::ReportStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let mut store = ReportStore::new();
//!     store.merge_all(sample_records());
//!     let state = Arc::new(AppState::new(config, store, None));
//!     ReportServer::new(state).run().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Configuration management for the server.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// Report presenter producing view trees.
pub mod render;
/// Report record model and row normalization.
pub mod report;
/// Name autocomplete over known company names.
pub mod resolver;
/// Selection-session state machine and registry.
pub mod session;
/// Remote report source adapter and cache.
pub mod source;
/// In-memory report store.
pub mod store;
/// JSON-RPC server implementation and request handling.
pub mod server;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use server::{AppState, ReportServer, SharedState};
