//! Server module for the JSON-RPC presentation surface.
//!
//! This module provides:
//! - JSON-RPC 2.0 server over stdio
//! - Tool call handlers and routing
//! - Shared application state: the report store, the remote source handle,
//!   and the per-client selection sessions

mod handlers;
mod rpc;

pub use handlers::*;
pub use rpc::*;

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::config::Config;
use crate::report::{self, Origin, ReportRecord};
use crate::session::SessionManager;
use crate::source::ReportSource;
use crate::store::ReportStore;

/// Application state shared across handlers.
///
/// The store and its remote-fetch cache are read-mostly state shared by all
/// sessions; selection state is per-session and lives in the manager.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// In-memory report store, seeded at startup.
    pub store: RwLock<ReportStore>,
    /// Remote report source, `None` in sample-only mode.
    pub source: Option<Arc<dyn ReportSource>>,
    /// Per-client selection sessions.
    pub sessions: Mutex<SessionManager>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config, store: ReportStore, source: Option<Arc<dyn ReportSource>>) -> Self {
        info!(
            records = store.len(),
            remote = source.is_some(),
            "AppState initializing"
        );

        Self {
            config,
            store: RwLock::new(store),
            source,
            sessions: Mutex::new(SessionManager::new()),
        }
    }

    /// Clone a record out of the store by exact key.
    pub async fn get_report(&self, name: &str) -> Option<ReportRecord> {
        self.store.read().await.get(name).cloned()
    }

    /// Make sure the store has had a chance to hold records for the given
    /// names: when any are missing and a remote source is configured, pull
    /// the latest rows (amortized by the source cache) and merge them in.
    ///
    /// Returns a user-facing warning when the remote fetch failed; the store
    /// is left exactly as it was in that case.
    pub async fn ensure_records(&self, names: &[String]) -> Option<String> {
        let all_present = {
            let store = self.store.read().await;
            names.iter().all(|name| store.contains(name))
        };
        if all_present {
            return None;
        }
        self.refresh_reports().await
    }

    /// Merge the latest remote rows into the store.
    ///
    /// Malformed rows are skipped during normalization; a fetch failure
    /// degrades to "no new data" and is returned as a warning message.
    pub async fn refresh_reports(&self) -> Option<String> {
        let source = self.source.as_ref()?;

        match source.fetch_reports().await {
            Ok(rows) => {
                let records = report::records_from_rows(&rows, Origin::Remote);
                let mut store = self.store.write().await;
                let before = store.len();
                store.merge_all(records);
                info!(
                    rows = rows.len(),
                    records = store.len() - before,
                    "Merged remote report rows"
                );
                None
            }
            Err(e) => {
                warn!(error = %e, "Remote report fetch failed, keeping existing records");
                Some(format!(
                    "Remote source unavailable ({}); serving cached and bundled reports only",
                    e
                ))
            }
        }
    }

    /// Refresh the known-names index from the remote source and return the
    /// full universe, sorted. A fetch failure degrades to the current index
    /// plus a warning.
    pub async fn known_names(&self) -> (Vec<String>, Option<String>) {
        let warning = match &self.source {
            None => None,
            Some(source) => match source.fetch_known_names().await {
                Ok(names) => {
                    self.store.write().await.add_known_names(names);
                    None
                }
                Err(e) => {
                    warn!(error = %e, "Known-names fetch failed, serving current index");
                    Some(format!(
                        "Remote source unavailable ({}); name list may be incomplete",
                        e
                    ))
                }
            },
        };

        (self.store.read().await.known_names(), warning)
    }
}

/// Shared application state handle
pub type SharedState = Arc<AppState>;
