//! Remote report source boundary.
//!
//! The core consumes two read-only capabilities from an external tabular
//! source: the full set of report rows and the universe of recognized
//! company names. Credentials and transport belong entirely to the adapter;
//! everything behind [`ReportSource`] is a black box to the rest of the
//! crate.

mod cache;
mod sheet;

pub use cache::CachedSource;
pub use sheet::SheetClient;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::SourceResult;

/// One raw tabular row: column name to cell value.
///
/// Section cells may carry JSON-encoded objects; normalization in
/// [`crate::report`] decides what parses and what degrades to raw text.
pub type RawRow = HashMap<String, String>;

/// Read-only access to the external report source.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Fetch every report row the source currently holds.
    async fn fetch_reports(&self) -> SourceResult<Vec<RawRow>>;

    /// Fetch the full universe of recognized company names, independent of
    /// whether a report row exists for them yet.
    async fn fetch_known_names(&self) -> SourceResult<Vec<String>>;
}
