//! Report data model.
//!
//! A [`ReportRecord`] is the canonical typed shape of one company's
//! pre-computed analysis: an investment score plus three sections
//! (governance, risk, investigation) in fixed order. Reports are authored
//! externally and treated as opaque narrative; each section keeps a
//! degraded `Raw` variant for source cells that fail structured parsing.

mod parse;
mod samples;

pub use parse::{record_from_row, records_from_rows};
pub use samples::sample_records;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Investment score with an explicit "unavailable" sentinel.
///
/// Not every source row carries a parseable number; absence is part of the
/// model, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Score {
    /// A parsed integer score.
    Available(i64),
    /// No parseable score in the source row.
    Unavailable,
}

impl Score {
    /// The numeric score, if one was parsed.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Score::Available(n) => Some(*n),
            Score::Unavailable => None,
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Available(n) => write!(f, "{}", n),
            Score::Unavailable => write!(f, "N/A"),
        }
    }
}

/// Ordered free-form narrative: subsection title to text or nested narrative.
pub type Narrative = Vec<(String, NarrativeNode)>;

/// One node of a narrative tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NarrativeNode {
    /// Free text under a subsection title.
    Text(String),
    /// A nested group of titled subsections.
    Nested(Narrative),
}

/// Governance and management-credibility section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernanceSection {
    /// Parsed narrative subsections.
    Structured(Narrative),
    /// The source cell as-is, kept when structured parsing was not possible.
    Raw(String),
}

/// Operational-risk section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSection {
    /// Parsed risk table and assessment.
    Structured(RiskDetail),
    /// The source cell as-is, kept when structured parsing was not possible.
    Raw(String),
}

/// Structured contents of the risk section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDetail {
    /// Ordered factor-by-factor risk rows.
    pub summary_table: Vec<RiskRow>,
    /// Free-text overall assessment.
    pub overall_assessment: String,
}

/// One row of the risk summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRow {
    /// Risk factor under assessment, e.g. "High Capex".
    pub factor: String,
    /// Verdict on the factor.
    pub assessment: Assessment,
    /// Supporting figures, verbatim from the source.
    pub data: String,
    /// Free-text justification for the verdict.
    pub justification: String,
}

/// Yes/no/not-applicable verdict on a risk factor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assessment {
    /// The factor applies.
    Yes,
    /// The factor does not apply.
    No,
    /// Insufficient data to decide.
    #[default]
    NotApplicable,
}

impl std::fmt::Display for Assessment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Assessment::Yes => write!(f, "YES"),
            Assessment::No => write!(f, "NO"),
            Assessment::NotApplicable => write!(f, "N/A"),
        }
    }
}

impl std::str::FromStr for Assessment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "YES" => Ok(Assessment::Yes),
            "NO" => Ok(Assessment::No),
            "N/A" | "NA" => Ok(Assessment::NotApplicable),
            _ => Err(format!("Unknown assessment: {}", s)),
        }
    }
}

/// Holistic investigation section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestigationSection {
    /// Parsed narrative plus the distinguished subsections.
    Structured(InvestigationDetail),
    /// The source cell as-is, kept when structured parsing was not possible.
    Raw(String),
}

/// Structured contents of the investigation section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestigationDetail {
    /// Narrative subsections other than the distinguished ones below.
    pub narrative: Narrative,
    /// Owner's-earnings subsection with IRR projections, when present.
    pub owners_earnings: Option<OwnersEarnings>,
    /// Multi-year hold scenarios, when present.
    pub hold_scenarios: Option<HoldScenarios>,
}

/// The multi-year hold-scenarios subsection of an investigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldScenarios {
    /// Subsection title as it appeared in the source.
    pub title: String,
    /// Scenario narrative.
    pub text: String,
}

/// The owner's-earnings subsection of an investigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnersEarnings {
    /// Subsection title as it appeared in the source.
    pub title: String,
    /// Narrative entries other than the IRR projections.
    pub narrative: Narrative,
    /// Scenario string per named investment style, in source order.
    pub irr_projections: Vec<IrrProjection>,
}

/// A projected-return scenario for one named investment style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrProjection {
    /// Investment style, e.g. "Warren Buffett".
    pub style: String,
    /// Free-text scenario, e.g. "Bear: 4%, Base: 9%, Bull: 14%".
    pub scenario: String,
}

/// Where a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Compiled-in sample data.
    Bundled,
    /// Fetched from the remote source.
    Remote,
}

/// The analysis report for one company.
///
/// `company_name` is the unique key; a later merge with the same name
/// replaces the record wholesale. Records are never mutated in place and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Unique company name, acts as the store key.
    pub company_name: String,
    /// Overall investment score.
    pub investment_score: Score,
    /// Corporate governance and management credibility.
    pub governance: GovernanceSection,
    /// Operational risk and business quality.
    pub risk: RiskSection,
    /// Holistic investment investigation.
    pub investigation: InvestigationSection,
    /// Where the record came from.
    pub origin: Origin,
    /// When the record was created from its source.
    pub fetched_at: DateTime<Utc>,
}
