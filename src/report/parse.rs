//! Row normalization: raw tabular rows into [`ReportRecord`]s.
//!
//! The source is lenient by contract: a row without a company name is
//! skipped, a section cell that fails JSON parsing degrades to raw text,
//! and an unparseable score becomes the `Unavailable` sentinel. Nothing
//! here fails a whole fetch over one bad row.

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::warn;

use super::{
    Assessment, GovernanceSection, HoldScenarios, InvestigationDetail, InvestigationSection,
    IrrProjection, Narrative, NarrativeNode, Origin, OwnersEarnings, ReportRecord, RiskDetail,
    RiskRow, RiskSection, Score,
};
use crate::source::RawRow;

const COL_COMPANY_NAME: &str = "company_name";
const COL_GOVERNANCE: &str = "governance";
const COL_RISK: &str = "risk";
const COL_INVESTIGATION: &str = "investigation";
const COL_SCORE: &str = "investment_score";
// Combined layout: all three parts plus the score in one JSON blob.
const COL_DETAILS: &str = "report_details";

/// Normalize a batch of rows, skipping the malformed ones.
pub fn records_from_rows(rows: &[RawRow], origin: Origin) -> Vec<ReportRecord> {
    rows.iter()
        .filter_map(|row| record_from_row(row, origin))
        .collect()
}

/// Normalize one raw row into a record.
///
/// Returns `None` for rows without a company name; every other defect
/// degrades field-locally instead of dropping the row.
pub fn record_from_row(row: &RawRow, origin: Origin) -> Option<ReportRecord> {
    let company_name = row
        .get(COL_COMPANY_NAME)
        .map(|s| s.trim())
        .unwrap_or_default();
    if company_name.is_empty() {
        warn!("Skipping source row without a company name");
        return None;
    }

    let details = row
        .get(COL_DETAILS)
        .and_then(|cell| sniff_json(cell))
        .filter(Value::is_object);

    let governance = governance_from(section_input(row, COL_GOVERNANCE, details.as_ref(), "part 1"));
    let risk = risk_from(section_input(row, COL_RISK, details.as_ref(), "part 2"));
    let investigation =
        investigation_from(section_input(row, COL_INVESTIGATION, details.as_ref(), "part 3"));
    let investment_score = score_from(row, details.as_ref());

    Some(ReportRecord {
        company_name: company_name.to_string(),
        investment_score,
        governance,
        risk,
        investigation,
        origin,
        fetched_at: Utc::now(),
    })
}

/// A section cell after JSON sniffing.
enum SectionInput {
    /// Plain text, or JSON-looking text that failed to parse.
    Raw(String),
    /// Parsed JSON plus the original text for degraded fallbacks.
    Json { value: Value, raw: String },
}

/// Parse a cell as JSON when it structurally looks like it (starts with
/// `{` or `[` after trimming). Returns `None` otherwise or on parse failure.
fn sniff_json(cell: &str) -> Option<Value> {
    let trimmed = cell.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        serde_json::from_str(trimmed).ok()
    } else {
        None
    }
}

/// Resolve a section's input: a dedicated column wins; otherwise the
/// matching "Part N" entry of the combined details blob.
fn section_input(
    row: &RawRow,
    column: &str,
    details: Option<&Value>,
    part_needle: &str,
) -> Option<SectionInput> {
    if let Some(cell) = row.get(column) {
        if !cell.trim().is_empty() {
            return Some(match sniff_json(cell) {
                Some(value) => SectionInput::Json {
                    value,
                    raw: cell.clone(),
                },
                None => SectionInput::Raw(cell.clone()),
            });
        }
    }

    let obj = details?.as_object()?;
    obj.iter()
        .find(|(key, _)| key.to_lowercase().contains(part_needle))
        .map(|(_, value)| SectionInput::Json {
            raw: value.to_string(),
            value: value.clone(),
        })
}

fn governance_from(input: Option<SectionInput>) -> GovernanceSection {
    match input {
        None => GovernanceSection::Structured(Vec::new()),
        Some(SectionInput::Raw(text)) => GovernanceSection::Raw(text),
        Some(SectionInput::Json { value, raw }) => match value.as_object() {
            Some(obj) => GovernanceSection::Structured(narrative_from_object(obj)),
            None => GovernanceSection::Raw(raw),
        },
    }
}

fn risk_from(input: Option<SectionInput>) -> RiskSection {
    match input {
        None => RiskSection::Structured(RiskDetail {
            summary_table: Vec::new(),
            overall_assessment: String::new(),
        }),
        Some(SectionInput::Raw(text)) => RiskSection::Raw(text),
        Some(SectionInput::Json { value, raw }) => match value.as_object() {
            Some(obj) => RiskSection::Structured(risk_detail_from_object(obj)),
            None => RiskSection::Raw(raw),
        },
    }
}

fn risk_detail_from_object(obj: &Map<String, Value>) -> RiskDetail {
    let summary_table = get_ci(obj, "summary_table")
        .and_then(Value::as_array)
        .map(|rows| rows.iter().filter_map(risk_row_from_value).collect())
        .unwrap_or_default();

    let overall_assessment = obj
        .iter()
        .find(|(key, _)| key.to_lowercase().contains("overall"))
        .and_then(|(_, value)| value.as_str())
        .unwrap_or_default()
        .to_string();

    RiskDetail {
        summary_table,
        overall_assessment,
    }
}

fn risk_row_from_value(value: &Value) -> Option<RiskRow> {
    let obj = value.as_object()?;
    let field = |name: &str| {
        get_ci(obj, name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Some(RiskRow {
        factor: field("factor"),
        // Unknown verdict strings collapse to N/A rather than dropping the row
        assessment: field("assessment").parse().unwrap_or_default(),
        data: field("data"),
        justification: field("justification"),
    })
}

fn investigation_from(input: Option<SectionInput>) -> InvestigationSection {
    match input {
        None => InvestigationSection::Structured(InvestigationDetail {
            narrative: Vec::new(),
            owners_earnings: None,
            hold_scenarios: None,
        }),
        Some(SectionInput::Raw(text)) => InvestigationSection::Raw(text),
        Some(SectionInput::Json { value, raw }) => match value.as_object() {
            Some(obj) => InvestigationSection::Structured(investigation_detail_from_object(obj)),
            None => InvestigationSection::Raw(raw),
        },
    }
}

fn investigation_detail_from_object(obj: &Map<String, Value>) -> InvestigationDetail {
    let mut narrative = Vec::new();
    let mut owners_earnings = None;
    let mut hold_scenarios = None;

    for (key, value) in obj {
        if owners_earnings.is_none() {
            if let Some(nested) = value.as_object() {
                if nested.keys().any(|k| k.to_lowercase().contains("irr")) {
                    owners_earnings = Some(owners_earnings_from_object(key, nested));
                    continue;
                }
            }
        }

        if hold_scenarios.is_none() && key.to_lowercase().contains("hold scenario") {
            if let Some(text) = value.as_str() {
                hold_scenarios = Some(HoldScenarios {
                    title: key.clone(),
                    text: text.to_string(),
                });
                continue;
            }
        }

        narrative.push((key.clone(), node_from_value(value)));
    }

    InvestigationDetail {
        narrative,
        owners_earnings,
        hold_scenarios,
    }
}

fn owners_earnings_from_object(title: &str, obj: &Map<String, Value>) -> OwnersEarnings {
    let mut narrative = Vec::new();
    let mut irr_projections = Vec::new();

    for (key, value) in obj {
        if key.to_lowercase().contains("irr") {
            if let Some(styles) = value.as_object() {
                for (style, scenario) in styles {
                    irr_projections.push(IrrProjection {
                        style: style.clone(),
                        scenario: text_of(scenario),
                    });
                }
                continue;
            }
        }
        narrative.push((key.clone(), node_from_value(value)));
    }

    OwnersEarnings {
        title: title.to_string(),
        narrative,
        irr_projections,
    }
}

fn narrative_from_object(obj: &Map<String, Value>) -> Narrative {
    obj.iter()
        .map(|(key, value)| (key.clone(), node_from_value(value)))
        .collect()
}

fn node_from_value(value: &Value) -> NarrativeNode {
    match value {
        Value::Object(obj) => NarrativeNode::Nested(narrative_from_object(obj)),
        other => NarrativeNode::Text(text_of(other)),
    }
}

/// String content of a JSON scalar, without the quoting `to_string` adds.
fn text_of(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

fn score_from(row: &RawRow, details: Option<&Value>) -> Score {
    if let Some(cell) = row.get(COL_SCORE) {
        if let Ok(n) = cell.trim().parse::<i64>() {
            return Score::Available(n);
        }
    }

    // Combined layout keeps the score under a "Part 4: investment score" key.
    if let Some(obj) = details.and_then(Value::as_object) {
        if let Some(n) = obj
            .iter()
            .find(|(key, _)| key.to_lowercase().contains("investment score"))
            .and_then(|(_, value)| value.as_i64())
        {
            return Score::Available(n);
        }
    }

    Score::Unavailable
}

/// Case-insensitive key lookup.
fn get_ci<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(entries: &[(&str, &str)]) -> RawRow {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_sniff_json_only_on_structural_prefix() {
        assert!(sniff_json(r#"{"a": 1}"#).is_some());
        assert!(sniff_json(r#"  [1, 2]"#).is_some());
        assert!(sniff_json("plain narrative text").is_none());
        // JSON-looking but broken: caller keeps the raw string
        assert!(sniff_json("{not json at all").is_none());
    }

    #[test]
    fn test_row_without_name_is_skipped() {
        assert!(record_from_row(&row(&[("governance", "text")]), Origin::Remote).is_none());
        assert!(record_from_row(&row(&[("company_name", "   ")]), Origin::Remote).is_none());
    }

    #[test]
    fn test_plain_text_sections_stay_raw() {
        let record = record_from_row(
            &row(&[
                ("company_name", "Acme Ltd"),
                ("governance", "solid management"),
                ("investment_score", "42"),
            ]),
            Origin::Remote,
        )
        .unwrap();

        assert_eq!(record.company_name, "Acme Ltd");
        assert_eq!(record.investment_score, Score::Available(42));
        assert_eq!(
            record.governance,
            GovernanceSection::Raw("solid management".to_string())
        );
    }

    #[test]
    fn test_unparseable_score_is_unavailable() {
        let record = record_from_row(
            &row(&[("company_name", "Acme Ltd"), ("investment_score", "high")]),
            Origin::Remote,
        )
        .unwrap();
        assert_eq!(record.investment_score, Score::Unavailable);
    }

    #[test]
    fn test_risk_table_parses_rows_and_overall() {
        let risk = json!({
            "summary_table": [
                {"Factor": "High Capex", "Assessment": "NO", "Data": "12 Cr", "Justification": "low"},
                {"Factor": "High R&D", "Assessment": "YES", "Data": "80 Cr", "Justification": "significant"}
            ],
            "Overall Risk Assessment": "moderate risk"
        });
        let record = record_from_row(
            &row(&[("company_name", "Acme Ltd"), ("risk", &risk.to_string())]),
            Origin::Remote,
        )
        .unwrap();

        let RiskSection::Structured(detail) = record.risk else {
            panic!("expected structured risk");
        };
        assert_eq!(detail.summary_table.len(), 2);
        assert_eq!(detail.summary_table[0].factor, "High Capex");
        assert_eq!(detail.summary_table[0].assessment, Assessment::No);
        assert_eq!(detail.summary_table[1].assessment, Assessment::Yes);
        assert_eq!(detail.overall_assessment, "moderate risk");
    }

    #[test]
    fn test_broken_json_risk_degrades_to_raw() {
        let cell = r#"{"summary_table": [ broken"#;
        let record = record_from_row(
            &row(&[("company_name", "Acme Ltd"), ("risk", cell)]),
            Origin::Remote,
        )
        .unwrap();
        assert_eq!(record.risk, RiskSection::Raw(cell.to_string()));
    }

    #[test]
    fn test_investigation_extracts_distinguished_subsections() {
        let investigation = json!({
            "1. Overall Investigation (Li Lu Style)": "vertically integrated",
            "4. Owner's Earnings and Margin of Safety (Warren Buffett Style)": {
                "Owner's Earnings Analysis": "estimated",
                "IRR Projections": {
                    "Li Lu": "Bear: 5%, Base: 10%, Bull: 15%",
                    "Warren Buffett": "Bear: 4%, Base: 9%, Bull: 14%"
                }
            },
            "5. 3-10 Year Hold Scenarios": "Bear Case (20% probability): setbacks"
        });
        let record = record_from_row(
            &row(&[
                ("company_name", "Acme Ltd"),
                ("investigation", &investigation.to_string()),
            ]),
            Origin::Remote,
        )
        .unwrap();

        let InvestigationSection::Structured(detail) = record.investigation else {
            panic!("expected structured investigation");
        };
        assert_eq!(detail.narrative.len(), 1);
        assert_eq!(detail.narrative[0].0, "1. Overall Investigation (Li Lu Style)");

        let owners = detail.owners_earnings.expect("owner's earnings subsection");
        assert!(owners.title.contains("Owner's Earnings"));
        assert_eq!(owners.irr_projections.len(), 2);
        assert_eq!(owners.irr_projections[0].style, "Li Lu");
        assert_eq!(
            owners.irr_projections[0].scenario,
            "Bear: 5%, Base: 10%, Bull: 15%"
        );
        let hold = detail.hold_scenarios.expect("hold scenarios subsection");
        // The source's own subsection title is kept, numbering included
        assert_eq!(hold.title, "5. 3-10 Year Hold Scenarios");
        assert_eq!(hold.text, "Bear Case (20% probability): setbacks");
    }

    #[test]
    fn test_combined_details_layout() {
        let details = json!({
            "Part 1: Corporate Governance and Management Credibility Assessment": {
                "1. Future Forecast vs. Actuals": "on track"
            },
            "Part 2: Operational Risk and Business Quality Analysis": {
                "summary_table": [],
                "Overall Risk Assessment": "low"
            },
            "Part 3: Holistic Investment Investigation Report": {
                "1. Overall Investigation": "narrow moat"
            },
            "Part 4: investment score": 57
        });
        let record = record_from_row(
            &row(&[
                ("company_name", "Acme Ltd"),
                ("report_details", &details.to_string()),
            ]),
            Origin::Remote,
        )
        .unwrap();

        assert_eq!(record.investment_score, Score::Available(57));
        let GovernanceSection::Structured(narrative) = record.governance else {
            panic!("expected structured governance");
        };
        assert_eq!(narrative.len(), 1);
        assert_eq!(narrative[0].0, "1. Future Forecast vs. Actuals");
        let RiskSection::Structured(detail) = record.risk else {
            panic!("expected structured risk");
        };
        assert_eq!(detail.overall_assessment, "low");
    }

    #[test]
    fn test_dedicated_column_wins_over_details() {
        let details = json!({
            "Part 2: Operational Risk and Business Quality Analysis": {
                "Overall Risk Assessment": "from details"
            }
        });
        let risk = json!({"Overall Risk Assessment": "from column"});
        let record = record_from_row(
            &row(&[
                ("company_name", "Acme Ltd"),
                ("report_details", &details.to_string()),
                ("risk", &risk.to_string()),
            ]),
            Origin::Remote,
        )
        .unwrap();

        let RiskSection::Structured(detail) = record.risk else {
            panic!("expected structured risk");
        };
        assert_eq!(detail.overall_assessment, "from column");
    }

    #[test]
    fn test_nested_governance_preserves_order() {
        let governance = json!({
            "First": "a",
            "Second": {"Inner A": "x", "Inner B": "y"},
            "Third": "c"
        });
        let record = record_from_row(
            &row(&[
                ("company_name", "Acme Ltd"),
                ("governance", &governance.to_string()),
            ]),
            Origin::Remote,
        )
        .unwrap();

        let GovernanceSection::Structured(narrative) = record.governance else {
            panic!("expected structured governance");
        };
        let titles: Vec<&str> = narrative.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
        match &narrative[1].1 {
            NarrativeNode::Nested(inner) => {
                assert_eq!(inner[0].0, "Inner A");
                assert_eq!(inner[1].0, "Inner B");
            }
            other => panic!("expected nested node, got {:?}", other),
        }
    }
}
