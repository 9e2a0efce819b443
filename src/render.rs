//! Report presenter.
//!
//! [`render`] projects a [`ReportRecord`] into a serializable view tree the
//! client can lay out however it likes. It is a pure function: the same
//! record always yields the same blocks, the three sections always appear
//! in the same fixed order, and missing or degraded content renders as
//! fewer blocks, never as an error.

use serde::{Deserialize, Serialize};

use crate::report::{
    GovernanceSection, InvestigationSection, Narrative, NarrativeNode, ReportRecord, RiskSection,
};

/// Rendered view of one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportView {
    /// Company the report is about.
    pub company_name: String,
    /// Display string of the overall investment score ("N/A" when absent).
    pub investment_score: String,
    /// The three report sections, in fixed order.
    pub sections: Vec<SectionView>,
}

/// One rendered section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionView {
    /// Section title.
    pub title: String,
    /// Ordered content blocks; empty when the source had nothing here.
    pub blocks: Vec<ViewBlock>,
}

/// One renderable content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewBlock {
    /// A subsection heading; `level` starts at 1 inside a section.
    Heading { level: u8, text: String },
    /// Free narrative text.
    Paragraph { text: String },
    /// A rectangular table.
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

const GOVERNANCE_TITLE: &str = "Part 1: Corporate Governance and Management Credibility Assessment";
const RISK_TITLE: &str = "Part 2: Operational Risk and Business Quality Analysis";
const INVESTIGATION_TITLE: &str = "Part 3: Holistic Investment Investigation Report";

/// Render a record into its view tree.
pub fn render(record: &ReportRecord) -> ReportView {
    ReportView {
        company_name: record.company_name.clone(),
        investment_score: record.investment_score.to_string(),
        sections: vec![
            render_governance(&record.governance),
            render_risk(&record.risk),
            render_investigation(&record.investigation),
        ],
    }
}

fn render_governance(section: &GovernanceSection) -> SectionView {
    let blocks = match section {
        GovernanceSection::Structured(narrative) => narrative_blocks(narrative, 1),
        GovernanceSection::Raw(text) => raw_blocks(text),
    };
    SectionView {
        title: GOVERNANCE_TITLE.to_string(),
        blocks,
    }
}

fn render_risk(section: &RiskSection) -> SectionView {
    let mut blocks = Vec::new();
    match section {
        RiskSection::Structured(detail) => {
            if !detail.summary_table.is_empty() {
                blocks.push(ViewBlock::Heading {
                    level: 1,
                    text: "Summary Table".to_string(),
                });
                blocks.push(ViewBlock::Table {
                    headers: ["Factor", "Assessment", "Data", "Justification"]
                        .iter()
                        .map(|h| h.to_string())
                        .collect(),
                    rows: detail
                        .summary_table
                        .iter()
                        .map(|row| {
                            vec![
                                row.factor.clone(),
                                row.assessment.to_string(),
                                row.data.clone(),
                                row.justification.clone(),
                            ]
                        })
                        .collect(),
                });
            }
            if !detail.overall_assessment.is_empty() {
                blocks.push(ViewBlock::Heading {
                    level: 1,
                    text: "Overall Risk Assessment".to_string(),
                });
                blocks.push(ViewBlock::Paragraph {
                    text: detail.overall_assessment.clone(),
                });
            }
        }
        RiskSection::Raw(text) => blocks = raw_blocks(text),
    }
    SectionView {
        title: RISK_TITLE.to_string(),
        blocks,
    }
}

fn render_investigation(section: &InvestigationSection) -> SectionView {
    let mut blocks = Vec::new();
    match section {
        InvestigationSection::Structured(detail) => {
            blocks.extend(narrative_blocks(&detail.narrative, 1));

            if let Some(owners) = &detail.owners_earnings {
                blocks.push(ViewBlock::Heading {
                    level: 1,
                    text: owners.title.clone(),
                });
                blocks.extend(narrative_blocks(&owners.narrative, 2));
                if !owners.irr_projections.is_empty() {
                    blocks.push(ViewBlock::Heading {
                        level: 2,
                        text: "IRR Projections".to_string(),
                    });
                    blocks.push(ViewBlock::Table {
                        headers: vec!["Investment Style".to_string(), "Scenario".to_string()],
                        rows: owners
                            .irr_projections
                            .iter()
                            .map(|p| vec![p.style.clone(), p.scenario.clone()])
                            .collect(),
                    });
                }
            }

            if let Some(hold) = &detail.hold_scenarios {
                blocks.push(ViewBlock::Heading {
                    level: 1,
                    text: hold.title.clone(),
                });
                blocks.push(ViewBlock::Paragraph {
                    text: hold.text.clone(),
                });
            }
        }
        InvestigationSection::Raw(text) => blocks = raw_blocks(text),
    }
    SectionView {
        title: INVESTIGATION_TITLE.to_string(),
        blocks,
    }
}

/// Walk a narrative in order: heading per title, paragraph per text node,
/// recursion one level deeper per nested group.
fn narrative_blocks(narrative: &Narrative, level: u8) -> Vec<ViewBlock> {
    let mut blocks = Vec::new();
    for (title, node) in narrative {
        blocks.push(ViewBlock::Heading {
            level,
            text: title.clone(),
        });
        match node {
            NarrativeNode::Text(text) => blocks.push(ViewBlock::Paragraph { text: text.clone() }),
            NarrativeNode::Nested(inner) => {
                blocks.extend(narrative_blocks(inner, level.saturating_add(1)))
            }
        }
    }
    blocks
}

/// A degraded section renders as one paragraph; an empty one as nothing.
fn raw_blocks(text: &str) -> Vec<ViewBlock> {
    if text.trim().is_empty() {
        Vec::new()
    } else {
        vec![ViewBlock::Paragraph {
            text: text.to_string(),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{
        Assessment, GovernanceSection, HoldScenarios, InvestigationDetail, InvestigationSection,
        IrrProjection, Origin, OwnersEarnings, ReportRecord, RiskDetail, RiskRow, RiskSection,
        Score,
    };
    use chrono::Utc;

    fn full_record() -> ReportRecord {
        ReportRecord {
            company_name: "Acme Ltd".to_string(),
            investment_score: Score::Available(69),
            governance: GovernanceSection::Structured(vec![(
                "1. Future Forecast vs. Actuals".to_string(),
                NarrativeNode::Text("on track".to_string()),
            )]),
            risk: RiskSection::Structured(RiskDetail {
                summary_table: vec![RiskRow {
                    factor: "High Capex".to_string(),
                    assessment: Assessment::No,
                    data: "6% of revenue".to_string(),
                    justification: "low".to_string(),
                }],
                overall_assessment: "moderate".to_string(),
            }),
            investigation: InvestigationSection::Structured(InvestigationDetail {
                narrative: vec![(
                    "1. Overall Investigation".to_string(),
                    NarrativeNode::Text("narrow moat".to_string()),
                )],
                owners_earnings: Some(OwnersEarnings {
                    title: "4. Owner's Earnings".to_string(),
                    narrative: vec![(
                        "Analysis".to_string(),
                        NarrativeNode::Text("normalised".to_string()),
                    )],
                    irr_projections: vec![IrrProjection {
                        style: "Warren Buffett".to_string(),
                        scenario: "Bear: 4%, Base: 9%, Bull: 14%".to_string(),
                    }],
                }),
                hold_scenarios: Some(HoldScenarios {
                    title: "5. 3-10 Year Hold Scenarios".to_string(),
                    text: "Base Case: steady".to_string(),
                }),
            }),
            origin: Origin::Bundled,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let view = render(&full_record());
        assert_eq!(view.company_name, "Acme Ltd");
        assert_eq!(view.investment_score, "69");
        let titles: Vec<&str> = view.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec![GOVERNANCE_TITLE, RISK_TITLE, INVESTIGATION_TITLE]);
    }

    #[test]
    fn test_render_is_deterministic() {
        let record = full_record();
        assert_eq!(render(&record), render(&record));
    }

    #[test]
    fn test_risk_table_has_four_columns() {
        let view = render(&full_record());
        let risk = &view.sections[1];
        let table = risk
            .blocks
            .iter()
            .find_map(|b| match b {
                ViewBlock::Table { headers, rows } => Some((headers, rows)),
                _ => None,
            })
            .expect("risk table");
        assert_eq!(
            table.0,
            &vec!["Factor", "Assessment", "Data", "Justification"]
        );
        assert_eq!(table.1[0][1], "NO");
    }

    #[test]
    fn test_irr_projections_render_two_column_table() {
        let view = render(&full_record());
        let investigation = &view.sections[2];
        let table = investigation
            .blocks
            .iter()
            .find_map(|b| match b {
                ViewBlock::Table { headers, rows } => Some((headers, rows)),
                _ => None,
            })
            .expect("IRR table");
        assert_eq!(table.0, &vec!["Investment Style", "Scenario"]);
        assert_eq!(
            table.1,
            &vec![vec![
                "Warren Buffett".to_string(),
                "Bear: 4%, Base: 9%, Bull: 14%".to_string()
            ]]
        );
    }

    #[test]
    fn test_hold_scenarios_heading_keeps_source_title() {
        let view = render(&full_record());
        let investigation = &view.sections[2];
        let heading = investigation
            .blocks
            .iter()
            .filter_map(|b| match b {
                ViewBlock::Heading { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .find(|t| t.contains("Hold Scenarios"))
            .expect("hold scenarios heading");
        assert_eq!(heading, "5. 3-10 Year Hold Scenarios");
    }

    #[test]
    fn test_raw_section_renders_single_paragraph() {
        let mut record = full_record();
        record.risk = RiskSection::Raw("could not parse".to_string());
        let view = render(&record);
        assert_eq!(
            view.sections[1].blocks,
            vec![ViewBlock::Paragraph {
                text: "could not parse".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_sections_render_no_blocks() {
        let mut record = full_record();
        record.governance = GovernanceSection::Structured(Vec::new());
        record.risk = RiskSection::Raw(String::new());
        let view = render(&record);
        assert!(view.sections[0].blocks.is_empty());
        assert!(view.sections[1].blocks.is_empty());
        // The section titles still appear, in order
        assert_eq!(view.sections.len(), 3);
    }

    #[test]
    fn test_unavailable_score_renders_na() {
        let mut record = full_record();
        record.investment_score = Score::Unavailable;
        assert_eq!(render(&record).investment_score, "N/A");
    }
}
