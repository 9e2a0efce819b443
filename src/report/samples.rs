//! Bundled sample reports.
//!
//! Two complete reports ship with the binary so the server is usable with no
//! remote source configured. They are stored in the combined-details row
//! layout and go through the same normalization path as remote rows, so the
//! samples double as a living fixture for the parser.

use tracing::warn;

use super::{parse, Origin, ReportRecord};
use crate::source::RawRow;

const NATCO_PHARMA: (&str, &str, &str) = (
    "Natco Pharma Ltd",
    "69",
    r#"{
  "Part 1: Corporate Governance and Management Credibility Assessment": {
    "1. Future Forecast vs. Actuals (Past 5 Years)": "Based on available information, management's revenue forecasts have landed within a reasonable band of actuals over the past five years.",
    "2. Management Guidance Analysis": {
      "Current Guidance": "Natco Pharma's current guidance emphasises complex generics and agrochemical diversification.",
      "Historical Comparison": {
        "Revenue": "In previous years, announced revenue targets were broadly met, with one miss during a patent-cliff year.",
        "Bottom Line": "Similar to revenue, bottom-line guidance has been conservative and usually exceeded.",
        "CapEx/Strategic Initiatives": "Natco Pharma has consistently announced and completed capacity expansions on schedule."
      },
      "Overall Credibility Assessment": "Overall, Natco Pharma's management has a credible guidance record."
    }
  },
  "Part 2: Operational Risk and Business Quality Analysis": {
    "summary_table": [
      {"Factor": "High Capex", "Assessment": "NO", "Data": "Most recent annual Capex around 6% of revenue", "Justification": "Capex is relatively low for a pharmaceutical manufacturer."},
      {"Factor": "High R&D", "Assessment": "YES", "Data": "Most recent annual R&D expense above 8% of revenue", "Justification": "R&D expense is significant and recurring."}
    ],
    "Overall Risk Assessment": "Natco Pharma presents a moderate risk profile dominated by product-concentration and regulatory exposure."
  },
  "Part 3: Holistic Investment Investigation Report": {
    "1. Overall Investigation (Li Lu Style)": "Natco Pharma is a vertically integrated generics player with episodic but high-margin launch economics.",
    "2. Business Model and Moat (Nick Sleep Style)": "Natco Pharma's business model relies on litigation-led first-to-file opportunities rather than a durable scale moat.",
    "3. Risks and Quality of Business (Charlie Munger Style)": "Key risks associated with Natco are regulatory actions, patent-cliff timing, and single-product dependence.",
    "4. Owner's Earnings and Margin of Safety (Warren Buffett Style)": {
      "Owner's Earnings and Margin of Safety Analysis": "Estimating Natco Pharma's owner's earnings requires normalising the lumpy launch-year windfalls.",
      "IRR Projections": {
        "Li Lu": "Bear: 5%, Base: 10%, Bull: 15%",
        "Nick Sleep": "Bear: 7%, Base: 12%, Bull: 18%",
        "Charlie Munger": "Bear: 3%, Base: 8%, Bull: 13%",
        "Warren Buffett": "Bear: 4%, Base: 9%, Bull: 14%"
      },
      "Fat Pitch Analysis": "A \"fat pitch\" would require a broad generics sell-off while the launch pipeline stays intact."
    },
    "5. 3-10 Year Hold Scenarios": "Bear Case (20% probability): Regulatory setbacks compress margins. Base Case (60%): Pipeline monetises steadily. Bull Case (20%): Two major launches land in the same cycle."
  }
}"#,
);

const IZMO: (&str, &str, &str) = (
    "IZMO Ltd",
    "25",
    r#"{
  "Part 1: Corporate Governance and Management Credibility Assessment": {
    "1. Future Forecast vs. Actuals (Past 5 Years)": "Analysis of past forecasts is limited by sparse disclosures.",
    "2. Management Guidance Analysis": {
      "Current Guidance": "Detailed management guidance is not regularly published.",
      "Historical Comparison": {
        "Revenue": "Comparison of past revenue statements against results is inconclusive.",
        "Bottom Line": "Comparison of past bottom-line commentary against results is inconclusive.",
        "CapEx/Strategic Initiatives": "Comparison of past CapEx announcements against execution is inconclusive."
      },
      "Overall Credibility Assessment": "Assessment of management's credibility is constrained by limited data."
    }
  },
  "Part 2: Operational Risk and Business Quality Analysis": {
    "summary_table": [
      {"Factor": "High Capex", "Assessment": "N/A", "Data": "Insufficient data", "Justification": "Unable to determine from available filings."},
      {"Factor": "High R&D", "Assessment": "N/A", "Data": "Insufficient data", "Justification": "Unable to determine from available filings."}
    ],
    "Overall Risk Assessment": "Based on the lack of disclosed operating detail, the risk profile cannot be graded with confidence."
  },
  "Part 3: Holistic Investment Investigation Report": {
    "1. Overall Investigation (Li Lu Style)": "A comprehensive investigation is limited by the company's thin public record.",
    "2. Business Model and Moat (Nick Sleep Style)": "Analyzing IZMO Ltd's interactive automotive media niche suggests a narrow, contested moat.",
    "3. Risks and Quality of Business (Charlie Munger Style)": "Assessing the risks is dominated by customer concentration and small scale.",
    "4. Owner's Earnings and Margin of Safety (Warren Buffett Style)": {
      "Owner's Earnings and Margin of Safety Analysis": "Calculating IZMO Ltd's owner's earnings is not reliable on current disclosures.",
      "IRR Projections": {
        "Li Lu": "Unable to project IRR with available data.",
        "Nick Sleep": "Unable to project IRR with available data.",
        "Charlie Munger": "Unable to project IRR with available data.",
        "Warren Buffett": "Unable to project IRR with available data."
      },
      "Fat Pitch Analysis": "Identifying fat-pitch conditions would require materially better disclosure."
    },
    "5. 3-10 Year Hold Scenarios": "Developing bear, base, and bull hold scenarios is deferred until operating data improves."
  }
}"#,
);

/// Build the bundled sample records through the normal parsing path.
pub fn sample_records() -> Vec<ReportRecord> {
    [NATCO_PHARMA, IZMO]
        .iter()
        .filter_map(|(name, score, details)| {
            let row: RawRow = [
                ("company_name".to_string(), name.to_string()),
                ("investment_score".to_string(), score.to_string()),
                ("report_details".to_string(), details.to_string()),
            ]
            .into_iter()
            .collect();

            let record = parse::record_from_row(&row, Origin::Bundled);
            if record.is_none() {
                // A sample that fails its own parser is a packaging bug
                warn!(company = %name, "Bundled sample failed to parse");
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{InvestigationSection, RiskSection, Score};

    #[test]
    fn test_samples_parse_completely() {
        let records = sample_records();
        assert_eq!(records.len(), 2);

        let natco = &records[0];
        assert_eq!(natco.company_name, "Natco Pharma Ltd");
        assert_eq!(natco.investment_score, Score::Available(69));
        assert_eq!(natco.origin, Origin::Bundled);

        let RiskSection::Structured(risk) = &natco.risk else {
            panic!("sample risk should be structured");
        };
        assert_eq!(risk.summary_table.len(), 2);

        let InvestigationSection::Structured(investigation) = &natco.investigation else {
            panic!("sample investigation should be structured");
        };
        let owners = investigation
            .owners_earnings
            .as_ref()
            .expect("owner's earnings");
        assert_eq!(owners.irr_projections.len(), 4);
        assert!(investigation.hold_scenarios.is_some());
    }

    #[test]
    fn test_izmo_sample_keeps_na_assessments() {
        let records = sample_records();
        let izmo = &records[1];
        assert_eq!(izmo.company_name, "IZMO Ltd");
        assert_eq!(izmo.investment_score, Score::Available(25));

        let RiskSection::Structured(risk) = &izmo.risk else {
            panic!("sample risk should be structured");
        };
        assert!(risk
            .summary_table
            .iter()
            .all(|row| row.assessment == crate::report::Assessment::NotApplicable));
    }
}
