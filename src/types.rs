use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Severity of a reported vulnerability. The analyzer contract allows
/// exactly these four values; anything else fails deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        };
        f.write_str(label)
    }
}

/// A single vulnerability finding with contract location and suggested fix
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    /// Unique id within one audit run, assigned by the analyzer
    pub id: u32,
    /// Short vulnerability class, e.g. "Reentrancy"
    #[serde(rename = "type")]
    pub category: String,
    /// Severity level
    pub severity: Severity,
    /// Impact and how the suggested fix resolves it
    pub description: String,
    /// Start line (1-indexed) into the analyzed source
    pub line_start: u32,
    /// End line (inclusive)
    pub line_end: u32,
    /// The exact block the range covers, as the analyzer saw it
    pub original_code: String,
    /// Drop-in replacement for the range; may span a different line count
    pub suggested_code: String,
}

/// Invariant violations in an analyzer response. The whole response is
/// rejected on the first violation; there is no per-entry recovery.
#[derive(Debug, thiserror::Error)]
pub enum FindingError {
    #[error("duplicate finding id {0}")]
    DuplicateId(u32),
    #[error("finding {id}: invalid line range {start}-{end}")]
    InvalidRange { id: u32, start: u32, end: u32 },
    #[error("finding {id}: line {end} is past the end of the source ({line_count} lines)")]
    OutOfBounds { id: u32, end: u32, line_count: usize },
}

/// Check analyzer findings against the schema invariants: ids unique,
/// ranges 1-based, ordered, and inside the analyzed text.
pub fn validate_findings(
    findings: &[Vulnerability],
    line_count: usize,
) -> Result<(), FindingError> {
    let mut seen = std::collections::BTreeSet::new();
    for finding in findings {
        if !seen.insert(finding.id) {
            return Err(FindingError::DuplicateId(finding.id));
        }
        if finding.line_start == 0 || finding.line_start > finding.line_end {
            return Err(FindingError::InvalidRange {
                id: finding.id,
                start: finding.line_start,
                end: finding.line_end,
            });
        }
        if finding.line_end as usize > line_count {
            return Err(FindingError::OutOfBounds {
                id: finding.id,
                end: finding.line_end,
                line_count,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(id: u32, start: u32, end: u32) -> Vulnerability {
        Vulnerability {
            id,
            category: "Reentrancy".into(),
            severity: Severity::High,
            description: "test".into(),
            line_start: start,
            line_end: end,
            original_code: String::new(),
            suggested_code: String::new(),
        }
    }

    #[test]
    fn test_severity_rejects_unknown_value() {
        let result: Result<Severity, _> = serde_json::from_str("\"Informational\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_vulnerability_wire_names() {
        let json = r#"{
            "id": 1,
            "type": "Reentrancy",
            "severity": "Critical",
            "description": "state written after external call",
            "lineStart": 12,
            "lineEnd": 17,
            "originalCode": "old",
            "suggestedCode": "new"
        }"#;
        let v: Vulnerability = serde_json::from_str(json).unwrap();
        assert_eq!(v.category, "Reentrancy");
        assert_eq!(v.severity, Severity::Critical);
        assert_eq!(v.line_start, 12);
        assert_eq!(v.line_end, 17);
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        let findings = vec![finding(1, 1, 3), finding(2, 5, 5)];
        assert!(validate_findings(&findings, 10).is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_id() {
        let findings = vec![finding(1, 1, 2), finding(1, 4, 5)];
        assert!(matches!(
            validate_findings(&findings, 10),
            Err(FindingError::DuplicateId(1))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_start() {
        let findings = vec![finding(1, 0, 2)];
        assert!(matches!(
            validate_findings(&findings, 10),
            Err(FindingError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let findings = vec![finding(1, 5, 2)];
        assert!(matches!(
            validate_findings(&findings, 10),
            Err(FindingError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_range_past_eof() {
        let findings = vec![finding(1, 9, 11)];
        assert!(matches!(
            validate_findings(&findings, 10),
            Err(FindingError::OutOfBounds { .. })
        ));
    }
}
