use crate::types::Vulnerability;
use std::collections::BTreeSet;
use tracing::debug;

/// Splice the selected suggested fixes into the original source.
///
/// Replacements are applied in descending `line_start` order so that an
/// upper edit never shifts the line numbers a lower edit still refers to.
/// The sort is stable: findings sharing a start line keep analyzer order.
/// Overlapping selected ranges are not reconciled; the bottom-most range
/// is spliced first and the result is best-effort.
///
/// An empty `suggested_code` deletes the range outright. Line numbers are
/// clamped to the text, so a malformed range degrades to a bad splice
/// rather than a panic (ranges are validated at the analyzer boundary).
pub fn apply_patches(
    original: &str,
    findings: &[Vulnerability],
    selected: &BTreeSet<u32>,
) -> String {
    let mut to_apply: Vec<&Vulnerability> = findings
        .iter()
        .filter(|f| selected.contains(&f.id))
        .collect();
    if to_apply.is_empty() {
        return original.to_string();
    }
    to_apply.sort_by(|a, b| b.line_start.cmp(&a.line_start));

    let mut lines: Vec<&str> = original.split('\n').collect();
    for finding in to_apply {
        // 1-based inclusive range to 0-based half-open, clamped to the text
        let end = (finding.line_end as usize).min(lines.len());
        let start = (finding.line_start as usize).saturating_sub(1).min(end);
        debug!(
            "Splicing finding {} over lines {}-{}",
            finding.id, finding.line_start, finding.line_end
        );
        let replacement: Vec<&str> = if finding.suggested_code.is_empty() {
            Vec::new()
        } else {
            finding.suggested_code.split('\n').collect()
        };
        lines.splice(start..end, replacement);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    fn finding(id: u32, start: u32, end: u32, suggested: &str) -> Vulnerability {
        Vulnerability {
            id,
            category: "Reentrancy".into(),
            severity: Severity::High,
            description: "test finding".into(),
            line_start: start,
            line_end: end,
            original_code: String::new(),
            suggested_code: suggested.into(),
        }
    }

    fn ids(values: &[u32]) -> BTreeSet<u32> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_empty_selection_is_identity() {
        let original = "A\nB\nC";
        let findings = vec![finding(1, 1, 2, "X")];
        assert_eq!(apply_patches(original, &findings, &ids(&[])), original);
    }

    #[test]
    fn test_single_finding_splice() {
        let original = "A\nB\nC\nD\nE";
        let findings = vec![finding(1, 2, 3, "X\nY\nZ")];
        assert_eq!(
            apply_patches(original, &findings, &ids(&[1])),
            "A\nX\nY\nZ\nE"
        );
    }

    #[test]
    fn test_unselected_findings_are_ignored() {
        let original = "A\nB\nC\nD\nE";
        let findings = vec![finding(1, 1, 1, "top"), finding(2, 5, 5, "bottom")];
        assert_eq!(
            apply_patches(original, &findings, &ids(&[2])),
            "A\nB\nC\nD\nbottom"
        );
    }

    #[test]
    fn test_lower_edit_does_not_shift_upper_range() {
        // Disjoint ranges with different replacement lengths: the edit at
        // lines 8-9 lands first, so lines 2-3 still mean the same text.
        let original = "l1\nl2\nl3\nl4\nl5\nl6\nl7\nl8\nl9\nl10";
        let findings = vec![
            finding(1, 2, 3, "upper"),
            finding(2, 8, 9, "low1\nlow2\nlow3"),
        ];
        let expected = "l1\nupper\nl4\nl5\nl6\nl7\nlow1\nlow2\nlow3\nl10";
        assert_eq!(apply_patches(original, &findings, &ids(&[1, 2])), expected);
    }

    #[test]
    fn test_result_independent_of_finding_order() {
        let original = "l1\nl2\nl3\nl4\nl5\nl6\nl7\nl8\nl9\nl10";
        let forward = vec![finding(1, 2, 3, "upper"), finding(2, 8, 9, "lower")];
        let reversed = vec![finding(2, 8, 9, "lower"), finding(1, 2, 3, "upper")];
        assert_eq!(
            apply_patches(original, &forward, &ids(&[1, 2])),
            apply_patches(original, &reversed, &ids(&[1, 2]))
        );
    }

    #[test]
    fn test_empty_replacement_deletes_range() {
        let original = "A\nB\nC\nD";
        let findings = vec![finding(1, 2, 3, "")];
        assert_eq!(apply_patches(original, &findings, &ids(&[1])), "A\nD");
    }

    #[test]
    fn test_replacement_may_expand() {
        let original = "A\nB";
        let findings = vec![finding(1, 2, 2, "B1\nB2\nB3")];
        assert_eq!(apply_patches(original, &findings, &ids(&[1])), "A\nB1\nB2\nB3");
    }

    #[test]
    fn test_full_file_replacement() {
        let original = "A\nB\nC";
        let findings = vec![finding(1, 1, 3, "rewritten")];
        assert_eq!(apply_patches(original, &findings, &ids(&[1])), "rewritten");
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let original = "A\nB";
        let findings = vec![finding(1, 2, 9, "X")];
        assert_eq!(apply_patches(original, &findings, &ids(&[1])), "A\nX");
    }

    #[test]
    fn test_adjacent_ranges() {
        let original = "A\nB\nC\nD";
        let findings = vec![finding(1, 1, 2, "ab"), finding(2, 3, 4, "cd")];
        assert_eq!(apply_patches(original, &findings, &ids(&[1, 2])), "ab\ncd");
    }
}
