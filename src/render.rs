use crate::types::Vulnerability;
use tracing::info;

/// Format the findings of one audit run as Markdown
pub fn format_report(findings: &[Vulnerability]) -> String {
    if findings.is_empty() {
        return "# Audit Report\n\nNo vulnerabilities found. The analyzer did not find any \
common vulnerabilities in this contract."
            .to_string();
    }

    let mut output = String::from("# Audit Report\n\n");
    for finding in findings {
        output.push_str(&format!(
            "## {}. {} [{}] (lines {}-{})\n\n",
            finding.id, finding.category, finding.severity, finding.line_start, finding.line_end
        ));
        output.push_str(&format!("{}\n\n", finding.description.trim()));
        output.push_str(&format_diff(&finding.original_code, &finding.suggested_code));
        output.push('\n');
    }
    output.trim_end().to_string()
}

/// Render original vs suggested code as a fenced -/+ diff block
fn format_diff(original: &str, suggested: &str) -> String {
    let mut body = String::new();
    for line in original.split('\n') {
        body.push_str(&format!("- {}\n", line));
    }
    for line in suggested.split('\n') {
        body.push_str(&format!("+ {}\n", line));
    }

    let backticks = get_fence_backticks(&body);
    format!("{}diff\n{}{}\n", backticks, body, backticks)
}

/// Write findings to a report file, format chosen by extension
pub fn write_report(path: &str, findings: &[Vulnerability]) -> anyhow::Result<()> {
    let content = if path.ends_with(".json") {
        serde_json::to_string_pretty(findings)?
    } else if path.ends_with(".md") {
        format_report(findings)
    } else {
        anyhow::bail!("report file must end with .md or .json");
    };

    std::fs::write(path, content)?;
    info!("Report written to {}", path);
    Ok(())
}

/// Get appropriate number of backticks for Markdown code fence
/// Returns at least 3 backticks, or more if content contains backtick sequences
fn get_fence_backticks(content: &str) -> String {
    const MIN_BACKTICKS: usize = 3;
    let max_backticks = content
        .as_bytes()
        .split(|&b| b != b'`')
        .filter(|s| !s.is_empty())
        .map(|s| s.len())
        .max()
        .unwrap_or(0);
    "`".repeat((max_backticks + 1).max(MIN_BACKTICKS))
}
