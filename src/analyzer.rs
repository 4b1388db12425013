use anyhow::Context;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::llm::OpenAIProvider;
use crate::types::{Vulnerability, validate_findings};

const SYSTEM_PROMPT: &str = "You are a world-class security expert specializing in Solidity \
smart contract auditing. Your sole purpose is to identify vulnerabilities and provide minimal, \
correct code patches. You must adhere strictly to the requested JSON output format.";

/// Inspects contract source and returns vulnerability findings.
///
/// Implementations either fully succeed with a well-formed (possibly empty)
/// findings list or fully fail; there is no partial result.
#[async_trait]
pub trait Analyzer {
    async fn analyze(&self, source: &str) -> anyhow::Result<Vec<Vulnerability>>;
}

/// Analyzer backed by an OpenAI-compatible chat endpoint
pub struct LlmAnalyzer {
    provider: OpenAIProvider,
}

impl LlmAnalyzer {
    pub fn new(provider: OpenAIProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Analyzer for LlmAnalyzer {
    async fn analyze(&self, source: &str) -> anyhow::Result<Vec<Vulnerability>> {
        let prompt = build_prompt(source);
        debug!("Audit prompt is {} chars", prompt.len());

        let reply = self.provider.complete(SYSTEM_PROMPT, &prompt).await?;
        let findings = parse_findings(&reply, source.split('\n').count())?;
        info!("Analyzer returned {} findings", findings.len());
        Ok(findings)
    }
}

/// Assemble the audit prompt: instructions, the JSON schema of a finding,
/// and the fenced contract source
fn build_prompt(source: &str) -> String {
    let schema = schemars::schema_for!(Vulnerability);
    let schema_json =
        serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string());

    format!(
        "Your task is to analyze the provided Solidity code for vulnerabilities and suggest \
precise, minimal fixes.\n\n\
**Analysis Instructions:**\n\
1. Thoroughly audit the contract for common vulnerabilities including, but not limited to: \
Reentrancy, Integer Overflow/Underflow, Unchecked External Calls, Denial of Service (DoS), \
Gas Limit Issues, Incorrect Visibility Modifiers, and Timestamp Dependence.\n\
2. Respond with a JSON array containing one object per vulnerability found.\n\
3. If no vulnerabilities are found, you MUST return an empty JSON array: [].\n\
4. Respond with the raw JSON array only, no surrounding prose or markdown.\n\n\
**Finding requirements:**\n\
- `id` is a unique integer starting from 1.\n\
- `severity` must be one of: \"Critical\", \"High\", \"Medium\", \"Low\".\n\
- `lineStart`/`lineEnd` are 1-based line numbers into the provided source.\n\
- `originalCode` is the exact, unmodified block of vulnerable code.\n\
- `suggestedCode` is a minimal, drop-in replacement for that block. DO NOT add new \
functions, state variables, or invent new logic. The fix must be targeted and precise.\n\n\
Each object must conform to this JSON schema:\n{schema_json}\n\n\
Here is the contract code:\n```solidity\n{source}\n```\n"
    )
}

/// Parse and validate an analyzer reply. Any malformed reply, schema
/// violation, or invariant violation rejects the whole response.
fn parse_findings(reply: &str, line_count: usize) -> anyhow::Result<Vec<Vulnerability>> {
    let json = strip_code_fences(reply);
    let findings: Vec<Vulnerability> =
        serde_json::from_str(json).context("analyzer reply is not a valid findings array")?;
    validate_findings(&findings, line_count)
        .context("analyzer reply violates the findings schema")?;
    Ok(findings)
}

/// Models often wrap JSON in a markdown fence despite instructions;
/// strip one outer fence if present
fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some((_, body)) = rest.split_once('\n') else {
        return trimmed;
    };
    match body.trim_end().strip_suffix("```") {
        Some(inner) => inner.trim_end(),
        None => trimmed,
    }
}
