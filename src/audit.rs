use std::io::Read;

use tracing::info;

use crate::analyzer::LlmAnalyzer;
use crate::cli::AuditArgs;
use crate::config::Config;
use crate::llm::OpenAIProvider;
use crate::render;
use crate::session::{AuditSession, AuditState};
use crate::source::{ExampleResolver, SourceSelector};

/// Run one full audit from the command line: resolve the contract source,
/// analyze it, print the report, splice in the selected fixes.
pub async fn run(args: &AuditArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let selector = selector_from_args(args)?;

    let provider = OpenAIProvider::new(
        config.llm.base_url.clone(),
        args.api_key.clone(),
        config.llm.model.clone(),
        config.llm.temperature,
        config.llm.max_tokens,
        config.llm.headers.clone(),
    );
    let analyzer = LlmAnalyzer::new(provider);

    let mut session = AuditSession::new();
    session
        .start_audit(&selector, &ExampleResolver, &analyzer)
        .await?;

    if session.state() == AuditState::Error {
        let message = session
            .error_message()
            .unwrap_or("audit failed")
            .to_string();
        return Err(message.into());
    }

    println!("{}", render::format_report(session.findings()));
    if let Some(path) = &args.report {
        render::write_report(path, session.findings())?;
    }

    let ids: Vec<u32> = if args.select_all {
        session.findings().iter().map(|f| f.id).collect()
    } else if let Some(select) = &args.select {
        parse_selection(select)?
    } else {
        vec![]
    };
    for id in &ids {
        session.toggle_selection(*id)?;
    }

    let patched = session.apply_patches()?.to_string();
    match &args.output {
        Some(path) => {
            std::fs::write(path, &patched)?;
            info!("Patched contract written to {}", path);
        }
        None if ids.is_empty() => {
            info!("No fixes selected; the patched contract equals the input");
        }
        None => println!("\n{patched}"),
    }

    Ok(())
}

/// Map the CLI arguments to a source selector, reading files and stdin here
/// so the session only ever sees text
fn selector_from_args(args: &AuditArgs) -> Result<SourceSelector, Box<dyn std::error::Error>> {
    if let Some(example) = &args.example {
        return Ok(SourceSelector::Example(example.clone()));
    }
    match args.source.as_deref() {
        Some("-") => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(SourceSelector::Literal(text))
        }
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {}", path, e))?;
            Ok(SourceSelector::Literal(text))
        }
        None => Err("provide a contract source file ('-' for stdin) or --example".into()),
    }
}

/// Parse a comma-separated id list such as "1,3"
fn parse_selection(select: &str) -> Result<Vec<u32>, Box<dyn std::error::Error>> {
    select
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u32>()
                .map_err(|_| format!("invalid finding id: {}", part).into())
        })
        .collect()
}
