mod analyzer;
mod audit;
mod cli;
mod config;
mod llm;
mod patch;
mod render;
mod session;
mod source;
mod types;

use clap::Parser;
use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_new(&cli.log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Init(args) => {
            if let Err(e) = Config::write_default(&args.config, args.r#override) {
                eprintln!("Failed to write config: {}", e);
                std::process::exit(1);
            }
            println!("Wrote {}", args.config);
        }
        Commands::Audit(args) => {
            let config = Config::load(&args.config).unwrap_or_else(|e| {
                eprintln!("Failed to load config: {}", e);
                std::process::exit(1);
            });

            if let Err(e) = audit::run(args, &config).await {
                eprintln!("Audit failed: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Examples => {
            for (name, text) in source::EXAMPLE_CONTRACTS {
                let headline = text
                    .lines()
                    .find(|line| line.starts_with("contract "))
                    .unwrap_or("")
                    .trim_end_matches(" {");
                println!("{:<12} {}", name, headline);
            }
        }
    }
}
