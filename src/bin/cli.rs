//! PerkDeck Check CLI
//! Diagnostic interface for the trust and update subsystem.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use perkdeck_core::attestation::platform_token_source;
use perkdeck_core::{
    AttestationVerifier, CoreConfig, FilePrefs, TokenProvider, UpdateDecision, UpdateEngine,
};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "perkdeck-check")]
#[command(author = "PerkDeck Team")]
#[command(version)]
#[command(about = "Device trust and update diagnostics", long_about = None)]
struct Cli {
    /// Output format (json for scripting)
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check the release index for a newer version
    Check {
        /// Bypass the 24h throttle window
        #[arg(long)]
        force: bool,
    },

    /// Run the attestation flow and report the session verdict
    Attest,

    /// Suppress future prompts for a specific release tag
    Dismiss {
        /// Exact release tag, e.g. v1.2.0
        tag: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = CoreConfig::default();
    let prefs = Arc::new(FilePrefs::default_location()?);

    match cli.command {
        Commands::Check { force } => {
            let engine = UpdateEngine::new(cfg, prefs);
            let decision = engine.check_for_updates(force).await;
            match cli.format {
                OutputFormat::Json => {
                    let outcome = match &decision {
                        UpdateDecision::UpdateAvailable {
                            version,
                            download_url,
                        } => serde_json::json!({
                            "has_update": true,
                            "latest_version": version,
                            "download_url": download_url,
                        }),
                        UpdateDecision::NoUpdate => serde_json::json!({ "has_update": false }),
                    };
                    println!("{}", serde_json::to_string_pretty(&outcome)?);
                }
                OutputFormat::Text => match decision {
                    UpdateDecision::UpdateAvailable {
                        version,
                        download_url,
                    } => {
                        println!("{} {}", "Update available:".green().bold(), version);
                        println!("  download: {}", download_url);
                    }
                    UpdateDecision::NoUpdate => {
                        println!("{}", "No update available.".dimmed());
                    }
                },
            }
        }

        Commands::Attest => {
            let degrade_on_error = cfg.degrade_on_error;
            let token_provider =
                TokenProvider::new(platform_token_source(), cfg.cloud_project_id);
            let verifier = AttestationVerifier::new(cfg, token_provider);
            let result = verifier.verify().await;
            let genuine = match &result.error {
                Some(_) => degrade_on_error,
                None => result.valid,
            };
            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                OutputFormat::Text => {
                    if genuine {
                        println!("{}", "Environment verdict: genuine".green().bold());
                    } else {
                        println!("{}", "Environment verdict: not genuine".red().bold());
                    }
                    if let Some(error) = &result.error {
                        println!("  degraded: {}", error.yellow());
                    }
                    for verdict in &result.device_integrity_verdicts {
                        println!("  device: {}", verdict);
                    }
                    if let Some(app) = &result.app_integrity_verdict {
                        println!("  app: {}", app);
                    }
                }
            }
        }

        Commands::Dismiss { tag } => {
            let engine = UpdateEngine::new(cfg, prefs);
            engine.tracker().dismiss(&tag);
            println!("Dismissed {}", tag.bold());
        }
    }

    Ok(())
}
