mod config;
mod dedup;
mod diagnostics;
mod normalize;
mod output;
mod record;
mod template;
#[cfg(test)]
mod test_support;
mod transcript;

use anyhow::Context;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Config, Environment};
use crate::diagnostics::RecordWarning;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "conversation-transcript-dedup",
    about = "Keep the most complete snapshot of each chat conversation in a log dump"
)]
struct Args {
    /// JSON array of {instruction, input, response} records
    #[structopt(default_value = "kuru.json")]
    input: PathBuf,

    /// Path to a TOML configuration file
    #[structopt(short = "c", long)]
    config: Option<PathBuf>,

    /// Do not pause after printing warnings
    #[structopt(long)]
    no_pause: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time(),
        )
        .init();

    let args = Args::from_args();
    let environment = Environment::from_env()?;
    let config = Config::load(args.config.as_deref())
        .await?
        .with_environment(&environment)
        .with_pause_disabled(args.no_pause);

    tracing::info!("Processing {}", args.input.display());

    let data = tokio::fs::read(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let records = record::load_records(&data)?;

    let deduplicated = dedup::deduplicate(records, &config.dedup);
    report(&deduplicated.warnings, &config).await;
    tracing::info!(
        "Discarded {} partial transcripts",
        deduplicated.discarded
    );

    let (normalized, warnings) = normalize::normalize_all(deduplicated.records);
    report(&warnings, &config).await;

    for (index, normalized) in normalized.iter().enumerate() {
        let number = index + 1;
        if let Some(cast) = &normalized.cast {
            if normalized.substitutions > 0 {
                tracing::info!(
                    "{} instances of 'assistant' replaced with {} in conversation {number} (chat with {})",
                    normalized.substitutions,
                    cast.character,
                    cast.partner
                );
            }
        }
        for (label, count) in transcript::label_counts(&normalized.record.context) {
            tracing::debug!("conversation {number}: {label}: {count} times");
        }

        let file_path = output::output_path(&args.input, number);
        output::write_record(&file_path, &normalized.record)
            .await
            .with_context(|| format!("Failed to save {}", file_path.display()))?;
        tracing::info!("Saved to {}", file_path.display());
    }

    tracing::info!("Done processing {}", args.input.display());

    Ok(())
}

/// Prints warnings and holds the console briefly so an operator notices them.
async fn report(warnings: &[RecordWarning], config: &Config) {
    if warnings.is_empty() {
        return;
    }
    for warning in warnings {
        tracing::warn!("{warning}");
    }
    tokio::time::sleep(config.warning_pause()).await;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_args_defaults() {
        let actual = Args::from_iter(["conversation-transcript-dedup"]);
        assert_eq!(actual.input, PathBuf::from("kuru.json"));
        assert_eq!(actual.config, None);
        assert!(!actual.no_pause);
    }

    #[test]
    fn test_args_no_pause_disables_warning_pause() {
        let args = Args::from_iter([
            "conversation-transcript-dedup",
            "--no-pause",
            "-c",
            "dedup.toml",
            "dump.json",
        ]);

        let actual = Config::default().with_pause_disabled(args.no_pause);

        assert_eq!(args.input, PathBuf::from("dump.json"));
        assert_eq!(args.config, Some(PathBuf::from("dedup.toml")));
        assert_eq!(actual.warning_pause(), std::time::Duration::ZERO);
    }
}
