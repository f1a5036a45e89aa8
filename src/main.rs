//! Quiz Arcade - Entry Point
//!
//! Renders activity records into embeddable game fragments.

use clap::{Parser, Subcommand};
use quiz_arcade::activity::ActivityRecord;
use quiz_arcade::core::config::{config, set_config, EngineConfig};
use quiz_arcade::core::error::Result;
use quiz_arcade::render::{Renderer, Theme};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quiz-arcade")]
#[command(about = "Quiz-gated mini-games for packaged lessons")]
struct Cli {
    /// Engine tuning file (TOML); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one activity (or an array of them) to HTML fragments
    Render {
        /// Activity record JSON file
        activity: PathBuf,

        /// Theme name, overriding the one in the activity
        #[arg(long)]
        theme: Option<String>,

        /// Write to this file instead of stdout
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },
    /// List the built-in themes
    Themes,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quiz_arcade=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Some(path) = &cli.config {
        if set_config(EngineConfig::load(path)?).is_err() {
            tracing::warn!("Engine config already installed, ignoring {}", path.display());
        }
    }
    let engine = config().clone();

    match cli.command {
        Command::Render {
            activity,
            theme,
            out,
        } => {
            let content = std::fs::read_to_string(&activity)?;
            let value: Value = serde_json::from_str(&content)?;
            let records: Vec<ActivityRecord> = match &value {
                Value::Array(items) => items.iter().map(ActivityRecord::from_value).collect(),
                other => vec![ActivityRecord::from_value(other)],
            };

            let mut renderer = Renderer::new(engine);
            if let Some(name) = theme {
                renderer = renderer.with_theme(Theme::by_name(&name));
            }

            let mut html = String::new();
            for record in &records {
                match renderer.render(record) {
                    Ok(fragment) => html.push_str(&fragment.html),
                    Err(e) => tracing::warn!("Skipping activity: {}", e),
                }
            }
            tracing::info!(activities = records.len(), "Rendered {}", activity.display());

            match out {
                Some(path) => std::fs::write(path, html)?,
                None => print!("{html}"),
            }
        }
        Command::Themes => {
            for name in Theme::builtin_names() {
                println!("{name}");
            }
        }
    }
    Ok(())
}
