use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vigil_core::config::VigilConfig;

/// Vigil build tasks.
#[derive(Parser)]
#[command(name = "xtask")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Renders a config file using the compiled-in defaults.
    RenderDefaultConfig {
        /// Output path (stdout if omitted).
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::RenderDefaultConfig { out } => {
            render_default_config(out);
        }
    }
}

fn render_default_config(out: Option<PathBuf>) {
    let config = VigilConfig::default();
    let rendered = toml::to_string_pretty(&config).expect("default config always serializes");

    match out {
        Some(path) => {
            std::fs::write(&path, rendered).unwrap_or_else(|e| {
                eprintln!("failed to write {}: {}", path.display(), e);
                std::process::exit(1);
            });
            println!("wrote default config to {}", path.display());
        }
        None => print!("{}", rendered),
    }
}
