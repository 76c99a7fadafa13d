use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use newscheck_common::observability::{LogConfig, init_logging};
use newscheck_config::{NewscheckConfig, NewscheckConfigLoader, default_config_path};
use std::io::Read;
use std::path::{Path, PathBuf};

mod demo;
mod report;
mod wiring;

#[derive(Parser, Debug)]
#[command(name = "newscheck")]
#[command(version, about = "Credibility analysis for news text and URLs")]
struct Cli {
    /// Configuration file (YAML, TOML or JSON); the per-user config is used when present
    #[arg(short, long, global = true, env = "NEWSCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a piece of text (`-` reads it from stdin)
    Content { text: String },

    /// Analyze a URL
    Url { url: String },

    /// Analyze the built-in demo cases
    Demo,

    /// Print the effective configuration with the API key masked
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = load_config(cli.config.as_deref())?;

    init_logging(LogConfig {
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.emit_stderr,
        format: cfg.logging.format,
        default_filter: cfg.logging.filter.clone(),
        ..LogConfig::default()
    })?;

    if let Command::Config = cli.command {
        print!("{}", cfg.to_redacted_yaml()?);
        return Ok(());
    }

    let analyzer = wiring::build_analyzer(&cfg)?;

    match cli.command {
        Command::Content { text } => {
            let text = read_content(&text)?;
            let result = analyzer.analyze_content(&text).await;
            report::print(&result, cli.json)?;
        }
        Command::Url { url } => {
            let url = url.trim();
            if url.is_empty() {
                bail!("nothing to analyze: the URL is empty");
            }
            let result = analyzer.analyze_url(url).await;
            report::print(&result, cli.json)?;
        }
        Command::Demo => demo::run(&analyzer, cli.json).await?,
        Command::Config => {}
    }

    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<NewscheckConfig> {
    let loader = NewscheckConfigLoader::new();
    let loader = match (explicit, default_config_path()) {
        (Some(path), _) => loader.with_file(path),
        (None, Some(path)) => loader.with_optional_file(path),
        (None, None) => loader,
    };
    loader.load().context("failed to load configuration")
}

fn read_content(arg: &str) -> Result<String> {
    let text = if arg == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read content from stdin")?;
        buf
    } else {
        arg.to_string()
    };

    if text.trim().is_empty() {
        bail!("nothing to analyze: the content is empty");
    }
    Ok(text)
}
