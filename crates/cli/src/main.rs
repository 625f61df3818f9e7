use anyhow::Result;
use clap::{Parser, Subcommand};
use console::{Term, style};
use serde::Serialize;
use srcsel_core::{
    BuildEnv, DEFAULT_CONFIG, PLATFORM_VAR, ProjectConfig, SRC_FILTER_VAR, SrcFilter,
    TargetFamily, discover_sources, select_sources,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// srcsel - platform-conditional source selection for embedded builds
#[derive(Parser)]
#[command(name = "srcsel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the source filter for the resolved platform
    Filter {
        /// Path to the project config (default: srcsel.toml)
        #[arg(default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Platform identifier, overriding the environment and config
        #[arg(short, long)]
        platform: Option<String>,

        /// Print a machine-readable report
        #[arg(long)]
        json: bool,
    },

    /// List the source files that enter the build
    Sources {
        /// Path to the project config (default: srcsel.toml)
        #[arg(default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Platform identifier, overriding the environment and config
        #[arg(short, long)]
        platform: Option<String>,
    },

    /// Show project and platform status
    Status {
        /// Path to the project config (default: srcsel.toml)
        #[arg(default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .without_time()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Filter {
            config,
            platform,
            json,
        } => cmd_filter(&config, platform, json),
        Commands::Sources { config, platform } => cmd_sources(&config, platform, cli.verbose),
        Commands::Status { config } => cmd_status(&config),
    }
}

/// Load the project config, falling back to defaults when the file is absent
fn load_config(path: &Path) -> Result<ProjectConfig> {
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    match ProjectConfig::from_path(path) {
        Ok(config) => Ok(config),
        Err(e) => {
            let term = Term::stderr();
            term.write_line(&format!("{} {}", style("error:").red().bold(), e))?;
            std::process::exit(1);
        }
    }
}

/// Resolution order: --platform flag, process environment, config file
fn resolve_platform(flag: Option<String>, config: &ProjectConfig) -> Option<String> {
    flag.or_else(|| std::env::var(PLATFORM_VAR).ok().filter(|v| !v.is_empty()))
        .or_else(|| config.env.platform.clone())
}

/// Run the selector for the resolved platform and return the chosen filter
fn select_filter(platform: Option<&str>) -> SrcFilter {
    let mut env = BuildEnv::new();
    if let Some(platform) = platform {
        env.set_str(PLATFORM_VAR, platform);
    }
    select_sources(&mut env);
    env.get_filter(SRC_FILTER_VAR).cloned().unwrap_or_default()
}

#[derive(Serialize)]
struct FilterReport<'a> {
    platform: Option<&'a str>,
    family: Option<TargetFamily>,
    src_filter: &'a SrcFilter,
}

fn cmd_filter(config: &Path, platform: Option<String>, json: bool) -> Result<()> {
    let project = load_config(config)?;
    let platform = resolve_platform(platform, &project);
    let filter = select_filter(platform.as_deref());

    if json {
        let report = FilterReport {
            platform: platform.as_deref(),
            family: platform.as_deref().and_then(TargetFamily::parse),
            src_filter: &filter,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let term = Term::stdout();
    term.write_line(&format!(
        "{} Source filter for platform '{}'",
        style("::").cyan().bold(),
        platform.as_deref().unwrap_or("(not set)")
    ))?;

    for pattern in filter.iter() {
        let sign = if pattern.is_include() {
            style("+").green().bold()
        } else {
            style("-").red().bold()
        };
        term.write_line(&format!("  {}<{}>", sign, pattern.glob()))?;
    }

    Ok(())
}

fn cmd_sources(config: &Path, platform: Option<String>, verbose: bool) -> Result<()> {
    let term = Term::stdout();
    let project = load_config(config)?;
    let src_dir = &project.project.src_dir;

    if !src_dir.exists() {
        term.write_line(&format!(
            "{} Source directory not found: {}",
            style("error:").red().bold(),
            src_dir.display()
        ))?;
        std::process::exit(1);
    }

    let platform = resolve_platform(platform, &project);
    let filter = select_filter(platform.as_deref());

    if verbose {
        term.write_line(&format!(
            "{} Filter: {}",
            style("::").cyan().bold(),
            filter
        ))?;
    }

    let sources = discover_sources(src_dir, &filter)?;
    for path in &sources {
        term.write_line(&path.display().to_string())?;
    }

    term.write_line(&format!(
        "{} Selected {} source file(s)",
        style("::").cyan().bold(),
        sources.len()
    ))?;

    Ok(())
}

fn cmd_status(config: &Path) -> Result<()> {
    let term = Term::stdout();
    let project = load_config(config)?;
    let platform = resolve_platform(None, &project);
    let filter = select_filter(platform.as_deref());

    let family = match platform.as_deref().and_then(TargetFamily::parse) {
        Some(family) => format!("{} family", family),
        None => "unknown family".to_string(),
    };

    term.write_line(&format!(
        "{} srcsel v{}",
        style("::").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    ))?;
    term.write_line("")?;
    term.write_line(&format!(
        "  Platform: {} ({})",
        platform.as_deref().unwrap_or("(not set)"),
        family
    ))?;
    term.write_line(&format!("  Sources:  {}", project.project.src_dir.display()))?;
    term.write_line(&format!("  Filter:   {}", filter))?;

    Ok(())
}
