use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use mathdl_core::pipeline::{ProgressCallback, RunOptions, run_instance};
use mathdl_core::report::{RunReport, render_json, render_summary};
use mathdl_core::{Config, InstanceConfig};
use mathdl_fetch::ReqwestTransport;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Level;

/// Arguments for a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    pub instances: Vec<String>,
    pub config: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub json: bool,
    pub quiet: bool,
}

impl RunArgs {
    /// Every built-in instance, in the working directory.
    pub fn defaults(quiet: bool) -> Self {
        Self {
            instances: Vec::new(),
            config: None,
            output_dir: PathBuf::from("."),
            json: false,
            quiet,
        }
    }

    pub fn from_matches(args: &ArgMatches, quiet: bool) -> Self {
        let output_dir = args
            .get_one::<String>("output-dir")
            .map(|dir| resolve_output_dir(dir))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            instances: instance_names(args),
            config: args.get_one::<PathBuf>("config").cloned(),
            output_dir,
            json: args.get_flag("json"),
            quiet,
        }
    }
}

fn instance_names(args: &ArgMatches) -> Vec<String> {
    args.get_many::<String>("instance")
        .map(|names| names.cloned().collect())
        .unwrap_or_default()
}

/// Expand a leading `~` in an output directory argument
pub fn resolve_output_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Load the configuration file if one was given, otherwise the built-in instances
pub fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display())),
        None => Ok(Config::default()),
    }
}

pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    // A subscriber may already be installed when called from tests
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn print_banner() {
    println!(
        "{} {}",
        "mathdl".bright_cyan().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
    println!("{}", "competition paper archiver".bright_black());
    println!();
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

/// Color a pipeline progress line by its leading marker
pub fn colorize_progress(msg: &str) -> String {
    if msg.starts_with('✓') {
        msg.green().to_string()
    } else if msg.trim_start().starts_with('✗') {
        msg.red().to_string()
    } else if msg.starts_with('⬇') {
        msg.cyan().to_string()
    } else {
        msg.to_string()
    }
}

fn progress_printer(args: &RunArgs) -> Option<ProgressCallback> {
    if args.quiet || args.json {
        return None;
    }
    Some(Arc::new(|msg: String| {
        println!("{}", colorize_progress(&msg));
    }))
}

fn print_outcome(instance: &InstanceConfig, report: &RunReport) {
    println!();
    if report.missing.is_empty() {
        println!(
            "{} All available files found and downloaded.",
            "✓".green().bold()
        );
    } else {
        println!(
            "{} Missing files logged to {}",
            "→".blue(),
            report.missing_log.display().to_string().bright_white()
        );
    }
    println!(
        "{} Done! Archive saved as {}",
        "✓".green().bold(),
        instance.archive.file_name.bright_white()
    );
    println!();
    print!("{}", render_summary(report));
    println!();
}

/// Run the selected instances one after another
pub async fn handle_run(args: &RunArgs) -> Result<Vec<RunReport>> {
    let config = load_config(args.config.as_ref())?;
    let selected = config.select(&args.instances)?;

    ensure_output_dir(&args.output_dir)?;
    let transport = ReqwestTransport::new().context("Failed to create HTTP client")?;

    let options = RunOptions {
        output_dir: args.output_dir.clone(),
        show_progress_bars: !args.quiet && !args.json,
    };

    let mut reports = Vec::with_capacity(selected.len());
    for instance in selected {
        if !args.json {
            print_divider();
            println!(
                "{}",
                format!("  {}", instance.name.to_uppercase()).bright_white().bold()
            );
            print_divider();
            println!();
        }

        let report = run_instance(&transport, instance, &options, progress_printer(args))
            .await
            .with_context(|| format!("Instance '{}' failed", instance.name))?;

        if !args.json {
            print_outcome(instance, &report);
        }
        reports.push(report);
    }

    if args.json {
        println!("{}", render_json(&reports)?);
    }

    Ok(reports)
}

fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))
}

pub fn handle_list(args: &ArgMatches) -> Result<()> {
    let config = load_config(args.get_one::<PathBuf>("config"))?;
    let selected = config.select(&instance_names(args))?;

    for instance in selected {
        let candidates = instance.candidates();
        println!(
            "{} {} ({} candidates)",
            "→".blue(),
            instance.name.bright_white().bold(),
            candidates.len().to_string().cyan()
        );
        for candidate in &candidates {
            println!(
                "  {} {} {}",
                candidate.remote_url(),
                "→".bright_black(),
                candidate.local_path().display()
            );
        }
        println!();
    }

    Ok(())
}

pub fn handle_config(args: &ArgMatches) -> Result<()> {
    let config = load_config(args.get_one::<PathBuf>("config"))?;
    println!("{}", config.to_json_pretty()?);
    Ok(())
}
