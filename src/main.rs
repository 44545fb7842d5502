//! pic-import - sort photos into a library of dated folders
//!
//! Scans an import directory, dates every file from its name or EXIF data
//! and moves it into the matching folder of the photo library.

use anyhow::Result;
use clap::Parser;
use pic_import::{Cli, Config, Importer, ProcessingStatus};
use std::path::Path;
use std::sync::atomic::Ordering;
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// CLI Output Module
mod cli_output {
    //! Colored summary output for the terminal.

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stdout;

    pub struct CliTheme;

    impl CliTheme {
        pub const SUCCESS: Color = Color::Green;
        pub const WARNING: Color = Color::Yellow;
        pub const ERROR: Color = Color::Red;
        pub const HINT: Color = Color::DarkGrey;
        pub const ACCENT: Color = Color::Cyan;
    }

    pub fn print_separator() {
        let _ = stdout().execute(Print(format!("{}\n", "─".repeat(60))));
    }

    pub fn print_warning(msg: &str) {
        let _ = stdout().execute(Print(style("⚠ ").with(CliTheme::WARNING).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    pub fn print_stat(key: &str, value: usize, color: Color) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(key).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(style(value.to_string()).with(color).bold()));
        let _ = stdout().execute(Print("\n"));
    }

    /// One line per file: icon, source, then destination or error
    pub fn print_result(icon: &str, color: Color, source: &str, detail: &str) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(icon).with(color).bold()));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(style(source).italic()));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(style(detail).with(CliTheme::HINT)));
        let _ = stdout().execute(Print("\n"));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", Config::sample_config());
        return Ok(());
    }

    let _guard = setup_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "pic-import starting");

    let config = load_config(&cli)?;
    if config.verbose {
        info!(?config, "Configuration loaded");
    }

    let importer = match Importer::new(config.clone()) {
        Ok(importer) => importer,
        Err(e) => {
            error!(error = %e, "Could not open photo library");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match importer.run() {
        Ok(results) => {
            print_summary(&importer, &results, &config);
            let failed = importer.stats().failed.load(Ordering::Relaxed);
            if failed > 0 {
                std::process::exit(2);
            }
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Import failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_summary(importer: &Importer, results: &[pic_import::FileResult], config: &Config) {
    use cli_output::*;

    let stats = importer.stats();

    print_separator();
    print_stat("Found", stats.total_files.load(Ordering::Relaxed), CliTheme::ACCENT);
    print_stat("Imported", stats.imported.load(Ordering::Relaxed), CliTheme::SUCCESS);
    print_stat("Already in place", stats.in_place.load(Ordering::Relaxed), CliTheme::WARNING);
    print_stat("New folders", stats.created_dirs.load(Ordering::Relaxed), CliTheme::ACCENT);
    print_stat("Failed", stats.failed.load(Ordering::Relaxed), CliTheme::ERROR);

    let show = |r: &&pic_import::FileResult| config.verbose || r.status == ProcessingStatus::Failed;
    let shown: Vec<_> = results.iter().filter(show).collect();
    if !shown.is_empty() {
        print_separator();
    }
    for result in shown {
        let source = result.source.display().to_string();
        let dest = result
            .destination
            .as_ref()
            .map(|p| format!("→ {}", p.display()))
            .unwrap_or_default();
        match result.status {
            ProcessingStatus::Imported => print_result("✓", CliTheme::SUCCESS, &source, &dest),
            ProcessingStatus::AlreadyInPlace => {
                print_result("=", CliTheme::WARNING, &source, "already in place")
            }
            ProcessingStatus::DryRun => print_result("~", CliTheme::ACCENT, &source, &dest),
            ProcessingStatus::Failed => print_result(
                "✗",
                CliTheme::ERROR,
                &source,
                result.error.as_deref().unwrap_or("unknown error"),
            ),
        }
    }

    if config.dry_run {
        print_separator();
        print_warning("Dry run: no files were moved");
    }
}

/// Load configuration from file or CLI arguments
fn load_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        info!(config_file = %config_path.display(), "Loading configuration from file");
        let file_config = Config::load_from_file(config_path)?;
        cli.merge_with_config(file_config)
    } else {
        cli.to_config()
    };

    if let Err(e) = config.validate() {
        anyhow::bail!("{} (use --library-dir and --import-dir, or --config)", e);
    }

    Ok(config)
}

/// Setup logging (console, plus a log file when requested)
fn setup_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry().with(env_filter);

    let Some(log_path) = cli.log_file.as_deref() else {
        if cli.json_log {
            subscriber
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        } else {
            subscriber
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        return Ok(None);
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(open_log_file(log_path)?);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(Some(guard))
}

fn open_log_file(log_path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = log_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    Ok(std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?)
}
