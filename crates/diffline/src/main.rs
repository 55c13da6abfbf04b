mod config;
mod display;
mod run;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::mpsc;
use tracing::debug;

use diffline_core::{host_path, GlyphPreset};
use diffline_git::Backend;
use diffline_logging::{init_tracing, LogFormat};
use diffline_watch::{Trigger, WatchOptions, WorkspaceWatcher};

use config::{ConfigSources, Overrides, Settings};
use display::{build_display, OutputKind};
use run::{run_loop, Session};

#[derive(Parser, Debug)]
#[command(
    name = "diffline",
    about = "Live git change indicator for status bars and terminals",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Workspace directory (default: current directory)
    #[arg(short = 'd', long, global = true)]
    dir: Option<PathBuf>,

    /// How to obtain the diff summary
    #[arg(long, value_enum, global = true)]
    backend: Option<BackendChoice>,

    /// Where to render the status
    #[arg(long, value_enum, global = true)]
    output: Option<OutputChoice>,

    /// Glyph preset for the label
    #[arg(long, value_enum, global = true)]
    glyphs: Option<GlyphChoice>,

    /// Summarize staged changes instead of unstaged ones
    #[arg(long, global = true)]
    staged: bool,

    /// Global config file (default: <config dir>/diffline/config.toml)
    #[arg(long, global = true)]
    global_config: Option<PathBuf>,

    /// Ignore the global config file
    #[arg(long, global = true, conflicts_with = "global_config")]
    no_global_config: bool,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "compact", global = true)]
    log_format: LogFormatChoice,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Watch the workspace and keep the status up to date (default)
    Watch,
    /// Print the status once and exit
    Once,
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendChoice {
    Command,
    Libgit2,
}

impl From<BackendChoice> for Backend {
    fn from(choice: BackendChoice) -> Self {
        match choice {
            BackendChoice::Command => Backend::Command,
            BackendChoice::Libgit2 => Backend::LibGit2,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputChoice {
    Terminal,
    Plain,
    Json,
}

impl From<OutputChoice> for OutputKind {
    fn from(choice: OutputChoice) -> Self {
        match choice {
            OutputChoice::Terminal => OutputKind::Terminal,
            OutputChoice::Plain => OutputKind::Plain,
            OutputChoice::Json => OutputKind::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GlyphChoice {
    Codicon,
    Ascii,
}

impl From<GlyphChoice> for GlyphPreset {
    fn from(choice: GlyphChoice) -> Self {
        match choice {
            GlyphChoice::Codicon => GlyphPreset::Codicon,
            GlyphChoice::Ascii => GlyphPreset::Ascii,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_guard = init_tracing(&cli.log_level, cli.log_format.into(), cli.log_file.as_deref())
        .context("Failed to initialize logging")?;

    // Drive-form paths (`/c/work`) must be rewritten before anything touches the filesystem
    let root = match cli.dir {
        Some(ref dir) => host_path(dir),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    if !root.is_dir() {
        anyhow::bail!("Workspace directory does not exist: {}", root.display());
    }

    let global = if cli.no_global_config {
        None
    } else {
        cli.global_config.clone().or_else(ConfigSources::default_global)
    };
    let sources = ConfigSources::new(&root, global);
    let overrides = Overrides {
        backend: cli.backend.map(Into::into),
        output: cli.output.map(Into::into),
        glyphs: cli.glyphs.map(Into::into),
        staged: cli.staged,
    };
    let settings = Settings::load(&sources, &overrides)?;
    debug!(?settings, "Loaded configuration");

    match cli.command.unwrap_or(Command::Watch) {
        Command::Once => run_once(&root, &settings).await?,
        Command::Config => {
            let rendered =
                toml::to_string(&settings).context("Failed to render configuration")?;
            print!("{}", rendered);
        }
        Command::Watch => {
            watch(&root, settings, sources, overrides).await?;
            // A pending stdin read would otherwise keep the runtime alive
            drop(log_guard);
            std::process::exit(0);
        }
    }

    Ok(())
}

async fn run_once(root: &Path, settings: &Settings) -> Result<()> {
    // A single update has nothing to repaint, so terminal output prints a plain line
    let kind = match settings.output {
        OutputKind::Terminal => OutputKind::Plain,
        other => other,
    };
    let mut display = build_display(kind);
    let session = Session::from_settings(root, settings);
    session.updater.update(display.as_mut()).await;
    Ok(())
}

async fn watch(
    root: &Path,
    settings: Settings,
    sources: ConfigSources,
    overrides: Overrides,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let _watcher = WorkspaceWatcher::start(
        root,
        WatchOptions {
            respect_gitignore: settings.respect_gitignore,
            config_paths: sources.paths(),
        },
        tx.clone(),
    )
    .with_context(|| format!("Failed to watch {}", root.display()))?;

    let _stdin = diffline_watch::spawn_stdin_trigger(tx.clone());
    #[cfg(unix)]
    let _signal = diffline_watch::spawn_signal_trigger(tx.clone())
        .context("Failed to install SIGUSR1 handler")?;

    let shutdown = tx.clone();
    ctrlc::set_handler(move || {
        let _ = shutdown.send(Trigger::Shutdown);
    })
    .context("Failed to set Ctrl+C handler")?;

    let _ = tx.send(Trigger::Startup);
    drop(tx);

    let mut display = build_display(settings.output);
    let session = Session::from_settings(root, &settings);
    let reload = || -> Result<Session> {
        let next = Settings::load(&sources, &overrides)?;
        Ok(Session::from_settings(root, &next))
    };

    run_loop(session, reload, display.as_mut(), &mut rx).await;
    Ok(())
}
