//! NeuroSearch TUI Entry Point
//!
//! Launches the terminal client for NeuroSearch.
//!
//! # Usage
//!
//! ```bash
//! # Defaults (http://localhost:5000, shared disclosure)
//! neurosearch-tui
//!
//! # Point at another backend
//! neurosearch-tui --endpoint http://search.internal:8080
//!
//! # Per-turn "show more"
//! neurosearch-tui --disclosure per-turn
//!
//! # Verbose logging (written to a file, the terminal belongs to the UI)
//! RUST_LOG=debug neurosearch-tui --log-file /tmp/ns.log
//! ```

use std::fs::OpenOptions;
use std::io;
use std::io::IsTerminal;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use neurosearch_core::{load_config_from_path, ConfigOverrides, DisclosurePolicy};
use neurosearch_tui::{App, SearchClient};

/// NeuroSearch - conversational document search in your terminal
#[derive(Parser, Debug)]
#[command(name = "neurosearch-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Search backend base URL (POST {endpoint}/search)
    #[arg(short = 'e', long, value_name = "URL")]
    endpoint: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "NEUROSEARCH_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Request timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// How "show more" is scoped: shared or per-turn
    #[arg(long, value_name = "POLICY")]
    disclosure: Option<DisclosurePolicy>,

    /// Log file path
    #[arg(long, env = "NEUROSEARCH_LOG_FILE", value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            endpoint: self.endpoint.clone(),
            timeout_ms: self.timeout_ms,
            disclosure: self.disclosure,
        }
    }
}

/// Default log file: `$TMPDIR/neurosearch-tui.log`
fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("neurosearch-tui.log")
}

/// Initialize logging to a file
fn init_logging(path: &Path, level: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "neurosearch_tui={level},neurosearch_core={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_path = args.log_file.clone().unwrap_or_else(default_log_path);
    init_logging(&log_path, &args.log_level)?;

    info!("NeuroSearch TUI starting");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Configuration: CLI > env > file > defaults
    let config_path = args
        .config
        .clone()
        .or_else(neurosearch_core::default_config_path);
    let mut config = load_config_from_path(config_path).context("Failed to load configuration")?;
    args.overrides()
        .apply(&mut config)
        .context("Invalid command line options")?;
    info!(
        endpoint = %config.endpoint.base_url,
        timeout_ms = config.endpoint.request_timeout.as_millis() as u64,
        policy = %config.disclosure_policy,
        source = %config.source(),
        "Configuration loaded"
    );

    let client = SearchClient::from_config(&config)?;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: neurosearch-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means stdin/stdout are piped, or ssh was run without -t.");
        std::process::exit(1);
    }

    // Restore the terminal before a panic message is printed
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, client, config.endpoint.base_url.clone()).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("NeuroSearch TUI exiting");
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    client: SearchClient,
    endpoint_label: String,
) -> Result<()> {
    let mut app = App::new(client, endpoint_label)?;
    app.run(terminal).await
}
