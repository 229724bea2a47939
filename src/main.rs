//! pullist - A terminal app list with pull-to-refresh and load-more.

mod app;
mod error;
mod feed;
mod keys;
mod refresh;
mod scroll;
mod text;
mod ui;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use env_logger::{Env, Target};
use log::info;
use ratatui::style::Color;

use app::{App, DEFAULT_PAGE_SIZE};
use feed::{DEFAULT_SOURCE, FeedClient, FeedQuery, FeedSource, FeedWorker, fetch_app_list};
use refresh::{DEFAULT_BOTTOM_THRESHOLD, DEFAULT_TOP_THRESHOLD, RefreshConfig};

/// Frame interval for animations and completion polling.
const TICK_RATE: Duration = Duration::from_millis(50);

/// A terminal app list with pull-to-refresh and load-more.
#[derive(Parser, Debug)]
#[command(name = "pullist", version, about)]
struct Args {
    /// Search service URL, or a path to a saved JSON response.
    #[arg(default_value = DEFAULT_SOURCE)]
    source: String,

    /// Search term.
    #[arg(short = 't', long, default_value = "chat")]
    term: String,

    /// Maximum number of apps to request.
    #[arg(short = 'n', long, default_value = "50")]
    limit: usize,

    /// Rows revealed per load-more.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Pull distance in points that primes a refresh.
    #[arg(long, default_value_t = DEFAULT_TOP_THRESHOLD, allow_negative_numbers = true)]
    top_threshold: f64,

    /// Pull distance in points that primes a load-more.
    #[arg(long, default_value_t = DEFAULT_BOTTOM_THRESHOLD, allow_negative_numbers = true)]
    bottom_threshold: f64,

    /// Use a single 68-point threshold for both edges.
    #[arg(long, conflicts_with_all = ["top_threshold", "bottom_threshold"])]
    legacy_thresholds: bool,

    /// Per-request timeout in seconds.
    #[arg(long, default_value = "15")]
    timeout: u64,

    /// Simulated latency before a fetch completes, in milliseconds.
    #[arg(long, default_value = "600")]
    latency_ms: u64,

    /// Hide the list scrollbar.
    #[arg(long)]
    no_scrollbar: bool,

    /// Indicator background color (name, index or #rrggbb).
    #[arg(long)]
    background: Option<String>,

    /// Write logs to this file. Filter with RUST_LOG.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = build_config(&args)?;
    let source = FeedSource::parse(&args.source);
    let client = FeedClient::new()
        .context("failed to build HTTP client")?
        .with_timeout(Duration::from_secs(args.timeout));

    let query = FeedQuery {
        term: args.term.clone(),
        limit: args.limit,
    };

    // Fetch the first list before entering the TUI
    let list = fetch_app_list(&client, &source, &query).context("failed to fetch app list")?;
    info!("starting with {} app(s)", list.len());

    let (worker, feed_rx) = FeedWorker::new(
        client,
        source,
        query,
        Duration::from_millis(args.latency_ms),
    );
    let app = App::new(list, worker, feed_rx, config, args.page_size);

    // Run TUI
    run_tui(app)
}

/// Send log output to `path`; the terminal belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn build_config(args: &Args) -> Result<RefreshConfig> {
    let mut config = if args.legacy_thresholds {
        RefreshConfig::legacy()
    } else {
        RefreshConfig::default().with_thresholds(args.top_threshold, args.bottom_threshold)
    };
    config = config.with_scroll_indicators(!args.no_scrollbar);
    if let Some(name) = &args.background {
        let color = name
            .parse::<Color>()
            .map_err(|_| anyhow!("invalid background color: {name}"))?;
        config = config.with_background(color);
    }
    Ok(config)
}

/// Run the TUI application.
fn run_tui(mut app: App) -> Result<()> {
    let mut terminal = ratatui::init();
    execute!(std::io::stdout(), EnableMouseCapture).context("failed to enable mouse capture")?;

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore even if the loop failed
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Main event loop.
fn run_event_loop(terminal: &mut ratatui::DefaultTerminal, app: &mut App) -> Result<()> {
    loop {
        // Apply completions and animate before drawing
        app.tick(Instant::now());

        // Draw UI
        terminal.draw(|frame| {
            ui::render(frame, app);
        })?;

        // Handle events, waking up each frame for animations
        if !event::poll(TICK_RATE)? {
            continue;
        }
        let event = event::read()?;
        match &event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if keys::dispatch_key_event(app, *key, &event) {
                    continue;
                }
            }
            Event::Mouse(mouse) => keys::handle_mouse_event(app, *mouse),
            _ => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["pullist"]);
        assert_eq!(args.source, DEFAULT_SOURCE);
        assert_eq!(args.term, "chat");
        assert_eq!(args.page_size, DEFAULT_PAGE_SIZE);

        let config = build_config(&args).unwrap();
        assert_eq!(config, RefreshConfig::default());
    }

    #[test]
    fn test_args_legacy_and_background() {
        let args = Args::parse_from([
            "pullist",
            "--legacy-thresholds",
            "--no-scrollbar",
            "--background",
            "blue",
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.thresholds.top, 68.0);
        assert_eq!(config.thresholds.bottom, 68.0);
        assert!(!config.shows_scroll_indicators);
        assert_eq!(config.background, Color::Blue);
    }

    #[test]
    fn test_args_bad_background() {
        let args = Args::parse_from(["pullist", "--background", "not-a-color"]);
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn test_args_accept_non_positive_thresholds() {
        let args = Args::parse_from([
            "pullist",
            "--top-threshold",
            "-10",
            "--bottom-threshold",
            "0",
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.thresholds.top, -10.0);
        assert_eq!(config.thresholds.bottom, 0.0);
    }

    #[test]
    fn test_legacy_conflicts_with_thresholds() {
        let result =
            Args::try_parse_from(["pullist", "--legacy-thresholds", "--top-threshold", "50"]);
        assert!(result.is_err());
    }
}
