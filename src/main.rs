//! marquee - terminal video-catalog browser
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! marquee
//! marquee --catalog https://example.com/movies.json --player vlc
//!
//! # CLI mode (for automation)
//! marquee search "space" --json
//! marquee play 7
//! ```

use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use marquee::api::{Artwork, ArtworkProbe, CatalogClient, CatalogError};
use marquee::app::{App, ProbeTarget};
use marquee::cli::{Cli, Command, ExitCode, Output};
use marquee::commands::{self, Globals};
use marquee::config::Config;
use marquee::catalog::CatalogStore;
use marquee::stream::{LocalPlayer, MediaDriver, MediaEvent};
use marquee::ui;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Event poll interval; also the granularity of the app's timers
const TICK_RATE: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        init_cli_logging();
        let exit_code = run_cli(cli).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: the terminal belongs to the UI, logs go to a file
        let _guard = init_tui_logging();
        run_tui(cli).await
    }
}

// =============================================================================
// Logging
// =============================================================================

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into())
}

/// Warnings and errors to stderr; `RUST_LOG` overrides
fn init_cli_logging() {
    tracing_subscriber::registry()
        .with(env_filter("marquee=warn"))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Daily log file under the cache dir. The guard flushes on drop.
fn init_tui_logging() -> Option<WorkerGuard> {
    let dir = log_dir()?;
    std::fs::create_dir_all(&dir).ok()?;

    let appender = tracing_appender::rolling::daily(&dir, "marquee.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(env_filter("marquee=info"))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
    Some(guard)
}

fn log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("marquee"))
}

// =============================================================================
// CLI Mode
// =============================================================================

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let globals = Globals {
        catalog: cli.catalog.clone(),
        player: cli.player,
    };

    match cli.command {
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &globals, &output).await,

        Some(Command::Rows(cmd)) => commands::rows_cmd(cmd, &globals, &output).await,

        Some(Command::Info(cmd)) => commands::info_cmd(cmd, &globals, &output).await,

        Some(Command::Play(cmd)) => commands::play_cmd(cmd, &globals, &output).await,

        None => {
            // This shouldn't happen (handled by is_cli_mode check)
            ExitCode::Success
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Channels feeding async results back into the event loop
struct Background {
    catalog: Option<oneshot::Receiver<CatalogStore>>,
    media_events: mpsc::UnboundedReceiver<MediaEvent>,
    artwork_tx: mpsc::UnboundedSender<(ProbeTarget, Artwork)>,
    artwork_rx: mpsc::UnboundedReceiver<(ProbeTarget, Artwork)>,
    probe: ArtworkProbe,
}

/// Run interactive TUI
async fn run_tui(cli: Cli) -> Result<()> {
    let config = Config::load();
    let source = config.catalog_source(cli.catalog.as_deref());
    let player_type = config.player_type(cli.player);
    info!(catalog = %source, player = %player_type, "starting tui");

    // Media driver owns the external player process
    let (media_tx, media_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let driver = MediaDriver::new(LocalPlayer::new(player_type), media_rx, event_tx).spawn();

    // Single catalog fetch, no retry
    let (catalog_tx, catalog_rx) = oneshot::channel();
    tokio::spawn(async move {
        let mut store = CatalogStore::new();
        store.load(&CatalogClient::new(source)).await;
        let _ = catalog_tx.send(store);
    });

    let (artwork_tx, artwork_rx) = mpsc::unbounded_channel();
    let mut background = Background {
        catalog: Some(catalog_rx),
        media_events: event_rx,
        artwork_tx,
        artwork_rx,
        probe: ArtworkProbe::new(),
    };

    let mut app = App::new(&config, player_type, media_tx);

    // Initialize terminal
    let mut terminal = init_terminal()?;

    // Run the main event loop
    let result = run_event_loop(&mut terminal, &mut app, &mut background).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    // Stops any open player; the driver exits once its channel closes
    if app.player.is_open() {
        app.player.close();
    }
    drop(app);
    let _ = tokio::time::timeout(Duration::from_secs(3), driver).await;

    result
}

/// Main event loop - handles input, updates state, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App, bg: &mut Background) -> Result<()> {
    let size = terminal.size()?;
    let mut area = Rect::new(0, 0, size.width, size.height);
    app.set_viewport(area.width);

    while app.running {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout so async results and timers progress
        if event::poll(TICK_RATE)? {
            match event::read()? {
                // Only handle key press events (ignore releases on Windows)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                }
                Event::Mouse(mouse) => handle_mouse(app, area, mouse),
                Event::Resize(width, height) => {
                    area = Rect::new(0, 0, width, height);
                    app.set_viewport(width);
                }
                _ => {}
            }
        }

        drain_background(app, bg);
        app.tick(Instant::now());
    }

    Ok(())
}

fn handle_mouse(app: &mut App, area: Rect, mouse: MouseEvent) {
    let now = Instant::now();
    match mouse.kind {
        MouseEventKind::Moved => {
            let card = ui::card_at(app, area, mouse.column, mouse.row);
            app.pointer_moved(card, now);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            match ui::card_at(app, area, mouse.column, mouse.row) {
                Some(card) => app.card_clicked(card, now),
                None => app.pointer_moved(None, now),
            }
        }
        _ => {}
    }
}

/// Apply every finished async result and start requested probes
fn drain_background(app: &mut App, bg: &mut Background) {
    if let Some(rx) = bg.catalog.as_mut() {
        match rx.try_recv() {
            Ok(store) => {
                app.on_catalog_store(store);
                bg.catalog = None;
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => {
                app.on_catalog_loaded(Err(CatalogError::Interrupted));
                bg.catalog = None;
            }
        }
    }

    while let Ok(event) = bg.media_events.try_recv() {
        app.on_media_event(event);
    }

    while let Ok((target, artwork)) = bg.artwork_rx.try_recv() {
        app.on_artwork(target, artwork);
    }

    for request in app.take_probe_requests() {
        debug!(url = %request.url, "probing artwork");
        let probe = bg.probe.clone();
        let tx = bg.artwork_tx.clone();
        tokio::spawn(async move {
            let artwork = probe.probe(&request.url).await;
            let _ = tx.send((request.target, artwork));
        });
    }
}
