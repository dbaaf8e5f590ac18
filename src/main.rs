use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Handle;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use pulsewatch::config::{Overrides, Settings};
use pulsewatch::geo::{GeolocationResolver, GoogleGeolocator, Locator, StaticResolver};
use pulsewatch::ui::{self, Theme};
use pulsewatch::{events, App, DataSource, FileSource, RealtimeSource, StreamSource};

#[derive(Parser, Debug)]
#[command(name = "pulsewatch")]
#[command(about = "Terminal heart-rate monitor for a realtime database feed")]
struct Args {
    /// Config file (TOML, JSON or YAML); defaults to ./pulsewatch.* if present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Realtime database base URL
    #[arg(short, long, conflicts_with_all = ["connect", "file"])]
    url: Option<String>,

    /// Database path to subscribe to
    #[arg(short, long)]
    path: Option<String>,

    /// Connect to a TCP endpoint streaming newline-delimited records (host:port)
    #[arg(short, long, conflicts_with_all = ["url", "file"])]
    connect: Option<String>,

    /// Poll a JSON file holding the latest record
    #[arg(short, long, conflicts_with_all = ["url", "connect"])]
    file: Option<PathBuf>,

    /// Alert threshold in bpm
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Refresh interval (e.g., "100ms", "1s")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Log file (the terminal belongs to the UI)
    #[arg(long, default_value = "pulsewatch.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_file)?;

    let mut settings = Settings::load(args.config.as_deref())?;
    settings.apply_overrides(Overrides {
        url: args.url.clone(),
        path: args.path.clone(),
        threshold: args.threshold,
        refresh: args.refresh.clone(),
    });
    settings.validate()?;
    let refresh = settings.monitor.refresh()?;

    // Network I/O runs on this runtime while the UI owns the main thread
    let rt = tokio::runtime::Runtime::new()?;

    let source = rt.block_on(open_source(&args, &settings))?;
    let locator = build_locator(&settings, rt.handle())?;

    let mut app = App::new(source, &settings, locator)?;
    app.theme = Theme::auto_detect();
    info!("Monitoring {}", app.source_description());

    let result = run_tui(app, refresh);

    rt.shutdown_timeout(Duration::from_secs(1));
    result
}

/// Send tracing output to a file, filtered by `RUST_LOG` (default `info`).
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    Ok(())
}

/// Open the data source selected by the flags, defaulting to the realtime database.
async fn open_source(args: &Args, settings: &Settings) -> Result<Box<dyn DataSource>> {
    if let Some(ref addr) = args.connect {
        use tokio::net::TcpStream;

        println!("Connecting to {}...", addr);
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("Failed to connect to {}", addr))?;
        println!("Connected!");
        return Ok(Box::new(StreamSource::spawn(stream, addr)));
    }

    if let Some(ref path) = args.file {
        return Ok(Box::new(FileSource::new(path)));
    }

    let Some(ref url) = settings.database.url else {
        anyhow::bail!(
            "No database URL configured: pass --url, set PULSEWATCH_DATABASE__URL, or use --file/--connect"
        );
    };

    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
        .context("Failed to build HTTP client")?;

    Ok(Box::new(RealtimeSource::subscribe(
        client,
        url,
        &settings.database.path,
        settings.database.auth.clone(),
    )))
}

/// Use the geolocation service when an API key is configured, the fallback otherwise.
fn build_locator(settings: &Settings, runtime: &Handle) -> Result<Locator> {
    let geo = &settings.geolocation;
    let timeout = geo.timeout()?;
    let fallback = geo.fallback();

    let resolver: Arc<dyn GeolocationResolver> = match geo.api_key {
        Some(ref key) => {
            let client = reqwest::Client::new();
            Arc::new(
                GoogleGeolocator::new(client, key)
                    .endpoint(&geo.endpoint)
                    .timeout(timeout),
            )
        }
        None => {
            info!("No geolocation API key configured; using fallback location");
            Arc::new(StaticResolver::new(fallback))
        }
    };

    Ok(Locator::new(resolver, runtime.clone(), fallback, timeout))
}

/// Run the TUI until the user quits
fn run_tui(mut app: App, refresh_interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    app.poll_source();

    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();
    let event_timeout = refresh_interval.min(Duration::from_millis(100));

    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(event) = events::poll_event(event_timeout)? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        if last_refresh.elapsed() >= refresh_interval {
            app.poll_source();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}
