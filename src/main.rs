mod action;
mod app;
mod config;
mod detail;
mod error;
mod event;
mod feed;
mod graphcms;
mod markdown;
mod media;
mod query;
mod route;
mod source;
#[cfg(test)]
mod testing;
mod tui;
mod types;
mod ui;

use std::panic;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::{App, Settings};
use crate::config::Config;
use crate::error::BlogError;
use crate::event::Event;
use crate::graphcms::GraphCms;
use crate::route::Route;
use crate::source::ContentSource;
use crate::tui::EventHandler;

/// Read a GraphQL-backed blog from the terminal
#[derive(Parser, Debug)]
#[command(name = "blogterm", version, about)]
struct Cli {
    /// Route to open: `/` for the post list or `/post/<slug>`
    #[arg(default_value = "/")]
    route: String,

    /// GraphQL endpoint of the content API
    #[arg(long)]
    endpoint: Option<String>,

    /// Posts fetched per page
    #[arg(long)]
    page_size: Option<u32>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Drop raw HTML embedded in post bodies
    #[arg(long)]
    no_raw_html: bool,
}

fn init_logging(log_file: Option<&Path>) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config, BlogError> {
    let config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load(),
    };
    Ok(apply_overrides(cli, config))
}

/// Command line flags win over the config file
fn apply_overrides(cli: &Cli, mut config: Config) -> Config {
    if let Some(endpoint) = &cli.endpoint {
        config.api.endpoint = Some(endpoint.clone());
    }
    if let Some(page_size) = cli.page_size {
        config.feed.page_size = page_size;
    }
    if cli.no_raw_html {
        config.post.allow_raw_html = false;
    }

    config
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.log_file.as_deref())?;

    let config = load_config(&cli)?;
    let endpoint = config.validate()?.to_string();
    let route = Route::parse(&cli.route)
        .ok_or_else(|| BlogError::Config(format!("unknown route: {}", cli.route)))?;

    let source: Arc<dyn ContentSource> = Arc::new(GraphCms::new(endpoint)?);
    let settings = Settings::from(&config);
    tracing::debug!(source = ?source, %route, "starting");

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    // Run the application
    let result = run(source, settings, route).await;

    // Restore terminal
    tui::restore()?;

    result
}

async fn run(
    source: Arc<dyn ContentSource>,
    settings: Settings,
    route: Route,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize terminal
    let mut terminal = tui::init()?;

    // Create action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Create app state
    let mut app = App::new(source, settings, route, action_tx.clone());

    // Create event handler
    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    // Main loop
    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
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
    fn cli_defaults_to_home() {
        let cli = Cli::parse_from(["blogterm"]);
        assert_eq!(Route::parse(&cli.route), Some(Route::Home));
        assert!(!cli.no_raw_html);
    }

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::parse_from([
            "blogterm",
            "/post/hello",
            "--endpoint",
            "http://localhost:4000/graphql",
            "--page-size",
            "8",
            "--no-raw-html",
        ]);
        let config = apply_overrides(&cli, Config::default());
        assert_eq!(
            config.api.endpoint.as_deref(),
            Some("http://localhost:4000/graphql")
        );
        assert_eq!(config.feed.page_size, 8);
        assert!(!config.post.allow_raw_html);
        assert_eq!(Route::parse(&cli.route), Some(Route::post("hello")));
    }

    #[test]
    fn config_values_survive_without_flags() {
        let cli = Cli::parse_from(["blogterm"]);
        let mut base = Config::default();
        base.api.endpoint = Some("https://api.example.com/graphql".to_string());
        base.feed.page_size = 12;
        base.post.allow_raw_html = false;

        let config = apply_overrides(&cli, base);
        assert_eq!(
            config.api.endpoint.as_deref(),
            Some("https://api.example.com/graphql")
        );
        assert_eq!(config.feed.page_size, 12);
        assert!(!config.post.allow_raw_html);
    }

    #[test]
    fn cli_rejects_missing_config_file() {
        let cli = Cli::parse_from(["blogterm", "--config", "/nonexistent/blogterm.toml"]);
        assert!(load_config(&cli).is_err());
    }
}
