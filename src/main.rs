mod app;
mod components;
mod config;
mod error;
mod event;
mod fs;
mod handler;
mod logging;
mod panes;
mod settings;
mod theme;
mod tui;
mod ui;
mod workspace;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::config::{AppConfig, GeneralConfig, WatcherConfig};
use crate::event::{Event, EventHandler};
use crate::fs::local::LocalVault;
use crate::settings::SettingsStore;
use crate::tui::{install_panic_hook, Tui};

/// Browse a notes vault as a folder tree and a file list.
#[derive(Parser, Debug)]
#[command(name = "vp", version, about)]
struct Cli {
    /// Vault directory (defaults to the configured vault, then the current directory)
    vault: Option<PathBuf>,

    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the panel settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Do not watch the vault for external changes
    #[arg(long)]
    no_watcher: bool,

    /// Disable mouse support
    #[arg(long)]
    no_mouse: bool,
}

impl Cli {
    /// Config values implied by command-line flags.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                vault_path: None,
                mouse: self.no_mouse.then_some(false),
            },
            watcher: WatcherConfig {
                enabled: self.no_watcher.then_some(false),
                ignore: None,
            },
            ..AppConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init();

    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let raw_path = cli
        .vault
        .clone()
        .or_else(|| config.general.vault_path.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let path = raw_path.canonicalize().map_err(|_| {
        error::AppError::InvalidPath(format!("{} does not exist", raw_path.display()))
    })?;
    if !path.is_dir() {
        return Err(error::AppError::InvalidPath(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    let mut vault = LocalVault::open(&path, config.ignore_patterns())?;
    vault.set_watch(config.watcher_enabled());

    let settings_path = cli.settings.clone().or_else(settings::default_settings_path);
    let settings = SettingsStore::load(settings_path);
    let theme_colors = theme::resolve_theme(&config.theme);

    tracing::info!(
        vault = %path.display(),
        watcher = config.watcher_enabled(),
        mouse = config.mouse_enabled(),
        theme = config.theme_scheme(),
        settings = ?settings.path(),
        "starting"
    );

    install_panic_hook(config.mouse_enabled());

    let mut tui = Tui::enter(config.mouse_enabled())?;
    let mut events = EventHandler::new(Duration::from_millis(100));
    let mut app = App::new(
        vault,
        settings,
        theme_colors,
        events.sender(),
        config.watcher_enabled(),
    );
    app.open_panel();

    loop {
        tui.draw(&mut app)?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
            event @ (Event::Vault(_) | Event::Settings(_)) => app.handle_event(event),
        }

        if app.should_quit {
            break;
        }
    }

    app.close_panel();
    tui.restore()?;
    tracing::info!("exiting");
    Ok(())
}
