mod app;
mod components;
mod config;
mod error;
mod event;
mod fs;
mod handler;
mod logging;
mod preview_content;
mod state;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, info, warn};

use crate::app::App;
use crate::config::{AppConfig, GeneralConfig, ThemeConfig, WatcherConfig};
use crate::event::{Event, EventHandler};
use crate::fs::accessor::LocalFs;
use crate::fs::watcher::DirWatcher;
use crate::preview_content::PreviewSettings;
use crate::tui::{install_panic_hook, Tui};

/// A terminal file browser with live prefix search and a preview panel.
#[derive(Parser, Debug)]
#[command(name = "c3", version, about)]
struct Cli {
    /// Directory to start in (defaults to the current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Config file to load on top of the default locations
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show hidden files on startup
    #[arg(long)]
    show_hidden: bool,

    /// Disable auto-refresh when the directory changes on disk
    #[arg(long)]
    no_watcher: bool,

    /// Color scheme: dark, light or custom
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Write logs to FILE (also read from $C3_LOG_FILE)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Flags that were given, as a config layer. Absent flags stay `None`.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                show_hidden: self.show_hidden.then_some(true),
            },
            watcher: WatcherConfig {
                enabled: self.no_watcher.then_some(false),
                debounce_ms: None,
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                custom: None,
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();

    logging::init(logging::log_path(cli.log_file.as_deref()).as_deref())?;

    let path = cli.path.canonicalize().map_err(|_| {
        error::AppError::InvalidPath(format!("{} does not exist", cli.path.display()))
    })?;
    if !path.is_dir() {
        return Err(error::AppError::InvalidPath(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    let theme = theme::resolve_theme(&config.theme);
    info!(scheme = config.theme_scheme(), "theme selected");
    let preview_settings = PreviewSettings {
        max_bytes: config.max_preview_bytes(),
    };

    install_panic_hook();

    let mut tui = Tui::new()?;
    let mut app = App::new(
        Box::new(LocalFs),
        path.clone(),
        config.show_hidden(),
        preview_settings,
    );
    let mut events = EventHandler::new(Duration::from_millis(250));

    let mut watcher = if config.watcher_enabled() {
        match DirWatcher::new(
            &path,
            Duration::from_millis(config.debounce_ms()),
            events.sender(),
        ) {
            Ok(w) => Some(w),
            Err(e) => {
                warn!(error = %e, "watcher unavailable");
                app.set_status_message(format!("Watcher unavailable: {e}"));
                None
            }
        }
    } else {
        info!("watcher disabled");
        None
    };

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, &theme, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(width, height) => debug!(width, height, "terminal resized"),
            Event::FsChange(paths) => app.handle_fs_change(paths),
        }

        if app.should_quit {
            break;
        }

        // Follow the browsed directory; events from the old one are dropped by the app.
        if let Some(w) = watcher.as_mut() {
            if let Err(e) = w.retarget(&app.nav.current_dir) {
                warn!(dir = %app.nav.current_dir.display(), error = %e, "cannot watch directory");
            }
        }
    }

    tui.restore()?;
    info!("c3 exiting");
    Ok(())
}
