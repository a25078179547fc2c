mod app;
mod components;
mod config;
mod editor;
mod error;
mod event;
mod explorer;
mod handler;
mod logging;
mod store;
mod theme;
mod tui;
mod ui;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use crate::app::{App, AppOptions};
use crate::config::{AppConfig, GeneralConfig, LocalConfig, LogConfig, RemoteConfig, ThemeConfig};
use crate::error::AppError;
use crate::event::{Event, EventHandler};
use crate::store::http::HttpFileStore;
use crate::store::local::LocalFileStore;
use crate::store::watcher::{self, LocalWatcher};
use crate::store::RemoteFileStore;
use crate::tui::{install_panic_hook, Tui};

/// Terminal client for a Cloud IDE project.
#[derive(Parser, Debug)]
#[command(name = "cide", version, about)]
struct Cli {
    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// IDE server URL (default http://localhost:5000)
    #[arg(long)]
    server: Option<String>,

    /// Session token (also read from CIDE_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Project to open on the server
    #[arg(long, short)]
    project: Option<String>,

    /// Serve a local directory instead of a server
    #[arg(long, value_name = "DIR")]
    local: Option<PathBuf>,

    /// Theme: dark, light or custom
    #[arg(long)]
    theme: Option<String>,

    /// Disable mouse capture
    #[arg(long)]
    no_mouse: bool,

    /// Disable the local filesystem watcher
    #[arg(long)]
    no_watcher: bool,

    /// Log filter, e.g. "debug" or "cloud_ide=trace"
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Partial config built from flags; only flags that were given are `Some`.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                mouse: self.no_mouse.then_some(false),
                ..Default::default()
            },
            remote: RemoteConfig {
                server_url: self.server.clone(),
                token: self.token.clone(),
                project: self.project.clone(),
            },
            local: LocalConfig {
                root: self
                    .local
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
                watch: self.no_watcher.then_some(false),
                ..Default::default()
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                custom: None,
            },
            log: LogConfig {
                level: self.log_level.clone(),
                dir: None,
            },
            ..Default::default()
        }
    }
}

/// The store to browse and the project name shown as the tree root.
struct Session {
    store: Arc<dyn RemoteFileStore>,
    project: String,
    local_root: Option<PathBuf>,
}

fn open_session(cfg: &AppConfig) -> error::Result<Session> {
    if let Some(root) = cfg.local_root() {
        let root = Path::new(root)
            .canonicalize()
            .map_err(|_| AppError::InvalidPath(format!("{} does not exist", root)))?;
        if !root.is_dir() {
            return Err(AppError::InvalidPath(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        let project = cfg.remote.project.clone().unwrap_or_else(|| {
            root.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "project".to_string())
        });
        return Ok(Session {
            store: Arc::new(LocalFileStore::new(&root)),
            project,
            local_root: Some(root),
        });
    }

    let project = cfg.remote.project.clone().ok_or_else(|| {
        AppError::Config("no project given; pass --project or --local <dir>".to_string())
    })?;
    if cfg.token().is_none() {
        warn!("no session token configured; the server will likely reject requests");
    }
    let store = HttpFileStore::new(cfg.server_url(), cfg.token().map(str::to_string))?;
    Ok(Session {
        store: Arc::new(store),
        project,
        local_root: None,
    })
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let log_guard = logging::init(&cfg.log_dir(), cfg.log_level())?;
    info!(log = %log_guard.path().display(), "starting cide");

    let session = open_session(&cfg)?;
    let options = AppOptions {
        confirm_delete: cfg.confirm_delete(),
        use_icons: cfg.use_icons(),
        sidebar_width: cfg.sidebar_width(),
        theme: theme::resolve_theme(&cfg.theme),
    };

    install_panic_hook();

    let mut tui = Tui::new(&session.project, cfg.mouse_enabled())?;
    let mut events = EventHandler::new(Duration::from_millis(16));
    let mut app = App::new(&session.project, session.store, events.sender(), options);
    app.start();

    let _watcher = match session.local_root.as_deref() {
        Some(root) if cfg.watch_enabled() => {
            let ignore_patterns: Vec<String> = watcher::DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect();
            match LocalWatcher::new(
                root,
                app.explorer.root_path().to_string(),
                Duration::from_millis(cfg.debounce_ms()),
                ignore_patterns,
                watcher::DEFAULT_FLOOD_THRESHOLD,
                app.explorer.refresh_handle(),
            ) {
                Ok(w) => {
                    app.watcher_active = true;
                    Some(w)
                }
                Err(e) => {
                    warn!(error = %e, "watcher unavailable");
                    app.set_error_message(format!("⚠ Watcher unavailable: {}", e));
                    None
                }
            }
        }
        _ => None,
    };

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Resize(_, _) => {}
            event => app.handle_event(event),
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    info!("cide stopped");
    Ok(())
}
