//! Notepad server entry point.
//!
//! # Responsibility
//! - Merge `.env`, environment and command-line settings into one `WebConfig`.
//! - Initialize logging before any other component reports.
//! - Open the note store, serve HTTP until shutdown, then close the store.

use clap::Parser;
use log::{error, info, warn};
use notepad_core::{core_version, init_logging, MissingDeletePolicy, NoteStore};
use notepad_web::{AppState, WebConfig};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line overrides; anything omitted keeps its environment value.
#[derive(Parser)]
#[command(name = "notepad", version, about = "Small server-rendered notes app")]
struct Cli {
    /// Interface to bind
    #[arg(long)]
    host: Option<String>,
    /// TCP port to listen on
    #[arg(long)]
    port: Option<u16>,
    /// SQLite database file
    #[arg(long)]
    db: Option<PathBuf>,
    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files
    #[arg(long)]
    log_dir: Option<String>,
    /// Turn off CSRF protection for form posts
    #[arg(long)]
    no_csrf: bool,
    /// What deleting an unknown note does: `ignore` or `report`
    #[arg(long)]
    missing_delete: Option<MissingDeletePolicy>,
}

impl Cli {
    fn apply(self, config: &mut WebConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(db) = self.db {
            config.database_path = db;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if self.log_dir.is_some() {
            config.log_dir = self.log_dir;
        }
        if self.no_csrf {
            config.csrf_enabled = false;
        }
        if let Some(policy) = self.missing_delete {
            config.missing_delete = policy;
        }
    }
}

#[actix_web::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    dotenv::dotenv().ok();

    let mut config = WebConfig::from_env();
    cli.apply(&mut config);

    if let Err(err) = init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("notepad: failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }
    for warning in &config.warnings {
        warn!("event=config_load module=cli status=warning detail={warning}");
    }

    match serve(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=cli status=error error={err}");
            eprintln!("notepad: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: &WebConfig) -> io::Result<()> {
    let store = NoteStore::open(config.store_config()).map_err(io::Error::other)?;
    let state = AppState::from_config(config, store.clone()).map_err(io::Error::other)?;

    info!(
        "event=server_start module=cli status=ok version={} core_version={}",
        env!("CARGO_PKG_VERSION"),
        core_version()
    );
    let result = notepad_web::run(config, state).await;
    store.close();
    result
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use notepad_core::MissingDeletePolicy;
    use notepad_web::WebConfig;
    use std::path::PathBuf;

    #[test]
    fn flags_override_loaded_config() {
        let cli = Cli::try_parse_from([
            "notepad",
            "--port",
            "8081",
            "--db",
            "/tmp/notes.db",
            "--no-csrf",
            "--missing-delete",
            "ignore",
        ])
        .unwrap();
        let mut config = WebConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.port, 8081);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.database_path, PathBuf::from("/tmp/notes.db"));
        assert!(!config.csrf_enabled);
        assert_eq!(config.missing_delete, MissingDeletePolicy::Ignore);
    }

    #[test]
    fn omitted_flags_keep_config_values() {
        let cli = Cli::try_parse_from(["notepad"]).unwrap();
        let mut config = WebConfig {
            log_dir: Some("/var/log/notepad".to_string()),
            ..WebConfig::default()
        };
        cli.apply(&mut config);

        assert!(config.csrf_enabled);
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/notepad"));
    }

    #[test]
    fn unknown_missing_delete_policy_is_rejected() {
        assert!(Cli::try_parse_from(["notepad", "--missing-delete", "explode"]).is_err());
    }
}
