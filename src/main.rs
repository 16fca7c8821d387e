mod aggregate;
mod config;
mod db;
mod edit;
mod error;
mod ipc;
mod model;
mod reconcile;
mod recognizer;
mod roster;
mod session;
mod store;

use std::io::{self, BufRead, Write};

fn main() {
    // stdout carries the protocol; logs go to stderr.
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let config = match config::DaemonConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("invalid configuration: {e:#}");
            std::process::exit(2);
        }
    };
    let startup_workspace = config.workspace.clone();
    let mut state = ipc::AppState::new(config);

    if let Some(path) = startup_workspace {
        if let Err(e) = ipc::select_workspace(&mut state, &path) {
            log::warn!("could not open startup workspace {}: {e:#}", path.display());
        }
    }
    log::info!("attendanced {} ready", env!("CARGO_PKG_VERSION"));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                log::error!("stdin read failed: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // No id to reply to.
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{}", resp);
                let _ = stdout.flush();
                continue;
            }
        };

        log::debug!("request {} {}", req.id, req.method);
        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}
