//! A lobby driven over stdin/stdout: each input line is one client
//! message, each output line one reply.
//!
//! ```text
//! $ printf '105|-\n107|alice||localhost|My Game|PL=6\n' | cargo run -p line-lobby
//! ```
//!
//! An optional first argument is the path of a JSON `LobbyConfig` file,
//! for example one holding `{ "max_games": 10 }`. Logs go to stderr.
//!
//! ```text
//! $ cargo run -p line-lobby -- lobby.json < requests.txt
//! ```

use std::io::{self, BufRead, Write};
use std::path::Path;

use hexforge::dispatch::handle_line;
use hexforge::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    hexforge::logging::init("info")?;

    let config = load_config(std::env::args().nth(1).as_deref())?;
    tracing::info!(server_version = %config.server_version, "lobby ready");

    let mut lobby = Lobby::new(config);
    let codec = LineCodec::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        match handle_line(&mut lobby, &codec, line) {
            Ok(replies) => {
                for reply in replies {
                    writeln!(out, "{reply}")?;
                }
            }
            Err(e) => tracing::warn!(error = %e, "ignoring line"),
        }
    }
    Ok(())
}

/// Reads the lobby settings from a JSON file, or the defaults without one.
fn load_config(path: Option<&str>) -> Result<LobbyConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(serde_json::from_str(&std::fs::read_to_string(Path::new(path))?)?),
        None => Ok(LobbyConfig::default()),
    }
}
