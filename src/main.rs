//! Balance Tracker CLI
//!
//! Replays a command script against a persisted session and prints the
//! resulting profile table as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- [--system-clipboard] commands.csv [store.json] > profiles.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use balance_tracker::{
    Clipboard, JsonFileStore, MemoryClipboard, Result, SystemClipboard, Tracker, TrackerError,
};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

const DEFAULT_STORE: &str = "balance-tracker.json";

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let use_system_clipboard = args.first().map(|a| a == "--system-clipboard") == Some(true);
    if use_system_clipboard {
        args.remove(0);
    }

    let script_path = args.first().ok_or(TrackerError::MissingArgument)?;
    let store_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_STORE);

    let file = File::open(script_path)?;
    let reader = BufReader::new(file);

    let clipboard: Box<dyn Clipboard> = if use_system_clipboard {
        Box::new(SystemClipboard::new()?)
    } else {
        Box::new(MemoryClipboard::new())
    };
    let store = JsonFileStore::open(store_path)?;

    let mut tracker = Tracker::open(store, clipboard)?;
    tracker.process_script(reader)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    tracker.write_profiles(handle)?;

    Ok(())
}
