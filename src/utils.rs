//! Few tools for console output and logging
//!
//! Diagnostics from the library go through `tracing`; the binary installs the
//! subscriber with `init_tracing`. Report lines meant for the user (banner,
//! grid, output paths) go through `test_print`, which also copies them to an
//! optional timestamped transcript file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::EnvFilter;

static TEST_FLAG: AtomicBool = AtomicBool::new(true);

// Global log file handle (wrapped in Mutex for thread safety)
static LOG_FILE: Mutex<Option<std::fs::File>> = Mutex::new(None);

/// Installs the fmt subscriber on stderr: `debug` when verbose, `info`
/// otherwise, unless RUST_LOG says differently
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Name of the transcript file for the current time
pub fn log_file_name(dir: &Path) -> PathBuf {
    let now = chrono::Local::now();
    dir.join(format!("log_puzzle_{}.txt", now.format("%Y-%m-%d_%H-%M-%S")))
}

/// Initialize log file with timestamp
pub fn init_log_file(dir: &Path) -> Option<PathBuf> {
    let filename = log_file_name(dir);
    match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&filename)
    {
        Ok(file) => {
            if let Ok(mut guard) = LOG_FILE.lock() {
                *guard = Some(file);
            }
            tracing::info!("log file created: {}", filename.display());
            Some(filename)
        }
        Err(e) => {
            tracing::warn!("could not create log file {}: {}", filename.display(), e);
            None
        }
    }
}

/// Write to log file if it's open
fn write_to_log(msg: &str) {
    if let Ok(mut log_guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *log_guard {
            let _ = writeln!(file, "{}", msg);
        }
    }
}

pub fn test_print_off() {
    TEST_FLAG.store(false, Ordering::Relaxed);
}

pub fn debug_print(msg: &str) {
    tracing::debug!("{}", msg);
}

pub fn test_print(msg: &str) {
    if TEST_FLAG.load(Ordering::Relaxed) {
        println!("{}", msg);
    }
    // Always write to log file if it's open
    write_to_log(msg);
}

/// Centered title between two lines of '='
pub fn banner_text(msg: &str) -> String {
    // set the banner's width
    const BANNER_WIDTH: usize = 80;
    // truncate the message if needed
    let titre: String = msg.chars().take(BANNER_WIDTH).collect();
    // compute the required spaces before and after the message
    let total_padding = BANNER_WIDTH - titre.chars().count();
    let left_padding = total_padding / 2;
    let right_padding = total_padding - left_padding;
    let line = "=".repeat(BANNER_WIDTH);
    format!(
        "\n{}\n{}{}{}\n{}\n",
        line,
        " ".repeat(left_padding),
        titre,
        " ".repeat(right_padding),
        line
    )
}

pub fn banner(msg: &str) {
    test_print(&banner_text(msg));
}
