use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use simplelog::{Config, LevelFilter, WriteLogger};

const APP_DIR_NAME: &str = "walled-snake";
const LOG_FILE_NAME: &str = "walled-snake.log";

/// Returns the platform-correct log file path.
#[must_use]
pub fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(LOG_FILE_NAME);
    base
}

/// Sends `log` records to `path`; the terminal belongs to the UI.
pub fn init_file_logger(path: &Path, level: LevelFilter) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    WriteLogger::init(level, Config::default(), file)
        .map_err(|error| io::Error::new(io::ErrorKind::AlreadyExists, error))
}
