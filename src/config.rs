use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt::writer::BoxMakeWriter, EnvFilter};

const SNAPSHOT_FILE: &str = "snapshot.json";

/// Runtime settings resolved from command-line flags and the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Snapshot to start from. `None` means the built-in sample data.
    pub data: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
}

impl Config {
    pub fn resolve(data: Option<PathBuf>, log_file: Option<PathBuf>) -> Self {
        let default_snapshot = default_snapshot_path().filter(|p| p.exists());
        Config {
            data: data.or(default_snapshot),
            log_file,
            log_filter: log_filter_from_env(),
        }
    }

    /// Installs the global subscriber. Interactive sessions own the
    /// terminal, so they only log when a log file was given.
    pub fn init_logging(&self, interactive: bool) -> Result<()> {
        let writer = match (&self.log_file, interactive) {
            (Some(path), _) => {
                let file = open_log_file(path)?;
                BoxMakeWriter::new(Mutex::new(file))
            }
            (None, true) => BoxMakeWriter::new(std::io::sink),
            (None, false) => BoxMakeWriter::new(std::io::stderr),
        };

        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(&self.log_filter))
            .with_writer(writer)
            .with_ansi(self.log_file.is_none() && !interactive)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))
    }
}

/// `<data dir>/pipeline/snapshot.json`, used when no `--data` is given.
pub fn default_snapshot_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "pipeline").map(|dirs| dirs.data_dir().join(SNAPSHOT_FILE))
}

fn log_filter_from_env() -> String {
    std::env::var("PIPELINE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string())
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_data_path_wins() {
        let config = Config::resolve(Some(PathBuf::from("mine.json")), None);
        assert_eq!(config.data, Some(PathBuf::from("mine.json")));
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_default_snapshot_path_is_named() {
        if let Some(path) = default_snapshot_path() {
            assert!(path.ends_with(SNAPSHOT_FILE));
        }
    }

    #[test]
    fn test_open_log_file_appends() {
        let dir = std::env::temp_dir().join(format!("pipeline-log-{}", std::process::id()));
        let path = dir.join("nested").join("pipeline.log");

        open_log_file(&path).unwrap();
        std::fs::write(&path, "first\n").unwrap();
        {
            use std::io::Write;
            let mut file = open_log_file(&path).unwrap();
            writeln!(file, "second").unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
