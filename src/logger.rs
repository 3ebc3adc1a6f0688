use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber, appending to `path`.
///
/// The terminal UI owns stdout, so log lines go to a file. `RUST_LOG` wins over
/// `level` when set. Calling this twice keeps the first subscriber.
pub fn init(path: &Path, level: &str) {
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(_) => return,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz_builder.log");
        init(&path, "debug");
        assert!(path.exists());
    }

    #[test]
    fn test_logger_init_twice() {
        let dir = tempfile::tempdir().unwrap();
        init(&dir.path().join("a.log"), "info");
        init(&dir.path().join("b.log"), "info");
        tracing::info!("still logging");
    }

    #[test]
    fn test_logger_unwritable_path_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        init(&dir.path().join("missing").join("x.log"), "info");
    }
}
