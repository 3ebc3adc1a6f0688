use crate::error::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes `content` to `dir/file_name`, creating `dir` when needed.
pub fn write_export(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    let mut file = File::create(&path)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    tracing::info!(path = %path.display(), bytes = content.len(), "export written");
    Ok(path)
}
