//! JSON file cache backend.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::cache::{CacheEntry, CacheError, RouteCache};

/// Stores the cache entry as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// A sibling path unique to one write, so concurrent writers never share it.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".{}.tmp", uuid::Uuid::new_v4()));
        self.path.with_file_name(name)
    }
}

impl RouteCache for FileCache {
    fn useable(&self) -> bool {
        !self.path.as_os_str().is_empty() && self.directory().is_dir()
    }

    fn filled(&self) -> bool {
        self.path.is_file()
    }

    fn read(&self) -> Result<CacheEntry, CacheError> {
        if !self.filled() {
            return Err(CacheError::Empty);
        }
        let file = File::open(&self.path)?;
        let entry = serde_json::from_reader(BufReader::new(file))?;
        Ok(entry)
    }

    fn write(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        if !self.useable() {
            return Err(CacheError::Unusable(format!(
                "directory of {} does not exist",
                self.path.display()
            )));
        }

        // Readers never observe a half-written document.
        let staging = self.staging_path();
        let staged = stage(&staging, entry)
            .and_then(|()| fs::rename(&staging, &self.path).map_err(CacheError::from));
        if staged.is_err() {
            let _ = fs::remove_file(&staging);
        }
        staged?;

        tracing::debug!(path = %self.path.display(), routes = entry.routes.len(), "Route cache written");
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn stage(staging: &Path, entry: &CacheEntry) -> Result<(), CacheError> {
    let mut writer = BufWriter::new(File::create(staging)?);
    serde_json::to_writer(&mut writer, entry)?;
    writer.flush()?;
    Ok(())
}
