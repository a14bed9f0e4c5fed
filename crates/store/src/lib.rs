mod employees;
mod error;
mod tickets;

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use propinas_core::DataDocument;

pub use error::{Result, StoreError};

/// Single JSON document holding every ticket and the persisted roster.
///
/// Each mutation reads the whole file, changes it and writes it back. There is
/// no locking across processes; the last writer wins.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Seeds the default document when the file is missing. Returns whether
    /// a new file was written.
    pub fn initialize(&self) -> Result<bool> {
        if self.exists() {
            return Ok(false);
        }
        self.write(&DataDocument::seeded())?;
        tracing::info!(path = %self.path.display(), "created data file");
        Ok(true)
    }

    pub fn read(&self) -> Result<DataDocument> {
        let file = fs::File::open(&self.path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn write(&self, document: &DataDocument) -> Result<()> {
        let file = fs::File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, document)?;
        writer.flush()?;
        Ok(())
    }
}
