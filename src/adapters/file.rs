use crate::adapters::document::DocumentAdaptor;
use crate::domain::ports::DocumentSource;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// A configuration document on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}

pub type FileConfigAdaptor = DocumentAdaptor<FileSource>;

impl FileConfigAdaptor {
    pub fn from_path(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        DocumentAdaptor::new(name, FileSource::new(path))
    }
}
