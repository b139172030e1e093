use crate::domain::ports::PostalCodeSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads the postal code archive from a local file, e.g. a manually downloaded copy.
#[derive(Debug, Clone)]
pub struct FilePostalCodeSource {
    path: PathBuf,
}

impl FilePostalCodeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PostalCodeSource for FilePostalCodeSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        let data = tokio::fs::read(&self.path).await?;
        Ok(data)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
