use crate::utils::error::Result;
use async_trait::async_trait;

/// Converts a field value between its raw form (stored in the bill) and its
/// display form (shown in an input field).
pub trait FieldFormatter: Send + Sync {
    fn formatted_value(&self, raw_value: Option<&str>) -> String;
    fn raw_value(&self, formatted_value: &str) -> String;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Provides the raw postal code archive (zip file with CSV entries).
#[async_trait]
pub trait PostalCodeSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>>;
    fn describe(&self) -> String;
}
