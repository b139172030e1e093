use crate::core::postal_codes::{is_swiss_or_unspecified, PostalCodeIndex};
use crate::core::{PostalCode, PostalCodeSource, Storage};
use crate::utils::error::{QrBillError, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;

pub const CACHE_FILE_NAME: &str = "postal_codes.zip";

/// Postal code suggestions backed by a lazily loaded index.
///
/// The archive is fetched from `source` on first use. With a cache storage the
/// downloaded archive is kept and preferred on later runs.
pub struct PostalCodeService<P: PostalCodeSource, S: Storage> {
    source: P,
    cache: Option<S>,
    max_suggestions: usize,
    index: OnceCell<Arc<PostalCodeIndex>>,
}

impl<P: PostalCodeSource, S: Storage> PostalCodeService<P, S> {
    pub fn new(source: P, cache: Option<S>, max_suggestions: usize) -> Self {
        Self {
            source,
            cache,
            max_suggestions,
            index: OnceCell::new(),
        }
    }

    pub async fn suggest(&self, country: Option<&str>, substring: &str) -> Result<Vec<PostalCode>> {
        // 不需要資料就能回答的請求，不觸發下載
        if !is_swiss_or_unspecified(country) || substring.trim().is_empty() {
            return Ok(Vec::new());
        }

        let index = self.index().await?;
        let suggestions = index.suggest(country, substring);
        tracing::debug!("{} suggestions for '{}'", suggestions.len(), substring.trim());
        Ok(suggestions)
    }

    /// Returns the index, loading it on first call. Concurrent callers share one load.
    pub async fn index(&self) -> Result<Arc<PostalCodeIndex>> {
        self.index
            .get_or_try_init(|| async { self.load().await.map(Arc::new) })
            .await
            .cloned()
    }

    async fn load(&self) -> Result<PostalCodeIndex> {
        tracing::info!("Loading postal code data...");

        if let Some(cache) = &self.cache {
            match cache.read_file(CACHE_FILE_NAME).await {
                Ok(data) => match PostalCodeIndex::from_zip(&data, self.max_suggestions) {
                    Ok(index) => {
                        tracing::info!("📦 Postal code data loaded from cache");
                        self.log_stats(&index);
                        return Ok(index);
                    }
                    Err(e) => tracing::warn!("Ignoring unreadable cache: {}", e),
                },
                Err(QrBillError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!("No cached postal code data");
                }
                Err(e) => tracing::warn!("Cannot read postal code cache: {}", e),
            }
        }

        tracing::info!("⬇️  Fetching postal code data from {}", self.source.describe());
        let data = self.source.fetch().await?;
        tracing::debug!("Fetched {} bytes", data.len());

        let index = PostalCodeIndex::from_zip(&data, self.max_suggestions)?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.write_file(CACHE_FILE_NAME, &data).await {
                tracing::warn!("Cannot cache postal code data: {}", e);
            }
        }

        self.log_stats(&index);
        Ok(index)
    }

    fn log_stats(&self, index: &PostalCodeIndex) {
        let stats = index.stats();
        tracing::info!(
            "✅ Postal code index ready: {} postal codes, {} towns (loaded at {})",
            stats.postal_codes,
            stats.towns,
            stats.loaded_at.to_rfc3339()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::io::{Cursor, Write};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;
    use zip::write::{SimpleFileOptions, ZipWriter};

    fn sample_zip() -> Vec<u8> {
        let csv = "Ortschaftsname;PLZ;Zusatzziffer\nZürich;8001;0\nZürich;8002;0\nBern;3000;0\n";
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("plz.csv", SimpleFileOptions::default()).unwrap();
        zip.write_all(csv.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    struct CountingSource {
        data: Vec<u8>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PostalCodeSource for CountingSource {
        async fn fetch(&self) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.data.clone())
        }

        fn describe(&self) -> String {
            "counting source".to_string()
        }
    }

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                QrBillError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn counting_source(calls: &Arc<AtomicUsize>) -> CountingSource {
        CountingSource {
            data: sample_zip(),
            calls: calls.clone(),
        }
    }

    #[tokio::test]
    async fn test_loads_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service: PostalCodeService<_, MockStorage> =
            PostalCodeService::new(counting_source(&calls), None, 20);

        let first = service.suggest(Some("CH"), "800").await.unwrap();
        let second = service.suggest(None, "bern").await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second[0].postal_code, "3000");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_trivial_requests_do_not_load() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service: PostalCodeService<_, MockStorage> =
            PostalCodeService::new(counting_source(&calls), None, 20);

        assert!(service.suggest(Some("DE"), "Berlin").await.unwrap().is_empty());
        assert!(service.suggest(None, "  ").await.unwrap().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_download_is_cached_and_reused() {
        let calls = Arc::new(AtomicUsize::new(0));
        let storage = MockStorage::default();

        let service = PostalCodeService::new(counting_source(&calls), Some(storage.clone()), 20);
        service.index().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(storage.files.lock().await.contains_key(CACHE_FILE_NAME));

        let service = PostalCodeService::new(counting_source(&calls), Some(storage), 20);
        let result = service.suggest(None, "zürich").await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_corrupt_cache_falls_back_to_source() {
        let calls = Arc::new(AtomicUsize::new(0));
        let storage = MockStorage::default();
        storage
            .write_file(CACHE_FILE_NAME, b"broken")
            .await
            .unwrap();

        let service = PostalCodeService::new(counting_source(&calls), Some(storage.clone()), 20);
        assert_eq!(service.suggest(None, "8001").await.unwrap().len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let cached = storage.read_file(CACHE_FILE_NAME).await.unwrap();
        assert!(PostalCodeIndex::from_zip(&cached, 20).is_ok());
    }
}
