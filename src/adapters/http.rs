use crate::domain::ports::PostalCodeSource;
use crate::utils::error::{QrBillError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_SOURCE_URL: &str = "https://data.geo.admin.ch/ch.swisstopo-vd.ortschaftenverzeichnis_plz/ortschaftenverzeichnis_plz/ortschaftenverzeichnis_plz_2056.csv.zip";

/// Downloads the postal code archive over HTTP(S). Redirects are followed.
#[derive(Debug, Clone)]
pub struct HttpPostalCodeSource {
    client: Client,
    url: String,
}

impl HttpPostalCodeSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PostalCodeSource for HttpPostalCodeSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::debug!("Making HTTP request to: {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        tracing::debug!("HTTP response status: {}", response.status());
        if !response.status().is_success() {
            return Err(QrBillError::PostalCodeData {
                message: format!("{} returned HTTP status {}", self.url, response.status()),
            });
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
