//! Swiss postal code directory: decoding of the published zip archive and
//! substring suggestions over two sorted views of the data.

use crate::domain::model::PostalCode;
use crate::utils::error::{QrBillError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub const DEFAULT_MAX_SUGGESTIONS: usize = 20;

/// Searches by "contains" only kick in for substrings longer than this.
const MIN_CONTAINS_SEARCH_LENGTH: usize = 2;
/// Prefix matches at or above this count suppress the "contains" search.
const SUFFICIENT_PREFIX_MATCHES: usize = 6;

/// The town "Zürich" is always present; its umlaut reveals the encoding.
const ENCODING_MARKER: &str = "Zürich";

#[derive(Debug, Clone, PartialEq, Eq)]
struct PostalCodeEntry {
    code: String,
    town: String,
    town_lowercase: String,
}

impl PostalCodeEntry {
    fn new(code: &str, town: &str) -> Self {
        Self {
            code: code.to_string(),
            town: town.to_string(),
            town_lowercase: town.to_lowercase(),
        }
    }

    fn same_place(&self, other: &Self) -> bool {
        self.code == other.code && self.town_lowercase == other.town_lowercase
    }

    fn to_postal_code(&self) -> PostalCode {
        PostalCode {
            postal_code: self.code.clone(),
            town: self.town.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub postal_codes: usize,
    pub towns: usize,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PostalCodeIndex {
    sorted_by_code: Vec<PostalCodeEntry>,
    sorted_by_town: Vec<PostalCodeEntry>,
    max_suggestions: usize,
    loaded_at: DateTime<Utc>,
}

impl PostalCodeIndex {
    /// Builds the index from (postal code, town) pairs.
    pub fn from_entries<I, S>(entries: I, max_suggestions: usize) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let entries: Vec<PostalCodeEntry> = entries
            .into_iter()
            .map(|(code, town)| PostalCodeEntry::new(code.as_ref(), town.as_ref()))
            .collect();

        let mut sorted_by_code = entries.clone();
        sorted_by_code.sort_by(|a, b| {
            a.code
                .cmp(&b.code)
                .then_with(|| a.town_lowercase.cmp(&b.town_lowercase))
        });
        sorted_by_code.dedup_by(|current, previous| current.same_place(previous));

        let mut sorted_by_town = entries;
        sorted_by_town.sort_by(|a, b| {
            a.town_lowercase
                .cmp(&b.town_lowercase)
                .then_with(|| a.code.cmp(&b.code))
        });
        sorted_by_town.dedup_by(|current, previous| current.same_place(previous));

        Self {
            sorted_by_code,
            sorted_by_town,
            max_suggestions,
            loaded_at: Utc::now(),
        }
    }

    /// Decodes the zip archive published by swisstopo.
    pub fn from_zip(zip_data: &[u8], max_suggestions: usize) -> Result<Self> {
        let texts = read_zip_entries(zip_data)?;

        // 編碼在 UTF-8 與 ISO-8859-1 之間變動，兩種都試
        let decoded = decode_entries(&texts, Charset::Utf8)
            .or_else(|| decode_entries(&texts, Charset::Latin1))
            .ok_or_else(|| QrBillError::PostalCodeData {
                message: "Invalid encoding of postal code data".to_string(),
            })?;

        let mut pairs = Vec::new();
        for text in &decoded {
            parse_csv(text, &mut pairs)?;
        }

        tracing::debug!("Parsed {} postal code records", pairs.len());
        Ok(Self::from_entries(pairs, max_suggestions))
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            postal_codes: self.sorted_by_code.len(),
            towns: self.sorted_by_town.len(),
            loaded_at: self.loaded_at,
        }
    }

    /// Suggests postal codes (numeric input) or towns (other input) matching `substring`.
    ///
    /// Only Swiss data is available: any other non-empty country yields no suggestions.
    pub fn suggest(&self, country: Option<&str>, substring: &str) -> Vec<PostalCode> {
        if !is_swiss_or_unspecified(country) {
            return Vec::new();
        }

        let substring = substring.trim();
        if substring.is_empty() {
            return Vec::new();
        }

        if substring.chars().all(|c| c.is_ascii_digit()) {
            self.collect_matches(&self.sorted_by_code, substring, |e| e.code.as_str())
        } else {
            let lowercase = substring.to_lowercase();
            self.collect_matches(&self.sorted_by_town, &lowercase, |e| e.town_lowercase.as_str())
        }
    }

    fn collect_matches(
        &self,
        sorted: &[PostalCodeEntry],
        needle: &str,
        key: fn(&PostalCodeEntry) -> &str,
    ) -> Vec<PostalCode> {
        // 先找以 needle 開頭的項目
        let start = sorted.partition_point(|entry| key(entry) < needle);
        let mut matches: Vec<&PostalCodeEntry> = sorted[start..]
            .iter()
            .take_while(|entry| key(entry).starts_with(needle))
            .take(self.max_suggestions)
            .collect();

        if needle.chars().count() > MIN_CONTAINS_SEARCH_LENGTH
            && matches.len() < SUFFICIENT_PREFIX_MATCHES
        {
            for entry in sorted {
                if matches.len() >= self.max_suggestions {
                    break;
                }
                if key(entry).contains(needle) && !matches.contains(&entry) {
                    matches.push(entry);
                }
            }
        }

        matches.into_iter().map(PostalCodeEntry::to_postal_code).collect()
    }
}

pub(crate) fn is_swiss_or_unspecified(country: Option<&str>) -> bool {
    match country.map(str::trim) {
        None | Some("") => true,
        Some(country) => country.eq_ignore_ascii_case("CH"),
    }
}

#[derive(Debug, Clone, Copy)]
enum Charset {
    Utf8,
    Latin1,
}

fn read_zip_entries(zip_data: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut archive = ZipArchive::new(Cursor::new(zip_data))?;
    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        entries.push(data);
    }
    Ok(entries)
}

/// Returns `None` if the bytes cannot be decoded or the marker town is missing.
fn decode_entries(entries: &[Vec<u8>], charset: Charset) -> Option<Vec<String>> {
    let decoded: Vec<String> = entries
        .iter()
        .map(|bytes| match charset {
            Charset::Utf8 => String::from_utf8(bytes.clone()).ok(),
            // ISO-8859-1 對應 Unicode 前 256 個碼位
            Charset::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        })
        .collect::<Option<_>>()?;

    decoded
        .iter()
        .any(|text| text.contains(ENCODING_MARKER))
        .then_some(decoded)
}

/// Columns: town, postal code, further columns ignored. The first line is a header.
/// Records with a blank town or postal code are skipped.
fn parse_csv(text: &str, pairs: &mut Vec<(String, String)>) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    for record in reader.records() {
        let record = record?;
        match (record.get(0), record.get(1)) {
            (Some(town), Some(code)) if !town.trim().is_empty() && !code.trim().is_empty() => {
                pairs.push((code.to_string(), town.to_string()));
            }
            _ => tracing::trace!("Skipping incomplete postal code record {:?}", record),
        }
    }
    Ok(())
}
