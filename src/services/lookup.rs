//! External catalog lookup via the Google Books volumes API
//!
//! Best-effort metadata used to pre-fill the new-book form. The lending
//! lifecycle never consults this service.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

use crate::{
    config::LookupConfig,
    error::{AppError, AppResult},
    models::book::normalize_isbn,
};

/// Metadata returned for an ISBN
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IsbnMetadata {
    pub isbn: String,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i16>,
    pub page_count: Option<i16>,
    pub synopsis: Option<String>,
    pub cover_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    volume_info: VolumeInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    publisher: Option<String>,
    published_date: Option<String>,
    page_count: Option<i32>,
    description: Option<String>,
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
}

fn year_of(published_date: &str) -> Option<i16> {
    published_date.split('-').next()?.parse().ok()
}

#[derive(Clone)]
pub struct LookupService {
    client: reqwest::Client,
    base_url: String,
}

impl LookupService {
    pub fn new(config: LookupConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.google_books_url,
        })
    }

    /// Look an ISBN up. `Ok(None)` means the ISBN is valid but unknown upstream.
    pub async fn lookup_isbn(&self, raw_isbn: &str) -> AppResult<Option<IsbnMetadata>> {
        let isbn = normalize_isbn(raw_isbn)
            .ok_or_else(|| AppError::Validation(format!("Invalid ISBN: {}", raw_isbn)))?;

        let url = format!("{}/volumes?q=isbn:{}", self.base_url, isbn);
        tracing::debug!("Catalog lookup: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Lookup(format!("Google Books request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Lookup(format!(
                "Google Books returned status {}",
                response.status()
            )));
        }

        let body: VolumesResponse = response
            .json()
            .await
            .map_err(|e| AppError::Lookup(format!("Unreadable Google Books response: {}", e)))?;

        let Some(volume) = body.items.into_iter().next() else {
            tracing::info!("No metadata found for ISBN {}", isbn);
            return Ok(None);
        };

        let info = volume.volume_info;
        Ok(Some(IsbnMetadata {
            isbn,
            title: info.title,
            authors: info.authors.map(|a| a.join(", ")),
            publisher: info.publisher,
            publication_year: info.published_date.as_deref().and_then(year_of),
            page_count: info.page_count.and_then(|p| i16::try_from(p).ok()),
            synopsis: info.description,
            cover_image_url: info.image_links.and_then(|l| l.thumbnail),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_of_full_date() {
        assert_eq!(year_of("1998-07-23"), Some(1998));
    }

    #[test]
    fn test_year_of_year_only() {
        assert_eq!(year_of("2005"), Some(2005));
    }

    #[test]
    fn test_year_of_garbage() {
        assert_eq!(year_of("unknown"), None);
    }
}
