//! Data models for harvested articles.
//!
//! Two shapes move through the crawl:
//! - [`ArticleLink`]: one entry of a listing page. Ephemeral; consumed
//!   immediately by article extraction and never persisted on its own.
//! - [`ArticleRecord`]: the final, immutable record for one article that
//!   passed the date filter. Appended to the result collection and serialized
//!   as a JSON array at the end of the run.
//!
//! Records serialize with camelCase field names to match the JSON consumed
//! downstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single article entry parsed from a listing page.
///
/// All URLs are absolute by the time a link leaves the listing parser.
#[derive(Debug, Clone)]
pub struct ArticleLink {
    /// Absolute URL of the article page.
    pub href: String,
    /// Headline as shown on the listing.
    pub title: String,
    /// Teaser paragraph from the listing, possibly empty.
    pub description: String,
    /// Listing thumbnail, when present.
    pub image: Option<String>,
}

/// A fully extracted article that passed the date filter.
///
/// Listing-derived fields (`href`, and the title/description/image fallbacks)
/// are merged with the article page's own values at construction; the struct
/// is never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    /// The listing link that led to this article.
    pub href: String,
    /// Article headline; the article page wins over the listing when both exist.
    pub title: String,
    /// Teaser/description carried over from the listing.
    pub description: String,
    /// Main representative image, absolute URL.
    pub image: Option<String>,
    /// Machine-readable publication instant, when the header carried one.
    pub datetime: Option<DateTime<Utc>>,
    /// Human-readable date text as printed in the article header.
    pub date_text: Option<String>,
    /// Cleaned photo credit / byline, when present.
    pub photo_credit: Option<String>,
    /// Full body text: paragraphs joined by blank lines, in-body image URLs
    /// appended as one bracketed list.
    pub content: String,
    /// URL the content was actually extracted from.
    pub url: String,
    /// Instant this record was created.
    pub scraped_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ArticleRecord {
        ArticleRecord {
            href: "https://www.portalnoticias.com/actualidad/nota-1.html".to_string(),
            title: "Título de prueba".to_string(),
            description: "Bajada de prueba".to_string(),
            image: Some("https://cdn.portalnoticias.com/img/1.jpg".to_string()),
            datetime: Some(
                DateTime::parse_from_rfc3339("2025-12-30T13:15:00+00:00")
                    .unwrap()
                    .with_timezone(&Utc),
            ),
            date_text: Some("30 de diciembre de 2025".to_string()),
            photo_credit: Some("Foto: Juan Pérez".to_string()),
            content: "Primer párrafo.\n\nSegundo párrafo.".to_string(),
            url: "https://www.portalnoticias.com/actualidad/nota-1.html".to_string(),
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        assert!(json.contains("\"dateText\""));
        assert!(json.contains("\"photoCredit\""));
        assert!(json.contains("\"scrapedAt\""));
        assert!(!json.contains("\"date_text\""));
    }

    #[test]
    fn test_record_round_trips() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let back: ArticleRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.title, record.title);
        assert_eq!(back.datetime, record.datetime);
    }

    #[test]
    fn test_record_with_absent_optionals() {
        let mut record = sample_record();
        record.image = None;
        record.datetime = None;
        record.photo_credit = None;
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"datetime\":null"));
        let back: ArticleRecord = serde_json::from_str(&json).unwrap();
        assert!(back.photo_credit.is_none());
    }
}
