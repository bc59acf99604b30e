//! Compiled-in run configuration.
//!
//! There are no runtime flags: a run is parameterized by editing the values
//! in the two `Default` impls below and rebuilding. [`HarvestConfig`] holds
//! the per-run knobs (date window, output path, timeouts); [`SiteProfile`]
//! describes the target site (origin, section path, pagination scheme).

use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Per-run parameters of the harvest.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Inclusive lower bound on publication date; `None` leaves it open.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on publication date; `None` leaves it open.
    pub end_date: Option<NaiveDate>,
    /// Destination for the JSON array of records; overwritten each run.
    pub output_file: PathBuf,
    /// Per-navigation ceiling applied to every page load.
    pub page_timeout: Duration,
    /// Hard cap on listing pages per run. Bounds the crawl when the site
    /// never serves an empty page and no date boundary is hit.
    pub max_pages: Option<u32>,
    /// Pause between consecutive article fetches.
    pub politeness_delay: Duration,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2025, 12, 29),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31),
            output_file: PathBuf::from("harvest.json"),
            page_timeout: Duration::from_secs(120),
            max_pages: Some(250),
            politeness_delay: Duration::from_secs(1),
        }
    }
}

/// The target site: where the section listing lives and how it paginates.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    /// Base origin used to absolutize relative links and image paths.
    pub origin: Url,
    /// Path of the paginated section listing.
    pub listing_path: String,
    /// Query parameter carrying the pagination offset.
    pub offset_param: String,
    /// Articles per listing page; the offset advances by this much.
    pub stride: u32,
    /// User agent presented on every request.
    pub user_agent: String,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            origin: Url::parse("https://www.portalnoticias.com")
                .unwrap_or_else(|_| unreachable!("static origin URL")),
            listing_path: "/actualidad".to_string(),
            offset_param: "offset".to_string(),
            stride: 10,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
                .to_string(),
        }
    }
}

impl SiteProfile {
    /// Build the listing URL for a pagination offset. Offset 0 is the plain
    /// section URL; the query parameter only appears past the first page.
    pub fn listing_url(&self, offset: u32) -> String {
        let mut url = self
            .origin
            .join(&self.listing_path)
            .unwrap_or_else(|_| self.origin.clone());
        if offset > 0 {
            url.set_query(Some(&format!("{}={}", self.offset_param, offset)));
        }
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_url_offset_zero_has_no_query() {
        let profile = SiteProfile::default();
        assert_eq!(
            profile.listing_url(0),
            "https://www.portalnoticias.com/actualidad"
        );
    }

    #[test]
    fn test_listing_url_with_offset() {
        let profile = SiteProfile::default();
        assert_eq!(
            profile.listing_url(20),
            "https://www.portalnoticias.com/actualidad?offset=20"
        );
    }

    #[test]
    fn test_default_range_is_well_formed() {
        let config = HarvestConfig::default();
        if let (Some(start), Some(end)) = (config.start_date, config.end_date) {
            assert!(start <= end);
        }
    }
}
