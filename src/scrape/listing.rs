//! Listing-page parsing: one paginated section page into [`ArticleLink`]s.

use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::{SelectorChain, element_text};
use crate::models::ArticleLink;
use crate::utils::absolutize;

static CONTAINER: Lazy<SelectorChain> =
    Lazy::new(|| SelectorChain::new(&["section.listado", "main .listado", "main"]));
static ITEM: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static LINK: Lazy<SelectorChain> = Lazy::new(|| SelectorChain::new(&["a[href]"]));
static TITLE: Lazy<SelectorChain> = Lazy::new(|| SelectorChain::new(&["h2", "h3", "a[href]"]));
static DESCRIPTION: Lazy<SelectorChain> = Lazy::new(|| SelectorChain::new(&["p.bajada", "p"]));
static IMAGE: Lazy<SelectorChain> = Lazy::new(|| SelectorChain::new(&["img[src]"]));

/// Parse a listing page into its article links, in page order.
///
/// Items without a resolvable href are dropped, relative hrefs and image
/// paths are absolutized against the site origin, and repeated hrefs (the
/// same article teased in two slots) collapse to their first occurrence.
/// An empty result is meaningful to the caller: it signals end-of-pagination.
pub fn parse_listing(html: &str, origin: &Url) -> Vec<ArticleLink> {
    let doc = Html::parse_document(html);
    let Some(container) = CONTAINER.first(&doc) else {
        debug!("no listing container in document");
        return Vec::new();
    };

    let links: Vec<ArticleLink> = container
        .select(&ITEM)
        .filter_map(|item| {
            let href = LINK
                .first_within(item)
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| absolutize(origin, href))?;
            let title = TITLE
                .first_within(item)
                .and_then(element_text)
                .unwrap_or_default();
            let description = DESCRIPTION
                .first_within(item)
                .and_then(element_text)
                .unwrap_or_default();
            let image = IMAGE
                .first_within(item)
                .and_then(|img| img.value().attr("src"))
                .and_then(|src| absolutize(origin, src));
            Some(ArticleLink {
                href,
                title,
                description,
                image,
            })
        })
        .unique_by(|link| link.href.clone())
        .collect();

    debug!(count = links.len(), "parsed listing links");
    links
}

/// Whether the document contains the listing container at all. Used when
/// probing the next pagination offset.
pub fn has_listing_container(html: &str) -> bool {
    let doc = Html::parse_document(html);
    CONTAINER.first(&doc).is_some()
}
