//! The paginated, date-bounded crawl-and-extract state machine.
//!
//! One run walks the section listing newest-first: load a listing page,
//! visit each linked article, keep the ones inside the date window, advance
//! the offset, repeat. Termination is empirical — an empty listing page, an
//! unloadable next page, an article older than the window (listings are
//! newest-first, so everything after it is older too), or the configured
//! page cap.
//!
//! Every transition takes the session by `&mut`; nothing about the crawl
//! lives outside the loop's local state, and the accumulated records survive
//! every exit path, including a fatal listing failure.

use chrono::Utc;
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

use crate::config::{HarvestConfig, SiteProfile};
use crate::dates::{DateDisposition, DateRange};
use crate::models::{ArticleLink, ArticleRecord};
use crate::retry::RetryPolicy;
use crate::scrape::{article, listing};
use crate::session::PageSource;
use crate::utils::truncate_for_log;

/// Attempts at loading one listing offset before the run is declared failed.
const LISTING_ATTEMPTS: usize = 3;
const LISTING_RETRY_DELAY: Duration = Duration::from_secs(2);
/// Probes for the listing container when advancing to the next offset.
const ADVANCE_ATTEMPTS: usize = 5;
const ADVANCE_POLL_DELAY: Duration = Duration::from_millis(1500);
/// Retries for a single article before it is skipped.
const ARTICLE_RETRIES: usize = 2;
const ARTICLE_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Outcome of visiting one article. Exhaustive at every call site: a record
/// to keep, an article to pass over, or the signal to halt the whole crawl.
#[derive(Debug)]
pub enum FetchOutcome {
    Record(ArticleRecord),
    Skip,
    StopCrawl,
}

/// Why the crawl stopped. Every variant except `ListingFailed` is a normal
/// end of the run.
#[derive(Debug)]
pub enum StopReason {
    /// A listing page came back empty: end of pagination.
    EndOfListings,
    /// An article older than the window's start was encountered.
    DateBoundary,
    /// The configured `max_pages` cap was reached.
    PageLimit,
    /// Listing retrieval failed after all retries.
    ListingFailed(Box<dyn Error>),
}

/// What one run produced. Records are present regardless of how the run
/// ended; partial results always beat no results.
#[derive(Debug)]
pub struct HarvestReport {
    pub records: Vec<ArticleRecord>,
    pub pages_fetched: u32,
    pub stop: StopReason,
}

enum CrawlState {
    LoadingPage,
    ScrapingArticles(Vec<ArticleLink>),
    Advancing,
    Stopped(StopReason),
}

/// A listing page that rendered but contained no article links. Retried like
/// a failure while attempts remain; once the budget is spent it resolves to
/// an empty listing, which is the normal end-of-pagination signal.
#[derive(Debug)]
struct EmptyListing;

impl fmt::Display for EmptyListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listing page rendered with zero article links")
    }
}

impl Error for EmptyListing {}

/// The listing container never showed up while probing the next offset.
#[derive(Debug)]
struct ContainerMissing;

impl fmt::Display for ContainerMissing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listing container not present in rendered page")
    }
}

impl Error for ContainerMissing {}

/// Retrieve and parse the listing at `offset`.
///
/// `Ok(vec![])` means end-of-pagination; `Err` means the page kept failing
/// to render and the run cannot continue.
#[instrument(level = "info", skip(session, profile))]
pub async fn fetch_listing<S: PageSource>(
    session: &mut S,
    profile: &SiteProfile,
    offset: u32,
) -> Result<Vec<ArticleLink>, Box<dyn Error>> {
    let url = profile.listing_url(offset);
    let policy = RetryPolicy::fixed(LISTING_ATTEMPTS - 1, LISTING_RETRY_DELAY);

    let result = policy
        .run("listing", async || {
            let html = session.render(&url).await?;
            let links = listing::parse_listing(&html, &profile.origin);
            if links.is_empty() {
                return Err(Box::new(EmptyListing) as Box<dyn Error>);
            }
            Ok(links)
        })
        .await;

    match result {
        Ok(links) => {
            info!(offset, count = links.len(), "listing parsed");
            Ok(links)
        }
        Err(e) if e.downcast_ref::<EmptyListing>().is_some() => {
            info!(offset, "listing empty after retries; end of pagination");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Probe the next pagination offset. `false` means "no more pages" and is a
/// normal stop, distinct from an error.
#[instrument(level = "info", skip(session, profile))]
pub async fn advance_page<S: PageSource>(
    session: &mut S,
    profile: &SiteProfile,
    next_offset: u32,
) -> bool {
    let url = profile.listing_url(next_offset);
    let policy = RetryPolicy::fixed(ADVANCE_ATTEMPTS - 1, ADVANCE_POLL_DELAY);

    let result = policy
        .run("advance", async || {
            let html = session.render(&url).await?;
            if listing::has_listing_container(&html) {
                Ok(())
            } else {
                Err(Box::new(ContainerMissing) as Box<dyn Error>)
            }
        })
        .await;

    match result {
        Ok(()) => true,
        Err(e) => {
            info!(next_offset, error = %e, "next page unavailable");
            false
        }
    }
}

/// Visit one article and decide its fate.
///
/// Two phases: read the cheap header date first, and only pay for full body
/// extraction when the article is inside the window. A date older than the
/// window start yields [`FetchOutcome::StopCrawl`]; a missing date or a date
/// past the window end yields [`FetchOutcome::Skip`]. Extraction errors are
/// retried and degrade to a skip, never a run failure.
#[instrument(level = "info", skip_all, fields(url = %link.href))]
pub async fn fetch_article<S: PageSource>(
    session: &mut S,
    profile: &SiteProfile,
    range: &DateRange,
    link: &ArticleLink,
) -> FetchOutcome {
    let policy = RetryPolicy::fixed(ARTICLE_RETRIES, ARTICLE_RETRY_DELAY);

    let result = policy
        .run("article", async || {
            let html = session.render(&link.href).await?;

            let Some(pub_date) = article::extract_header_date(&html) else {
                info!("no extractable date; skipping");
                return Ok(FetchOutcome::Skip);
            };
            match range.classify(pub_date.date) {
                DateDisposition::BeforeStart => {
                    info!(date = %pub_date.date, "older than window start; stopping crawl");
                    return Ok(FetchOutcome::StopCrawl);
                }
                DateDisposition::AfterEnd => {
                    info!(date = %pub_date.date, "past window end; skipping");
                    return Ok(FetchOutcome::Skip);
                }
                DateDisposition::InRange => {}
            }

            let body = article::parse_article(&html, &profile.origin);
            let record = ArticleRecord {
                href: link.href.clone(),
                title: body.title.unwrap_or_else(|| link.title.clone()),
                description: link.description.clone(),
                image: body.image.or_else(|| link.image.clone()),
                datetime: pub_date.datetime,
                date_text: pub_date.text,
                photo_credit: body.photo_credit,
                content: body.content,
                url: link.href.clone(),
                scraped_at: Utc::now(),
            };
            info!(
                date = %pub_date.date,
                content_preview = %truncate_for_log(&record.content, 120),
                "article extracted"
            );
            Ok(FetchOutcome::Record(record))
        })
        .await;

    result.unwrap_or_else(|e| {
        warn!(error = %e, "article extraction exhausted retries; skipping");
        FetchOutcome::Skip
    })
}

/// Drive a full crawl: listing pages newest-first, each article classified
/// and extracted, until a stop condition fires.
#[instrument(level = "info", skip_all)]
pub async fn run<S: PageSource>(
    session: &mut S,
    config: &HarvestConfig,
    profile: &SiteProfile,
) -> HarvestReport {
    let range = DateRange::new(config.start_date, config.end_date);
    let mut records: Vec<ArticleRecord> = Vec::new();
    let mut offset = 0u32;
    let mut pages_fetched = 0u32;
    let mut state = CrawlState::LoadingPage;

    let stop = loop {
        state = match state {
            CrawlState::LoadingPage => match fetch_listing(session, profile, offset).await {
                Ok(links) if links.is_empty() => {
                    CrawlState::Stopped(StopReason::EndOfListings)
                }
                Ok(links) => {
                    pages_fetched += 1;
                    CrawlState::ScrapingArticles(links)
                }
                Err(e) => CrawlState::Stopped(StopReason::ListingFailed(e)),
            },
            CrawlState::ScrapingArticles(links) => {
                let mut next = CrawlState::Advancing;
                for (i, link) in links.iter().enumerate() {
                    if i > 0 {
                        sleep(config.politeness_delay).await;
                    }
                    match fetch_article(session, profile, &range, link).await {
                        FetchOutcome::Record(record) => records.push(record),
                        FetchOutcome::Skip => {}
                        FetchOutcome::StopCrawl => {
                            next = CrawlState::Stopped(StopReason::DateBoundary);
                            break;
                        }
                    }
                }
                next
            }
            CrawlState::Advancing => {
                if config.max_pages.is_some_and(|cap| pages_fetched >= cap) {
                    info!(pages_fetched, "page cap reached");
                    CrawlState::Stopped(StopReason::PageLimit)
                } else {
                    offset += profile.stride;
                    if advance_page(session, profile, offset).await {
                        CrawlState::LoadingPage
                    } else {
                        CrawlState::Stopped(StopReason::EndOfListings)
                    }
                }
            }
            CrawlState::Stopped(reason) => break reason,
        };
    };

    info!(
        records = records.len(),
        pages_fetched,
        stop = ?stop,
        "crawl finished"
    );
    HarvestReport {
        records,
        pages_fetched,
        stop,
    }
}
