//! Article-page parsing: header date, title, body text, credit, main image.
//!
//! Extraction is split in two to match how the crawler uses it. The header
//! date is cheap and decides whether the article is wanted at all;
//! [`parse_article`] does the full extraction and only runs for articles
//! inside the date window.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use tracing::debug;
use url::Url;

use super::{SelectorChain, element_text};
use crate::dates::{parse_article_date, parse_article_datetime};
use crate::utils::{absolutize, collapse_whitespace};

static HEADER_TIME: Lazy<SelectorChain> = Lazy::new(|| {
    SelectorChain::new(&[
        "article header time[datetime]",
        "header time[datetime]",
        "time[datetime]",
    ])
});
static HEADER_DATE_TEXT: Lazy<SelectorChain> =
    Lazy::new(|| SelectorChain::new(&["article header .fecha", ".fecha"]));
static TITLE: Lazy<SelectorChain> =
    Lazy::new(|| SelectorChain::new(&["article h1", "header h1", "h1"]));
static BODY_PARAGRAPHS: Lazy<SelectorChain> = Lazy::new(|| {
    SelectorChain::new(&[
        "article .cuerpo p",
        "article .article-body p",
        "article p",
    ])
});
static BODY_IMAGES: Lazy<SelectorChain> = Lazy::new(|| {
    SelectorChain::new(&["article .cuerpo img[src]", "article .article-body img[src]"])
});
static PHOTO_CREDIT: Lazy<SelectorChain> = Lazy::new(|| {
    SelectorChain::new(&[
        "article figure figcaption",
        "figcaption.pie-foto",
        ".pie-foto",
    ])
});
static MAIN_IMAGE: Lazy<SelectorChain> =
    Lazy::new(|| SelectorChain::new(&["article figure img[src]", "article img[src]"]));

static ISO_DATE_IN_CREDIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap());
static SHARE_TRAILER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)(share|compartir):.*$").unwrap());

/// Publication date as read from an article header.
#[derive(Debug, Clone)]
pub struct PublicationDate {
    /// Calendar date used for range filtering.
    pub date: NaiveDate,
    /// Full instant when the header carried one.
    pub datetime: Option<DateTime<Utc>>,
    /// Human-readable date text as printed on the page.
    pub text: Option<String>,
}

/// The article page's own extractable fields. Any of them may be missing;
/// the crawler falls back to listing-derived values.
#[derive(Debug, Clone, Default)]
pub struct ArticleBody {
    pub title: Option<String>,
    pub content: String,
    pub photo_credit: Option<String>,
    pub image: Option<String>,
}

/// Read the publication date out of the article header.
///
/// Prefers a `time[datetime]` attribute, falls back to the element's text,
/// then to a plain date text node. `None` means the article carries no
/// extractable date and is unscrapable.
pub fn extract_header_date(html: &str) -> Option<PublicationDate> {
    let doc = Html::parse_document(html);

    if let Some(time_el) = HEADER_TIME.first(&doc) {
        let attr = time_el.value().attr("datetime").unwrap_or_default();
        let text = element_text(time_el);
        let raw_fallback = text.clone().unwrap_or_default();
        let raw = if parse_article_date(attr).is_some() { attr } else { &raw_fallback };
        if let Some(date) = parse_article_date(raw) {
            return Some(PublicationDate {
                date,
                datetime: parse_article_datetime(raw),
                text,
            });
        }
    }

    let text = HEADER_DATE_TEXT.first(&doc).and_then(element_text)?;
    let date = parse_article_date(&text)?;
    Some(PublicationDate {
        date,
        datetime: parse_article_datetime(&text),
        text: Some(text),
    })
}

/// Full extraction of an article page.
///
/// Body text is the concatenation of non-blank paragraphs joined by blank
/// lines; in-body images are appended at the end as one bracketed list of
/// absolute URLs.
pub fn parse_article(html: &str, origin: &Url) -> ArticleBody {
    let doc = Html::parse_document(html);

    let title = TITLE.first(&doc).and_then(element_text);

    let paragraphs: Vec<String> = BODY_PARAGRAPHS
        .all(&doc)
        .into_iter()
        .filter_map(element_text)
        .collect();
    let mut content = paragraphs.join("\n\n");

    let body_images: Vec<String> = BODY_IMAGES
        .all(&doc)
        .into_iter()
        .filter_map(|img| img.value().attr("src"))
        .filter_map(|src| absolutize(origin, src))
        .collect();
    if !body_images.is_empty() {
        if !content.is_empty() {
            content.push_str("\n\n");
        }
        content.push_str(&format!("[{}]", body_images.join(", ")));
    }

    let photo_credit = PHOTO_CREDIT
        .first(&doc)
        .and_then(element_text)
        .and_then(|raw| clean_photo_credit(&raw));

    let image = MAIN_IMAGE
        .first(&doc)
        .and_then(|img| img.value().attr("src"))
        .and_then(|src| absolutize(origin, src));

    debug!(
        has_title = title.is_some(),
        paragraphs = paragraphs.len(),
        body_images = body_images.len(),
        "parsed article page"
    );

    ArticleBody {
        title,
        content,
        photo_credit,
        image,
    }
}

/// Clean a raw figcaption into a usable photo credit.
///
/// The caption element often embeds the publication date and the share
/// widget's text; both are stripped before whitespace is collapsed. An empty
/// remainder yields `None`.
pub fn clean_photo_credit(raw: &str) -> Option<String> {
    let without_share = SHARE_TRAILER.replace(raw, "");
    let without_dates = ISO_DATE_IN_CREDIT.replace_all(&without_share, "");
    collapse_whitespace(&without_dates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://www.portalnoticias.com").unwrap()
    }

    const ARTICLE: &str = r#"
        <article>
            <header>
                <h1>Titular de la nota</h1>
                <time datetime="2025-12-30T10:15:00-03:00">30 de diciembre de 2025</time>
            </header>
            <figure>
                <img src="/img/principal.jpg">
                <figcaption class="pie-foto">
                    Foto: Juan Pérez 2025-12-30 Share: Facebook Twitter
                </figcaption>
            </figure>
            <div class="cuerpo">
                <p>Primer párrafo.</p>
                <p>   </p>
                <p>Segundo párrafo.</p>
                <img src="/img/inline.jpg">
            </div>
        </article>
    "#;

    #[test]
    fn test_extract_header_date_from_attribute() {
        let date = extract_header_date(ARTICLE).unwrap();
        assert_eq!(date.date.to_string(), "2025-12-30");
        assert_eq!(
            date.datetime.unwrap().to_rfc3339(),
            "2025-12-30T13:15:00+00:00"
        );
        assert_eq!(date.text.as_deref(), Some("30 de diciembre de 2025"));
    }

    #[test]
    fn test_extract_header_date_falls_back_to_element_text() {
        let html = r#"<header><time datetime="hoy">Publicado 2025-12-28</time></header>"#;
        let date = extract_header_date(html).unwrap();
        assert_eq!(date.date.to_string(), "2025-12-28");
    }

    #[test]
    fn test_extract_header_date_from_plain_text_node() {
        let html = r#"<article><header><span class="fecha">2025-12-27 18:00</span></header></article>"#;
        let date = extract_header_date(html).unwrap();
        assert_eq!(date.date.to_string(), "2025-12-27");
    }

    #[test]
    fn test_extract_header_date_missing() {
        assert!(extract_header_date("<article><h1>Sin fecha</h1></article>").is_none());
        assert!(
            extract_header_date(r#"<header><time datetime="ayer">ayer</time></header>"#).is_none()
        );
    }

    #[test]
    fn test_parse_article_body_and_images() {
        let body = parse_article(ARTICLE, &origin());
        assert_eq!(
            body.content,
            "Primer párrafo.\n\nSegundo párrafo.\n\n[https://www.portalnoticias.com/img/inline.jpg]"
        );
    }

    #[test]
    fn test_parse_article_title_and_main_image() {
        let body = parse_article(ARTICLE, &origin());
        assert_eq!(body.title.as_deref(), Some("Titular de la nota"));
        assert_eq!(
            body.image.as_deref(),
            Some("https://www.portalnoticias.com/img/principal.jpg")
        );
    }

    #[test]
    fn test_parse_article_photo_credit_cleaned() {
        let body = parse_article(ARTICLE, &origin());
        assert_eq!(body.photo_credit.as_deref(), Some("Foto: Juan Pérez"));
    }

    #[test]
    fn test_parse_article_without_body_container() {
        let html = r#"<article><p>Único párrafo.</p></article>"#;
        let body = parse_article(html, &origin());
        assert_eq!(body.content, "Único párrafo.");
        assert!(body.image.is_none());
    }

    #[test]
    fn test_clean_photo_credit_removes_dates_and_share_trailer() {
        assert_eq!(
            clean_photo_credit("Foto: Ana López 2025-12-30 Share: X"),
            Some("Foto: Ana López".to_string())
        );
        assert_eq!(
            clean_photo_credit("Foto: Ana López Compartir: Facebook"),
            Some("Foto: Ana López".to_string())
        );
    }

    #[test]
    fn test_clean_photo_credit_empty_after_cleaning() {
        assert_eq!(clean_photo_credit(" 2025-12-30 Share: X "), None);
        assert_eq!(clean_photo_credit("   "), None);
    }
}
