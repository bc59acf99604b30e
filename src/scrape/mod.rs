//! DOM extraction for listing and article pages.
//!
//! The site's markup drifts, so nothing is extracted through a single
//! selector: every extraction point is an ordered [`SelectorChain`] tried in
//! sequence until one yields a result. Parsing is synchronous and pure —
//! functions take the HTML string and return plain data, so the crawl loop
//! never holds a parsed document across an await point.

use scraper::{ElementRef, Html, Selector};

use crate::utils::collapse_whitespace;

pub mod article;
pub mod listing;

/// An ordered list of selectors tried until one matches.
pub(crate) struct SelectorChain {
    selectors: Vec<Selector>,
}

impl SelectorChain {
    /// Parse a chain from selector strings. Panics on an invalid selector;
    /// chains are only ever built from static strings.
    pub(crate) fn new(raw: &[&str]) -> Self {
        Self {
            selectors: raw
                .iter()
                .map(|s| Selector::parse(s).unwrap())
                .collect(),
        }
    }

    /// First element matched by the first selector that matches anything.
    pub(crate) fn first<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|sel| doc.select(sel).next())
    }

    /// Like [`SelectorChain::first`], scoped to an element subtree.
    pub(crate) fn first_within<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|sel| scope.select(sel).next())
    }

    /// All elements matched by the first selector with a non-empty result.
    pub(crate) fn all<'a>(&self, doc: &'a Html) -> Vec<ElementRef<'a>> {
        for sel in &self.selectors {
            let matches: Vec<_> = doc.select(sel).collect();
            if !matches.is_empty() {
                return matches;
            }
        }
        Vec::new()
    }
}

/// Collapsed text content of an element, `None` when blank.
pub(crate) fn element_text(el: ElementRef<'_>) -> Option<String> {
    collapse_whitespace(&el.text().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_falls_back_in_order() {
        let doc = Html::parse_document("<div><span class='b'>fallback</span></div>");
        let chain = SelectorChain::new(&["span.a", "span.b"]);
        let el = chain.first(&doc).unwrap();
        assert_eq!(element_text(el).unwrap(), "fallback");
    }

    #[test]
    fn test_chain_prefers_earlier_selector() {
        let doc = Html::parse_document(
            "<div><span class='a'>primary</span><span class='b'>fallback</span></div>",
        );
        let chain = SelectorChain::new(&["span.a", "span.b"]);
        assert_eq!(element_text(chain.first(&doc).unwrap()).unwrap(), "primary");
    }

    #[test]
    fn test_all_uses_first_matching_selector_only() {
        let doc = Html::parse_document(
            "<div class='body'><p>one</p><p>two</p></div><p>outside</p>",
        );
        let chain = SelectorChain::new(&["div.body p", "p"]);
        assert_eq!(chain.all(&doc).len(), 2);
    }

    #[test]
    fn test_element_text_blank_is_none() {
        let doc = Html::parse_document("<p>   </p>");
        let chain = SelectorChain::new(&["p"]);
        assert_eq!(element_text(chain.first(&doc).unwrap()), None);
    }
}
