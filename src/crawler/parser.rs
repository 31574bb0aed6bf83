//! Listing page parser
//!
//! A listing page links to book detail pages through its product grid and to
//! the following listing page through the pager's "next" entry. Nothing
//! else on the page is followed.

use scraper::{Html, Selector};
use url::Url;

/// Product grid entries linking to detail pages
const DETAIL_LINK_SELECTOR: &str = "article.product_pod h3 a";

/// Pager entry linking to the following listing page
const NEXT_PAGE_SELECTOR: &str = "li.next a";

/// Links discovered on one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Absolute detail-page URLs, in document order
    pub detail_links: Vec<Url>,

    /// The following listing page, absent on the last page
    pub next_page: Option<Url>,
}

/// Parses a listing page and extracts detail links and the next-page link
///
/// # Arguments
///
/// * `html` - The listing page content
/// * `page_url` - The URL the page was served from, for resolving relative links
///
/// # Example
///
/// ```
/// use book_scout::crawler::discover;
/// use url::Url;
///
/// let html = r#"<article class="product_pod"><h3><a href="a-book_1/index.html">A</a></h3></article>
///               <ul class="pager"><li class="next"><a href="page-2.html">next</a></li></ul>"#;
/// let page_url = Url::parse("https://books.toscrape.com/catalogue/page-1.html").unwrap();
/// let listing = discover(html, &page_url);
/// assert_eq!(listing.detail_links[0].as_str(), "https://books.toscrape.com/catalogue/a-book_1/index.html");
/// assert_eq!(listing.next_page.unwrap().as_str(), "https://books.toscrape.com/catalogue/page-2.html");
/// ```
pub fn discover(html: &str, page_url: &Url) -> ListingPage {
    let document = Html::parse_document(html);

    ListingPage {
        detail_links: extract_hrefs(&document, DETAIL_LINK_SELECTOR, page_url),
        next_page: extract_hrefs(&document, NEXT_PAGE_SELECTOR, page_url)
            .into_iter()
            .next(),
    }
}

/// Resolves the `href` of every element matching `css`
fn extract_hrefs(document: &Html, css: &str, base_url: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel:, data: schemes
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub(crate) fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url),
        _ => None,
    }
}
