//! Detail page extraction
//!
//! Turns one book detail page into a [`BookRecord`]. Extraction never fails:
//! a field whose element is missing gets its sentinel (or empty) value.

use crate::crawler::parser::resolve_link;
use crate::record::{BookRecord, NO_AVAILABILITY, NO_DESCRIPTION, NO_RATING};
use scraper::{ElementRef, Html, Selector};
use url::Url;

const TITLE_SELECTOR: &str = "h1";
const PRICE_SELECTOR: &str = "p.price_color";
const AVAILABILITY_SELECTOR: &str = "p.instock.availability";
const RATING_SELECTOR: &str = "div.product_main p.star-rating";
const DESCRIPTION_SELECTOR: &str = "div#product_description + p";
/// Home > Books > Category > Title
const CATEGORY_SELECTOR: &str = "ul.breadcrumb li:nth-child(3) a";
const IMAGE_SELECTOR: &str = "div.item.active img";

/// Extracts the book described by a detail page
///
/// # Arguments
///
/// * `html` - The detail page content
/// * `page_url` - The URL the page was served from; it becomes the record's `url`
///   and the base for the cover image
pub fn extract_book(html: &str, page_url: &Url) -> BookRecord {
    let document = Html::parse_document(html);

    let title = first_text(&document, TITLE_SELECTOR).unwrap_or_default();
    let price = first_text(&document, PRICE_SELECTOR).unwrap_or_default();

    let availability = select_all(&document, AVAILABILITY_SELECTOR)
        .iter()
        .flat_map(|element| element.text())
        .collect::<String>()
        .trim()
        .to_string();
    let availability = non_empty_or(availability, NO_AVAILABILITY);

    let rating = select_first(&document, RATING_SELECTOR)
        .and_then(|element| element.value().attr("class"))
        .and_then(|class| class.split_whitespace().last())
        .unwrap_or(NO_RATING)
        .to_string();

    let description = first_text(&document, DESCRIPTION_SELECTOR).unwrap_or_default();
    let description = non_empty_or(description, NO_DESCRIPTION);

    let category = first_text(&document, CATEGORY_SELECTOR).unwrap_or_default();

    let image_url = select_first(&document, IMAGE_SELECTOR)
        .and_then(|element| element.value().attr("src"))
        .and_then(|src| resolve_link(src, page_url))
        .map(String::from);

    BookRecord {
        title,
        price,
        availability,
        rating,
        description,
        category,
        image_url,
        url: page_url.to_string(),
    }
}

fn select_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Trimmed text of the first match, None when absent or blank
fn first_text(document: &Html, css: &str) -> Option<String> {
    select_first(document, css)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

fn non_empty_or(value: String, sentinel: &str) -> String {
    if value.is_empty() {
        sentinel.to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en-us">
<head><title>A Light in the Attic | Books to Scrape - Sandbox</title></head>
<body>
  <ul class="breadcrumb">
    <li><a href="../../index.html">Home</a></li>
    <li><a href="../category/books_1/index.html">Books</a></li>
    <li><a href="../category/books/poetry_23/index.html">Poetry</a></li>
    <li class="active">A Light in the Attic</li>
  </ul>
  <article class="product_page">
    <div class="row">
      <div class="col-sm-6">
        <div id="product_gallery" class="carousel">
          <div class="thumbnail">
            <div class="carousel-inner">
              <div class="item active">
                <img src="../../media/cache/fe/72/fe72f0532301ec28892ae79a629a293c.jpg" alt="A Light in the Attic" />
              </div>
            </div>
          </div>
        </div>
      </div>
      <div class="col-sm-6 product_main">
        <h1>A Light in the Attic</h1>
        <p class="price_color">£51.77</p>
        <p class="instock availability">
          <i class="icon-ok"></i>
          In stock (22 available)
        </p>
        <p class="star-rating Three">
          <i class="icon-star"></i>
        </p>
      </div>
    </div>
    <div id="product_description" class="sub-header"><h2>Product Description</h2></div>
    <p>It's hard to imagine a world without A Light in the Attic.</p>
    <div class="sub-header"><h2>Product Information</h2></div>
  </article>
</body>
</html>"#;

    fn page_url() -> Url {
        Url::parse("https://books.toscrape.com/catalogue/a-light-in-the-attic_1000/index.html")
            .unwrap()
    }

    #[test]
    fn test_extracts_every_field() {
        let record = extract_book(DETAIL_PAGE, &page_url());

        assert_eq!(record.title, "A Light in the Attic");
        assert_eq!(record.price, "£51.77");
        assert_eq!(record.availability, "In stock (22 available)");
        assert_eq!(record.rating, "Three");
        assert_eq!(
            record.description,
            "It's hard to imagine a world without A Light in the Attic."
        );
        assert_eq!(record.category, "Poetry");
        assert_eq!(
            record.image_url.as_deref(),
            Some("https://books.toscrape.com/media/cache/fe/72/fe72f0532301ec28892ae79a629a293c.jpg")
        );
        assert_eq!(record.url, page_url().as_str());
    }

    #[test]
    fn test_empty_page_degrades_to_sentinels() {
        let record = extract_book("<html><body></body></html>", &page_url());

        assert_eq!(record.title, "");
        assert_eq!(record.price, "");
        assert_eq!(record.availability, NO_AVAILABILITY);
        assert_eq!(record.rating, NO_RATING);
        assert_eq!(record.description, NO_DESCRIPTION);
        assert_eq!(record.category, "");
        assert_eq!(record.image_url, None);
        assert_eq!(record.url, page_url().as_str());
    }

    #[test]
    fn test_rating_outside_product_main_is_ignored() {
        let html = r#"<div class="reviews"><p class="star-rating Five"></p></div>
                      <div class="product_main"><h1>Quiet</h1></div>"#;
        assert_eq!(extract_book(html, &page_url()).rating, NO_RATING);
    }

    #[test]
    fn test_blank_description_uses_sentinel() {
        let html = r#"<div id="product_description"></div><p>   </p>"#;
        assert_eq!(extract_book(html, &page_url()).description, NO_DESCRIPTION);
    }

    #[test]
    fn test_description_must_follow_header() {
        let html = r#"<p>Stray paragraph</p><div id="product_description"></div>"#;
        assert_eq!(extract_book(html, &page_url()).description, NO_DESCRIPTION);
    }

    #[test]
    fn test_short_breadcrumb_has_no_category() {
        let html = r#"<ul class="breadcrumb">
            <li><a href="../../index.html">Home</a></li>
            <li class="active">Lonely</li>
        </ul>"#;
        assert_eq!(extract_book(html, &page_url()).category, "");
    }

    #[test]
    fn test_rating_is_last_class_token() {
        let html = r#"<div class="product_main"><p class="star-rating"></p></div>"#;
        assert_eq!(extract_book(html, &page_url()).rating, "star-rating");

        let html = r#"<div class="product_main"><h1>No stars</h1></div>"#;
        assert_eq!(extract_book(html, &page_url()).rating, NO_RATING);
    }
}
