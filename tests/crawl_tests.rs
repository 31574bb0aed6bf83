//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock catalogue servers and test
//! the full crawl cycle end-to-end.

use book_scout::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig, ViewerConfig};
use book_scout::crawler::{run_crawl, CrawlOutcome};
use book_scout::state::PageState;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling from `seed_url`
fn create_test_config(seed_url: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: seed_url.to_string(),
            max_concurrent_requests: 4,
            request_timeout_secs: 5,
            retry_delay_ms: 10, // Very short for testing
            ..CrawlerConfig::default()
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig::default(),
        viewer: ViewerConfig::default(),
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

/// A listing page with one product per href and an optional next link
fn listing_page(detail_hrefs: &[&str], next_href: Option<&str>) -> String {
    let products: String = detail_hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<li><article class="product_pod">
                    <div class="image_container"><a href="{href}"><img src="thumb.jpg"></a></div>
                    <h3><a href="{href}" title="book">book</a></h3>
                    <p class="price_color">£1.00</p>
                </article></li>"#
            )
        })
        .collect();

    let pager = match next_href {
        Some(next) => format!(r#"<ul class="pager"><li class="next"><a href="{next}">next</a></li></ul>"#),
        None => String::new(),
    };

    format!(
        r#"<html><body><div class="side_categories"><a href="/catalogue/category/books_1/index.html">Books</a></div>
        <ol class="row">{products}</ol>{pager}</body></html>"#
    )
}

/// A detail page for one book
fn detail_page(title: &str, price: &str, category: &str) -> String {
    format!(
        r#"<html><body>
        <ul class="breadcrumb">
            <li><a href="../../index.html">Home</a></li>
            <li><a href="../category/books_1/index.html">Books</a></li>
            <li><a href="../category/books/x_2/index.html">{category}</a></li>
            <li class="active">{title}</li>
        </ul>
        <div class="item active"><img src="../../media/cache/{title}.jpg"></div>
        <div class="product_main">
            <h1>{title}</h1>
            <p class="price_color">{price}</p>
            <p class="instock availability"><i class="icon-ok"></i> In stock (5 available)</p>
            <p class="star-rating Four"></p>
        </div>
        <div id="product_description" class="sub-header"><h2>Product Description</h2></div>
        <p>All about {title}.</p>
        </body></html>"#
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn crawl(config: Config) -> CrawlOutcome {
    run_crawl(config).await.expect("crawl should complete")
}

fn sorted_titles(outcome: &CrawlOutcome) -> Vec<String> {
    let mut titles: Vec<String> = outcome.records.iter().map(|r| r.title.clone()).collect();
    titles.sort();
    titles
}

#[tokio::test]
async fn test_full_crawl_follows_pagination() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/",
        listing_page(
            &["catalogue/alpha_1/index.html", "catalogue/beta_2/index.html"],
            Some("catalogue/page-2.html"),
        ),
    )
    .await;
    mount_page(
        &server,
        "/catalogue/page-2.html",
        listing_page(&["gamma_3/index.html"], None),
    )
    .await;
    mount_page(
        &server,
        "/catalogue/alpha_1/index.html",
        detail_page("Alpha", "£10.00", "Fiction"),
    )
    .await;
    mount_page(
        &server,
        "/catalogue/beta_2/index.html",
        detail_page("Beta", "£20.00", "Fiction"),
    )
    .await;
    mount_page(
        &server,
        "/catalogue/gamma_3/index.html",
        detail_page("Gamma", "£12.00", "Poetry"),
    )
    .await;

    let outcome = crawl(create_test_config(&format!("{}/", base_url))).await;

    assert_eq!(sorted_titles(&outcome), ["Alpha", "Beta", "Gamma"]);
    assert_eq!(outcome.statistics.listing_pages, 2);
    assert_eq!(outcome.statistics.detail_pages, 3);
    assert_eq!(outcome.statistics.records, 3);
    assert_eq!(outcome.statistics.count(PageState::Processed), 5);

    let gamma = outcome
        .records
        .iter()
        .find(|r| r.title == "Gamma")
        .expect("Gamma should be extracted");
    assert_eq!(gamma.url, format!("{}/catalogue/gamma_3/index.html", base_url));
    assert_eq!(gamma.price, "£12.00");
    assert_eq!(gamma.category, "Poetry");
    assert_eq!(gamma.rating, "Four");
    assert_eq!(gamma.availability, "In stock (5 available)");
    assert_eq!(gamma.description, "All about Gamma.");
    assert_eq!(
        gamma.image_url.as_deref(),
        Some(format!("{}/media/cache/Gamma.jpg", base_url).as_str())
    );
}

#[tokio::test]
async fn test_dead_detail_page_is_skipped() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        listing_page(&["alive_1/index.html", "gone_2/index.html"], None),
    )
    .await;
    mount_page(
        &server,
        "/alive_1/index.html",
        detail_page("Alive", "£3.00", "Travel"),
    )
    .await;
    // gone_2 is not mounted: wiremock answers 404

    let outcome = crawl(create_test_config(&format!("{}/", server.uri()))).await;

    assert_eq!(sorted_titles(&outcome), ["Alive"]);
    assert_eq!(outcome.statistics.count(PageState::DeadLink), 1);
    assert_eq!(outcome.statistics.error_count(), 1);
}

#[tokio::test]
async fn test_robots_disallow_is_obeyed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("User-agent: *\nDisallow: /secret/", "text/plain"),
        )
        .mount(&server)
        .await;

    mount_page(
        &server,
        "/",
        listing_page(&["public_1/index.html", "secret/hidden_2/index.html"], None),
    )
    .await;
    mount_page(
        &server,
        "/public_1/index.html",
        detail_page("Public", "£4.00", "Travel"),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/secret/hidden_2/index.html"))
        .respond_with(html(detail_page("Hidden", "£4.00", "Travel")))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = crawl(create_test_config(&format!("{}/", server.uri()))).await;

    assert_eq!(sorted_titles(&outcome), ["Public"]);
    assert_eq!(outcome.statistics.count(PageState::Disallowed), 1);
}

#[tokio::test]
async fn test_robots_ignored_when_disabled() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("User-agent: *\nDisallow: /", "text/plain"))
        .expect(0)
        .mount(&server)
        .await;

    mount_page(&server, "/", listing_page(&["one_1/index.html"], None)).await;
    mount_page(&server, "/one_1/index.html", detail_page("One", "£1.00", "Art")).await;

    let mut config = create_test_config(&format!("{}/", server.uri()));
    config.crawler.obey_robots = false;

    let outcome = crawl(config).await;
    assert_eq!(sorted_titles(&outcome), ["One"]);
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let server = MockServer::start().await;

    mount_page(&server, "/", listing_page(&["flaky_1/index.html"], None)).await;

    // First request fails, the retry succeeds
    Mock::given(method("GET"))
        .and(path("/flaky_1/index.html"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/flaky_1/index.html",
        detail_page("Flaky", "£9.99", "Mystery"),
    )
    .await;

    let outcome = crawl(create_test_config(&format!("{}/", server.uri()))).await;

    assert_eq!(sorted_titles(&outcome), ["Flaky"]);
    assert_eq!(outcome.statistics.error_count(), 0);
}

#[tokio::test]
async fn test_persistent_failure_gives_up() {
    let server = MockServer::start().await;

    mount_page(&server, "/", listing_page(&["broken_1/index.html"], None)).await;

    Mock::given(method("GET"))
        .and(path("/broken_1/index.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3) // first attempt + 2 retries
        .mount(&server)
        .await;

    let outcome = crawl(create_test_config(&format!("{}/", server.uri()))).await;

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.statistics.count(PageState::Failed), 1);
}

#[tokio::test]
async fn test_duplicate_detail_links_fetched_once() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        listing_page(&["twice_1/index.html", "twice_1/index.html"], Some("page-2.html")),
    )
    .await;
    mount_page(
        &server,
        "/page-2.html",
        listing_page(&["twice_1/index.html"], None),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/twice_1/index.html"))
        .respond_with(html(detail_page("Twice", "£2.00", "Humor")))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = crawl(create_test_config(&format!("{}/", server.uri()))).await;

    assert_eq!(sorted_titles(&outcome), ["Twice"]);
    assert_eq!(outcome.statistics.duplicates_skipped, 2);
}

#[tokio::test]
async fn test_duplicates_kept_without_deduplication() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        listing_page(&["twice_1/index.html", "twice_1/index.html"], None),
    )
    .await;
    mount_page(
        &server,
        "/twice_1/index.html",
        detail_page("Twice", "£2.00", "Humor"),
    )
    .await;

    let mut config = create_test_config(&format!("{}/", server.uri()));
    config.crawler.deduplicate = false;

    let outcome = crawl(config).await;
    assert_eq!(sorted_titles(&outcome), ["Twice", "Twice"]);
}

#[tokio::test]
async fn test_pagination_cycle_terminates() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        listing_page(&["a_1/index.html"], Some("page-2.html")),
    )
    .await;

    // The last page points back at the first one
    Mock::given(method("GET"))
        .and(path("/page-2.html"))
        .respond_with(html(listing_page(&["b_2/index.html"], Some("/"))))
        .expect(1)
        .mount(&server)
        .await;

    mount_page(&server, "/a_1/index.html", detail_page("A", "£1.00", "Art")).await;
    mount_page(&server, "/b_2/index.html", detail_page("B", "£2.00", "Art")).await;

    let outcome = crawl(create_test_config(&format!("{}/", server.uri()))).await;

    assert_eq!(sorted_titles(&outcome), ["A", "B"]);
    assert_eq!(outcome.statistics.listing_pages, 2);
}

#[tokio::test]
async fn test_offsite_links_are_not_followed() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        listing_page(
            &["local_1/index.html", "http://offsite.invalid/catalogue/far_2/index.html"],
            None,
        ),
    )
    .await;
    mount_page(
        &server,
        "/local_1/index.html",
        detail_page("Local", "£5.00", "Science"),
    )
    .await;

    let outcome = crawl(create_test_config(&format!("{}/", server.uri()))).await;

    assert_eq!(sorted_titles(&outcome), ["Local"]);
    assert_eq!(outcome.statistics.offsite_skipped, 1);
    assert_eq!(outcome.statistics.detail_pages, 1);
}

#[tokio::test]
async fn test_non_html_detail_is_a_content_mismatch() {
    let server = MockServer::start().await;

    mount_page(&server, "/", listing_page(&["cover_1/image.jpg"], None)).await;
    Mock::given(method("GET"))
        .and(path("/cover_1/image.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0xFF, 0xD8, 0xFF], "image/jpeg"))
        .mount(&server)
        .await;

    let outcome = crawl(create_test_config(&format!("{}/", server.uri()))).await;

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.statistics.count(PageState::ContentMismatch), 1);
}

#[tokio::test]
async fn test_missing_fields_use_sentinels() {
    let server = MockServer::start().await;

    mount_page(&server, "/", listing_page(&["bare_1/index.html"], None)).await;
    mount_page(
        &server,
        "/bare_1/index.html",
        "<html><body><h1>Bare</h1></body></html>".to_string(),
    )
    .await;

    let outcome = crawl(create_test_config(&format!("{}/", server.uri()))).await;

    assert_eq!(outcome.records.len(), 1);
    let record = &outcome.records[0];
    assert_eq!(record.title, "Bare");
    assert_eq!(record.availability, book_scout::record::NO_AVAILABILITY);
    assert_eq!(record.rating, book_scout::record::NO_RATING);
    assert_eq!(record.description, book_scout::record::NO_DESCRIPTION);
    assert_eq!(record.image_url, None);
}
