use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use book_scout::url::extract_host;
///
/// let url = Url::parse("https://BOOKS.toscrape.com/index.html").unwrap();
/// assert_eq!(extract_host(&url), Some("books.toscrape.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Key identifying a server: `host:port`, with the scheme's default port
/// filled in. Politeness delays and robots.txt rules are tracked per origin.
pub fn origin_key(url: &Url) -> Option<String> {
    let host = extract_host(url)?;
    let port = url.port_or_known_default()?;
    Some(format!("{}:{}", host, port))
}

/// Location of the robots.txt governing `url`
pub fn robots_url(url: &Url) -> Option<Url> {
    url.join("/robots.txt").ok()
}
