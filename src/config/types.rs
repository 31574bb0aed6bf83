use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Listing root crawled when no seed is configured
pub const DEFAULT_SEED_URL: &str = "https://books.toscrape.com/";

/// Main configuration structure for Book-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Absolute URL of the first listing page
    #[serde(default = "default_seed_url")]
    pub seed_url: String,

    /// Maximum number of fetches in flight at once
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: u32,

    /// Minimum time between two requests to the same host (milliseconds)
    #[serde(default)]
    pub request_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How many times a transient failure is retried
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Pause between retries of the same request (milliseconds)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Whether robots.txt rules are honoured
    #[serde(default = "default_true")]
    pub obey_robots: bool,

    /// Whether detail pages reached through several listings are fetched once
    #[serde(default = "default_true")]
    pub deduplicate: bool,

    /// Host patterns links may point at (e.g. "*.example.com").
    /// Empty means the seed URL's host only.
    #[serde(default)]
    pub allowed_domains: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: default_seed_url(),
            max_concurrent_requests: default_max_concurrent_requests(),
            request_delay_ms: 0,
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            obey_robots: true,
            deduplicate: true,
            allowed_domains: Vec::new(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// On-disk encoding of the record collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    /// One pretty-printed JSON array
    #[default]
    Json,
    /// One JSON object per line
    Jsonl,
    /// SQLite database with run bookkeeping
    Sqlite,
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::Jsonl => "jsonl",
            Self::Sqlite => "sqlite",
        };
        f.write_str(name)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Where the record collection is written and read back from
    #[serde(default = "default_records_path")]
    pub records_path: PathBuf,

    /// Encoding of the record collection
    #[serde(default)]
    pub format: RecordFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            records_path: default_records_path(),
            format: RecordFormat::default(),
        }
    }
}

/// Viewer configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ViewerConfig {
    /// Symbol stripped from price text before numeric parsing
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
        }
    }
}

fn default_seed_url() -> String {
    DEFAULT_SEED_URL.to_string()
}

fn default_max_concurrent_requests() -> u32 {
    16
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

fn default_records_path() -> PathBuf {
    PathBuf::from("data/books.json")
}

fn default_currency_symbol() -> String {
    "£".to_string()
}
