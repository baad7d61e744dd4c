//! Network fetching.
//!
//! One-shot, best-effort HTTP GETs with a fixed browser header set and a
//! fixed timeout. Every miss (transport error, timeout, non-200, empty body)
//! is reported as `None`, never as an error: the caller degrades that
//! section to empty output. Fetches are memoized through an injectable
//! read-through cache so repeated generates against the same listing do not
//! refetch, and tests can substitute a pre-seeded fake.

use std::collections::HashMap;
use std::io::Read;
use std::sync::Mutex;
use std::time::Duration;

use url::Url;

use crate::dom;
use crate::encoding;
use crate::options::Options;
use crate::patterns::{DESCRIPTION_IFRAME_SELECTOR, ITEM_PAGE_BASE};

/// Browser user agent presented to the marketplace.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fixed header set sent with every request. Content negotiation for
/// compression is left to the HTTP client, which decompresses transparently.
const BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("Referer", "https://www.google.com/"),
    ("Connection", "keep-alive"),
    ("Upgrade-Insecure-Requests", "1"),
];

/// Read-through memoization of fetched bodies, keyed by URL.
///
/// Implementations must be race-tolerant: two concurrent misses for the same
/// key may both fetch, and either write may win.
pub trait FetchCache: Send + Sync {
    /// Look up a previously fetched body.
    fn get(&self, key: &str) -> Option<String>;
    /// Store a fetched body.
    fn put(&self, key: &str, body: &str);
}

/// Shared in-memory `FetchCache`.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FetchCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn put(&self, key: &str, body: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), body.to_string());
        }
    }
}

/// Synchronous HTTP fetcher for listing pages, description documents, and
/// gallery pages.
pub struct Fetcher {
    agent: ureq::Agent,
    cache: Box<dyn FetchCache>,
}

impl Fetcher {
    /// Create a fetcher with a fresh in-memory cache.
    #[must_use]
    pub fn new(options: &Options) -> Self {
        Self::with_cache(options, Box::new(MemoryCache::new()))
    }

    /// Create a fetcher around an injected cache.
    #[must_use]
    pub fn with_cache(options: &Options, cache: Box<dyn FetchCache>) -> Self {
        let mut config = ureq::Agent::config_builder();
        config = config
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_secs(options.fetch_timeout_secs)))
            .user_agent(USER_AGENT);
        let agent: ureq::Agent = config.build().into();

        Self { agent, cache }
    }

    /// Fetch one URL as HTML, read-through cached.
    #[must_use]
    pub fn fetch_html(&self, url: &str) -> Option<String> {
        if let Some(cached) = self.cache.get(url) {
            return Some(cached);
        }

        let body = self.fetch_uncached(url)?;
        self.cache.put(url, &body);
        Some(body)
    }

    /// Fetch the listing page, discover its description iframe, and fetch
    /// the iframe content. `None` when either fetch misses or the page has
    /// no description iframe.
    #[must_use]
    pub fn fetch_description(&self, listing_url: &str) -> Option<String> {
        let page = self.fetch_html(listing_url)?;
        let iframe_url = description_iframe_url(listing_url, &page)?;
        self.fetch_html(&iframe_url)
    }

    /// Fetch the marketplace item page holding the image gallery.
    #[must_use]
    pub fn fetch_gallery(&self, item_id: &str) -> Option<String> {
        let id = item_id.trim();
        if id.is_empty() {
            return None;
        }
        self.fetch_html(&item_page_url(id))
    }

    fn fetch_uncached(&self, url: &str) -> Option<String> {
        let mut request = self.agent.get(url);
        for (name, value) in BROWSER_HEADERS {
            request = request.header(*name, *value);
        }

        let mut response = request.call().ok()?;
        if response.status().as_u16() != 200 {
            return None;
        }

        let mut body = Vec::new();
        response.body_mut().as_reader().read_to_end(&mut body).ok()?;
        if body.is_empty() {
            return None;
        }

        Some(encoding::transcode_to_utf8(&body))
    }
}

/// Build the marketplace item page URL for an item id.
#[must_use]
pub fn item_page_url(item_id: &str) -> String {
    format!("{ITEM_PAGE_BASE}{}", item_id.trim())
}

/// Locate the description iframe in a listing page and resolve its URL
/// against the page URL when relative.
#[must_use]
pub fn description_iframe_url(page_url: &str, page_html: &str) -> Option<String> {
    let doc = dom::parse(page_html);
    let iframe = doc.select(DESCRIPTION_IFRAME_SELECTOR);
    let src = dom::get_attribute(&iframe, "src")?;
    let src = src.trim();
    if src.is_empty() {
        return None;
    }

    match Url::parse(src) {
        Ok(url) => Some(url.into()),
        Err(_) => Url::parse(page_url).ok()?.join(src).ok().map(Into::into),
    }
}
