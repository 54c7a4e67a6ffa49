//! The single-slot TTL cache and its aggregation logic.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::fetch::SourceFetcher;
use crate::store::{CacheStore, ContentCacheEntry};

/// Time-to-live for a cached entry.
pub const CONTENT_TTL: Duration = Duration::from_secs(4 * 60 * 60);

/// Safety bound on the combined reference text, in characters.
pub const MAX_COMBINED_CHARS: usize = 6000;

/// Marker appended when the combined text is truncated.
pub const TRUNCATION_MARKER: &str = "...";

/// Built-in reference text used when every configured source fails, so a
/// completion request is never grounded in nothing.
pub const STATIC_FALLBACK_TEXT: &str = "\
No live reference content is available right now. General guidance: \
acknowledge the sender's question, let them know the details are being \
confirmed, and point them at the organization's public contact channels \
for anything urgent.";

/// How a reference-source configuration is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SourceList {
    /// Nothing configured.
    Empty,
    /// One URL per non-empty line.
    Urls(Vec<String>),
    /// Not a URL list; the whole blob is static reference text.
    StaticText(String),
}

fn parse_sources(sources: &str) -> SourceList {
    let lines: Vec<&str> = sources
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return SourceList::Empty;
    }

    let all_urls = lines
        .iter()
        .all(|line| line.starts_with("http://") || line.starts_with("https://"));

    if all_urls {
        SourceList::Urls(lines.into_iter().map(str::to_string).collect())
    } else {
        SourceList::StaticText(sources.trim().to_string())
    }
}

/// Whether an entry is still servable at `now`.
///
/// The boundary is exclusive: an entry whose age equals the TTL is expired.
fn is_fresh(entry: &ContentCacheEntry, ttl: Duration, now: SystemTime) -> bool {
    match now.duration_since(entry.updated_at) {
        Ok(age) => age < ttl,
        // A timestamp from the future can only come from clock adjustment;
        // treat it as fresh rather than refetching in a loop.
        Err(_) => true,
    }
}

/// Truncate to a character bound, appending the marker when cut.
fn bound_combined(text: String, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text;
    }
    let mut bounded: String = text.chars().take(max_chars).collect();
    bounded.push_str(TRUNCATION_MARKER);
    bounded
}

/// Single-slot TTL cache over the configured reference sources.
pub struct ContentSourceCache {
    store: Arc<dyn CacheStore>,
    fetcher: Arc<dyn SourceFetcher>,
    ttl: Duration,
    max_chars: usize,
}

impl ContentSourceCache {
    /// Create a cache over the given store and fetcher.
    pub fn new(store: Arc<dyn CacheStore>, fetcher: Arc<dyn SourceFetcher>) -> Self {
        Self {
            store,
            fetcher,
            ttl: CONTENT_TTL,
            max_chars: MAX_COMBINED_CHARS,
        }
    }

    /// Override the time-to-live.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Override the combined-text bound.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Resolve reference content for the configured sources.
    ///
    /// A fresh cached entry is returned verbatim with no network traffic
    /// unless `force_refresh` is set. Static (non-URL) source text is
    /// returned directly and never cached.
    pub async fn get(&self, sources: &str, force_refresh: bool) -> String {
        if !force_refresh {
            if let Some(entry) = self.store.load().await {
                if is_fresh(&entry, self.ttl, SystemTime::now()) {
                    debug!(chars = entry.text.len(), "Serving cached reference content");
                    return entry.text;
                }
                debug!("Cached reference content expired");
            }
        }

        self.refresh(sources).await
    }

    /// Fetch fresh content for all sources and store the aggregate.
    async fn refresh(&self, sources: &str) -> String {
        match parse_sources(sources) {
            SourceList::Empty => {
                debug!("No reference sources configured, using fallback text");
                STATIC_FALLBACK_TEXT.to_string()
            }
            SourceList::StaticText(text) => {
                debug!(chars = text.len(), "Using static reference text");
                text
            }
            SourceList::Urls(urls) => self.refresh_urls(&urls).await,
        }
    }

    async fn refresh_urls(&self, urls: &[String]) -> String {
        let fetches = urls.iter().map(|url| {
            let fetcher = Arc::clone(&self.fetcher);
            async move { (url.clone(), fetcher.fetch(url).await) }
        });

        let results = join_all(fetches).await;

        let mut sections = Vec::new();
        for (url, result) in results {
            match result {
                Ok(text) if !text.trim().is_empty() => {
                    sections.push(format!("--- Content from {} ---\n{}", url, text));
                }
                Ok(_) => {
                    debug!(%url, "Source returned empty content");
                }
                Err(e) => {
                    // Partial results are acceptable; a failed source
                    // contributes nothing.
                    warn!(%url, "Source fetch failed: {}", e);
                }
            }
        }

        if sections.is_empty() {
            warn!("All reference sources failed, substituting fallback text");
            return STATIC_FALLBACK_TEXT.to_string();
        }

        let combined = bound_combined(sections.join("\n\n"), self.max_chars);

        info!(
            sources = urls.len(),
            kept = sections.len(),
            chars = combined.len(),
            "Refreshed reference content"
        );

        self.store.save(ContentCacheEntry::now(&combined)).await;
        combined
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::CacheError;
    use crate::store::MemoryCacheStore;

    /// Fetcher that serves canned results and counts calls.
    struct ScriptedFetcher {
        responses: HashMap<String, Result<String, ()>>,
        calls: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn new(responses: Vec<(&str, Result<&str, ()>)>) -> Self {
            Self {
                responses: responses
                    .into_iter()
                    .map(|(url, r)| (url.to_string(), r.map(str::to_string)))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SourceFetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<String, CacheError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.responses.get(url) {
                Some(Ok(text)) => Ok(text.clone()),
                _ => Err(CacheError::Fetch(format!("scripted failure for {}", url))),
            }
        }
    }

    fn cache_with(
        store: Arc<MemoryCacheStore>,
        fetcher: Arc<ScriptedFetcher>,
    ) -> ContentSourceCache {
        ContentSourceCache::new(store, fetcher)
    }

    #[tokio::test]
    async fn test_fresh_entry_served_with_zero_fetches() {
        let store = Arc::new(MemoryCacheStore::with_entry(ContentCacheEntry::now(
            "cached blob",
        )));
        let fetcher = Arc::new(ScriptedFetcher::new(vec![(
            "https://a.example",
            Ok("live"),
        )]));
        let cache = cache_with(Arc::clone(&store), Arc::clone(&fetcher));

        let text = cache.get("https://a.example", false).await;

        assert_eq!(text, "cached blob");
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_force_refresh_bypasses_fresh_entry() {
        let store = Arc::new(MemoryCacheStore::with_entry(ContentCacheEntry::now(
            "cached blob",
        )));
        let fetcher = Arc::new(ScriptedFetcher::new(vec![(
            "https://a.example",
            Ok("live text"),
        )]));
        let cache = cache_with(Arc::clone(&store), Arc::clone(&fetcher));

        let text = cache.get("https://a.example", true).await;

        assert!(text.contains("--- Content from https://a.example ---"));
        assert!(text.contains("live text"));
        assert_eq!(fetcher.call_count(), 1);
        // The refreshed aggregate replaced the stored entry.
        assert_eq!(store.load().await.unwrap().text, text);
    }

    #[tokio::test]
    async fn test_ttl_boundary_is_exclusive() {
        let now = SystemTime::now();
        let at_ttl = ContentCacheEntry {
            text: "old".to_string(),
            updated_at: now - CONTENT_TTL,
        };
        let just_inside = ContentCacheEntry {
            text: "newer".to_string(),
            updated_at: now - (CONTENT_TTL - Duration::from_secs(1)),
        };

        assert!(!is_fresh(&at_ttl, CONTENT_TTL, now));
        assert!(is_fresh(&just_inside, CONTENT_TTL, now));
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_refresh() {
        let store = Arc::new(MemoryCacheStore::with_entry(ContentCacheEntry {
            text: "stale".to_string(),
            updated_at: SystemTime::now() - CONTENT_TTL - Duration::from_secs(1),
        }));
        let fetcher = Arc::new(ScriptedFetcher::new(vec![(
            "https://a.example",
            Ok("fresh"),
        )]));
        let cache = cache_with(store, Arc::clone(&fetcher));

        let text = cache.get("https://a.example", false).await;

        assert!(text.contains("fresh"));
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_successful_sections_in_order() {
        let store = Arc::new(MemoryCacheStore::new());
        let fetcher = Arc::new(ScriptedFetcher::new(vec![
            ("https://a.example", Ok("alpha text")),
            ("https://b.example", Err(())),
            ("https://c.example", Ok("gamma text")),
        ]));
        let cache = cache_with(store, fetcher);

        let text = cache
            .get(
                "https://a.example\nhttps://b.example\nhttps://c.example",
                true,
            )
            .await;

        let a = text.find("Content from https://a.example").unwrap();
        let c = text.find("Content from https://c.example").unwrap();
        assert!(a < c);
        assert!(!text.contains("b.example"));
        assert!(text.contains("alpha text"));
        assert!(text.contains("gamma text"));
    }

    #[tokio::test]
    async fn test_all_sources_failed_substitutes_fallback() {
        let store = Arc::new(MemoryCacheStore::new());
        let fetcher = Arc::new(ScriptedFetcher::new(vec![
            ("https://a.example", Err(())),
            ("https://b.example", Err(())),
        ]));
        let cache = cache_with(Arc::clone(&store), fetcher);

        let text = cache
            .get("https://a.example\nhttps://b.example", true)
            .await;

        assert_eq!(text, STATIC_FALLBACK_TEXT);
        assert!(!text.is_empty());
        // A failed refresh must not overwrite the slot.
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_combined_content_truncated_to_bound_plus_marker() {
        let store = Arc::new(MemoryCacheStore::new());
        let long = "x".repeat(10_000);
        let fetcher = Arc::new(ScriptedFetcher::new(vec![(
            "https://a.example",
            Ok(long.as_str()),
        )]));
        let cache = cache_with(store, fetcher);

        let text = cache.get("https://a.example", true).await;

        assert_eq!(
            text.chars().count(),
            MAX_COMBINED_CHARS + TRUNCATION_MARKER.len()
        );
        assert!(text.ends_with(TRUNCATION_MARKER));
    }

    #[tokio::test]
    async fn test_content_under_bound_untouched() {
        let store = Arc::new(MemoryCacheStore::new());
        let fetcher = Arc::new(ScriptedFetcher::new(vec![(
            "https://a.example",
            Ok("short"),
        )]));
        let cache = cache_with(store, fetcher);

        let text = cache.get("https://a.example", true).await;
        assert!(!text.ends_with(TRUNCATION_MARKER));
        assert!(text.contains("short"));
    }

    #[tokio::test]
    async fn test_static_text_returned_directly() {
        let store = Arc::new(MemoryCacheStore::new());
        let fetcher = Arc::new(ScriptedFetcher::new(vec![]));
        let cache = cache_with(Arc::clone(&store), Arc::clone(&fetcher));

        let text = cache
            .get("Our opening hours are 9-5.\nCall us any time.", true)
            .await;

        assert_eq!(text, "Our opening hours are 9-5.\nCall us any time.");
        assert_eq!(fetcher.call_count(), 0);
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_sources_use_fallback() {
        let store = Arc::new(MemoryCacheStore::new());
        let fetcher = Arc::new(ScriptedFetcher::new(vec![]));
        let cache = cache_with(store, fetcher);

        let text = cache.get("   \n  ", true).await;
        assert_eq!(text, STATIC_FALLBACK_TEXT);
    }

    #[test]
    fn test_parse_sources_variants() {
        assert_eq!(parse_sources(""), SourceList::Empty);
        assert_eq!(
            parse_sources("https://a.example\n\nhttp://b.example\n"),
            SourceList::Urls(vec![
                "https://a.example".to_string(),
                "http://b.example".to_string()
            ])
        );
        assert!(matches!(
            parse_sources("https://a.example\nand some prose"),
            SourceList::StaticText(_)
        ));
    }
}
