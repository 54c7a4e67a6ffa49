//! Time-boxed cache of externally fetched reference content.
//!
//! The cache holds a single aggregated text blob with a time-to-live.
//! Consumers ask for the configured sources' content; a fresh entry is
//! served verbatim with no network traffic, anything else triggers a
//! concurrent refresh. Individual source failures degrade to partial
//! content, and a refresh where every source fails substitutes a built-in
//! fallback block so downstream completion requests are never grounded in
//! nothing.

mod cache;
mod error;
mod fetch;
mod store;

pub use cache::{
    ContentSourceCache, CONTENT_TTL, MAX_COMBINED_CHARS, STATIC_FALLBACK_TEXT, TRUNCATION_MARKER,
};
pub use error::CacheError;
pub use fetch::{HttpSourceFetcher, SourceFetcher};
pub use store::{CacheStore, ContentCacheEntry, MemoryCacheStore, CACHE_KEY};
