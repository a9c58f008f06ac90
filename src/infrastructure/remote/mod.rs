pub mod cache;
pub mod catalog;
pub mod http_client;
pub mod platform;

pub use cache::{CacheEntry, CatalogCache};
pub use catalog::{parse_feed, CatalogFetcher, FeedItem, FeedPackage, HttpCatalogFetcher, StaticCatalogFetcher};
pub use http_client::HttpClient;
pub use platform::Platform;
