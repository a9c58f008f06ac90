use super::cache::CatalogCache;
use super::http_client::HttpClient;
use super::platform::Platform;
use crate::core::cancel::CancelToken;
use crate::core::constants::cache as cache_consts;
use crate::environments::java::candidate::{DownloadableSdk, RemotePackage};
use crate::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 远程 JDK 目录
///
/// 取消时返回 `AppError::Cancelled`；其它错误由调用方决定是否降级。
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    async fn fetch(&self, cancel: &CancelToken) -> Result<Vec<DownloadableSdk>, AppError>;
}

/// 目录 JSON 中的一个 JDK
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub vendor: String,
    #[serde(default)]
    pub product: String,
    pub jdk_version: String,
    #[serde(default)]
    pub suggested_sdk_name: Option<String>,
    #[serde(default)]
    pub packages: Vec<FeedPackage>,
}

/// 目录 JSON 中某个平台的安装包
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPackage {
    pub os: String,
    pub arch: String,
    #[serde(default)]
    pub package_type: String,
    pub url: String,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default, alias = "archive_size")]
    pub size: u64,
    #[serde(default, alias = "unpack_prefix_filter")]
    pub unpack_prefix: Option<String>,
}

/// 磁盘缓存中的目录原文，记录来源地址
#[derive(Debug, Serialize, Deserialize)]
struct CachedFeed {
    url: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct RawFeed {
    #[serde(default)]
    jdks: Vec<serde_json::Value>,
}

impl FeedItem {
    /// 展开成本平台可用的下载项
    pub fn downloadables(&self, platform: &Platform) -> Vec<DownloadableSdk> {
        self.packages
            .iter()
            .filter(|p| platform.matches(&p.os, &p.arch))
            .map(|p| {
                DownloadableSdk::new(
                    &self.vendor,
                    &self.product,
                    &self.jdk_version,
                    self.suggested_sdk_name.as_deref(),
                    RemotePackage {
                        os: Platform::normalize_os(&p.os),
                        arch: Platform::normalize_arch(&p.arch),
                        package_type: p.package_type.clone(),
                        url: p.url.clone(),
                        sha256: p.sha256.clone(),
                        size: p.size,
                        unpack_prefix: p.unpack_prefix.clone(),
                    },
                )
            })
            .collect()
    }
}

/// 解析目录 JSON
///
/// 顶层格式错误返回错误；单个条目格式错误只丢弃该条目。
pub fn parse_feed(text: &str, platform: &Platform) -> Result<Vec<DownloadableSdk>, AppError> {
    let raw: RawFeed = serde_json::from_str(text)?;

    let mut result = Vec::new();
    for value in raw.jdks {
        match serde_json::from_value::<FeedItem>(value) {
            Ok(item) => result.extend(item.downloadables(platform)),
            Err(e) => tracing::debug!("跳过格式错误的目录条目: {}", e),
        }
    }
    Ok(result)
}

/// 通过 HTTP（或 file://）获取目录
pub struct HttpCatalogFetcher {
    url: String,
    client: HttpClient,
    platform: Platform,
    cache: Option<CatalogCache>,
}

impl HttpCatalogFetcher {
    pub fn new(url: &str) -> Result<Self, AppError> {
        Ok(Self {
            url: url.to_string(),
            client: HttpClient::new()?,
            platform: Platform::current(),
            cache: None,
        })
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_cache(mut self, cache: CatalogCache) -> Self {
        self.cache = Some(cache);
        self
    }

    fn cache_key(&self) -> String {
        cache_consts::CATALOG_CACHE_KEY.to_string()
    }

    async fn download_text(&self) -> Result<String, AppError> {
        let parsed = url::Url::parse(&self.url)
            .map_err(|e| AppError::invalid("catalog_url", format!("{}: {}", self.url, e)))?;

        if parsed.scheme() == "file" {
            let path = parsed
                .to_file_path()
                .map_err(|_| AppError::invalid("catalog_url", self.url.clone()))?;
            return Ok(tokio::fs::read_to_string(path).await?);
        }

        self.client.get_text(&self.url).await
    }
}

#[async_trait]
impl CatalogFetcher for HttpCatalogFetcher {
    async fn fetch(&self, cancel: &CancelToken) -> Result<Vec<DownloadableSdk>, AppError> {
        cancel.check()?;

        if let Some(cache) = &self.cache {
            match cache.load::<CachedFeed>(&self.cache_key()).await {
                Some(cached) if cached.url == self.url => {
                    return parse_feed(&cached.text, &self.platform);
                }
                Some(cached) => tracing::debug!("缓存来自其它目录地址 {}，重新下载", cached.url),
                None => {}
            }
        }

        tracing::debug!("正在下载 JDK 列表: {}", self.url);
        let text = cancel.run(self.download_text()).await?;
        let sdks = parse_feed(&text, &self.platform)?;

        if let Some(cache) = &self.cache {
            let cached = CachedFeed {
                url: self.url.clone(),
                text,
            };
            if let Err(e) = cache.save(&self.cache_key(), cached).await {
                tracing::warn!("保存 JDK 列表缓存失败: {}", e);
            }
        }

        Ok(sdks)
    }
}

/// 固定内容的目录，用于离线模式
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogFetcher {
    sdks: Vec<DownloadableSdk>,
}

impl StaticCatalogFetcher {
    pub fn new(sdks: Vec<DownloadableSdk>) -> Self {
        Self { sdks }
    }
}

#[async_trait]
impl CatalogFetcher for StaticCatalogFetcher {
    async fn fetch(&self, cancel: &CancelToken) -> Result<Vec<DownloadableSdk>, AppError> {
        cancel.check()?;
        Ok(self.sdks.clone())
    }
}
