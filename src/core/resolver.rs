//! 未知 JDK 的解析会话
//!
//! 会话持有所有外部协作者，远程目录和本地扫描结果在会话内各只计算一次。

use super::cancel::CancelToken;
use super::matcher::SdkMatcher;
use super::outcome::{DownloadSdkFix, LocalSdkFix, ResolutionOutcome};
use crate::environments::java::candidate::{
    CandidateSdk, DownloadableSdk, LocalDetectedSdk, RegisteredSdk,
};
use crate::environments::java::registered::{ConfigSdkTable, RegisteredSdkTable};
use crate::environments::java::requirement::{
    JdkRequirement, JdkRequirements, RequirementParser, SdkKind, UnknownSdk,
};
use crate::environments::java::scanner::{FsLocalScanner, LocalScanner};
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::{get_config_dir, Config};
use crate::infrastructure::installer::{DirectoryInstaller, InstallTask, InstallerTaskFactory};
use crate::infrastructure::remote::{CatalogCache, CatalogFetcher, HttpCatalogFetcher, StaticCatalogFetcher};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// 会话依赖的外部协作者
#[derive(Clone)]
pub struct ResolverCollaborators {
    pub parser: Arc<dyn RequirementParser>,
    pub catalog: Arc<dyn CatalogFetcher>,
    pub scanner: Arc<dyn LocalScanner>,
    pub registered: Arc<dyn RegisteredSdkTable>,
    pub installer: Arc<dyn InstallerTaskFactory>,
}

impl ResolverCollaborators {
    /// 按配置组装默认实现；`offline` 时远程目录为空
    pub fn from_config(config: &Config, offline: bool) -> AppResult<Self> {
        let catalog: Arc<dyn CatalogFetcher> = if offline {
            Arc::new(StaticCatalogFetcher::default())
        } else {
            let mut fetcher = HttpCatalogFetcher::new(&config.catalog_url)?;
            if config.catalog_cache_ttl > 0 {
                let cache_dir = get_config_dir()?.join("cache");
                fetcher = fetcher.with_cache(CatalogCache::new(cache_dir, config.catalog_cache_ttl));
            }
            Arc::new(fetcher)
        };

        Ok(Self {
            parser: Arc::new(JdkRequirements),
            catalog,
            scanner: Arc::new(FsLocalScanner::from_config(config)),
            registered: Arc::new(ConfigSdkTable::from_config(config)),
            installer: Arc::new(DirectoryInstaller::new(config.install_root()?)),
        })
    }
}

/// 解析器工厂
#[derive(Debug, Clone, Copy)]
pub struct JdkAuto {
    auto_setup: bool,
}

impl JdkAuto {
    pub fn new(auto_setup: bool) -> Self {
        Self { auto_setup }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.auto_setup)
    }

    /// 只处理 Java SDK
    pub fn supports_resolution(kind: &SdkKind) -> bool {
        *kind == SdkKind::Java
    }

    /// 自动解析被关闭时返回 `None`
    pub fn create_resolver(
        &self,
        collaborators: ResolverCollaborators,
        cancel: CancelToken,
    ) -> Option<ResolverSession> {
        if !self.auto_setup {
            tracing::debug!("auto_setup 已关闭，跳过未知 JDK 解析");
            return None;
        }
        Some(ResolverSession::new(collaborators, cancel))
    }
}

/// 一次解析会话
pub struct ResolverSession {
    deps: ResolverCollaborators,
    kind: SdkKind,
    cancel: CancelToken,
    download_model: OnceCell<Vec<DownloadableSdk>>,
    local_jdks: OnceCell<Vec<LocalDetectedSdk>>,
}

impl ResolverSession {
    pub fn new(deps: ResolverCollaborators, cancel: CancelToken) -> Self {
        Self {
            deps,
            kind: SdkKind::Java,
            cancel,
            download_model: OnceCell::new(),
            local_jdks: OnceCell::new(),
        }
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// 类型不符或名称无法解析时返回 `None`
    fn requirement_for(&self, sdk: &UnknownSdk) -> Result<Option<JdkRequirement>, AppError> {
        self.cancel.check()?;
        if sdk.kind != self.kind {
            return Ok(None);
        }
        let requirement = self.deps.parser.parse(sdk);
        if requirement.is_none() {
            tracing::debug!("无法从 {} 解析 JDK 要求", sdk);
        }
        Ok(requirement)
    }

    /// 远程目录，只下载一次；失败降级为空列表，取消原样返回
    pub async fn download_model(&self) -> Result<&[DownloadableSdk], AppError> {
        let model = self
            .download_model
            .get_or_try_init(|| async {
                match self.cancel.run(self.deps.catalog.fetch(&self.cancel)).await {
                    Ok(list) => Ok(list),
                    Err(e) if e.is_cancelled() => Err(e),
                    Err(e) => {
                        tracing::warn!("获取可下载 JDK 列表失败: {}", e);
                        Ok(Vec::new())
                    }
                }
            })
            .await?;
        Ok(model)
    }

    /// 本地扫描结果，只扫描一次
    pub async fn local_jdks(&self) -> Result<&[LocalDetectedSdk], AppError> {
        let local = self
            .local_jdks
            .get_or_try_init(|| async {
                match self.cancel.run(self.deps.scanner.scan(&self.kind, &self.cancel)).await {
                    Ok(list) => Ok(list),
                    Err(e) if e.is_cancelled() => Err(e),
                    Err(e) => {
                        tracing::warn!("检测本地 JDK 失败: {}", e);
                        Ok(Vec::new())
                    }
                }
            })
            .await?;
        Ok(local)
    }

    /// 已注册的 SDK，每次重新读取；校验在阻塞线程中进行
    pub async fn registered_sdks(&self) -> Result<Vec<RegisteredSdk>, AppError> {
        let table = Arc::clone(&self.deps.registered);
        let cancel = self.cancel.clone();
        let joined = tokio::task::spawn_blocking(move || table.snapshot(&cancel)).await;

        match joined {
            Ok(Ok(list)) => Ok(list),
            Ok(Err(e)) if e.is_cancelled() => Err(e),
            Ok(Err(e)) => {
                tracing::warn!("读取已注册 JDK 失败: {}", e);
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::warn!("读取已注册 JDK 的任务失败: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// 先看已注册的 SDK，再看本地检测结果
    pub async fn propose_local_fix(&self, sdk: &UnknownSdk) -> Result<Option<LocalSdkFix>, AppError> {
        let Some(requirement) = self.requirement_for(sdk)? else {
            return Ok(None);
        };
        tracing::info!("正在为 {} 查找本地 SDK（要求: {}）", sdk, requirement);

        let registered = self.registered_sdks().await?;
        if let Some(best) = SdkMatcher::best_match(&requirement, &registered) {
            return Ok(Some(LocalSdkFix::from(best)));
        }

        let local = self.local_jdks().await?;
        Ok(SdkMatcher::best_match(&requirement, local).map(LocalSdkFix::from))
    }

    /// 从远程目录中选出最新的匹配版本
    pub async fn propose_download(&self, sdk: &UnknownSdk) -> Result<Option<DownloadSdkFix>, AppError> {
        let Some(requirement) = self.requirement_for(sdk)? else {
            return Ok(None);
        };
        tracing::info!("正在为 {} 查找可下载的 JDK（要求: {}）", sdk, requirement);

        let model = self.download_model().await?;
        Ok(SdkMatcher::resolve_download(&requirement, model))
    }

    /// 本地修复优先，其次下载
    pub async fn resolve(&self, sdk: &UnknownSdk) -> Result<Option<ResolutionOutcome>, AppError> {
        if let Some(fix) = self.propose_local_fix(sdk).await? {
            return Ok(Some(ResolutionOutcome::LocalFix(fix)));
        }
        Ok(self
            .propose_download(sdk)
            .await?
            .map(ResolutionOutcome::Download))
    }

    /// 所有来源中满足要求的候选，按来源优先级排列
    pub async fn matching_candidates(&self, sdk: &UnknownSdk) -> Result<Vec<CandidateSdk>, AppError> {
        let Some(requirement) = self.requirement_for(sdk)? else {
            return Ok(Vec::new());
        };

        let mut result: Vec<CandidateSdk> = self
            .registered_sdks()
            .await?
            .into_iter()
            .filter(|c| SdkMatcher::matches(&requirement, c))
            .map(CandidateSdk::from)
            .collect();

        result.extend(
            self.local_jdks()
                .await?
                .iter()
                .filter(|c| SdkMatcher::matches(&requirement, *c))
                .cloned()
                .map(CandidateSdk::from),
        );
        result.extend(
            self.download_model()
                .await?
                .iter()
                .filter(|c| SdkMatcher::matches(&requirement, *c))
                .cloned()
                .map(CandidateSdk::from),
        );

        Ok(result)
    }

    /// 为下载方案创建安装任务（不执行）
    pub fn create_task(&self, fix: &DownloadSdkFix) -> InstallTask {
        fix.create_task(self.deps.installer.as_ref())
    }
}
