use crate::cli::commands::Commands;
use crate::cli::output::{OutputFormat, FORMATTER};
use crate::core::cancel::CancelToken;
use crate::core::constants::cache as cache_consts;
use crate::core::outcome::{FixOrigin, LocalSdkFix, ResolutionOutcome};
use crate::core::resolver::{JdkAuto, ResolverCollaborators};
use crate::environments::java::registered::{ConfigSdkTable, RegisteredSdkTable};
use crate::environments::java::requirement::{SdkKind, UnknownSdk};
use crate::environments::java::scanner::{FsLocalScanner, LocalScanner};
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::{get_config_dir, Config, JavaEnvironment};
use crate::infrastructure::remote::{CatalogCache, CatalogFetcher, HttpCatalogFetcher};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// 终端上的等待提示；JSON 输出时隐藏
fn spinner(message: &str, format: OutputFormat) -> ProgressBar {
    if format == OutputFormat::Json {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// 命令处理器
pub struct CommandHandler {
    config: Config,
    cancel: CancelToken,
}

impl CommandHandler {
    pub fn new(config: Config, cancel: CancelToken) -> Self {
        Self { config, cancel }
    }

    /// 处理命令
    pub async fn handle_command(&mut self, command: Commands) -> AppResult<()> {
        match command {
            Commands::Resolve {
                name,
                kind,
                offline,
                all,
                register,
                json,
            } => {
                let sdk = UnknownSdk {
                    name,
                    kind: SdkKind::parse(&kind),
                };
                self.handle_resolve(sdk, offline, all, register, OutputFormat::from_json_flag(json))
                    .await
            }
            Commands::Scan { json } => self.handle_scan(OutputFormat::from_json_flag(json)).await,
            Commands::Registered { json } => self.handle_registered(OutputFormat::from_json_flag(json)).await,
            Commands::LsRemote { refresh, json } => {
                self.handle_ls_remote(refresh, OutputFormat::from_json_flag(json)).await
            }
        }
    }

    async fn handle_resolve(
        &mut self,
        sdk: UnknownSdk,
        offline: bool,
        all: bool,
        register: bool,
        format: OutputFormat,
    ) -> AppResult<()> {
        if !JdkAuto::supports_resolution(&sdk.kind) {
            print!(
                "{}",
                FORMATTER.format_message(&format!("不支持解析 {} 类型的 SDK", sdk.kind.presentable_name()), format)
            );
            return Ok(());
        }

        let collaborators = ResolverCollaborators::from_config(&self.config, offline)?;
        let Some(session) = JdkAuto::from_config(&self.config).create_resolver(collaborators, self.cancel.clone())
        else {
            print!(
                "{}",
                FORMATTER.format_message("自动解析已关闭（配置 auto_setup = false）", format)
            );
            return Ok(());
        };

        let pb = spinner(&format!("正在为 {} 查找 JDK…", sdk), format);

        if all {
            let candidates = session.matching_candidates(&sdk).await;
            pb.finish_and_clear();
            print!("{}", FORMATTER.format_candidates(&candidates?, format)?);
            return Ok(());
        }

        let outcome = session.resolve(&sdk).await;
        pb.finish_and_clear();
        let outcome = outcome?;

        let task = match &outcome {
            Some(ResolutionOutcome::Download(fix)) => Some(session.create_task(fix)),
            _ => None,
        };
        print!(
            "{}",
            FORMATTER.format_resolution(&sdk, outcome.as_ref(), task.as_ref(), format)?
        );

        if register {
            match &outcome {
                Some(ResolutionOutcome::LocalFix(fix)) if fix.origin == FixOrigin::Detected => {
                    self.register_fix(fix)?;
                    if format == OutputFormat::Text {
                        println!("已注册为 {}", fix.suggested_sdk_name);
                    }
                }
                _ => tracing::debug!("没有需要注册的本地 JDK"),
            }
        }
        Ok(())
    }

    /// 把检测到的 JDK 写入配置
    fn register_fix(&mut self, fix: &LocalSdkFix) -> AppResult<()> {
        let table = ConfigSdkTable::from_config(&self.config);
        table.register(JavaEnvironment {
            name: fix.suggested_sdk_name.clone(),
            java_home: fix.existing_sdk_home.to_string_lossy().to_string(),
            version: Some(fix.version_string.clone()),
            description: "由 jdkauto resolve 注册".to_string(),
        });
        table.store(&mut self.config)
    }

    async fn handle_scan(&self, format: OutputFormat) -> AppResult<()> {
        let scanner = FsLocalScanner::from_config(&self.config);
        let pb = spinner("正在检测本地 JDK…", format);
        let result = scanner.scan(&SdkKind::Java, &self.cancel).await;
        pb.finish_and_clear();

        print!("{}", FORMATTER.format_local(&result?, format)?);
        Ok(())
    }

    async fn handle_registered(&self, format: OutputFormat) -> AppResult<()> {
        let table = ConfigSdkTable::from_config(&self.config);
        let cancel = self.cancel.clone();
        let snapshot = tokio::task::spawn_blocking(move || table.snapshot(&cancel))
            .await
            .map_err(|e| AppError::internal(format!("读取已注册 JDK 失败: {e}")))??;
        print!("{}", FORMATTER.format_registered(&snapshot, format)?);
        Ok(())
    }

    async fn handle_ls_remote(&self, refresh: bool, format: OutputFormat) -> AppResult<()> {
        let mut fetcher = HttpCatalogFetcher::new(&self.config.catalog_url)?;
        if self.config.catalog_cache_ttl > 0 {
            let cache = CatalogCache::new(get_config_dir()?.join("cache"), self.config.catalog_cache_ttl);
            if refresh {
                cache.clear(cache_consts::CATALOG_CACHE_KEY).await?;
            }
            fetcher = fetcher.with_cache(cache);
        }

        // 用户明确要求列出目录，失败直接报告，不做降级
        let pb = spinner("正在下载 JDK 列表…", format);
        let result = fetcher.fetch(&self.cancel).await;
        pb.finish_and_clear();

        print!("{}", FORMATTER.format_catalog(&result?, format)?);
        Ok(())
    }
}
