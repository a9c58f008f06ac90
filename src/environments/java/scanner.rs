use super::candidate::LocalDetectedSdk;
use super::requirement::SdkKind;
use super::validator::JavaValidator;
use super::vendor::JdkVendor;
use super::version::{suggest_jdk_name, JavaVersion};
use crate::core::cancel::CancelToken;
use crate::core::constants::{env as env_keys, fs as fs_consts};
use crate::error::AppError;
use crate::infrastructure::config::Config;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 本地 JDK 扫描器
///
/// 尽力而为：任何字段缺失或无效的条目都被丢弃，只有取消会返回错误。
#[async_trait]
pub trait LocalScanner: Send + Sync {
    async fn scan(
        &self,
        kind: &SdkKind,
        cancel: &CancelToken,
    ) -> Result<Vec<LocalDetectedSdk>, AppError>;
}

/// 探测通过的 JDK 信息
#[derive(Debug, Clone, PartialEq)]
pub struct ProbedSdk {
    pub home: PathBuf,
    pub version_string: String,
    pub version: JavaVersion,
    pub suggested_name: String,
    pub vendor: Option<JdkVendor>,
}

/// 逐字段校验，任一步为 `None` 即丢弃该条目
pub struct SdkProbe;

impl SdkProbe {
    /// home 已知 -> 版本字符串已知 -> 版本可解析 -> 可生成建议名称
    ///
    /// `declared_version` 为空时从 home 探测。home 是否为有效 JDK 目录
    /// 不在这里判断，由调用方决定丢弃还是标记。
    pub fn probe(home: Option<&Path>, declared_version: Option<&str>) -> Option<ProbedSdk> {
        let home = Self::known_home(home)?;
        let version_string = Self::version_string(&home, declared_version)?;
        let version = JavaVersion::try_parse(&version_string)?;
        let vendor = Self::vendor(&home, &version_string);
        let suggested_name = suggest_jdk_name(&version_string, vendor)?;

        Some(ProbedSdk {
            home,
            version_string,
            version,
            suggested_name,
            vendor,
        })
    }

    /// 探测并要求 home 是有效的 JDK 目录
    pub fn probe_valid(home: &Path) -> Option<ProbedSdk> {
        if !JavaValidator::is_valid_sdk_home(home) {
            return None;
        }
        Self::probe(Some(home), None)
    }

    fn known_home(home: Option<&Path>) -> Option<PathBuf> {
        home.filter(|h| !h.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }

    fn version_string(home: &Path, declared: Option<&str>) -> Option<String> {
        match declared.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => Some(v.to_string()),
            None => JavaValidator::detect_version_string(home),
        }
    }

    fn vendor(home: &Path, version_string: &str) -> Option<JdkVendor> {
        JavaValidator::detect_implementor(home)
            .and_then(|implementor| JdkVendor::detect(&implementor))
            .or_else(|| JdkVendor::detect(&home.to_string_lossy()))
            .or_else(|| JdkVendor::detect(version_string))
    }
}

/// 基于文件系统的扫描器
#[derive(Debug, Clone)]
pub struct FsLocalScanner {
    roots: Vec<PathBuf>,
    include_environment: bool,
}

impl FsLocalScanner {
    /// 平台默认目录 + 额外目录，同时检查 `JAVA_HOME` 和 PATH
    pub fn new(extra_roots: Vec<PathBuf>) -> Self {
        let mut roots = Self::default_roots();
        roots.extend(extra_roots);
        Self {
            roots,
            include_environment: true,
        }
    }

    /// 只扫描给定目录
    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            include_environment: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut extra = config.extra_scan_roots();
        if let Ok(install_root) = config.install_root() {
            extra.push(install_root);
        }
        Self::new(extra)
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// 获取常见的 JDK 安装目录
    fn default_roots() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = Vec::new();

        if cfg!(target_os = "windows") {
            paths.extend(
                [
                    r"C:\Program Files\Java",
                    r"C:\Program Files (x86)\Java",
                    r"C:\Program Files\Eclipse Adoptium",
                    r"C:\Program Files\Amazon Corretto",
                    r"C:\Program Files\Microsoft",
                    r"C:\Program Files\Zulu",
                    r"C:\Program Files\BellSoft",
                ]
                .into_iter()
                .map(PathBuf::from),
            );
        } else if cfg!(target_os = "macos") {
            paths.extend(
                [
                    "/Library/Java/JavaVirtualMachines",
                    "/System/Library/Java/JavaVirtualMachines",
                    "/usr/local/java",
                ]
                .into_iter()
                .map(PathBuf::from),
            );
            if let Some(home) = dirs::home_dir() {
                paths.push(home.join("Library/Java/JavaVirtualMachines"));
            }
        } else {
            paths.extend(
                ["/usr/lib/jvm", "/usr/java", "/usr/local/java", "/opt/java"]
                    .into_iter()
                    .map(PathBuf::from),
            );
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(fs_consts::DEFAULT_INSTALL_DIR_NAME));
            paths.push(home.join(".sdkman").join("candidates").join("java"));
        }

        paths
    }

    /// 根目录本身或其一级子目录中可能的 JDK home
    fn candidate_homes(root: &Path) -> Vec<PathBuf> {
        if JavaValidator::is_valid_sdk_home(root) {
            return vec![root.to_path_buf()];
        }

        WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_dir())
            .flat_map(|entry| {
                let dir = entry.into_path();
                // macOS 的 JDK bundle
                let bundle_home = dir.join("Contents").join("Home");
                [dir, bundle_home]
            })
            .filter(|home| JavaValidator::is_valid_sdk_home(home))
            .collect()
    }

    /// `JAVA_HOME` 与 PATH 中的 java
    fn environment_homes() -> Vec<PathBuf> {
        let mut homes = Vec::new();

        if let Some(java_home) = std::env::var_os(env_keys::JAVA_HOME) {
            homes.push(PathBuf::from(java_home));
        }

        if let Ok(java_exe) = which::which("java") {
            let resolved = std::fs::canonicalize(&java_exe).unwrap_or(java_exe);
            if let Some(home) = resolved.parent().and_then(Path::parent) {
                homes.push(home.to_path_buf());
            }
        }

        homes
    }

    /// 同步扫描，每个根目录之前检查取消
    pub fn scan_blocking(&self, cancel: &CancelToken) -> Result<Vec<LocalDetectedSdk>, AppError> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();

        let mut homes = Vec::new();
        for root in &self.roots {
            cancel.check()?;
            homes.extend(Self::candidate_homes(root));
        }
        if self.include_environment {
            homes.extend(Self::environment_homes());
        }

        for home in homes {
            cancel.check()?;
            let key = std::fs::canonicalize(&home).unwrap_or_else(|_| home.clone());
            if !seen.insert(key) {
                continue;
            }

            match SdkProbe::probe_valid(&home) {
                Some(probed) => result.push(LocalDetectedSdk {
                    home_path: probed.home,
                    version_string: probed.version_string,
                    version: probed.version,
                    suggested_name: probed.suggested_name,
                    vendor: probed.vendor,
                }),
                None => tracing::debug!("跳过无法识别的 JDK 目录: {}", home.display()),
            }
        }

        Ok(result)
    }
}

#[async_trait]
impl LocalScanner for FsLocalScanner {
    async fn scan(
        &self,
        kind: &SdkKind,
        cancel: &CancelToken,
    ) -> Result<Vec<LocalDetectedSdk>, AppError> {
        if *kind != SdkKind::Java {
            return Ok(Vec::new());
        }

        let scanner = self.clone();
        let token = cancel.clone();
        tokio::task::spawn_blocking(move || scanner.scan_blocking(&token))
            .await
            .map_err(|e| AppError::internal(format!("本地扫描任务失败: {e}")))?
    }
}
