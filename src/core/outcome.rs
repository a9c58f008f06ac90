use crate::environments::java::candidate::{DownloadableSdk, LocalDetectedSdk, RegisteredSdk};
use crate::infrastructure::installer::{InstallTask, InstallerTaskFactory};
use serde::Serialize;
use std::path::PathBuf;

/// 本地修复的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FixOrigin {
    Registered,
    Detected,
}

/// 使用本机已有 JDK 的修复方案
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalSdkFix {
    pub existing_sdk_home: PathBuf,
    pub version_string: String,
    pub suggested_sdk_name: String,
    pub origin: FixOrigin,
}

impl From<&RegisteredSdk> for LocalSdkFix {
    fn from(sdk: &RegisteredSdk) -> Self {
        Self {
            existing_sdk_home: sdk.home_path.clone(),
            version_string: sdk.version.format_version_string(),
            suggested_sdk_name: sdk.suggested_name.clone(),
            origin: FixOrigin::Registered,
        }
    }
}

impl From<&LocalDetectedSdk> for LocalSdkFix {
    fn from(sdk: &LocalDetectedSdk) -> Self {
        Self {
            existing_sdk_home: sdk.home_path.clone(),
            version_string: sdk.version.format_version_string(),
            suggested_sdk_name: sdk.suggested_name.clone(),
            origin: FixOrigin::Detected,
        }
    }
}

/// 下载远程 JDK 的修复方案
///
/// 安装任务按需创建，本 crate 不执行。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadSdkFix {
    sdk: DownloadableSdk,
}

impl DownloadSdkFix {
    pub fn new(sdk: DownloadableSdk) -> Self {
        Self { sdk }
    }

    pub fn version_string(&self) -> &str {
        &self.sdk.version_string
    }

    pub fn download_description(&self) -> String {
        self.sdk.full_presentation_text()
    }

    pub fn sdk(&self) -> &DownloadableSdk {
        &self.sdk
    }

    /// 在默认安装目录下准备安装任务
    pub fn create_task(&self, installer: &dyn InstallerTaskFactory) -> InstallTask {
        let home_dir = installer.default_install_dir(&self.sdk);
        installer.create(&self.sdk, home_dir)
    }
}

/// 一次解析最多产生一个结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    LocalFix(LocalSdkFix),
    Download(DownloadSdkFix),
}

impl ResolutionOutcome {
    pub fn version_string(&self) -> &str {
        match self {
            ResolutionOutcome::LocalFix(fix) => &fix.version_string,
            ResolutionOutcome::Download(fix) => fix.version_string(),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ResolutionOutcome::LocalFix(_))
    }
}
