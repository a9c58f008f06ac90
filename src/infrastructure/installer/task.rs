use crate::environments::java::candidate::DownloadableSdk;
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

/// 安装包格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveKind {
    Zip,
    TarGz,
    Unknown,
}

impl ArchiveKind {
    /// 优先看目录声明的类型，其次看下载地址后缀
    pub fn detect(package_type: &str, url: &str) -> Self {
        let declared = package_type.trim().to_lowercase();
        match declared.as_str() {
            "zip" => return ArchiveKind::Zip,
            "tar.gz" | "targz" | "tgz" => return ArchiveKind::TarGz,
            _ => {}
        }

        let url = url.to_lowercase();
        if url.ends_with(".zip") {
            ArchiveKind::Zip
        } else if url.ends_with(".tar.gz") || url.ends_with(".tgz") {
            ArchiveKind::TarGz
        } else {
            ArchiveKind::Unknown
        }
    }
}

/// 延迟执行的 JDK 安装任务
///
/// 只描述“下载什么、装到哪里”，由调用方决定何时执行。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallTask {
    pub id: Uuid,
    pub sdk_name: String,
    pub version_string: String,
    pub url: String,
    pub sha256: Option<String>,
    pub size: u64,
    pub archive: ArchiveKind,
    pub unpack_prefix: Option<String>,
    pub target_dir: PathBuf,
}

/// 安装任务工厂
pub trait InstallerTaskFactory: Send + Sync {
    /// 该 JDK 的默认安装目录
    fn default_install_dir(&self, sdk: &DownloadableSdk) -> PathBuf;

    fn create(&self, sdk: &DownloadableSdk, target_dir: PathBuf) -> InstallTask;
}

/// 安装到统一根目录下的任务工厂，目录名取建议名称
#[derive(Debug, Clone)]
pub struct DirectoryInstaller {
    install_root: PathBuf,
}

impl DirectoryInstaller {
    pub fn new(install_root: impl Into<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
        }
    }

    /// 去掉目录名中不安全的字符
    fn dir_name(sdk: &DownloadableSdk) -> String {
        let base = format!("{}-{}", sdk.suggested_name, sdk.version_string);
        let cleaned: String = base
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '+') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        cleaned.trim_matches('_').to_string()
    }
}

impl InstallerTaskFactory for DirectoryInstaller {
    fn default_install_dir(&self, sdk: &DownloadableSdk) -> PathBuf {
        self.install_root.join(Self::dir_name(sdk))
    }

    fn create(&self, sdk: &DownloadableSdk, target_dir: PathBuf) -> InstallTask {
        InstallTask {
            id: Uuid::new_v4(),
            sdk_name: sdk.suggested_name.clone(),
            version_string: sdk.version_string.clone(),
            url: sdk.package.url.clone(),
            sha256: sdk.package.sha256.clone(),
            size: sdk.package.size,
            archive: ArchiveKind::detect(&sdk.package.package_type, &sdk.package.url),
            unpack_prefix: sdk.package.unpack_prefix.clone(),
            target_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matcher::fixtures::downloadable;

    #[test]
    fn test_archive_kind_detect() {
        assert_eq!(ArchiveKind::detect("zip", "https://x/y"), ArchiveKind::Zip);
        assert_eq!(ArchiveKind::detect("", "https://x/jdk.tar.gz"), ArchiveKind::TarGz);
        assert_eq!(ArchiveKind::detect("msi", "https://x/jdk.msi"), ArchiveKind::Unknown);
    }

    #[test]
    fn test_default_install_dir() {
        let installer = DirectoryInstaller::new("/home/dev/.jdks");
        let sdk = downloadable("17.0.2+8");
        assert_eq!(
            installer.default_install_dir(&sdk),
            PathBuf::from("/home/dev/.jdks/temurin-17-17.0.2+8")
        );
    }

    #[test]
    fn test_create_task_copies_package() {
        let installer = DirectoryInstaller::new("/opt/jdks");
        let sdk = downloadable("21.0.1");
        let target = installer.default_install_dir(&sdk);
        let task = installer.create(&sdk, target.clone());

        assert_eq!(task.target_dir, target);
        assert_eq!(task.url, "https://example.com/temurin-21.0.1.tar.gz");
        assert_eq!(task.archive, ArchiveKind::TarGz);
        assert_eq!(task.sdk_name, "temurin-21");
    }
}
