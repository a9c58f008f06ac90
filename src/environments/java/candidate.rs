use super::vendor::JdkVendor;
use super::version::JavaVersion;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 参与匹配的候选 SDK 的公共视图
pub trait SdkCandidate {
    /// 版本未知或无法解析时为 `None`，这类候选不会被匹配
    fn version(&self) -> Option<&JavaVersion>;

    fn vendor(&self) -> Option<JdkVendor>;

    /// 候选是否可用（例如已注册 SDK 的 home 已通过校验）
    fn is_usable(&self) -> bool {
        true
    }
}

/// 用户已注册的 SDK
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredSdk {
    pub name: String,
    pub home_path: PathBuf,
    pub version_string: String,
    pub version: JavaVersion,
    pub suggested_name: String,
    pub vendor: Option<JdkVendor>,
    /// home 是否通过了 JDK 目录校验
    pub valid_home: bool,
}

/// 本机扫描到的 JDK
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalDetectedSdk {
    pub home_path: PathBuf,
    pub version_string: String,
    pub version: JavaVersion,
    pub suggested_name: String,
    pub vendor: Option<JdkVendor>,
}

/// 远程目录中某个平台的安装包
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePackage {
    pub os: String,
    pub arch: String,
    pub package_type: String,
    pub url: String,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub size: u64,
    /// 压缩包内 JDK 根目录的前缀
    #[serde(default)]
    pub unpack_prefix: Option<String>,
}

/// 远程目录中可下载的 JDK
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadableSdk {
    pub vendor: Option<JdkVendor>,
    pub vendor_name: String,
    pub product: String,
    pub version_string: String,
    /// 目录中的版本字符串无法解析时为 `None`
    pub version: Option<JavaVersion>,
    pub suggested_name: String,
    pub lts: bool,
    pub package: RemotePackage,
}

impl DownloadableSdk {
    pub fn new(
        vendor_name: &str,
        product: &str,
        version_string: &str,
        suggested_name: Option<&str>,
        package: RemotePackage,
    ) -> Self {
        let vendor = JdkVendor::detect(&format!("{vendor_name} {product}"));
        let version = JavaVersion::try_parse(version_string);
        let suggested_name = suggested_name
            .map(|s| s.to_string())
            .or_else(|| super::version::suggest_jdk_name(version_string, vendor))
            .unwrap_or_else(|| version_string.to_string());
        let lts = version.as_ref().is_some_and(|v| v.is_lts());

        Self {
            vendor,
            vendor_name: vendor_name.to_string(),
            product: product.to_string(),
            version_string: version_string.to_string(),
            version,
            suggested_name,
            lts,
            package,
        }
    }

    /// 展示给用户的完整描述，如 `Amazon Corretto 11.0.9.1 (x64, tar.gz)`
    pub fn full_presentation_text(&self) -> String {
        let mut text = if self.product.is_empty() || self.vendor_name.contains(&self.product) {
            format!("{} {}", self.vendor_name, self.version_string)
        } else {
            format!("{} {} {}", self.vendor_name, self.product, self.version_string)
        };
        if self.lts {
            text.push_str(" (LTS)");
        }
        text.push_str(&format!(" [{}, {}]", self.package.arch, self.package.package_type));
        text
    }
}

impl SdkCandidate for RegisteredSdk {
    fn version(&self) -> Option<&JavaVersion> {
        Some(&self.version)
    }

    fn vendor(&self) -> Option<JdkVendor> {
        self.vendor
    }

    fn is_usable(&self) -> bool {
        self.valid_home
    }
}

impl SdkCandidate for LocalDetectedSdk {
    fn version(&self) -> Option<&JavaVersion> {
        Some(&self.version)
    }

    fn vendor(&self) -> Option<JdkVendor> {
        self.vendor
    }
}

impl SdkCandidate for DownloadableSdk {
    fn version(&self) -> Option<&JavaVersion> {
        self.version.as_ref()
    }

    fn vendor(&self) -> Option<JdkVendor> {
        self.vendor
    }
}

/// 三类候选的统一表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum CandidateSdk {
    Registered(RegisteredSdk),
    Local(LocalDetectedSdk),
    Downloadable(DownloadableSdk),
}

impl CandidateSdk {
    pub fn source_name(&self) -> &'static str {
        match self {
            CandidateSdk::Registered(_) => "registered",
            CandidateSdk::Local(_) => "local",
            CandidateSdk::Downloadable(_) => "download",
        }
    }

    /// 用于列表展示的一行描述
    pub fn describe(&self) -> String {
        match self {
            CandidateSdk::Registered(sdk) => {
                format!("{} ({}) {}", sdk.name, sdk.version_string, sdk.home_path.display())
            }
            CandidateSdk::Local(sdk) => {
                format!("{} ({}) {}", sdk.suggested_name, sdk.version_string, sdk.home_path.display())
            }
            CandidateSdk::Downloadable(sdk) => sdk.full_presentation_text(),
        }
    }
}

impl SdkCandidate for CandidateSdk {
    fn version(&self) -> Option<&JavaVersion> {
        match self {
            CandidateSdk::Registered(sdk) => sdk.version(),
            CandidateSdk::Local(sdk) => sdk.version(),
            CandidateSdk::Downloadable(sdk) => sdk.version(),
        }
    }

    fn vendor(&self) -> Option<JdkVendor> {
        match self {
            CandidateSdk::Registered(sdk) => sdk.vendor(),
            CandidateSdk::Local(sdk) => sdk.vendor(),
            CandidateSdk::Downloadable(sdk) => sdk.vendor(),
        }
    }

    fn is_usable(&self) -> bool {
        match self {
            CandidateSdk::Registered(sdk) => sdk.is_usable(),
            CandidateSdk::Local(sdk) => sdk.is_usable(),
            CandidateSdk::Downloadable(sdk) => sdk.is_usable(),
        }
    }
}

impl From<RegisteredSdk> for CandidateSdk {
    fn from(sdk: RegisteredSdk) -> Self {
        CandidateSdk::Registered(sdk)
    }
}

impl From<LocalDetectedSdk> for CandidateSdk {
    fn from(sdk: LocalDetectedSdk) -> Self {
        CandidateSdk::Local(sdk)
    }
}

impl From<DownloadableSdk> for CandidateSdk {
    fn from(sdk: DownloadableSdk) -> Self {
        CandidateSdk::Downloadable(sdk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package() -> RemotePackage {
        RemotePackage {
            os: "linux".to_string(),
            arch: "x64".to_string(),
            package_type: "tar.gz".to_string(),
            url: "https://example.com/jdk.tar.gz".to_string(),
            sha256: None,
            size: 0,
            unpack_prefix: None,
        }
    }

    #[test]
    fn test_downloadable_sdk_new() {
        let sdk = DownloadableSdk::new("Amazon", "Corretto", "11.0.9.1", None, package());
        assert_eq!(sdk.vendor, Some(JdkVendor::Corretto));
        assert_eq!(sdk.suggested_name, "corretto-11");
        assert!(sdk.lts);
        assert_eq!(
            sdk.full_presentation_text(),
            "Amazon Corretto 11.0.9.1 (LTS) [x64, tar.gz]"
        );
    }

    #[test]
    fn test_downloadable_sdk_unparseable_version() {
        let sdk = DownloadableSdk::new("Acme", "", "nightly", Some("acme"), package());
        assert!(sdk.version().is_none());
        assert_eq!(sdk.suggested_name, "acme");
        assert!(!sdk.lts);
    }

    #[test]
    fn test_candidate_view_delegates() {
        let sdk = DownloadableSdk::new("Eclipse", "Temurin", "17.0.2", None, package());
        let candidate = CandidateSdk::from(sdk);
        assert_eq!(candidate.source_name(), "download");
        assert_eq!(candidate.vendor(), Some(JdkVendor::Temurin));
        assert_eq!(candidate.version().map(|v| v.feature), Some(17));
    }
}
