use serde::{Deserialize, Serialize};
use std::fmt;

/// JDK 供应商
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JdkVendor {
    Temurin,
    Corretto,
    Zulu,
    Liberica,
    GraalVm,
    SapMachine,
    Microsoft,
    Oracle,
    OpenJdk,
}

impl JdkVendor {
    pub const ALL: [JdkVendor; 9] = [
        JdkVendor::Temurin,
        JdkVendor::Corretto,
        JdkVendor::Zulu,
        JdkVendor::Liberica,
        JdkVendor::GraalVm,
        JdkVendor::SapMachine,
        JdkVendor::Microsoft,
        JdkVendor::Oracle,
        JdkVendor::OpenJdk,
    ];

    /// 用于名称前缀的短标识，如 `corretto-11`
    pub fn id(&self) -> &'static str {
        match self {
            JdkVendor::Temurin => "temurin",
            JdkVendor::Corretto => "corretto",
            JdkVendor::Zulu => "zulu",
            JdkVendor::Liberica => "liberica",
            JdkVendor::GraalVm => "graalvm",
            JdkVendor::SapMachine => "sapmachine",
            JdkVendor::Microsoft => "ms",
            JdkVendor::Oracle => "oracle",
            JdkVendor::OpenJdk => "openjdk",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            JdkVendor::Temurin => "Eclipse Temurin",
            JdkVendor::Corretto => "Amazon Corretto",
            JdkVendor::Zulu => "Azul Zulu",
            JdkVendor::Liberica => "BellSoft Liberica",
            JdkVendor::GraalVm => "GraalVM",
            JdkVendor::SapMachine => "SapMachine",
            JdkVendor::Microsoft => "Microsoft",
            JdkVendor::Oracle => "Oracle",
            JdkVendor::OpenJdk => "OpenJDK",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            JdkVendor::Temurin => &["temurin", "adoptium", "adoptopenjdk", "adopt"],
            JdkVendor::Corretto => &["corretto", "amazon"],
            JdkVendor::Zulu => &["zulu", "azul"],
            JdkVendor::Liberica => &["liberica", "bellsoft"],
            JdkVendor::GraalVm => &["graalvm", "graal"],
            JdkVendor::SapMachine => &["sapmachine", "sap"],
            JdkVendor::Microsoft => &["microsoft", "ms"],
            JdkVendor::Oracle => &["oracle"],
            JdkVendor::OpenJdk => &["openjdk"],
        }
    }

    /// 精确匹配别名（不区分大小写）
    pub fn from_alias(alias: &str) -> Option<Self> {
        let alias = alias.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|vendor| vendor.aliases().contains(&alias.as_str()))
    }

    /// 从路径、`IMPLEMENTOR` 或版本输出等自由文本中识别供应商
    ///
    /// `openjdk` 出现在几乎所有发行版的输出里，所以只有在没有更具体的
    /// 供应商时才会被识别。
    pub fn detect(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        Self::ALL
            .into_iter()
            .filter(|vendor| *vendor != JdkVendor::OpenJdk)
            .find(|vendor| {
                vendor
                    .aliases()
                    .iter()
                    .filter(|alias| alias.len() > 3)
                    .any(|alias| lower.contains(alias))
            })
            .or_else(|| lower.contains("openjdk").then_some(JdkVendor::OpenJdk))
    }
}

impl fmt::Display for JdkVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_vendor() {
        assert_eq!(
            JdkVendor::detect("/usr/lib/jvm/adoptopenjdk-11"),
            Some(JdkVendor::Temurin)
        );
        assert_eq!(
            JdkVendor::detect("C:\\Program Files\\Amazon Corretto\\jdk17"),
            Some(JdkVendor::Corretto)
        );
        assert_eq!(
            JdkVendor::detect("openjdk version \"17.0.2\" 2022-01-18"),
            Some(JdkVendor::OpenJdk)
        );
        assert_eq!(JdkVendor::detect("/opt/java/jdk-17"), None);
    }

    #[test]
    fn test_from_alias() {
        assert_eq!(JdkVendor::from_alias("Adopt"), Some(JdkVendor::Temurin));
        assert_eq!(JdkVendor::from_alias("azul"), Some(JdkVendor::Zulu));
        assert_eq!(JdkVendor::from_alias("jdk"), None);
    }
}
