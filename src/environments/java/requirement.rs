use super::vendor::JdkVendor;
use super::version::JavaVersion;
use serde::{Deserialize, Serialize};
use std::fmt;

/// SDK 类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdkKind {
    Java,
    Other(String),
}

impl SdkKind {
    pub fn parse(kind: &str) -> Self {
        match kind.trim().to_lowercase().as_str() {
            "java" | "jdk" => SdkKind::Java,
            other => SdkKind::Other(other.to_string()),
        }
    }

    pub fn presentable_name(&self) -> &str {
        match self {
            SdkKind::Java => "JDK",
            SdkKind::Other(name) => name,
        }
    }
}

/// 项目声明但本地尚未配置的 SDK
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownSdk {
    pub name: String,
    pub kind: SdkKind,
}

impl UnknownSdk {
    pub fn java(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: SdkKind::Java,
        }
    }
}

impl fmt::Display for UnknownSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind.presentable_name(), self.name)
    }
}

/// 版本约束
#[derive(Debug, Clone, PartialEq)]
pub enum VersionSpec {
    /// 同一主版本，如 `17`、`1.8`
    Major(u32),
    /// 版本前缀，如 `11.0.2`，只比较前 `segments` 段
    Prefix { version: JavaVersion, segments: usize },
    /// `11+`
    AtLeast(u32),
    /// `8-11`，闭区间
    Range(u32, u32),
    LatestLts,
    Latest,
}

impl VersionSpec {
    pub fn matches(&self, version: &JavaVersion) -> bool {
        match self {
            VersionSpec::Major(major) => version.feature == *major,
            VersionSpec::Prefix {
                version: prefix,
                segments,
            } => version.starts_with(prefix, *segments),
            VersionSpec::AtLeast(min) => version.feature >= *min,
            VersionSpec::Range(start, end) => version.feature >= *start && version.feature <= *end,
            VersionSpec::LatestLts => version.is_lts(),
            VersionSpec::Latest => true,
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Major(major) => write!(f, "{major}"),
            VersionSpec::Prefix { version, .. } => write!(f, "{version}*"),
            VersionSpec::AtLeast(min) => write!(f, ">= {min}"),
            VersionSpec::Range(start, end) => write!(f, "{start}..={end}"),
            VersionSpec::LatestLts => f.write_str("lts"),
            VersionSpec::Latest => f.write_str("latest"),
        }
    }
}

/// 从未知 SDK 名称中解析出的 JDK 要求
#[derive(Debug, Clone, PartialEq)]
pub struct JdkRequirement {
    pub version: VersionSpec,
    pub vendor: Option<JdkVendor>,
}

impl JdkRequirement {
    pub fn new(version: VersionSpec) -> Self {
        Self {
            version,
            vendor: None,
        }
    }

    pub fn with_vendor(mut self, vendor: JdkVendor) -> Self {
        self.vendor = Some(vendor);
        self
    }

    pub fn matches_version(&self, version: &JavaVersion) -> bool {
        self.version.matches(version)
    }

    /// 有供应商约束时，供应商未知的候选不满足
    pub fn matches_vendor(&self, vendor: Option<JdkVendor>) -> bool {
        match self.vendor {
            None => true,
            Some(required) => vendor == Some(required),
        }
    }
}

impl fmt::Display for JdkRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.vendor {
            Some(vendor) => write!(f, "{} {}", vendor.id(), self.version),
            None => write!(f, "{}", self.version),
        }
    }
}

/// 从未知 SDK 解析要求；返回 `None` 表示名称中没有可用的要求，跳过解析
pub trait RequirementParser: Send + Sync {
    fn parse(&self, sdk: &UnknownSdk) -> Option<JdkRequirement>;
}

/// 默认的名称解析器
///
/// 支持 `17`、`jdk-17`、`1.8`、`11.0.2`、`11+`、`8-11`、`lts`、`latest`
/// 以及带供应商前缀的 `corretto-11`、`adopt-openjdk-14`。
#[derive(Debug, Default, Clone, Copy)]
pub struct JdkRequirements;

const NOISE_TOKENS: [&str; 5] = ["jdk", "java", "jre", "openjdk", "hotspot"];

impl JdkRequirements {
    pub fn parse_requirement(name: &str) -> Option<JdkRequirement> {
        let cleaned = name.trim().to_lowercase();
        if cleaned.is_empty() {
            return None;
        }

        match cleaned.as_str() {
            "lts" | "latest-lts" => return Some(JdkRequirement::new(VersionSpec::LatestLts)),
            "latest" | "newest" => return Some(JdkRequirement::new(VersionSpec::Latest)),
            _ => {}
        }

        let normalized = cleaned.split_whitespace().collect::<Vec<_>>().join("-");

        let mut vendor = None;
        let mut rest = Vec::new();
        for token in normalized.split('-').filter(|t| !t.is_empty()) {
            if !rest.is_empty() {
                rest.push(token);
                continue;
            }
            if NOISE_TOKENS.contains(&token) {
                continue;
            }
            if let Some(found) = JdkVendor::from_alias(token) {
                vendor.get_or_insert(found);
                continue;
            }
            rest.push(token);
        }

        let version_part = rest.join("-");
        let version = Self::parse_version_spec(&version_part)?;

        let mut requirement = JdkRequirement::new(version);
        requirement.vendor = vendor;
        Some(requirement)
    }

    /// 解析版本部分
    pub fn parse_version_spec(spec: &str) -> Option<VersionSpec> {
        let cleaned = spec
            .trim()
            .trim_start_matches("openjdk")
            .trim_start_matches("jdk")
            .trim_start_matches("java")
            .trim_start_matches('v')
            .trim();
        // 建议名称会带 `-ea` 后缀，如 `17-ea`，版本约束与 `17` 相同
        let cleaned = cleaned.strip_suffix("-ea").unwrap_or(cleaned);

        if cleaned.is_empty() {
            return None;
        }

        if let Some(base) = cleaned.strip_suffix('+') {
            return Self::parse_major(base).map(VersionSpec::AtLeast);
        }

        if let Some((start, end)) = cleaned.split_once('-') {
            let start = Self::parse_major(start)?;
            let end = Self::parse_major(end)?;
            return (start <= end).then_some(VersionSpec::Range(start, end));
        }

        if let Ok(major) = cleaned.parse::<u32>() {
            return (major > 0 && major < 100).then_some(VersionSpec::Major(major));
        }

        if !cleaned
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == '_')
        {
            return None;
        }

        let version = JavaVersion::try_parse(cleaned)?;
        let legacy = cleaned.starts_with("1.");
        let dots = cleaned.split('.').count();

        // 1.8 等价于 8
        if legacy && dots == 2 && !cleaned.contains('_') {
            return Some(VersionSpec::Major(version.feature));
        }

        let segments = if legacy {
            // 1.8.0_292: feature、interim(恒为 0)、update
            if cleaned.contains('_') {
                3
            } else {
                1
            }
        } else {
            dots
        };

        Some(VersionSpec::Prefix { version, segments })
    }

    /// `1.8` 形式也接受为主版本
    fn parse_major(text: &str) -> Option<u32> {
        let text = text.trim();
        if let Some(legacy) = text.strip_prefix("1.") {
            return legacy.parse::<u32>().ok().filter(|m| *m > 0 && *m <= 8);
        }
        text.parse::<u32>().ok().filter(|m| *m > 0 && *m < 100)
    }
}

impl RequirementParser for JdkRequirements {
    fn parse(&self, sdk: &UnknownSdk) -> Option<JdkRequirement> {
        Self::parse_requirement(&sdk.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environments::java::version::suggest_jdk_name;

    fn parse(name: &str) -> Option<JdkRequirement> {
        JdkRequirements::parse_requirement(name)
    }

    fn version(text: &str) -> JavaVersion {
        JavaVersion::try_parse(text).unwrap()
    }

    #[test]
    fn test_parse_version_spec() {
        assert_eq!(parse("17").unwrap().version, VersionSpec::Major(17));
        assert_eq!(parse("v21").unwrap().version, VersionSpec::Major(21));
        assert_eq!(parse("jdk21").unwrap().version, VersionSpec::Major(21));
        assert_eq!(parse("jdk-17").unwrap().version, VersionSpec::Major(17));
        assert_eq!(parse("Java 11").unwrap().version, VersionSpec::Major(11));
        assert_eq!(parse("1.8").unwrap().version, VersionSpec::Major(8));
        assert_eq!(parse("lts").unwrap().version, VersionSpec::LatestLts);
        assert_eq!(parse("latest").unwrap().version, VersionSpec::Latest);
        assert_eq!(parse("8-11").unwrap().version, VersionSpec::Range(8, 11));
        assert_eq!(parse("17+").unwrap().version, VersionSpec::AtLeast(17));
        assert_eq!(parse("1.8+").unwrap().version, VersionSpec::AtLeast(8));
    }

    #[test]
    fn test_parse_vendor_prefix() {
        let req = parse("corretto-11").unwrap();
        assert_eq!(req.vendor, Some(JdkVendor::Corretto));
        assert_eq!(req.version, VersionSpec::Major(11));

        let req = parse("adopt-openjdk-14").unwrap();
        assert_eq!(req.vendor, Some(JdkVendor::Temurin));
        assert_eq!(req.version, VersionSpec::Major(14));

        let req = parse("zulu-1.8").unwrap();
        assert_eq!(req.vendor, Some(JdkVendor::Zulu));
        assert_eq!(req.version, VersionSpec::Major(8));

        assert_eq!(parse("openjdk-17").unwrap().vendor, None);
    }

    #[test]
    fn test_unparseable_names() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("My SDK"), None);
        assert_eq!(parse("corretto"), None);
        assert_eq!(parse("11-8"), None);
        assert_eq!(parse("2022"), None);
    }

    #[test]
    fn test_prefix_matching() {
        let req = parse("11.0.2").unwrap();
        assert!(req.matches_version(&version("11.0.2")));
        assert!(req.matches_version(&version("11.0.2+9")));
        assert!(!req.matches_version(&version("11.0.20")));
        assert!(!req.matches_version(&version("11.0.3")));

        let req = parse("1.8.0_292").unwrap();
        assert!(req.matches_version(&version("1.8.0_292-b10")));
        assert!(!req.matches_version(&version("1.8.0_301")));
    }

    #[test]
    fn test_range_matching() {
        let req = parse("11+").unwrap();
        assert!(req.matches_version(&version("11.0.2")));
        assert!(req.matches_version(&version("21")));
        assert!(!req.matches_version(&version("1.8.0_292")));

        let req = parse("8-11").unwrap();
        assert!(req.matches_version(&version("1.8.0_292")));
        assert!(!req.matches_version(&version("17")));

        let req = parse("lts").unwrap();
        assert!(req.matches_version(&version("17.0.1")));
        assert!(!req.matches_version(&version("19")));
    }

    #[test]
    fn test_vendor_matching() {
        let req = parse("corretto-11").unwrap();
        assert!(req.matches_vendor(Some(JdkVendor::Corretto)));
        assert!(!req.matches_vendor(Some(JdkVendor::Zulu)));
        assert!(!req.matches_vendor(None));
        assert!(parse("11").unwrap().matches_vendor(None));
    }

    #[test]
    fn test_suggested_names_parse_back() {
        let cases = [
            ("17.0.2-ea", None),
            ("1.8.0_292", None),
            ("21.0.1", Some(JdkVendor::Corretto)),
            ("11.0.9.1", Some(JdkVendor::Temurin)),
        ];
        for (text, vendor) in cases {
            let name = suggest_jdk_name(text, vendor).unwrap();
            let requirement = parse(&name).unwrap_or_else(|| panic!("{name} should parse"));
            assert!(requirement.matches_version(&version(text)), "{name} vs {text}");
            assert!(requirement.matches_vendor(vendor), "{name}");
        }

        assert_eq!(parse("17-ea").unwrap().version, VersionSpec::Major(17));
        assert_eq!(parse("8-11").unwrap().version, VersionSpec::Range(8, 11));
    }

    #[test]
    fn test_parser_trait() {
        let parser = JdkRequirements;
        assert!(parser.parse(&UnknownSdk::java("17")).is_some());
        assert!(parser.parse(&UnknownSdk::java("project-sdk")).is_none());
    }
}
