use super::vendor::JdkVendor;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

/// LTS 主版本
pub const LTS_FEATURE_RELEASES: [u32; 5] = [8, 11, 17, 21, 25];

/// 解析后的 Java 版本
///
/// 排序依次比较 feature、interim、update、patch、build，
/// 数字相同时正式版高于 EA 版。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JavaVersion {
    pub feature: u32,
    pub interim: u32,
    pub update: u32,
    pub patch: u32,
    pub build: u32,
    pub ea: bool,
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d+(?:\.\d+)*)(?:_(\d+))?(?:-(ea|internal))?(?:(?:\+|-b)(\d+))?")
            .unwrap_or_else(|e| panic!("内置版本正则无效: {e}"))
    })
}

impl JavaVersion {
    pub fn new(feature: u32) -> Self {
        Self {
            feature,
            interim: 0,
            update: 0,
            patch: 0,
            build: 0,
            ea: false,
        }
    }

    /// 尝试从版本字符串解析
    ///
    /// 支持 `1.8.0_292`、`11.0.2`、`17`、`21.0.4+7`、`17.0.2-ea`，
    /// 以及 `openjdk version "17.0.2" 2022-01-18` 这类命令输出。
    /// 找不到可识别的版本号时返回 `None`。
    pub fn try_parse(text: &str) -> Option<Self> {
        let caps = version_regex().captures(text.trim())?;

        let numbers = caps
            .get(1)?
            .as_str()
            .split('.')
            .map(|part| part.parse::<u32>().ok())
            .collect::<Option<Vec<u32>>>()?;

        let underscore_update = match caps.get(2) {
            Some(m) => Some(m.as_str().parse::<u32>().ok()?),
            None => None,
        };
        let build = match caps.get(4) {
            Some(m) => m.as_str().parse::<u32>().ok()?,
            None => 0,
        };
        let ea = caps.get(3).is_some();

        // 1.x 旧式版本号：1.8.0_292 -> feature 8, update 292
        let (feature, interim, update, patch) = if numbers[0] == 1 && numbers.len() >= 2 {
            (
                numbers[1],
                0,
                underscore_update.unwrap_or_else(|| numbers.get(3).copied().unwrap_or(0)),
                0,
            )
        } else {
            (
                numbers[0],
                numbers.get(1).copied().unwrap_or(0),
                numbers
                    .get(2)
                    .copied()
                    .or(underscore_update)
                    .unwrap_or(0),
                numbers.get(3).copied().unwrap_or(0),
            )
        };

        // 年份、端口号之类的数字不是 Java 版本
        if feature == 0 || feature > 99 {
            return None;
        }

        Some(Self {
            feature,
            interim,
            update,
            patch,
            build,
            ea,
        })
    }

    pub fn is_lts(&self) -> bool {
        LTS_FEATURE_RELEASES.contains(&self.feature)
    }

    /// 8 及以下使用 `1.8` 形式
    pub fn feature_label(&self) -> String {
        if self.feature <= 8 {
            format!("1.{}", self.feature)
        } else {
            self.feature.to_string()
        }
    }

    /// 格式化为标准版本字符串：`1.8.0_292` 或 `11.0.2`
    pub fn format_version_string(&self) -> String {
        let mut text = if self.feature <= 8 {
            let mut s = format!("1.{}.0", self.feature);
            if self.update > 0 {
                s.push_str(&format!("_{}", self.update));
            }
            s
        } else {
            let mut s = format!("{}.{}.{}", self.feature, self.interim, self.update);
            if self.patch > 0 {
                s.push_str(&format!(".{}", self.patch));
            }
            s
        };

        if self.ea {
            text.push_str("-ea");
        }
        text
    }

    /// 数字部分是否以 `prefix` 的各段开头（`prefix` 中缺失的段视为通配）
    pub fn starts_with(&self, prefix: &JavaVersion, segments: usize) -> bool {
        let mine = [self.feature, self.interim, self.update, self.patch];
        let theirs = [prefix.feature, prefix.interim, prefix.update, prefix.patch];
        mine.iter()
            .zip(theirs.iter())
            .take(segments.min(4))
            .all(|(a, b)| a == b)
    }
}

impl Ord for JavaVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.feature, self.interim, self.update, self.patch, self.build)
            .cmp(&(
                other.feature,
                other.interim,
                other.update,
                other.patch,
                other.build,
            ))
            .then_with(|| other.ea.cmp(&self.ea))
    }
}

impl PartialOrd for JavaVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_version_string())
    }
}

/// 根据版本字符串建议 SDK 名称，如 `corretto-11`、`1.8`、`17`
///
/// 版本无法解析时返回 `None`，调用方应丢弃该候选。
pub fn suggest_jdk_name(version_string: &str, vendor: Option<JdkVendor>) -> Option<String> {
    let version = JavaVersion::try_parse(version_string)?;
    let vendor = vendor.or_else(|| JdkVendor::detect(version_string));

    let mut name = match vendor {
        Some(v) if v != JdkVendor::OpenJdk && v != JdkVendor::Oracle => {
            format!("{}-{}", v.id(), version.feature_label())
        }
        _ => version.feature_label(),
    };
    if version.ea {
        name.push_str("-ea");
    }
    Some(name)
}
