use crate::core::constants::fs as fs_consts;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// JDK home 目录校验与版本探测
pub struct JavaValidator;

impl JavaValidator {
    /// `bin/java` 可执行文件路径
    pub fn java_executable(java_home: &Path) -> PathBuf {
        let bin_dir = java_home.join("bin");
        if cfg!(target_os = "windows") {
            bin_dir.join("java.exe")
        } else {
            bin_dir.join("java")
        }
    }

    /// 检查路径是否是有效的 JDK home
    pub fn is_valid_sdk_home(java_home: &Path) -> bool {
        if !java_home.is_dir() {
            return false;
        }
        Self::java_executable(java_home).is_file()
    }

    /// 读取 `release` 文件中的键值对
    pub fn read_release_file(java_home: &Path) -> Option<HashMap<String, String>> {
        let content = fs::read_to_string(java_home.join(fs_consts::RELEASE_FILE)).ok()?;
        let entries = content
            .lines()
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| {
                (
                    key.trim().to_string(),
                    value.trim().trim_matches('"').to_string(),
                )
            })
            .collect::<HashMap<_, _>>();
        Some(entries)
    }

    /// 探测版本字符串：先读 `release` 文件，再退回 `java -version`
    pub fn detect_version_string(java_home: &Path) -> Option<String> {
        if let Some(release) = Self::read_release_file(java_home) {
            if let Some(version) = release.get("JAVA_VERSION").filter(|v| !v.is_empty()) {
                return Some(version.clone());
            }
        }
        Self::run_java_version(java_home)
    }

    /// 探测供应商描述（`IMPLEMENTOR`），没有时返回 `None`
    pub fn detect_implementor(java_home: &Path) -> Option<String> {
        Self::read_release_file(java_home)?
            .get("IMPLEMENTOR")
            .filter(|v| !v.is_empty())
            .cloned()
    }

    /// 执行 `java -version` 并取第一行中的引号内容
    fn run_java_version(java_home: &Path) -> Option<String> {
        let java_exe = Self::java_executable(java_home);
        if !java_exe.is_file() {
            return None;
        }

        let output = Command::new(java_exe).arg("-version").output().ok()?;
        if !output.status.success() {
            return None;
        }

        // 版本信息输出在 stderr，例如：openjdk version "17.0.2" 2022-01-18
        let stderr = String::from_utf8_lossy(&output.stderr);
        let first_line = stderr.lines().next()?;
        let start = first_line.find('"')?;
        let end = first_line.rfind('"')?;
        (end > start).then(|| first_line[start + 1..end].to_string())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::fs;
    use std::path::{Path, PathBuf};

    /// 在 `root/name` 下创建一个带 `bin/java` 和 `release` 文件的假 JDK
    pub fn fake_jdk(root: &Path, name: &str, version: Option<&str>, implementor: Option<&str>) -> PathBuf {
        let home = root.join(name);
        let bin = home.join("bin");
        fs::create_dir_all(&bin).unwrap();
        let exe = if cfg!(target_os = "windows") { "java.exe" } else { "java" };
        fs::write(bin.join(exe), "").unwrap();

        let mut release = String::new();
        if let Some(version) = version {
            release.push_str(&format!("JAVA_VERSION=\"{version}\"\n"));
        }
        if let Some(implementor) = implementor {
            release.push_str(&format!("IMPLEMENTOR=\"{implementor}\"\n"));
        }
        fs::write(home.join("release"), release).unwrap();
        home
    }
}

#[cfg(test)]
mod tests {
    use super::testing::fake_jdk;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_valid_sdk_home() {
        let dir = TempDir::new().unwrap();
        let home = fake_jdk(dir.path(), "jdk-17", Some("17.0.2"), None);
        assert!(JavaValidator::is_valid_sdk_home(&home));
        assert!(!JavaValidator::is_valid_sdk_home(dir.path()));
        assert!(!JavaValidator::is_valid_sdk_home(&dir.path().join("missing")));
    }

    #[test]
    fn test_read_release_file() {
        let dir = TempDir::new().unwrap();
        let home = fake_jdk(dir.path(), "jdk", Some("11.0.9.1"), Some("Amazon.com Inc."));
        assert_eq!(
            JavaValidator::detect_version_string(&home).as_deref(),
            Some("11.0.9.1")
        );
        assert_eq!(
            JavaValidator::detect_implementor(&home).as_deref(),
            Some("Amazon.com Inc.")
        );
    }
}
