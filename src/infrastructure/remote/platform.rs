use std::fmt;

/// 简单封装的平台信息，统一 OS / Arch 的判定。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    pub fn new(os: &str, arch: &str) -> Self {
        Platform {
            os: Self::normalize_os(os),
            arch: Self::normalize_arch(arch),
        }
    }

    /// 检测当前运行平台。
    pub fn current() -> Self {
        let os = if cfg!(target_os = "windows") {
            "windows"
        } else if cfg!(target_os = "macos") {
            "macos"
        } else if cfg!(target_os = "linux") {
            "linux"
        } else {
            "unknown"
        };

        let arch = if cfg!(target_arch = "x86_64") {
            "x64"
        } else if cfg!(target_arch = "aarch64") {
            "aarch64"
        } else if cfg!(target_arch = "x86") {
            "x86"
        } else {
            "unknown"
        };

        Platform {
            os: os.to_string(),
            arch: arch.to_string(),
        }
    }

    /// 目录里常见的系统写法统一成 windows / macos / linux
    pub fn normalize_os(os: &str) -> String {
        let lower = os.trim().to_lowercase();
        match lower.as_str() {
            "windows" | "win" | "win32" => "windows".to_string(),
            "macos" | "mac" | "osx" | "darwin" => "macos".to_string(),
            "linux" => "linux".to_string(),
            _ => lower,
        }
    }

    /// 统一成 x64 / aarch64 / x86
    pub fn normalize_arch(arch: &str) -> String {
        let lower = arch.trim().to_lowercase();
        match lower.as_str() {
            "x64" | "x86_64" | "amd64" => "x64".to_string(),
            "aarch64" | "arm64" => "aarch64".to_string(),
            "x86" | "i386" | "i686" | "x32" => "x86".to_string(),
            _ => lower,
        }
    }

    /// 目录条目声明的平台是否与本平台一致
    pub fn matches(&self, os: &str, arch: &str) -> bool {
        Self::normalize_os(os) == self.os && Self::normalize_arch(arch) == self.arch
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}
