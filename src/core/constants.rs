//! 应用程序常量定义
//!
//! 本模块包含全局使用的常量，避免魔数并提供统一的配置值。

/// 网络相关常量
pub mod network {
    /// 目录请求超时时间（秒）
    pub const CATALOG_TIMEOUT_SECS: u64 = 30;
    /// 请求头中的 User-Agent
    pub const USER_AGENT: &str = concat!("jdkauto/", env!("CARGO_PKG_VERSION"));
    /// 默认 JDK 目录地址
    pub const DEFAULT_CATALOG_URL: &str = "https://download.jetbrains.com/jdk/feed/v1/jdks.json";
}

/// 缓存相关常量
pub mod cache {
    /// 目录磁盘缓存默认 TTL（秒）
    pub const DEFAULT_CATALOG_TTL: u64 = 3600; // 1小时
    /// 目录缓存文件名（不含扩展名）
    pub const CATALOG_CACHE_KEY: &str = "jdk_catalog";
}

/// 文件系统相关常量
pub mod fs {
    /// 应用数据目录名（位于用户目录下）
    pub const APP_DIR_NAME: &str = ".jdkauto";
    /// 配置文件名
    pub const CONFIG_FILE_NAME: &str = "config.toml";
    /// 默认 JDK 安装目录名（位于用户目录下）
    pub const DEFAULT_INSTALL_DIR_NAME: &str = ".jdks";
    /// JDK 根目录下的版本描述文件
    pub const RELEASE_FILE: &str = "release";
}

/// 环境变量相关常量
pub mod env {
    /// 覆盖配置文件路径
    pub const CONFIG_PATH: &str = "JDKAUTO_CONFIG";
    pub const JAVA_HOME: &str = "JAVA_HOME";
}

/// 日志相关常量
pub mod log {
    /// 默认日志过滤
    pub const DEFAULT_FILTER: &str = "jdkauto=info";
    /// `--debug` 时的日志过滤
    pub const DEBUG_FILTER: &str = "jdkauto=debug";
}
