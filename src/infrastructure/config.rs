use crate::core::constants::{cache, env as env_keys, fs as fs_consts, network};
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// 配置文件结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 是否启用未知 JDK 的自动解析
    #[serde(default = "default_auto_setup")]
    pub auto_setup: bool,
    /// 远程 JDK 目录地址
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,
    /// 目录磁盘缓存 TTL（秒），0 表示不缓存
    #[serde(default = "default_catalog_cache_ttl")]
    pub catalog_cache_ttl: u64,
    /// 下载的 JDK 安装根目录，默认 `~/.jdks`
    #[serde(default)]
    pub install_dir: Option<String>,
    /// 额外的本地扫描根目录
    #[serde(default)]
    pub scan_roots: Vec<String>,
    /// 已注册的 JDK
    #[serde(default)]
    pub java_environments: Vec<JavaEnvironment>,
}

fn default_auto_setup() -> bool {
    true
}

fn default_catalog_url() -> String {
    network::DEFAULT_CATALOG_URL.to_string()
}

fn default_catalog_cache_ttl() -> u64 {
    cache::DEFAULT_CATALOG_TTL
}

/// 已注册的 Java 环境
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JavaEnvironment {
    pub name: String,
    pub java_home: String,
    /// 注册时记录的版本；缺失时从 home 探测
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// 创建默认配置
    pub fn new() -> Self {
        Config {
            auto_setup: default_auto_setup(),
            catalog_url: default_catalog_url(),
            catalog_cache_ttl: default_catalog_cache_ttl(),
            install_dir: None,
            scan_roots: Vec::new(),
            java_environments: Vec::new(),
        }
    }

    /// 从默认位置加载配置，不存在时写入默认配置
    pub fn load() -> AppResult<Self> {
        let config_path = get_config_path()?;

        if !config_path.exists() {
            let config = Config::new();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// 从指定文件加载配置
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::config_load_failed(&path.display().to_string(), &e.to_string()))?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            AppError::config_load_failed(&path.display().to_string(), &e.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到默认位置
    pub fn save(&self) -> AppResult<()> {
        self.save_to(&get_config_path()?)
    }

    /// 保存配置到指定文件
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_content = toml::to_string_pretty(self)
            .map_err(|e| AppError::config(format!("序列化配置失败: {}", e)))?;

        fs::write(path, toml_content)?;
        Ok(())
    }

    /// 校验配置内容
    pub fn validate(&self) -> AppResult<()> {
        let url = url::Url::parse(&self.catalog_url)
            .map_err(|e| AppError::invalid("catalog_url", format!("{}: {}", self.catalog_url, e)))?;
        if !matches!(url.scheme(), "http" | "https" | "file") {
            return Err(AppError::invalid(
                "catalog_url",
                format!("不支持的协议: {}", url.scheme()),
            ));
        }
        Ok(())
    }

    /// 下载安装的根目录
    pub fn install_root(&self) -> AppResult<PathBuf> {
        match &self.install_dir {
            Some(dir) => Ok(PathBuf::from(resolve_env_var(dir))),
            None => Ok(home_dir()?.join(fs_consts::DEFAULT_INSTALL_DIR_NAME)),
        }
    }

    /// 额外扫描根目录（已展开环境变量引用）
    pub fn extra_scan_roots(&self) -> Vec<PathBuf> {
        self.scan_roots
            .iter()
            .map(|root| PathBuf::from(resolve_env_var(root)))
            .collect()
    }
}

/// 解析环境变量引用（如 ${VAR_NAME}）
pub fn resolve_env_var(value: &str) -> String {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        env::var(var_name).unwrap_or_else(|_| value.to_string())
    } else {
        value.to_string()
    }
}

fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("无法获取用户主目录"))
}

/// 获取配置目录
pub fn get_config_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(fs_consts::APP_DIR_NAME))
}

/// 获取配置文件路径，`JDKAUTO_CONFIG` 优先
pub fn get_config_path() -> AppResult<PathBuf> {
    if let Ok(path) = env::var(env_keys::CONFIG_PATH) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    Ok(get_config_dir()?.join(fs_consts::CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn java_env(name: &str) -> JavaEnvironment {
        JavaEnvironment {
            name: name.to_string(),
            java_home: "/usr/lib/jvm/java-17".to_string(),
            version: Some("17.0.2".to_string()),
            description: "Test JDK".to_string(),
        }
    }

    #[test]
    fn test_resolve_env_var() {
        env::set_var("JDKAUTO_TEST_VAR", "test_value");

        let resolved = resolve_env_var("${JDKAUTO_TEST_VAR}");
        assert_eq!(resolved, "test_value");

        let not_resolved = resolve_env_var("normal_value");
        assert_eq!(not_resolved, "normal_value");

        env::remove_var("JDKAUTO_TEST_VAR");
    }

    #[test]
    fn test_config_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.auto_setup = false;
        config.scan_roots.push("/opt/jdks".to_string());
        config.java_environments.push(java_env("corretto-17"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(!loaded.auto_setup);
        assert_eq!(loaded.scan_roots, vec!["/opt/jdks".to_string()]);
        assert_eq!(loaded.java_environments, vec![java_env("corretto-17")]);
    }

    #[test]
    fn test_config_defaults_for_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[[java_environments]]\nname = \"a\"\njava_home = \"/jdk\"\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.auto_setup);
        assert_eq!(loaded.catalog_url, network::DEFAULT_CATALOG_URL);
        assert_eq!(loaded.java_environments[0].version, None);
    }

    #[test]
    fn test_config_rejects_bad_catalog_url() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "catalog_url = \"not a url\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());

        fs::write(&path, "catalog_url = \"ftp://example.com/jdks.json\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_install_root_override() {
        let mut config = Config::new();
        config.install_dir = Some("/data/jdks".to_string());
        assert_eq!(config.install_root().unwrap(), PathBuf::from("/data/jdks"));
    }
}
