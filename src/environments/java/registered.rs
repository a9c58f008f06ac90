use super::candidate::RegisteredSdk;
use super::scanner::SdkProbe;
use super::validator::JavaValidator;
use crate::core::cancel::CancelToken;
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::{resolve_env_var, Config, JavaEnvironment};
use std::path::Path;
use std::sync::RwLock;

/// 已注册 SDK 表
pub trait RegisteredSdkTable: Send + Sync {
    /// 某一时刻的快照；字段不全的条目已被丢弃
    ///
    /// 校验会访问文件系统，可能执行 `java -version`，调用方应在阻塞线程中调用。
    /// 只有取消会返回错误。
    fn snapshot(&self, cancel: &CancelToken) -> Result<Vec<RegisteredSdk>, AppError>;
}

/// 以配置文件 `java_environments` 为数据源的注册表
#[derive(Debug, Default)]
pub struct ConfigSdkTable {
    environments: RwLock<Vec<JavaEnvironment>>,
}

impl ConfigSdkTable {
    pub fn new(environments: Vec<JavaEnvironment>) -> Self {
        Self {
            environments: RwLock::new(environments),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.java_environments.clone())
    }

    /// 注册新的 JDK（同名时替换）
    pub fn register(&self, env: JavaEnvironment) {
        let mut guard = self
            .environments
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.retain(|e| e.name != env.name);
        guard.push(env);
    }

    /// 把当前表写回配置
    pub fn store(&self, config: &mut Config) -> AppResult<()> {
        config.java_environments = self.rows();
        config.save()
    }

    fn rows(&self) -> Vec<JavaEnvironment> {
        self.environments
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// 单行校验；home 无效时保留条目但标记为不可用
    fn validate_row(env: &JavaEnvironment) -> Option<RegisteredSdk> {
        let home = resolve_env_var(&env.java_home);
        let home = Path::new(&home);
        let probed = SdkProbe::probe(Some(home), env.version.as_deref())?;

        Some(RegisteredSdk {
            name: env.name.clone(),
            valid_home: JavaValidator::is_valid_sdk_home(&probed.home),
            home_path: probed.home,
            version_string: probed.version_string,
            version: probed.version,
            suggested_name: probed.suggested_name,
            vendor: probed.vendor,
        })
    }
}

impl RegisteredSdkTable for ConfigSdkTable {
    fn snapshot(&self, cancel: &CancelToken) -> Result<Vec<RegisteredSdk>, AppError> {
        // 读锁只用于复制原始行，校验涉及文件系统，在锁外进行
        let rows = self.rows();

        let mut result = Vec::with_capacity(rows.len());
        for env in &rows {
            cancel.check()?;
            match Self::validate_row(env) {
                Some(sdk) => result.push(sdk),
                None => tracing::debug!("忽略无法识别的已注册 JDK: {} ({})", env.name, env.java_home),
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environments::java::validator::testing::fake_jdk;
    use tempfile::TempDir;

    fn row(name: &str, home: &Path, version: Option<&str>) -> JavaEnvironment {
        JavaEnvironment {
            name: name.to_string(),
            java_home: home.to_string_lossy().to_string(),
            version: version.map(|v| v.to_string()),
            description: String::new(),
        }
    }

    #[test]
    fn test_snapshot_validates_rows() {
        let dir = TempDir::new().unwrap();
        let jdk17 = fake_jdk(dir.path(), "jdk-17", Some("17.0.2"), None);
        let jdk_unknown = fake_jdk(dir.path(), "jdk-unknown", None, None);

        let table = ConfigSdkTable::new(vec![
            row("seventeen", &jdk17, None),
            row("declared", &dir.path().join("gone"), Some("11.0.2")),
            row("unknown", &jdk_unknown, None),
            row("empty", Path::new(""), Some("17")),
        ]);

        let snapshot = table.snapshot(&CancelToken::new()).unwrap();
        assert_eq!(snapshot.len(), 2);

        let seventeen = snapshot.iter().find(|s| s.name == "seventeen").unwrap();
        assert!(seventeen.valid_home);
        assert_eq!(seventeen.version.feature, 17);

        let declared = snapshot.iter().find(|s| s.name == "declared").unwrap();
        assert!(!declared.valid_home);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let dir = TempDir::new().unwrap();
        let jdk11 = fake_jdk(dir.path(), "jdk-11", Some("11.0.2"), None);
        let jdk17 = fake_jdk(dir.path(), "jdk-17", Some("17.0.2"), None);

        let table = ConfigSdkTable::default();
        table.register(row("main", &jdk11, None));
        table.register(row("main", &jdk17, None));

        let snapshot = table.snapshot(&CancelToken::new()).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].version.feature, 17);
    }

    #[test]
    fn test_snapshot_stops_when_cancelled() {
        let dir = TempDir::new().unwrap();
        let jdk17 = fake_jdk(dir.path(), "jdk-17", Some("17.0.2"), None);
        let table = ConfigSdkTable::new(vec![row("seventeen", &jdk17, None)]);

        let token = CancelToken::new();
        token.cancel();
        assert!(table.snapshot(&token).unwrap_err().is_cancelled());
    }
}
