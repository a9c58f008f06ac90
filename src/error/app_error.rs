use std::io;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),

    #[error("配置错误: {message}")]
    Config { message: String },

    #[error("网络错误: {message}")]
    Network { message: String },

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 协作式取消，必须原样向上传递
    #[error("操作已取消")]
    Cancelled,

    #[error("验证错误: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("内部错误: {message}")]
    Internal { message: String },
}

/// 用于提供错误上下文和用户友好建议
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub operation: String,
    pub suggestions: Vec<String>,
}

impl AppError {
    /// 为错误添加上下文信息
    pub fn with_context(self, operation: &str) -> ContextualError {
        ContextualError {
            error: self,
            context: ErrorContext {
                operation: operation.to_string(),
                suggestions: Vec::new(),
            },
        }
    }

    /// 是否为取消信号
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }

    /// 按错误类型给出的处理建议
    pub fn suggestions(&self) -> &'static [&'static str] {
        match self {
            AppError::Network { .. } => &[
                "检查网络连接和 catalog_url 配置",
                "使用 --offline 只在本地查找",
            ],
            AppError::Config { .. } | AppError::Validation { .. } => &[
                "检查 ~/.jdkauto/config.toml，或用 JDKAUTO_CONFIG 指定配置文件",
            ],
            AppError::Serialization(_) => &["使用 ls-remote --refresh 重新下载 JDK 列表"],
            _ => &[],
        }
    }
}

/// 带有上下文的错误
#[derive(Error, Debug)]
pub struct ContextualError {
    #[source]
    pub error: AppError,
    pub context: ErrorContext,
}

impl std::fmt::Display for ContextualError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "操作失败: {}\n错误: {}", self.context.operation, self.error)
    }
}

impl ContextualError {
    /// 追加建议
    pub fn with_suggestions(mut self, suggestions: &[&str]) -> Self {
        self.context
            .suggestions
            .extend(suggestions.iter().map(|s| s.to_string()));
        self
    }

    /// 获取用户友好的错误消息
    pub fn user_message(&self) -> String {
        let mut msg = format!("❌ {}\n", self.context.operation);
        msg.push_str(&format!("原因: {}\n", self.error));

        if !self.context.suggestions.is_empty() {
            msg.push_str("💡 建议:\n");
            for suggestion in &self.context.suggestions {
                msg.push_str(&format!("  • {}\n", suggestion));
            }
        }

        msg
    }
}

/// 应用程序 Result 类型
pub type AppResult<T> = Result<T, AppError>;

/// 便捷的错误创建函数
impl AppError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn config_load_failed(path: &str, reason: &str) -> Self {
        Self::Config {
            message: format!("无法加载配置文件 {}: {}", path, reason),
        }
    }

    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_is_distinct() {
        assert!(AppError::Cancelled.is_cancelled());
        assert!(!AppError::network("timeout").is_cancelled());
    }

    #[test]
    fn test_suggestions_by_kind() {
        assert!(!AppError::network("timeout").suggestions().is_empty());
        assert!(AppError::config("x").suggestions()[0].contains("config.toml"));
        assert!(AppError::Cancelled.suggestions().is_empty());

        let err = AppError::network("timeout");
        let suggestions = err.suggestions();
        let msg = err.with_context("下载 JDK 列表").with_suggestions(suggestions).user_message();
        assert!(msg.contains("--offline"));
    }

    #[test]
    fn test_user_message_lists_suggestions() {
        let err = AppError::config("缺少 catalog_url")
            .with_context("加载配置")
            .with_suggestions(&["检查 ~/.jdkauto/config.toml"]);
        let msg = err.user_message();
        assert!(msg.contains("加载配置"));
        assert!(msg.contains("缺少 catalog_url"));
        assert!(msg.contains("检查 ~/.jdkauto/config.toml"));
    }
}
