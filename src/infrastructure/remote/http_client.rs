use crate::core::constants::network;
use crate::error::AppError;
use reqwest::Client;
use std::time::Duration;

/// HTTP 客户端包装器
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// 创建新的 HTTP 客户端
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(network::CATALOG_TIMEOUT_SECS)
    }

    /// 创建带自定义超时的 HTTP 客户端
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(network::USER_AGENT)
            .build()
            .map_err(|e| AppError::network(format!("创建 HTTP 客户端失败: {e}")))?;

        Ok(Self { client })
    }

    /// GET 请求并返回文本，非 2xx 视为错误
    pub async fn get_text(&self, url: &str) -> Result<String, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::network(format!("请求 {url} 失败: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::network(format!("请求 {url} 返回 HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::network(format!("读取 {url} 响应失败: {e}")))
    }
}
