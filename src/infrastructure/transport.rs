//! 传输层 - 基础设施层
//!
//! 只暴露 `call(method, path, body)` 能力：
//! - 拼接地址、携带令牌
//! - 200/201 视为成功，返回 JSON
//! - 401 清除令牌并返回"请重新登录"
//! - 不认识关卡 / 题目

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, DEFAULT_FAILURE_MESSAGE};
use crate::infrastructure::credentials::{CredentialStore, ACCESS_TOKEN, REFRESH_TOKEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// 请求传输能力
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError>;
}

/// 基于 reqwest 的 HTTP 传输
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpTransport {
    pub fn new(config: &Config, credentials: Arc<dyn CredentialStore>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::request_failed(config.base_url.clone(), e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        }
        .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.credentials.get(ACCESS_TOKEN) {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            debug!("请求体: {}", body);
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::request_failed(path, e))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::request_failed(path, e))?;

        interpret_response(path, status, &text, self.credentials.as_ref())
    }
}

/// 按状态码解释响应
pub(crate) fn interpret_response(
    endpoint: &str,
    status: u16,
    body: &str,
    credentials: &dyn CredentialStore,
) -> Result<Value, ApiError> {
    match status {
        200 | 201 => {
            if body.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(body).map_err(|source| ApiError::JsonParseFailed {
                endpoint: endpoint.to_string(),
                source,
            })
        }
        401 => {
            warn!("⚠️ 登录已失效: {}", endpoint);
            credentials.remove(ACCESS_TOKEN);
            credentials.remove(REFRESH_TOKEN);
            Err(ApiError::Unauthorized {
                endpoint: endpoint.to_string(),
            })
        }
        _ => {
            let message = serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
            Err(ApiError::BadResponse {
                endpoint: endpoint.to_string(),
                status,
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::credentials::MemoryCredentialStore;

    fn store() -> MemoryCredentialStore {
        MemoryCredentialStore::with_tokens(Some("token".into()), Some("refresh".into()))
    }

    #[test]
    fn created_status_is_success() {
        let value = interpret_response("/x", 201, r#"{"success":true}"#, &store()).unwrap();
        assert_eq!(value["success"], true);
    }

    #[test]
    fn unauthorized_drops_tokens() {
        let credentials = store();
        let err = interpret_response("/x", 401, "", &credentials).unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert!(credentials.get(ACCESS_TOKEN).is_none());
        assert!(credentials.get(REFRESH_TOKEN).is_none());
    }

    #[test]
    fn error_status_uses_server_message() {
        let body = r#"{"message":"关卡不存在"}"#;
        let err = interpret_response("/x", 404, body, &store()).unwrap_err();
        assert_eq!(err.user_message(), "关卡不存在");

        let err = interpret_response("/x", 500, "<html>", &store()).unwrap_err();
        assert_eq!(err.user_message(), DEFAULT_FAILURE_MESSAGE);
    }

    #[test]
    fn broken_success_body_is_a_parse_error() {
        let err = interpret_response("/x", 200, "{not json", &store()).unwrap_err();
        assert!(matches!(err, ApiError::JsonParseFailed { .. }));
    }
}
