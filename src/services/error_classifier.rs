//! 错误分类 - 业务能力层
//!
//! 判断一次失败是"登录失效"（清凭证、回首页）还是普通失败（提示后可继续）

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, warn};

use crate::error::{ApiError, AppError, FetchError, REAUTH_MESSAGE};
use crate::infrastructure::CredentialStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 登录失效，需要重新登录
    SessionExpired,
    /// 普通失败，只做提示
    Generic,
}

/// 分类结果：调用方据此提示用户以及决定是否跳转
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: ErrorKind,
    /// 给用户看的提示
    pub message: String,
    /// 提示之后多久跳回入口页；普通失败为 `None`
    pub redirect_after: Option<Duration>,
}

impl Classification {
    pub fn requires_reauth(&self) -> bool {
        self.kind == ErrorKind::SessionExpired
    }
}

/// 错误分类器
pub struct ErrorClassifier {
    credentials: Arc<dyn CredentialStore>,
    redirect_delay: Duration,
}

impl ErrorClassifier {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            credentials,
            redirect_delay: Duration::from_millis(1000),
        }
    }

    pub fn with_redirect_delay(mut self, redirect_delay: Duration) -> Self {
        self.redirect_delay = redirect_delay;
        self
    }

    /// 只分类，不产生副作用
    pub fn classify(&self, err: &AppError) -> Classification {
        if is_session_expired(err) {
            Classification {
                kind: ErrorKind::SessionExpired,
                message: REAUTH_MESSAGE.to_string(),
                redirect_after: Some(self.redirect_delay),
            }
        } else {
            let message = err.user_message();
            Classification {
                kind: ErrorKind::Generic,
                message: if message.is_empty() {
                    "发生错误".to_string()
                } else {
                    message
                },
                redirect_after: None,
            }
        }
    }

    /// 分类并处理：登录失效时清空本地全部凭证
    pub fn handle(&self, err: &AppError) -> Classification {
        error!("❌ API错误: {}", err);

        let classification = self.classify(err);
        if classification.requires_reauth() {
            warn!("⚠️ 登录已失效，清除本地凭证");
            self.credentials.clear();
        }
        classification
    }
}

/// 无论哪个接口抛出，只要是 401 或者带着哨兵文案就算登录失效
pub fn is_session_expired(err: &AppError) -> bool {
    match err {
        AppError::Fetch(FetchError::Api(ApiError::Unauthorized { .. })) => true,
        other => other.user_message() == REAUTH_MESSAGE,
    }
}
