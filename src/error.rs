//! 错误类型
//!
//! 分层定义：
//! - `ApiError`：传输层错误（网络、状态码、JSON）
//! - `FetchError`：拉取关卡/题目失败，会中断答题进度
//! - `SubmissionError`：尽力而为的后台调用失败，只记日志
//! - `AppError`：应用顶层错误

use thiserror::Error;

/// 后端返回 401 时传输层抛出的提示文案，作为"需要重新登录"的哨兵
pub const REAUTH_MESSAGE: &str = "请重新登录";

/// 非 2xx 响应没有携带 message 时的默认文案
pub const DEFAULT_FAILURE_MESSAGE: &str = "请求失败";

/// 网络层失败的文案
pub const NETWORK_FAILURE_MESSAGE: &str = "网络错误";

/// 传输层错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401：登录态失效
    #[error("{} ({endpoint})", REAUTH_MESSAGE)]
    Unauthorized { endpoint: String },

    /// 请求没有发出去或者没有收到响应
    #[error("网络错误 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 服务器返回了非成功状态码
    #[error("{message} ({endpoint}, HTTP {status})")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// 响应体无法解析
    #[error("JSON解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// 创建网络请求失败错误
    pub fn request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// 面向用户展示的提示文案
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized { .. } => REAUTH_MESSAGE.to_string(),
            ApiError::RequestFailed { .. } => NETWORK_FAILURE_MESSAGE.to_string(),
            ApiError::BadResponse { message, .. } => message.clone(),
            ApiError::JsonParseFailed { .. } => "数据解析失败".to_string(),
        }
    }
}

/// 拉取关卡或题目失败
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// 接口返回 `success: false`
    #[error("{endpoint} 请求未成功: {}", .message.as_deref().unwrap_or("未知原因"))]
    Unsuccessful {
        endpoint: String,
        message: Option<String>,
    },

    /// 接口报告成功但没有 data
    #[error("{endpoint} 返回数据为空")]
    MissingData { endpoint: String },

    /// 关卡里凑不出一组题目
    #[error("关卡 {level_id} 没有可作答的题目")]
    NoQuestions { level_id: String },
}

impl FetchError {
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Api(e) => e.user_message(),
            FetchError::Unsuccessful { message, .. } => message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            FetchError::MissingData { .. } => "数据为空".to_string(),
            FetchError::NoQuestions { .. } => "该关卡暂无题目".to_string(),
        }
    }
}

/// 尽力而为调用（开始关卡 / 提交答案 / 完成关卡）的失败
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{endpoint} 被服务器拒绝: {}", .message.as_deref().unwrap_or("未知原因"))]
    Rejected {
        endpoint: String,
        message: Option<String>,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("拉取数据失败: {0}")]
    Fetch(#[from] FetchError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        AppError::Fetch(FetchError::Api(err))
    }
}

impl AppError {
    /// 面向用户展示的提示文案
    pub fn user_message(&self) -> String {
        match self {
            AppError::Fetch(e) => e.user_message(),
            AppError::Config(e) => e.to_string(),
            AppError::Io(e) => e.to_string(),
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
