use serde::Deserialize;

use crate::error::{FetchError, SubmissionError};

/// 后端统一响应信封 `{ success, message, data }`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 取出 data；`success` 为假或 data 为空都视为拉取失败
    pub fn into_data(self, endpoint: impl Into<String>) -> Result<T, FetchError> {
        if !self.success {
            return Err(FetchError::Unsuccessful {
                endpoint: endpoint.into(),
                message: self.message,
            });
        }
        self.data.ok_or_else(|| FetchError::MissingData {
            endpoint: endpoint.into(),
        })
    }

    /// 尽力而为调用的结果：只关心 `success`
    pub fn accepted(self, endpoint: impl Into<String>) -> Result<Option<T>, SubmissionError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(SubmissionError::Rejected {
                endpoint: endpoint.into(),
                message: self.message,
            })
        }
    }
}
