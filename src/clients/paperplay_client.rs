//! PaperPlay 后端 API 客户端
//!
//! 封装所有与关卡、题目相关的接口调用，只负责拼路径和反序列化，
//! 是否成功由调用方判断
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ApiError;
use crate::infrastructure::{Method, Transport};
use crate::models::{
    AnswerRecord, ApiResponse, Level, LevelCompletion, LevelProgress, Paper, Question,
    QuestionSummary, SubmitOutcome,
};

/// PaperPlay API 客户端
#[derive(Clone)]
pub struct PaperPlayClient {
    transport: Arc<dyn Transport>,
}

impl PaperPlayClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// 获取单篇论文
    pub async fn get_paper(&self, paper_id: &str) -> Result<ApiResponse<Paper>, ApiError> {
        self.request(Method::Get, format!("/api/v1/papers/{}", paper_id), None)
            .await
    }

    /// 获取论文对应的关卡
    pub async fn get_paper_level(&self, paper_id: &str) -> Result<ApiResponse<Level>, ApiError> {
        self.request(Method::Get, format!("/api/v1/papers/{}/level", paper_id), None)
            .await
    }

    /// 获取单个关卡信息
    pub async fn get_level(&self, level_id: &str) -> Result<ApiResponse<Level>, ApiError> {
        self.request(Method::Get, format!("/api/v1/levels/{}", level_id), None)
            .await
    }

    /// 开始关卡
    pub async fn start_level(
        &self,
        level_id: &str,
    ) -> Result<ApiResponse<LevelProgress>, ApiError> {
        self.request(Method::Post, format!("/api/v1/levels/{}/start", level_id), None)
            .await
    }

    /// 获取关卡中的题目列表（按服务器顺序）
    pub async fn get_level_questions(
        &self,
        level_id: &str,
    ) -> Result<ApiResponse<Vec<QuestionSummary>>, ApiError> {
        self.request(Method::Get, format!("/api/v1/levels/{}/questions", level_id), None)
            .await
    }

    /// 获取单个题目
    pub async fn get_question(&self, question_id: &str) -> Result<ApiResponse<Question>, ApiError> {
        self.request(Method::Get, format!("/api/v1/questions/{}", question_id), None)
            .await
    }

    /// 提交答案
    ///
    /// # 参数
    /// - `level_id`: 关卡ID
    /// - `question_id`: 题目ID
    /// - `answer`: 作答记录
    /// - `duration_ms`: 答题时长（毫秒）
    pub async fn submit_answer(
        &self,
        level_id: &str,
        question_id: &str,
        answer: &AnswerRecord,
        duration_ms: u64,
    ) -> Result<ApiResponse<SubmitOutcome>, ApiError> {
        let body = json!({
            "question_id": question_id,
            "answer_json": answer,
            "duration_ms": duration_ms
        });
        self.request(Method::Post, format!("/api/v1/levels/{}/submit", level_id), Some(body))
            .await
    }

    /// 完成关卡
    pub async fn complete_level(
        &self,
        level_id: &str,
    ) -> Result<ApiResponse<LevelCompletion>, ApiError> {
        self.request(Method::Post, format!("/api/v1/levels/{}/complete", level_id), None)
            .await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: String,
        body: Option<Value>,
    ) -> Result<ApiResponse<T>, ApiError> {
        let value = self.transport.call(method, &path, body).await?;
        debug!("{} {} 响应: {}", method, path, value);

        serde_json::from_value(value).map_err(|source| ApiError::JsonParseFailed {
            endpoint: path,
            source,
        })
    }
}
