//! 关卡生命周期 - 业务能力层
//!
//! 开始关卡 / 提交答案 / 完成关卡都是尽力而为的调用：
//! 以后台任务执行，失败只写日志，绝不阻塞答题流程。
//! 唯一的例外是 401：记入 `AuthFailure`，由会话在下一步时交给调用方

use std::fmt::Debug;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::clients::PaperPlayClient;
use crate::error::{ApiError, AppError, SubmissionError};
use crate::models::AnswerAttempt;

/// 以后台任务执行一次尽力而为的调用
///
/// 任务结果只会进入日志；返回的句柄可以丢弃（任务继续运行），
/// 也可以等待它结束。
pub fn best_effort<F, T>(label: impl Into<String>, task: F) -> JoinHandle<()>
where
    F: Future<Output = Result<T, SubmissionError>> + Send + 'static,
    T: Debug + Send + 'static,
{
    let label = label.into();
    tokio::spawn(async move {
        match task.await {
            Ok(outcome) => info!("✓ {}成功: {:?}", label, outcome),
            Err(e) => warn!("⚠️ {}失败（不影响答题）: {}", label, e),
        }
    })
}

/// 后台调用收到的登录失效信号，会话与后台任务共享
#[derive(Debug, Clone, Default)]
pub struct AuthFailure {
    endpoint: Arc<Mutex<Option<String>>>,
}

impl AuthFailure {
    /// 记录第一次 401；之后的覆盖不影响结果
    pub fn record(&self, endpoint: &str) {
        if let Ok(mut slot) = self.endpoint.lock() {
            slot.get_or_insert_with(|| endpoint.to_string());
        }
    }

    pub fn is_set(&self) -> bool {
        self.endpoint.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }

    /// 取出信号并复位，转换成可以交给 `ErrorClassifier` 的错误
    pub fn take(&self) -> Option<AppError> {
        let endpoint = self.endpoint.lock().ok()?.take()?;
        Some(AppError::from(ApiError::Unauthorized { endpoint }))
    }
}

/// 关卡生命周期调用
#[derive(Clone)]
pub struct LevelLifecycle {
    client: PaperPlayClient,
    auth_failure: AuthFailure,
}

impl LevelLifecycle {
    pub fn new(client: PaperPlayClient) -> Self {
        Self {
            client,
            auth_failure: AuthFailure::default(),
        }
    }

    pub fn auth_failure(&self) -> &AuthFailure {
        &self.auth_failure
    }

    /// 开始关卡
    pub fn start(&self, level_id: &str) -> JoinHandle<()> {
        let client = self.client.clone();
        let level_id = level_id.to_string();
        self.spawn("开始关卡", async move {
            let endpoint = format!("levels/{}/start", level_id);
            client.start_level(&level_id).await?.accepted(endpoint)
        })
    }

    /// 提交一次作答
    pub fn submit(&self, level_id: &str, attempt: &AnswerAttempt) -> JoinHandle<()> {
        let client = self.client.clone();
        let level_id = level_id.to_string();
        let question_id = attempt.question_id.clone();
        let record = attempt.record();
        let duration_ms = attempt.duration_ms;
        self.spawn("提交答案", async move {
            let endpoint = format!("levels/{}/submit", level_id);
            client
                .submit_answer(&level_id, &question_id, &record, duration_ms)
                .await?
                .accepted(endpoint)
        })
    }

    /// 完成关卡
    pub fn complete(&self, level_id: &str) -> JoinHandle<()> {
        let client = self.client.clone();
        let level_id = level_id.to_string();
        self.spawn("完成关卡", async move {
            let endpoint = format!("levels/{}/complete", level_id);
            client.complete_level(&level_id).await?.accepted(endpoint)
        })
    }

    /// 尽力而为执行，401 额外记入登录失效信号
    fn spawn<F, T>(&self, label: &str, task: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<T, SubmissionError>> + Send + 'static,
        T: Debug + Send + 'static,
    {
        let auth_failure = self.auth_failure.clone();
        best_effort(label, async move {
            let result = task.await;
            if let Err(SubmissionError::Api(ApiError::Unauthorized { endpoint })) = &result {
                warn!("⚠️ 后台调用登录失效: {}", endpoint);
                auth_failure.record(endpoint);
            }
            result
        })
    }
}
