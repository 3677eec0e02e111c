#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use paperplay_quiz::error::ApiError;
use paperplay_quiz::{Method, PaperPlayClient, Transport};
use serde_json::{json, Value};

/// 预设的响应
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Unauthorized,
    Status(u16, String),
    Network,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// 按 (方法, 路径) 返回预设响应的传输层；没有预设的路径按网络错误处理
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(Method, String), Reply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: Method, path: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    pub fn bodies(&self, method: Method, path: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .filter_map(|c| c.body)
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body,
        });

        let reply = self
            .routes
            .lock()
            .unwrap()
            .get(&(method, path.to_string()))
            .cloned();

        match reply {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Unauthorized) => Err(ApiError::Unauthorized {
                endpoint: path.to_string(),
            }),
            Some(Reply::Status(status, message)) => Err(ApiError::BadResponse {
                endpoint: path.to_string(),
                status,
                message,
            }),
            Some(Reply::Network) | None => Err(ApiError::request_failed(
                path,
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "scripted"),
            )),
        }
    }
}

pub fn client(transport: &Arc<ScriptedTransport>) -> PaperPlayClient {
    PaperPlayClient::new(transport.clone())
}

pub fn ok(data: Value) -> Reply {
    Reply::Json(json!({ "success": true, "message": "ok", "data": data }))
}

pub fn question_json(id: &str, level_id: &str, correct: &str) -> Value {
    json!({
        "id": id,
        "level_id": level_id,
        "stem": format!("题目 {}", id),
        "content_json": json!({
            "concept_name": format!("概念 {}", id),
            "options": ["选项一", "选项二", "选项三", "选项四"]
        }).to_string(),
        "answer_json": json!({ "correct_option": correct }).to_string(),
        "score": 10,
        "difficulty": 2
    })
}

/// 预设一个关卡：论文 → 关卡、开始、提交、完成都成功
pub fn script_level(transport: &ScriptedTransport, paper_id: &str, level_id: &str) {
    transport.on(
        Method::Get,
        &format!("/api/v1/papers/{}/level", paper_id),
        ok(json!({
            "id": level_id,
            "paper_id": paper_id,
            "name": "Attention Is All You Need",
            "pass_condition": "all",
            "meta_json": "{}"
        })),
    );
    transport.on(
        Method::Post,
        &format!("/api/v1/levels/{}/start", level_id),
        ok(json!({ "level_id": level_id, "status": 1 })),
    );
    transport.on(
        Method::Post,
        &format!("/api/v1/levels/{}/submit", level_id),
        ok(json!({ "question_id": "q", "is_correct": true, "score": 10, "total_score": 10 })),
    );
    transport.on(
        Method::Post,
        &format!("/api/v1/levels/{}/complete", level_id),
        ok(json!({ "level_id": level_id, "score": 40, "stars": 3 })),
    );
}

/// 预设关卡题目：第 i 题的 id 为 `q{i+1}`，正确答案为 `answers[i]`
pub fn script_questions(transport: &ScriptedTransport, level_id: &str, answers: &[&str]) {
    let ids: Vec<String> = (1..=answers.len()).map(|i| format!("q{}", i)).collect();
    transport.on(
        Method::Get,
        &format!("/api/v1/levels/{}/questions", level_id),
        ok(Value::Array(
            ids.iter()
                .map(|id| json!({ "id": id, "level_id": level_id }))
                .collect(),
        )),
    );
    for (id, correct) in ids.iter().zip(answers) {
        transport.on(
            Method::Get,
            &format!("/api/v1/questions/{}", id),
            ok(question_json(id, level_id, correct)),
        );
    }
}
