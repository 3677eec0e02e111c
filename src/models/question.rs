//! 题目模型
//!
//! 后端把 `content_json` / `answer_json` 当作字符串下发，这里在反序列化时一次性解码成
//! 有类型的结构；解码失败时落到 `Malformed` 并打 warn 日志，不会让整个会话失败。

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// 题目（拉取后只读）
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "QuestionWire")]
pub struct Question {
    pub id: String,
    pub level_id: String,
    pub stem: String,
    pub content: QuestionContent,
    pub answer: AnswerKey,
    pub score: i64,
    pub difficulty: u8,
}

impl Question {
    pub fn difficulty_level(&self) -> Option<Difficulty> {
        Difficulty::from_level(self.difficulty)
    }
}

/// 题目内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionContent {
    Parsed {
        concept_name: String,
        options: Vec<String>,
    },
    Malformed {
        raw: String,
        reason: String,
    },
}

impl QuestionContent {
    /// 解析失败时返回空列表，界面降级显示
    pub fn options(&self) -> &[String] {
        match self {
            QuestionContent::Parsed { options, .. } => options,
            QuestionContent::Malformed { .. } => &[],
        }
    }

    pub fn concept_name(&self) -> &str {
        match self {
            QuestionContent::Parsed { concept_name, .. } => concept_name,
            QuestionContent::Malformed { .. } => "",
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, QuestionContent::Malformed { .. })
    }
}

/// 标准答案
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey {
    Parsed { correct_option: String },
    Malformed { raw: String, reason: String },
}

impl AnswerKey {
    pub fn correct_letter(&self) -> Option<&str> {
        match self {
            AnswerKey::Parsed { correct_option } => Some(correct_option),
            AnswerKey::Malformed { .. } => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, AnswerKey::Malformed { .. })
    }
}

/// 题目难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Difficulty {
    Easy = 1,
    Medium = 2,
    Hard = 3,
    Expert = 4,
    Master = 5,
}

impl Difficulty {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            4 => Some(Difficulty::Expert),
            5 => Some(Difficulty::Master),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "★ 入门",
            Difficulty::Medium => "★★ 基础",
            Difficulty::Hard => "★★★ 进阶",
            Difficulty::Expert => "★★★★ 困难",
            Difficulty::Master => "★★★★★ 专家",
        }
    }
}

/// 关卡题目列表中的一项，只用到 id
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuestionSummary {
    pub id: String,
    #[serde(default)]
    pub level_id: String,
}

/// 一组题目：引入题 + 概念题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPair {
    pub lead_in_id: String,
    pub concept_id: String,
}

// ========== 线上格式 ==========

#[derive(Deserialize)]
struct QuestionWire {
    id: String,
    #[serde(default)]
    level_id: String,
    #[serde(default)]
    stem: String,
    #[serde(default)]
    content_json: Value,
    #[serde(default)]
    answer_json: Value,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    difficulty: u8,
}

#[derive(Deserialize)]
struct ContentPayload {
    #[serde(default)]
    concept_name: String,
    options: Vec<String>,
}

#[derive(Deserialize)]
struct AnswerPayload {
    // 出题脚本写的是 correct_answer
    #[serde(alias = "correct_answer")]
    correct_option: String,
}

impl From<QuestionWire> for Question {
    fn from(wire: QuestionWire) -> Self {
        let content = match decode_payload::<ContentPayload>(&wire.content_json) {
            Ok(payload) => QuestionContent::Parsed {
                concept_name: payload.concept_name,
                options: payload.options,
            },
            Err(reason) => {
                warn!("⚠️ 题目 {} 的 content_json 无法解析: {}", wire.id, reason);
                QuestionContent::Malformed {
                    raw: raw_text(&wire.content_json),
                    reason,
                }
            }
        };

        let answer = match decode_payload::<AnswerPayload>(&wire.answer_json) {
            Ok(payload) => AnswerKey::Parsed {
                correct_option: payload.correct_option,
            },
            Err(reason) => {
                warn!("⚠️ 题目 {} 的 answer_json 无法解析: {}", wire.id, reason);
                AnswerKey::Malformed {
                    raw: raw_text(&wire.answer_json),
                    reason,
                }
            }
        };

        Self {
            id: wire.id,
            level_id: wire.level_id,
            stem: wire.stem,
            content,
            answer,
            score: wire.score,
            difficulty: wire.difficulty,
        }
    }
}

/// 字段可能是 JSON 字符串，也可能已经是对象
fn decode_payload<T: DeserializeOwned>(raw: &Value) -> Result<T, String> {
    match raw {
        Value::String(text) => serde_json::from_str(text).map_err(|e| e.to_string()),
        Value::Null => Err("字段缺失".to_string()),
        other => serde_json::from_value(other.clone()).map_err(|e| e.to_string()),
    }
}

fn raw_text(raw: &Value) -> String {
    match raw {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
