use serde::{Deserialize, Serialize};

use crate::models::question::Question;
use crate::services::answer_judge::Verdict;

/// 提交给后端的作答记录（`answer_json` 字段）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub selected_option: String,
    /// 答案缺失时序列化为 null
    pub correct_option: Option<String>,
    pub is_correct: bool,
}

/// 一次作答：选择时创建，只发送一次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerAttempt {
    pub question_id: String,
    pub selected_option: usize,
    pub selected_letter: char,
    pub correct_letter: Option<String>,
    pub is_correct: bool,
    pub duration_ms: u64,
}

impl AnswerAttempt {
    pub fn new(
        question: &Question,
        selected_option: usize,
        verdict: Verdict,
        duration_ms: u64,
    ) -> Self {
        Self {
            question_id: question.id.clone(),
            selected_option,
            selected_letter: verdict.selected_letter,
            correct_letter: question.answer.correct_letter().map(str::to_string),
            is_correct: verdict.is_correct,
            duration_ms,
        }
    }

    pub fn record(&self) -> AnswerRecord {
        AnswerRecord {
            kind: "multiple_choice".to_string(),
            selected_option: self.selected_letter.to_string(),
            correct_option: self.correct_letter.clone(),
            is_correct: self.is_correct,
        }
    }
}

/// `POST /levels/{id}/submit` 的返回
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmitOutcome {
    #[serde(default)]
    pub question_id: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub total_score: i64,
}
