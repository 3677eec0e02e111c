//! 单道题在界面上的作答状态

use crate::models::Question;
use crate::services::answer_judge::Verdict;

/// 一道题的作答状态：题目、所选选项、是否已揭晓
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionSlot {
    pub question: Question,
    pub selected: Option<usize>,
    pub revealed: bool,
    pub verdict: Option<Verdict>,
}

impl QuestionSlot {
    pub fn new(question: Question) -> Self {
        Self {
            question,
            selected: None,
            revealed: false,
            verdict: None,
        }
    }

    pub fn is_correct(&self) -> bool {
        self.verdict.map(|v| v.is_correct).unwrap_or(false)
    }

    /// 重新作答：清空选择和揭晓状态，题目不变
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.revealed = false;
        self.verdict = None;
    }
}
