//! 答题流程 - 流程层
//!
//! 核心职责：驱动一篇论文对应关卡的完整答题流程
//!
//! 状态流转：
//! ```text
//! Idle → Loading → AwaitingLeadIn → LeadInRevealed → AwaitingConcept → ConceptRevealed
//!                        ↑                                                   │
//!                        └────────────── 下一组 ←──────────────────────────────┤
//!                                                                            └→ Completed
//! ```
//! 拉取关卡或题目失败时进入 `Failed`，可调用 `retry()` 重试。
//!
//! 开始关卡 / 提交答案 / 完成关卡都是后台任务，失败只写日志，不影响状态流转。

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::clients::PaperPlayClient;
use crate::error::{AppError, AppResult, FetchError};
use crate::models::{AnswerAttempt, Level, QuestionPair};
use crate::services::answer_judge::{judge, Verdict};
use crate::services::{LevelLifecycle, LoadedPair, QuestionPairLoader};
use crate::utils::logging;
use crate::utils::{elapsed_ms, Clock};
use crate::workflow::question_slot::QuestionSlot;

/// 答题阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Idle,
    Loading,
    AwaitingLeadIn,
    LeadInRevealed,
    AwaitingConcept,
    ConceptRevealed,
    Completed,
    /// 拉取失败，停止推进
    Failed,
}

/// 引入题答对之后概念题如何出现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConceptReveal {
    /// 答对后立即展示概念题
    #[default]
    AutoOnCorrect,
    /// 答对后需要点"查看概念题"
    RequireNext,
}

/// `advance()` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// 当前状态下"下一步"无意义
    Ignored,
    /// 打开概念题
    ConceptOpened,
    /// 引入题答错，清空选择重新作答
    Retry,
    /// 进入下一组题目
    NextPair,
    /// 全部完成，调用方负责庆祝并退出
    Completed,
}

/// 会话状态，只能通过 `QuizSession` 的流转方法修改
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSessionState {
    pub paper_id: String,
    pub level_id: Option<String>,
    pub pairs: Vec<QuestionPair>,
    pub current_pair_index: usize,
    pub phase: QuizPhase,
    pub lead_in: Option<QuestionSlot>,
    pub concept: Option<QuestionSlot>,
    pub lead_in_start: Option<DateTime<Utc>>,
    pub concept_start: Option<DateTime<Utc>>,
}

impl QuizSessionState {
    fn new(paper_id: String) -> Self {
        Self {
            paper_id,
            level_id: None,
            pairs: Vec::new(),
            current_pair_index: 0,
            phase: QuizPhase::Idle,
            lead_in: None,
            concept: None,
            lead_in_start: None,
            concept_start: None,
        }
    }
}

/// 答题会话
///
/// - 独占会话状态，所有修改都经过流转方法
/// - 选择答案、推进时会派生后台任务，需要在 tokio 运行时内调用
/// - 会话销毁不会取消仍在进行的后台提交
pub struct QuizSession {
    state: QuizSessionState,
    level: Option<Level>,
    session_start: Option<DateTime<Utc>>,
    /// 加载失败、等待重试的题目组下标
    pending_pair: Option<usize>,
    concept_reveal: ConceptReveal,
    clock: Clock,
    client: PaperPlayClient,
    loader: QuestionPairLoader,
    lifecycle: LevelLifecycle,
    in_flight: Vec<JoinHandle<()>>,
}

impl QuizSession {
    pub fn new(paper_id: impl Into<String>, client: PaperPlayClient) -> Self {
        Self {
            state: QuizSessionState::new(paper_id.into()),
            level: None,
            session_start: None,
            pending_pair: None,
            concept_reveal: ConceptReveal::default(),
            clock: Clock::default(),
            loader: QuestionPairLoader::new(client.clone()),
            lifecycle: LevelLifecycle::new(client.clone()),
            client,
            in_flight: Vec::new(),
        }
    }

    pub fn with_concept_reveal(mut self, concept_reveal: ConceptReveal) -> Self {
        self.concept_reveal = concept_reveal;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    // ========== 状态流转 ==========

    /// 加载关卡并进入第一组题目
    ///
    /// 只在 `Idle` / `Failed` 下生效。失败时进入 `Failed` 并返回错误，
    /// 由调用方交给 `ErrorClassifier`。
    pub async fn start(&mut self) -> AppResult<()> {
        if !matches!(self.state.phase, QuizPhase::Idle | QuizPhase::Failed) {
            debug!("会话已开始，忽略 start (状态: {:?})", self.state.phase);
            return Ok(());
        }

        self.state.phase = QuizPhase::Loading;
        self.session_start = Some(self.clock.now());

        if let Err(e) = self.bootstrap().await {
            error!("❌ 加载关卡失败 (论文 {}): {}", self.state.paper_id, e);
            self.state.phase = QuizPhase::Failed;
            return Err(e.into());
        }
        Ok(())
    }

    async fn bootstrap(&mut self) -> Result<(), FetchError> {
        let paper_id = self.state.paper_id.clone();
        let level = self
            .client
            .get_paper_level(&paper_id)
            .await?
            .into_data(format!("papers/{}/level", paper_id))?;
        info!("✓ 获取关卡成功: {} ({})", level.name, level.id);

        let handle = self.lifecycle.start(&level.id);
        self.track(handle);

        let pairs = self.loader.list_pairs(&level.id).await?;
        let first = pairs.first().cloned().ok_or_else(|| FetchError::NoQuestions {
            level_id: level.id.clone(),
        })?;
        let loaded = self.loader.load_pair(&first).await?;

        logging::log_session_start(&paper_id, &level.id, pairs.len());
        self.state.level_id = Some(level.id.clone());
        self.state.pairs = pairs;
        self.state.current_pair_index = 0;
        self.level = Some(level);
        self.pending_pair = None;
        self.commit_pair(loaded);
        Ok(())
    }

    /// 作答引入题
    ///
    /// 只在 `AwaitingLeadIn` 下生效，其余状态（包括已揭晓）返回 `None` 且不改变状态。
    pub fn select_lead_in(&mut self, index: usize) -> Option<Verdict> {
        if self.state.phase != QuizPhase::AwaitingLeadIn {
            debug!("忽略引入题作答 (状态: {:?})", self.state.phase);
            return None;
        }

        let now = self.clock.now();
        let started = self.state.lead_in_start.or(self.session_start).unwrap_or(now);
        let attempt = reveal(self.state.lead_in.as_mut()?, index, elapsed_ms(started, now));

        self.state.phase = QuizPhase::LeadInRevealed;
        self.submit(&attempt);

        if !attempt.is_correct {
            info!("✗ 引入题答案错误，可以重新作答");
        } else if self.concept_reveal == ConceptReveal::AutoOnCorrect {
            self.open_concept();
        }

        Some(Verdict {
            is_correct: attempt.is_correct,
            selected_letter: attempt.selected_letter,
        })
    }

    /// 作答概念题
    ///
    /// 只在 `AwaitingConcept` 下生效。
    pub fn select_concept(&mut self, index: usize) -> Option<Verdict> {
        if self.state.phase != QuizPhase::AwaitingConcept {
            debug!("忽略概念题作答 (状态: {:?})", self.state.phase);
            return None;
        }

        let now = self.clock.now();
        let started = self.state.concept_start.or(self.session_start).unwrap_or(now);
        let attempt = reveal(self.state.concept.as_mut()?, index, elapsed_ms(started, now));

        self.state.phase = QuizPhase::ConceptRevealed;
        self.submit(&attempt);

        if attempt.is_correct {
            info!("✓ 概念题回答正确");
        } else {
            info!("✗ 概念题答案错误");
        }

        Some(Verdict {
            is_correct: attempt.is_correct,
            selected_letter: attempt.selected_letter,
        })
    }

    /// "下一步"
    ///
    /// 后台调用收到过 401 时不再推进，直接把登录失效错误交给调用方。
    pub async fn advance(&mut self) -> AppResult<Advance> {
        if let Some(err) = self.take_auth_failure() {
            warn!("⚠️ 登录已失效，停止推进 (状态: {:?})", self.state.phase);
            return Err(err);
        }

        match self.state.phase {
            QuizPhase::LeadInRevealed => {
                let correct = self
                    .state
                    .lead_in
                    .as_ref()
                    .map(QuestionSlot::is_correct)
                    .unwrap_or(false);

                if correct {
                    self.open_concept();
                    Ok(Advance::ConceptOpened)
                } else {
                    // 计时不重置，重答时长继续累计
                    if let Some(slot) = self.state.lead_in.as_mut() {
                        slot.clear_selection();
                    }
                    self.state.phase = QuizPhase::AwaitingLeadIn;
                    Ok(Advance::Retry)
                }
            }
            QuizPhase::ConceptRevealed => {
                let next = self.state.current_pair_index + 1;
                match self.state.pairs.get(next).cloned() {
                    Some(pair) => {
                        self.load_pair_at(next, pair).await?;
                        Ok(Advance::NextPair)
                    }
                    None => {
                        self.complete();
                        Ok(Advance::Completed)
                    }
                }
            }
            phase => {
                debug!("忽略下一步 (状态: {:?})", phase);
                Ok(Advance::Ignored)
            }
        }
    }

    /// 失败后重试
    ///
    /// 重新加载失败的题目组；关卡本身没加载成功则重新开始。
    pub async fn retry(&mut self) -> AppResult<()> {
        if self.state.phase != QuizPhase::Failed {
            return Ok(());
        }

        let pending = self
            .pending_pair
            .and_then(|index| self.state.pairs.get(index).cloned().map(|pair| (index, pair)));
        match pending {
            Some((index, pair)) => self.load_pair_at(index, pair).await,
            None => self.start().await,
        }
    }

    /// 取出后台调用的登录失效信号（只返回一次）
    pub fn take_auth_failure(&self) -> Option<AppError> {
        self.lifecycle.auth_failure().take()
    }

    /// 等待所有后台提交结束（退出前或测试中使用）
    pub async fn settle(&mut self) {
        for handle in std::mem::take(&mut self.in_flight) {
            if let Err(e) = handle.await {
                warn!("⚠️ 后台任务异常结束: {}", e);
            }
        }
    }

    // ========== 内部流转 ==========

    async fn load_pair_at(&mut self, index: usize, pair: QuestionPair) -> AppResult<()> {
        self.state.phase = QuizPhase::Loading;

        match self.loader.load_pair(&pair).await {
            Ok(loaded) => {
                self.state.current_pair_index = index;
                self.pending_pair = None;
                self.commit_pair(loaded);
                Ok(())
            }
            Err(e) => {
                // 上一组的数据保留，仍可读取
                error!("❌ 加载第 {} 组题目失败: {}", index + 1, e);
                self.pending_pair = Some(index);
                self.state.phase = QuizPhase::Failed;
                Err(e.into())
            }
        }
    }

    fn commit_pair(&mut self, loaded: LoadedPair) {
        logging::log_pair_start(
            self.state.current_pair_index,
            self.state.pairs.len(),
            &loaded.lead_in.stem,
        );

        self.state.lead_in = Some(QuestionSlot::new(loaded.lead_in));
        self.state.concept = Some(QuestionSlot::new(loaded.concept));
        self.state.lead_in_start = Some(self.clock.now());
        self.state.concept_start = None;
        self.state.phase = QuizPhase::AwaitingLeadIn;
    }

    fn open_concept(&mut self) {
        self.state.concept_start = Some(self.clock.now());
        self.state.phase = QuizPhase::AwaitingConcept;
        info!("✓ 引入题回答正确，进入概念题");
    }

    fn complete(&mut self) {
        if let Some(level_id) = self.state.level_id.clone() {
            let handle = self.lifecycle.complete(&level_id);
            self.track(handle);
        }
        self.state.phase = QuizPhase::Completed;
        logging::log_completion(&self.state.paper_id, self.state.pairs.len());
    }

    fn submit(&mut self, attempt: &AnswerAttempt) {
        let Some(level_id) = self.state.level_id.clone() else {
            warn!("⚠️ 没有关卡ID，跳过提交题目 {}", attempt.question_id);
            return;
        };

        debug!(
            "提交答案: 题目 {} 选 {} 用时 {}ms",
            attempt.question_id, attempt.selected_letter, attempt.duration_ms
        );
        let handle = self.lifecycle.submit(&level_id, attempt);
        self.track(handle);
    }

    fn track(&mut self, handle: JoinHandle<()>) {
        self.in_flight.retain(|h| !h.is_finished());
        self.in_flight.push(handle);
    }

    // ========== 只读访问 ==========

    pub fn state(&self) -> &QuizSessionState {
        &self.state
    }

    pub fn phase(&self) -> QuizPhase {
        self.state.phase
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn level_id(&self) -> Option<&str> {
        self.state.level_id.as_deref()
    }

    pub fn pair_count(&self) -> usize {
        self.state.pairs.len()
    }

    pub fn current_pair_index(&self) -> usize {
        self.state.current_pair_index
    }

    pub fn lead_in(&self) -> Option<&QuestionSlot> {
        self.state.lead_in.as_ref()
    }

    pub fn concept(&self) -> Option<&QuestionSlot> {
        self.state.concept.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.state.phase == QuizPhase::Completed
    }

    pub fn has_next_pair(&self) -> bool {
        self.state.current_pair_index + 1 < self.state.pairs.len()
    }

    /// 引入题答错、可以重新作答
    pub fn can_retry_lead_in(&self) -> bool {
        self.state.phase == QuizPhase::LeadInRevealed
            && !self.state.lead_in.as_ref().map(QuestionSlot::is_correct).unwrap_or(false)
    }

    pub fn concept_visible(&self) -> bool {
        matches!(
            self.state.phase,
            QuizPhase::AwaitingConcept | QuizPhase::ConceptRevealed
        )
    }

    /// 当前组的概念名（取自引入题）
    pub fn current_concept_name(&self) -> &str {
        self.state
            .lead_in
            .as_ref()
            .map(|slot| slot.question.content.concept_name())
            .unwrap_or("")
    }

    /// "下一步"按钮文案；当前状态下没有下一步时为 `None`
    pub fn next_action_label(&self) -> Option<&'static str> {
        match self.state.phase {
            QuizPhase::LeadInRevealed if self.can_retry_lead_in() => Some("重新作答"),
            QuizPhase::LeadInRevealed => Some("查看概念题"),
            QuizPhase::ConceptRevealed if self.has_next_pair() => Some("下一组题目"),
            QuizPhase::ConceptRevealed => Some("完成"),
            _ => None,
        }
    }
}

/// 揭晓一道题：记录选择与判定，生成作答记录
fn reveal(slot: &mut QuestionSlot, index: usize, duration_ms: u64) -> AnswerAttempt {
    let verdict = judge(index, slot.question.answer.correct_letter());
    slot.selected = Some(index);
    slot.revealed = true;
    slot.verdict = Some(verdict);
    AnswerAttempt::new(&slot.question, index, verdict, duration_ms)
}
