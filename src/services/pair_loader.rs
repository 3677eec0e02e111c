//! 题目组加载 - 业务能力层
//!
//! 只负责"拉题、配对"能力：
//! - 关卡题目列表按服务器顺序两两配对，落单的最后一题丢弃
//! - 一组题目的两道题并发拉取，要么都成功，要么整体失败

use tracing::{debug, info, warn};

use crate::clients::PaperPlayClient;
use crate::error::FetchError;
use crate::models::{Question, QuestionPair, QuestionSummary};

/// 已加载的一组题目
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPair {
    pub lead_in: Question,
    pub concept: Question,
}

/// 题目组加载器
#[derive(Clone)]
pub struct QuestionPairLoader {
    client: PaperPlayClient,
}

impl QuestionPairLoader {
    pub fn new(client: PaperPlayClient) -> Self {
        Self { client }
    }

    /// 拉取关卡题目列表并配对
    pub async fn list_pairs(&self, level_id: &str) -> Result<Vec<QuestionPair>, FetchError> {
        let endpoint = format!("levels/{}/questions", level_id);
        let summaries = self
            .client
            .get_level_questions(level_id)
            .await?
            .into_data(endpoint)?;

        let pairs = pair_up(&summaries);
        if summaries.len() % 2 == 1 {
            warn!(
                "⚠️ 关卡 {} 题目数为奇数 ({})，最后一题不会出现",
                level_id,
                summaries.len()
            );
        }
        info!(
            "✓ 关卡 {} 共 {} 道题，组成 {} 组",
            level_id,
            summaries.len(),
            pairs.len()
        );

        Ok(pairs)
    }

    /// 并发加载一组题目的两道题
    ///
    /// 两个请求都结束后才返回；任一失败则整体失败，不返回半组数据。
    pub async fn load_pair(&self, pair: &QuestionPair) -> Result<LoadedPair, FetchError> {
        debug!("加载题目组: {} / {}", pair.lead_in_id, pair.concept_id);

        let (lead_in, concept) = futures::join!(
            self.fetch_question(&pair.lead_in_id),
            self.fetch_question(&pair.concept_id)
        );

        Ok(LoadedPair {
            lead_in: lead_in?,
            concept: concept?,
        })
    }

    async fn fetch_question(&self, question_id: &str) -> Result<Question, FetchError> {
        let endpoint = format!("questions/{}", question_id);
        self.client
            .get_question(question_id)
            .await?
            .into_data(endpoint)
    }
}

/// 相邻两题配成一组，保持服务器顺序
pub fn pair_up(summaries: &[QuestionSummary]) -> Vec<QuestionPair> {
    summaries
        .chunks_exact(2)
        .map(|chunk| QuestionPair {
            lead_in_id: chunk[0].id.clone(),
            concept_id: chunk[1].id.clone(),
        })
        .collect()
}
