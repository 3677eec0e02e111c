use serde::{Deserialize, Serialize};

/// 关卡：与一篇论文一一对应，只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: String,
    pub paper_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pass_condition: String,
    #[serde(default)]
    pub meta_json: String,
    #[serde(default)]
    pub paper_author: Option<String>,
    #[serde(default)]
    pub paper_pub_ym: Option<String>,
    #[serde(default)]
    pub citation_count: Option<u32>,
}

/// 论文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub id: String,
    #[serde(default)]
    pub subject_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub citation: String,
}

/// `POST /levels/{id}/start` 的返回
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LevelProgress {
    #[serde(default)]
    pub level_id: String,
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub started_at: Option<String>,
}

/// `POST /levels/{id}/complete` 的返回
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LevelCompletion {
    #[serde(default)]
    pub level_id: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub stars: u8,
    #[serde(default)]
    pub completed_at: Option<String>,
}
