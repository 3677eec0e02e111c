//! # PaperPlay Quiz
//!
//! 论文闯关答题客户端：按"引入题 → 概念题"成组推进，提交作答记录和用时，完成关卡
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 连接、凭证），只暴露能力
//! - `Transport` - `call(method, path, body)`，401 时清除令牌
//! - `CredentialStore` - 注入式凭证存储
//!
//! ### ② 接口层（Clients）
//! - `PaperPlayClient` - 关卡 / 题目接口的类型化封装
//!
//! ### ③ 业务能力层（Services）
//! - `answer_judge` - 选项字母与判题
//! - `QuestionPairLoader` - 题目配对与成组加载
//! - `LevelLifecycle` - 开始 / 提交 / 完成，尽力而为
//! - `ErrorClassifier` - 登录失效还是普通失败
//!
//! ### ④ 流程层（Workflow）
//! - `QuizSession` - 答题状态机
//!
//! ### ⑤ 应用层
//! - `App` - 终端答题界面
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use clients::PaperPlayClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{CredentialStore, HttpTransport, MemoryCredentialStore, Method, Transport};
pub use models::{Level, Question, QuestionPair};
pub use services::{Classification, ErrorClassifier, ErrorKind};
pub use workflow::{Advance, ConceptReveal, QuizPhase, QuizSession};
