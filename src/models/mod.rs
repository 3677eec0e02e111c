pub mod answer;
pub mod level;
pub mod question;
pub mod response;

pub use answer::{AnswerAttempt, AnswerRecord, SubmitOutcome};
pub use level::{Level, LevelCompletion, LevelProgress, Paper};
pub use question::{
    AnswerKey, Difficulty, Question, QuestionContent, QuestionPair, QuestionSummary,
};
pub use response::ApiResponse;
