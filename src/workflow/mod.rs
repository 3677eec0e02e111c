pub mod question_slot;
pub mod quiz_session;

pub use question_slot::QuestionSlot;
pub use quiz_session::{Advance, ConceptReveal, QuizPhase, QuizSession, QuizSessionState};
