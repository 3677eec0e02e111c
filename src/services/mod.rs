pub mod answer_judge;
pub mod error_classifier;
pub mod level_lifecycle;
pub mod pair_loader;

pub use answer_judge::{judge, letter_of, Verdict};
pub use error_classifier::{is_session_expired, Classification, ErrorClassifier, ErrorKind};
pub use level_lifecycle::{best_effort, AuthFailure, LevelLifecycle};
pub use pair_loader::{LoadedPair, QuestionPairLoader};
