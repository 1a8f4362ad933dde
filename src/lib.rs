// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod bank;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod question;
pub mod review;
pub mod runtime;
pub mod scorer;
pub mod selector;
pub mod session;

pub use bank::{BuiltinBank, LoadReport, QuestionBank};
pub use controller::{Presenter, QuizController};
pub use error::{BankError, MalformedQuestion, MalformedReason, QuizError};
pub use question::Question;
pub use review::{build_review, Report, ReviewEntry};
pub use scorer::{percentage, score, ScoreSummary};
pub use selector::{select, SessionLimit, LIMIT_MENU};
pub use session::{AnswerEffect, AnswerRecord, Mode, QuestionView, QuizSession, SessionStatus};
