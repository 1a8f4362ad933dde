use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the session state machine and the controller driving it.
///
/// `EmptyBank` is user-recoverable (wait for / load a bank and retry). The
/// remaining variants mean the caller broke the state machine's contract and
/// point at a bug in the boundary layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("no questions are loaded; load a question bank before starting")]
    EmptyBank,

    #[error("'{option}' is not one of the current question's options")]
    InvalidOption { option: String },

    #[error("the current question has not been answered yet")]
    NotAnswerableYet,

    #[error("the session is already finished")]
    SessionFinished,

    #[error("the session is still in progress")]
    SessionNotFinished,

    #[error("settings cannot change while a session is in progress")]
    SessionInProgress,
}

pub type Result<T> = std::result::Result<T, QuizError>;

/// Errors that abort loading a question bank as a whole.
#[derive(Error, Debug)]
pub enum BankError {
    #[error("failed to read question bank {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("question bank is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no bundled question bank named '{0}'")]
    UnknownBuiltin(String),
}

/// Why a single bank record was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("question text is empty")]
    EmptyText,

    #[error("needs at least two options, found {0}")]
    TooFewOptions(usize),

    #[error("option '{0}' appears more than once")]
    DuplicateOption(String),

    #[error("answer '{0}' is not among the options")]
    AnswerNotAnOption(String),
}

/// A bank record that failed validation. Reported to the caller and skipped;
/// the rest of the bank still loads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("question #{index} is malformed: {reason}")]
pub struct MalformedQuestion {
    pub index: usize,
    pub reason: MalformedReason,
}
