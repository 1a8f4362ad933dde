use include_dir::{include_dir, Dir};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{BankError, MalformedQuestion};
use crate::question::{Question, QuestionRecord};

static BANK_DIR: Dir = include_dir!("src/banks");

/// Question banks compiled into the binary
#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum, strum_macros::Display)]
pub enum BuiltinBank {
    General,
    Rust,
}

impl BuiltinBank {
    fn file_name(&self) -> String {
        format!("{}.json", self.to_string().to_lowercase())
    }
}

/// The validated questions available for building sessions.
///
/// Questions are shared with sessions through `Arc`, so a session's active
/// list references the bank's records rather than copying them.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Arc<Question>>,
}

/// Outcome of loading a bank: the accepted questions plus every record that
/// was skipped for failing validation.
#[derive(Debug)]
pub struct LoadReport {
    pub bank: QuestionBank,
    pub rejected: Vec<MalformedQuestion>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: questions.into_iter().map(Arc::new).collect(),
        }
    }

    /// Validate raw records, keeping the good ones and reporting the rest.
    pub fn from_records(records: Vec<QuestionRecord>) -> LoadReport {
        let mut questions = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            match Question::try_from(record) {
                Ok(q) => questions.push(Arc::new(q)),
                Err(reason) => {
                    let malformed = MalformedQuestion { index, reason };
                    warn!(%malformed, "skipping question");
                    rejected.push(malformed);
                }
            }
        }

        info!(
            loaded = questions.len(),
            rejected = rejected.len(),
            "question bank loaded"
        );

        LoadReport {
            bank: Self { questions },
            rejected,
        }
    }

    pub fn from_json_str(json: &str) -> Result<LoadReport, BankError> {
        let records: Vec<QuestionRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<LoadReport, BankError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn builtin(which: BuiltinBank) -> Result<LoadReport, BankError> {
        let file_name = which.file_name();
        let json = BANK_DIR
            .get_file(&file_name)
            .and_then(|f| f.contents_utf8())
            .ok_or(BankError::UnknownBuiltin(file_name))?;
        Self::from_json_str(json)
    }

    pub fn questions(&self) -> &[Arc<Question>] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
