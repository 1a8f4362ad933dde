use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::MalformedReason;

/// A single multiple-choice question.
///
/// Only constructible through [`Question::new`], so every value upholds:
/// non-empty text, at least two options, no duplicate options, and the
/// correct option present verbatim among the options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_option: String,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_option: impl Into<String>,
    ) -> Result<Self, MalformedReason> {
        let text = text.into();
        let correct_option = correct_option.into();

        if text.trim().is_empty() {
            return Err(MalformedReason::EmptyText);
        }
        if options.len() < 2 {
            return Err(MalformedReason::TooFewOptions(options.len()));
        }
        if let Some(dup) = options.iter().duplicates().next() {
            return Err(MalformedReason::DuplicateOption(dup.clone()));
        }
        if !options.contains(&correct_option) {
            return Err(MalformedReason::AnswerNotAnOption(correct_option));
        }

        Ok(Self {
            text,
            options,
            correct_option,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_option(&self) -> &str {
        &self.correct_option
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    pub fn option(&self, idx: usize) -> Option<&str> {
        self.options.get(idx).map(String::as_str)
    }

    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_option == option
    }
}

/// Wire shape of a bank record, using the field names of the JSON banks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionRecord {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = MalformedReason;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Question::new(record.question, record.options, record.answer)
    }
}
