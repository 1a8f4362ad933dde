use std::sync::Arc;

use crate::error::{QuizError, Result};
use crate::question::Question;
use crate::scorer::{summarize, ScoreSummary};
use crate::session::QuizSession;

/// How the user did on one question
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewEntry {
    pub question: Arc<Question>,
    pub selected: Option<String>,
    pub is_correct: bool,
}

impl ReviewEntry {
    pub fn was_skipped(&self) -> bool {
        self.selected.is_none()
    }
}

/// Everything the result screen shows
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub summary: ScoreSummary,
    pub review: Vec<ReviewEntry>,
}

impl Report {
    pub fn from_session(session: &QuizSession) -> Result<Self> {
        Ok(Self {
            summary: summarize(session)?,
            review: build_review(session)?,
        })
    }
}

/// One entry per active question, in session order.
pub fn build_review(session: &QuizSession) -> Result<Vec<ReviewEntry>> {
    if !session.is_finished() {
        return Err(QuizError::SessionNotFinished);
    }

    Ok(session
        .active_questions()
        .iter()
        .zip(session.answers())
        .map(|(question, answer)| ReviewEntry {
            question: Arc::clone(question),
            selected: answer.selected.clone(),
            is_correct: answer.is_correct(),
        })
        .collect())
}
