use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::bank::QuestionBank;
use crate::error::{QuizError, Result};
use crate::question::Question;
use crate::review::Report;
use crate::selector::{select, SessionLimit};

/// Feedback policy for a session
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// immediate feedback, answer locked on first selection
    #[default]
    Practice,
    /// no feedback until the end, answer changeable until advancing
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Finished,
}

/// The user's answer to one active question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub selected: Option<String>,
    pub correct_option: String,
}

impl AnswerRecord {
    pub fn is_correct(&self) -> bool {
        self.selected.as_deref() == Some(self.correct_option.as_str())
    }
}

/// What a call to [`QuizSession::record_answer`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerEffect {
    /// Practice mode, first answer: stored, and this is the one moment
    /// feedback for the question is produced.
    Feedback { is_correct: bool },
    /// Practice mode, already answered: ignored.
    Locked,
    /// Test mode: stored, replacing any earlier selection.
    Selected,
}

/// Snapshot handed to the renderer whenever the question in view changes.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView {
    pub question: Arc<Question>,
    /// 1-based position of the question in the session
    pub number: usize,
    pub total: usize,
    pub progress: f64,
    pub mode: Mode,
    pub selected: Option<String>,
    pub can_advance: bool,
    pub is_last: bool,
}

/// One run of the quiz from the first question to the result.
#[derive(Debug, Clone)]
pub struct QuizSession {
    active_questions: Vec<Arc<Question>>,
    mode: Mode,
    current_index: usize,
    answers: Vec<AnswerRecord>,
    status: SessionStatus,
}

impl QuizSession {
    pub fn new(active_questions: Vec<Arc<Question>>, mode: Mode) -> Result<Self> {
        if active_questions.is_empty() {
            return Err(QuizError::EmptyBank);
        }

        let answers = active_questions
            .iter()
            .map(|q| AnswerRecord {
                selected: None,
                correct_option: q.correct_option().to_string(),
            })
            .collect();

        info!(questions = active_questions.len(), %mode, "session started");

        Ok(Self {
            active_questions,
            mode,
            current_index: 0,
            answers,
            status: SessionStatus::InProgress,
        })
    }

    /// Draw a fresh session from `bank`. Fails fast on an empty bank.
    pub fn start<R: Rng + ?Sized>(
        bank: &QuestionBank,
        limit: SessionLimit,
        mode: Mode,
        rng: &mut R,
    ) -> Result<Self> {
        if bank.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        Self::new(select(bank.questions(), limit, rng), mode)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == SessionStatus::Finished
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.active_questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active_questions.is_empty()
    }

    pub fn active_questions(&self) -> &[Arc<Question>] {
        &self.active_questions
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn current_question(&self) -> Result<&Question> {
        self.ensure_in_progress()?;
        Ok(&self.active_questions[self.current_index])
    }

    pub fn current_answer(&self) -> Result<&AnswerRecord> {
        self.ensure_in_progress()?;
        Ok(&self.answers[self.current_index])
    }

    /// Record `selected` for the question in view.
    ///
    /// Practice sessions keep the first answer and ignore later ones; test
    /// sessions keep the latest. The option is validated before anything is
    /// stored.
    pub fn record_answer(&mut self, selected: &str) -> Result<AnswerEffect> {
        let question = self.current_question()?;
        if !question.has_option(selected) {
            return Err(QuizError::InvalidOption {
                option: selected.to_string(),
            });
        }
        let is_correct = question.is_correct(selected);

        let answer = &mut self.answers[self.current_index];
        let effect = match self.mode {
            Mode::Practice if answer.selected.is_some() => AnswerEffect::Locked,
            Mode::Practice => {
                answer.selected = Some(selected.to_string());
                AnswerEffect::Feedback { is_correct }
            }
            Mode::Test => {
                answer.selected = Some(selected.to_string());
                AnswerEffect::Selected
            }
        };

        debug!(index = self.current_index, ?effect, "answer recorded");
        Ok(effect)
    }

    /// Record the `idx`-th option (0-based) of the question in view.
    pub fn select_option(&mut self, idx: usize) -> Result<AnswerEffect> {
        let option = self
            .current_question()?
            .option(idx)
            .map(str::to_string)
            .ok_or_else(|| QuizError::InvalidOption {
                option: format!("#{}", idx + 1),
            })?;
        self.record_answer(&option)
    }

    pub fn can_advance(&self) -> bool {
        !self.is_finished() && self.answers[self.current_index].selected.is_some()
    }

    /// Move past the question in view. Leaves state untouched on error.
    pub fn advance(&mut self) -> Result<()> {
        self.ensure_in_progress()?;
        if !self.can_advance() {
            return Err(QuizError::NotAnswerableYet);
        }

        self.current_index += 1;
        if self.current_index == self.active_questions.len() {
            self.status = SessionStatus::Finished;
            info!(questions = self.len(), "session finished");
        } else {
            debug!(index = self.current_index, "advanced");
        }
        Ok(())
    }

    /// Fraction of questions completed so far. The question in view does not
    /// count until the user advances past it, so this stays below 1.0 while
    /// the session is in progress.
    pub fn progress_fraction(&self) -> f64 {
        self.current_index as f64 / self.active_questions.len() as f64
    }

    pub fn view(&self) -> Result<QuestionView> {
        self.ensure_in_progress()?;
        Ok(QuestionView {
            question: Arc::clone(&self.active_questions[self.current_index]),
            number: self.current_index + 1,
            total: self.len(),
            progress: self.progress_fraction(),
            mode: self.mode,
            selected: self.answers[self.current_index].selected.clone(),
            can_advance: self.can_advance(),
            is_last: self.current_index + 1 == self.len(),
        })
    }

    pub fn report(&self) -> Result<Report> {
        Report::from_session(self)
    }

    fn ensure_in_progress(&self) -> Result<()> {
        if self.is_finished() {
            Err(QuizError::SessionFinished)
        } else {
            Ok(())
        }
    }
}
