use rand::Rng;
use tracing::debug;

use crate::bank::QuestionBank;
use crate::error::{QuizError, Result};
use crate::review::Report;
use crate::selector::SessionLimit;
use crate::session::{AnswerEffect, Mode, QuestionView, QuizSession};

/// The rendering side of a quiz. The controller calls these whenever there is
/// something new to show; implementations decide how it looks.
pub trait Presenter {
    fn render_question(&mut self, view: &QuestionView);

    /// Practice sessions only: the first answer to the question in view was
    /// just locked in.
    fn render_feedback(&mut self, view: &QuestionView, is_correct: bool);

    fn render_result(&mut self, report: &Report);
}

/// Owns the bank, the user's chosen settings, and at most one live session.
#[derive(Debug)]
pub struct QuizController {
    bank: QuestionBank,
    limit: SessionLimit,
    mode: Mode,
    session: Option<QuizSession>,
}

impl QuizController {
    pub fn new(bank: QuestionBank, limit: SessionLimit, mode: Mode) -> Self {
        Self {
            bank,
            limit,
            mode,
            session: None,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn limit(&self) -> SessionLimit {
        self.limit
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    /// True while a session exists and has not reached its result
    pub fn in_session(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.is_finished())
    }

    pub fn set_limit(&mut self, limit: SessionLimit) -> Result<()> {
        self.ensure_idle()?;
        self.limit = limit;
        Ok(())
    }

    pub fn set_mode(&mut self, mode: Mode) -> Result<()> {
        self.ensure_idle()?;
        self.mode = mode;
        Ok(())
    }

    /// Replace any previous session with a fresh one and show its first
    /// question.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        presenter: &mut dyn Presenter,
    ) -> Result<()> {
        let session = QuizSession::start(&self.bank, self.limit, self.mode, rng)?;
        presenter.render_question(&session.view()?);
        self.session = Some(session);
        Ok(())
    }

    pub fn select_option(&mut self, idx: usize, presenter: &mut dyn Presenter) -> Result<()> {
        let session = self.session_mut()?;
        match session.select_option(idx)? {
            AnswerEffect::Feedback { is_correct } => {
                presenter.render_feedback(&session.view()?, is_correct)
            }
            AnswerEffect::Selected => presenter.render_question(&session.view()?),
            AnswerEffect::Locked => debug!(idx, "answer locked, selection ignored"),
        }
        Ok(())
    }

    pub fn advance(&mut self, presenter: &mut dyn Presenter) -> Result<()> {
        let session = self.session_mut()?;
        session.advance()?;
        if session.is_finished() {
            presenter.render_result(&session.report()?);
        } else {
            presenter.render_question(&session.view()?);
        }
        Ok(())
    }

    pub fn report(&self) -> Result<Report> {
        self.session
            .as_ref()
            .ok_or(QuizError::SessionNotFinished)?
            .report()
    }

    /// Drop the current session. Nothing carries over into the next one.
    pub fn restart(&mut self) {
        if self.session.take().is_some() {
            debug!("session discarded");
        }
    }

    fn session_mut(&mut self) -> Result<&mut QuizSession> {
        // a result screen with no live session behaves like a finished one
        self.session.as_mut().ok_or(QuizError::SessionFinished)
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.in_session() {
            Err(QuizError::SessionInProgress)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::Question;
    use assert_matches::assert_matches;
    use rand::{rngs::StdRng, SeedableRng};

    #[derive(Debug, PartialEq)]
    enum Call {
        Question(usize),
        Feedback(usize, bool),
        Result(usize),
    }

    #[derive(Default)]
    struct RecordingPresenter {
        calls: Vec<Call>,
    }

    impl Presenter for RecordingPresenter {
        fn render_question(&mut self, view: &QuestionView) {
            self.calls.push(Call::Question(view.number));
        }

        fn render_feedback(&mut self, view: &QuestionView, is_correct: bool) {
            self.calls.push(Call::Feedback(view.number, is_correct));
        }

        fn render_result(&mut self, report: &Report) {
            self.calls.push(Call::Result(report.summary.correct));
        }
    }

    fn bank() -> QuestionBank {
        QuestionBank::new(vec![
            Question::new("one", vec!["right".into(), "wrong".into()], "right").unwrap(),
            Question::new("two", vec!["right".into(), "wrong".into()], "right").unwrap(),
        ])
    }

    #[test]
    fn practice_flow_renders_feedback_then_result() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut presenter = RecordingPresenter::default();
        let mut ctl = QuizController::new(bank(), SessionLimit::All, Mode::Practice);

        ctl.start(&mut rng, &mut presenter).unwrap();
        ctl.select_option(0, &mut presenter).unwrap();
        // locked: no further render
        ctl.select_option(1, &mut presenter).unwrap();
        ctl.advance(&mut presenter).unwrap();
        ctl.select_option(1, &mut presenter).unwrap();
        ctl.advance(&mut presenter).unwrap();

        assert_eq!(
            presenter.calls,
            vec![
                Call::Question(1),
                Call::Feedback(1, true),
                Call::Question(2),
                Call::Feedback(2, false),
                Call::Result(1),
            ]
        );
        assert_eq!(ctl.report().unwrap().summary.total, 2);
    }

    #[test]
    fn test_flow_never_renders_feedback() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut presenter = RecordingPresenter::default();
        let mut ctl = QuizController::new(bank(), SessionLimit::All, Mode::Test);

        ctl.start(&mut rng, &mut presenter).unwrap();
        ctl.select_option(1, &mut presenter).unwrap();
        ctl.select_option(0, &mut presenter).unwrap();
        ctl.advance(&mut presenter).unwrap();
        ctl.select_option(0, &mut presenter).unwrap();
        ctl.advance(&mut presenter).unwrap();

        assert!(!presenter
            .calls
            .iter()
            .any(|c| matches!(c, Call::Feedback(..))));
        assert_eq!(presenter.calls.last(), Some(&Call::Result(2)));
    }

    #[test]
    fn advance_without_answer_is_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut presenter = RecordingPresenter::default();
        let mut ctl = QuizController::new(bank(), SessionLimit::All, Mode::Test);

        ctl.start(&mut rng, &mut presenter).unwrap();
        assert_matches!(
            ctl.advance(&mut presenter),
            Err(QuizError::NotAnswerableYet)
        );
        assert_eq!(presenter.calls, vec![Call::Question(1)]);
    }

    #[test]
    fn empty_bank_refuses_to_start() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut presenter = RecordingPresenter::default();
        let mut ctl =
            QuizController::new(QuestionBank::default(), SessionLimit::All, Mode::Test);

        assert_matches!(
            ctl.start(&mut rng, &mut presenter),
            Err(QuizError::EmptyBank)
        );
        assert!(presenter.calls.is_empty());
        assert!(ctl.session().is_none());
    }

    #[test]
    fn settings_are_frozen_during_a_session() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut presenter = RecordingPresenter::default();
        let mut ctl = QuizController::new(bank(), SessionLimit::Count(1), Mode::Test);

        ctl.set_mode(Mode::Practice).unwrap();
        ctl.start(&mut rng, &mut presenter).unwrap();
        assert_eq!(ctl.session().unwrap().len(), 1);
        assert_matches!(
            ctl.set_mode(Mode::Test),
            Err(QuizError::SessionInProgress)
        );
        assert_matches!(
            ctl.set_limit(SessionLimit::All),
            Err(QuizError::SessionInProgress)
        );

        ctl.select_option(0, &mut presenter).unwrap();
        ctl.advance(&mut presenter).unwrap();
        // finished sessions no longer hold settings hostage
        ctl.set_limit(SessionLimit::All).unwrap();
        assert_eq!(ctl.limit(), SessionLimit::All);
    }

    #[test]
    fn restart_discards_the_session() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut presenter = RecordingPresenter::default();
        let mut ctl = QuizController::new(bank(), SessionLimit::All, Mode::Test);

        ctl.start(&mut rng, &mut presenter).unwrap();
        ctl.select_option(0, &mut presenter).unwrap();
        ctl.restart();
        assert!(ctl.session().is_none());
        assert!(!ctl.in_session());
        assert_matches!(
            ctl.select_option(0, &mut presenter),
            Err(QuizError::SessionFinished)
        );

        ctl.start(&mut rng, &mut presenter).unwrap();
        let session = ctl.session().unwrap();
        assert!(session.answers().iter().all(|a| a.selected.is_none()));
    }
}
