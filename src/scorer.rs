use crate::error::{QuizError, Result};
use crate::session::QuizSession;

/// Final tally of a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSummary {
    pub correct: usize,
    /// Incorrect plus never-answered questions
    pub wrong: usize,
    pub total: usize,
    pub percent: u32,
}

/// Count the answers that match their correct option.
///
/// Identical for practice and test sessions: the tally is always recomputed
/// from the stored answers rather than kept as a running counter.
pub fn score(session: &QuizSession) -> Result<usize> {
    if !session.is_finished() {
        return Err(QuizError::SessionNotFinished);
    }
    Ok(session.answers().iter().filter(|a| a.is_correct()).count())
}

/// `round(100 * correct / total)`, halves rounding up.
pub fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

pub fn summarize(session: &QuizSession) -> Result<ScoreSummary> {
    let correct = score(session)?;
    let total = session.len();
    Ok(ScoreSummary {
        correct,
        wrong: total - correct,
        total,
        percent: percentage(correct, total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::{abc_questions, finished_session};
    use crate::session::Mode;
    use assert_matches::assert_matches;

    #[test]
    fn scores_exact_matches() {
        let session = finished_session(Mode::Test, &["A", "X", "C"]);
        assert_eq!(score(&session).unwrap(), 2);
        assert_eq!(percentage(2, 3), 67);
    }

    #[test]
    fn score_is_mode_independent() {
        let practice = finished_session(Mode::Practice, &["A", "X", "C"]);
        let test = finished_session(Mode::Test, &["A", "X", "C"]);
        assert_eq!(score(&practice).unwrap(), score(&test).unwrap());
    }

    #[test]
    fn unfinished_session_cannot_be_scored() {
        let session = QuizSession::new(abc_questions(), Mode::Practice).unwrap();
        assert_matches!(score(&session), Err(QuizError::SessionNotFinished));
        assert_matches!(summarize(&session), Err(QuizError::SessionNotFinished));
    }

    #[test]
    fn summary_counts_wrong_answers() {
        let session = finished_session(Mode::Practice, &["Y", "X", "C"]);
        assert_eq!(
            summarize(&session).unwrap(),
            ScoreSummary {
                correct: 1,
                wrong: 2,
                total: 3,
                percent: 33,
            }
        );
    }

    #[test]
    fn percentage_rounding() {
        assert_eq!(percentage(0, 5), 0);
        assert_eq!(percentage(5, 5), 100);
        assert_eq!(percentage(1, 8), 13); // 12.5
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(0, 0), 0);
    }
}
