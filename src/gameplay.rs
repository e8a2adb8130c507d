use std::collections::BTreeMap;

use crate::question::Question;
use crate::session::{Phase, QuizSession};

/// What a press of "Next" did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextOutcome {
    Advanced,
    Completed { score: usize },
    /// The current question has no answer yet, or no quiz is running.
    Blocked,
}

pub fn progress_percent(session: &QuizSession) -> f64 {
    let total = session.questions().len();
    if total == 0 {
        return 0.0;
    }

    (session.current_index() + 1) as f64 / total as f64 * 100.0
}

pub fn is_answered(session: &QuizSession) -> bool {
    session.answer(session.current_index()).is_some()
}

pub fn is_last_question(session: &QuizSession) -> bool {
    let total = session.questions().len();
    total > 0 && session.current_index() == total - 1
}

pub fn select_answer(session: &mut QuizSession, option: impl Into<String>) {
    let index = session.current_index();
    session.record_answer(index, option);
}

/// Moves to the next question, or scores the quiz on the last one.
/// Refuses while the current question is unanswered.
pub fn go_next(session: &mut QuizSession) -> NextOutcome {
    if session.phase() != Phase::Quiz || !is_answered(session) {
        return NextOutcome::Blocked;
    }

    if is_last_question(session) {
        let score = compute_score(session.questions(), session.answers());
        session.complete_quiz(score);
        NextOutcome::Completed { score }
    } else {
        session.advance();
        NextOutcome::Advanced
    }
}

pub fn go_prev(session: &mut QuizSession) {
    session.retreat();
}

/// Counts exact matches; unanswered questions count as wrong.
pub fn compute_score(questions: &[Question], answers: &BTreeMap<usize, String>) -> usize {
    questions
        .iter()
        .enumerate()
        .filter(|(index, question)| {
            answers
                .get(index)
                .is_some_and(|answer| question.is_correct(answer))
        })
        .count()
}

/// Rounded share of correct answers; zero for an empty quiz.
pub fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }

    (score as f64 / total as f64 * 100.0).round() as u32
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    pub question: String,
    pub selected: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub review: Vec<ReviewEntry>,
}

impl ResultSummary {
    pub fn from_session(session: &QuizSession) -> Self {
        let total = session.questions().len();
        let review = session
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selected = session.answer(index).map(str::to_string);
                ReviewEntry {
                    question: question.question.clone(),
                    is_correct: selected
                        .as_deref()
                        .is_some_and(|answer| question.is_correct(answer)),
                    selected,
                    correct_answer: question.correct_answer.clone(),
                }
            })
            .collect();

        Self {
            score: session.score(),
            total,
            percentage: percentage(session.score(), total),
            review,
        }
    }
}
