use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::question::Question;

/// Coarse lifecycle stage; decides which view is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Menu,
    Loading,
    Quiz,
    Result,
}

/// Permission for one in-flight question request to apply its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingTicket {
    epoch: u64,
    pub topic: String,
}

/// Permission for one in-flight feedback request to store its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackTicket {
    epoch: u64,
    pub score: usize,
    pub total: usize,
    pub topic: String,
}

/// State of one quiz attempt, mutated only through its transition methods.
///
/// Transitions called from the wrong phase are programming errors and
/// panic. The `epoch` counter advances whenever an in-flight request's
/// result must no longer be applied; tickets carry the epoch they were
/// issued under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizSession {
    phase: Phase,
    topic: String,
    questions: Vec<Question>,
    answers: BTreeMap<usize, String>,
    current_index: usize,
    score: usize,
    generation_error: Option<String>,
    feedback_text: Option<String>,
    feedback_pending: bool,
    loading_started: bool,
    feedback_requested: bool,
    epoch: u64,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &BTreeMap<usize, String> {
        &self.answers
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Meaningful only in [`Phase::Result`].
    pub fn score(&self) -> usize {
        self.score
    }

    pub fn generation_error(&self) -> Option<&str> {
        self.generation_error.as_deref()
    }

    pub fn feedback_text(&self) -> Option<&str> {
        self.feedback_text.as_deref()
    }

    pub fn is_feedback_pending(&self) -> bool {
        self.feedback_pending
    }

    pub fn select_topic(&mut self, topic: impl Into<String>) {
        assert_eq!(self.phase, Phase::Menu, "select_topic outside of the menu");

        self.topic = topic.into();
        self.generation_error = None;
        self.phase = Phase::Loading;
        self.loading_started = false;
        self.epoch += 1;
        log::debug!("topic '{}' selected, loading", self.topic);
    }

    /// Hands out the ticket for this Loading entry. Returns `None` if a
    /// request is already in flight or the attempt has already failed.
    pub fn begin_loading(&mut self) -> Option<LoadingTicket> {
        if self.phase != Phase::Loading || self.loading_started || self.generation_error.is_some()
        {
            return None;
        }

        self.loading_started = true;
        Some(LoadingTicket {
            epoch: self.epoch,
            topic: self.topic.clone(),
        })
    }

    pub fn is_live(&self, ticket: &LoadingTicket) -> bool {
        self.phase == Phase::Loading && self.epoch == ticket.epoch
    }

    /// The view that issued `ticket` went away; its result will be dropped
    /// and a later mount may start a fresh request.
    pub fn abandon_loading(&mut self, ticket: &LoadingTicket) {
        if self.is_live(ticket) {
            self.epoch += 1;
            self.loading_started = false;
            log::debug!("loading for '{}' abandoned", ticket.topic);
        }
    }

    pub fn questions_ready(&mut self, questions: Vec<Question>) {
        assert_eq!(self.phase, Phase::Loading, "questions_ready outside of loading");

        self.questions = questions;
        self.answers.clear();
        self.current_index = 0;
        self.phase = Phase::Quiz;
        log::debug!("{} questions ready", self.questions.len());
    }

    pub fn generation_failed(&mut self, message: impl Into<String>) {
        assert_eq!(self.phase, Phase::Loading, "generation_failed outside of loading");

        self.generation_error = Some(message.into());
    }

    /// Leaves Loading, whether it failed or is still waiting.
    pub fn return_to_menu(&mut self) {
        assert_eq!(self.phase, Phase::Loading, "return_to_menu outside of loading");

        self.phase = Phase::Menu;
        self.topic.clear();
        self.generation_error = None;
        self.loading_started = false;
        self.epoch += 1;
    }

    /// Upserts the answer for `index`. Callers pass the current index.
    pub fn record_answer(&mut self, index: usize, option: impl Into<String>) {
        assert_eq!(self.phase, Phase::Quiz, "record_answer outside of the quiz");
        assert!(
            index < self.questions.len(),
            "answer index {index} out of range for {} questions",
            self.questions.len()
        );

        self.answers.insert(index, option.into());
    }

    pub fn advance(&mut self) {
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
        }
    }

    pub fn retreat(&mut self) {
        self.current_index = self.current_index.saturating_sub(1);
    }

    pub fn complete_quiz(&mut self, score: usize) {
        assert_eq!(self.phase, Phase::Quiz, "complete_quiz outside of the quiz");

        self.score = score;
        self.phase = Phase::Result;
        log::debug!("quiz complete: {score}/{}", self.questions.len());
    }

    pub fn set_feedback(&mut self, text: impl Into<String>) {
        self.feedback_text = Some(text.into());
    }

    pub fn set_feedback_pending(&mut self, pending: bool) {
        self.feedback_pending = pending;
    }

    /// Latches the feedback request for this session and marks it pending.
    /// Returns `None` outside Result, once already latched, or when a
    /// message is already stored.
    pub fn begin_feedback(&mut self) -> Option<FeedbackTicket> {
        if self.phase != Phase::Result || self.feedback_requested || self.feedback_text.is_some() {
            return None;
        }

        self.feedback_requested = true;
        self.set_feedback_pending(true);
        Some(FeedbackTicket {
            epoch: self.epoch,
            score: self.score,
            total: self.questions.len(),
            topic: self.topic.clone(),
        })
    }

    /// Stores the message if the session that issued `ticket` is still the
    /// current one. Returns whether it was stored.
    pub fn finish_feedback(&mut self, ticket: &FeedbackTicket, text: impl Into<String>) -> bool {
        if self.phase != Phase::Result || self.epoch != ticket.epoch {
            return false;
        }

        self.set_feedback(text);
        self.set_feedback_pending(false);
        true
    }

    pub fn reset(&mut self) {
        *self = Self {
            epoch: self.epoch + 1,
            ..Self::default()
        };
        log::debug!("session reset");
    }
}

/// Shared handle to the single [`QuizSession`] of the application.
///
/// Every component mutates state through [`SessionHandle::update`]; the
/// change listener runs after the borrow is released. Never hold the
/// session across an `.await`.
#[derive(Clone, Default)]
pub struct SessionHandle {
    state: Rc<RefCell<QuizSession>>,
    listener: Rc<RefCell<Option<Rc<dyn Fn()>>>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read<R>(&self, f: impl FnOnce(&QuizSession) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut QuizSession) -> R) -> R {
        let result = f(&mut self.state.borrow_mut());

        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }

        result
    }

    pub fn snapshot(&self) -> QuizSession {
        self.state.borrow().clone()
    }

    /// Replaces the change listener.
    pub fn on_change(&self, listener: impl Fn() + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }
}
