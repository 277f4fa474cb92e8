use std::rc::Rc;

use crate::bank::{ExamSet, Question, QuestionKind};
use crate::error::SessionError;
use crate::scoring::{self, Evaluation, OptionState, PaletteStatus, Score};
use crate::session::{Mode, SessionState};

/// What the user is asked before a submission goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPrompt {
    Complete { total: usize },
    Incomplete { answered: usize, total: usize },
}

impl SubmitPrompt {
    pub fn message(&self) -> String {
        match self {
            SubmitPrompt::Complete { total } => {
                format!("All {total} questions answered. Submit and see your results?")
            }
            SubmitPrompt::Incomplete { answered, total } => {
                let unanswered = total - answered;
                format!(
                    "You have answered {answered} of {total} questions ({unanswered} unanswered). Submit anyway?"
                )
            }
        }
    }
}

/// Decides whether a submission proceeds. Called synchronously by
/// [`ExamSession::submit`]; returning `false` keeps the session active.
pub trait ConfirmSubmit {
    fn confirm(&mut self, prompt: &SubmitPrompt) -> bool;
}

impl<F> ConfirmSubmit for F
where
    F: FnMut(&SubmitPrompt) -> bool,
{
    fn confirm(&mut self, prompt: &SubmitPrompt) -> bool {
        self(prompt)
    }
}

/// Confirms every submission without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl ConfirmSubmit for AutoConfirm {
    fn confirm(&mut self, _prompt: &SubmitPrompt) -> bool {
        true
    }
}

/// one attempt at one exam set
#[derive(Debug, Clone)]
pub struct ExamSession {
    pub exam: Rc<ExamSet>,
    pub session_state: SessionState,
}

impl ExamSession {
    pub fn start(exam: Rc<ExamSet>) -> Result<Self, SessionError> {
        if exam.questions.is_empty() {
            return Err(SessionError::EmptyExam(exam.id));
        }

        tracing::info!(
            exam = exam.id,
            questions = exam.questions.len(),
            "session started"
        );
        Ok(Self {
            exam,
            session_state: SessionState::default(),
        })
    }

    pub fn mode(&self) -> Mode {
        self.session_state.mode
    }

    pub fn is_active(&self) -> bool {
        self.session_state.mode == Mode::Active
    }

    pub fn is_review(&self) -> bool {
        self.session_state.mode == Mode::Review
    }

    pub fn current_index(&self) -> usize {
        self.session_state.current_index
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.session_state.elapsed_secs
    }

    pub fn question_count(&self) -> usize {
        self.exam.questions.len()
    }

    pub fn current_question(&self) -> &Question {
        &self.exam.questions[self.session_state.current_index]
    }

    pub fn answered_count(&self) -> usize {
        self.session_state.answers.len()
    }

    pub fn is_selected(&self, question_id: u32, option_id: &str) -> bool {
        self.session_state.answers.is_selected(question_id, option_id)
    }

    pub fn select_option(&mut self, question_id: u32, option_id: &str) -> Result<(), SessionError> {
        if self.is_review() {
            return Ok(());
        }

        let question = self
            .exam
            .question_by_id(question_id)
            .ok_or(SessionError::UnknownQuestion(question_id))?;
        if !question.has_option(option_id) {
            return Err(SessionError::UnknownOption {
                question: question_id,
                option: option_id.to_string(),
            });
        }

        match question.kind {
            QuestionKind::Single => self.session_state.answers.replace(question_id, option_id),
            QuestionKind::Multiple => self.session_state.answers.toggle(question_id, option_id),
        }
        Ok(())
    }

    /// Selects the option at `position` (0-based) of the current question.
    pub fn select_current(&mut self, position: usize) -> Result<(), SessionError> {
        let question = self.current_question();
        let question_id = question.id;
        let option_id = match question.options.get(position) {
            Some(option) => option.id.clone(),
            None => {
                return Err(SessionError::UnknownOption {
                    question: question_id,
                    option: format!("#{}", position + 1),
                })
            }
        };
        self.select_option(question_id, &option_id)
    }

    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        let len = self.question_count();
        if index >= len {
            return Err(SessionError::QuestionIndexOutOfRange { index, len });
        }
        self.session_state.current_index = index;
        Ok(())
    }

    /// Returns `false` when already on the last question.
    pub fn next(&mut self) -> bool {
        let target = self.session_state.current_index + 1;
        self.go_to(target).is_ok()
    }

    /// Returns `false` when already on the first question.
    pub fn previous(&mut self) -> bool {
        match self.session_state.current_index.checked_sub(1) {
            Some(target) => self.go_to(target).is_ok(),
            None => false,
        }
    }

    pub fn tick(&mut self) {
        if self.is_active() {
            self.session_state.elapsed_secs += 1;
        }
    }

    pub fn evaluate(&self, question: &Question) -> Evaluation {
        scoring::evaluate(question, self.session_state.answers.get(question.id))
    }

    pub fn evaluate_at(&self, index: usize) -> Option<Evaluation> {
        self.exam.questions.get(index).map(|q| self.evaluate(q))
    }

    pub fn score(&self) -> Score {
        let correct = self
            .exam
            .questions
            .iter()
            .filter(|q| self.evaluate(q).is_correct)
            .count();
        Score::new(correct, self.question_count())
    }

    pub fn option_state(&self, question: &Question, option_id: &str) -> OptionState {
        scoring::option_state(
            self.mode(),
            question.is_correct_option(option_id),
            self.is_selected(question.id, option_id),
        )
    }

    pub fn palette_status(&self, question: &Question) -> PaletteStatus {
        scoring::palette_status(self.mode(), self.evaluate(question))
    }

    pub fn submit_prompt(&self) -> SubmitPrompt {
        let answered = self.answered_count();
        let total = self.question_count();
        if answered < total {
            SubmitPrompt::Incomplete { answered, total }
        } else {
            SubmitPrompt::Complete { total }
        }
    }

    /// Moves to review once `confirm` agrees. Returns whether the session is
    /// now in review.
    pub fn submit<C: ConfirmSubmit + ?Sized>(&mut self, confirm: &mut C) -> bool {
        if self.is_review() {
            return true;
        }

        let prompt = self.submit_prompt();
        if !confirm.confirm(&prompt) {
            tracing::debug!(exam = self.exam.id, ?prompt, "submit declined");
            return false;
        }

        self.session_state.mode = Mode::Review;
        let score = self.score();
        tracing::info!(
            exam = self.exam.id,
            correct = score.correct,
            total = score.total,
            percentage = score.percentage,
            elapsed_secs = self.session_state.elapsed_secs,
            "session submitted"
        );
        true
    }

    /// Submits, then jumps to `index`. The index is checked before anything
    /// changes.
    pub fn review_from<C: ConfirmSubmit + ?Sized>(
        &mut self,
        index: usize,
        confirm: &mut C,
    ) -> Result<bool, SessionError> {
        let len = self.question_count();
        if index >= len {
            return Err(SessionError::QuestionIndexOutOfRange { index, len });
        }
        if !self.submit(confirm) {
            return Ok(false);
        }
        self.go_to(index)?;
        Ok(true)
    }
}
