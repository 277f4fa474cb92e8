//! Pure derived values over questions and answers. Nothing here is stored;
//! every result is recomputed from the current answer sheet.

use std::collections::BTreeSet;

use crate::bank::Question;
use crate::session::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub is_correct: bool,
    pub is_skipped: bool,
    pub is_answered: bool,
}

/// Exact set match between the selection and the question's correct answers.
pub fn evaluate(question: &Question, selected: Option<&BTreeSet<String>>) -> Evaluation {
    let is_skipped = selected.map_or(true, BTreeSet::is_empty);
    let is_correct = selected.is_some_and(|selected| {
        selected.len() == question.correct_answers.len()
            && question
                .correct_answers
                .iter()
                .all(|id| selected.contains(id))
    });

    Evaluation {
        is_correct,
        is_skipped,
        is_answered: !is_skipped,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
}

impl Score {
    /// `total` must be non-zero.
    pub fn new(correct: usize, total: usize) -> Self {
        let percentage = (correct as f64 / total as f64 * 100.0).round() as u32;
        Self {
            correct,
            total,
            percentage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionState {
    Default,
    Selected,
    Correct,
    IncorrectSelected,
    NeutralDimmed,
}

pub fn option_state(mode: Mode, is_correct_option: bool, is_selected: bool) -> OptionState {
    match (mode, is_correct_option, is_selected) {
        (Mode::Review, true, _) => OptionState::Correct,
        (Mode::Review, false, true) => OptionState::IncorrectSelected,
        (Mode::Review, false, false) => OptionState::NeutralDimmed,
        (Mode::Active, _, true) => OptionState::Selected,
        (Mode::Active, _, false) => OptionState::Default,
    }
}

/// Status badge for one question in the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteStatus {
    Unanswered,
    Answered,
    Correct,
    Incorrect,
    Skipped,
}

pub fn palette_status(mode: Mode, evaluation: Evaluation) -> PaletteStatus {
    match mode {
        Mode::Active if evaluation.is_answered => PaletteStatus::Answered,
        Mode::Active => PaletteStatus::Unanswered,
        Mode::Review if evaluation.is_skipped => PaletteStatus::Skipped,
        Mode::Review if evaluation.is_correct => PaletteStatus::Correct,
        Mode::Review => PaletteStatus::Incorrect,
    }
}
