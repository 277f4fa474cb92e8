use crate::answers::AnswerSheet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Mode {
    /// Accepting answers, clock running
    #[default]
    Active,
    /// Submitted; answers frozen and correctness shown
    Review,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub timed: bool,
    pub confirm_submit: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timed: true,
            confirm_submit: true,
        }
    }
}

/// Mutable part of an attempt. Owned exclusively by one `ExamSession`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub current_index: usize,
    pub answers: AnswerSheet,
    pub elapsed_secs: u64,
    pub mode: Mode,
}
