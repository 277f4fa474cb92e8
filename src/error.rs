//! Error types for bank loading and session operations.

use thiserror::Error;

/// Errors raised while loading or validating a question bank.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse question bank {source_name}: {source}")]
    Parse {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("question bank contains no exam sets")]
    EmptyBank,

    #[error("exam set id {0} appears more than once")]
    DuplicateExam(u32),

    #[error("exam set {exam} has no questions")]
    EmptyExam { exam: u32 },

    #[error("exam set {exam}: question id {question} appears more than once")]
    DuplicateQuestion { exam: u32, question: u32 },

    #[error("exam set {exam}, question {question}: option id {option:?} appears more than once")]
    DuplicateOption {
        exam: u32,
        question: u32,
        option: String,
    },

    #[error("exam set {exam}, question {question}: no correct answer given")]
    NoCorrectAnswer { exam: u32, question: u32 },

    #[error("exam set {exam}, question {question}: correct answer {option:?} is not an option")]
    UnknownCorrectAnswer {
        exam: u32,
        question: u32,
        option: String,
    },

    #[error("exam set {exam}, question {question}: single-choice question has {count} correct answers")]
    SingleAnswerCount { exam: u32, question: u32, count: usize },

    #[error("no exam set with id {0}")]
    UnknownExam(u32),
}

/// Caller contract violations detected by [`crate::exam::ExamSession`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("exam {0} has no questions")]
    EmptyExam(u32),

    #[error("question index {index} out of range (exam has {len} questions)")]
    QuestionIndexOutOfRange { index: usize, len: usize },

    #[error("no question with id {0} in this exam")]
    UnknownQuestion(u32),

    #[error("question {question} has no option {option:?}")]
    UnknownOption { question: u32, option: String },
}
