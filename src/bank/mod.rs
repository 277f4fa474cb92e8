use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::{
    collections::{BTreeSet, HashSet},
    fmt, fs,
    path::Path,
    rc::Rc,
};

use crate::error::BankError;
use crate::util::count_noun;

static BANK_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/bank");

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AnswerOption {
    pub id: String,
    pub text: String,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    #[serde(alias = "SINGLE")]
    Single,
    #[serde(alias = "MULTIPLE")]
    Multiple,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub question_text: String,
    #[serde(default)]
    pub code_snippet: Option<String>,
    pub options: Vec<AnswerOption>,
    pub correct_answers: BTreeSet<String>,
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    pub fn has_option(&self, option_id: &str) -> bool {
        self.options.iter().any(|o| o.id == option_id)
    }

    pub fn is_correct_option(&self, option_id: &str) -> bool {
        self.correct_answers.contains(option_id)
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExamSet {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub duration_minutes: u32,
    pub questions: Vec<Question>,
}

impl ExamSet {
    pub fn question_by_id(&self, question_id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    fn validate(&self) -> Result<(), BankError> {
        let exam = self.id;
        if self.questions.is_empty() {
            return Err(BankError::EmptyExam { exam });
        }

        let mut seen_questions = HashSet::new();
        for q in &self.questions {
            if !seen_questions.insert(q.id) {
                return Err(BankError::DuplicateQuestion {
                    exam,
                    question: q.id,
                });
            }

            let mut seen_options = HashSet::new();
            for option in &q.options {
                if !seen_options.insert(option.id.as_str()) {
                    return Err(BankError::DuplicateOption {
                        exam,
                        question: q.id,
                        option: option.id.clone(),
                    });
                }
            }

            if q.correct_answers.is_empty() {
                return Err(BankError::NoCorrectAnswer {
                    exam,
                    question: q.id,
                });
            }
            if let Some(unknown) = q
                .correct_answers
                .iter()
                .find(|id| !seen_options.contains(id.as_str()))
            {
                return Err(BankError::UnknownCorrectAnswer {
                    exam,
                    question: q.id,
                    option: unknown.clone(),
                });
            }
            if q.kind == QuestionKind::Single && q.correct_answers.len() != 1 {
                return Err(BankError::SingleAnswerCount {
                    exam,
                    question: q.id,
                    count: q.correct_answers.len(),
                });
            }
        }

        Ok(())
    }
}

/// One line of `--list` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamSummary {
    pub id: u32,
    pub name: String,
    pub question_count: usize,
    pub duration_minutes: u32,
}

impl fmt::Display for ExamSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>3}  {}  ({}, {} min)",
            self.id,
            self.name,
            count_noun(self.question_count, "question"),
            self.duration_minutes
        )
    }
}

/// Read-only collection of exam sets, validated once at load time.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    sets: Vec<Rc<ExamSet>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BankFile {
    Many(Vec<ExamSet>),
    One(ExamSet),
}

impl QuestionBank {
    /// The bank compiled into the binary.
    pub fn embedded() -> Result<Self, BankError> {
        let mut sets = Vec::new();
        for file in BANK_DIR.files() {
            if file.path().extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let name = file.path().display().to_string();
            let contents = file.contents_utf8().unwrap_or_default();
            sets.extend(parse_bank(&name, contents)?);
        }
        Self::new(sets)
    }

    /// Loads a bank from a JSON file holding one exam set or an array of them.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BankError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        Self::new(parse_bank(&path.display().to_string(), &contents)?)
    }

    pub fn new(mut sets: Vec<ExamSet>) -> Result<Self, BankError> {
        if sets.is_empty() {
            return Err(BankError::EmptyBank);
        }
        sets.sort_by_key(|s| s.id);

        let mut ids = HashSet::new();
        for set in &sets {
            if !ids.insert(set.id) {
                return Err(BankError::DuplicateExam(set.id));
            }
            set.validate()?;
        }

        tracing::debug!(sets = sets.len(), "question bank loaded");
        Ok(Self {
            sets: sets.into_iter().map(Rc::new).collect(),
        })
    }

    pub fn sets(&self) -> &[Rc<ExamSet>] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn get(&self, exam_id: u32) -> Result<Rc<ExamSet>, BankError> {
        self.sets
            .iter()
            .find(|s| s.id == exam_id)
            .cloned()
            .ok_or(BankError::UnknownExam(exam_id))
    }

    pub fn position(&self, exam_id: u32) -> Option<usize> {
        self.sets.iter().position(|s| s.id == exam_id)
    }

    pub fn summaries(&self) -> Vec<ExamSummary> {
        self.sets
            .iter()
            .map(|s| ExamSummary {
                id: s.id,
                name: s.name.clone(),
                question_count: s.questions.len(),
                duration_minutes: s.duration_minutes,
            })
            .collect()
    }
}

fn parse_bank(source_name: &str, contents: &str) -> Result<Vec<ExamSet>, BankError> {
    let parsed: BankFile = serde_json::from_str(contents).map_err(|source| BankError::Parse {
        source_name: source_name.to_string(),
        source,
    })?;

    Ok(match parsed {
        BankFile::Many(sets) => sets,
        BankFile::One(set) => vec![set],
    })
}
