use std::collections::{BTreeMap, BTreeSet};

/// Selected option ids per question.
///
/// An empty selection is never stored: a question is either absent
/// (unanswered) or maps to a non-empty set, so `len()` is the answered count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    entries: BTreeMap<u32, BTreeSet<String>>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-choice selection: the answer becomes exactly `{option_id}`.
    pub fn replace(&mut self, question_id: u32, option_id: &str) {
        self.entries
            .insert(question_id, BTreeSet::from([option_id.to_string()]));
    }

    /// Multiple-choice selection: flips membership of `option_id`, dropping
    /// the entry once nothing is left selected.
    pub fn toggle(&mut self, question_id: u32, option_id: &str) {
        let selected = self.entries.entry(question_id).or_default();
        if !selected.remove(option_id) {
            selected.insert(option_id.to_string());
        }
        if selected.is_empty() {
            self.entries.remove(&question_id);
        }
    }

    pub fn get(&self, question_id: u32) -> Option<&BTreeSet<String>> {
        self.entries.get(&question_id)
    }

    pub fn is_selected(&self, question_id: u32, option_id: &str) -> bool {
        self.get(question_id)
            .is_some_and(|selected| selected.contains(option_id))
    }

    pub fn is_answered(&self, question_id: u32) -> bool {
        self.entries.contains_key(&question_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &BTreeSet<String>)> {
        self.entries.iter().map(|(id, set)| (*id, set))
    }
}
