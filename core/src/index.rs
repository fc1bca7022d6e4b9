use crate::tokenizer::{normalize_word, tokenize};
use crate::CourseId;
use std::collections::{BTreeSet, HashMap};

static EMPTY: BTreeSet<CourseId> = BTreeSet::new();

/// Inverted index from a normalized title word to the ids of the courses
/// whose current title contains it.
#[derive(Debug, Default, Clone)]
pub struct KeywordIndex {
    entries: HashMap<String, BTreeSet<CourseId>>,
}

impl KeywordIndex {
    pub fn new() -> Self { Self::default() }

    /// Callers must `deindex` the previous title first when re-indexing an id.
    pub fn index(&mut self, id: CourseId, title: &str) {
        for token in tokenize(title) {
            self.entries.entry(token).or_default().insert(id);
        }
    }

    pub fn deindex(&mut self, id: CourseId, title: &str) {
        for token in tokenize(title) {
            if let Some(ids) = self.entries.get_mut(&token) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.entries.remove(&token);
                }
            }
        }
    }

    pub fn lookup(&self, word: &str) -> &BTreeSet<CourseId> {
        normalize_word(word)
            .and_then(|w| self.entries.get(&w))
            .unwrap_or(&EMPTY)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<CourseId>)> {
        self.entries.iter().map(|(w, ids)| (w.as_str(), ids))
    }
}
