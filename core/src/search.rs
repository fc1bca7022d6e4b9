use crate::index::KeywordIndex;
use crate::store::CourseStore;
use crate::tokenizer::normalize_word;
use crate::{CatalogError, Course, CourseId, Result};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A validated 1-based page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: usize,
    size: usize,
}

impl Default for PageRequest {
    fn default() -> Self { Self { number: 1, size: 10 } }
}

impl PageRequest {
    pub fn new(number: i64, size: i64) -> Result<Self> {
        let invalid = || CatalogError::BadRequest("Invalid pagination parameters".into());
        if number <= 0 || size <= 0 {
            return Err(invalid());
        }
        Ok(Self {
            number: usize::try_from(number).map_err(|_| invalid())?,
            size: usize::try_from(size).map_err(|_| invalid())?,
        })
    }

    pub fn number(&self) -> usize { self.number }
    pub fn size(&self) -> usize { self.size }

    fn offset(&self) -> usize { (self.number - 1).saturating_mul(self.size) }

    /// Items `[(number-1)*size, number*size)` of `items`.
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items.into_iter().skip(self.offset()).take(self.size).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub page_count: usize,
    pub page_number: usize,
    pub page_size: usize,
    pub record_count: usize,
}

impl PageMetadata {
    pub fn new(page: PageRequest, record_count: usize) -> Self {
        Self {
            page_count: record_count.div_ceil(page.size),
            page_number: page.number,
            page_size: page.size,
            record_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub metadata: PageMetadata,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool { self.data.is_empty() }
}

impl<T: Clone> Page<&T> {
    pub fn cloned(self) -> Page<T> {
        Page { data: self.data.into_iter().cloned().collect(), metadata: self.metadata }
    }
}

/// Match count per course for the distinct normalized `words`, sorted by
/// descending count then ascending id.
pub fn rank<S: AsRef<str>>(index: &KeywordIndex, words: &[S]) -> Vec<(CourseId, usize)> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut counts: HashMap<CourseId, usize> = HashMap::new();
    for word in words {
        let Some(word) = normalize_word(word.as_ref()) else { continue };
        if !seen.insert(word.clone()) { continue; }
        for &id in index.lookup(&word) {
            *counts.entry(id).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(CourseId, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
}

/// Ranked page of courses whose titles match any of `words`.
pub fn search<'a, S: AsRef<str>>(index: &KeywordIndex, store: &'a CourseStore, words: &[S], page: PageRequest) -> Page<&'a Course> {
    let ranked = rank(index, words);
    let record_count = ranked.len();
    let data = page
        .slice(ranked)
        .into_iter()
        .filter_map(|(id, _)| store.get(id))
        .collect();
    Page { data, metadata: PageMetadata::new(page, record_count) }
}

/// Unfiltered page in insertion order.
pub fn browse(store: &CourseStore, page: PageRequest) -> Page<&Course> {
    Page { data: page.slice(store.iter()), metadata: PageMetadata::new(page, store.len()) }
}
