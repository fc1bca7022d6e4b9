use crate::index::KeywordIndex;
use crate::search::{self, Page, PageRequest};
use crate::store::CourseStore;
use crate::tokenizer::normalize_word;
use crate::validate::{check_course, CoursePatch, NewCourse};
use crate::{CatalogError, Course, CourseId, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use time::macros::format_description;
use time::OffsetDateTime;

/// Store and keyword index behind one lock; writers hold it for the whole
/// store+index update.
pub type SharedCatalog = Arc<RwLock<Catalog>>;

/// Current UTC time in the dataset's `YYYY-MM-DD HH:MM:SS` form.
pub fn timestamp_now() -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    OffsetDateTime::now_utc().format(format).expect("static timestamp format")
}

/// The course store together with its keyword index. Every mutation goes
/// through here so the two never diverge.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    store: CourseStore,
    index: KeywordIndex,
}

impl Catalog {
    pub fn new() -> Self { Self::default() }

    pub fn from_courses<I: IntoIterator<Item = Course>>(courses: I) -> Result<Self> {
        let mut catalog = Self::new();
        for course in courses {
            check_course(&course)?;
            let (id, title) = (course.id, course.title.clone());
            catalog.store.insert(course)?;
            catalog.index.index(id, &title);
        }
        tracing::debug!(courses = catalog.store.len(), keywords = catalog.index.len(), "catalog seeded");
        Ok(catalog)
    }

    pub fn into_shared(self) -> SharedCatalog { Arc::new(RwLock::new(self)) }

    pub fn len(&self) -> usize { self.store.len() }

    pub fn is_empty(&self) -> bool { self.store.is_empty() }

    pub fn keyword_count(&self) -> usize { self.index.len() }

    pub fn index(&self) -> &KeywordIndex { &self.index }

    pub fn courses(&self) -> impl Iterator<Item = &Course> + '_ { self.store.iter() }

    pub fn get(&self, id: CourseId) -> Result<&Course> {
        self.store.get(id).ok_or(CatalogError::NotFound(id))
    }

    /// Ranked search when any word survives normalization, otherwise an
    /// insertion-ordered page of every course.
    pub fn list<S: AsRef<str>>(&self, words: &[S], page: PageRequest) -> Page<&Course> {
        if words.iter().any(|w| normalize_word(w.as_ref()).is_some()) {
            search::search(&self.index, &self.store, words, page)
        } else {
            search::browse(&self.store, page)
        }
    }

    pub fn create(&mut self, new: NewCourse) -> Result<Course> {
        let id = self.store.allocate_id()?;
        let course = new.into_course(id, &timestamp_now());
        self.store.insert(course.clone())?;
        self.index.index(id, &course.title);
        tracing::debug!(id, title = %course.title, "course created");
        Ok(course)
    }

    /// Partial update. Fails without touching anything when the course is
    /// absent or the payload carries a different id.
    pub fn update(&mut self, id: CourseId, patch: CoursePatch) -> Result<Course> {
        if !self.store.contains(id) {
            return Err(CatalogError::NotFound(id));
        }
        if patch.id.is_some_and(|pid| pid != id) {
            return Err(CatalogError::BadRequest("The id does not match the payload".into()));
        }
        let course = self.store.get_mut(id).ok_or(CatalogError::NotFound(id))?;
        let old_title = course.title.clone();
        patch.apply(course);
        course.date_updated = timestamp_now();
        let updated = course.clone();
        if updated.title != old_title {
            self.index.deindex(id, &old_title);
            self.index.index(id, &updated.title);
        }
        tracing::debug!(id, "course updated");
        Ok(updated)
    }

    pub fn delete(&mut self, id: CourseId) -> Result<Course> {
        let course = self.store.remove(id).ok_or(CatalogError::NotFound(id))?;
        self.index.deindex(id, &course.title);
        tracing::debug!(id, "course deleted");
        Ok(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> Catalog {
        let courses = [(1, "Intro to Go"), (2, "Advanced Go Patterns"), (3, "Rust Basics")]
            .into_iter()
            .map(|(id, title)| Course {
                id,
                title: title.to_string(),
                description: None,
                price: 10.0,
                discount_price: None,
                image_path: None,
                on_discount: None,
                date_created: "2020-01-01 00:00:00".into(),
                date_updated: "2020-01-01 00:00:00".into(),
            });
        Catalog::from_courses(courses).unwrap()
    }

    #[test]
    fn timestamp_has_dataset_shape() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
    }

    #[test]
    fn title_change_moves_index_entries() {
        let mut cat = seeded();
        let patch = CoursePatch::from_json(&json!({"title": "Rust Patterns"})).unwrap();
        cat.update(3, patch).unwrap();
        assert!(cat.index().lookup("basics").is_empty());
        assert!(cat.index().lookup("patterns").contains(&3));
        assert!(cat.index().lookup("rust").contains(&3));
    }

    #[test]
    fn update_keeps_creation_time() {
        let mut cat = seeded();
        let updated = cat.update(1, CoursePatch::from_json(&json!({"price": 3})).unwrap()).unwrap();
        assert_eq!(updated.date_created, "2020-01-01 00:00:00");
        assert_ne!(updated.date_updated, "2020-01-01 00:00:00");
        assert_eq!(updated.title, "Intro to Go");
    }

    #[test]
    fn blank_words_fall_back_to_browse() {
        let cat = seeded();
        let page = cat.list(&["", " , "], PageRequest::default());
        assert_eq!(page.metadata.record_count, 3);
    }

    #[test]
    fn seeding_rejects_duplicates() {
        let cat = seeded();
        let dup: Vec<Course> = cat.courses().cloned().chain(cat.get(1).cloned()).collect();
        assert!(Catalog::from_courses(dup).is_err());
    }
}
