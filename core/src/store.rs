use crate::{CatalogError, Course, CourseId, Result};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone)]
struct Slot {
    seq: u64,
    course: Course,
}

/// Courses keyed by id, iterated in insertion order. Owns the id generator:
/// ids are handed out monotonically and never reused after a delete.
#[derive(Debug, Clone)]
pub struct CourseStore {
    slots: HashMap<CourseId, Slot>,
    order: BTreeMap<u64, CourseId>, // insertion sequence -> id
    next_seq: u64,
    next_id: u64, // reaches CourseId::MAX + 1 after seeding the top id
}

impl Default for CourseStore {
    fn default() -> Self {
        Self { slots: HashMap::new(), order: BTreeMap::new(), next_seq: 0, next_id: 1 }
    }
}

impl CourseStore {
    pub fn new() -> Self { Self::default() }

    /// Reserve the next unused id. Fails once the id space is exhausted.
    pub fn allocate_id(&mut self) -> Result<CourseId> {
        let id = CourseId::try_from(self.next_id)
            .map_err(|_| CatalogError::BadRequest("course id space exhausted".into()))?;
        self.next_id += 1;
        Ok(id)
    }

    pub fn insert(&mut self, course: Course) -> Result<()> {
        if course.id == 0 {
            return Err(CatalogError::Validation("course id must be positive".into()));
        }
        if self.slots.contains_key(&course.id) {
            return Err(CatalogError::BadRequest(format!("duplicate course id {}", course.id)));
        }
        self.next_id = self.next_id.max(u64::from(course.id) + 1);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, course.id);
        self.slots.insert(course.id, Slot { seq, course });
        Ok(())
    }

    pub fn get(&self, id: CourseId) -> Option<&Course> {
        self.slots.get(&id).map(|s| &s.course)
    }

    pub fn get_mut(&mut self, id: CourseId) -> Option<&mut Course> {
        self.slots.get_mut(&id).map(|s| &mut s.course)
    }

    pub fn remove(&mut self, id: CourseId) -> Option<Course> {
        let slot = self.slots.remove(&id)?;
        self.order.remove(&slot.seq);
        Some(slot.course)
    }

    pub fn contains(&self, id: CourseId) -> bool { self.slots.contains_key(&id) }

    pub fn len(&self) -> usize { self.slots.len() }

    pub fn is_empty(&self) -> bool { self.slots.is_empty() }

    /// Courses in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Course> + '_ {
        self.order.values().filter_map(move |id| self.get(*id))
    }
}
