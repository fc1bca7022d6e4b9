use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod error;
pub mod index;
pub mod persist;
pub mod search;
pub mod store;
pub mod tokenizer;
pub mod validate;

pub use catalog::{Catalog, SharedCatalog};
pub use error::{CatalogError, Result};
pub use index::KeywordIndex;
pub use search::{Page, PageMetadata, PageRequest};
pub use store::CourseStore;

pub type CourseId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub discount_price: Option<f64>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub on_discount: Option<bool>,
    /// `YYYY-MM-DD HH:MM:SS`, kept verbatim for seeded records.
    #[serde(default)]
    pub date_created: String,
    #[serde(default)]
    pub date_updated: String,
}
