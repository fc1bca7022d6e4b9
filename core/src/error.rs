use crate::CourseId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Course {0} does not exist")]
    NotFound(CourseId),
    #[error("invalid course data: {0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
