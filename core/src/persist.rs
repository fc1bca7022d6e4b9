use crate::{Catalog, Course};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read a JSON array of course records.
pub fn load_courses<P: AsRef<Path>>(path: P) -> Result<Vec<Course>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening dataset {}", path.display()))?;
    let courses: Vec<Course> = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing dataset {}", path.display()))?;
    Ok(courses)
}

/// Load a dataset file and build the catalog (store + keyword index) from it.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let courses = load_courses(path)?;
    let catalog = Catalog::from_courses(courses)
        .with_context(|| format!("seeding catalog from {}", path.display()))?;
    tracing::info!(path = %path.display(), courses = catalog.len(), keywords = catalog.keyword_count(), "dataset loaded");
    Ok(catalog)
}
