//! Typed request payloads for course creation and partial updates.
//!
//! Payloads arrive as loose JSON; every field is checked for type and range
//! here so the catalog only ever sees well-formed values.

use crate::{CatalogError, Course, CourseId, Result};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub image_path: Option<String>,
    pub on_discount: Option<bool>,
}

/// Fields to overwrite on an existing course. For optional fields the outer
/// `Option` is "key present", the inner one is the JSON `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoursePatch {
    pub id: Option<CourseId>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    pub discount_price: Option<Option<f64>>,
    pub image_path: Option<Option<String>>,
    pub on_discount: Option<Option<bool>>,
}

fn invalid(msg: impl Into<String>) -> CatalogError {
    CatalogError::Validation(msg.into())
}

fn object(value: &Value) -> Result<&Map<String, Value>> {
    value.as_object().ok_or_else(|| invalid("payload must be a JSON object"))
}

fn text(obj: &Map<String, Value>, key: &str) -> Result<Option<Option<String>>> {
    match obj.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(s)) => Ok(Some(Some(s.clone()))),
        Some(_) => Err(invalid(format!("{key} must be text"))),
    }
}

fn amount(obj: &Map<String, Value>, key: &str) -> Result<Option<Option<f64>>> {
    match obj.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) if v.is_finite() && v >= 0.0 => Ok(Some(Some(v))),
            _ => Err(invalid(format!("{key} must be a non-negative number"))),
        },
        Some(_) => Err(invalid(format!("{key} must be a number"))),
    }
}

fn flag(obj: &Map<String, Value>, key: &str) -> Result<Option<Option<bool>>> {
    match obj.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::Bool(b)) => Ok(Some(Some(*b))),
        Some(_) => Err(invalid(format!("{key} must be a boolean"))),
    }
}

fn payload_id(obj: &Map<String, Value>) -> Result<Option<CourseId>> {
    match obj.get("id") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| CourseId::try_from(v).ok())
            .filter(|v| *v > 0)
            .map(Some)
            .ok_or_else(|| invalid("id must be a positive integer")),
        Some(_) => Err(invalid("id must be a positive integer")),
    }
}

fn title(obj: &Map<String, Value>) -> Result<Option<String>> {
    match text(obj, "title")? {
        None => Ok(None),
        Some(Some(t)) if !t.trim().is_empty() => Ok(Some(t)),
        Some(_) => Err(invalid("title must be non-empty text")),
    }
}

fn price(obj: &Map<String, Value>) -> Result<Option<f64>> {
    match amount(obj, "price")? {
        None => Ok(None),
        Some(Some(p)) => Ok(Some(p)),
        Some(None) => Err(invalid("price must not be null")),
    }
}

impl NewCourse {
    /// `id` and timestamps in the payload are ignored; they are assigned on insert.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = object(value)?;
        Ok(Self {
            title: title(obj)?.ok_or_else(|| invalid("title is required"))?,
            description: text(obj, "description")?.flatten(),
            price: price(obj)?.ok_or_else(|| invalid("price is required"))?,
            discount_price: amount(obj, "discount_price")?.flatten(),
            image_path: text(obj, "image_path")?.flatten(),
            on_discount: flag(obj, "on_discount")?.flatten(),
        })
    }

    pub fn into_course(self, id: CourseId, now: &str) -> Course {
        Course {
            id,
            title: self.title,
            description: self.description,
            price: self.price,
            discount_price: self.discount_price,
            image_path: self.image_path,
            on_discount: self.on_discount,
            date_created: now.to_string(),
            date_updated: now.to_string(),
        }
    }
}

impl CoursePatch {
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = object(value)?;
        Ok(Self {
            id: payload_id(obj)?,
            title: title(obj)?,
            description: text(obj, "description")?,
            price: price(obj)?,
            discount_price: amount(obj, "discount_price")?,
            image_path: text(obj, "image_path")?,
            on_discount: flag(obj, "on_discount")?,
        })
    }

    /// Overwrite the provided fields. Does not touch id or timestamps.
    pub fn apply(self, course: &mut Course) {
        if let Some(title) = self.title { course.title = title; }
        if let Some(description) = self.description { course.description = description; }
        if let Some(price) = self.price { course.price = price; }
        if let Some(discount_price) = self.discount_price { course.discount_price = discount_price; }
        if let Some(image_path) = self.image_path { course.image_path = image_path; }
        if let Some(on_discount) = self.on_discount { course.on_discount = on_discount; }
    }
}

/// Range checks for records loaded from a dataset file.
pub fn check_course(course: &Course) -> Result<()> {
    if course.id == 0 {
        return Err(invalid("id must be a positive integer"));
    }
    if course.title.trim().is_empty() {
        return Err(invalid(format!("course {}: title must be non-empty text", course.id)));
    }
    if !(course.price.is_finite() && course.price >= 0.0) {
        return Err(invalid(format!("course {}: price must be a non-negative number", course.id)));
    }
    if let Some(d) = course.discount_price {
        if !(d.is_finite() && d >= 0.0) {
            return Err(invalid(format!("course {}: discount_price must be a non-negative number", course.id)));
        }
    }
    Ok(())
}
