//! Schedule document: terms of course records.
//!
//! Three wire shapes have been produced upstream over time. All of them are
//! decoded into the same ordered `Document` and encoded back unchanged:
//!
//! ```text
//! Keyed   {"202001": [{course}, ...], "202002": [...]}
//! Nested  [[{course}, ...], [...]]
//! Flat    [{course}, ...]
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use super::instructor::InstructorProfile;
use crate::error::{AppError, Result};

/// Placeholder name for courses with no instructor.
pub const UNKNOWN_INSTRUCTOR: &str = "TBD";

/// Wire shape a document was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Object of term code to course array
    Keyed,
    /// Array of course arrays
    Nested,
    /// Single array of courses
    Flat,
}

/// A scheduling period and its courses, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Term<C> {
    /// Term code for keyed documents, positional index otherwise
    pub key: String,
    pub courses: Vec<C>,
}

/// Ordered collection of terms.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<C> {
    pub layout: Layout,
    pub terms: Vec<Term<C>>,
}

/// Name of the course field holding the instructor.
pub const INSTRUCTOR_FIELD: &str = "instructor";

/// A course record as it arrives from the staging bucket.
///
/// `fields` is the whole record, `instructor` entry included, so numbers
/// keep their exact text and every key keeps its position on the way out.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    /// Instructor name; `None` when the field is absent or null
    pub instructor: Option<String>,
    pub fields: Map<String, Value>,
}

impl Course {
    /// Instructor display name, or the placeholder when absent.
    pub fn instructor_name(&self) -> &str {
        self.instructor.as_deref().unwrap_or(UNKNOWN_INSTRUCTOR)
    }
}

impl Serialize for Course {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// A course record whose instructor has been replaced by a profile.
///
/// The profile is written where the instructor name was, or appended when
/// the record had none.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedCourse {
    pub instructor: InstructorProfile,
    pub fields: Map<String, Value>,
}

impl Serialize for EnrichedCourse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let has_slot = self.fields.contains_key(INSTRUCTOR_FIELD);
        let len = self.fields.len() + usize::from(!has_slot);

        let mut map = serializer.serialize_map(Some(len))?;
        for (key, value) in &self.fields {
            if key == INSTRUCTOR_FIELD {
                map.serialize_entry(key, &self.instructor)?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        if !has_slot {
            map.serialize_entry(INSTRUCTOR_FIELD, &self.instructor)?;
        }
        map.end()
    }
}

impl<C> Document<C> {
    /// Iterate over every course of every term.
    pub fn courses(&self) -> impl Iterator<Item = &C> {
        self.terms.iter().flat_map(|term| term.courses.iter())
    }

    /// Total number of course records.
    pub fn course_count(&self) -> usize {
        self.terms.iter().map(|term| term.courses.len()).sum()
    }

    /// Partition prefix for the output key.
    ///
    /// Only keyed documents have one: the first term code.
    pub fn partition(&self) -> Option<&str> {
        match self.layout {
            Layout::Keyed => self.terms.first().map(|term| term.key.as_str()),
            Layout::Nested | Layout::Flat => None,
        }
    }

    /// Transform every course, keeping terms and course order as they are.
    pub fn map_courses<D>(self, mut f: impl FnMut(C) -> D) -> Document<D> {
        Document {
            layout: self.layout,
            terms: self
                .terms
                .into_iter()
                .map(|term| Term {
                    key: term.key,
                    courses: term.courses.into_iter().map(&mut f).collect(),
                })
                .collect(),
        }
    }
}

impl Document<Course> {
    /// Decode a raw payload.
    ///
    /// Anything that is not JSON or not one of the known layouts is
    /// rejected as [`AppError::MalformedInput`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| AppError::malformed(format!("payload is not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => {
                let terms = map
                    .into_iter()
                    .map(|(key, courses)| {
                        let courses = decode_courses(&key, courses)?;
                        Ok(Term { key, courses })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self {
                    layout: Layout::Keyed,
                    terms,
                })
            }
            Value::Array(items) if items.iter().all(Value::is_array) => {
                let terms = items
                    .into_iter()
                    .enumerate()
                    .map(|(index, courses)| {
                        let key = index.to_string();
                        let courses = decode_courses(&key, courses)?;
                        Ok(Term { key, courses })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self {
                    layout: Layout::Nested,
                    terms,
                })
            }
            Value::Array(items) => {
                let courses = decode_courses("0", Value::Array(items))?;
                Ok(Self {
                    layout: Layout::Flat,
                    terms: vec![Term {
                        key: "0".to_string(),
                        courses,
                    }],
                })
            }
            other => Err(AppError::malformed(format!(
                "expected an object or array at top level, found {}",
                kind(&other)
            ))),
        }
    }
}

impl<C: Serialize> Document<C> {
    /// Encode back into the layout the document was read from.
    pub fn to_value(&self) -> Result<Value> {
        match self.layout {
            Layout::Keyed => {
                let mut map = Map::with_capacity(self.terms.len());
                for term in &self.terms {
                    map.insert(term.key.clone(), serde_json::to_value(&term.courses)?);
                }
                Ok(Value::Object(map))
            }
            Layout::Nested => Ok(Value::Array(
                self.terms
                    .iter()
                    .map(|term| serde_json::to_value(&term.courses))
                    .collect::<std::result::Result<_, _>>()?,
            )),
            Layout::Flat => Ok(Value::Array(
                self.courses()
                    .map(serde_json::to_value)
                    .collect::<std::result::Result<_, _>>()?,
            )),
        }
    }

    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.to_value()?)?)
    }
}

fn decode_courses(term: &str, value: Value) -> Result<Vec<Course>> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(AppError::malformed(format!(
                "term '{term}' is {} instead of a course array",
                kind(&other)
            )));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| decode_course(term, index, item))
        .collect()
}

fn decode_course(term: &str, index: usize, item: Value) -> Result<Course> {
    let fields = match item {
        Value::Object(fields) => fields,
        other => {
            return Err(AppError::malformed(format!(
                "course {index} of term '{term}' is {} instead of an object",
                kind(&other)
            )));
        }
    };

    let instructor = match fields.get(INSTRUCTOR_FIELD) {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) => Some(name.clone()),
        Some(other) => {
            return Err(AppError::malformed(format!(
                "course {index} of term '{term}' has {} as instructor instead of a name",
                kind(other)
            )));
        }
    };

    Ok(Course { instructor, fields })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
