//! Film records as stored inside lists.
//!
//! A film is opaque apart from its `id`; every other field is carried through
//! persistence untouched so whatever the catalog provided comes back out.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Film identifier: a JSON string or number, compared by value.
///
/// Typing is strict: `FilmId::from(1)` and `FilmId::from("1")` are different
/// ids. Numbers compare by numeric value, so a stored `1.0` equals `1`.
/// Text arriving from a UI attribute is matched with
/// [`FilmId::matches_text`], which compares canonical string forms instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilmId {
    Number(serde_json::Number),
    Text(String),
}

impl FilmId {
    /// `true` if this id's canonical string form equals `text`.
    pub fn matches_text(&self, text: &str) -> bool {
        match self {
            FilmId::Number(n) => canonical_number(n) == text,
            FilmId::Text(s) => s == text,
        }
    }
}

fn numbers_equal(a: &serde_json::Number, b: &serde_json::Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    a.as_f64() == b.as_f64()
}

/// Integral values print without a fraction (`1.0` → `"1"`).
fn canonical_number(n: &serde_json::Number) -> String {
    if n.is_f64() {
        // f64 Display drops a zero fraction; serde_json's keeps it.
        n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string())
    } else {
        n.to_string()
    }
}

impl PartialEq for FilmId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FilmId::Number(a), FilmId::Number(b)) => numbers_equal(a, b),
            (FilmId::Text(a), FilmId::Text(b)) => a == b,
            _ => false,
        }
    }
}

// JSON numbers are never NaN.
impl Eq for FilmId {}

impl fmt::Display for FilmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilmId::Number(n) => f.write_str(&canonical_number(n)),
            FilmId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i32> for FilmId {
    fn from(n: i32) -> Self {
        FilmId::Number(n.into())
    }
}

impl From<i64> for FilmId {
    fn from(n: i64) -> Self {
        FilmId::Number(n.into())
    }
}

impl From<u64> for FilmId {
    fn from(n: u64) -> Self {
        FilmId::Number(n.into())
    }
}

impl From<&str> for FilmId {
    fn from(s: &str) -> Self {
        FilmId::Text(s.to_string())
    }
}

impl From<String> for FilmId {
    fn from(s: String) -> Self {
        FilmId::Text(s)
    }
}

/// A film entry. Display fields (`title`, `poster_path`, ...) live in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub id: FilmId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Film {
    pub fn new(id: impl Into<FilmId>) -> Self {
        Self { id: id.into(), fields: Map::new() }
    }

    /// Builder-style helper for attaching a display field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Human-readable label: `title`, then `name`, then the id.
    pub fn label(&self) -> String {
        ["title", "name"]
            .iter()
            .find_map(|k| self.fields.get(*k).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| self.id.to_string())
    }
}
