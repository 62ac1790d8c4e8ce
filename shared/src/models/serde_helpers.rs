//! Ingestion normalizers for loosely-typed catalog documents
//!
//! The remote catalog is schemaless: a field may arrive as a string, a number,
//! `null`, a single value where a list is expected, or a comma-joined list.
//! Every record field goes through one of these helpers exactly once, at
//! deserialization, so the rest of the crate only ever sees the canonical shape.

use serde::{Deserialize, Deserializer};

/// Any JSON scalar the remote side has been seen to send for a text field
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Str(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Option<Scalar>>),
    One(Scalar),
}

/// Deserialize a text field, treating null as empty and numbers as their decimal text
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Scalar>::deserialize(deserializer)
        .map(|opt| opt.map(Scalar::into_text).unwrap_or_default())
}

/// Deserialize a list of strings from an array, a comma-joined string, or null
///
/// Blank entries are dropped and every entry is trimmed.
pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(match raw {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => split_joined(&value.into_text(), |_| true),
        Some(OneOrMany::Many(values)) => clean(values.into_iter().flatten().map(Scalar::into_text)),
    })
}

/// Deserialize a media field into the canonical ordered URL list
///
/// Accepts a single URL, an array of URLs, or a comma-joined string of URLs.
/// A single string is only split when every piece looks like a URL, since
/// image CDN transformation segments (`w_300,h_200`) contain commas too.
pub fn media_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(match raw {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => split_joined(&value.into_text(), looks_like_url),
        Some(OneOrMany::Many(values)) => clean(values.into_iter().flatten().map(Scalar::into_text)),
    })
}

/// Deserialize an integer that may arrive as a number or numeric string; anything else is 1
pub fn priority<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Scalar>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Scalar::Int(n)) => n,
        Some(Scalar::Float(n)) => n.trunc() as i64,
        Some(Scalar::Str(s)) => s.trim().parse().unwrap_or(default_priority()),
        _ => default_priority(),
    })
}

/// Default display priority for records that do not carry one
pub fn default_priority() -> i64 {
    1
}

fn looks_like_url(piece: &str) -> bool {
    piece.starts_with("http://") || piece.starts_with("https://") || piece.starts_with('/')
}

fn split_joined(value: &str, accept: impl Fn(&str) -> bool) -> Vec<String> {
    if value.contains(',') {
        let pieces: Vec<&str> = value
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if pieces.iter().all(|p| accept(p)) {
            return pieces.into_iter().map(str::to_string).collect();
        }
    }
    clean(std::iter::once(value.to_string()))
}

fn clean(values: impl Iterator<Item = String>) -> Vec<String> {
    values
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
