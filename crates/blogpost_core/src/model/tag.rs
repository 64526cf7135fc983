//! Tag entity and name normalization.
//!
//! # Invariants
//! - Persisted tag names are trimmed, whitespace-collapsed and lowercase.
//! - Two tags never share a name, compared case-insensitively.

use crate::model::validation::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Storage-assigned tag identifier.
pub type TagId = i64;

/// Row of the `tag` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// Normalizes a user-supplied tag name into its persisted form.
///
/// `"  Rust   Lang "` becomes `"rust lang"`.
pub fn normalize_tag_name(name: &str) -> Result<String, ValidationError> {
    let collapsed = WHITESPACE_RE.replace_all(name.trim(), " ");
    if collapsed.is_empty() {
        return Err(ValidationError::EmptyTagName);
    }
    Ok(collapsed.to_lowercase())
}
