//! Field-level validation rules.
//!
//! # Invariants
//! - Validation never mutates or normalizes input; callers pass the exact
//!   value that will be persisted.
//! - Lengths are counted in Unicode scalar values, not bytes.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum post title length, mirroring the `VARCHAR(1024)` column bound.
pub const MAX_TITLE_CHARS: usize = 1024;

/// Input failed a field-level constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
    TitleTooLong { chars: usize, max: usize },
    /// Post detail author is empty or whitespace only.
    EmptyAuthor,
    EmptyCommentBody,
    /// Tag name is empty after normalization.
    EmptyTagName,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "post title must not be blank"),
            Self::TitleTooLong { chars, max } => {
                write!(f, "post title has {chars} chars; at most {max} allowed")
            }
            Self::EmptyAuthor => write!(f, "post author must not be blank"),
            Self::EmptyCommentBody => write!(f, "comment body must not be blank"),
            Self::EmptyTagName => write!(f, "tag name must not be blank"),
        }
    }
}

impl Error for ValidationError {}

/// Checks a post title against the blank and length rules.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    let chars = title.chars().count();
    if chars > MAX_TITLE_CHARS {
        return Err(ValidationError::TitleTooLong {
            chars,
            max: MAX_TITLE_CHARS,
        });
    }

    Ok(())
}

pub fn validate_author(created_by: &str) -> Result<(), ValidationError> {
    if created_by.trim().is_empty() {
        return Err(ValidationError::EmptyAuthor);
    }
    Ok(())
}

pub fn validate_comment_body(body: &str) -> Result<(), ValidationError> {
    if body.trim().is_empty() {
        return Err(ValidationError::EmptyCommentBody);
    }
    Ok(())
}
