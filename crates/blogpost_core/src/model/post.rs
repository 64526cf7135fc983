//! Post aggregate and its one-to-one detail.
//!
//! # Responsibility
//! - Define the `post` row shape and the `Post` aggregate read model.
//! - Assemble aggregates from rows loaded by a repository.
//!
//! # Invariants
//! - `id` is assigned by storage and never reused for another post.
//! - Every stored post has exactly one `PostDetail` keyed by the post id.
//! - `created_on` is UTC epoch milliseconds.

use crate::model::tag::Tag;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Storage-assigned post identifier.
pub type PostId = i64;

/// Row of the `post` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub id: PostId,
    pub title: String,
}

/// Row of the `post_detail` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    /// Shared key: both primary key of the detail and foreign key to `post`.
    pub post_id: PostId,
    pub created_by: String,
    pub created_on: i64,
}

/// Caller-supplied detail fields for a new post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPostDetail {
    pub created_by: String,
}

impl NewPostDetail {
    pub fn new(created_by: impl Into<String>) -> Self {
        Self {
            created_by: created_by.into(),
        }
    }
}

/// Aggregate view of one post with its detail, tags and comment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub detail: PostDetail,
    /// Sorted by tag name.
    pub tags: Vec<Tag>,
    pub comment_count: u64,
}

impl Post {
    /// Maps loaded rows into the aggregate view.
    pub fn from_parts(
        record: PostRecord,
        detail: PostDetail,
        mut tags: Vec<Tag>,
        comment_count: u64,
    ) -> Self {
        tags.sort_by(|left, right| left.name.cmp(&right.name));
        Self {
            id: record.id,
            title: record.title,
            detail,
            tags,
            comment_count,
        }
    }

    /// Returns whether a tag with the given normalized name is attached.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name == name)
    }
}

/// Current wall-clock time as UTC epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
