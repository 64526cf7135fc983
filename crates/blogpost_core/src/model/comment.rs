//! Comment entity.

use crate::model::post::PostId;
use serde::{Deserialize, Serialize};

/// Storage-assigned comment identifier.
pub type CommentId = i64;

/// Row of the `post_comment` table. The child side holds the foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub body: String,
}

impl Comment {
    /// Returns whether this comment is addressed by `post_id`.
    pub fn belongs_to(&self, post_id: PostId) -> bool {
        self.post_id == post_id
    }
}
