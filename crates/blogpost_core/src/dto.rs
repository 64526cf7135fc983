//! Boundary data-transfer objects.
//!
//! # Responsibility
//! - Define the serialized request/response shapes exposed to callers
//!   outside the core (CLI output, future transport layers).
//! - Map domain aggregates into those shapes explicitly.
//!
//! # Invariants
//! - DTOs are plain data: no behavior beyond mapping.
//! - `created_on` is exposed as UTC epoch milliseconds.

use crate::model::comment::Comment;
use crate::model::post::{NewPostDetail, Post};
use crate::model::tag::Tag;
use serde::{Deserialize, Serialize};

/// Request to create a post with its detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub created_by: String,
}

impl CreatePostRequest {
    /// Splits the request into the service arguments.
    pub fn into_parts(self) -> (String, NewPostDetail) {
        (self.title, NewPostDetail::new(self.created_by))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub created_by: String,
    pub created_on: i64,
    /// Tag names sorted alphabetically.
    pub tags: Vec<String>,
    pub comment_count: u64,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            created_by: post.detail.created_by.clone(),
            created_on: post.detail.created_on,
            tags: post.tags.iter().map(|tag| tag.name.clone()).collect(),
            comment_count: post.comment_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub body: String,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            body: comment.body.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
}

impl From<&Tag> for TagResponse {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
        }
    }
}

/// Maps a slice of domain values into response DTOs.
pub fn map_all<'a, T: 'a, D: From<&'a T>>(items: &'a [T]) -> Vec<D> {
    items.iter().map(D::from).collect()
}
