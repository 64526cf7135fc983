//! Domain model for the blog store.
//!
//! # Responsibility
//! - Define entity rows and the `Post` aggregate read model.
//! - Own field-level validation shared by every repository implementation.
//!
//! # Invariants
//! - A `Post` is the root aggregate: its `PostDetail` and comments never
//!   outlive it.
//! - Tags have their own lifecycle; only junction rows link them to posts.

pub mod comment;
pub mod entity;
pub mod post;
pub mod tag;
pub mod validation;
