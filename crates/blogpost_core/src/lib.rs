//! Core domain logic for the blog post store.
//! This crate is the single source of truth for post/comment/tag invariants.

pub mod config;
pub mod db;
pub mod dto;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::comment::{Comment, CommentId};
pub use model::entity::EntityRef;
pub use model::post::{NewPostDetail, Post, PostDetail, PostId, PostRecord};
pub use model::tag::{Tag, TagId};
pub use model::validation::{ValidationError, MAX_TITLE_CHARS};
pub use repo::memory_repo::InMemoryBlogRepository;
pub use repo::sqlite_repo::SqliteBlogRepository;
pub use repo::{BlogRepository, RepoError, RepoResult};
pub use service::blog_service::BlogService;
pub use service::error::{BlogServiceError, ErrorKind, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
