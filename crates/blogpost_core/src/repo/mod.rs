//! Repository layer: the persistence boundary of the blog store.
//!
//! # Responsibility
//! - Define the `BlogRepository` contract used by the service layer.
//! - Isolate SQL details from business orchestration.
//!
//! # Invariants
//! - Deletes of posts and tags cascade to dependent rows before returning.
//! - Unique violations (tag name, detail key, post/tag pair) surface as
//!   `RepoError::Conflict`, never silently ignored.
//! - Updates/deletes aimed at missing rows return `RepoError::NotFound`.
//! - Multi-read aggregates go through `read_consistent`, never loose
//!   auto-commit statements.

use crate::db::DbError;
use crate::model::comment::{Comment, CommentId};
use crate::model::entity::EntityRef;
use crate::model::post::{PostDetail, PostId, PostRecord};
use crate::model::tag::{Tag, TagId};
use rusqlite::{ffi, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_repo;
pub mod sqlite_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-boundary error.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap failure.
    Db(DbError),
    /// Target row does not exist.
    NotFound(EntityRef),
    /// Uniqueness or concurrent-modification constraint was violated.
    Conflict(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted data cannot be converted into a valid domain value.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(target) => write!(f, "{target} not found"),
            Self::Conflict(details) => write!(f, "conflict: {details}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "blog repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted blog data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match &value {
            rusqlite::Error::SqliteFailure(failure, message) => {
                let details = message
                    .clone()
                    .unwrap_or_else(|| failure.to_string());
                match failure.code {
                    ErrorCode::ConstraintViolation
                        if matches!(
                            failure.extended_code,
                            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                        ) =>
                    {
                        return Self::Conflict(details);
                    }
                    ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                        return Self::Conflict(format!("concurrent modification: {details}"));
                    }
                    _ => {}
                }
            }
            // Stored value does not fit the column's domain type.
            rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::IntegralValueOutOfRange(..)
            | rusqlite::Error::InvalidColumnType(..) => {
                return Self::InvalidData(value.to_string());
            }
            _ => {}
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for posts, details, comments, tags and the
/// post/tag junction.
///
/// Reads take `&self`; writes take `&mut self` so implementations can open
/// transactions or mutate owned state.
pub trait BlogRepository {
    /// Runs several reads against one consistent view of storage.
    ///
    /// Writers on other connections cannot make rows disappear between the
    /// reads issued by `read`. Calls must not nest.
    fn read_consistent<T, E, F>(&self, read: F) -> Result<T, E>
    where
        Self: Sized,
        E: From<RepoError>,
        F: FnOnce(&Self) -> Result<T, E>,
    {
        read(self)
    }

    /// Inserts a post and its detail in one atomic unit.
    fn insert_post_with_detail(
        &mut self,
        title: &str,
        created_by: &str,
        created_on: i64,
    ) -> RepoResult<(PostRecord, PostDetail)>;
    fn get_post(&self, id: PostId) -> RepoResult<Option<PostRecord>>;
    /// Exact, case-sensitive title match; lowest id wins on duplicates.
    fn find_post_by_title(&self, title: &str) -> RepoResult<Option<PostRecord>>;
    /// All posts ordered by id ascending.
    fn list_posts(&self) -> RepoResult<Vec<PostRecord>>;
    fn update_post_title(&mut self, id: PostId, title: &str) -> RepoResult<()>;
    /// Deletes a post with its detail, comments and junction rows.
    fn delete_post(&mut self, id: PostId) -> RepoResult<()>;

    /// Inserts a detail for an existing post; `Conflict` when one exists.
    fn insert_post_detail(
        &mut self,
        post_id: PostId,
        created_by: &str,
        created_on: i64,
    ) -> RepoResult<PostDetail>;
    fn get_post_detail(&self, post_id: PostId) -> RepoResult<Option<PostDetail>>;

    fn insert_comment(&mut self, post_id: PostId, body: &str) -> RepoResult<Comment>;
    fn get_comment(&self, comment_id: CommentId) -> RepoResult<Option<Comment>>;
    /// Updates a comment only when it belongs to `post_id`.
    fn update_comment_body(
        &mut self,
        post_id: PostId,
        comment_id: CommentId,
        body: &str,
    ) -> RepoResult<()>;
    /// Deletes a comment only when it belongs to `post_id`.
    fn delete_comment(&mut self, post_id: PostId, comment_id: CommentId) -> RepoResult<()>;
    /// Comments of one post ordered by id ascending.
    fn list_comments_for_post(&self, post_id: PostId) -> RepoResult<Vec<Comment>>;
    fn count_comments_for_post(&self, post_id: PostId) -> RepoResult<u64>;

    /// Inserts a tag; `Conflict` when the name exists case-insensitively.
    fn insert_tag(&mut self, name: &str) -> RepoResult<Tag>;
    /// Case-insensitive name lookup.
    fn find_tag_by_name(&self, name: &str) -> RepoResult<Option<Tag>>;
    /// All tags ordered by name.
    fn list_tags(&self) -> RepoResult<Vec<Tag>>;
    /// Deletes a tag with its junction rows.
    fn delete_tag(&mut self, id: TagId) -> RepoResult<()>;

    /// Creates a junction row; `Conflict` when the pair is already linked.
    fn link_tag(&mut self, post_id: PostId, tag_id: TagId) -> RepoResult<()>;
    /// Removes a junction row; returns whether one existed.
    fn unlink_tag(&mut self, post_id: PostId, tag_id: TagId) -> RepoResult<bool>;
    /// Tags linked to one post ordered by name.
    fn list_tags_for_post(&self, post_id: PostId) -> RepoResult<Vec<Tag>>;
    /// Posts linked to one tag ordered by post id.
    fn list_post_ids_for_tag(&self, tag_id: TagId) -> RepoResult<Vec<PostId>>;
}
