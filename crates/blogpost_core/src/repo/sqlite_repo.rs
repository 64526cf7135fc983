//! SQLite implementation of the blog repository.
//!
//! # Responsibility
//! - Map `BlogRepository` calls onto the migrated blog schema.
//! - Run multi-statement writes inside one immediate transaction.
//! - Run multi-statement reads inside one deferred transaction.
//!
//! # Invariants
//! - Cascades are deleted explicitly inside the owning transaction, so the
//!   result does not depend on `PRAGMA foreign_keys`.
//! - Reads never mask rows that fail conversion; they return
//!   `RepoError::InvalidData`.

use crate::db::migrations::{current_user_version, latest_version};
use crate::model::comment::{Comment, CommentId};
use crate::model::entity::EntityRef;
use crate::model::post::{PostDetail, PostId, PostRecord};
use crate::model::tag::{Tag, TagId};
use crate::repo::{BlogRepository, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

const REQUIRED_TABLES: [&str; 5] = ["post", "post_detail", "post_comment", "tag", "post_tag"];

/// SQLite-backed blog repository over a migrated connection.
pub struct SqliteBlogRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteBlogRepository<'conn> {
    /// Constructs a repository after checking the schema is fully migrated.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BlogRepository for SqliteBlogRepository<'_> {
    fn read_consistent<T, E, F>(&self, read: F) -> Result<T, E>
    where
        Self: Sized,
        E: From<RepoError>,
        F: FnOnce(&Self) -> Result<T, E>,
    {
        // Deferred: the shared lock taken by the first read is held until
        // commit, so no writer can commit in between.
        let tx = self.conn.unchecked_transaction().map_err(RepoError::from)?;
        let value = read(self)?;
        tx.commit().map_err(RepoError::from)?;
        Ok(value)
    }

    fn insert_post_with_detail(
        &mut self,
        title: &str,
        created_by: &str,
        created_on: i64,
    ) -> RepoResult<(PostRecord, PostDetail)> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("INSERT INTO post (title) VALUES (?1);", [title])?;
        let post_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO post_detail (post_id, created_by, created_on)
             VALUES (?1, ?2, ?3);",
            params![post_id, created_by, created_on],
        )?;
        tx.commit()?;

        Ok((
            PostRecord {
                id: post_id,
                title: title.to_string(),
            },
            PostDetail {
                post_id,
                created_by: created_by.to_string(),
                created_on,
            },
        ))
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<PostRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, title FROM post WHERE id = ?1;",
                [id],
                post_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn find_post_by_title(&self, title: &str) -> RepoResult<Option<PostRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, title
                 FROM post
                 WHERE title = ?1
                 ORDER BY id ASC
                 LIMIT 1;",
                [title],
                post_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn list_posts(&self) -> RepoResult<Vec<PostRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title FROM post ORDER BY id ASC;")?;
        let posts = stmt
            .query_map([], post_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    fn update_post_title(&mut self, id: PostId, title: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE post SET title = ?2 WHERE id = ?1;",
            params![id, title],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Post(id)));
        }

        Ok(())
    }

    fn delete_post(&mut self, id: PostId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM post_tag WHERE post_id = ?1;", [id])?;
        tx.execute("DELETE FROM post_comment WHERE post_id = ?1;", [id])?;
        tx.execute("DELETE FROM post_detail WHERE post_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM post WHERE id = ?1;", [id])?;

        if changed == 0 {
            // Dropping `tx` rolls back the dependent deletes.
            return Err(RepoError::NotFound(EntityRef::Post(id)));
        }

        tx.commit()?;
        Ok(())
    }

    fn insert_post_detail(
        &mut self,
        post_id: PostId,
        created_by: &str,
        created_on: i64,
    ) -> RepoResult<PostDetail> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !row_exists(&tx, "post", post_id)? {
            return Err(RepoError::NotFound(EntityRef::Post(post_id)));
        }

        tx.execute(
            "INSERT INTO post_detail (post_id, created_by, created_on)
             VALUES (?1, ?2, ?3);",
            params![post_id, created_by, created_on],
        )?;
        tx.commit()?;

        Ok(PostDetail {
            post_id,
            created_by: created_by.to_string(),
            created_on,
        })
    }

    fn get_post_detail(&self, post_id: PostId) -> RepoResult<Option<PostDetail>> {
        let detail = self
            .conn
            .query_row(
                "SELECT post_id, created_by, created_on
                 FROM post_detail
                 WHERE post_id = ?1;",
                [post_id],
                |row| {
                    Ok(PostDetail {
                        post_id: row.get("post_id")?,
                        created_by: row.get("created_by")?,
                        created_on: row.get("created_on")?,
                    })
                },
            )
            .optional()?;
        Ok(detail)
    }

    fn insert_comment(&mut self, post_id: PostId, body: &str) -> RepoResult<Comment> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !row_exists(&tx, "post", post_id)? {
            return Err(RepoError::NotFound(EntityRef::Post(post_id)));
        }

        tx.execute(
            "INSERT INTO post_comment (post_id, body) VALUES (?1, ?2);",
            params![post_id, body],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Comment {
            id,
            post_id,
            body: body.to_string(),
        })
    }

    fn get_comment(&self, comment_id: CommentId) -> RepoResult<Option<Comment>> {
        let comment = self
            .conn
            .query_row(
                "SELECT id, post_id, body FROM post_comment WHERE id = ?1;",
                [comment_id],
                comment_from_row,
            )
            .optional()?;
        Ok(comment)
    }

    fn update_comment_body(
        &mut self,
        post_id: PostId,
        comment_id: CommentId,
        body: &str,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE post_comment
             SET body = ?3
             WHERE id = ?2
               AND post_id = ?1;",
            params![post_id, comment_id, body],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Comment {
                post_id,
                comment_id,
            }));
        }

        Ok(())
    }

    fn delete_comment(&mut self, post_id: PostId, comment_id: CommentId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM post_comment WHERE id = ?2 AND post_id = ?1;",
            params![post_id, comment_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Comment {
                post_id,
                comment_id,
            }));
        }

        Ok(())
    }

    fn list_comments_for_post(&self, post_id: PostId) -> RepoResult<Vec<Comment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, post_id, body
             FROM post_comment
             WHERE post_id = ?1
             ORDER BY id ASC;",
        )?;
        let comments = stmt
            .query_map([post_id], comment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    fn count_comments_for_post(&self, post_id: PostId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM post_comment WHERE post_id = ?1;",
            [post_id],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative comment count `{count}`")))
    }

    fn insert_tag(&mut self, name: &str) -> RepoResult<Tag> {
        self.conn
            .execute("INSERT INTO tag (name) VALUES (?1);", [name])?;
        Ok(Tag {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    fn find_tag_by_name(&self, name: &str) -> RepoResult<Option<Tag>> {
        let tag = self
            .conn
            .query_row(
                "SELECT id, name FROM tag WHERE name = ?1;",
                [name],
                tag_from_row,
            )
            .optional()?;
        Ok(tag)
    }

    fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM tag ORDER BY name ASC, id ASC;")?;
        let tags = stmt
            .query_map([], tag_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn delete_tag(&mut self, id: TagId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM post_tag WHERE tag_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM tag WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Tag(id)));
        }

        tx.commit()?;
        Ok(())
    }

    fn link_tag(&mut self, post_id: PostId, tag_id: TagId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !row_exists(&tx, "post", post_id)? {
            return Err(RepoError::NotFound(EntityRef::Post(post_id)));
        }
        if !row_exists(&tx, "tag", tag_id)? {
            return Err(RepoError::NotFound(EntityRef::Tag(tag_id)));
        }

        tx.execute(
            "INSERT INTO post_tag (post_id, tag_id) VALUES (?1, ?2);",
            params![post_id, tag_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn unlink_tag(&mut self, post_id: PostId, tag_id: TagId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM post_tag WHERE post_id = ?1 AND tag_id = ?2;",
            params![post_id, tag_id],
        )?;
        Ok(changed > 0)
    }

    fn list_tags_for_post(&self, post_id: PostId) -> RepoResult<Vec<Tag>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name
             FROM post_tag pt
             INNER JOIN tag t ON t.id = pt.tag_id
             WHERE pt.post_id = ?1
             ORDER BY t.name ASC, t.id ASC;",
        )?;
        let tags = stmt
            .query_map([post_id], tag_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn list_post_ids_for_tag(&self, tag_id: TagId) -> RepoResult<Vec<PostId>> {
        let mut stmt = self.conn.prepare(
            "SELECT post_id
             FROM post_tag
             WHERE tag_id = ?1
             ORDER BY post_id ASC;",
        )?;
        let ids = stmt
            .query_map([tag_id], |row| row.get::<_, PostId>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<PostRecord> {
    Ok(PostRecord {
        id: row.get("id")?,
        title: row.get("title")?,
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        post_id: row.get("post_id")?,
        body: row.get("body")?,
    })
}

fn tag_from_row(row: &Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

/// `table` must be a trusted identifier; it is interpolated into SQL.
fn row_exists(conn: &Connection, table: &'static str, id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_user_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Err(RepoError::InvalidData(format!(
                "required table `{table}` is missing"
            )));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
