//! Blog use-case service.
//!
//! # Responsibility
//! - Implement post, comment and tag use-cases over `BlogRepository`.
//! - Validate input before it reaches storage, and before any existence
//!   check: malformed input is `Validation` even for a missing post.
//! - Assemble `Post` aggregates (detail, tags, comment count) for readers,
//!   each from one consistent repository read.
//!
//! # Invariants
//! - A post and its detail are created in one repository call.
//! - Comment access is always scoped to the post id supplied by the caller.
//! - A post/tag pair is linked at most once; re-tagging is a no-op.
//! - Tag names are normalized before lookup or persistence.
//! - Log lines carry ids and outcome only, never titles, bodies or authors.

use crate::model::comment::{Comment, CommentId};
use crate::model::entity::EntityRef;
use crate::model::post::{now_epoch_ms, NewPostDetail, Post, PostId, PostRecord};
use crate::model::tag::{normalize_tag_name, Tag};
use crate::model::validation::{validate_author, validate_comment_body, validate_title};
use crate::repo::{BlogRepository, RepoError};
use crate::service::error::{BlogServiceError, ServiceResult};
use log::{debug, info};

/// Blog service facade over a repository implementation.
pub struct BlogService<R: BlogRepository> {
    repo: R,
}

impl<R: BlogRepository> BlogService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Consumes the service and returns its repository.
    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Lists every post ordered by id ascending.
    ///
    /// The list and every aggregate in it come from one consistent read.
    pub fn get_all_posts(&self) -> ServiceResult<Vec<Post>> {
        let posts = self.repo.read_consistent(|repo| {
            repo.list_posts()?
                .into_iter()
                .map(|record| assemble(repo, record))
                .collect::<ServiceResult<Vec<_>>>()
        })?;
        debug!(
            "event=post_list module=service status=ok count={}",
            posts.len()
        );
        Ok(posts)
    }

    pub fn get_post_by_id(&self, id: PostId) -> ServiceResult<Post> {
        self.repo.read_consistent(|repo| load_post(repo, id))
    }

    /// Finds a post by exact, case-sensitive title.
    ///
    /// When several posts share the title, the one with the lowest id wins.
    pub fn get_post_by_title(&self, title: &str) -> ServiceResult<Post> {
        self.repo.read_consistent(|repo| {
            let record = repo.find_post_by_title(title)?.ok_or_else(|| {
                BlogServiceError::NotFound(EntityRef::PostTitle(title.to_string()))
            })?;
            assemble(repo, record)
        })
    }

    /// Creates a post together with its detail.
    ///
    /// # Errors
    /// - `Validation` for a blank or over-long title, or a blank author.
    /// - `Conflict` when storage reports a uniqueness violation.
    pub fn add_post(&mut self, title: &str, detail: &NewPostDetail) -> ServiceResult<Post> {
        validate_title(title)?;
        validate_author(&detail.created_by)?;

        let (record, detail) =
            self.repo
                .insert_post_with_detail(title, &detail.created_by, now_epoch_ms())?;
        info!(
            "event=post_create module=service status=ok post_id={}",
            record.id
        );
        Ok(Post::from_parts(record, detail, Vec::new(), 0))
    }

    /// Replaces the title; detail, comments and tags are untouched.
    pub fn edit_post(&mut self, id: PostId, new_title: &str) -> ServiceResult<Post> {
        validate_title(new_title)?;
        self.repo.update_post_title(id, new_title)?;
        info!("event=post_edit module=service status=ok post_id={id}");
        self.get_post_by_id(id)
    }

    /// Deletes a post with its detail, comments and tag links. Tags survive.
    pub fn delete_post(&mut self, id: PostId) -> ServiceResult<()> {
        self.repo.delete_post(id)?;
        info!("event=post_delete module=service status=ok post_id={id}");
        Ok(())
    }

    pub fn add_comment(&mut self, post_id: PostId, body: &str) -> ServiceResult<Comment> {
        validate_comment_body(body)?;
        let comment = self.repo.insert_comment(post_id, body)?;
        info!(
            "event=comment_create module=service status=ok post_id={post_id} comment_id={}",
            comment.id
        );
        Ok(comment)
    }

    /// Looks up a comment within the scope of one post.
    pub fn get_comment(&self, post_id: PostId, comment_id: CommentId) -> ServiceResult<Comment> {
        self.repo
            .get_comment(comment_id)?
            .filter(|comment| comment.belongs_to(post_id))
            .ok_or(BlogServiceError::NotFound(EntityRef::Comment {
                post_id,
                comment_id,
            }))
    }

    /// Lists comments of one post ordered by id.
    pub fn list_comments(&self, post_id: PostId) -> ServiceResult<Vec<Comment>> {
        self.require_post(post_id)?;
        Ok(self.repo.list_comments_for_post(post_id)?)
    }

    /// Replaces a comment body.
    ///
    /// Fails with `NotFound` when the post is missing or the comment belongs
    /// to a different post.
    pub fn edit_comment(
        &mut self,
        post_id: PostId,
        comment_id: CommentId,
        new_body: &str,
    ) -> ServiceResult<Comment> {
        validate_comment_body(new_body)?;
        self.require_post(post_id)?;
        self.repo
            .update_comment_body(post_id, comment_id, new_body)?;
        info!(
            "event=comment_edit module=service status=ok post_id={post_id} comment_id={comment_id}"
        );
        self.get_comment(post_id, comment_id)
    }

    pub fn delete_comment(&mut self, post_id: PostId, comment_id: CommentId) -> ServiceResult<()> {
        self.require_post(post_id)?;
        self.repo.delete_comment(post_id, comment_id)?;
        info!(
            "event=comment_delete module=service status=ok post_id={post_id} comment_id={comment_id}"
        );
        Ok(())
    }

    /// Attaches a tag to a post, creating the tag when it does not exist.
    ///
    /// Tagging an already-tagged post succeeds without adding a second link.
    /// Tag creation and linking run as two sequential storage calls.
    pub fn tag_post(&mut self, post_id: PostId, tag_name: &str) -> ServiceResult<Post> {
        let name = normalize_tag_name(tag_name)?;
        self.require_post(post_id)?;

        let tag = match self.repo.find_tag_by_name(&name)? {
            Some(tag) => tag,
            None => {
                let tag = self.repo.insert_tag(&name)?;
                info!(
                    "event=tag_create module=service status=ok tag_id={} source=tag_post",
                    tag.id
                );
                tag
            }
        };

        let already_linked = self
            .repo
            .list_tags_for_post(post_id)?
            .iter()
            .any(|linked| linked.id == tag.id);
        if already_linked {
            debug!(
                "event=post_tag module=service status=noop post_id={post_id} tag_id={}",
                tag.id
            );
        } else {
            self.repo.link_tag(post_id, tag.id)?;
            info!(
                "event=post_tag module=service status=ok post_id={post_id} tag_id={}",
                tag.id
            );
        }

        self.get_post_by_id(post_id)
    }

    /// Detaches a tag from a post. Unknown tags and missing links are not
    /// errors; the tag itself is never deleted.
    pub fn untag_post(&mut self, post_id: PostId, tag_name: &str) -> ServiceResult<Post> {
        let name = normalize_tag_name(tag_name)?;
        self.require_post(post_id)?;

        if let Some(tag) = self.repo.find_tag_by_name(&name)? {
            let removed = self.repo.unlink_tag(post_id, tag.id)?;
            info!(
                "event=post_untag module=service status={} post_id={post_id} tag_id={}",
                if removed { "ok" } else { "noop" },
                tag.id
            );
        }

        self.get_post_by_id(post_id)
    }

    /// Creates a standalone tag.
    ///
    /// # Errors
    /// - `Conflict` when a tag with the same normalized name exists.
    pub fn add_tag(&mut self, name: &str) -> ServiceResult<Tag> {
        let name = normalize_tag_name(name)?;
        let tag = self.repo.insert_tag(&name)?;
        info!(
            "event=tag_create module=service status=ok tag_id={} source=add_tag",
            tag.id
        );
        Ok(tag)
    }

    /// Lists all tags ordered by name.
    pub fn list_tags(&self) -> ServiceResult<Vec<Tag>> {
        Ok(self.repo.list_tags()?)
    }

    /// Deletes a tag and its post links. Posts survive.
    pub fn delete_tag(&mut self, name: &str) -> ServiceResult<()> {
        let name = normalize_tag_name(name)?;
        let tag = self
            .repo
            .find_tag_by_name(&name)?
            .ok_or_else(|| BlogServiceError::NotFound(EntityRef::TagName(name.clone())))?;
        self.repo.delete_tag(tag.id)?;
        info!(
            "event=tag_delete module=service status=ok tag_id={}",
            tag.id
        );
        Ok(())
    }

    /// Lists posts carrying a tag, ordered by id. Unknown tags yield no posts.
    pub fn get_posts_by_tag(&self, name: &str) -> ServiceResult<Vec<Post>> {
        let name = normalize_tag_name(name)?;
        self.repo.read_consistent(|repo| {
            let Some(tag) = repo.find_tag_by_name(&name)? else {
                return Ok(Vec::new());
            };

            repo.list_post_ids_for_tag(tag.id)?
                .into_iter()
                .map(|post_id| load_post(repo, post_id))
                .collect()
        })
    }

    fn require_post(&self, post_id: PostId) -> ServiceResult<()> {
        match self.repo.get_post(post_id)? {
            Some(_) => Ok(()),
            None => Err(BlogServiceError::NotFound(EntityRef::Post(post_id))),
        }
    }
}

fn load_post<R: BlogRepository>(repo: &R, id: PostId) -> ServiceResult<Post> {
    let record = repo
        .get_post(id)?
        .ok_or(BlogServiceError::NotFound(EntityRef::Post(id)))?;
    assemble(repo, record)
}

/// Must run inside `read_consistent`; a missing detail is then corruption.
fn assemble<R: BlogRepository>(repo: &R, record: PostRecord) -> ServiceResult<Post> {
    let detail = repo.get_post_detail(record.id)?.ok_or_else(|| {
        BlogServiceError::Storage(RepoError::InvalidData(format!(
            "post {} has no detail row",
            record.id
        )))
    })?;
    let tags = repo.list_tags_for_post(record.id)?;
    let comment_count = repo.count_comments_for_post(record.id)?;
    Ok(Post::from_parts(record, detail, tags, comment_count))
}
