//! In-memory reference implementation of the blog repository.
//!
//! # Responsibility
//! - Provide a storage-free `BlogRepository` for tests and embedding.
//! - Emulate the SQLite constraints explicitly: cascades, uniqueness and
//!   never-reused ids.
//!
//! # Invariants
//! - Every write validates all preconditions before mutating any map, so a
//!   failed call leaves no partial state.
//! - Tag names compare ASCII case-insensitively, like `COLLATE NOCASE`.
//!
//! Data is lost when the repository is dropped.

use crate::model::comment::{Comment, CommentId};
use crate::model::entity::EntityRef;
use crate::model::post::{PostDetail, PostId, PostRecord};
use crate::model::tag::{Tag, TagId};
use crate::repo::{BlogRepository, RepoError, RepoResult};
use std::collections::BTreeMap;

/// Row of the `post_tag` junction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PostTagLink {
    post_id: PostId,
    tag_id: TagId,
}

/// Monotonic id allocator mirroring `AUTOINCREMENT`.
#[derive(Debug, Default)]
struct Sequence {
    last: i64,
}

impl Sequence {
    fn next(&mut self) -> i64 {
        self.last += 1;
        self.last
    }
}

/// Blog repository backed by ordered in-process maps.
#[derive(Debug, Default)]
pub struct InMemoryBlogRepository {
    posts: BTreeMap<PostId, PostRecord>,
    details: BTreeMap<PostId, PostDetail>,
    comments: BTreeMap<CommentId, Comment>,
    tags: BTreeMap<TagId, Tag>,
    post_tags: BTreeMap<i64, PostTagLink>,
    post_seq: Sequence,
    comment_seq: Sequence,
    tag_seq: Sequence,
    post_tag_seq: Sequence,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn require_post(&self, id: PostId) -> RepoResult<()> {
        if self.posts.contains_key(&id) {
            Ok(())
        } else {
            Err(RepoError::NotFound(EntityRef::Post(id)))
        }
    }

    fn scoped_comment_mut(
        &mut self,
        post_id: PostId,
        comment_id: CommentId,
    ) -> RepoResult<&mut Comment> {
        self.comments
            .get_mut(&comment_id)
            .filter(|comment| comment.belongs_to(post_id))
            .ok_or(RepoError::NotFound(EntityRef::Comment {
                post_id,
                comment_id,
            }))
    }
}

impl BlogRepository for InMemoryBlogRepository {
    fn insert_post_with_detail(
        &mut self,
        title: &str,
        created_by: &str,
        created_on: i64,
    ) -> RepoResult<(PostRecord, PostDetail)> {
        let id = self.post_seq.next();
        let record = PostRecord {
            id,
            title: title.to_string(),
        };
        let detail = PostDetail {
            post_id: id,
            created_by: created_by.to_string(),
            created_on,
        };
        self.posts.insert(id, record.clone());
        self.details.insert(id, detail.clone());
        Ok((record, detail))
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<PostRecord>> {
        Ok(self.posts.get(&id).cloned())
    }

    fn find_post_by_title(&self, title: &str) -> RepoResult<Option<PostRecord>> {
        Ok(self
            .posts
            .values()
            .find(|record| record.title == title)
            .cloned())
    }

    fn list_posts(&self) -> RepoResult<Vec<PostRecord>> {
        Ok(self.posts.values().cloned().collect())
    }

    fn update_post_title(&mut self, id: PostId, title: &str) -> RepoResult<()> {
        let record = self
            .posts
            .get_mut(&id)
            .ok_or(RepoError::NotFound(EntityRef::Post(id)))?;
        record.title = title.to_string();
        Ok(())
    }

    fn delete_post(&mut self, id: PostId) -> RepoResult<()> {
        if self.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound(EntityRef::Post(id)));
        }
        self.details.remove(&id);
        self.comments.retain(|_, comment| !comment.belongs_to(id));
        self.post_tags.retain(|_, link| link.post_id != id);
        Ok(())
    }

    fn insert_post_detail(
        &mut self,
        post_id: PostId,
        created_by: &str,
        created_on: i64,
    ) -> RepoResult<PostDetail> {
        self.require_post(post_id)?;
        if self.details.contains_key(&post_id) {
            return Err(RepoError::Conflict(format!(
                "post {post_id} already has a detail row"
            )));
        }

        let detail = PostDetail {
            post_id,
            created_by: created_by.to_string(),
            created_on,
        };
        self.details.insert(post_id, detail.clone());
        Ok(detail)
    }

    fn get_post_detail(&self, post_id: PostId) -> RepoResult<Option<PostDetail>> {
        Ok(self.details.get(&post_id).cloned())
    }

    fn insert_comment(&mut self, post_id: PostId, body: &str) -> RepoResult<Comment> {
        self.require_post(post_id)?;
        let comment = Comment {
            id: self.comment_seq.next(),
            post_id,
            body: body.to_string(),
        };
        self.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    fn get_comment(&self, comment_id: CommentId) -> RepoResult<Option<Comment>> {
        Ok(self.comments.get(&comment_id).cloned())
    }

    fn update_comment_body(
        &mut self,
        post_id: PostId,
        comment_id: CommentId,
        body: &str,
    ) -> RepoResult<()> {
        let comment = self.scoped_comment_mut(post_id, comment_id)?;
        comment.body = body.to_string();
        Ok(())
    }

    fn delete_comment(&mut self, post_id: PostId, comment_id: CommentId) -> RepoResult<()> {
        self.scoped_comment_mut(post_id, comment_id)?;
        self.comments.remove(&comment_id);
        Ok(())
    }

    fn list_comments_for_post(&self, post_id: PostId) -> RepoResult<Vec<Comment>> {
        Ok(self
            .comments
            .values()
            .filter(|comment| comment.belongs_to(post_id))
            .cloned()
            .collect())
    }

    fn count_comments_for_post(&self, post_id: PostId) -> RepoResult<u64> {
        let count = self
            .comments
            .values()
            .filter(|comment| comment.belongs_to(post_id))
            .count();
        Ok(count as u64)
    }

    fn insert_tag(&mut self, name: &str) -> RepoResult<Tag> {
        if self.find_tag_by_name(name)?.is_some() {
            return Err(RepoError::Conflict(format!("tag `{name}` already exists")));
        }

        let tag = Tag {
            id: self.tag_seq.next(),
            name: name.to_string(),
        };
        self.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    fn find_tag_by_name(&self, name: &str) -> RepoResult<Option<Tag>> {
        Ok(self
            .tags
            .values()
            .find(|tag| tag.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        let mut tags: Vec<Tag> = self.tags.values().cloned().collect();
        tags.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(tags)
    }

    fn delete_tag(&mut self, id: TagId) -> RepoResult<()> {
        if self.tags.remove(&id).is_none() {
            return Err(RepoError::NotFound(EntityRef::Tag(id)));
        }
        self.post_tags.retain(|_, link| link.tag_id != id);
        Ok(())
    }

    fn link_tag(&mut self, post_id: PostId, tag_id: TagId) -> RepoResult<()> {
        self.require_post(post_id)?;
        if !self.tags.contains_key(&tag_id) {
            return Err(RepoError::NotFound(EntityRef::Tag(tag_id)));
        }

        let link = PostTagLink { post_id, tag_id };
        if self.post_tags.values().any(|existing| *existing == link) {
            return Err(RepoError::Conflict(format!(
                "post {post_id} is already linked to tag {tag_id}"
            )));
        }

        let link_id = self.post_tag_seq.next();
        self.post_tags.insert(link_id, link);
        Ok(())
    }

    fn unlink_tag(&mut self, post_id: PostId, tag_id: TagId) -> RepoResult<bool> {
        let before = self.post_tags.len();
        self.post_tags
            .retain(|_, link| !(link.post_id == post_id && link.tag_id == tag_id));
        Ok(self.post_tags.len() < before)
    }

    fn list_tags_for_post(&self, post_id: PostId) -> RepoResult<Vec<Tag>> {
        let mut tags: Vec<Tag> = self
            .post_tags
            .values()
            .filter(|link| link.post_id == post_id)
            .filter_map(|link| self.tags.get(&link.tag_id).cloned())
            .collect();
        tags.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(tags)
    }

    fn list_post_ids_for_tag(&self, tag_id: TagId) -> RepoResult<Vec<PostId>> {
        let mut ids: Vec<PostId> = self
            .post_tags
            .values()
            .filter(|link| link.tag_id == tag_id)
            .map(|link| link.post_id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryBlogRepository;
    use crate::model::entity::EntityRef;
    use crate::repo::{BlogRepository, RepoError};

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut repo = InMemoryBlogRepository::new();
        let (first, _) = repo.insert_post_with_detail("one", "alice", 1).unwrap();
        repo.delete_post(first.id).unwrap();
        let (second, _) = repo.insert_post_with_detail("two", "alice", 2).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn delete_post_cascades_to_dependents_but_keeps_tags() {
        let mut repo = InMemoryBlogRepository::new();
        let (post, _) = repo.insert_post_with_detail("one", "alice", 1).unwrap();
        let comment = repo.insert_comment(post.id, "hi").unwrap();
        let tag = repo.insert_tag("go").unwrap();
        repo.link_tag(post.id, tag.id).unwrap();

        repo.delete_post(post.id).unwrap();

        assert!(repo.get_post_detail(post.id).unwrap().is_none());
        assert!(repo.get_comment(comment.id).unwrap().is_none());
        assert!(repo.list_post_ids_for_tag(tag.id).unwrap().is_empty());
        assert_eq!(repo.list_tags().unwrap(), vec![tag]);
    }

    #[test]
    fn duplicate_detail_and_duplicate_link_conflict() {
        let mut repo = InMemoryBlogRepository::new();
        let (post, _) = repo.insert_post_with_detail("one", "alice", 1).unwrap();
        let err = repo.insert_post_detail(post.id, "bob", 2).unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));

        let tag = repo.insert_tag("go").unwrap();
        repo.link_tag(post.id, tag.id).unwrap();
        let err = repo.link_tag(post.id, tag.id).unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
    }

    #[test]
    fn tag_names_collide_case_insensitively() {
        let mut repo = InMemoryBlogRepository::new();
        repo.insert_tag("rust").unwrap();
        let err = repo.insert_tag("RUST").unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
    }

    #[test]
    fn comment_mutations_are_scoped_to_their_post() {
        let mut repo = InMemoryBlogRepository::new();
        let (first, _) = repo.insert_post_with_detail("one", "alice", 1).unwrap();
        let (second, _) = repo.insert_post_with_detail("two", "alice", 1).unwrap();
        let comment = repo.insert_comment(first.id, "hi").unwrap();

        let err = repo
            .update_comment_body(second.id, comment.id, "moved")
            .unwrap_err();
        assert!(matches!(
            err,
            RepoError::NotFound(EntityRef::Comment { post_id, comment_id })
                if post_id == second.id && comment_id == comment.id
        ));
        assert_eq!(repo.get_comment(comment.id).unwrap().unwrap().body, "hi");
    }
}
