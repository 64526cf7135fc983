//! Typed references to stored entities, used by not-found reporting.

use crate::model::comment::CommentId;
use crate::model::post::PostId;
use crate::model::tag::TagId;
use std::fmt::{Display, Formatter};

/// Identifies the entity a lookup or mutation was aimed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    Post(PostId),
    /// Post addressed by exact title.
    PostTitle(String),
    /// Comment addressed within the scope of one post.
    Comment {
        post_id: PostId,
        comment_id: CommentId,
    },
    Tag(TagId),
    TagName(String),
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Post(id) => write!(f, "post {id}"),
            Self::PostTitle(_) => write!(f, "post with the requested title"),
            Self::Comment {
                post_id,
                comment_id,
            } => write!(f, "comment {comment_id} of post {post_id}"),
            Self::Tag(id) => write!(f, "tag {id}"),
            Self::TagName(name) => write!(f, "tag `{name}`"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EntityRef;

    #[test]
    fn display_names_ids_but_never_titles() {
        let cases = [
            (EntityRef::Post(3), "post 3"),
            (
                EntityRef::PostTitle("secret draft".to_string()),
                "post with the requested title",
            ),
            (
                EntityRef::Comment {
                    post_id: 3,
                    comment_id: 9,
                },
                "comment 9 of post 3",
            ),
            (EntityRef::Tag(4), "tag 4"),
            (EntityRef::TagName("rust".to_string()), "tag `rust`"),
        ];

        for (target, expected) in cases {
            assert_eq!(target.to_string(), expected);
        }
    }
}
