//! Behavior scenarios shared by every repository backend.
#![allow(dead_code)]

use blogpost_core::model::post::now_epoch_ms;
use blogpost_core::{
    BlogRepository, BlogService, BlogServiceError, EntityRef, ErrorKind, NewPostDetail,
    ValidationError, MAX_TITLE_CHARS,
};

pub fn author() -> NewPostDetail {
    NewPostDetail::new("alice")
}

pub fn add_then_get_returns_title_and_fresh_detail<R: BlogRepository>(
    service: &mut BlogService<R>,
) {
    let before = now_epoch_ms();
    let created = service.add_post("High-Performance Java Persistence", &author()).unwrap();

    let loaded = service.get_post_by_id(created.id).unwrap();
    assert_eq!(loaded.title, "High-Performance Java Persistence");
    assert_eq!(loaded.detail.post_id, created.id);
    assert_eq!(loaded.detail.created_by, "alice");
    assert!(loaded.detail.created_on >= before);
    assert!(loaded.tags.is_empty());
    assert_eq!(loaded.comment_count, 0);
    assert_eq!(loaded, created);
}

pub fn add_post_rejects_invalid_input<R: BlogRepository>(service: &mut BlogService<R>) {
    let err = service.add_post("   ", &author()).unwrap_err();
    assert!(matches!(
        err,
        BlogServiceError::Validation(ValidationError::EmptyTitle)
    ));

    let long_title = "t".repeat(MAX_TITLE_CHARS + 1);
    let err = service.add_post(&long_title, &author()).unwrap_err();
    assert!(matches!(
        err,
        BlogServiceError::Validation(ValidationError::TitleTooLong { .. })
    ));

    let err = service
        .add_post("Valid title", &NewPostDetail::new(""))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert!(service.get_all_posts().unwrap().is_empty());
}

pub fn get_all_posts_orders_by_id_with_aggregate_fields<R: BlogRepository>(
    service: &mut BlogService<R>,
) {
    let first = service.add_post("first", &author()).unwrap();
    let second = service.add_post("second", &NewPostDetail::new("bob")).unwrap();
    service.add_comment(second.id, "one").unwrap();
    service.add_comment(second.id, "two").unwrap();
    service.tag_post(second.id, "rust").unwrap();

    let posts = service.get_all_posts().unwrap();
    let ids: Vec<_> = posts.iter().map(|post| post.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert_eq!(posts[1].comment_count, 2);
    assert_eq!(posts[1].detail.created_by, "bob");
    assert!(posts[1].has_tag("rust"));
    assert!(!posts[0].has_tag("rust"));
}

pub fn get_post_by_title_is_exact_and_case_sensitive<R: BlogRepository>(
    service: &mut BlogService<R>,
) {
    let created = service.add_post("Hello", &author()).unwrap();
    service.add_post("Hello", &author()).unwrap();

    assert_eq!(service.get_post_by_title("Hello").unwrap().id, created.id);

    for lookup in ["hello", "Hello ", "Hell"] {
        let err = service.get_post_by_title(lookup).unwrap_err();
        assert!(matches!(
            err,
            BlogServiceError::NotFound(EntityRef::PostTitle(ref title)) if title == lookup
        ));
    }
}

pub fn edit_post_replaces_title_only<R: BlogRepository>(service: &mut BlogService<R>) {
    let created = service.add_post("Draft", &author()).unwrap();
    service.add_comment(created.id, "first!").unwrap();
    service.tag_post(created.id, "drafts").unwrap();

    let edited = service.edit_post(created.id, "Final").unwrap();
    assert_eq!(edited.id, created.id);
    assert_eq!(edited.title, "Final");
    assert_eq!(edited.detail, created.detail);
    assert_eq!(edited.comment_count, 1);
    assert!(edited.has_tag("drafts"));

    let err = service.edit_post(created.id, "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(service.get_post_by_id(created.id).unwrap().title, "Final");

    let err = service.edit_post(created.id + 100, "Ghost").unwrap_err();
    assert!(matches!(err, BlogServiceError::NotFound(EntityRef::Post(_))));
}

pub fn delete_post_cascades_comments_detail_and_links<R: BlogRepository>(
    service: &mut BlogService<R>,
) {
    let doomed = service.add_post("doomed", &author()).unwrap();
    let survivor = service.add_post("survivor", &author()).unwrap();
    let doomed_comment = service.add_comment(doomed.id, "bye").unwrap();
    let kept_comment = service.add_comment(survivor.id, "stay").unwrap();
    service.tag_post(doomed.id, "go").unwrap();
    service.tag_post(survivor.id, "go").unwrap();

    service.delete_post(doomed.id).unwrap();

    let err = service.get_post_by_id(doomed.id).unwrap_err();
    assert!(matches!(err, BlogServiceError::NotFound(EntityRef::Post(id)) if id == doomed.id));
    assert!(service
        .repository()
        .get_post_detail(doomed.id)
        .unwrap()
        .is_none());
    assert!(service
        .repository()
        .get_comment(doomed_comment.id)
        .unwrap()
        .is_none());
    assert!(service
        .repository()
        .list_tags_for_post(doomed.id)
        .unwrap()
        .is_empty());

    assert_eq!(
        service.get_comment(survivor.id, kept_comment.id).unwrap(),
        kept_comment
    );
    let names: Vec<_> = service
        .list_tags()
        .unwrap()
        .into_iter()
        .map(|tag| tag.name)
        .collect();
    assert_eq!(names, vec!["go".to_string()]);
    let tagged = service.get_posts_by_tag("go").unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].id, survivor.id);

    let err = service.delete_post(doomed.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

pub fn comment_lifecycle_is_scoped_to_post<R: BlogRepository>(service: &mut BlogService<R>) {
    let first = service.add_post("first", &author()).unwrap();
    let second = service.add_post("second", &author()).unwrap();
    let comment = service.add_comment(first.id, "original").unwrap();
    assert_eq!(comment.post_id, first.id);

    let err = service
        .edit_comment(second.id, comment.id, "hijacked")
        .unwrap_err();
    assert!(matches!(
        err,
        BlogServiceError::NotFound(EntityRef::Comment { post_id, comment_id })
            if post_id == second.id && comment_id == comment.id
    ));
    assert_eq!(
        service.get_comment(first.id, comment.id).unwrap().body,
        "original"
    );

    let edited = service.edit_comment(first.id, comment.id, "edited").unwrap();
    assert_eq!(edited.body, "edited");

    let err = service.delete_comment(second.id, comment.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = service.get_comment(second.id, comment.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    service.delete_comment(first.id, comment.id).unwrap();
    assert!(service.list_comments(first.id).unwrap().is_empty());
    let err = service.delete_comment(first.id, comment.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

pub fn comment_operations_require_existing_post<R: BlogRepository>(
    service: &mut BlogService<R>,
) {
    let missing = 404;

    let err = service.add_comment(missing, "hello?").unwrap_err();
    assert!(matches!(err, BlogServiceError::NotFound(EntityRef::Post(id)) if id == missing));
    let err = service.edit_comment(missing, 1, "x").unwrap_err();
    assert!(matches!(err, BlogServiceError::NotFound(EntityRef::Post(id)) if id == missing));
    let err = service.delete_comment(missing, 1).unwrap_err();
    assert!(matches!(err, BlogServiceError::NotFound(EntityRef::Post(id)) if id == missing));
    let err = service.list_comments(missing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let post = service.add_post("real", &author()).unwrap();
    let err = service.add_comment(post.id, "  ").unwrap_err();
    assert!(matches!(
        err,
        BlogServiceError::Validation(ValidationError::EmptyCommentBody)
    ));
}

pub fn input_is_validated_before_post_lookup<R: BlogRepository>(
    service: &mut BlogService<R>,
) {
    let missing = 404;

    let err = service.edit_post(missing, " ").unwrap_err();
    assert!(matches!(err, BlogServiceError::Validation(ValidationError::EmptyTitle)));
    let err = service.add_comment(missing, " ").unwrap_err();
    assert!(matches!(err, BlogServiceError::Validation(ValidationError::EmptyCommentBody)));
    let err = service.edit_comment(missing, 1, " ").unwrap_err();
    assert!(matches!(err, BlogServiceError::Validation(ValidationError::EmptyCommentBody)));
    let err = service.tag_post(missing, " ").unwrap_err();
    assert!(matches!(err, BlogServiceError::Validation(ValidationError::EmptyTagName)));
    let err = service.untag_post(missing, " ").unwrap_err();
    assert!(matches!(err, BlogServiceError::Validation(ValidationError::EmptyTagName)));

    // Valid input then reaches the existence check.
    let err = service.edit_comment(missing, 1, "fine").unwrap_err();
    assert!(matches!(err, BlogServiceError::NotFound(EntityRef::Post(id)) if id == missing));
}

pub fn list_comments_returns_post_comments_in_id_order<R: BlogRepository>(
    service: &mut BlogService<R>,
) {
    let first = service.add_post("first", &author()).unwrap();
    let second = service.add_post("second", &author()).unwrap();
    let a = service.add_comment(first.id, "a").unwrap();
    service.add_comment(second.id, "elsewhere").unwrap();
    let b = service.add_comment(first.id, "b").unwrap();

    assert_eq!(service.list_comments(first.id).unwrap(), vec![a, b]);
    assert_eq!(service.get_post_by_id(first.id).unwrap().comment_count, 2);
}

pub fn tag_post_is_idempotent<R: BlogRepository>(service: &mut BlogService<R>) {
    let post = service.add_post("Tagged", &author()).unwrap();

    service.tag_post(post.id, "go").unwrap();
    let tagged = service.tag_post(post.id, "  GO ").unwrap();

    assert_eq!(tagged.tags.len(), 1);
    assert_eq!(tagged.tags[0].name, "go");
    assert_eq!(service.repository().list_tags_for_post(post.id).unwrap().len(), 1);
    assert_eq!(service.list_tags().unwrap().len(), 1);
}

pub fn tag_post_reuses_existing_tags_and_validates<R: BlogRepository>(
    service: &mut BlogService<R>,
) {
    let existing = service.add_tag("Rust").unwrap();
    assert_eq!(existing.name, "rust");
    let post = service.add_post("Tagged", &author()).unwrap();

    let tagged = service.tag_post(post.id, "rust").unwrap();
    assert_eq!(tagged.tags, vec![existing]);

    let err = service.tag_post(post.id, " ").unwrap_err();
    assert!(matches!(
        err,
        BlogServiceError::Validation(ValidationError::EmptyTagName)
    ));

    let err = service.tag_post(post.id + 100, "rust").unwrap_err();
    assert!(matches!(err, BlogServiceError::NotFound(EntityRef::Post(_))));
}

pub fn untag_post_is_idempotent<R: BlogRepository>(service: &mut BlogService<R>) {
    let post = service.add_post("Tagged", &author()).unwrap();

    let untouched = service.untag_post(post.id, "go").unwrap();
    assert!(untouched.tags.is_empty());

    service.tag_post(post.id, "go").unwrap();
    service.tag_post(post.id, "rust").unwrap();
    let after = service.untag_post(post.id, "go").unwrap();
    let names: Vec<_> = after.tags.iter().map(|tag| tag.name.as_str()).collect();
    assert_eq!(names, vec!["rust"]);

    service.untag_post(post.id, "go").unwrap();
    assert_eq!(service.list_tags().unwrap().len(), 2);

    let err = service.untag_post(post.id + 100, "go").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

pub fn duplicate_tag_names_conflict<R: BlogRepository>(service: &mut BlogService<R>) {
    service.add_tag("go").unwrap();

    let err = service.add_tag("go").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    let err = service.add_tag("GO").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    assert_eq!(service.list_tags().unwrap().len(), 1);
}

pub fn delete_tag_unlinks_posts_but_keeps_them<R: BlogRepository>(
    service: &mut BlogService<R>,
) {
    let post = service.add_post("Tagged", &author()).unwrap();
    service.tag_post(post.id, "go").unwrap();
    service.tag_post(post.id, "rust").unwrap();

    service.delete_tag("Go").unwrap();

    let reloaded = service.get_post_by_id(post.id).unwrap();
    let names: Vec<_> = reloaded.tags.iter().map(|tag| tag.name.as_str()).collect();
    assert_eq!(names, vec!["rust"]);
    assert!(service.get_posts_by_tag("go").unwrap().is_empty());

    let err = service.delete_tag("go").unwrap_err();
    assert!(matches!(
        err,
        BlogServiceError::NotFound(EntityRef::TagName(ref name)) if name == "go"
    ));
}

pub fn get_posts_by_tag_lists_tagged_posts_in_id_order<R: BlogRepository>(
    service: &mut BlogService<R>,
) {
    let first = service.add_post("first", &author()).unwrap();
    let second = service.add_post("second", &author()).unwrap();
    let third = service.add_post("third", &author()).unwrap();
    service.tag_post(third.id, "go").unwrap();
    service.tag_post(first.id, "go").unwrap();
    service.tag_post(second.id, "rust").unwrap();

    let ids: Vec<_> = service
        .get_posts_by_tag("GO")
        .unwrap()
        .into_iter()
        .map(|post| post.id)
        .collect();
    assert_eq!(ids, vec![first.id, third.id]);
    assert!(service.get_posts_by_tag("unknown").unwrap().is_empty());
}

/// Post `Hello` gets id 1, its comment id 1; after deleting the post
/// nothing is left and the comment cannot be looked up.
pub fn example_scenario<R: BlogRepository>(service: &mut BlogService<R>) {
    let post = service.add_post("Hello", &author()).unwrap();
    assert_eq!(post.id, 1);

    let comment = service.add_comment(1, "nice post").unwrap();
    assert_eq!(comment.id, 1);
    assert_eq!(comment.post_id, 1);

    service.delete_post(1).unwrap();

    assert!(service.get_all_posts().unwrap().is_empty());
    let err = service.get_comment(1, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(service.repository().get_comment(1).unwrap().is_none());
}

pub fn duplicate_detail_is_a_conflict<R: BlogRepository>(repo: &mut R) {
    let (post, detail) = repo
        .insert_post_with_detail("Hello", "alice", now_epoch_ms())
        .unwrap();

    let err = repo
        .insert_post_detail(post.id, "mallory", now_epoch_ms())
        .unwrap_err();
    assert_eq!(BlogServiceError::from(err).kind(), ErrorKind::Conflict);

    let err = repo
        .insert_post_detail(post.id + 100, "mallory", now_epoch_ms())
        .unwrap_err();
    assert_eq!(BlogServiceError::from(err).kind(), ErrorKind::NotFound);

    assert_eq!(repo.get_post_detail(post.id).unwrap(), Some(detail));
}
