use crate::models::post::Post;

/// Overwrite for the two viewer-derived fields of a single post. Applied
/// only inside the optimistic window; the next reconciliation replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikePatch {
    pub has_liked: bool,
    pub like_count: usize,
}

/// The in-memory working set, ordered newest-first. Created empty, filled
/// by reconciliation, and swapped wholesale on every fetch.
#[derive(Debug, Default)]
pub struct FeedStore {
    posts: Vec<Post>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap the entire working set. Old and new posts never mix.
    pub fn replace_all(&mut self, posts: Vec<Post>) {
        self.posts = posts;
    }

    pub fn get(&self, post_id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    /// Patch the derived fields of one post, leaving every other post and
    /// every non-derived field untouched. Returns false when the post is
    /// not in the working set.
    pub fn apply_patch(&mut self, post_id: &str, patch: LikePatch) -> bool {
        match self.posts.iter_mut().find(|p| p.id == post_id) {
            Some(post) => {
                post.has_liked = patch.has_liked;
                post.like_count = patch.like_count;
                true
            }
            None => false,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::post::{annotate, Author, Like, RawPost};

    fn post(id: &str, likes: usize) -> Post {
        let raw = RawPost {
            id: id.to_string(),
            content: format!("post {}", id),
            created_at: String::new(),
            created_by: Author {
                id: "u1".to_string(),
                email: "u1@example.com".to_string(),
                firstname: None,
                lastname: None,
            },
            like: (0..likes)
                .map(|i| Like { id: format!("u{}", i) })
                .collect(),
            comment: vec![],
        };
        annotate(raw, None)
    }

    #[test]
    fn replace_all_swaps_the_whole_set() {
        let mut store = FeedStore::new();
        store.replace_all(vec![post("a", 0), post("b", 1)]);
        store.replace_all(vec![post("c", 2)]);
        assert_eq!(store.posts().len(), 1);
        assert!(store.get("a").is_none());
        assert!(store.get("c").is_some());
    }

    #[test]
    fn get_missing_post_is_none() {
        let store = FeedStore::new();
        assert!(store.is_empty());
        assert!(store.get("nope").is_none());
    }

    #[test]
    fn apply_patch_touches_only_the_target_post() {
        let mut store = FeedStore::new();
        store.replace_all(vec![post("a", 3), post("b", 5)]);

        let patched = store.apply_patch(
            "a",
            LikePatch {
                has_liked: true,
                like_count: 4,
            },
        );
        assert!(patched);

        let a = store.get("a").unwrap();
        assert!(a.has_liked);
        assert_eq!(a.like_count, 4);
        assert_eq!(a.content, "post a");

        let b = store.get("b").unwrap();
        assert!(!b.has_liked);
        assert_eq!(b.like_count, 5);
    }

    #[test]
    fn apply_patch_on_missing_post_is_a_noop() {
        let mut store = FeedStore::new();
        store.replace_all(vec![post("a", 0)]);
        assert!(!store.apply_patch(
            "zzz",
            LikePatch {
                has_liked: true,
                like_count: 1,
            }
        ));
        assert!(!store.get("a").unwrap().has_liked);
    }
}
