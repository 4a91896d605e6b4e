use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::utils::{response::FuncError, state::Config, storage::normalize_url};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Like {
    pub user_id: String,
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Comment {
    pub comment_id: String,
    pub user_id: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub content: String,
    pub created_at: f64,
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Post {
    pub post_id: String,
    pub user_id: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub content: String,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    pub created_at: f64,
}

impl Post {
    /// Only the author may delete the post.
    pub fn ensure_author(&self, caller_id: &str) -> Result<(), FuncError> {
        if self.user_id != caller_id {
            return Err(FuncError::NotPostAuthor);
        }
        Ok(())
    }

    /// Rows carry bare avatar keys; expand them to public URLs on the
    /// way out. Never called before a write-back.
    pub fn into_public(mut self, config: &Config) -> Self {
        self.avatar_url = normalize_url(self.avatar_url.take(), config);
        for comment in &mut self.comments {
            comment.avatar_url = normalize_url(comment.avatar_url.take(), config);
        }
        self
    }

    pub fn liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|l| l.user_id == user_id)
    }

    /// Newest likes first. At most one like per user.
    pub fn like(&mut self, user_id: &str) -> Result<(), FuncError> {
        if self.liked_by(user_id) {
            return Err(FuncError::AlreadyLiked);
        }
        self.likes.insert(
            0,
            Like {
                user_id: user_id.to_string(),
            },
        );
        Ok(())
    }

    /// Removes by user identity, never by position.
    pub fn unlike(&mut self, user_id: &str) -> Result<(), FuncError> {
        if !self.liked_by(user_id) {
            return Err(FuncError::NotLiked);
        }
        self.likes.retain(|l| l.user_id != user_id);
        Ok(())
    }

    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.insert(0, comment);
    }

    /// Only the comment's author may remove it. Lookup and removal are
    /// both by comment id, so concurrent inserts cannot shift the target.
    pub fn remove_comment(&mut self, comment_id: &str, caller_id: &str) -> Result<(), FuncError> {
        let comment = self
            .comments
            .iter()
            .find(|c| c.comment_id == comment_id)
            .ok_or(FuncError::CommentNotFound)?;

        if comment.user_id != caller_id {
            return Err(FuncError::NotCommentAuthor);
        }
        self.comments.retain(|c| c.comment_id != comment_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post {
            post_id: "100".to_string(),
            user_id: "1".to_string(),
            display_name: Some("Alice".to_string()),
            avatar_url: None,
            content: "hello".to_string(),
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: 1_700_000_000.0,
        }
    }

    fn comment(comment_id: &str, user_id: &str) -> Comment {
        Comment {
            comment_id: comment_id.to_string(),
            user_id: user_id.to_string(),
            display_name: None,
            avatar_url: None,
            content: "a comment".to_string(),
            created_at: 1_700_000_001.0,
        }
    }

    #[test]
    fn only_the_author_deletes_a_post() {
        let mut p = post();
        p.like("2").unwrap();
        p.add_comment(comment("10", "3"));
        let likes_before = p.likes.clone();
        let comments_before = p.comments.clone();

        assert_eq!(p.ensure_author("2"), Err(FuncError::NotPostAuthor));
        assert_eq!(p.likes, likes_before);
        assert_eq!(p.comments, comments_before);
        assert_eq!(p.content, "hello");

        assert!(p.ensure_author("1").is_ok());
    }

    #[test]
    fn into_public_expands_stored_avatar_keys() {
        let config = Config {
            signature_key: "k".to_string(),
            url: "localhost:8080".to_string(),
            server_id: 0,
            storage_url: "https://storage.postline.app".to_string(),
        };
        let mut p = post();
        p.avatar_url = Some("avatars/1.png".to_string());
        let mut c = comment("10", "2");
        c.avatar_url = Some("avatars/2.png".to_string());
        p.add_comment(c);

        let p = p.into_public(&config);
        assert_eq!(
            p.avatar_url.as_deref(),
            Some("https://storage.postline.app/avatars/1.png")
        );
        assert_eq!(
            p.comments[0].avatar_url.as_deref(),
            Some("https://storage.postline.app/avatars/2.png")
        );
    }

    #[test]
    fn a_user_likes_at_most_once() {
        let mut p = post();
        p.like("2").unwrap();
        assert_eq!(p.like("2"), Err(FuncError::AlreadyLiked));
        assert_eq!(p.likes.len(), 1);
    }

    #[test]
    fn likes_are_newest_first() {
        let mut p = post();
        p.like("2").unwrap();
        p.like("3").unwrap();
        let ids: Vec<&str> = p.likes.iter().map(|l| l.user_id.as_str()).collect();
        assert_eq!(ids, ["3", "2"]);
    }

    #[test]
    fn unlike_restores_prior_state() {
        let mut p = post();
        p.like("2").unwrap();
        let before = p.likes.clone();
        p.like("3").unwrap();
        p.unlike("3").unwrap();
        assert_eq!(p.likes, before);
    }

    #[test]
    fn unlike_without_like_is_refused() {
        let mut p = post();
        assert_eq!(p.unlike("2"), Err(FuncError::NotLiked));
    }

    #[test]
    fn unlike_removes_the_callers_like_only() {
        let mut p = post();
        p.like("2").unwrap();
        p.like("3").unwrap();
        p.like("4").unwrap();
        p.unlike("3").unwrap();
        let ids: Vec<&str> = p.likes.iter().map(|l| l.user_id.as_str()).collect();
        assert_eq!(ids, ["4", "2"]);
    }

    #[test]
    fn comments_are_newest_first() {
        let mut p = post();
        p.add_comment(comment("10", "2"));
        p.add_comment(comment("11", "3"));
        let ids: Vec<&str> = p.comments.iter().map(|c| c.comment_id.as_str()).collect();
        assert_eq!(ids, ["11", "10"]);
    }

    #[test]
    fn only_the_author_removes_a_comment() {
        let mut p = post();
        p.add_comment(comment("10", "2"));
        assert_eq!(
            p.remove_comment("10", "3"),
            Err(FuncError::NotCommentAuthor)
        );
        assert_eq!(p.comments.len(), 1);
        p.remove_comment("10", "2").unwrap();
        assert!(p.comments.is_empty());
    }

    #[test]
    fn removing_a_missing_comment_is_not_found() {
        let mut p = post();
        assert_eq!(
            p.remove_comment("999", "2"),
            Err(FuncError::CommentNotFound)
        );
    }
}
