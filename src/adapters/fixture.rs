use crate::domain::model::{Comment, Post, User};
use crate::domain::ports::PostSource;
use crate::utils::error::{Result, ViewerError};
use crate::utils::validation::require_id;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Answers post-source queries from data loaded up front, e.g. a JSON dump of
/// the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixturePostSource {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    posts: Vec<Post>,
    #[serde(default)]
    comments: Vec<Comment>,
}

impl FixturePostSource {
    pub fn new(users: Vec<User>, posts: Vec<Post>, comments: Vec<Comment>) -> Self {
        Self {
            users,
            posts,
            comments,
        }
    }

    /// Loads `{"users": [...], "posts": [...], "comments": [...]}`; missing
    /// keys mean empty lists.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }
}

#[async_trait]
impl PostSource for FixturePostSource {
    async fn users(&self) -> Result<Vec<User>> {
        Ok(self.users.clone())
    }

    async fn user_posts(&self, user_id: u64) -> Result<Vec<Post>> {
        let user_id = require_id("user_id", user_id)?;
        Ok(self
            .posts
            .iter()
            .filter(|post| post.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn user(&self, user_id: u64) -> Result<User> {
        let user_id = require_id("user_id", user_id)?;
        self.users
            .iter()
            .find(|user| user.id == user_id)
            .cloned()
            .ok_or_else(|| ViewerError::NotFound {
                resource: format!("users/{}", user_id),
            })
    }

    async fn post_comments(&self, post_id: u64) -> Result<Vec<Comment>> {
        let post_id = require_id("post_id", post_id)?;
        Ok(self
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect())
    }
}
