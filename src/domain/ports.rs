use crate::domain::model::{Comment, Post, User};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read access to users, their posts and the comments on those posts.
///
/// Every call goes to the backing source; nothing is cached. An identifier of
/// `0` is rejected with `MissingIdentifier` before any lookup happens.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn users(&self) -> Result<Vec<User>>;
    async fn user_posts(&self, user_id: u64) -> Result<Vec<Post>>;
    async fn user(&self, user_id: u64) -> Result<User>;
    async fn post_comments(&self, post_id: u64) -> Result<Vec<Comment>>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn fixtures_path(&self) -> Option<&str>;
    fn output_path(&self) -> Option<&str>;
    fn initial_user(&self) -> Option<&str>;
    fn expanded_posts(&self) -> &[u64];
}
