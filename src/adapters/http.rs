use crate::domain::model::{Comment, Post, User};
use crate::domain::ports::{ConfigProvider, PostSource};
use crate::utils::error::{Result, ViewerError};
use crate::utils::validation::require_id;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Post source backed by a JSONPlaceholder-compatible REST API.
#[derive(Debug, Clone)]
pub struct HttpPostSource {
    client: Client,
    base_url: String,
}

impl HttpPostSource {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        // reject garbage early instead of on the first request
        Url::parse(base_url)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str, query: Option<(&str, u64)>) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))?;
        if let Some((key, value)) = query {
            url.query_pairs_mut().append_pair(key, &value.to_string());
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(ViewerError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let target = url.to_string();
        self.get_json(url).await.inspect_err(|e| {
            tracing::error!("Request to {} failed: {}", target, e);
        })
    }
}

#[async_trait]
impl PostSource for HttpPostSource {
    async fn users(&self) -> Result<Vec<User>> {
        let url = self.endpoint("users", None)?;
        self.fetch(url).await
    }

    async fn user_posts(&self, user_id: u64) -> Result<Vec<Post>> {
        let user_id = require_id("user_id", user_id)?;
        let url = self.endpoint("posts", Some(("userId", user_id)))?;
        self.fetch(url).await
    }

    async fn user(&self, user_id: u64) -> Result<User> {
        let user_id = require_id("user_id", user_id)?;
        let url = self.endpoint(&format!("users/{}", user_id), None)?;
        self.fetch(url).await
    }

    async fn post_comments(&self, post_id: u64) -> Result<Vec<Comment>> {
        let post_id = require_id("post_id", post_id)?;
        let url = self.endpoint("comments", Some(("postId", post_id)))?;
        self.fetch(url).await
    }
}
