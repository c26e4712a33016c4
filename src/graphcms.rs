use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{BlogError, Result};
use crate::query::{
    AllPostsData, GraphqlRequest, GraphqlResponse, ListVars, PostVars, SinglePostData, ALL_POSTS,
    SINGLE_POST,
};
use crate::source::ContentSource;
use crate::types::{Post, PostsPage};

/// GraphQL content API client
pub struct GraphCms {
    client: Client,
    endpoint: String,
}

impl std::fmt::Debug for GraphCms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphCms")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl GraphCms {
    pub fn new(endpoint: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("blogterm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BlogError::Config(e.to_string()))?;

        Ok(Self { client, endpoint })
    }

    async fn execute<V, T>(&self, query: &str, variables: &V) -> Result<Option<T>>
    where
        V: Serialize + Sync,
        T: DeserializeOwned,
    {
        let body = GraphqlRequest { query, variables };
        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(BlogError::Fetch(format!("GraphQL API {}: {}", status, text)));
        }

        let text = response.text().await?;
        decode(&text)
    }
}

/// Unwrap a GraphQL envelope. Any entry in `errors` fails the whole query.
fn decode<T: DeserializeOwned>(body: &str) -> Result<Option<T>> {
    let envelope: GraphqlResponse<T> =
        serde_json::from_str(body).map_err(|e| BlogError::Fetch(e.to_string()))?;

    if !envelope.errors.is_empty() {
        let messages: Vec<&str> = envelope.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(BlogError::Fetch(messages.join("; ")));
    }

    Ok(envelope.data)
}

fn into_post(data: Option<SinglePostData>, slug: &str) -> Result<Post> {
    data.and_then(|d| d.post)
        .ok_or_else(|| BlogError::NotFound(slug.to_string()))
}

#[async_trait]
impl ContentSource for GraphCms {
    fn name(&self) -> &str {
        "GraphCMS"
    }

    async fn list_posts(&self, vars: ListVars) -> Result<Option<PostsPage>> {
        tracing::debug!(skip = vars.skip, first = vars.first, "fetching posts");
        let data: Option<AllPostsData> = self.execute(ALL_POSTS, &vars).await?;
        Ok(data.and_then(AllPostsData::into_page))
    }

    async fn get_post(&self, slug: &str) -> Result<Post> {
        tracing::debug!(slug, "fetching post");
        let vars = PostVars {
            slug: slug.to_string(),
        };
        let data: Option<SinglePostData> = self.execute(SINGLE_POST, &vars).await?;
        into_post(data, slug)
    }
}
