use async_trait::async_trait;

use crate::error::Result;
use crate::query::ListVars;
use crate::types::{Post, PostsPage};

/// Where posts come from. The app only talks to this trait.
#[async_trait]
pub trait ContentSource: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Fetch one page of previews. `Ok(None)` means the server answered without
    /// a payload.
    async fn list_posts(&self, vars: ListVars) -> Result<Option<PostsPage>>;

    /// Fetch a single post. Unknown slugs yield `BlogError::NotFound`.
    async fn get_post(&self, slug: &str) -> Result<Post>;
}
