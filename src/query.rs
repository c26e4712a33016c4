use serde::{Deserialize, Serialize};

use crate::types::{Post, PostPreview, PostsPage};

/// Paginated list of post previews, newest first, plus the total post count
pub const ALL_POSTS: &str = r#"
query allPosts($first: Int!, $skip: Int!) {
  allPosts(orderBy: dateAndTime_DESC, first: $first, skip: $skip) {
    slug
    title
    coverImage {
      handle
    }
  }
  _allPostsMeta {
    count
  }
}
"#;

/// A single post by slug; `Post` is null when the slug is unknown
pub const SINGLE_POST: &str = r#"
query singlePost($slug: String!) {
  Post(slug: $slug) {
    id
    slug
    title
    coverImage {
      handle
    }
    content
    dateAndTime
  }
}
"#;

/// Pagination cursor sent with [`ALL_POSTS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListVars {
    pub skip: u32,
    pub first: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostVars {
    pub slug: String,
}

/// Request body for a GraphQL POST
#[derive(Debug, Serialize)]
pub struct GraphqlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: &'a V,
}

/// Standard GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AllPostsData {
    #[serde(rename = "allPosts", default)]
    pub all_posts: Option<Vec<PostPreview>>,
    #[serde(rename = "_allPostsMeta", default)]
    pub meta: Option<PostsMeta>,
}

#[derive(Debug, Deserialize)]
pub struct PostsMeta {
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub struct SinglePostData {
    #[serde(rename = "Post", default)]
    pub post: Option<Post>,
}

impl AllPostsData {
    /// `None` when the server sent no incremental payload
    pub fn into_page(self) -> Option<PostsPage> {
        let posts = self.all_posts?;
        let total_count = self.meta.map(|m| m.count).unwrap_or(posts.len() as u64);
        Some(PostsPage { posts, total_count })
    }
}
