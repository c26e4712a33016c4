use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Uploaded image asset, resolved to a display URL through the resize service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    pub handle: String,
}

/// Post (summary for list view)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPreview {
    pub slug: String,
    pub title: String,
    pub cover_image: Option<CoverImage>,
}

/// Post (full detail)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub cover_image: Option<CoverImage>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    pub date_and_time: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One response of the list query: a page of previews plus the server's total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostsPage {
    pub posts: Vec<PostPreview>,
    pub total_count: u64,
}

/// Posts fetched so far in this session, in server order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostList {
    pub posts: Vec<PostPreview>,
    pub total_count: u64,
}

impl PostList {
    pub fn loaded_count(&self) -> usize {
        self.posts.len()
    }

    pub fn are_more_posts(&self) -> bool {
        (self.posts.len() as u64) < self.total_count
    }
}

impl From<PostsPage> for PostList {
    fn from(page: PostsPage) -> Self {
        Self {
            posts: page.posts,
            total_count: page.total_count,
        }
    }
}

/// Outcome of the one query a view has in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    Loading,
    Error(String),
    Ready(T),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            FetchState::Ready(value) => Some(value),
            _ => None,
        }
    }
}
