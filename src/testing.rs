//! In-memory content source and app builders for unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::app::{App, Settings};
use crate::error::{BlogError, Result};
use crate::media::DEFAULT_BASE_URL;
use crate::query::ListVars;
use crate::route::Route;
use crate::source::ContentSource;
use crate::types::{CoverImage, Post, PostPreview, PostsPage};

/// Serves `total` posts named `post-0..`. The slug `boom` fails like a dead
/// network; any other unknown slug is not found.
#[derive(Debug)]
pub struct FakeSource {
    total: u32,
}

pub fn preview(i: u32) -> PostPreview {
    PostPreview {
        slug: format!("post-{}", i),
        title: format!("Post {}", i),
        cover_image: Some(CoverImage {
            handle: format!("handle-{}", i),
        }),
    }
}

pub fn preview_page(range: std::ops::Range<u32>, total: u64) -> PostsPage {
    PostsPage {
        posts: range.map(preview).collect(),
        total_count: total,
    }
}

pub fn post(slug: &str, content: &str) -> Post {
    Post {
        id: format!("id-{}", slug),
        slug: slug.to_string(),
        title: format!("Title of {}", slug),
        cover_image: Some(CoverImage {
            handle: format!("cover-{}", slug),
        }),
        content: content.to_string(),
        date_and_time: None,
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    fn name(&self) -> &str {
        "Fake"
    }

    async fn list_posts(&self, vars: ListVars) -> Result<Option<PostsPage>> {
        let end = vars.skip.saturating_add(vars.first).min(self.total);
        let start = vars.skip.min(end);
        Ok(Some(preview_page(start..end, self.total as u64)))
    }

    async fn get_post(&self, slug: &str) -> Result<Post> {
        if slug == "boom" {
            return Err(BlogError::Fetch("connection reset".to_string()));
        }
        let known = slug
            .strip_prefix("post-")
            .and_then(|n| n.parse::<u32>().ok())
            .is_some_and(|n| n < self.total);
        if !known {
            return Err(BlogError::NotFound(slug.to_string()));
        }
        Ok(post(slug, "Hello **world**"))
    }
}

pub fn settings(page_size: u32) -> Settings {
    Settings {
        page_size,
        media_base_url: DEFAULT_BASE_URL.to_string(),
        site_url: None,
        allow_raw_html: true,
    }
}

pub fn fake_app(
    total: u32,
    page_size: u32,
    route: Route,
) -> (App, mpsc::UnboundedReceiver<Action>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = App::new(
        Arc::new(FakeSource { total }),
        settings(page_size),
        route,
        tx,
    );
    (app, rx)
}
