use crate::query::PostVars;
use crate::types::{FetchState, Post};

/// State for the single post screen. Built once per slug.
#[derive(Debug, Clone)]
pub struct DetailController {
    slug: String,
    state: FetchState<Option<Post>>,
}

impl DetailController {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            state: FetchState::Loading,
        }
    }

    pub fn state(&self) -> &FetchState<Option<Post>> {
        &self.state
    }

    pub fn vars(&self) -> PostVars {
        PostVars {
            slug: self.slug.clone(),
        }
    }

    pub fn post(&self) -> Option<&Post> {
        self.state.ready().and_then(Option::as_ref)
    }

    /// `None` means the server answered but has no post with this slug.
    pub fn finish(&mut self, post: Option<Post>) {
        self.state = FetchState::Ready(post);
    }

    pub fn fail(&mut self, reason: String) {
        self.state = FetchState::Error(reason);
    }
}
