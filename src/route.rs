use std::fmt;

/// Screen address: `/` for the post list, `/post/{slug}` for a single post
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Post {
        slug: String,
    },
}

impl Route {
    pub fn post(slug: impl Into<String>) -> Self {
        Route::Post { slug: slug.into() }
    }

    /// Parse a path. Returns None for anything that is not a known route.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Some(Route::Home);
        }

        let rest = trimmed.strip_prefix("/post/")?;
        if rest.is_empty() || rest.contains('/') {
            return None;
        }

        let slug = urlencoding::decode(rest).ok()?.into_owned();
        Some(Route::Post { slug })
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Post { slug } => format!("/post/{}", urlencoding::encode(slug)),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
