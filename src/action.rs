use crate::route::Route;
use crate::types::{Post, PostsPage};

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    Select,

    // Navigation
    Navigate(Route),

    // Post list. The trailing u64 is the load id the fetch was started under.
    LoadMore,
    PostsLoaded(Option<PostsPage>, u64),
    PostsAppended(Option<PostsPage>, u64),
    PostsFailed(String, u64),

    // Single post. `None` means the slug is unknown.
    PostLoaded(Option<Box<Post>>, u64),
    PostFailed(String, u64),

    // Polish
    OpenInBrowser,
    YankUrl,

    None,
}
