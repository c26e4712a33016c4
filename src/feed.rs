use crate::query::ListVars;
use crate::types::{FetchState, PostList, PostsPage};

/// Append an incoming page to what has been fetched so far.
///
/// Items are concatenated in order with no overlap check, and the total count
/// follows the latest server value. A response without a payload leaves the
/// previous list untouched.
pub fn merge_page(previous: PostList, incoming: Option<PostsPage>) -> PostList {
    let Some(page) = incoming else {
        return previous;
    };

    let mut posts = previous.posts;
    posts.extend(page.posts);
    PostList {
        posts,
        total_count: page.total_count,
    }
}

/// Pagination state for the post list screen
#[derive(Debug, Clone)]
pub struct ListController {
    page_size: u32,
    state: FetchState<PostList>,
    fetching_more: bool,
}

impl ListController {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            state: FetchState::Loading,
            fetching_more: false,
        }
    }

    pub fn state(&self) -> &FetchState<PostList> {
        &self.state
    }

    pub fn is_fetching_more(&self) -> bool {
        self.fetching_more
    }

    pub fn initial_vars(&self) -> ListVars {
        ListVars {
            skip: 0,
            first: self.page_size,
        }
    }

    pub fn are_more_posts(&self) -> bool {
        self.state.ready().is_some_and(PostList::are_more_posts)
    }

    pub fn finish_initial(&mut self, page: Option<PostsPage>) {
        self.fetching_more = false;
        self.state = match page {
            Some(page) => FetchState::Ready(page.into()),
            None => FetchState::Error("empty response".to_string()),
        };
    }

    /// Start a follow-up fetch. Returns the variables to send, or None when
    /// there is nothing to load or a follow-up is already outstanding.
    pub fn load_more(&mut self) -> Option<ListVars> {
        if self.fetching_more || !self.are_more_posts() {
            return None;
        }

        let loaded = self.state.ready()?.loaded_count();
        self.fetching_more = true;
        Some(ListVars {
            skip: loaded as u32,
            first: self.page_size,
        })
    }

    pub fn finish_more(&mut self, page: Option<PostsPage>) {
        self.fetching_more = false;
        if let FetchState::Ready(list) = &mut self.state {
            let previous = std::mem::take(list);
            *list = merge_page(previous, page);
        }
    }

    pub fn fail(&mut self, reason: String) {
        self.fetching_more = false;
        self.state = FetchState::Error(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PostPreview;

    fn page(range: std::ops::Range<u32>, total: u64) -> PostsPage {
        PostsPage {
            posts: range
                .map(|i| PostPreview {
                    slug: format!("post-{}", i),
                    title: format!("Post {}", i),
                    cover_image: None,
                })
                .collect(),
            total_count: total,
        }
    }

    fn slugs(controller: &ListController) -> Vec<String> {
        controller
            .state()
            .ready()
            .unwrap()
            .posts
            .iter()
            .map(|p| p.slug.clone())
            .collect()
    }

    #[test]
    fn starts_loading_with_first_page_vars() {
        let controller = ListController::new(4);
        assert!(controller.state().is_loading());
        assert_eq!(controller.initial_vars(), ListVars { skip: 0, first: 4 });
    }

    #[test]
    fn paginates_to_the_server_total() {
        let mut controller = ListController::new(4);
        controller.finish_initial(Some(page(0..4, 10)));
        assert!(controller.are_more_posts());

        let vars = controller.load_more().unwrap();
        assert_eq!(vars, ListVars { skip: 4, first: 4 });
        controller.finish_more(Some(page(4..8, 10)));
        assert_eq!(slugs(&controller).len(), 8);
        assert!(controller.are_more_posts());

        let vars = controller.load_more().unwrap();
        assert_eq!(vars, ListVars { skip: 8, first: 4 });
        controller.finish_more(Some(page(8..10, 10)));
        assert_eq!(slugs(&controller).len(), 10);
        assert!(!controller.are_more_posts());
        assert_eq!(controller.load_more(), None);
    }

    #[test]
    fn merge_preserves_order_and_appends() {
        let mut controller = ListController::new(2);
        controller.finish_initial(Some(page(0..2, 4)));
        controller.load_more();
        controller.finish_more(Some(page(2..4, 4)));
        assert_eq!(slugs(&controller), ["post-0", "post-1", "post-2", "post-3"]);
    }

    #[test]
    fn merge_does_not_dedupe() {
        let previous = PostList::from(page(0..2, 5));
        let merged = merge_page(previous, Some(page(1..3, 5)));
        let merged: Vec<_> = merged.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(merged, ["post-0", "post-1", "post-1", "post-2"]);
    }

    #[test]
    fn total_count_follows_latest_response() {
        let mut controller = ListController::new(2);
        controller.finish_initial(Some(page(0..2, 3)));
        controller.load_more();
        controller.finish_more(Some(page(2..4, 6)));
        assert_eq!(controller.state().ready().unwrap().total_count, 6);
        assert!(controller.are_more_posts());
    }

    #[test]
    fn missing_payload_keeps_previous_result() {
        let mut controller = ListController::new(4);
        controller.finish_initial(Some(page(0..4, 10)));
        controller.load_more();
        controller.finish_more(None);
        assert_eq!(slugs(&controller).len(), 4);
        assert!(!controller.is_fetching_more());
        assert!(controller.load_more().is_some());
    }

    #[test]
    fn second_load_more_while_in_flight_is_ignored() {
        let mut controller = ListController::new(4);
        controller.finish_initial(Some(page(0..4, 10)));
        assert!(controller.load_more().is_some());
        assert!(controller.is_fetching_more());
        assert_eq!(controller.load_more(), None);
    }

    #[test]
    fn load_more_before_first_page_is_ignored() {
        let mut controller = ListController::new(4);
        assert_eq!(controller.load_more(), None);
    }

    #[test]
    fn failed_follow_up_replaces_data_with_error() {
        let mut controller = ListController::new(4);
        controller.finish_initial(Some(page(0..4, 10)));
        controller.load_more();
        controller.fail("timeout".to_string());
        assert_eq!(controller.state(), &FetchState::Error("timeout".to_string()));
        assert!(!controller.are_more_posts());
    }

    #[test]
    fn empty_initial_response_is_an_error() {
        let mut controller = ListController::new(4);
        controller.finish_initial(None);
        assert!(matches!(controller.state(), FetchState::Error(_)));
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let controller = ListController::new(0);
        assert_eq!(controller.initial_vars().first, 1);
    }
}
