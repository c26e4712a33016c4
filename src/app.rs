use std::cell::Cell;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::config::Config;
use crate::detail::DetailController;
use crate::error::BlogError;
use crate::event::Event;
use crate::feed::ListController;
use crate::markdown;
use crate::media::{self, HERO};
use crate::query::{ListVars, PostVars};
use crate::route::Route;
use crate::source::ContentSource;

const PAGE_STEP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home, // Paginated post list
    Post, // Single post
}

/// Display settings resolved from config and command line
#[derive(Debug, Clone)]
pub struct Settings {
    pub page_size: u32,
    pub media_base_url: String,
    pub site_url: Option<String>,
    pub allow_raw_html: bool,
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            page_size: config.feed.page_size,
            media_base_url: config.media.base_url.clone(),
            site_url: config.api.site_url.clone(),
            allow_raw_html: config.post.allow_raw_html,
        }
    }
}

pub struct App {
    pub route: Route,
    pub settings: Settings,

    // Post list
    pub feed: ListController,
    pub post_index: usize,

    // Single post
    pub post: Option<DetailController>,
    pub scroll_offset: usize,
    // Inner width of the post body as last drawn, for wrapped scroll bounds
    pub body_width: Cell<u16>,

    pub status: Option<String>,
    pub error: Option<String>,
    pub should_quit: bool,
    // Bumped on every navigation; results tagged with an older id are dropped
    load_id: u64,
    source: Arc<dyn ContentSource>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        source: Arc<dyn ContentSource>,
        settings: Settings,
        route: Route,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        // A post route is loading from the first frame, before Init is handled
        let post = match &route {
            Route::Post { slug } => Some(DetailController::new(slug.as_str())),
            Route::Home => None,
        };

        Self {
            route,
            feed: ListController::new(settings.page_size),
            settings,
            post_index: 0,
            post,
            scroll_offset: 0,
            body_width: Cell::new(0),
            status: None,
            error: None,
            should_quit: false,
            load_id: 0,
            source,
            action_tx,
        }
    }

    pub fn screen(&self) -> Screen {
        match self.route {
            Route::Home => Screen::Home,
            Route::Post { .. } => Screen::Post,
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Cards plus the trailing "Show More" item when it is mounted
    pub fn list_len(&self) -> usize {
        let posts = self.feed.state().ready().map_or(0, |l| l.posts.len());
        posts + usize::from(self.feed.are_more_posts())
    }

    /// Screen rows of the open post body at the last drawn width
    fn body_len(&self) -> usize {
        let Some(post) = self.post.as_ref().and_then(|d| d.post()) else {
            return 0;
        };
        let lines = markdown::render(&post.content, self.settings.allow_raw_html);
        markdown::wrapped_height(lines, self.body_width.get())
    }

    pub fn is_loading(&self) -> bool {
        match self.screen() {
            Screen::Home => self.feed.state().is_loading() || self.feed.is_fetching_more(),
            Screen::Post => self.post.as_ref().is_some_and(|p| p.state().is_loading()),
        }
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::Navigate(self.route.clone()),
            Event::Key(key) => self.handle_key(key),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('d') => Action::PageDown,
                KeyCode::Char('u') => Action::PageUp,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => match self.screen() {
                Screen::Home => Action::Quit,
                Screen::Post => Action::Back,
            },
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Enter => Action::Select,
            KeyCode::Char('m') if self.screen() == Screen::Home => Action::LoadMore,
            KeyCode::Char('o') => Action::OpenInBrowser,
            KeyCode::Char('y') => Action::YankUrl,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if !matches!(action, Action::None) {
            self.error = None;
            self.status = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => match self.screen() {
                Screen::Home => self.should_quit = true,
                Screen::Post => self.navigate(Route::Home),
            },
            Action::ScrollUp => self.move_by(-1),
            Action::ScrollDown => self.move_by(1),
            Action::PageUp => self.move_by(-(PAGE_STEP as isize)),
            Action::PageDown => self.move_by(PAGE_STEP as isize),
            Action::GoToTop => match self.screen() {
                Screen::Home => self.post_index = 0,
                Screen::Post => self.scroll_offset = 0,
            },
            Action::GoToBottom => match self.screen() {
                Screen::Home => self.post_index = self.list_len().saturating_sub(1),
                Screen::Post => self.scroll_offset = self.body_len().saturating_sub(1),
            },
            Action::Select => {
                if self.screen() != Screen::Home {
                    return;
                }
                let selected = self
                    .feed
                    .state()
                    .ready()
                    .and_then(|list| list.posts.get(self.post_index))
                    .map(|post| post.slug.clone());
                match selected {
                    Some(slug) => self.navigate(Route::post(slug)),
                    None => self.load_more(),
                }
            }

            Action::Navigate(route) => self.navigate(route),

            // Post list
            Action::LoadMore => self.load_more(),
            Action::PostsLoaded(page, load_id) => {
                if self.is_current(load_id) {
                    self.feed.finish_initial(page);
                    self.post_index = 0;
                }
            }
            Action::PostsAppended(page, load_id) => {
                if self.is_current(load_id) {
                    self.feed.finish_more(page);
                }
            }
            Action::PostsFailed(reason, load_id) => {
                if self.is_current(load_id) {
                    self.feed.fail(reason);
                }
            }

            // Single post
            Action::PostLoaded(post, load_id) => {
                if self.is_current(load_id) {
                    if let Some(detail) = self.post.as_mut() {
                        detail.finish(post.map(|p| *p));
                    }
                }
            }
            Action::PostFailed(reason, load_id) => {
                if self.is_current(load_id) {
                    if let Some(detail) = self.post.as_mut() {
                        detail.fail(reason);
                    }
                }
            }

            Action::OpenInBrowser => match self.selected_image_url() {
                Some(url) => match open::that(&url) {
                    Ok(()) => self.status = Some(format!("Opened {}", url)),
                    Err(e) => self.error = Some(BlogError::from(e).to_string()),
                },
                None => self.error = Some("No cover image".to_string()),
            },
            Action::YankUrl => match self.selected_link() {
                Some(link) => {
                    let copied = arboard::Clipboard::new().and_then(|mut c| c.set_text(&link));
                    match copied {
                        Ok(()) => self.status = Some(format!("Copied {}", link)),
                        Err(e) => self.error = Some(format!("Clipboard: {}", e)),
                    }
                }
                None => self.error = Some("Nothing selected".to_string()),
            },

            Action::None => {}
        }
    }

    fn is_current(&self, load_id: u64) -> bool {
        if load_id != self.load_id {
            tracing::debug!(load_id, current = self.load_id, "dropping stale fetch result");
            return false;
        }
        true
    }

    fn move_by(&mut self, delta: isize) {
        match self.screen() {
            Screen::Home => {
                let last = self.list_len().saturating_sub(1);
                self.post_index = self.post_index.saturating_add_signed(delta).min(last);
            }
            Screen::Post => {
                let last = self.body_len().saturating_sub(1);
                self.scroll_offset = self.scroll_offset.saturating_add_signed(delta).min(last);
            }
        }
    }

    fn navigate(&mut self, route: Route) {
        self.load_id += 1;
        self.scroll_offset = 0;
        self.route = route.clone();

        match route {
            Route::Home => {
                self.post = None;
                self.post_index = 0;
                self.feed = ListController::new(self.settings.page_size);
                self.spawn_load_posts(self.feed.initial_vars(), false);
            }
            Route::Post { slug } => {
                let detail = DetailController::new(slug);
                self.spawn_load_post(detail.vars());
                self.post = Some(detail);
            }
        }
    }

    fn load_more(&mut self) {
        if let Some(vars) = self.feed.load_more() {
            self.spawn_load_posts(vars, true);
        }
    }

    /// Public link for the selected post (or the open one)
    pub fn selected_link(&self) -> Option<String> {
        let route = match self.screen() {
            Screen::Home => {
                let list = self.feed.state().ready()?;
                Route::post(list.posts.get(self.post_index)?.slug.clone())
            }
            Screen::Post => self.route.clone(),
        };

        Some(match &self.settings.site_url {
            Some(site) => format!("{}{}", site.trim_end_matches('/'), route.path()),
            None => route.path(),
        })
    }

    /// Full-size cover image of the selected post (or the open one)
    pub fn selected_image_url(&self) -> Option<String> {
        let cover = match self.screen() {
            Screen::Home => {
                let list = self.feed.state().ready()?;
                list.posts.get(self.post_index)?.cover_image.as_ref()?
            }
            Screen::Post => self.post.as_ref()?.post()?.cover_image.as_ref()?,
        };
        Some(media::resize_url(
            &self.settings.media_base_url,
            &cover.handle,
            HERO,
        ))
    }

    fn spawn_load_posts(&self, vars: ListVars, append: bool) {
        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        let load_id = self.load_id;
        tokio::spawn(async move {
            let action = match source.list_posts(vars).await {
                Ok(page) if append => Action::PostsAppended(page, load_id),
                Ok(page) => Action::PostsLoaded(page, load_id),
                Err(e) => {
                    tracing::warn!(error = %e, skip = vars.skip, "post list fetch failed");
                    Action::PostsFailed(e.to_string(), load_id)
                }
            };
            tx.send(action).ok();
        });
    }

    fn spawn_load_post(&self, vars: PostVars) {
        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        let load_id = self.load_id;
        tokio::spawn(async move {
            let action = match source.get_post(&vars.slug).await {
                Ok(post) => Action::PostLoaded(Some(Box::new(post)), load_id),
                Err(BlogError::NotFound(slug)) => {
                    tracing::debug!(%slug, "post not found");
                    Action::PostLoaded(None, load_id)
                }
                Err(e) => {
                    tracing::warn!(error = %e, slug = %vars.slug, "post fetch failed");
                    Action::PostFailed(e.to_string(), load_id)
                }
            };
            tx.send(action).ok();
        });
    }
}
