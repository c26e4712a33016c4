use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::media::{self, THUMBNAIL};
use crate::route::Route;
use crate::types::{FetchState, PostList};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Posts ");

    match app.feed.state() {
        FetchState::Error(_) => {
            let error = Paragraph::new("Error fetching posts!")
                .block(block)
                .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
            frame.render_widget(error, area);
        }
        FetchState::Loading => {
            let loading = Paragraph::new("Loading posts...")
                .block(block)
                .style(Style::default().fg(Color::Gray));
            frame.render_widget(loading, area);
        }
        FetchState::Ready(list) => render_posts(frame, app, list, area),
    }
}

fn render_posts(frame: &mut Frame, app: &App, list: &PostList, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(format!(
        " Posts ({}/{}) ",
        list.loaded_count(),
        list.total_count
    ));

    if list.posts.is_empty() {
        let empty = Paragraph::new("No posts yet")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let mut items: Vec<ListItem> = list
        .posts
        .iter()
        .enumerate()
        .map(|(i, post)| {
            let style = if i == app.post_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            let thumbnail = post
                .cover_image
                .as_ref()
                .map(|c| media::resize_url(&app.settings.media_base_url, &c.handle, THUMBNAIL))
                .unwrap_or_else(|| "no cover image".to_string());

            ListItem::new(vec![
                Line::from(Span::styled(post.title.clone(), style)),
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        Route::post(post.slug.clone()).path(),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw("  "),
                    Span::styled(thumbnail, Style::default().fg(Color::DarkGray)),
                ]),
            ])
        })
        .collect();

    // The control stays mounted while the next page is in flight
    if list.are_more_posts() {
        let label = if app.feed.is_fetching_more() {
            "Loading..."
        } else {
            "Show More Posts"
        };
        let style = if app.post_index == list.posts.len() {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        };
        items.push(ListItem::new(Line::from(Span::styled(
            format!("[ {} ]", label),
            style,
        ))));
    }

    let list_widget = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(app.post_index));

    frame.render_stateful_widget(list_widget, area, &mut state);
}

#[cfg(test)]
mod tests {
    use crate::action::Action;
    use crate::route::Route;
    use crate::testing::{fake_app, preview_page};
    use crate::ui::draw_to_string;

    #[tokio::test]
    async fn loading_placeholder() {
        let (app, _rx) = fake_app(10, 4, Route::Home);
        let screen = draw_to_string(&app, 100, 20);
        assert!(screen.contains("Loading posts..."));
    }

    #[tokio::test]
    async fn error_message_replaces_content() {
        let (mut app, _rx) = fake_app(10, 4, Route::Home);
        app.feed.finish_initial(Some(preview_page(0..4, 10)));
        app.feed.fail("bad gateway".to_string());
        let screen = draw_to_string(&app, 100, 20);
        assert!(screen.contains("Error fetching posts!"));
        assert!(!screen.contains("Post 0"));
    }

    #[tokio::test]
    async fn cards_link_to_post_route_with_thumbnail() {
        let (mut app, _rx) = fake_app(10, 4, Route::Home);
        app.feed.finish_initial(Some(preview_page(0..4, 10)));
        let screen = draw_to_string(&app, 120, 20);
        assert!(screen.contains("Post 0"));
        assert!(screen.contains("/post/post-3"));
        assert!(screen.contains("resize=w:100,h:100,fit:crop/handle-0"));
        assert!(screen.contains("Posts (4/10)"));
    }

    #[tokio::test]
    async fn show_more_gated_on_total() {
        let (mut app, _rx) = fake_app(10, 4, Route::Home);
        app.feed.finish_initial(Some(preview_page(0..4, 10)));
        assert!(draw_to_string(&app, 120, 20).contains("Show More Posts"));

        let (mut app, _rx) = fake_app(4, 4, Route::Home);
        app.feed.finish_initial(Some(preview_page(0..4, 4)));
        let screen = draw_to_string(&app, 120, 20);
        assert!(!screen.contains("Show More Posts"));
        assert!(!screen.contains("Loading..."));
    }

    #[tokio::test]
    async fn show_more_label_while_fetching() {
        let (mut app, _rx) = fake_app(10, 4, Route::Home);
        app.feed.finish_initial(Some(preview_page(0..4, 10)));
        app.update(Action::LoadMore);
        let screen = draw_to_string(&app, 120, 20);
        assert!(screen.contains("[ Loading... ]"));
        assert!(screen.contains("Post 3"));
    }

    #[tokio::test]
    async fn empty_list() {
        let (mut app, _rx) = fake_app(0, 4, Route::Home);
        app.feed.finish_initial(Some(preview_page(0..0, 0)));
        assert!(draw_to_string(&app, 80, 10).contains("No posts yet"));
    }
}
