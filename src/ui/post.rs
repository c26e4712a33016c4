use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::markdown;
use crate::media::{self, HERO};
use crate::types::{FetchState, Post};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Post ");

    let placeholder = match app.post.as_ref().map(|d| d.state()) {
        Some(FetchState::Error(_)) => Paragraph::new("Error fetching the Post!")
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Some(FetchState::Loading) | None => {
            Paragraph::new("Loading Post...").style(Style::default().fg(Color::Gray))
        }
        Some(FetchState::Ready(Some(post))) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(5), Constraint::Min(0)])
                .split(area);

            render_header(frame, app, post, chunks[0]);
            render_body(frame, app, post, chunks[1]);
            return;
        }
        Some(FetchState::Ready(None)) => {
            Paragraph::new("no Post data").style(Style::default().fg(Color::Gray))
        }
    };

    frame.render_widget(placeholder.block(block), area);
}

fn render_header(frame: &mut Frame, app: &App, post: &Post, area: Rect) {
    let published = post
        .date_and_time
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let cover = post
        .cover_image
        .as_ref()
        .map(|c| media::resize_url(&app.settings.media_base_url, &c.handle, HERO))
        .unwrap_or_else(|| "none".to_string());

    let lines = vec![
        Line::from(Span::styled(
            post.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Published: ", Style::default().fg(Color::Gray)),
            Span::raw(published),
        ]),
        Line::from(vec![
            Span::styled("Cover: ", Style::default().fg(Color::Gray)),
            Span::styled(cover, Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let header =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Details "));

    frame.render_widget(header, area);
}

fn render_body(frame: &mut Frame, app: &App, post: &Post, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    app.body_width.set(inner.width);

    let lines = markdown::render(&post.content, app.settings.allow_raw_html);

    // Clamp scroll offset to the wrapped rows
    let rows = markdown::wrapped_height(lines.clone(), inner.width);
    let max_scroll = rows.saturating_sub(1);
    let scroll_offset = app.scroll_offset.min(max_scroll).min(u16::MAX as usize) as u16;

    // Clear the area first to prevent artifacts
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    frame.render_widget(markdown::paragraph(lines).scroll((scroll_offset, 0)), inner);
}
