use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

/// Render a Markdown document into terminal lines.
///
/// Raw HTML blocks and inline tags are passed through verbatim when
/// `allow_raw_html` is set, and dropped otherwise.
pub fn render(source: &str, allow_raw_html: bool) -> Vec<Line<'static>> {
    let options = Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;

    let mut renderer = Renderer::new(allow_raw_html);
    for event in Parser::new_ext(source, options) {
        renderer.event(event);
    }
    renderer.finish()
}

/// Word-wrapped paragraph of rendered lines, as the post view draws them
pub fn paragraph(lines: Vec<Line<'static>>) -> Paragraph<'static> {
    Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false })
}

/// Screen rows the lines take once wrapped at `width`.
/// A zero width means nothing was drawn yet, so logical lines are counted.
pub fn wrapped_height(lines: Vec<Line<'static>>, width: u16) -> usize {
    if width == 0 {
        return lines.len();
    }
    paragraph(lines).line_count(width)
}

struct Renderer {
    allow_raw_html: bool,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    // None for bullet lists, Some(next number) for ordered lists
    lists: Vec<Option<u64>>,
    links: Vec<String>,
    quote_depth: usize,
    in_code_block: bool,
}

impl Renderer {
    fn new(allow_raw_html: bool) -> Self {
        Self {
            allow_raw_html,
            lines: Vec::new(),
            current: Vec::new(),
            styles: Vec::new(),
            lists: Vec::new(),
            links: Vec::new(),
            quote_depth: 0,
            in_code_block: false,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, patch: Style) {
        let style = self.style().patch(patch);
        self.styles.push(style);
    }

    fn push_text(&mut self, text: impl Into<String>) {
        let style = self.style();
        self.current.push(Span::styled(text.into(), style));
    }

    fn quote_prefix(&self) -> Option<Span<'static>> {
        (self.quote_depth > 0).then(|| {
            Span::styled("│ ".repeat(self.quote_depth), Style::default().fg(Color::DarkGray))
        })
    }

    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let mut spans: Vec<Span<'static>> = self.quote_prefix().into_iter().collect();
        spans.append(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    fn blank(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|l| l.spans.is_empty()) || self.lines.is_empty() {
            return;
        }
        self.lines.push(Line::default());
    }

    fn push_block_lines(&mut self, text: &str, style: Style, indent: &str) {
        self.flush();
        for raw in text.lines() {
            let mut spans: Vec<Span<'static>> = self.quote_prefix().into_iter().collect();
            spans.push(Span::styled(format!("{}{}", indent, raw), style));
            self.lines.push(Line::from(spans));
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    self.push_block_lines(&text, Style::default().fg(Color::Green), "    ");
                } else {
                    self.push_text(text.into_string());
                }
            }
            Event::Code(code) => {
                let style = self.style().patch(Style::default().fg(Color::Yellow));
                self.current.push(Span::styled(code.into_string(), style));
            }
            Event::Html(html) => {
                if self.allow_raw_html {
                    self.push_block_lines(&html, Style::default().fg(Color::Magenta), "");
                }
            }
            Event::InlineHtml(html) => {
                if self.allow_raw_html {
                    let style = self.style().patch(Style::default().fg(Color::Magenta));
                    self.current.push(Span::styled(html.into_string(), style));
                }
            }
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(40),
                    Style::default().fg(Color::DarkGray),
                )));
                self.blank();
            }
            Event::TaskListMarker(checked) => {
                self.push_text(if checked { "[x] " } else { "[ ] " });
            }
            Event::FootnoteReference(name) => {
                self.push_text(format!("[^{}]", name));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                self.push_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                );
                self.push_text(format!("{} ", "#".repeat(level as usize)));
            }
            Tag::BlockQuote { .. } => {
                self.flush();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.in_code_block = true;
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}{}. ", indent, n);
                        *n += 1;
                        marker
                    }
                    _ => format!("{}• ", indent),
                };
                self.current.push(Span::raw(marker));
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.push_style(
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::UNDERLINED),
                );
                self.links.push(dest_url.into_string());
            }
            Tag::Image { dest_url, .. } => {
                self.push_text("[image: ");
                self.links.push(dest_url.into_string());
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.blank(),
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.blank();
            }
            TagEnd::BlockQuote { .. } => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.blank();
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.blank();
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                if let Some(url) = self.links.pop() {
                    self.current.push(Span::styled(
                        format!(" <{}>", url),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            TagEnd::Image => {
                let url = self.links.pop().unwrap_or_default();
                self.push_text(format!("] <{}>", url));
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn long_paragraph_wraps_to_many_rows() {
        let body = format!("{}\n\nEND", "word ".repeat(100));
        let lines = render(&body, true);
        assert_eq!(lines.len(), 3);
        // 500 columns of text at width 50
        assert!(wrapped_height(lines.clone(), 50) >= 10);
        assert_eq!(wrapped_height(lines, 0), 3);
    }

    #[test]
    fn heading_and_paragraph() {
        let lines = render("# Title\n\nSome *text* here.", true);
        assert_eq!(plain(&lines), ["# Title", "", "Some text here."]);
    }

    #[test]
    fn emphasis_is_styled() {
        let lines = render("a **bold** word", true);
        let bold = lines[0]
            .spans
            .iter()
            .find(|s| s.content == "bold")
            .unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn bullet_and_ordered_lists() {
        let lines = render("- one\n- two\n\n1. first\n2. second", true);
        assert_eq!(
            plain(&lines),
            ["• one", "• two", "", "1. first", "2. second"]
        );
    }

    #[test]
    fn code_block_is_indented() {
        let lines = render("```\nlet x = 1;\nlet y = 2;\n```", true);
        assert_eq!(plain(&lines), ["    let x = 1;", "    let y = 2;"]);
    }

    #[test]
    fn link_shows_destination() {
        let lines = render("see [docs](https://example.com)", true);
        assert_eq!(plain(&lines), ["see docs <https://example.com>"]);
    }

    #[test]
    fn raw_html_kept_when_allowed() {
        let source = "<div class=\"note\">hi</div>\n\ntext with <b>inline</b> tag";
        let text = plain(&render(source, true)).join("\n");
        assert!(text.contains("<div class=\"note\">hi</div>"));
        assert!(text.contains("<b>inline</b>"));
    }

    #[test]
    fn raw_html_dropped_when_disallowed() {
        let source = "<div class=\"note\">hi</div>\n\ntext with <b>inline</b> tag";
        let text = plain(&render(source, false)).join("\n");
        assert!(!text.contains('<'));
        assert!(text.contains("text with inline tag"));
    }

    #[test]
    fn blockquote_is_prefixed() {
        let lines = render("> quoted", true);
        assert_eq!(plain(&lines), ["│ quoted"]);
    }

    #[test]
    fn empty_source_renders_nothing() {
        assert!(render("", true).is_empty());
    }
}
