//! Markdown to styled terminal lines.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::ui::theme::Theme;

#[derive(Clone, Copy)]
enum ListKind {
    Unordered,
    Ordered(u64),
}

struct MarkdownRenderer<'t> {
    theme: &'t Theme,
    style_stack: Vec<Style>,
    list_stack: Vec<ListKind>,
    quote_depth: usize,
    in_code_block: bool,
    current: Vec<Span<'static>>,
    lines: Vec<Line<'static>>,
}

fn detab(s: &str) -> String {
    s.replace('\t', "    ")
}

impl<'t> MarkdownRenderer<'t> {
    fn new(theme: &'t Theme, base: Style) -> Self {
        Self {
            theme,
            style_stack: vec![base],
            list_stack: Vec::new(),
            quote_depth: 0,
            in_code_block: false,
            current: Vec::new(),
            lines: Vec::new(),
        }
    }

    fn style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or_default()
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        let style = self.style().add_modifier(modifier);
        self.style_stack.push(style);
    }

    fn pop_style(&mut self) {
        // The base style always stays
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn line_prefix(&self) -> Option<Span<'static>> {
        (self.quote_depth > 0).then(|| {
            Span::styled("│ ".repeat(self.quote_depth), self.theme.status_style)
        })
    }

    fn push_span(&mut self, span: Span<'static>) {
        if self.current.is_empty() {
            if let Some(prefix) = self.line_prefix() {
                self.current.push(prefix);
            }
        }
        self.current.push(span);
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            let spans = std::mem::take(&mut self.current);
            self.lines.push(Line::from(spans));
        }
    }

    fn push_empty_line(&mut self) {
        let last_blank = self
            .lines
            .last()
            .is_some_and(|line| line.spans.iter().all(|s| s.content.is_empty()));
        if !self.lines.is_empty() && !last_blank {
            self.lines.push(Line::default());
        }
    }

    fn list_indent(&self) -> String {
        "  ".repeat(self.list_stack.len().saturating_sub(1))
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                let mut style = self.style().add_modifier(Modifier::BOLD);
                if level == HeadingLevel::H1 {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                self.style_stack.push(style);
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
            }
            Tag::List(start) => {
                self.flush();
                self.list_stack.push(match start {
                    Some(n) => ListKind::Ordered(n),
                    None => ListKind::Unordered,
                });
            }
            Tag::Item => {
                self.flush();
                let marker = match self.list_stack.last_mut() {
                    Some(ListKind::Ordered(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                let indent = self.list_indent();
                self.push_span(Span::raw(format!("{indent}{marker}")));
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                self.in_code_block = true;
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        self.lines.push(Line::from(Span::styled(
                            format!("[{lang}]"),
                            self.theme.status_style,
                        )));
                    }
                }
            }
            Tag::Emphasis => self.push_modifier(Modifier::ITALIC),
            Tag::Strong => self.push_modifier(Modifier::BOLD),
            Tag::Strikethrough => self.push_modifier(Modifier::CROSSED_OUT),
            Tag::Link { .. } | Tag::Image { .. } => self.push_modifier(Modifier::UNDERLINED),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush();
                if self.list_stack.is_empty() {
                    self.push_empty_line();
                }
            }
            TagEnd::Heading(_) => {
                self.flush();
                self.pop_style();
                self.push_empty_line();
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::List(_) => {
                self.flush();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.push_empty_line();
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::CodeBlock => {
                self.flush();
                self.in_code_block = false;
                self.push_empty_line();
            }
            TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Link
            | TagEnd::Image => self.pop_style(),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block {
            let style = self.style();
            for line in text.lines() {
                self.push_span(Span::styled(format!("  {}", detab(line)), style));
                self.flush();
            }
            return;
        }
        let style = self.style();
        self.push_span(Span::styled(detab(text), style));
    }

    fn render(mut self, content: &str) -> Vec<Line<'static>> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_MATH);

        for event in Parser::new_ext(content, options) {
            match event {
                Event::Start(tag) => self.start(tag),
                Event::End(tag) => self.end(tag),
                Event::Text(text) => self.text(&text),
                Event::Code(code) => {
                    let style = self.style().add_modifier(Modifier::REVERSED);
                    self.push_span(Span::styled(detab(&code), style));
                }
                Event::InlineMath(math) => {
                    self.push_span(Span::styled(detab(&math), self.theme.math_style));
                }
                Event::DisplayMath(math) => {
                    self.flush();
                    let indent = format!("{}  ", self.list_indent());
                    for line in math.trim().lines() {
                        self.push_span(Span::styled(
                            format!("{indent}{}", detab(line.trim())),
                            self.theme.math_style,
                        ));
                        self.flush();
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    self.flush();
                    if !self.list_stack.is_empty() {
                        let indent = format!("{}  ", self.list_indent());
                        self.push_span(Span::raw(indent));
                    }
                }
                Event::Rule => {
                    self.flush();
                    self.lines
                        .push(Line::from(Span::styled("─".repeat(24), self.theme.status_style)));
                    self.push_empty_line();
                }
                Event::TaskListMarker(done) => {
                    self.push_span(Span::raw(if done { "[x] " } else { "[ ] " }));
                }
                Event::Html(html) | Event::InlineHtml(html) => {
                    let style = self.style();
                    self.push_span(Span::styled(html.to_string(), style));
                }
                _ => {}
            }
        }

        self.flush();
        while self
            .lines
            .last()
            .is_some_and(|line| line.spans.iter().all(|s| s.content.is_empty()))
        {
            self.lines.pop();
        }
        self.lines
    }
}

/// Renders `content` as Markdown with `base` as the body style. Inline and
/// display math keep their source text in the theme's math style.
pub fn render_markdown(content: &str, base: Style, theme: &Theme) -> Vec<Line<'static>> {
    MarkdownRenderer::new(theme, base).render(content)
}
