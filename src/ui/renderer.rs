use crate::core::app::{App, AppMode};
use crate::core::message::Message;
use crate::ui::content::clean_content;
use crate::ui::markdown::render_markdown;
use crate::utils::image::{data_uri_decoded_len, data_uri_mime};
use crate::utils::scroll::{max_scroll_offset, wrapped_line_count};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub const APP_TITLE: &str = "AI Tutor System";
pub const USER_LABEL: &str = "You";
pub const TUTOR_LABEL: &str = "AI Tutor";
pub const THINKING_TEXT: &str = "Thinking...";

const MAX_COMPOSER_ROWS: u16 = 6;

/// Short description of an inline image, e.g. `[image: image/png, 12 KB]`.
pub fn image_label(data_uri: &str) -> String {
    format!(
        "[image: {}, {} KB]",
        data_uri_mime(data_uri).unwrap_or("image/jpeg"),
        data_uri_decoded_len(data_uri).div_ceil(1024)
    )
}

fn message_lines(app: &App, message: &Message, lines: &mut Vec<Line<'static>>) {
    let theme = &app.theme;
    if message.is_user() {
        lines.push(Line::from(Span::styled(USER_LABEL, theme.user_prefix_style)));
        if let Some(image) = &message.image {
            lines.push(Line::from(Span::styled(
                image_label(image),
                theme.attachment_style,
            )));
        }
        for text in message.content.lines() {
            lines.push(Line::from(Span::styled(
                text.to_string(),
                theme.user_text_style,
            )));
        }
    } else if message.is_error {
        lines.push(Line::from(Span::styled(TUTOR_LABEL, theme.error_text_style)));
        for text in message.content.lines() {
            lines.push(Line::from(Span::styled(
                text.to_string(),
                theme.error_text_style,
            )));
        }
    } else {
        lines.push(Line::from(Span::styled(TUTOR_LABEL, theme.tutor_prefix_style)));
        lines.extend(render_markdown(
            &clean_content(&message.content),
            theme.tutor_text_style,
            theme,
        ));
    }
    lines.push(Line::default());
}

/// Every transcript line, oldest first, including the pending indicator.
pub fn build_transcript_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in app.conversation.messages() {
        message_lines(app, message, &mut lines);
    }
    if app.is_busy() {
        lines.push(Line::from(Span::styled(
            TUTOR_LABEL,
            app.theme.tutor_prefix_style,
        )));
        lines.push(Line::from(Span::styled(
            THINKING_TEXT,
            app.theme.thinking_indicator_style,
        )));
    }
    lines
}

pub fn ui(f: &mut Frame, app: &mut App) {
    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.background_color)),
        f.area(),
    );
    match app.mode() {
        AppMode::KeyEntry => render_key_screen(f, app),
        AppMode::Chat => render_chat(f, app),
    }
}

fn render_chat(f: &mut Frame, app: &mut App) {
    let composer_rows = (app.composer.textarea().lines().len() as u16).clamp(1, MAX_COMPOSER_ROWS);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(composer_rows + 2), // +2 for borders
        ])
        .split(f.area());

    let header = Line::from(vec![
        Span::styled(APP_TITLE, app.theme.title_style),
        Span::styled(
            format!(" • {} • Logging: {}", app.model, app.logging.get_status_string()),
            app.theme.status_style,
        ),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    render_transcript(f, app, chunks[1]);

    let status = app.status.clone().unwrap_or_else(|| {
        "PgUp/PgDn to scroll • /image <path> to attach • Ctrl+C to quit".to_string()
    });
    f.render_widget(
        Paragraph::new(Span::styled(status, app.theme.status_style)),
        chunks[2],
    );

    render_composer(f, app, chunks[3]);
}

fn render_transcript(f: &mut Frame, app: &mut App, area: Rect) {
    let lines = build_transcript_lines(app);
    let total_rows = wrapped_line_count(&lines, area.width);
    let top = app.clamp_scroll(max_scroll_offset(total_rows, area.height));

    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((top, 0));
    f.render_widget(transcript, area);
}

fn render_composer(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let enabled = app.input_enabled();

    let title = if enabled {
        "Message (Enter to send, Alt+Enter for new line, /help for commands)"
    } else {
        "Waiting for the tutor..."
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_style)
        .title(Span::styled(title, theme.input_title_style));
    if let Some(attachment) = app.composer.attachment() {
        block = block.title_bottom(Line::from(Span::styled(
            format!(
                " {} {} ",
                attachment.path.display(),
                image_label(&attachment.data_uri)
            ),
            theme.attachment_style,
        )));
    }

    let mut textarea = app.composer.textarea().clone();
    textarea.set_block(block);
    if !enabled {
        textarea.set_style(theme.input_disabled_style);
        textarea.set_cursor_style(theme.input_disabled_style);
    }
    f.render_widget(&textarea, area);
}

fn render_key_screen(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = centered(f.area(), 72, 12);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    let intro = vec![
        Line::from(Span::styled(
            APP_TITLE,
            theme.title_style.add_modifier(Modifier::UNDERLINED),
        )),
        Line::default(),
        Line::from(Span::styled(
            "To use the tutor you need a Gemini API key.",
            theme.tutor_text_style,
        )),
        Line::from(Span::styled(
            "Create one for a Google Cloud project with the Gemini API enabled.",
            theme.tutor_text_style,
        )),
        Line::from(Span::styled(
            "Billing: https://ai.google.dev/gemini-api/docs/billing",
            theme.status_style,
        )),
    ];
    f.render_widget(
        Paragraph::new(intro)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let mut key_input = app.key_input.clone();
    key_input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.input_border_style)
            .title(Span::styled(
                "API key (Enter to save, Ctrl+C to quit)",
                theme.input_title_style,
            )),
    );
    f.render_widget(&key_input, chunks[1]);

    if let Some(status) = &app.status {
        f.render_widget(
            Paragraph::new(Span::styled(status.clone(), theme.error_text_style))
                .alignment(Alignment::Center),
            chunks[2],
        );
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
