use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub tutor_prefix_style: Style,
    pub tutor_text_style: Style,
    pub error_text_style: Style,
    pub math_style: Style,
    pub attachment_style: Style,

    // Chrome
    pub title_style: Style,
    pub thinking_indicator_style: Style,
    pub status_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,

    // Input area
    pub input_text_style: Style,
    pub input_disabled_style: Style,
    pub input_cursor_style: Style,
    pub input_cursor_line_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            tutor_prefix_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            tutor_text_style: Style::default().fg(Color::White),
            error_text_style: Style::default().fg(Color::LightRed),
            math_style: Style::default().fg(Color::Yellow),
            attachment_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            title_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
            thinking_indicator_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            status_style: Style::default().fg(Color::DarkGray),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),

            input_text_style: Style::default().fg(Color::White),
            input_disabled_style: Style::default().fg(Color::DarkGray),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            input_cursor_line_style: Style::default(),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            tutor_prefix_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            tutor_text_style: Style::default().fg(Color::Black),
            error_text_style: Style::default().fg(Color::Red),
            math_style: Style::default().fg(Color::Magenta),
            attachment_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),

            title_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
            thinking_indicator_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            status_style: Style::default().fg(Color::Gray),
            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),

            input_text_style: Style::default().fg(Color::Black),
            input_disabled_style: Style::default().fg(Color::Gray),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            input_cursor_line_style: Style::default(),
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "dark" | "default" | "default-dark" => Self::dark_default(),
            "light" => Self::light(),
            // Fallback
            _ => Self::dark_default(),
        }
    }
}
