//! Text clean-up for pasted input.

/// Makes pasted text safe to insert into the composer.
///
/// Windows and old Mac line endings become `\n`, tabs become four spaces,
/// and other control characters are dropped so they cannot corrupt the
/// terminal.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                sanitized.push('\n');
            }
            '\t' => sanitized.push_str("    "),
            '\n' => sanitized.push(c),
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }

    sanitized
}
