//! Clean-ups applied to model replies before they are rendered.

fn is_token_char(c: char) -> bool {
    !c.is_whitespace() && c != '$'
}

/// Collapses a bare token that is immediately repeated in dollar math form.
///
/// Replies sometimes state an expression twice, once plain and once as
/// `$...$` (`x^2 $x^2$`). The plain copy is dropped and the math form kept.
/// A token is a run of characters that are neither whitespace nor `$`; the
/// math form must repeat it exactly. When only the tail of a run is
/// repeated (`2x $x$`), the tail is the token and the head is kept as text.
/// Expressions containing spaces are never collapsed.
pub fn clean_content(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(ch) = text[pos..].chars().next() {
        if !is_token_char(ch) {
            pos += ch.len_utf8();
            continue;
        }

        let run = &text[pos..];
        let run_end = pos + run.find(|c| !is_token_char(c)).unwrap_or(run.len());
        let after = &text[run_end..];
        let gap = after.len() - after.trim_start().len();

        let mut collapsed = None;
        if gap > 0 {
            if let Some(math) = after[gap..].strip_prefix('$') {
                // Leftmost start first, so the longest repeated tail wins
                for (offset, _) in text[pos..run_end].char_indices() {
                    let token = &text[pos + offset..run_end];
                    let closes = math
                        .strip_prefix(token)
                        .is_some_and(|rest| rest.starts_with('$'));
                    if closes {
                        let end = run_end + gap + token.len() + 2;
                        collapsed = Some((pos + offset, end, token));
                        break;
                    }
                }
            }
        }

        match collapsed {
            Some((start, end, token)) => {
                out.push_str(&text[copied..start]);
                out.push('$');
                out.push_str(token);
                out.push('$');
                copied = end;
                pos = end;
            }
            None => pos = run_end,
        }
    }

    out.push_str(&text[copied..]);
    out
}
