//! Helpers for turning shop text into something a log line or a plain terminal can show.
//! Escapes control characters that otherwise break log readability and strips
//! the host's backtick color codes.

/// Escape a string for single-line logging:
/// - `\n` => `\\n`
/// - `\r` => `\\r`
/// - `\t` => `\\t`
/// - backslash => `\\\\`
///
/// Strings longer than `MAX_PREVIEW` (300) characters are cut there and end
/// with an ellipsis.
pub fn escape_log(s: &str) -> String {
    const MAX_PREVIEW: usize = 300;
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Drop backtick color codes: `` `5 `` and friends vanish, `` `n `` becomes a
/// newline and a doubled backtick stays a single one.
pub fn strip_color_codes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '`' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('`') => out.push('`'),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{escape_log, strip_color_codes};

    #[test]
    fn escapes_newlines_and_truncates() {
        let s = "Line1\nLine2\r\tEnd";
        let esc = escape_log(s);
        assert_eq!(esc, "Line1\\nLine2\\r\\tEnd");

        let long = "x".repeat(400);
        assert!(escape_log(&long).ends_with('…'));
    }

    #[test]
    fn truncates_past_preview_limit_only() {
        let at_limit = "y".repeat(300);
        assert_eq!(escape_log(&at_limit), at_limit);

        let over = "y".repeat(301);
        assert_eq!(escape_log(&over), format!("{}…", at_limit));
    }

    #[test]
    fn strips_color_codes() {
        assert_eq!(
            strip_color_codes("`!Pegasus`7 says `#hi`n``done"),
            "Pegasus says hi\n`done"
        );
        assert_eq!(strip_color_codes("trailing`"), "trailing");
    }
}
