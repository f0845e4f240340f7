//! Materialization of streamed (large-object) text.

use std::io::{BufRead, Read};

use crate::error::AccessError;

/// Read a character stream to the end and return its lines joined by `\n`.
///
/// `\r\n`, `\r` and `\n` are all treated as line terminators. No terminator
/// follows the last line, so `"a\r\nb\rc\n"` becomes `"a\nb\nc"`. Non-UTF-8
/// input is reported as an [`AccessError`].
pub fn materialize_text(mut reader: impl BufRead) -> Result<String, AccessError> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if chars.peek().is_some() {
                    out.push('\n');
                }
            }
            '\n' => {
                if chars.peek().is_some() {
                    out.push('\n');
                }
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::materialize_text;

    #[test]
    fn blank_lines_in_the_middle_are_kept() {
        let text = materialize_text("a\n\nb\n".as_bytes()).unwrap();
        assert_eq!(text, "a\n\nb");
    }

    #[test]
    fn empty_stream_is_empty_text() {
        let text = materialize_text("".as_bytes()).unwrap();
        assert_eq!(text, "");
    }
}
