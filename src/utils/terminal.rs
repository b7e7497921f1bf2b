//! Terminal output sanitization
//!
//! Search hits echo raw document lines. Those lines can carry escape
//! sequences (colour codes pasted from a terminal, OSC title sequences) that
//! would be interpreted by the operator's terminal. Human-readable output runs
//! every echoed line through [`sanitize_for_terminal`]; JSON output keeps the
//! raw text since serde_json escapes control characters itself.

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// Removes CSI (`ESC [ ... letter`) and OSC (`ESC ] ... BEL|ESC \`) sequences
/// and drops remaining control characters except tab
///
/// # Examples
///
/// ```
/// use workbench_ops::utils::sanitize_for_terminal;
///
/// assert_eq!(sanitize_for_terminal("\x1b[1mbold\x1b[0m note"), "bold note");
/// ```
pub fn sanitize_for_terminal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == ESC {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    for next in chars.by_ref() {
                        if next.is_ascii_alphabetic() || next == '~' {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == BEL {
                            break;
                        }
                        if next == ESC && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        if ch.is_control() && ch != '\t' {
            continue;
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_colour_codes() {
        assert_eq!(sanitize_for_terminal("\x1b[31mred\x1b[0m plain"), "red plain");
    }

    #[test]
    fn test_sanitize_strips_osc_title_sequences() {
        assert_eq!(sanitize_for_terminal("\x1b]0;pwned\x07after"), "after");
        assert_eq!(sanitize_for_terminal("\x1b]2;title\x1b\\after"), "after");
    }

    #[test]
    fn test_sanitize_drops_control_characters_but_keeps_tabs() {
        assert_eq!(sanitize_for_terminal("a\x08b\tc\x07"), "ab\tc");
        assert_eq!(sanitize_for_terminal("line\r"), "line");
    }

    #[test]
    fn test_sanitize_leaves_unicode_alone() {
        assert_eq!(sanitize_for_terminal("résumé 👋 测试"), "résumé 👋 测试");
    }

    #[test]
    fn test_sanitize_handles_truncated_sequences() {
        assert_eq!(sanitize_for_terminal("tail\x1b["), "tail");
        assert_eq!(sanitize_for_terminal("tail\x1b"), "tail");
        assert_eq!(sanitize_for_terminal(""), "");
    }
}
