//! Quote-aware tokenizer for command lines
//!
//! Splits an input line on spaces. A token starting with `"` runs to the
//! next `"` and may contain spaces; the quotes are not part of the value.
//! An unterminated quote swallows the rest of the line and is flagged, so
//! callers can fail open instead of rejecting the input.

use std::ops::Range;

/// One token of an input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token text without surrounding quotes
    pub value: &'a str,
    /// Byte range in the line, quotes included
    pub span: Range<usize>,
    /// Token was written in quotes
    pub quoted: bool,
}

/// Result of tokenizing a line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tokens<'a> {
    /// Tokens in order
    pub tokens: Vec<Token<'a>>,
    /// The trailing token opened a quote that was never closed
    pub unterminated: bool,
}

impl<'a> Tokens<'a> {
    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when the line holds no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `index`
    pub fn get(&self, index: usize) -> Option<&Token<'a>> {
        self.tokens.get(index)
    }
}

/// Tokenize `line`
///
/// # Arguments
/// * `line` - Raw input line
///
/// # Returns
/// * `Tokens` - Tokens with spans and the unterminated-quote flag
pub fn tokenize(line: &str) -> Tokens<'_> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut unterminated = false;
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] == b' ' {
            pos += 1;
            continue;
        }

        let start = pos;
        if bytes[pos] == b'"' {
            let content_start = pos + 1;
            match line[content_start..].find('"') {
                Some(offset) => {
                    let content_end = content_start + offset;
                    pos = content_end + 1;
                    tokens.push(Token {
                        value: &line[content_start..content_end],
                        span: start..pos,
                        quoted: true,
                    });
                }
                None => {
                    pos = bytes.len();
                    unterminated = true;
                    tokens.push(Token {
                        value: &line[content_start..],
                        span: start..pos,
                        quoted: true,
                    });
                }
            }
        } else {
            while pos < bytes.len() && bytes[pos] != b' ' {
                pos += 1;
            }
            tokens.push(Token {
                value: &line[start..pos],
                span: start..pos,
                quoted: false,
            });
        }
    }

    Tokens {
        tokens,
        unterminated,
    }
}

/// Strip one leading and one trailing `"`
///
/// Each side is stripped on its own, so a quote that was opened and never
/// closed still yields the bare text.
pub fn unquote(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}

/// Wrap `candidate` in quotes when it contains a space
pub fn quote_if_spaced(candidate: &str) -> String {
    if candidate.contains(' ') {
        format!("\"{candidate}\"")
    } else {
        candidate.to_string()
    }
}

/// True for a non-empty token made only of ASCII digits
pub fn is_index(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<'a>(tokens: &Tokens<'a>) -> Vec<&'a str> {
        tokens.tokens.iter().map(|t| t.value).collect()
    }

    #[test]
    fn test_plain_tokens() {
        let tokens = tokenize("/roster room private");
        assert_eq!(values(&tokens), vec!["/roster", "room", "private"]);
        assert!(!tokens.unterminated);
        assert_eq!(tokens.get(1).map(|t| t.span.clone()), Some(8..12));
    }

    #[test]
    fn test_repeated_spaces_are_skipped() {
        let tokens = tokenize("  /who   online  ");
        assert_eq!(values(&tokens), vec!["/who", "online"]);
        assert_eq!(tokens.get(0).map(|t| t.span.start), Some(2));
    }

    #[test]
    fn test_quoted_token_keeps_spaces() {
        let tokens = tokenize("/msg \"Bob Smith\" hello");
        assert_eq!(values(&tokens), vec!["/msg", "Bob Smith", "hello"]);
        let quoted = &tokens.tokens[1];
        assert!(quoted.quoted);
        assert_eq!(quoted.span, 5..16);
    }

    #[test]
    fn test_unterminated_quote_fails_open() {
        let tokens = tokenize("/msg \"Bob Sm");
        assert!(tokens.unterminated);
        assert_eq!(values(&tokens), vec!["/msg", "Bob Sm"]);
    }

    #[test]
    fn test_empty_line() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("    ").is_empty());
    }

    #[test]
    fn test_unquote_strips_either_side() {
        assert_eq!(unquote("\"Bob Smith\""), "Bob Smith");
        assert_eq!(unquote("\"Bob"), "Bob");
        assert_eq!(unquote("Bob\""), "Bob");
        assert_eq!(unquote("\"Bob Sm"), "Bob Sm");
        assert_eq!(unquote("\""), "");
        assert_eq!(unquote("plain"), "plain");
    }

    #[test]
    fn test_quote_if_spaced() {
        assert_eq!(quote_if_spaced("Bob Smith"), "\"Bob Smith\"");
        assert_eq!(quote_if_spaced("bob@example.org"), "bob@example.org");
    }

    #[test]
    fn test_is_index() {
        assert!(is_index("0"));
        assert!(is_index("42"));
        assert!(!is_index(""));
        assert!(!is_index("4a"));
        assert!(!is_index("-1"));
    }
}
