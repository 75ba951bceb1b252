//! Low-level readers over template source.
//!
//! Every reader advances a single cursor; none of them backtracks past what it returns.

pub(crate) const OPEN: &str = "<?";
pub(crate) const CLOSE: &str = "?>";

/// ASCII whitespace including vertical tab.
fn is_space(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b'
}

/// Result of [`Scanner::read_text`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Text<'a> {
    /// Text up to an open marker; the marker itself has been consumed.
    Directive(&'a str),
    /// Input ran out before another open marker.
    End(&'a str),
}

pub(crate) struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn advance(&mut self, len: usize) {
        let end = self.pos + len;
        self.line += self.src.as_bytes()[self.pos..end]
            .iter()
            .filter(|b| **b == b'\n')
            .count();
        self.pos = end;
    }

    /// 1-based line of the cursor.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn read_text(&mut self) -> Text<'a> {
        let rest = self.rest();
        match rest.find(OPEN) {
            Some(i) => {
                self.advance(i + OPEN.len());
                Text::Directive(&rest[..i])
            }
            None => {
                self.advance(rest.len());
                Text::End(rest)
            }
        }
    }

    /// Directive keyword; a leading `=` is shorthand for `echo`.
    pub fn read_command(&mut self) -> &'a str {
        self.skip_whitespace();
        if self.rest().starts_with('=') {
            self.advance(1);
            return "echo";
        }
        self.read_token(true)
    }

    /// Whitespace-delimited token; the whitespace after it stays.
    pub fn read_word(&mut self) -> &'a str {
        self.read_token(false)
    }

    /// Token ending at whitespace (consumed) or at `?>` (left in place).
    pub fn read_query(&mut self) -> &'a str {
        let token = self.read_token(true);
        if let Some(c) = self.rest().chars().next() {
            if is_space(c) {
                self.advance(c.len_utf8());
            }
        }
        token
    }

    /// `"..."` literal without the quotes. Empty when there is no opening quote.
    pub fn read_quoted(&mut self) -> &'a str {
        let rest = self.rest();
        let Some(inner) = rest.strip_prefix('"') else {
            return "";
        };
        match inner.find('"') {
            Some(end) => {
                self.advance(end + 2);
                &inner[..end]
            }
            None => {
                self.advance(rest.len());
                inner
            }
        }
    }

    pub fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches(is_space);
        self.advance(rest.len() - trimmed.len());
    }

    pub fn eat_close(&mut self) -> bool {
        if self.rest().starts_with(CLOSE) {
            self.advance(CLOSE.len());
            true
        } else {
            false
        }
    }

    /// One optional `\r` followed by one optional `\n`.
    pub fn eat_line_break(&mut self) {
        if self.rest().starts_with('\r') {
            self.advance(1);
        }
        if self.rest().starts_with('\n') {
            self.advance(1);
        }
    }

    fn read_token(&mut self, stop_at_close: bool) -> &'a str {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|(i, c)| is_space(*c) || (stop_at_close && rest[*i..].starts_with(CLOSE)))
            .map_or(rest.len(), |(i, _)| i);
        self.advance(end);
        &rest[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_text() {
        let mut s = Scanner::new("hello <? x ?>tail");
        assert_eq!(s.read_text(), Text::Directive("hello "));
        assert_eq!(s.read_command(), "x");
        s.skip_whitespace();
        assert!(s.eat_close());
        assert_eq!(s.read_text(), Text::End("tail"));
        assert_eq!(s.read_text(), Text::End(""));
    }

    #[test]
    fn test_read_text_empty_before_marker() {
        let mut s = Scanner::new("<?if");
        assert_eq!(s.read_text(), Text::Directive(""));
        assert_eq!(s.read_command(), "if");
    }

    #[test]
    fn test_lone_angle_bracket_is_text() {
        let mut s = Scanner::new("a < b ? c");
        assert_eq!(s.read_text(), Text::End("a < b ? c"));
    }

    #[test]
    fn test_read_command_shorthand() {
        let mut s = Scanner::new("=name?>");
        assert_eq!(s.read_command(), "echo");
        assert_eq!(s.read_query(), "name");
        assert!(s.eat_close());
    }

    #[test]
    fn test_read_command_stops_at_close() {
        let mut s = Scanner::new("  else?>");
        assert_eq!(s.read_command(), "else");
        assert!(s.eat_close());

        let mut s = Scanner::new("?>");
        assert_eq!(s.read_command(), "");
    }

    #[test]
    fn test_read_word_keeps_whitespace() {
        let mut s = Scanner::new("item  items ?>");
        assert_eq!(s.read_word(), "item");
        assert_eq!(s.read_query(), "");
        s.skip_whitespace();
        assert_eq!(s.read_query(), "items");
        assert!(s.eat_close());
    }

    #[test]
    fn test_read_query_consumes_one_space() {
        let mut s = Scanner::new("a.b[0] ?>");
        assert_eq!(s.read_query(), "a.b[0]");
        assert!(s.eat_close());
    }

    #[test]
    fn test_read_quoted() {
        let mut s = Scanner::new("\"part.tpl\" ?>");
        assert_eq!(s.read_quoted(), "part.tpl");
        s.skip_whitespace();
        assert!(s.eat_close());

        let mut s = Scanner::new("part.tpl ?>");
        assert_eq!(s.read_quoted(), "");

        let mut s = Scanner::new("\"open");
        assert_eq!(s.read_quoted(), "open");
        assert!(!s.eat_close());
    }

    #[test]
    fn test_eat_line_break() {
        let mut s = Scanner::new("\r\n\nx");
        s.eat_line_break();
        assert_eq!(s.read_text(), Text::End("\nx"));
    }

    #[test]
    fn test_line() {
        let mut s = Scanner::new("a\nb\n<? x");
        assert_eq!(s.line(), 1);
        s.read_text();
        assert_eq!(s.line(), 3);
    }

    #[test]
    fn test_vertical_tab_is_whitespace() {
        let mut s = Scanner::new("\x0b echo\x0ba.b\x0b?>");
        assert_eq!(s.read_command(), "echo");
        s.skip_whitespace();
        assert_eq!(s.read_query(), "a.b");
        assert!(s.eat_close());
    }

    #[test]
    fn test_multibyte_text() {
        let mut s = Scanner::new("héllo → <?= ünï ?>");
        assert_eq!(s.read_text(), Text::Directive("héllo → "));
        assert_eq!(s.read_command(), "echo");
        s.skip_whitespace();
        assert_eq!(s.read_query(), "ünï");
    }
}
