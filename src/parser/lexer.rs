//! Tokenizer for CHTL source
//!
//! The lexer never fails: unterminated strings and block comments run to the
//! end of the document and are flagged through `Token::terminated` so the
//! region builder can report them. Raw bodies (`script`, `[Origin]`) are
//! skipped on request by brace counting alone.

use super::Span;

/// The kind of a lexed token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier, number or unquoted literal (`div`, `font-size`, `100px`)
    Word,
    /// `"..."`, `'...'` or `` `...` `` literal
    String,
    /// `[Template]`, `[Custom]`, ...
    BracketKeyword,
    /// `@Style`, `@Element`, ...
    AtType,
    LBrace,
    RBrace,
    Semicolon,
    Colon,
    Equal,
    /// Any other single ASCII character
    Punct,
    /// `// ...`
    LineComment,
    /// `/* ... */`
    BlockComment,
    /// `# ...`, emitted into the generated output by the compiler
    GeneratorComment,
}

impl TokenKind {
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            TokenKind::LineComment | TokenKind::BlockComment | TokenKind::GeneratorComment
        )
    }
}

/// A token with its byte span in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// False for a string or block comment cut off by end of input
    pub terminated: bool,
}

impl Token {
    fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
            terminated: true,
        }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.' || b >= 0x80
}

/// Resumable tokenizer over a document.
///
/// Yields tokens in order, skipping whitespace. The consumer can switch to raw
/// scanning with [`Lexer::skip_raw_body`] for bodies that are not CHTL.
pub struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    /// Skip the body of a block whose `{` was just produced.
    ///
    /// Only braces are counted: quotes and comment markers carry no meaning.
    /// Stops before the matching `}` so it is lexed normally, or at the end of
    /// input when there is none.
    pub fn skip_raw_body(&mut self) {
        let mut depth = 0usize;
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'{' => depth += 1,
                b'}' if depth == 0 => return,
                b'}' => depth -= 1,
                _ => {}
            }
            self.pos += 1;
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let bytes = self.bytes;
        let len = bytes.len();

        while self.pos < len && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if self.pos >= len {
            return None;
        }

        let start = self.pos;
        let b = bytes[start];
        let mut i = start;

        let token = match b {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < len && bytes[i] != b'\n' {
                    i += 1;
                }
                Token::new(TokenKind::LineComment, start, i)
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                let mut terminated = false;
                while i < len {
                    if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                        i += 2;
                        terminated = true;
                        break;
                    }
                    i += 1;
                }
                let mut token = Token::new(TokenKind::BlockComment, start, i);
                token.terminated = terminated;
                token
            }
            // `#id` selectors have no space after the hash
            b'#' if matches!(bytes.get(i + 1), None | Some(b' ' | b'\t' | b'\n' | b'\r')) => {
                while i < len && bytes[i] != b'\n' {
                    i += 1;
                }
                Token::new(TokenKind::GeneratorComment, start, i)
            }
            b'"' | b'\'' | b'`' => {
                let (end, terminated) = scan_string(bytes, i);
                i = end;
                let mut token = Token::new(TokenKind::String, start, i);
                token.terminated = terminated;
                token
            }
            b'[' => match scan_bracket_keyword(bytes, i) {
                Some(end) => {
                    i = end;
                    Token::new(TokenKind::BracketKeyword, start, i)
                }
                None => {
                    i += 1;
                    Token::new(TokenKind::Punct, start, i)
                }
            },
            b'@' if bytes.get(i + 1).is_some_and(|b| b.is_ascii_alphabetic()) => {
                i += 1;
                while i < len && is_word_byte(bytes[i]) {
                    i += 1;
                }
                Token::new(TokenKind::AtType, start, i)
            }
            _ if is_word_byte(b) => {
                while i < len && is_word_byte(bytes[i]) {
                    i += 1;
                }
                Token::new(TokenKind::Word, start, i)
            }
            _ => {
                i += 1;
                let kind = match b {
                    b'{' => TokenKind::LBrace,
                    b'}' => TokenKind::RBrace,
                    b';' => TokenKind::Semicolon,
                    b':' => TokenKind::Colon,
                    b'=' => TokenKind::Equal,
                    _ => TokenKind::Punct,
                };
                Token::new(kind, start, i)
            }
        };

        self.pos = i;
        Some(token)
    }
}

/// Scan a quoted literal starting at `open`. Returns the exclusive end and
/// whether the closing quote was found.
fn scan_string(bytes: &[u8], open: usize) -> (usize, bool) {
    let quote = bytes[open];
    let mut i = open + 1;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return (i + 1, true),
            _ => i += 1,
        }
    }

    (bytes.len(), false)
}

/// Recognize `[Word]` starting at `open`, returning the exclusive end.
fn scan_bracket_keyword(bytes: &[u8], open: usize) -> Option<usize> {
    let mut i = open + 1;
    if !bytes.get(i)?.is_ascii_alphabetic() {
        return None;
    }
    while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
        i += 1;
    }
    (bytes.get(i) == Some(&b']')).then_some(i + 1)
}
