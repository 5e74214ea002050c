//! Swift syntax highlighting for fenced code blocks.
//!
//! Code is split into tokens by a small hand-written lexer and each
//! non-plain token is wrapped in `<span class="{prefix}{kind}">`:
//!
//! ```text
//! let widget = TubeStatus(line: .central)
//! ^^^          ^^^^^^^^^^        ^^^^^^^^
//! keyword      type              dotAccess
//! ```
//!
//! Blocks fenced as `no-highlight` are left alone. The lexer never drops
//! input: concatenating the token texts gives back the original code.

use crate::markdown::{Fragment, Modifier, ModifierTarget};
use maud::{Markup, html};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    String,
    Comment,
    Number,
    Type,
    Call,
    Property,
    DotAccess,
    Preprocessing,
    Plain,
}

impl TokenKind {
    /// CSS class suffix, `None` for plain text.
    pub fn class(self) -> Option<&'static str> {
        match self {
            TokenKind::Keyword => Some("keyword"),
            TokenKind::String => Some("string"),
            TokenKind::Comment => Some("comment"),
            TokenKind::Number => Some("number"),
            TokenKind::Type => Some("type"),
            TokenKind::Call => Some("call"),
            TokenKind::Property => Some("property"),
            TokenKind::DotAccess => Some("dotAccess"),
            TokenKind::Preprocessing => Some("preprocessing"),
            TokenKind::Plain => None,
        }
    }
}

const KEYWORDS: &[&str] = &[
    "actor", "as", "associatedtype", "async", "await", "break", "case", "catch", "class",
    "continue", "default", "defer", "deinit", "do", "else", "enum", "extension", "fallthrough",
    "false", "fileprivate", "final", "for", "func", "guard", "if", "import", "in", "indirect",
    "init", "inout", "internal", "is", "lazy", "let", "mutating", "nil", "nonisolated",
    "open", "operator", "override", "private", "protocol", "public", "repeat", "required",
    "rethrows", "return", "self", "Self", "some", "static", "struct", "subscript", "super",
    "switch", "throw", "throws", "true", "try", "typealias", "var", "weak", "where", "while",
];

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    tokens: Vec<(TokenKind, Range<usize>)>,
}

impl<'a> Lexer<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, f: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !f(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Advance past the next occurrence of `terminator`, or to the end.
    fn eat_through(&mut self, terminator: &str) {
        match self.rest().find(terminator) {
            Some(offset) => self.pos += offset + terminator.len(),
            None => self.pos = self.src.len(),
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        if start == self.pos {
            return;
        }
        if kind == TokenKind::Plain {
            if let Some((TokenKind::Plain, last)) = self.tokens.last_mut() {
                if last.end == start {
                    last.end = self.pos;
                    return;
                }
            }
        }
        self.tokens.push((kind, start..self.pos));
    }

    fn run(mut self) -> Vec<(TokenKind, &'a str)> {
        while let Some(c) = self.peek() {
            let start = self.pos;
            let rest = self.rest();
            let kind = if rest.starts_with("//") {
                self.eat_while(|c| c != '\n');
                TokenKind::Comment
            } else if rest.starts_with("/*") {
                self.pos += 2;
                self.eat_through("*/");
                TokenKind::Comment
            } else if rest.starts_with("\"\"\"") {
                self.pos += 3;
                self.eat_through("\"\"\"");
                TokenKind::String
            } else if c == '"' {
                self.bump();
                self.string_body();
                TokenKind::String
            } else if c.is_ascii_digit() {
                self.number();
                TokenKind::Number
            } else if c == '@' {
                self.bump();
                self.eat_while(is_ident);
                TokenKind::Keyword
            } else if c == '#' {
                self.bump();
                self.eat_while(is_ident);
                TokenKind::Preprocessing
            } else if is_ident_start(c) {
                self.eat_while(is_ident);
                self.classify_word(start)
            } else {
                self.bump();
                TokenKind::Plain
            };
            self.push(kind, start);
        }

        let src = self.src;
        self.tokens
            .into_iter()
            .map(|(kind, range)| (kind, &src[range]))
            .collect()
    }

    fn string_body(&mut self) {
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '"' | '\n' => break,
                _ => {}
            }
        }
    }

    fn number(&mut self) {
        loop {
            self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
            let mut ahead = self.rest().chars();
            match (ahead.next(), ahead.next()) {
                (Some('.'), Some(d)) if d.is_ascii_digit() => {
                    self.bump();
                }
                _ => break,
            }
        }
    }

    fn classify_word(&self, start: usize) -> TokenKind {
        let word = &self.src[start..self.pos];
        let before = &self.src[..start];
        let after_dot = before.ends_with('.');

        if KEYWORDS.contains(&word) && !after_dot {
            return TokenKind::Keyword;
        }
        let called = self.peek() == Some('(');
        if after_dot {
            let receiver = before[..before.len() - 1].chars().next_back();
            let chained = receiver.is_some_and(|c| is_ident(c) || matches!(c, ')' | ']' | '?' | '!'));
            return match (chained, called) {
                (true, true) => TokenKind::Call,
                (true, false) => TokenKind::Property,
                (false, _) => TokenKind::DotAccess,
            };
        }
        if word.starts_with(|c: char| c.is_ascii_uppercase()) {
            TokenKind::Type
        } else if called {
            TokenKind::Call
        } else {
            TokenKind::Plain
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split Swift source into classified tokens. Adjacent plain text is merged.
pub fn tokenize(code: &str) -> Vec<(TokenKind, &str)> {
    Lexer {
        src: code,
        pos: 0,
        tokens: Vec::new(),
    }
    .run()
}

/// Render code as `<pre><code>` with token spans.
pub fn highlight(code: &str, class_prefix: &str) -> Markup {
    html! {
        pre {
            code {
                @for (kind, text) in tokenize(code) {
                    @if let Some(class) = kind.class() {
                        span class=(format!("{class_prefix}{class}")) { (text) }
                    } @else {
                        (text)
                    }
                }
            }
        }
    }
}

pub struct HighlightModifier {
    class_prefix: String,
}

impl HighlightModifier {
    pub fn new(class_prefix: impl Into<String>) -> Self {
        Self {
            class_prefix: class_prefix.into(),
        }
    }
}

impl Modifier for HighlightModifier {
    fn target(&self) -> ModifierTarget {
        ModifierTarget::CodeBlocks
    }

    fn modify(&self, fragment: &Fragment<'_>) -> String {
        match fragment.code {
            Some(code) if code.language != Some("no-highlight") => {
                highlight(code.code, &self.class_prefix).into_string()
            }
            _ => fragment.html.to_string(),
        }
    }
}
