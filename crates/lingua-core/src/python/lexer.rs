// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Hand-written lexer for the Python 2 dialect.
//!
//! Identifier, numeric, and string lexemes delegate to the shared
//! sub-lexers parameterized by [`PySyntax`]; this module owns what is
//! genuinely Python-shaped:
//!
//! - significant indentation — an indent stack emitting balanced
//!   [`Token::Indent`] / [`Token::Dedent`] pairs, suppressed inside
//!   brackets and after a `\` line join;
//! - blank-line and `#`-comment suppression;
//! - string prefixes (`r`, `u`, `b` and combinations) and triple-quoted
//!   strings;
//! - the operator and punctuation alphabet, longest-match first.
//!
//! A logical line that produced tokens is always terminated by a
//! [`Token::Newline`], synthesized at end of buffer when the source does
//! not end in one.

use ecow::EcoString;

use crate::source_analysis::{
    lex_ident_or_keyword, lex_num_lit, lex_str_lit, Diagnostic, DiagnosticKind, LexIssue, Lexer,
    SourceCursor, SourceLoc, Syntax, Token,
};

use super::PySyntax;

/// Number of columns a tab advances to (next multiple).
const TAB_WIDTH: u32 = 8;

/// Walks raw buffer bytes, returning the line/column position after them.
fn position_after(bytes: &[u8], mut line: u32, mut col: u32) -> (u32, u32) {
    for &b in bytes {
        if b == b'\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// A pull lexer for Python 2 source.
#[derive(Debug, Default)]
pub struct PyLexer {
    cursor: SourceCursor,
    syntax: PySyntax,
    /// Current position (1-based line, 0-based column).
    line: u32,
    col: u32,
    /// Location and raw text of the most recently lexed token.
    tok_loc: SourceLoc,
    lexeme: EcoString,
    /// Indentation stack; the base level 0 is always present.
    indents: Vec<u32>,
    pending_dedents: u32,
    at_line_start: bool,
    bracket_depth: u32,
    /// A logical line emitted tokens and still awaits its newline.
    need_final_newline: bool,
    reports: Vec<Diagnostic>,
    done: bool,
}

impl PyLexer {
    /// Creates a lexer with no buffer bound.
    #[must_use]
    pub fn new() -> Self {
        let mut lexer = Self::default();
        lexer.reset();
        lexer
    }

    fn reset(&mut self) {
        self.line = 1;
        self.col = 0;
        self.tok_loc = SourceLoc::default();
        self.lexeme.clear();
        self.indents = vec![0];
        self.pending_dedents = 0;
        self.at_line_start = true;
        self.bracket_depth = 0;
        self.need_final_newline = false;
        self.reports.clear();
        self.done = false;
    }

    fn peek(&self) -> char {
        self.cursor.peek_char(0)
    }

    /// Consumes one character, tracking line/column.
    fn bump(&mut self) {
        let c = self.peek();
        self.cursor.consume_char(0);
        if c == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
    }

    /// Stamps a zero-width location for a synthesized token.
    fn mark_point(&mut self) {
        self.tok_loc = SourceLoc::new(self.line, self.col, self.line, self.col);
        self.lexeme.clear();
    }

    /// Measures indentation at a logical line start, skipping blank and
    /// comment-only lines. Returns the indentation token when the level
    /// changes; `None` when the line continues at the current level or
    /// the buffer ended.
    fn scan_indentation(&mut self) -> Option<Token> {
        loop {
            let mut width: u32 = 0;
            loop {
                match self.peek() {
                    ' ' => {
                        width += 1;
                        self.bump();
                    }
                    '\t' => {
                        width = (width / TAB_WIDTH + 1) * TAB_WIDTH;
                        self.bump();
                    }
                    '\r' => self.bump(),
                    _ => break,
                }
            }

            match self.peek() {
                '\n' => self.bump(), // blank line
                '#' => {
                    while !matches!(self.peek(), '\n' | '\0') {
                        self.bump();
                    }
                }
                '\0' => {
                    self.at_line_start = false;
                    return None;
                }
                _ => {
                    self.at_line_start = false;
                    let top = *self.indents.last().unwrap_or(&0);
                    return match width.cmp(&top) {
                        std::cmp::Ordering::Greater => {
                            self.indents.push(width);
                            self.mark_point();
                            Some(Token::Indent)
                        }
                        std::cmp::Ordering::Less => {
                            // Unaligned levels settle on the nearest
                            // enclosing one.
                            while self.indents.len() > 1
                                && self.indents.last().is_some_and(|&top| top > width)
                            {
                                self.indents.pop();
                                self.pending_dedents += 1;
                            }
                            if self.pending_dedents > 0 {
                                self.pending_dedents -= 1;
                            }
                            self.mark_point();
                            Some(Token::Dedent)
                        }
                        std::cmp::Ordering::Equal => None,
                    };
                }
            }
        }
    }

    /// End-of-buffer sequencing: the final newline for a dangling logical
    /// line, then one dedent per open indentation level, then `Eop`.
    fn finish_at_eof(&mut self) -> Token {
        if self.need_final_newline {
            self.need_final_newline = false;
            self.at_line_start = true;
            self.mark_point();
            return Token::Newline;
        }
        if self.indents.len() > 1 {
            let drops = u32::try_from(self.indents.len() - 1).unwrap_or(u32::MAX);
            self.indents.truncate(1);
            self.pending_dedents += drops - 1;
            self.mark_point();
            return Token::Dedent;
        }
        self.done = true;
        self.mark_point();
        Token::Eop
    }

    /// Lexes one ordinary (non-structural) token starting at the current
    /// character.
    fn lex_ordinary_token(&mut self) -> Token {
        let start_line = self.line;
        let start_col = self.col;
        let start_offset = self.cursor.offset();
        let mut issues = Vec::new();

        let c = self.peek();
        let tok = if self.syntax.is_ident_first_char(c) {
            if let Some(prefix_len) = self.string_prefix_len() {
                for _ in 0..prefix_len {
                    self.cursor.consume_char(0);
                }
                self.lex_string_tail(start_line, start_col, &mut issues)
            } else {
                let mut ch = c;
                lex_ident_or_keyword(&mut ch, &mut self.cursor, &self.syntax)
            }
        } else if c.is_ascii_digit() || (c == '.' && self.cursor.peek_char(1).is_ascii_digit()) {
            let mut ch = c;
            lex_num_lit(&mut ch, &mut self.cursor, &self.syntax, &mut issues)
        } else if c == '"' || c == '\'' {
            self.lex_string_tail(start_line, start_col, &mut issues)
        } else {
            self.lex_operator(c)
        };

        self.finish_token(start_line, start_col, start_offset, &issues, tok)
    }

    /// Number of string-prefix characters (`r`, `u`, `b`, any case)
    /// directly followed by a quote; `None` when the current character
    /// starts a plain identifier.
    fn string_prefix_len(&self) -> Option<usize> {
        let mut len = 0;
        while len < 2 && matches!(self.cursor.peek_char(len), 'r' | 'R' | 'u' | 'U' | 'b' | 'B') {
            len += 1;
        }
        if len > 0 && matches!(self.cursor.peek_char(len), '"' | '\'') {
            Some(len)
        } else {
            None
        }
    }

    /// Lexes a string starting at the opening quote (prefixes already
    /// consumed).
    fn lex_string_tail(
        &mut self,
        start_line: u32,
        start_col: u32,
        issues: &mut Vec<LexIssue>,
    ) -> Token {
        let quote = self.peek();
        if self.cursor.peek_char(1) == quote && self.cursor.peek_char(2) == quote {
            return self.lex_triple_string(quote, start_line, start_col);
        }

        self.cursor.consume_char(0);
        let mut ch = self.peek();
        let tok = lex_str_lit(&mut ch, &mut self.cursor, quote, false, &self.syntax, issues);
        if ch == quote {
            self.cursor.consume_char(0);
        } else {
            self.reports.push(Diagnostic::new(
                DiagnosticKind::UnterminatedString,
                SourceLoc::new(start_line, start_col, start_line, start_col + 1),
            ));
        }
        tok
    }

    /// Lexes a triple-quoted string; newlines are part of the literal.
    fn lex_triple_string(&mut self, quote: char, start_line: u32, start_col: u32) -> Token {
        self.cursor.consume_char(2); // the three opening quotes
        loop {
            let c = self.peek();
            if c == '\0' {
                self.reports.push(Diagnostic::new(
                    DiagnosticKind::UnterminatedString,
                    SourceLoc::new(start_line, start_col, start_line, start_col + 1),
                ));
                break;
            }
            if c == quote && self.cursor.peek_char(1) == quote && self.cursor.peek_char(2) == quote
            {
                self.cursor.consume_char(2);
                break;
            }
            if c == '\\' {
                self.cursor.consume_char(0);
                if self.peek() != '\0' {
                    self.cursor.consume_char(0);
                }
            } else {
                self.cursor.consume_char(0);
            }
        }
        Token::StringLiteral
    }

    /// Lexes operators and punctuation, longest match first.
    fn lex_operator(&mut self, c: char) -> Token {
        let c1 = self.cursor.peek_char(1);
        let c2 = self.cursor.peek_char(2);
        // (token, consumed length)
        let (tok, len) = match c {
            '(' => {
                self.bracket_depth += 1;
                (Token::Lparen, 1)
            }
            ')' => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                (Token::Rparen, 1)
            }
            '[' => {
                self.bracket_depth += 1;
                (Token::Lbracket, 1)
            }
            ']' => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                (Token::Rbracket, 1)
            }
            '{' => {
                self.bracket_depth += 1;
                (Token::Lbrace, 1)
            }
            '}' => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                (Token::Rbrace, 1)
            }
            ',' => (Token::Comma, 1),
            ':' => (Token::Colon, 1),
            ';' => (Token::Semicolon, 1),
            '`' => (Token::Backtick, 1),
            '@' => (Token::At, 1),
            '~' => (Token::Tilde, 1),
            '.' if c1 == '.' && c2 == '.' => (Token::DotDotDot, 3),
            '.' => (Token::Dot, 1),
            '+' if c1 == '=' => (Token::PlusEqual, 2),
            '+' => (Token::Plus, 1),
            '-' if c1 == '=' => (Token::MinusEqual, 2),
            '-' => (Token::Minus, 1),
            '*' if c1 == '*' && c2 == '=' => (Token::StarStarEqual, 3),
            '*' if c1 == '*' => (Token::StarStar, 2),
            '*' if c1 == '=' => (Token::StarEqual, 2),
            '*' => (Token::Star, 1),
            '/' if c1 == '/' && c2 == '=' => (Token::SlashSlashEqual, 3),
            '/' if c1 == '/' => (Token::SlashSlash, 2),
            '/' if c1 == '=' => (Token::SlashEqual, 2),
            '/' => (Token::Slash, 1),
            '%' if c1 == '=' => (Token::PercentEqual, 2),
            '%' => (Token::Percent, 1),
            '&' if c1 == '=' => (Token::AmperEqual, 2),
            '&' => (Token::Amper, 1),
            '|' if c1 == '=' => (Token::PipeEqual, 2),
            '|' => (Token::Pipe, 1),
            '^' if c1 == '=' => (Token::CaretEqual, 2),
            '^' => (Token::Caret, 1),
            '<' if c1 == '<' && c2 == '=' => (Token::LessLessEqual, 3),
            '<' if c1 == '<' => (Token::LessLess, 2),
            '<' if c1 == '=' => (Token::LessEqual, 2),
            '<' if c1 == '>' => (Token::LessGreater, 2),
            '<' => (Token::Less, 1),
            '>' if c1 == '>' && c2 == '=' => (Token::GreaterGreaterEqual, 3),
            '>' if c1 == '>' => (Token::GreaterGreater, 2),
            '>' if c1 == '=' => (Token::GreaterEqual, 2),
            '>' => (Token::Greater, 1),
            '=' if c1 == '=' => (Token::EqualEqual, 2),
            '=' => (Token::Equal, 1),
            '!' if c1 == '=' => (Token::ExclamEqual, 2),
            _ => (Token::Invalid, 1),
        };
        self.cursor.consume_char(len - 1);
        tok
    }

    /// Converts sub-lexer issues to diagnostics, updates position
    /// tracking, and stamps the token's location and lexeme.
    fn finish_token(
        &mut self,
        start_line: u32,
        start_col: u32,
        start_offset: usize,
        issues: &[LexIssue],
        tok: Token,
    ) -> Token {
        let end_offset = self.cursor.offset();
        let bytes = self.cursor.bytes(start_offset, end_offset);
        let (end_line, end_col) = position_after(bytes, start_line, start_col);
        self.tok_loc = SourceLoc::new(start_line, start_col, end_line, end_col);
        self.lexeme = String::from_utf8_lossy(bytes).into_owned().into();
        self.line = end_line;
        self.col = end_col;

        // Issues anchor at the whole token, which keeps the report list
        // monotonic in source order no matter how reports interleave with
        // the parser's.
        for issue in issues {
            self.reports
                .push(Diagnostic::new(issue.kind, self.tok_loc.clone()));
        }

        tok
    }

    fn lex_impl(&mut self) -> Token {
        if self.done {
            self.mark_point();
            return Token::Eop;
        }
        if self.pending_dedents > 0 {
            self.pending_dedents -= 1;
            self.mark_point();
            return Token::Dedent;
        }

        loop {
            if self.at_line_start && self.bracket_depth == 0 {
                if let Some(tok) = self.scan_indentation() {
                    return tok;
                }
            }
            match self.peek() {
                ' ' | '\t' | '\r' => self.bump(),
                '\n' if self.bracket_depth > 0 => self.bump(),
                '\n' => {
                    let (line, col) = (self.line, self.col);
                    self.bump();
                    self.tok_loc = SourceLoc::new(line, col, line, col + 1);
                    self.lexeme = "\n".into();
                    self.at_line_start = true;
                    self.need_final_newline = false;
                    return Token::Newline;
                }
                '\\' if self.cursor.peek_char(1) == '\n' => {
                    self.bump();
                    self.bump();
                }
                '#' => {
                    while !matches!(self.peek(), '\n' | '\0') {
                        self.bump();
                    }
                }
                '\0' => return self.finish_at_eof(),
                _ => break,
            }
        }

        self.need_final_newline = true;
        self.lex_ordinary_token()
    }
}

impl Lexer for PyLexer {
    fn set_buffer(&mut self, source: &str) {
        self.cursor.set_buffer(source);
        self.reset();
    }

    fn lex(&mut self) -> Token {
        self.lex_impl()
    }

    fn token_loc(&self) -> SourceLoc {
        self.tok_loc.clone()
    }

    fn token_lexeme(&self) -> &str {
        &self.lexeme
    }

    fn take_reports(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.reports)
    }
}
