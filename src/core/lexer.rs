//! # Lexer
//!
//! Converts a raw query into the token stream consumed by the command parser.
//!
//! The lexer is an explicit scanner: at every position it tries a fixed list of
//! rules in declaration order and takes the first one that matches. Characters
//! that no rule matches are skipped without producing a token.
//!
//! A single "last emitted token" register drives two rewrites:
//! - any word (command word, argument word or quoted string) that directly follows
//!   another word is emitted as a [`TokenKind::Argument`], so `CONCAT a b c`
//!   yields one command and three arguments;
//! - runs of `:` or `;` collapse into a single token.
//!
//! The stream always ends with a [`TokenKind::Semicolon`] so the parser flushes the
//! trailing command.

use crate::constants::COMMAND_SEPARATOR;
use crate::models::{Token, TokenKind};
use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

lazy_static! {
    // Anchored at the current scan position. Order is significant.
    static ref TOKEN_RULES: Vec<(TokenKind, Regex)> = [
        (TokenKind::Colon, r"\A:"),
        (TokenKind::Semicolon, r"\A;"),
        (TokenKind::QuotedString, r#"\A"[^"]*?""#),
        (TokenKind::Command, r"\A[A-Za-z*_?]+"),
        (TokenKind::Argument, r"\A[A-Za-z0-9.]+"),
        (TokenKind::Whitespace, r"\A[ \t]+"),
        (TokenKind::Newline, r"\A[\r\n]+"),
    ]
    .into_iter()
    .map(|(kind, pattern)| {
        (
            kind,
            Regex::new(pattern).expect("token rule patterns are valid"),
        )
    })
    .collect();
}

/// Tokenizes a query.
///
/// Whitespace and newlines are consumed but never emitted. The returned stream is
/// never empty: an empty query yields a single semicolon.
pub fn tokenize(query: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    // `Command` here stands for "a word was emitted last".
    let mut last: Option<TokenKind> = None;
    let mut rest = query;

    while !rest.is_empty() {
        let Some((kind, lexeme)) = match_rule(rest) else {
            let mut chars = rest.chars();
            if let Some(skipped) = chars.next() {
                trace!("Skipping unrecognized character {:?}", skipped);
            }
            rest = chars.as_str();
            continue;
        };
        rest = rest.get(lexeme.len()..).unwrap_or_default();

        match kind {
            TokenKind::QuotedString | TokenKind::Command | TokenKind::Argument => {
                let text = if kind == TokenKind::QuotedString {
                    strip_quotes(lexeme)
                } else {
                    lexeme
                };
                let emitted = if last == Some(TokenKind::Command) {
                    TokenKind::Argument
                } else {
                    kind
                };
                trace!("Token {:?} {:?}", emitted, text);
                tokens.push(Token::new(emitted, text));
                last = Some(TokenKind::Command);
            }
            TokenKind::Colon | TokenKind::Semicolon => {
                if last != Some(kind) {
                    trace!("Token {:?}", kind);
                    tokens.push(Token::new(kind, lexeme));
                    last = Some(kind);
                }
            }
            TokenKind::Whitespace | TokenKind::Newline => {}
        }
    }

    if last != Some(TokenKind::Semicolon) {
        tokens.push(Token::new(
            TokenKind::Semicolon,
            COMMAND_SEPARATOR.to_string(),
        ));
    }
    tokens
}

/// Whether any token in the stream is an argument value.
pub fn contains_argument(tokens: &[Token]) -> bool {
    tokens.iter().any(|token| token.kind == TokenKind::Argument)
}

/// Returns the first rule matching at the start of `input`, with the matched text.
fn match_rule(input: &str) -> Option<(TokenKind, &str)> {
    TOKEN_RULES
        .iter()
        .find_map(|(kind, re)| re.find(input).map(|m| (*kind, m.as_str())))
}

fn strip_quotes(lexeme: &str) -> &str {
    lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(lexeme)
}
