//! # Command Parser
//!
//! Turns a token stream into the ordered list of invocations it describes.
//!
//! The parser walks the tokens once, keeping an active path, the arguments seen so
//! far and whether the current command has started:
//!
//! - a command word extends the active path (abbreviations expand to the full
//!   segment name);
//! - a colon that does not follow a command word resets the active path to the
//!   root, so `;:MEASure:...` starts from scratch;
//! - a semicolon binds the handler of the active path to the collected arguments,
//!   then drops the last path segment so the next command inherits the parent
//!   path (`MEAS:VOLT:DC?;AC?` runs `MEAS:VOLT:AC?` second).

use crate::core::path::ScpiPath;
use crate::core::registry::HandlerRegistry;
use crate::error::ScpiError;
use crate::models::{Invocation, Token, TokenKind};
use log::debug;

/// Parses `tokens` against the handlers and abbreviations of `registry`.
///
/// # Errors
///
/// Returns [`ScpiError::MissingHandler`] for the first command whose path has no
/// handler. Invocations parsed before it are discarded.
pub fn parse(tokens: &[Token], registry: &HandlerRegistry) -> Result<Vec<Invocation>, ScpiError> {
    let mut invocations = Vec::new();
    let mut active_path = ScpiPath::new();
    let mut arguments: Vec<String> = Vec::new();
    let mut in_command = false;

    for token in tokens {
        match token.kind {
            TokenKind::Command => {
                match registry.canonical_segment(&token.text) {
                    Some(full) => active_path.push(full),
                    None => active_path.push(token.text.as_str()),
                }
                in_command = true;
            }
            TokenKind::Argument | TokenKind::QuotedString => {
                arguments.push(token.text.clone());
            }
            TokenKind::Colon => {
                if !in_command {
                    active_path.clear();
                }
            }
            TokenKind::Semicolon => {
                let handler = registry
                    .resolve(&active_path)
                    .ok_or_else(|| ScpiError::MissingHandler {
                        path: active_path.to_string(),
                    })?;
                invocations.push(Invocation::new(handler, &arguments));
                arguments.clear();
                in_command = false;
                active_path.pop();
            }
            TokenKind::Whitespace | TokenKind::Newline => {}
        }
    }

    debug!("Parsed {} command(s)", invocations.len());
    Ok(invocations)
}
