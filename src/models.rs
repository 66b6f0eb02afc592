// src/models.rs

//! Tokens, command handlers and bound invocations.

use std::fmt;
use std::sync::Arc;

// --- TOKENS ---

/// The lexical category of a token produced by the lexer.
///
/// The declaration order is the order in which the lexer tries each rule at a
/// given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A `:` path separator.
    Colon,
    /// A `;` command separator.
    Semicolon,
    /// A double-quoted string. The quotes are stripped from the token text.
    QuotedString,
    /// A command word, e.g. `MEAS` or `*IDN?`.
    Command,
    /// An argument value, e.g. `23` or `0.5`.
    Argument,
    /// Spaces and tabs. Recognized but never emitted.
    Whitespace,
    /// Line breaks. Recognized but never emitted.
    Newline,
}

/// A single token of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The lexical category of the token.
    pub kind: TokenKind,
    /// The matched text (quotes already stripped for quoted strings).
    pub text: String,
}

impl Token {
    /// Creates a new token of the given kind.
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

// --- HANDLERS ---

/// A function that executes a single SCPI command.
///
/// Handlers receive the arguments bound to the command (possibly none) and may
/// return a textual result. Any `Fn(&[String]) -> Option<String>` closure that is
/// `Send + Sync` is a handler, so free functions, closures and methods wrapped in
/// closures can all be registered.
///
/// Handlers are executed outside of every lock held by the parser. Handlers that
/// share mutable state must synchronize it themselves.
pub trait CommandHandler: Send + Sync {
    /// Executes the command with its bound arguments.
    fn handle(&self, args: &[String]) -> Option<String>;
}

impl<F> CommandHandler for F
where
    F: Fn(&[String]) -> Option<String> + Send + Sync,
{
    fn handle(&self, args: &[String]) -> Option<String> {
        self(args)
    }
}

/// A shared, type-erased command handler as stored by the registry.
pub type Handler = Arc<dyn CommandHandler>;

// --- INVOCATIONS ---

/// A handler bound to a concrete argument list, ready to execute.
///
/// Invocations are immutable and cheap to clone, so the same parsed list can be
/// stored in the cache and executed by many threads at once.
#[derive(Clone)]
pub struct Invocation {
    handler: Handler,
    args: Arc<[String]>,
}

impl Invocation {
    /// Binds `handler` to a snapshot of `args`.
    pub fn new(handler: Handler, args: &[String]) -> Self {
        Self {
            handler,
            args: Arc::from(args),
        }
    }

    /// The arguments bound to this invocation.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Runs the handler with the bound arguments.
    pub fn execute(&self) -> Option<String> {
        self.handler.handle(&self.args)
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_a_handler() {
        let handler: Handler = Arc::new(|args: &[String]| Some(args.join(",")));
        let invocation = Invocation::new(handler, &["a".to_string(), "b".to_string()]);
        assert_eq!(invocation.execute().as_deref(), Some("a,b"));
    }

    #[test]
    fn test_invocation_snapshots_arguments() {
        let handler: Handler = Arc::new(|args: &[String]| Some(args.len().to_string()));
        let mut args = vec!["1".to_string()];
        let invocation = Invocation::new(handler, &args);
        args.push("2".to_string());

        assert_eq!(invocation.args(), ["1".to_string()]);
        assert_eq!(invocation.execute().as_deref(), Some("1"));
    }

    #[test]
    fn test_free_function_is_a_handler() {
        fn idn(_args: &[String]) -> Option<String> {
            Some("IDN".to_string())
        }
        let handler: Handler = Arc::new(idn);
        assert_eq!(handler.handle(&[]).as_deref(), Some("IDN"));
    }
}
