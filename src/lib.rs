//! A SCPI-style command parser.
//!
//! Handlers are registered under colon-delimited command paths such as
//! `MEASure:VOLTage:DC?` and invoked by queries like `MEAS:VOLT:DC?;AC?`, with
//! abbreviations, chained commands, arguments and quoted strings. Parsed queries
//! are kept in a bounded, frequency-ranked cache. See [`ScpiParser`].

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod instrument;
pub mod models;
pub mod parser;

pub use config::ParserConfig;
pub use error::{ConfigError, ScpiError};
pub use models::{CommandHandler, Invocation};
pub use parser::ScpiParser;
