// src/core/mod.rs

//! Lexing, parsing, handler lookup and caching behind [`crate::ScpiParser`].

pub mod cache;
pub mod command_parser;
pub(crate) mod commons;
pub mod lexer;
pub mod path;
pub mod registry;
