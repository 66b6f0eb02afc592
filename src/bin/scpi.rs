// src/bin/scpi.rs

//! Sends SCPI queries to a simulated instrument and prints the results.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use scpi::{
    ParserConfig, ScpiParser,
    cli::Cli,
    instrument::simulated_parser,
};
use std::io::{self, BufRead};

/// Sets up logging, parses arguments and reports any error in one place.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut config = match &cli.config {
        Some(path) => ParserConfig::load(path)
            .with_context(|| format!("Failed to load configuration '{}'", path.display()))?,
        None => ParserConfig::default(),
    };
    if let Some(size) = cli.cache_size {
        config.cache_size_limit = size;
    }
    if cli.cache_arguments {
        config.cache_queries_with_arguments = true;
    }

    let (parser, _instrument) = simulated_parser(ScpiParser::with_config(config));

    if cli.queries.is_empty() {
        return run_stdin(&parser, cli.json);
    }
    for query in &cli.queries {
        let results = parser
            .accept(query)
            .with_context(|| format!("Query '{}' failed", query))?;
        print_results(&results, cli.json)?;
    }
    Ok(())
}

/// Accepts one query per input line. A failing query is reported and skipped.
fn run_stdin(parser: &ScpiParser, json: bool) -> Result<()> {
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read from standard input")?;
        if line.trim().is_empty() {
            continue;
        }
        match parser.accept(&line) {
            Ok(results) => print_results(&results, json)?,
            Err(e) => eprintln!("{}: {}", "Error".red().bold(), e),
        }
    }
    Ok(())
}

fn print_results(results: &[Option<String>], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(results)?);
        return Ok(());
    }
    for result in results {
        match result {
            Some(value) => println!("{}", value),
            None => println!("{}", "(none)".dimmed()),
        }
    }
    Ok(())
}
