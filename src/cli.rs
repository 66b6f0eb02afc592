// src/cli.rs

//! Command-line arguments of the `scpi` binary.

use clap::Parser;
use std::path::PathBuf;

/// scpi: send SCPI queries to a simulated instrument.
///
/// Each QUERY is parsed and executed in order and its results are printed, one
/// per line. Without queries, one query is read from each line of standard input.
///
/// Examples:
///   scpi '*IDN?'
///   scpi 'VAR:X 23;X?' 'MEAS:VOLT:DC?;:MEAS:CURR:AC?'
///   echo 'CONCAT hello "big world"' | scpi --json
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Queries to run. Reads from standard input when omitted.
    pub queries: Vec<String>,

    /// Path to a TOML file with parser settings.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of distinct queries to cache (0 disables the cache).
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub cache_size: Option<i64>,

    /// Also cache queries that carry argument values.
    #[arg(long)]
    pub cache_arguments: bool,

    /// Print each query's results as a JSON array.
    #[arg(long)]
    pub json: bool,
}
